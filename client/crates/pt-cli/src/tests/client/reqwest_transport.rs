use crate::{ApiRequest, ClientError, ReqwestTransport, Transport};

use std::time::Duration;

use tokio::net::TcpListener;

fn transport(base_url: &str) -> ReqwestTransport {
    ReqwestTransport::new(base_url, Duration::from_secs(5), None).unwrap()
}

#[test]
fn test_base_url_trailing_slash_trimmed() {
    assert_eq!(
        transport("http://localhost:8080/").base_url(),
        "http://localhost:8080"
    );
}

#[test]
fn given_base_path_when_building_url_then_path_appended() {
    let url = transport("http://localhost:8080/api")
        .url(&ApiRequest::get("/ledgers"))
        .unwrap();
    assert_eq!(url.as_str(), "http://localhost:8080/api/ledgers");
}

#[test]
fn given_query_when_building_url_then_encoded() {
    let request = ApiRequest::get("/beneficiary/payer").with_query("payerId", "a b&c");
    let url = transport("http://localhost:8080").url(&request).unwrap();
    assert_eq!(
        url.as_str(),
        "http://localhost:8080/beneficiary/payer?payerId=a+b%26c"
    );
}

#[test]
fn given_invalid_base_url_when_new_then_error() {
    assert!(ReqwestTransport::new("not a url", Duration::from_secs(5), None).is_err());
}

#[test]
fn given_saved_cookies_when_new_then_jar_seeded() {
    let transport = ReqwestTransport::new(
        "http://localhost:8080",
        Duration::from_secs(5),
        Some("access_token=abc; refresh_token=def"),
    )
    .unwrap();

    let header = transport.cookie_header().unwrap();
    assert!(header.contains("access_token=abc"));
    assert!(header.contains("refresh_token=def"));
}

#[test]
fn given_no_cookies_when_cookie_header_then_none() {
    assert_eq!(transport("http://localhost:8080").cookie_header(), None);
}

#[tokio::test]
async fn given_https_base_url_when_send_then_connection_attempted() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let accepted = tokio::spawn(async move { listener.accept().await.is_ok() });

    let transport = transport(&format!("https://127.0.0.1:{port}"));
    let result = transport.send(&ApiRequest::get("/ledgers")).await;

    // The listener does not speak TLS, so the handshake fails after connecting.
    assert!(matches!(result, Err(ClientError::Http { .. })));
    let connected = tokio::time::timeout(Duration::from_secs(5), accepted)
        .await
        .unwrap()
        .unwrap();
    assert!(connected);
}
