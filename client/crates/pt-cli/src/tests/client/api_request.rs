use crate::{ApiRequest, ApiResponse, ClientError};

use pt_core::OtpResponse;
use reqwest::Method;
use serde_json::{Value, json};

fn response(status: u16, body: &str) -> ApiResponse {
    ApiResponse {
        status,
        body: body.to_string(),
    }
}

#[test]
fn test_request_builders() {
    let request = ApiRequest::get("/ledgers")
        .with_query("startDate", "2025-06-01")
        .with_query("endDate", "2025-06-10");

    assert_eq!(request.method, Method::GET);
    assert_eq!(request.path, "/ledgers");
    assert_eq!(request.query.len(), 2);
    assert!(request.body.is_none());

    let request = ApiRequest::post("/auth/login")
        .with_json(&json!({"email": "a@b.co"}))
        .unwrap();
    assert_eq!(request.method, Method::POST);
    assert_eq!(request.body, Some(json!({"email": "a@b.co"})));
}

#[test]
fn given_error_body_with_message_when_error_for_status_then_message_kept() {
    let err = response(400, r#"{"message":"Beneficiary already exists","status":400}"#)
        .error_for_status()
        .unwrap_err();

    match err {
        ClientError::Api {
            status, message, ..
        } => {
            assert_eq!(status, 400);
            assert_eq!(message.as_deref(), Some("Beneficiary already exists"));
        }
        other => panic!("expected API error, got {other:?}"),
    }
}

#[test]
fn given_non_json_error_body_when_error_for_status_then_no_message() {
    let err = response(502, "<html>Bad Gateway</html>")
        .error_for_status()
        .unwrap_err();

    assert_eq!(err.status(), Some(502));
    assert_eq!(err.user_message("Failed to load"), "Failed to load");
}

#[test]
fn given_success_when_error_for_status_then_passes_through() {
    let ok = response(201, "{}").error_for_status().unwrap();
    assert_eq!(ok.status, 201);
}

#[test]
fn test_json_value_variants() {
    assert_eq!(response(200, "").json_value(), Value::Null);
    assert_eq!(
        response(200, r#"{"message":"ok"}"#).json_value(),
        json!({"message": "ok"})
    );
    assert_eq!(
        response(200, "Password reset OTP sent").json_value(),
        json!("Password reset OTP sent")
    );
}

#[test]
fn given_malformed_json_when_decoding_then_json_error() {
    let result = response(200, "{ nope").json::<OtpResponse>();
    assert!(matches!(result, Err(ClientError::Json { .. })));
}
