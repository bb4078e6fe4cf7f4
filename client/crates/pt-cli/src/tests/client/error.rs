use crate::ClientError;

use pt_core::CoreError;
use pt_session::SessionError;

#[test]
fn given_api_error_with_message_when_user_message_then_backend_text() {
    let err = ClientError::api_error(401, Some("Invalid credentials".to_string()));
    assert_eq!(err.user_message("Login failed"), "Invalid credentials");
}

#[test]
fn given_api_error_without_message_when_user_message_then_fallback() {
    let err = ClientError::api_error(500, None);
    assert_eq!(err.user_message("Login failed"), "Login failed");
}

#[test]
fn given_validation_error_when_user_message_then_validation_text() {
    let err = ClientError::from(CoreError::validation("Passwords do not match"));
    assert_eq!(err.user_message("Signup failed"), "Passwords do not match");
}

#[test]
fn given_expired_session_when_user_message_then_login_prompt() {
    let expected = "Your session has expired. Please log in again.";
    assert_eq!(ClientError::session_expired().user_message("x"), expected);
    assert_eq!(
        ClientError::from(SessionError::expired()).user_message("x"),
        expected
    );
}

#[test]
fn given_other_failure_when_user_message_then_unexpected() {
    let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    let err = ClientError::from(json_err);
    assert_eq!(err.user_message("Login failed"), "An unexpected error occurred");
    assert_eq!(err.status(), None);
}
