use super::*;

#[test]
fn missing_source_message_is_exact() {
    assert_eq!(LoadError::MissingSource.to_string(), "Missing required source attribute");
}

#[test]
fn http_status_formats_code_and_reason() {
    let err = LoadError::http_status(404, Some("Not Found"));
    assert_eq!(err.to_string(), "HTTP 404: Not Found");
}

#[test]
fn http_status_without_reason_falls_back_to_error() {
    assert_eq!(LoadError::http_status(599, None).to_string(), "HTTP 599: Error");
    assert_eq!(LoadError::http_status(520, Some("  ")).to_string(), "HTTP 520: Error");
}

#[test]
fn transport_message_carries_detail() {
    let err = LoadError::Transport("network down".into());
    assert_eq!(err.to_string(), "Failed to load content: network down");
}

#[test]
fn kinds_classify_every_variant() {
    assert_eq!(LoadError::MissingSource.kind(), ErrorKind::Configuration);
    assert_eq!(LoadError::CrossOrigin("http://x.test/".into()).kind(), ErrorKind::Configuration);
    assert_eq!(LoadError::http_status(500, None).kind(), ErrorKind::HttpStatus);
    assert_eq!(LoadError::Transport("x".into()).kind(), ErrorKind::Transport);
    assert_eq!(LoadError::Cancelled.kind(), ErrorKind::Cancelled);
}

#[test]
fn only_cancelled_is_invisible() {
    assert!(!LoadError::Cancelled.is_user_visible());
    assert!(LoadError::MissingSource.is_user_visible());
    assert!(LoadError::Transport("x".into()).is_user_visible());
}

#[test]
fn error_codes_are_stable() {
    assert_eq!(LoadError::MissingSource.error_code(), "E_MISSING_SOURCE");
    assert_eq!(LoadError::CrossOrigin(String::new()).error_code(), "E_CROSS_ORIGIN");
    assert_eq!(LoadError::http_status(404, None).error_code(), "E_HTTP_STATUS");
    assert_eq!(LoadError::Transport(String::new()).error_code(), "E_TRANSPORT");
    assert_eq!(LoadError::Cancelled.error_code(), "E_CANCELLED");
}

#[test]
fn setup_errors_describe_cause() {
    let err = SetupError::InvalidBaseUrl("ftp://nope".into());
    assert_eq!(err.to_string(), "invalid base URL: ftp://nope");
}
