use super::*;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer, token: Option<&str>) -> SystemInfoClient {
    SystemInfoClient::new(
        format!("{}/api/system_info", server.uri()),
        token.map(str::to_string),
        Duration::from_millis(500),
    )
    .unwrap()
}

#[test]
fn test_parse_success_keeps_order() {
    let body = r#"{"ResponseCode": 0, "ResponseData": {"zeta": 1, "alpha": {"b": 2, "a": 1}}}"#;
    let info = SystemInfo::from_body(body).unwrap();
    let keys: Vec<_> = info.data.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["zeta", "alpha"]);
}

#[test]
fn test_parse_application_error() {
    let body = r#"{"ResponseCode": 1, "ResponseData": {}}"#;
    let err = SystemInfo::from_body(body).unwrap_err();
    assert!(matches!(err, SystemInfoError::Application(1)));
    assert_eq!(err.to_string(), "ResponseCode 1");
}

#[test]
fn test_parse_missing_code_is_malformed() {
    let err = SystemInfo::from_body(r#"{"ResponseData": {}}"#).unwrap_err();
    assert!(matches!(err, SystemInfoError::Malformed(_)));
}

#[test]
fn test_parse_non_object_data_is_malformed() {
    let err = SystemInfo::from_body(r#"{"ResponseCode": 0, "ResponseData": [1, 2]}"#).unwrap_err();
    assert!(matches!(err, SystemInfoError::Malformed(_)));
}

#[test]
fn test_parse_invalid_json_is_malformed() {
    let err = SystemInfo::from_body("<html>oops</html>").unwrap_err();
    assert!(err.to_string().starts_with("malformed response"));
}

#[tokio::test]
async fn test_fetch_sends_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/system_info"))
        .and(header("Authorization", "Bearer api-secret"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"ResponseCode": 0, "ResponseData": {"db": {"status": "up"}}}"#,
        ))
        .expect(1)
        .mount(&server)
        .await;

    let info = client_for(&server, Some("api-secret")).fetch().await.unwrap();
    assert_eq!(info.data["db"]["status"], "up");
}

#[tokio::test]
async fn test_fetch_application_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(r#"{"ResponseCode": 1, "ResponseData": null}"#),
        )
        .mount(&server)
        .await;

    let err = client_for(&server, None).fetch().await.unwrap_err();
    assert!(matches!(err, SystemInfoError::Application(1)));
}

#[tokio::test]
async fn test_fetch_http_error_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = client_for(&server, None).fetch().await.unwrap_err();
    assert!(matches!(err, SystemInfoError::HttpStatus(503)));
    assert_eq!(err.to_string(), "HTTP status 503");
}

#[tokio::test]
async fn test_fetch_timeout_is_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
        .mount(&server)
        .await;

    let err = client_for(&server, None).fetch().await.unwrap_err();
    assert!(matches!(err, SystemInfoError::Transport(_)));
}
