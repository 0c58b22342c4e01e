use lumina_http::{Auth, HttpClient, HttpError, RequestOpts};
use serde_json::{json, Value};
use std::borrow::Cow;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn get_json_joins_path_against_base() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/items"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpClient::new(&format!("{}/", server.uri())).unwrap();
    let got: Value = client
        .get_json("v1/items", RequestOpts::default())
        .await
        .unwrap();
    assert_eq!(got["ok"], true);
}

#[tokio::test]
async fn query_auth_lands_in_query_string() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/files"))
        .and(query_param("key", "secret-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpClient::new(&format!("{}/", server.uri())).unwrap();
    let opts = RequestOpts {
        auth: Some(Auth::Query {
            name: "key",
            value: Cow::Borrowed("secret-key"),
        }),
        ..Default::default()
    };
    let _: Value = client.get_json("v1/files", opts).await.unwrap();
}

#[tokio::test]
async fn bearer_auth_sets_authorization_header() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat"))
        .and(header("authorization", "Bearer tok-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpClient::new(&format!("{}/", server.uri())).unwrap();
    let opts = RequestOpts {
        auth: Some(Auth::Bearer("tok-123")),
        ..Default::default()
    };
    let _: Value = client
        .post_json("v1/chat", &json!({"q": 1}), opts)
        .await
        .unwrap();
}

#[tokio::test]
async fn api_errors_carry_status_and_extracted_message() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/limited"))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "error": {"message": "slow down"}
        })))
        .mount(&server)
        .await;

    let client = HttpClient::new(&format!("{}/", server.uri())).unwrap();
    let err = client
        .get_json::<Value>("v1/limited", RequestOpts::default())
        .await
        .unwrap_err();

    match err {
        HttpError::Api { status, message } => {
            assert_eq!(status.as_u16(), 429);
            assert_eq!(message, "slow down");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn non_json_body_is_a_decode_error_with_snippet() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/html"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>nope</html>"))
        .mount(&server)
        .await;

    let client = HttpClient::new(&format!("{}/", server.uri())).unwrap();
    let err = client
        .get_json::<Value>("v1/html", RequestOpts::default())
        .await
        .unwrap_err();

    match err {
        HttpError::Decode(_, snippet) => assert!(snippet.contains("nope")),
        other => panic!("expected Decode error, got {other:?}"),
    }
}
