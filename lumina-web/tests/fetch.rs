use lumina_web::{is_fetch_failure, ContentFetcher};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn fetch_returns_visible_text() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/article"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "<html><head><title>t</title></head><body><p>Breaking news   story</p></body></html>",
        ))
        .mount(&server)
        .await;

    let fetcher = ContentFetcher::new().unwrap();
    let text = fetcher.fetch_text(&format!("{}/article", server.uri())).await;

    assert_eq!(text, "t Breaking news story");
    assert!(!is_fetch_failure(&text));
}

#[tokio::test]
async fn bad_status_yields_sentinel_not_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let fetcher = ContentFetcher::new().unwrap();
    let text = fetcher.fetch_text(&format!("{}/gone", server.uri())).await;

    assert_eq!(text, "Failed to fetch content (status code: 404)");
    assert!(is_fetch_failure(&text));
}

#[tokio::test]
async fn transport_error_yields_sentinel() {
    let fetcher = ContentFetcher::new().unwrap();
    // Nothing listens on this port.
    let text = fetcher.fetch_text("http://127.0.0.1:9/unreachable").await;
    assert!(is_fetch_failure(&text));
    assert!(text.starts_with("Error scraping content:"));
}
