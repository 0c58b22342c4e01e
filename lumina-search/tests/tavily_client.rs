use lumina_search::{SearchProvider, TavilyClient};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn search_sends_basic_depth_and_parses_results() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/search"))
        .and(header("authorization", "Bearer tvly-test"))
        .and(body_partial_json(json!({
            "query": "media bias rating for example news allsides mediabiasfactcheck",
            "search_depth": "basic",
            "max_results": 5
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [
                {
                    "title": "AllSides rating",
                    "url": "https://allsides.com/example",
                    "content": "Rated center."
                }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = TavilyClient::with_base("tvly-test".to_string(), &format!("{}/", server.uri()))
        .unwrap();
    let results = client
        .search(
            "media bias rating for example news allsides mediabiasfactcheck",
            5,
        )
        .await
        .unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].title, "AllSides rating");
    assert_eq!(results[0].url, "https://allsides.com/example");
}

#[tokio::test]
async fn http_error_surfaces_as_provider_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"detail": "Invalid API key"})),
        )
        .mount(&server)
        .await;

    let client =
        TavilyClient::with_base("bad-key".to_string(), &format!("{}/", server.uri())).unwrap();
    let err = client.search("anything", 5).await.unwrap_err();
    assert!(err.to_string().contains("Invalid API key"));
}
