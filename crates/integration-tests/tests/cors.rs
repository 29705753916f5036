mod harness;

use harness::config::ConfigBuilder;
use harness::mock_upstream::{MockReply, MockUpstream};
use harness::server::TestServer;
use voxgate_config::{AllowedOrigins, CorsConfig};

async fn start(cors: CorsConfig) -> (MockUpstream, TestServer) {
    let mock = MockUpstream::start(MockReply::Audio {
        content_type: "audio/mpeg",
        bytes: vec![1, 2, 3, 4],
    })
    .await
    .unwrap();
    let config = ConfigBuilder::new(&mock.completions_url()).with_cors(cors).build();
    let server = TestServer::start(config).await.unwrap();
    (mock, server)
}

#[tokio::test]
async fn cors_allows_configured_origin() {
    let (_mock, server) = start(CorsConfig {
        origins: AllowedOrigins::List(vec!["http://example.com".to_owned()]),
        max_age: None,
    })
    .await;

    let resp = server
        .client()
        .get(server.url("/health"))
        .header("Origin", "http://example.com")
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    assert_eq!(
        resp.headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("http://example.com")
    );
}

#[tokio::test]
async fn cors_wildcard_allows_any_origin() {
    let (_mock, server) = start(CorsConfig {
        origins: AllowedOrigins::Any,
        max_age: None,
    })
    .await;

    let resp = server
        .client()
        .get(server.url("/health"))
        .header("Origin", "http://anywhere.example")
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    assert!(resp.headers().get("access-control-allow-origin").is_some());
}

#[tokio::test]
async fn audio_responses_expose_content_length() {
    let (_mock, server) = start(CorsConfig {
        origins: AllowedOrigins::Any,
        max_age: None,
    })
    .await;

    let resp = server
        .client()
        .post(server.url("/api/generate-voice"))
        .header("Origin", "http://player.example")
        .json(&serde_json::json!({ "text": "Hello" }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    let exposed = resp
        .headers()
        .get("access-control-expose-headers")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_ascii_lowercase();
    assert!(exposed.contains("content-length"), "{exposed}");
}

#[tokio::test]
async fn preflight_allows_json_posts() {
    let (_mock, server) = start(CorsConfig {
        origins: AllowedOrigins::List(vec!["http://example.com".to_owned()]),
        max_age: Some("1h".to_owned()),
    })
    .await;

    let resp = server
        .client()
        .request(reqwest::Method::OPTIONS, server.url("/api/generate-voice"))
        .header("Origin", "http://example.com")
        .header("Access-Control-Request-Method", "POST")
        .header("Access-Control-Request-Headers", "content-type")
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    assert_eq!(
        resp.headers()
            .get("access-control-max-age")
            .and_then(|v| v.to_str().ok()),
        Some("3600")
    );
}
