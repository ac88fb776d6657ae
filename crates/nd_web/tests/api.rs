use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use httpmock::prelude::*;
use serde_json::{json, Value};
use tower::ServiceExt;

use nd_core::{Article, CategoryQuery, Error, GenerationParams, NewsSource, Result, SummarizationModel};
use nd_inference::models::lead::LeadModel;
use nd_inference::{GenerationConfig, Summarizer};
use nd_news::{NewsApiClient, NewsApiConfig};
use nd_web::{create_app, AppState};

#[derive(Default)]
struct StubNews {
    articles: Vec<Article>,
    queries: Mutex<Vec<CategoryQuery>>,
}

#[async_trait::async_trait]
impl NewsSource for StubNews {
    fn name(&self) -> &str {
        "stub"
    }

    async fn fetch_articles(&self, query: &CategoryQuery) -> Vec<Article> {
        self.queries.lock().unwrap().push(query.clone());
        self.articles.clone()
    }
}

#[derive(Debug)]
struct BrokenModel;

#[async_trait::async_trait]
impl SummarizationModel for BrokenModel {
    fn name(&self) -> &str {
        "broken"
    }

    fn model_id(&self) -> &str {
        "broken"
    }

    async fn generate(&self, _text: &str, _params: &GenerationParams) -> Result<String> {
        Err(Error::Inference("CUDA out of memory".to_string()))
    }
}

fn lead_summarizer() -> Arc<Summarizer> {
    Arc::new(Summarizer::new(
        Arc::new(LeadModel::new("facebook/bart-large-cnn")),
        GenerationConfig::default(),
        Duration::from_secs(5),
    ))
}

fn headline(n: usize, content: Option<&str>) -> Article {
    Article {
        title: format!("Headline {}", n),
        source: format!("Source {}", n),
        published_at: format!("2024-05-0{}T08:00:00Z", n % 9 + 1),
        content: content.map(str::to_string),
        url: format!("https://news.example.com/{}", n),
    }
}

async fn app_with(news: Arc<dyn NewsSource>) -> Router {
    create_app(AppState::new(lead_summarizer(), news)).await
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

const ARTICLE: &str = "Officials unveiled a plan to expand the rail network. \
    The project will add three new lines by 2030. \
    Funding comes from a mix of federal and local sources. \
    Construction is scheduled to begin next spring.";

#[tokio::test]
async fn summarize_returns_summary() {
    let app = app_with(Arc::new(StubNews::default())).await;
    let (status, body) = send(app, post_json("/summarize", json!({ "text": ARTICLE }))).await;

    assert_eq!(status, StatusCode::OK);
    let summary = body["summary"].as_str().unwrap();
    assert!(!summary.is_empty());
    assert!(summary.starts_with("Officials unveiled a plan"));
    assert!(!summary.contains("Read more here"));
}

#[tokio::test]
async fn summarize_appends_source_link() {
    let app = app_with(Arc::new(StubNews::default())).await;
    let request = post_json(
        "/summarize",
        json!({ "text": ARTICLE, "url": "https://news.example.com/rail" }),
    );
    let (status, body) = send(app, request).await;

    assert_eq!(status, StatusCode::OK);
    let summary = body["summary"].as_str().unwrap();
    assert!(summary.ends_with("[Read more here](https://news.example.com/rail)"));
}

#[tokio::test]
async fn summarize_honours_length_bounds() {
    let app = app_with(Arc::new(StubNews::default())).await;
    let request = post_json(
        "/summarize",
        json!({ "text": ARTICLE, "max_length": 12, "min_length": 5 }),
    );
    let (status, body) = send(app, request).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["summary"].as_str().unwrap().split_whitespace().count() <= 12);
}

#[tokio::test]
async fn summarize_is_deterministic() {
    let app = app_with(Arc::new(StubNews::default())).await;
    let body = json!({ "text": ARTICLE, "url": "https://news.example.com/rail" });

    let (_, first) = send(app.clone(), post_json("/summarize", body.clone())).await;
    let (_, second) = send(app, post_json("/summarize", body)).await;
    assert_eq!(first, second);
}

#[tokio::test]
async fn summarize_truncates_long_input() {
    let app = app_with(Arc::new(StubNews::default())).await;
    let text = "The quick brown fox jumps over the lazy dog. ".repeat(112);
    assert!(text.len() >= 5000);

    let (status, body) = send(app, post_json("/summarize", json!({ "text": text }))).await;
    assert_eq!(status, StatusCode::OK);

    let summary = body["summary"].as_str().unwrap();
    assert!(!summary.is_empty());
    assert!(summary.split_whitespace().count() <= 250);
    assert!(summary.len() <= 1024);
}

#[tokio::test]
async fn summarize_rejects_blank_text() {
    let app = app_with(Arc::new(StubNews::default())).await;
    let (status, body) = send(app, post_json("/summarize", json!({ "text": "   " }))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("text must not be empty"));
}

#[tokio::test]
async fn summarize_rejects_missing_text() {
    let app = app_with(Arc::new(StubNews::default())).await;
    let (status, _) = send(app, post_json("/summarize", json!({ "url": "https://x.test" }))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn summarize_surfaces_inference_failure() {
    let summarizer = Arc::new(Summarizer::new(
        Arc::new(BrokenModel),
        GenerationConfig::default(),
        Duration::from_secs(5),
    ));
    let app = create_app(AppState::new(summarizer, Arc::new(StubNews::default()))).await;
    let (status, body) = send(app, post_json("/summarize", json!({ "text": ARTICLE }))).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().contains("CUDA out of memory"));
}

#[tokio::test]
async fn news_summarizes_at_most_five_articles_with_content() {
    let articles = vec![
        headline(1, Some(ARTICLE)),
        headline(2, None),
        headline(3, Some(ARTICLE)),
        headline(4, Some("")),
        headline(5, Some(ARTICLE)),
        headline(6, Some(ARTICLE)),
        headline(7, Some(ARTICLE)),
        headline(8, Some(ARTICLE)),
    ];
    let news = Arc::new(StubNews {
        articles,
        ..Default::default()
    });
    let app = app_with(news.clone()).await;

    let (status, body) = send(app, get("/news/technology")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["category"], "technology");

    let summaries = body["summaries"].as_array().unwrap();
    assert_eq!(summaries.len(), 5);
    let titles: Vec<_> = summaries.iter().map(|s| s["title"].as_str().unwrap()).collect();
    assert_eq!(
        titles,
        vec!["Headline 1", "Headline 3", "Headline 5", "Headline 6", "Headline 7"]
    );

    let first = &summaries[0];
    assert_eq!(first["source"], "Source 1");
    assert_eq!(first["publishedAt"], "2024-05-02T08:00:00Z");
    assert_eq!(first["url"], "https://news.example.com/1");
    assert!(first["summary"]
        .as_str()
        .unwrap()
        .ends_with("[Read more here](https://news.example.com/1)"));

    let queries = news.queries.lock().unwrap();
    assert_eq!(queries.len(), 1);
    assert_eq!(queries[0], CategoryQuery::new("technology"));
}

#[tokio::test]
async fn news_query_overrides_country_and_language() {
    let news = Arc::new(StubNews::default());
    let app = app_with(news.clone()).await;

    let (status, body) = send(app, get("/news/science?country=&language=en")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "category": "science", "summaries": [] }));

    let queries = news.queries.lock().unwrap();
    assert_eq!(queries[0].country, None);
    assert_eq!(queries[0].language.as_deref(), Some("en"));
}

#[tokio::test]
async fn news_upstream_failure_yields_empty_summaries() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/top-headlines")
                .query_param("category", "technology");
            then.status(500).body("internal error");
        })
        .await;

    let client = NewsApiClient::new(NewsApiConfig::new("test-key").with_base_url(server.base_url())).unwrap();
    let app = app_with(Arc::new(client)).await;

    let (status, body) = send(app, get("/news/technology")).await;
    mock.assert_async().await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "category": "technology", "summaries": [] }));
}

#[tokio::test]
async fn news_end_to_end_with_upstream_payload() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/top-headlines");
            then.status(200).json_body(json!({
                "status": "ok",
                "articles": [
                    {
                        "source": { "name": "Daily" },
                        "title": "Rail expansion",
                        "url": "https://daily.example.com/rail",
                        "publishedAt": "2024-05-01T10:00:00Z",
                        "content": ARTICLE
                    },
                    {
                        "source": { "name": "Daily" },
                        "title": "Paywalled",
                        "url": "https://daily.example.com/paywall",
                        "publishedAt": "2024-05-01T11:00:00Z",
                        "content": null
                    }
                ]
            }));
        })
        .await;

    let client = NewsApiClient::new(NewsApiConfig::new("test-key").with_base_url(server.base_url())).unwrap();
    let app = app_with(Arc::new(client)).await;

    let (status, body) = send(app, get("/news/technology")).await;
    assert_eq!(status, StatusCode::OK);
    let summaries = body["summaries"].as_array().unwrap();
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0]["title"], "Rail expansion");
    assert_eq!(summaries[0]["source"], "Daily");
}

#[tokio::test]
async fn news_fails_when_every_article_fails() {
    let summarizer = Arc::new(Summarizer::new(
        Arc::new(BrokenModel),
        GenerationConfig::default(),
        Duration::from_secs(5),
    ));
    let news = Arc::new(StubNews {
        articles: vec![headline(1, Some(ARTICLE))],
        ..Default::default()
    });
    let app = create_app(AppState::new(summarizer, news)).await;

    let (status, _) = send(app, get("/news/business")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn health_reports_model() {
    let app = app_with(Arc::new(StubNews::default())).await;
    let (status, body) = send(app, get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["model"], "facebook/bart-large-cnn");
    assert_eq!(body["backend"], "lead");
    assert_eq!(body["news"], "stub");
}
