use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
};
use brochure_app::server::{AppState, router};
use brochure_common::{BrochureError, Result};
use brochure_config::Settings;
use brochure_llm::traits::{ChatClient, ChatRequest, ChatResponse};
use brochure_web::PageFetcher;
use serde_json::{Value, json};
use tower::util::ServiceExt;
use url::Url;

struct CannedSite {
    pages: HashMap<String, String>,
    calls: Mutex<Vec<String>>,
}

#[async_trait]
impl PageFetcher for CannedSite {
    async fn fetch(&self, url: &Url) -> Result<String> {
        self.calls.lock().unwrap().push(url.to_string());
        self.pages
            .get(url.as_str())
            .cloned()
            .ok_or_else(|| BrochureError::Network(format!("{url}: server returned error 404")))
    }
}

struct CannedChat(Mutex<VecDeque<String>>);

#[async_trait]
impl ChatClient for CannedChat {
    async fn complete_chat(&self, _request: &ChatRequest) -> Result<ChatResponse> {
        let content = self
            .0
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| BrochureError::Provider("no more replies".into()))?;
        Ok(ChatResponse {
            content,
            model: None,
            tokens_used: None,
        })
    }

    fn model_name(&self) -> &str {
        "canned"
    }
}

fn acme_site() -> Arc<CannedSite> {
    let pages = HashMap::from([
        (
            "https://acme.test/".to_string(),
            r#"<body><h1>Acme</h1><a href="/about">About</a><a href="/privacy">Privacy</a></body>"#
                .to_string(),
        ),
        (
            "https://acme.test/about".to_string(),
            "<body><p>Founded in 1999.</p></body>".to_string(),
        ),
    ]);
    Arc::new(CannedSite {
        pages,
        calls: Mutex::new(Vec::new()),
    })
}

fn app_with(fetcher: Arc<CannedSite>, llm: Option<Arc<dyn ChatClient>>) -> Router {
    router(AppState {
        settings: Arc::new(Settings::default()),
        fetcher,
        llm,
    })
}

fn happy_chat() -> Arc<dyn ChatClient> {
    Arc::new(CannedChat(Mutex::new(VecDeque::from([
        r#"{"links": [{"type": "about", "url": "https://acme.test/about"}]}"#.to_string(),
        "# Acme\n\n**Since 1999.**\n".to_string(),
    ]))))
}

fn json_post(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn form_post(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_string(response: axum::response::Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn healthz_reports_ok() {
    let app = app_with(acme_site(), None);
    let response = app
        .oneshot(Request::get("/healthz").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(body, json!({"status": "ok"}));
}

#[tokio::test]
async fn index_serves_the_form() {
    let app = app_with(acme_site(), None);
    let response = app
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_string(response).await.contains("action=\"/generate\""));
}

#[tokio::test]
async fn api_returns_markdown_html_and_sources() {
    let site = acme_site();
    let app = app_with(site.clone(), Some(happy_chat()));
    let response = app
        .oneshot(json_post(
            "/api/brochure",
            json!({"company_name": "Acme", "website_url": "https://acme.test"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(body["brochure_markdown"], "# Acme\n\n**Since 1999.**");
    assert!(body["brochure_html"].as_str().unwrap().contains("<strong>Since 1999.</strong>"));
    assert_eq!(
        body["sources"],
        json!(["https://acme.test", "https://acme.test/about"])
    );
    assert_eq!(site.calls.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn api_rejects_short_urls_with_422() {
    let app = app_with(acme_site(), Some(happy_chat()));
    let response = app
        .oneshot(json_post(
            "/api/brochure",
            json!({"company_name": "Acme", "website_url": "a.io"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert!(body["detail"].as_str().unwrap().contains("website_url"));
}

#[tokio::test]
async fn api_rejects_missing_fields_with_422() {
    let app = app_with(acme_site(), Some(happy_chat()));
    let response = app
        .oneshot(json_post("/api/brochure", json!({"website_url": "https://acme.test"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert!(body["detail"].as_str().unwrap().contains("company_name"));
}

#[tokio::test]
async fn api_reports_pipeline_failures_as_500_with_the_error_text() {
    let site = acme_site();
    let app = app_with(site.clone(), Some(happy_chat()));
    let response = app
        .oneshot(json_post(
            "/api/brochure",
            json!({"company_name": "Acme", "website_url": "ftp://acme.test"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(
        body["detail"],
        "Validation error: Only http(s) URLs are supported."
    );
    assert!(site.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn missing_api_key_fails_the_request_not_the_server() {
    let site = acme_site();
    let app = app_with(site.clone(), None);
    let response = app
        .oneshot(json_post(
            "/api/brochure",
            json!({"company_name": "Acme", "website_url": "https://acme.test"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert!(body["detail"].as_str().unwrap().contains("OPENAI_API_KEY"));
    assert!(site.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn form_renders_the_result_page() {
    let app = app_with(acme_site(), Some(happy_chat()));
    let response = app
        .oneshot(form_post(
            "/generate",
            "company_name=Acme&website_url=https%3A%2F%2Facme.test&tone=friendly",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_string(response).await;
    assert!(html.contains("<strong>Since 1999.</strong>"));
    assert!(html.contains("<h2>Sources</h2>"));
    assert_eq!(html.matches("<li>").count(), 2);
}

#[tokio::test]
async fn form_failures_render_an_error_page_with_500() {
    let app = app_with(acme_site(), Some(happy_chat()));
    let response = app
        .oneshot(form_post(
            "/generate",
            "company_name=Acme&website_url=https%3A%2F%2Fmissing.test",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let html = body_string(response).await;
    assert!(html.contains("class=\"error\""));
    assert!(html.contains("Network"));
}

#[tokio::test]
async fn form_missing_company_name_renders_an_html_error_page() {
    let site = acme_site();
    let app = app_with(site.clone(), Some(happy_chat()));
    let response = app
        .oneshot(form_post("/generate", "website_url=https%3A%2F%2Facme.test"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap().to_string();
    assert!(content_type.starts_with("text/html"), "{content_type}");
    let html = body_string(response).await;
    assert!(html.contains("class=\"error\""));
    assert!(html.contains("company_name"));
    assert!(site.calls.lock().unwrap().is_empty());
}
