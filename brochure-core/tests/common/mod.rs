#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use brochure_common::{BrochureError, Result};
use brochure_llm::traits::{ChatClient, ChatRequest, ChatResponse};
use brochure_web::PageFetcher;
use url::Url;

/// Replies from a fixed script and remembers every request.
pub struct ScriptedChat {
    replies: Mutex<VecDeque<Result<String>>>,
    seen: Mutex<Vec<ChatRequest>>,
}

impl ScriptedChat {
    pub fn new(replies: Vec<Result<String>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn replying(replies: &[&str]) -> Self {
        Self::new(replies.iter().map(|r| Ok(r.to_string())).collect())
    }

    pub fn requests(&self) -> Vec<ChatRequest> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatClient for ScriptedChat {
    async fn complete_chat(&self, request: &ChatRequest) -> Result<ChatResponse> {
        self.seen.lock().unwrap().push(request.clone());
        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(BrochureError::Provider("script exhausted".into())))?;
        Ok(ChatResponse {
            content: reply,
            model: Some("scripted".into()),
            tokens_used: None,
        })
    }

    fn model_name(&self) -> &str {
        "scripted"
    }
}

/// Serves canned HTML by exact URL; unknown URLs fail like a 404.
#[derive(Default)]
pub struct MapFetcher {
    pages: HashMap<String, String>,
    calls: Mutex<Vec<String>>,
}

impl MapFetcher {
    pub fn with_page(mut self, url: &str, html: impl Into<String>) -> Self {
        let key = Url::parse(url).unwrap().to_string();
        self.pages.insert(key, html.into());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PageFetcher for MapFetcher {
    async fn fetch(&self, url: &Url) -> Result<String> {
        self.calls.lock().unwrap().push(url.to_string());
        self.pages
            .get(url.as_str())
            .cloned()
            .ok_or_else(|| BrochureError::Network(format!("{url}: server returned error 404")))
    }
}

pub fn anchors(paths: &[&str]) -> String {
    let body: String = paths
        .iter()
        .map(|p| format!(r#"<a href="{p}">{p}</a>"#))
        .collect();
    format!("<html><body><h1>Acme</h1>{body}</body></html>")
}

pub fn selection(urls: &[&str]) -> String {
    let links: Vec<serde_json::Value> = urls
        .iter()
        .map(|u| serde_json::json!({"type": "other", "url": u}))
        .collect();
    serde_json::json!({ "links": links }).to_string()
}
