use std::sync::Arc;

use axum::{
    Form, Json, Router,
    extract::{
        State,
        rejection::{FormRejection, JsonRejection},
    },
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use brochure_common::{BrochureError, Result};
use brochure_config::Settings;
use brochure_core::{BrochureGenerator, BrochureRequest, BrochureResult, PipelineLimits};
use brochure_llm::traits::ChatClient;
use brochure_web::{HttpPageFetcher, PageFetcher};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::pages;
use crate::render::markdown_to_html;

/// Read-only state shared by every request.
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub fetcher: Arc<dyn PageFetcher>,
    /// `None` until an API key is configured; requests then fail with a
    /// configuration error.
    pub llm: Option<Arc<dyn ChatClient>>,
}

impl AppState {
    pub fn from_settings(settings: Settings) -> Result<Self> {
        let fetcher: Arc<dyn PageFetcher> =
            Arc::new(HttpPageFetcher::new(settings.fetch_timeout())?);
        let llm = if settings.require_api_key().is_ok() {
            Some(brochure_llm::client_from_settings(&settings)?)
        } else {
            tracing::warn!("OPENAI_API_KEY is not set; generation requests will fail until it is");
            None
        };
        Ok(Self {
            settings: Arc::new(settings),
            fetcher,
            llm,
        })
    }

    fn generator(&self) -> Result<BrochureGenerator> {
        let llm = match &self.llm {
            Some(llm) => llm.clone(),
            None => brochure_llm::client_from_settings(&self.settings)?,
        };
        Ok(BrochureGenerator::new(
            self.fetcher.clone(),
            llm,
            PipelineLimits::from_settings(&self.settings),
        ))
    }

    pub async fn generate(&self, request: &BrochureRequest) -> Result<BrochureResult> {
        let result = self.generator()?.generate(request).await;
        if let Err(err) = &result {
            tracing::error!(
                kind = err.kind(),
                error = %err,
                website = %request.website_url,
                "brochure.failed"
            );
        }
        result
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrochureResponse {
    pub brochure_markdown: String,
    pub brochure_html: String,
    pub sources: Vec<String>,
}

impl From<BrochureResult> for BrochureResponse {
    fn from(result: BrochureResult) -> Self {
        Self {
            brochure_html: markdown_to_html(&result.brochure_markdown),
            brochure_markdown: result.brochure_markdown,
            sources: result.sources,
        }
    }
}

/// JSON error body: `{"detail": "..."}`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    detail: String,
}

impl ApiError {
    fn unprocessable(err: BrochureError) -> Self {
        Self {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            detail: err.to_string(),
        }
    }

    fn internal(err: BrochureError) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            detail: err.to_string(),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self {
            status: rejection.status(),
            detail: rejection.body_text(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "detail": self.detail }))).into_response()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/", get(index))
        .route("/generate", post(generate_form))
        .route("/api/brochure", post(api_brochure))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind, serve until Ctrl-C, then drain in-flight requests.
pub async fn serve(state: AppState, bind_addr: &str) -> anyhow::Result<()> {
    let listener = TcpListener::bind(bind_addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "server.listening");
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("server.stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %err, "failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
    tracing::info!("server.shutdown");
}

async fn healthz() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn index() -> Html<String> {
    Html(pages::index_page())
}

async fn generate_form(
    State(state): State<AppState>,
    form: std::result::Result<Form<BrochureRequest>, FormRejection>,
) -> (StatusCode, Html<String>) {
    let request = match form {
        Ok(Form(request)) => request,
        Err(rejection) => {
            return (
                rejection.status(),
                Html(pages::error_page(&rejection.body_text())),
            );
        }
    };
    if let Err(err) = request.validate() {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Html(pages::error_page(&err.to_string())),
        );
    }
    match state.generate(&request).await {
        Ok(result) => {
            let html = markdown_to_html(&result.brochure_markdown);
            (
                StatusCode::OK,
                Html(pages::result_page(&request, &result, &html)),
            )
        }
        Err(err) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Html(pages::error_page(&err.to_string())),
        ),
    }
}

async fn api_brochure(
    State(state): State<AppState>,
    payload: std::result::Result<Json<BrochureRequest>, JsonRejection>,
) -> std::result::Result<Json<BrochureResponse>, ApiError> {
    let Json(request) = payload?;
    request.validate().map_err(ApiError::unprocessable)?;
    let result = state
        .generate(&request)
        .await
        .map_err(ApiError::internal)?;
    Ok(Json(result.into()))
}
