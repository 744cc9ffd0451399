//! HTTP handlers for the instruct server

use axum::{
    extract::{Form, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::views::Pages;
use instruct::{Exchange, Generator, InstructError, InstructService, TextGenerator};

/// Shared server state, built once in `main`
pub struct AppState<G = Generator> {
    pub service: InstructService<G>,
    pub pages: Pages,
}

/// Submitted form fields; both must be present, either may be empty
#[derive(Debug, Deserialize)]
pub struct SubmitForm {
    instruction: Option<String>,
    prompt_input: Option<String>,
}

/// Request failure; clients only ever see a generic status page
#[derive(Debug)]
pub enum AppError {
    MissingField(&'static str),
    Instruct(InstructError),
    Render(tera::Error),
}

impl From<InstructError> for AppError {
    fn from(e: InstructError) -> Self {
        AppError::Instruct(e)
    }
}

impl From<tera::Error> for AppError {
    fn from(e: tera::Error) -> Self {
        AppError::Render(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::MissingField(field) => {
                tracing::warn!("Missing form field: {}", field);
                StatusCode::BAD_REQUEST
            }
            AppError::Instruct(e) => {
                tracing::error!("Generation failed: {}", e);
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::Render(e) => {
                tracing::error!("Template rendering failed: {}", e);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        let reason = status.canonical_reason().unwrap_or("Error");
        (status, reason).into_response()
    }
}

/// Build the router: one page, GET shows the form, POST generates
pub fn router<G: TextGenerator>(state: Arc<AppState<G>>) -> Router {
    Router::new()
        .route("/", get(index::<G>).post(submit::<G>))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Handler for GET /
pub async fn index<G: TextGenerator>(
    State(state): State<Arc<AppState<G>>>,
) -> Result<Html<String>, AppError> {
    Ok(Html(state.pages.home(&Exchange::empty())?))
}

/// Handler for POST /
pub async fn submit<G: TextGenerator>(
    State(state): State<Arc<AppState<G>>>,
    Form(form): Form<SubmitForm>,
) -> Result<Html<String>, AppError> {
    let request_id = Uuid::new_v4();

    let instruction = form.instruction.ok_or(AppError::MissingField("instruction"))?;
    let prompt_input = form.prompt_input.ok_or(AppError::MissingField("prompt_input"))?;

    tracing::info!(
        "[{}] Generating (instruction: {} chars, input: {} chars)",
        request_id,
        instruction.len(),
        prompt_input.len()
    );

    let exchange = state.service.respond(&instruction, &prompt_input).await?;

    tracing::info!("[{}] Response: {} chars", request_id, exchange.response.len());

    Ok(Html(state.pages.home(&exchange)?))
}
