//! Browser front end: one page with a text tab and a PDF tab.

pub mod feedback;
mod handlers;
pub mod templates;

use crate::components::SchedulingAssistant;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub use handlers::{
    health_handler, index_handler, submit_pdf_handler, submit_text_handler, TextSubmission,
};

#[derive(Clone)]
pub struct AppState {
    /// Pipeline run for each submission
    pub assistant: Arc<SchedulingAssistant>,
    /// UI locale
    pub locale: Arc<str>,
}

impl AppState {
    pub fn new(assistant: Arc<SchedulingAssistant>, locale: &str) -> Self {
        Self {
            assistant,
            locale: Arc::from(locale),
        }
    }
}

/// Build the router
pub fn router(state: AppState, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/schedule/text", post(submit_text_handler))
        .route("/schedule/pdf", post(submit_pdf_handler))
        .route("/health", get(health_handler))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
