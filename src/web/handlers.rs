use super::feedback::Feedback;
use super::templates::{IndexTemplate, Tab};
use super::AppState;
use askama::Template;
use axum::{
    body::Bytes,
    extract::{multipart::MultipartError, Form, Multipart, State},
    http::StatusCode,
    response::Html,
};
use rust_i18n::t;
use serde::Deserialize;
use tracing::{error, info, warn};

/// Text form submission
#[derive(Debug, Deserialize)]
pub struct TextSubmission {
    #[serde(default)]
    pub content: String,
}

fn render(template: IndexTemplate) -> Result<Html<String>, StatusCode> {
    template.render().map(Html).map_err(|e| {
        error!("Failed to render page: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })
}

/// Handler for the index page
pub async fn index_handler(State(state): State<AppState>) -> Result<Html<String>, StatusCode> {
    render(IndexTemplate::new(
        &state.locale,
        Tab::Text,
        "",
        Feedback::default(),
    ))
}

/// Handler for the free-text form
pub async fn submit_text_handler(
    State(state): State<AppState>,
    Form(submission): Form<TextSubmission>,
) -> Result<Html<String>, StatusCode> {
    let feedback = if submission.content.trim().is_empty() {
        Feedback::warning(t!("feedback.empty_content", locale = &*state.locale))
    } else {
        info!(
            "Analyzing text submission ({} characters)",
            submission.content.chars().count()
        );
        let result = state
            .assistant
            .analyze_and_schedule(&submission.content)
            .await;
        if let Err(e) = &result {
            error!("Text submission failed: {}", e);
        }
        Feedback::from_run(&result, &state.locale)
    };

    render(IndexTemplate::new(
        &state.locale,
        Tab::Text,
        &submission.content,
        feedback,
    ))
}

/// Handler for PDF uploads
pub async fn submit_pdf_handler(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Html<String>, StatusCode> {
    let document = match read_document(&mut multipart).await {
        Ok(document) => document,
        Err(e) => {
            warn!("Failed to read PDF upload: {}", e);
            let feedback = Feedback::error(t!("feedback.upload_unreadable", locale = &*state.locale));
            return render(IndexTemplate::new(&state.locale, Tab::Pdf, "", feedback));
        }
    };

    let feedback = match document.filter(|data| !data.is_empty()) {
        Some(data) => {
            info!("Analyzing uploaded PDF ({} bytes)", data.len());
            let result = state.assistant.schedule_document(&data).await;
            if let Err(e) = &result {
                error!("PDF submission failed: {}", e);
            }
            Feedback::from_run(&result, &state.locale)
        }
        None => Feedback::warning(t!("feedback.pdf_missing", locale = &*state.locale)),
    };

    render(IndexTemplate::new(&state.locale, Tab::Pdf, "", feedback))
}

/// Bytes of the `document` field, if the form has one
async fn read_document(multipart: &mut Multipart) -> Result<Option<Bytes>, MultipartError> {
    let mut document = None;
    while let Some(field) = multipart.next_field().await? {
        if field.name() == Some("document") {
            document = Some(field.bytes().await?);
        }
    }
    Ok(document)
}

// Handler for API health check
pub async fn health_handler() -> &'static str {
    "OK"
}
