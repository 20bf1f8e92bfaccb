use super::feedback::{Feedback, FeedbackMessage};
use askama::Template;
use rust_i18n::t;

/// Localized labels of the page
pub struct PageLabels {
    pub title: String,
    pub heading: String,
    pub tab_text: String,
    pub tab_pdf: String,
    pub voice_hint: String,
    pub text_label: String,
    pub text_placeholder: String,
    pub text_submit: String,
    pub pdf_label: String,
    pub pdf_submit: String,
    pub working: String,
}

impl PageLabels {
    pub fn new(locale: &str) -> Self {
        Self {
            title: t!("page.title", locale = locale).into(),
            heading: t!("page.heading", locale = locale).into(),
            tab_text: t!("page.tab_text", locale = locale).into(),
            tab_pdf: t!("page.tab_pdf", locale = locale).into(),
            voice_hint: t!("page.voice_hint", locale = locale).into(),
            text_label: t!("page.text_label", locale = locale).into(),
            text_placeholder: t!("page.text_placeholder", locale = locale).into(),
            text_submit: t!("page.text_submit", locale = locale).into(),
            pdf_label: t!("page.pdf_label", locale = locale).into(),
            pdf_submit: t!("page.pdf_submit", locale = locale).into(),
            working: t!("page.working", locale = locale).into(),
        }
    }
}

/// Which input tab is open
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Text,
    Pdf,
}

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub lang: String,
    pub labels: PageLabels,
    pub pdf_tab: bool,
    pub content: String,
    pub messages: Vec<FeedbackMessage>,
    pub celebrate: bool,
}

impl IndexTemplate {
    pub fn new(locale: &str, tab: Tab, content: &str, feedback: Feedback) -> Self {
        Self {
            lang: locale.to_string(),
            labels: PageLabels::new(locale),
            pdf_tab: tab == Tab::Pdf,
            content: content.to_string(),
            messages: feedback.messages,
            celebrate: feedback.celebrate,
        }
    }
}
