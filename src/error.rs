use miette::Diagnostic;
use thiserror::Error;

/// Main error type for the application
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("Environment error: {0}")]
    #[diagnostic(code(schedule_assistant::environment))]
    Environment(String),

    #[error("Configuration error: {0}")]
    #[diagnostic(
        code(schedule_assistant::config),
        help("Check GEMINI_API_KEY, GOOGLE_TOKEN_JSON and GOOGLE_CLIENT_JSON in the secret store")
    )]
    Config(String),

    #[error("Document error: {0}")]
    #[diagnostic(code(schedule_assistant::document))]
    Document(String),

    #[error("Language model error: {0}")]
    #[diagnostic(code(schedule_assistant::language_model))]
    LanguageModel(String),

    #[error("Analysis error: {0}")]
    #[diagnostic(code(schedule_assistant::analysis))]
    Analysis(String),

    #[error("No valid calendar credential: {0}")]
    #[diagnostic(code(schedule_assistant::credential_missing))]
    CredentialMissing(String),

    #[error("Calendar credential refresh failed: {0}")]
    #[diagnostic(code(schedule_assistant::credential_refresh))]
    CredentialRefresh(String),

    #[error("Google Calendar API error: {0}")]
    #[diagnostic(code(schedule_assistant::google_calendar))]
    GoogleCalendar(String),

    #[error(transparent)]
    #[diagnostic(code(schedule_assistant::io))]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    #[diagnostic(code(schedule_assistant::serialization))]
    Serialization(String),

    #[error("Other error: {0}")]
    #[diagnostic(code(schedule_assistant::other))]
    Other(String),
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

impl Error {
    /// Whether the error belongs to the credential family
    pub fn is_credential_error(&self) -> bool {
        matches!(self, Error::CredentialMissing(_) | Error::CredentialRefresh(_))
    }
}

/// Type alias for Result with our Error type
pub type AppResult<T> = Result<T, Error>;

/// Helper to create environment errors
pub fn env_error(var: &str) -> Error {
    Error::Environment(format!("Missing environment variable: {}", var))
}

/// Helper to create configuration errors
pub fn config_error(message: &str) -> Error {
    Error::Config(message.to_string())
}

/// Helper to create document errors
pub fn document_error(message: &str) -> Error {
    Error::Document(message.to_string())
}

/// Helper to create analysis errors
pub fn analysis_error(message: &str) -> Error {
    Error::Analysis(message.to_string())
}

/// Helper to create Google Calendar errors
pub fn google_calendar_error(message: &str) -> Error {
    Error::GoogleCalendar(message.to_string())
}

/// Helper to create other errors
pub fn other_error(message: &str) -> Error {
    Error::Other(message.to_string())
}
