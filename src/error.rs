use thiserror::Error;

/// Errors that can occur while generating or exporting recipes
#[derive(Error, Debug)]
pub enum RecipeError {
    /// Transport failure, non-2xx status or an explicit API error payload
    #[error("{message}")]
    Upstream {
        message: String,
        status: Option<u16>,
    },

    /// The endpoint answered successfully but returned no text
    #[error("Empty response from the completion endpoint")]
    EmptyResponse,

    /// Text was returned but no JSON object could be recovered from it
    #[error("Could not parse response. Please try again.")]
    MalformedResponse { detail: String },

    /// The caller aborted the in-flight request
    #[error("Request was cancelled")]
    Cancelled,

    /// Document generation backend failure
    #[error("Failed to render document: {0}")]
    Render(String),

    /// Caller-supplied input violated a precondition
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// No API key in configuration or environment
    #[error("GROQ_API_KEY not found in config or environment")]
    MissingApiKey,

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

impl RecipeError {
    pub(crate) fn upstream(message: impl Into<String>, status: Option<u16>) -> Self {
        RecipeError::Upstream {
            message: message.into(),
            status,
        }
    }

    /// Only malformed replies are worth re-prompting; the model is non-deterministic
    /// so a second attempt may produce parseable output.
    pub fn is_retryable_parse_failure(&self) -> bool {
        matches!(self, RecipeError::MalformedResponse { .. })
    }

    /// HTTP status attached to an upstream failure, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            RecipeError::Upstream { status, .. } => *status,
            _ => None,
        }
    }
}

impl From<reqwest::Error> for RecipeError {
    fn from(err: reqwest::Error) -> Self {
        let status = err.status().map(|s| s.as_u16());
        let message = if err.is_timeout() {
            "Request to the completion endpoint timed out".to_string()
        } else {
            err.to_string()
        };
        RecipeError::Upstream { message, status }
    }
}

impl From<std::io::Error> for RecipeError {
    fn from(err: std::io::Error) -> Self {
        RecipeError::Render(err.to_string())
    }
}
