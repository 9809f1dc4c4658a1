use thiserror::Error;

/// Human-readable messages surfaced to the user verbatim.
pub mod messages {
    pub const NETWORK: &str =
        "Unable to connect to the server. Please check your internet connection and try again.";
    pub const API_KEY: &str = "API configuration error. Please try again later or contact support.";
    pub const TIMEOUT: &str = "Request timed out. Please try again.";
    pub const NO_NAMES: &str =
        "No names were generated. Please try a different description or category.";
    pub const UNKNOWN: &str = "An unexpected error occurred. Please try again.";
}

/// Structured error context for better error handling and debugging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorContext {
    /// Field path or configuration key that caused the error (e.g., "generator.endpoint", "settings.customPrompt")
    pub field_path: Option<String>,
    /// Additional context about the error (e.g., expected type, actual value)
    pub details: Option<String>,
    /// Source of the error (e.g., "local_store", "config_loader")
    pub source: Option<String>,
}

impl ErrorContext {
    pub fn new() -> Self {
        Self {
            field_path: None,
            details: None,
            source: None,
        }
    }

    pub fn with_field_path(mut self, path: impl Into<String>) -> Self {
        self.field_path = Some(path.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

impl Default for ErrorContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Coarse classification used by the retry ladder and by callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Configuration,
    Network,
    Timeout,
    Api,
    NoNames,
    Storage,
    Serialization,
    Transport,
    Unknown,
}

/// Unified error type for name generation, caching and local persistence.
#[derive(Debug, Error)]
pub enum Error {
    #[error("{message}{}", format_context(.context))]
    Configuration {
        message: String,
        context: ErrorContext,
    },

    #[error("{}", messages::NETWORK)]
    Network { cause: String },

    #[error("{}", messages::TIMEOUT)]
    Timeout { timeout_ms: u64 },

    #[error("HTTP error! status: {status}, message: {message}")]
    Api { status: u16, message: String },

    /// Non-2xx reply to an `ApiService` request, shown with the server's own message.
    #[error("{message}")]
    Request { status: u16, message: String },

    #[error("{}", messages::NO_NAMES)]
    NoNames,

    #[error("Storage error: {message}{}", format_context(.context))]
    Storage {
        message: String,
        context: ErrorContext,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Network transport error: {0}")]
    Transport(#[from] crate::transport::TransportError),

    #[error("{message}{}", format_context(.context))]
    Unknown {
        message: String,
        context: ErrorContext,
    },
}

// Helper function to format error context for display
fn format_context(ctx: &ErrorContext) -> String {
    let mut parts = Vec::new();
    if let Some(ref field) = ctx.field_path {
        parts.push(format!("field: {}", field));
    }
    if let Some(ref details) = ctx.details {
        parts.push(format!("details: {}", details));
    }
    if let Some(ref source) = ctx.source {
        parts.push(format!("source: {}", source));
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!(" ({})", parts.join(", "))
    }
}

impl Error {
    /// The error raised when no API credential is available.
    pub fn missing_credential() -> Self {
        Error::Configuration {
            message: messages::API_KEY.to_string(),
            context: ErrorContext::new(),
        }
    }

    /// Catch-all raised when the fallback ladder ends without a recorded failure.
    pub fn unknown() -> Self {
        Self::unknown_with_context(messages::UNKNOWN, ErrorContext::new())
    }

    /// Create a new configuration error with structured context
    pub fn configuration_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Configuration {
            message: msg.into(),
            context,
        }
    }

    /// Create a new storage error with structured context
    pub fn storage_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Storage {
            message: msg.into(),
            context,
        }
    }

    /// Create a new unknown error with structured context
    pub fn unknown_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Unknown {
            message: msg.into(),
            context,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Configuration { .. } => ErrorKind::Configuration,
            Error::Network { .. } => ErrorKind::Network,
            Error::Timeout { .. } => ErrorKind::Timeout,
            Error::Api { .. } | Error::Request { .. } => ErrorKind::Api,
            Error::NoNames => ErrorKind::NoNames,
            Error::Storage { .. } | Error::Io(_) => ErrorKind::Storage,
            Error::Serialization(_) => ErrorKind::Serialization,
            Error::Transport(_) => ErrorKind::Transport,
            Error::Unknown { .. } => ErrorKind::Unknown,
        }
    }

    /// Whether another attempt could plausibly succeed.
    ///
    /// Only configuration problems are fatal; everything observed during an attempt is
    /// absorbed by the retry/fallback ladder.
    pub fn is_retryable(&self) -> bool {
        !matches!(self.kind(), ErrorKind::Configuration)
    }

    /// HTTP status carried by the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Api { status, .. } | Error::Request { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Extract error context if available
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            Error::Configuration { context, .. }
            | Error::Storage { context, .. }
            | Error::Unknown { context, .. } => Some(context),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_credential_message_is_user_facing() {
        let err = Error::missing_credential();
        assert_eq!(err.to_string(), messages::API_KEY);
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_api_error_display() {
        let err = Error::Api {
            status: 429,
            message: "Rate limit exceeded".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "HTTP error! status: 429, message: Rate limit exceeded"
        );
        assert_eq!(err.status(), Some(429));
        assert!(err.is_retryable());
    }

    #[test]
    fn test_request_error_shows_server_message_once() {
        let err = Error::Request {
            status: 500,
            message: "API request failed with status 500: Internal Server Error".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "API request failed with status 500: Internal Server Error"
        );
        assert_eq!(err.kind(), ErrorKind::Api);
        assert_eq!(err.status(), Some(500));
    }

    #[test]
    fn test_context_is_formatted() {
        let err = Error::configuration_with_context(
            "Please enter a description",
            ErrorContext::new()
                .with_field_path("settings.customPrompt")
                .with_source("name_studio"),
        );
        assert_eq!(
            err.to_string(),
            "Please enter a description (field: settings.customPrompt, source: name_studio)"
        );
        assert_eq!(
            err.context().and_then(|c| c.field_path.as_deref()),
            Some("settings.customPrompt")
        );
    }

    #[test]
    fn test_retryable_kinds() {
        assert!(Error::NoNames.is_retryable());
        assert!(Error::Timeout { timeout_ms: 10 }.is_retryable());
        assert!(Error::Network {
            cause: "refused".into()
        }
        .is_retryable());
        assert!(Error::unknown().is_retryable());
        assert_eq!(Error::unknown().to_string(), messages::UNKNOWN);
    }
}
