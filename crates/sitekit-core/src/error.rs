// ── Core error types ──
//
// User-facing errors from sitekit-core. Consumers never see reqwest
// errors or raw JSON failures; the `From<sitekit_api::Error>` impl is the
// single place where transport failures become this taxonomy.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Transport unreachable, connection reset, or timed out.
    #[error("Cannot reach server: {reason}")]
    Network { reason: String },

    /// The gateway gave up waiting. A network failure for UI purposes.
    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// Non-success HTTP status. `message` is surfaced verbatim when present.
    #[error("Server error (HTTP {status}): {}", message.as_deref().unwrap_or("no message"))]
    Server {
        status: u16,
        message: Option<String>,
    },

    /// Malformed response body. Rendered like `Server`, logged distinctly.
    #[error("Malformed response: {message}")]
    Parse { message: String },

    /// The requested resource does not exist.
    #[error("{resource} not found: {id}")]
    NotFound { resource: String, id: String },

    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    /// Human-readable message for display.
    ///
    /// Server-supplied text wins; otherwise `fallback`
    /// (e.g. "Failed to fetch blogs") is returned.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Server {
                message: Some(message),
                ..
            } => message.clone(),
            Self::NotFound { resource, .. } => format!("{} not found", capitalize(resource)),
            Self::Config { message } => message.clone(),
            _ => fallback.to_owned(),
        }
    }

    /// Returns `true` if the UI should render a "not found" state.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Transport-level failure, including timeouts.
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network { .. } | Self::Timeout { .. })
    }

    /// Short label used in structured logs.
    pub(crate) fn kind(&self) -> &'static str {
        match self {
            Self::Network { .. } => "network",
            Self::Timeout { .. } => "timeout",
            Self::Server { .. } => "server",
            Self::Parse { .. } => "parse",
            Self::NotFound { .. } => "not_found",
            Self::Config { .. } => "config",
        }
    }
}

pub(crate) fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<sitekit_api::Error> for CoreError {
    fn from(err: sitekit_api::Error) -> Self {
        match err {
            sitekit_api::Error::Transport(ref e) => {
                if let Some(status) = e.status() {
                    CoreError::Server {
                        status: status.as_u16(),
                        message: None,
                    }
                } else if e.is_decode() {
                    CoreError::Parse {
                        message: e.to_string(),
                    }
                } else {
                    CoreError::Network {
                        reason: e.to_string(),
                    }
                }
            }
            sitekit_api::Error::Timeout { timeout_secs } => CoreError::Timeout { timeout_secs },
            sitekit_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            sitekit_api::Error::InvalidHeader(msg) => CoreError::Config {
                message: format!("Invalid header value: {msg}"),
            },
            sitekit_api::Error::Tls(msg) => CoreError::Network {
                reason: format!("TLS error: {msg}"),
            },
            sitekit_api::Error::Api { status, message } => CoreError::Server { status, message },
            sitekit_api::Error::Deserialization { message, body: _ } => {
                CoreError::Parse { message }
            }
        }
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        CoreError::Parse {
            message: err.to_string(),
        }
    }
}
