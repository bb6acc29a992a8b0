//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use sitekit_config::ConfigError;
use sitekit_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach the backend: {reason}")]
    #[diagnostic(
        code(sitekit::connection_failed),
        help(
            "Check that the API is running and the base URL is right.\n\
             Self-signed certificate? Try --insecure (-k)."
        )
    )]
    ConnectionFailed { reason: String },

    #[error("Request timed out after {timeout_secs}s")]
    #[diagnostic(
        code(sitekit::timeout),
        help("Raise the limit with --timeout or the profile's `timeout` key.")
    )]
    Timeout { timeout_secs: u64 },

    // ── Server ───────────────────────────────────────────────────────
    #[error("Not authorized: {message}")]
    #[diagnostic(
        code(sitekit::auth_failed),
        help(
            "Admin operations need a bearer token.\n\
             Pass --token, set SITEKIT_TOKEN, or set api_token_env in your profile."
        )
    )]
    AuthFailed { message: String },

    #[error("{message}")]
    #[diagnostic(code(sitekit::not_found))]
    NotFound { message: String },

    #[error("{message}")]
    #[diagnostic(code(sitekit::api_error))]
    Api { message: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("No configuration found")]
    #[diagnostic(
        code(sitekit::no_config),
        help(
            "Run: sitekit config init --base-url <URL>\n\
             Or pass --url / set SITEKIT_URL.\n\
             Config path: {path}"
        )
    )]
    NoConfig { path: String },

    #[error("Profile '{name}' not found")]
    #[diagnostic(
        code(sitekit::profile_not_found),
        help("Available profiles: {available}")
    )]
    ProfileNotFound { name: String, available: String },

    #[error(transparent)]
    #[diagnostic(code(sitekit::config))]
    Config(#[from] ConfigError),

    // ── Input ────────────────────────────────────────────────────────
    #[error("Invalid {field}: {reason}")]
    #[diagnostic(code(sitekit::validation))]
    Validation { field: String, reason: String },

    #[error("Refusing to {action} without confirmation")]
    #[diagnostic(
        code(sitekit::confirmation_required),
        help("stdin is not a terminal. Pass --yes (-y) to skip the prompt.")
    )]
    NonInteractiveRequiresYes { action: String },

    #[error("Output failed: {0}")]
    #[diagnostic(code(sitekit::output))]
    Output(String),

    #[error(transparent)]
    #[diagnostic(code(sitekit::io))]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::AuthFailed { .. } => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Validation { .. } | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            Self::Api { .. }
            | Self::NoConfig { .. }
            | Self::ProfileNotFound { .. }
            | Self::Config(_)
            | Self::Output(_)
            | Self::Io(_) => exit_code::GENERAL,
        }
    }

    /// Wrap a core failure, using `fallback` when the server sent no message.
    pub fn from_core(err: CoreError, fallback: &str) -> Self {
        match err {
            CoreError::Network { reason } => Self::ConnectionFailed { reason },
            CoreError::Timeout { timeout_secs } => Self::Timeout { timeout_secs },
            CoreError::NotFound { .. } | CoreError::Server { status: 404, .. } => {
                Self::NotFound {
                    message: err.user_message(fallback),
                }
            }
            CoreError::Server {
                status: status @ (401 | 403),
                ..
            } => Self::AuthFailed {
                message: err.user_message(&format!("HTTP {status}")),
            },
            CoreError::Server { .. } | CoreError::Parse { .. } => Self::Api {
                message: err.user_message(fallback),
            },
            CoreError::Config { message } => Self::Validation {
                field: "configuration".into(),
                reason: message,
            },
        }
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        let fallback = err.to_string();
        Self::from_core(err, &fallback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn core_errors_map_to_exit_codes() {
        let cases = [
            (
                CoreError::Network {
                    reason: "refused".into(),
                },
                exit_code::CONNECTION,
            ),
            (CoreError::Timeout { timeout_secs: 5 }, exit_code::TIMEOUT),
            (
                CoreError::NotFound {
                    resource: "blog".into(),
                    id: "x".into(),
                },
                exit_code::NOT_FOUND,
            ),
            (
                CoreError::Server {
                    status: 401,
                    message: None,
                },
                exit_code::AUTH,
            ),
            (
                CoreError::Server {
                    status: 500,
                    message: None,
                },
                exit_code::GENERAL,
            ),
        ];
        for (core, code) in cases {
            assert_eq!(CliError::from(core).exit_code(), code);
        }
    }

    #[test]
    fn server_message_wins_over_fallback() {
        let err = CliError::from_core(
            CoreError::Server {
                status: 422,
                message: Some("Slug already taken".into()),
            },
            "Failed to create blog",
        );
        assert_eq!(err.to_string(), "Slug already taken");

        let err = CliError::from_core(
            CoreError::Parse {
                message: "eof".into(),
            },
            "Failed to fetch blogs",
        );
        assert_eq!(err.to_string(), "Failed to fetch blogs");
    }
}
