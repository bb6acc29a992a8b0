// ── Runtime client configuration ──
//
// Describes how to reach the site backend. Carries credentials and
// tuning, never touches disk: the CLI builds a `ClientConfig` from its
// profile file and hands it in.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use url::Url;

use sitekit_api::{TlsMode, TransportConfig};

use crate::list_view::DEFAULT_SEARCH_DEBOUNCE;

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store.
    #[default]
    SystemDefaults,
    /// Custom CA certificate file (PEM).
    CustomCa(PathBuf),
    /// Skip verification (self-signed development servers).
    DangerAcceptInvalid,
}

impl From<&TlsVerification> for TlsMode {
    fn from(tls: &TlsVerification) -> Self {
        match tls {
            TlsVerification::SystemDefaults => TlsMode::System,
            TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
            TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
        }
    }
}

/// Configuration for one backend.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API base, e.g. `https://example.com/api`.
    pub base_url: Url,
    /// Bearer token for admin operations.
    pub api_token: Option<SecretString>,
    pub tls: TlsVerification,
    pub timeout: Duration,
    /// Trailing-edge delay applied to search input.
    pub search_debounce: Duration,
    /// Overrides each collection's admin table page size.
    pub admin_page_size: Option<u32>,
    /// Overrides each collection's public feed page size.
    pub feed_page_size: Option<u32>,
}

impl ClientConfig {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            api_token: None,
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
            search_debounce: DEFAULT_SEARCH_DEBOUNCE,
            admin_page_size: None,
            feed_page_size: None,
        }
    }

    pub fn with_token(mut self, token: SecretString) -> Self {
        self.api_token = Some(token);
        self
    }

    pub fn transport(&self) -> TransportConfig {
        TransportConfig {
            tls: TlsMode::from(&self.tls),
            timeout: self.timeout,
        }
    }
}
