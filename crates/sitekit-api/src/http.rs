// reqwest-backed implementation of the request gateway.
//
// Base path: whatever the backend is mounted under (e.g. `/api/`)
// Auth: optional `Authorization: Bearer` header

use std::time::Duration;

use async_trait::async_trait;
use secrecy::SecretString;
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::gateway::{QueryParams, RequestGateway};
use crate::transport::TransportConfig;
use crate::Error;

// ── Error response shape from the backend ────────────────────────────

#[derive(serde::Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

// ── Gateway ──────────────────────────────────────────────────────────

/// Async HTTP gateway for the site backend.
///
/// Every verb returns the decoded JSON body. Empty success bodies
/// (e.g. `204 No Content` on delete) decode to `Value::Null`.
pub struct HttpGateway {
    http: reqwest::Client,
    base_url: Url,
    timeout: Duration,
}

impl HttpGateway {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build from a base URL, transport config, and optional bearer token.
    pub fn new(
        base_url: &str,
        transport: &TransportConfig,
        token: Option<&SecretString>,
    ) -> Result<Self, Error> {
        let mut gateway = Self::from_reqwest(base_url, transport.client(token)?)?;
        gateway.timeout = transport.timeout;
        Ok(gateway)
    }

    /// Wrap an existing `reqwest::Client` (caller manages auth headers).
    pub fn from_reqwest(base_url: &str, http: reqwest::Client) -> Result<Self, Error> {
        let base_url = Self::normalize_base_url(base_url)?;
        Ok(Self {
            http,
            base_url,
            timeout: TransportConfig::default().timeout,
        })
    }

    /// Ensure the base path ends with `/` so relative joins keep the prefix.
    ///
    /// `https://host/api` + `blogs` resolves to `https://host/api/blogs`.
    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw)?;
        let path = url.path().trim_end_matches('/').to_owned();
        url.set_path(&format!("{path}/"));
        Ok(url)
    }

    /// The normalized base URL every path is joined onto.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builder ──────────────────────────────────────────────────

    fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    // ── Transport ────────────────────────────────────────────────────

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<Value, Error> {
        let resp = request.send().await.map_err(|e| self.transport_error(e))?;
        self.handle_response(resp).await
    }

    fn transport_error(&self, err: reqwest::Error) -> Error {
        if err.is_timeout() {
            Error::Timeout {
                timeout_secs: self.timeout.as_secs(),
            }
        } else {
            Error::Transport(err)
        }
    }

    // ── Response handling ────────────────────────────────────────────

    async fn handle_response(&self, resp: reqwest::Response) -> Result<Value, Error> {
        let status = resp.status();
        if !status.is_success() {
            return Err(Self::parse_error(status, resp).await);
        }

        let body = resp.text().await.map_err(|e| self.transport_error(e))?;
        if body.trim().is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_str(&body).map_err(|e| {
            let preview: String = body.chars().take(200).collect();
            Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body,
            }
        })
    }

    async fn parse_error(status: reqwest::StatusCode, resp: reqwest::Response) -> Error {
        let raw = resp.text().await.unwrap_or_default();

        // Only structured bodies carry a user-facing message; HTML error
        // pages and proxy banners are dropped.
        let message = serde_json::from_str::<ErrorResponse>(&raw)
            .ok()
            .and_then(|err| err.message.or(err.error))
            .filter(|m| !m.trim().is_empty());

        Error::Api {
            status: status.as_u16(),
            message,
        }
    }
}

#[async_trait]
impl RequestGateway for HttpGateway {
    async fn get(&self, path: &str, query: &QueryParams) -> Result<Value, Error> {
        let url = self.url(path)?;
        debug!("GET {url} params={query:?}");
        self.send(self.http.get(url).query(query)).await
    }

    async fn post(&self, path: &str, body: &Value) -> Result<Value, Error> {
        let url = self.url(path)?;
        debug!("POST {url}");
        self.send(self.http.post(url).json(body)).await
    }

    async fn put(&self, path: &str, body: &Value) -> Result<Value, Error> {
        let url = self.url(path)?;
        debug!("PUT {url}");
        self.send(self.http.put(url).json(body)).await
    }

    async fn delete(&self, path: &str) -> Result<Value, Error> {
        let url = self.url(path)?;
        debug!("DELETE {url}");
        self.send(self.http.delete(url)).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn base_url_gains_trailing_slash() {
        let gw = HttpGateway::from_reqwest("https://example.com/api", reqwest::Client::new())
            .unwrap();
        assert_eq!(gw.base_url().as_str(), "https://example.com/api/");
        assert_eq!(
            gw.url("blogs/42").unwrap().as_str(),
            "https://example.com/api/blogs/42"
        );
    }

    #[test]
    fn leading_slash_does_not_escape_prefix() {
        let gw = HttpGateway::from_reqwest("https://example.com/api/", reqwest::Client::new())
            .unwrap();
        assert_eq!(
            gw.url("/projects").unwrap().as_str(),
            "https://example.com/api/projects"
        );
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let result = HttpGateway::from_reqwest("not a url", reqwest::Client::new());
        assert!(matches!(result, Err(Error::InvalidUrl(_))));
    }
}
