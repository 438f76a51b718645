//! DHIS2 Web API client.
//!
//! Covers the two resources the registration flow needs: the identifier
//! generator (`system/id`) and the data store (`dataStore/<ns>/<key>`).

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::{Client, Method, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use crate::error::{RegistryError, Result};
use crate::remote::{IdentifierService, KeyValueStore, WriteMode};

/// Credentials sent with every request
#[derive(Clone)]
pub enum Dhis2Auth {
    None,
    Basic { username: String, password: String },
    /// Personal access token ("ApiToken d2pat_...")
    Token(String),
}

impl std::fmt::Debug for Dhis2Auth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => write!(f, "None"),
            Self::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .field("password", &"[REDACTED]")
                .finish(),
            Self::Token(_) => write!(f, "Token([REDACTED])"),
        }
    }
}

#[derive(Debug, Deserialize)]
struct GeneratedCodes {
    #[serde(default)]
    codes: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct Dhis2Client {
    http: Client,
    base_url: String,
    auth: Dhis2Auth,
}

impl Dhis2Client {
    pub fn new(base_url: &str, auth: Dhis2Auth, timeout: Duration) -> Result<Self> {
        let base_url = base_url.trim_end_matches('/').to_string();
        url::Url::parse(&base_url)
            .map_err(|e| RegistryError::Validation(format!("invalid DHIS2 base URL: {e}")))?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = Client::builder()
            .user_agent(concat!("attendant-registry/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| RegistryError::Internal(format!("failed to build DHIS2 HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url,
            auth,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn api_url(&self, segments: &[&str]) -> String {
        let path: Vec<_> = segments
            .iter()
            .map(|s| urlencoding::encode(s).into_owned())
            .collect();
        format!("{}/api/{}", self.base_url, path.join("/"))
    }

    fn request(&self, method: Method, url: &str) -> Result<reqwest::RequestBuilder> {
        let req = self.http.request(method, url);
        Ok(match &self.auth {
            Dhis2Auth::None => req,
            Dhis2Auth::Basic { username, password } => req.basic_auth(username, Some(password)),
            Dhis2Auth::Token(token) => {
                let value = HeaderValue::from_str(&format!("ApiToken {token}"))
                    .map_err(|e| RegistryError::Validation(format!("invalid API token: {e}")))?;
                req.header(AUTHORIZATION, value)
            }
        })
    }

    /// Send and return status plus body text
    async fn send(&self, req: reqwest::RequestBuilder) -> Result<(StatusCode, String)> {
        let resp = req.send().await?;
        let status = resp.status();
        let text = resp.text().await?;
        Ok((status, text))
    }

    /// Pull the human message out of a DHIS2 WebMessage body if there is one
    fn describe_failure(status: StatusCode, body: &str) -> String {
        let message = serde_json::from_str::<Value>(body)
            .ok()
            .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string));
        match message {
            Some(msg) => format!("status={} message={}", status.as_u16(), msg),
            None if body.trim().is_empty() => format!("status={}", status.as_u16()),
            None => format!("status={} body={}", status.as_u16(), body.trim()),
        }
    }
}

#[async_trait]
impl IdentifierService for Dhis2Client {
    async fn generate_ids(&self, limit: usize) -> Result<Vec<String>> {
        let url = self.api_url(&["system", "id"]);
        debug!(%url, limit, "requesting generated identifiers");

        let req = self
            .request(Method::GET, &url)?
            .query(&[("limit", limit.to_string())]);
        let (status, text) = self.send(req).await?;

        if !status.is_success() {
            return Err(RegistryError::Remote(format!(
                "GET system/id failed: {}",
                Self::describe_failure(status, &text)
            )));
        }

        let parsed: GeneratedCodes = serde_json::from_str(&text)?;
        Ok(parsed.codes)
    }
}

#[async_trait]
impl KeyValueStore for Dhis2Client {
    async fn write_entry(
        &self,
        namespace: &str,
        key: &str,
        value: &Value,
        mode: WriteMode,
    ) -> Result<()> {
        let url = self.api_url(&["dataStore", namespace, key]);
        let method = match mode {
            WriteMode::Create => Method::POST,
            WriteMode::Update => Method::PUT,
        };
        debug!(%url, %method, "writing data store entry");

        let req = self.request(method.clone(), &url)?.json(value);
        let (status, text) = self.send(req).await?;

        if !status.is_success() {
            return Err(RegistryError::Remote(format!(
                "{} dataStore/{}/{} failed: {}",
                method,
                namespace,
                key,
                Self::describe_failure(status, &text)
            )));
        }
        Ok(())
    }

    async fn list_keys(&self, namespace: &str) -> Result<Vec<String>> {
        let url = self.api_url(&["dataStore", namespace]);
        let (status, text) = self.send(self.request(Method::GET, &url)?).await?;

        // An unknown namespace simply has no keys yet.
        if status == StatusCode::NOT_FOUND {
            return Ok(Vec::new());
        }
        if !status.is_success() {
            return Err(RegistryError::Remote(format!(
                "GET dataStore/{} failed: {}",
                namespace,
                Self::describe_failure(status, &text)
            )));
        }
        Ok(serde_json::from_str(&text)?)
    }

    async fn read_entry(&self, namespace: &str, key: &str) -> Result<Option<Value>> {
        let url = self.api_url(&["dataStore", namespace, key]);
        let (status, text) = self.send(self.request(Method::GET, &url)?).await?;

        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(RegistryError::Remote(format!(
                "GET dataStore/{}/{} failed: {}",
                namespace,
                key,
                Self::describe_failure(status, &text)
            )));
        }
        Ok(Some(serde_json::from_str(&text)?))
    }
}
