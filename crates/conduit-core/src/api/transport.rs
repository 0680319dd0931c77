//! HTTP transport seam for the Conduit REST client.

use std::future::Future;
use std::time::Duration;

use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::{Client, Method};

use super::ApiResult;

const REQUEST_TIMEOUT_SECS: u64 = 15;

/// A single REST call, described independently of the HTTP stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    pub method: Method,
    /// Path below the API base URL, starting with `/`
    pub path: String,
    pub query: Vec<(String, String)>,
    /// Sent as `Authorization: Token <token>` when present
    pub token: Option<String>,
    pub body: Option<serde_json::Value>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            token: None,
            body: None,
        }
    }

    #[must_use]
    pub fn query(mut self, name: &str, value: impl ToString) -> Self {
        self.query.push((name.to_string(), value.to_string()));
        self
    }

    #[must_use]
    pub fn token(mut self, token: Option<&str>) -> Self {
        self.token = token
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(ToString::to_string);
        self
    }

    #[must_use]
    pub fn json(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// Raw status and body of a completed call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// Sends [`ApiRequest`]s somewhere and returns the raw response.
///
/// Non-success statuses are returned as responses, not errors; only failures
/// to complete the exchange are errors.
pub trait Transport: Clone + Send + Sync + 'static {
    fn send(
        &self,
        base_url: &str,
        request: ApiRequest,
    ) -> impl Future<Output = ApiResult<ApiResponse>> + Send;
}

/// `reqwest`-backed transport used outside of tests.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> ApiResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    async fn send(&self, base_url: &str, request: ApiRequest) -> ApiResult<ApiResponse> {
        let url = format!("{}{}", base_url, request.path);
        tracing::debug!("{} {}", request.method, url);

        let mut builder = self
            .client
            .request(request.method, url)
            .header(ACCEPT, "application/json");
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(token) = request.token {
            builder = builder.header(AUTHORIZATION, format!("Token {token}"));
        }
        if let Some(body) = request.body {
            builder = builder.json(&body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        tracing::debug!("HTTP {} ({} bytes)", status, body.len());
        Ok(ApiResponse { status, body })
    }
}
