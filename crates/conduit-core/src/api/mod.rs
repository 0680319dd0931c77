//! REST client for the Conduit blog API.
//!
//! [`ConduitApi`] maps each endpoint to a typed method. Transport failures,
//! non-success statuses and malformed payloads all surface as [`ApiError`];
//! turning those into user-facing messages is left to [`crate::actions`].

mod errors;
mod transport;

#[cfg(any(test, feature = "test-util"))]
pub mod testing;

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;

use crate::models::{
    Article, ArticlePatch, ArticleUpdate, ArticlesPage, AuthUser, FavoriteStatus, LoginCredentials, NewArticle,
    ProfileUpdate, Registration,
};
use crate::util::{compact_text, is_http_url};

pub use errors::{body_errors, first_field_error};
pub use transport::{ApiRequest, ApiResponse, HttpTransport, Transport};

pub const DEFAULT_API_BASE_URL: &str = "https://blog-platform.kata.academy/api";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid API configuration: {0}")]
    InvalidConfiguration(&'static str),
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Request failed: {0}")]
    Transport(String),
    #[error("HTTP {status}: {}", compact_text(.body))]
    Status { status: u16, body: String },
    #[error("Failed to parse JSON payload: {0}")]
    Json(#[from] serde_json::Error),
}

impl ApiError {
    /// HTTP status for non-success responses.
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Raw response body for non-success responses.
    pub fn body(&self) -> Option<&str> {
        match self {
            Self::Status { body, .. } => Some(body),
            _ => None,
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Deserialize)]
struct ArticleEnvelope<A> {
    article: A,
}

#[derive(Debug, Deserialize)]
struct UserEnvelope {
    user: AuthUser,
}

/// Typed client over a [`Transport`]
#[derive(Debug, Clone)]
pub struct ConduitApi<T: Transport = HttpTransport> {
    base_url: String,
    transport: T,
}

impl ConduitApi<HttpTransport> {
    /// Builds a `reqwest`-backed client for an explicit API base URL.
    pub fn new(base_url: impl AsRef<str>) -> ApiResult<Self> {
        Self::with_transport(base_url, HttpTransport::new()?)
    }
}

impl<T: Transport> ConduitApi<T> {
    pub fn with_transport(base_url: impl AsRef<str>, transport: T) -> ApiResult<Self> {
        Ok(Self {
            base_url: normalize_base_url(base_url.as_ref())?,
            transport,
        })
    }

    pub async fn list_articles(
        &self,
        limit: u32,
        offset: u32,
        token: Option<&str>,
    ) -> ApiResult<ArticlesPage> {
        let request = ApiRequest::new(Method::GET, "/articles")
            .query("limit", limit)
            .query("offset", offset)
            .token(token);
        self.fetch(request).await
    }

    pub async fn get_article(&self, slug: &str, token: Option<&str>) -> ApiResult<Article> {
        let request = ApiRequest::new(Method::GET, article_path(slug)).token(token);
        let envelope: ArticleEnvelope<Article> = self.fetch(request).await?;
        Ok(envelope.article)
    }

    pub async fn create_article(
        &self,
        article: &NewArticle,
        token: Option<&str>,
    ) -> ApiResult<Article> {
        let request = ApiRequest::new(Method::POST, "/articles")
            .token(token)
            .json(serde_json::json!({ "article": article }));
        let envelope: ArticleEnvelope<Article> = self.fetch(request).await?;
        Ok(envelope.article)
    }

    pub async fn update_article(
        &self,
        slug: &str,
        update: &ArticleUpdate,
        token: Option<&str>,
    ) -> ApiResult<ArticlePatch> {
        let request = ApiRequest::new(Method::PUT, article_path(slug))
            .token(token)
            .json(serde_json::json!({ "article": update }));
        let envelope: ArticleEnvelope<ArticlePatch> = self.fetch(request).await?;
        Ok(envelope.article)
    }

    /// Deletes an article; the response body is ignored.
    pub async fn delete_article(&self, slug: &str, token: Option<&str>) -> ApiResult<()> {
        let request = ApiRequest::new(Method::DELETE, article_path(slug)).token(token);
        self.send(request).await?;
        Ok(())
    }

    pub async fn favorite(&self, slug: &str, token: Option<&str>) -> ApiResult<FavoriteStatus> {
        let request = ApiRequest::new(Method::POST, favorite_path(slug)).token(token);
        let envelope: ArticleEnvelope<FavoriteStatus> = self.fetch(request).await?;
        Ok(envelope.article)
    }

    pub async fn unfavorite(&self, slug: &str, token: Option<&str>) -> ApiResult<FavoriteStatus> {
        let request = ApiRequest::new(Method::DELETE, favorite_path(slug)).token(token);
        let envelope: ArticleEnvelope<FavoriteStatus> = self.fetch(request).await?;
        Ok(envelope.article)
    }

    pub async fn login(&self, credentials: &LoginCredentials) -> ApiResult<AuthUser> {
        let request = ApiRequest::new(Method::POST, "/users/login")
            .json(serde_json::json!({ "user": credentials }));
        let envelope: UserEnvelope = self.fetch(request).await?;
        Ok(envelope.user)
    }

    pub async fn register(&self, registration: &Registration) -> ApiResult<AuthUser> {
        let request = ApiRequest::new(Method::POST, "/users")
            .json(serde_json::json!({ "user": registration }));
        let envelope: UserEnvelope = self.fetch(request).await?;
        Ok(envelope.user)
    }

    pub async fn update_user(
        &self,
        update: &ProfileUpdate,
        token: Option<&str>,
    ) -> ApiResult<AuthUser> {
        let request = ApiRequest::new(Method::PUT, "/user")
            .token(token)
            .json(serde_json::json!({ "user": update }));
        let envelope: UserEnvelope = self.fetch(request).await?;
        Ok(envelope.user)
    }

    async fn fetch<R: DeserializeOwned>(&self, request: ApiRequest) -> ApiResult<R> {
        let response = self.send(request).await?;
        Ok(serde_json::from_str(&response.body)?)
    }

    async fn send(&self, request: ApiRequest) -> ApiResult<ApiResponse> {
        let response = self.transport.send(&self.base_url, request).await?;
        if !response.is_success() {
            return Err(ApiError::Status {
                status: response.status,
                body: response.body,
            });
        }
        Ok(response)
    }
}

pub fn normalize_base_url(raw: &str) -> ApiResult<String> {
    let base = raw.trim().trim_end_matches('/').to_string();
    if base.is_empty() {
        return Err(ApiError::InvalidConfiguration(
            "API base URL must not be empty",
        ));
    }
    if !is_http_url(&base) {
        return Err(ApiError::InvalidConfiguration(
            "API base URL must include http:// or https://",
        ));
    }
    Ok(base)
}

fn article_path(slug: &str) -> String {
    format!("/articles/{}", urlencoding::encode(slug))
}

fn favorite_path(slug: &str) -> String {
    format!("{}/favorite", article_path(slug))
}
