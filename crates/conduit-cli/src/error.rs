use std::io;

use conduit_core::api::ApiError;
use conduit_core::validation::ValidationErrors;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] conduit_core::Error),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("Request failed: {0}")]
    Request(String),
    #[error("Not signed in. Run `conduit login` first.")]
    NotSignedIn,
    #[error("Only the author can change article '{0}'")]
    NotAuthor(String),
    #[error("Article not found: {0}")]
    ArticleNotFound(String),
    #[error("Article slug cannot be empty")]
    EmptySlug,
    #[error("Article body cannot be empty")]
    EmptyBody,
    #[error("Editor command failed: {0}")]
    EditorFailed(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Cancelled")]
    Cancelled,
}
