//! Client-side state containers and the actions that drive them.
//!
//! Each container is a pure reducer: it consumes the current state and an
//! [`Action`] and returns the next state. Actions addressed to the other
//! container leave the state untouched.

mod articles;
mod user;

use serde::{Deserialize, Serialize};

pub use articles::{ArticlesAction, ArticlesState};
pub use user::{UserAction, UserState};

/// Every state transition the store understands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Articles(ArticlesAction),
    User(UserAction),
}

impl From<ArticlesAction> for Action {
    fn from(value: ArticlesAction) -> Self {
        Self::Articles(value)
    }
}

impl From<UserAction> for Action {
    fn from(value: UserAction) -> Self {
        Self::User(value)
    }
}

/// Combined state of both containers; this is the persisted snapshot shape
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RootState {
    #[serde(default)]
    pub articles: ArticlesState,
    #[serde(default)]
    pub user: UserState,
}

impl RootState {
    /// Bearer token of the signed-in user, if any.
    pub fn token(&self) -> Option<&str> {
        self.user.user.as_ref().and_then(|user| user.bearer_token())
    }

    /// Clear loading flags left behind by a session that ended mid-request.
    #[must_use]
    pub fn rehydrated(mut self) -> Self {
        self.articles.loading = false;
        self.user.loading = false;
        self
    }
}

/// Run `action` through both reducers.
#[must_use]
pub fn reduce(state: RootState, action: &Action) -> RootState {
    RootState {
        articles: articles::reduce(state.articles, action),
        user: user::reduce(state.user, action),
    }
}
