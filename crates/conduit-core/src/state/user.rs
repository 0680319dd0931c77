//! User container: the signed-in user plus loading/error flags.

use serde::{Deserialize, Serialize};

use super::Action;
use crate::models::AuthUser;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserState {
    #[serde(default)]
    pub user: Option<AuthUser>,
    #[serde(default)]
    pub loading: bool,
    #[serde(default)]
    pub error: Option<String>,
}

impl UserState {
    /// A user counts as signed in only when it carries a token.
    pub fn is_authenticated(&self) -> bool {
        self.user
            .as_ref()
            .is_some_and(|user| user.bearer_token().is_some())
    }

    pub fn username(&self) -> Option<&str> {
        self.user.as_ref().map(|user| user.username.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserAction {
    StartLoading,
    EndLoading,
    SetError(String),
    UpdateUserData(AuthUser),
    ClearError,
    LoggedOut,
}

#[must_use]
pub fn reduce(state: UserState, action: &Action) -> UserState {
    let Action::User(action) = action else {
        return state;
    };

    match action {
        UserAction::StartLoading => UserState {
            loading: true,
            error: None,
            ..state
        },
        UserAction::EndLoading => UserState {
            loading: false,
            ..state
        },
        UserAction::SetError(message) => UserState {
            loading: false,
            error: Some(message.clone()),
            ..state
        },
        UserAction::UpdateUserData(user) => UserState {
            user: Some(user.clone()),
            loading: false,
            error: None,
        },
        UserAction::ClearError => UserState {
            error: None,
            ..state
        },
        UserAction::LoggedOut => UserState::default(),
    }
}
