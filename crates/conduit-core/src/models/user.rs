//! Authenticated user and credential payloads

use std::fmt;

use serde::{Deserialize, Serialize};

/// The signed-in user as returned by the login/register/update endpoints
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    /// Bearer token sent as `Authorization: Token <token>`
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
}

impl AuthUser {
    /// Token to attach to requests, if any.
    pub fn bearer_token(&self) -> Option<&str> {
        let token = self.token.trim();
        if token.is_empty() {
            None
        } else {
            Some(token)
        }
    }
}

impl fmt::Debug for AuthUser {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("AuthUser")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("token", &"[REDACTED]")
            .field("image", &self.image)
            .field("bio", &self.bio)
            .finish()
    }
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginCredentials {
    pub email: String,
    pub password: String,
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Profile edit payload; `password` and `image` are sent only when set
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub username: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl fmt::Debug for LoginCredentials {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("LoginCredentials")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

impl fmt::Debug for Registration {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Registration")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

impl fmt::Debug for ProfileUpdate {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("ProfileUpdate")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("bio", &self.bio)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .field("image", &self.image)
            .finish()
    }
}
