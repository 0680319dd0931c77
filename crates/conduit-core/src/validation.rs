//! Client-side form rules checked before any request is sent.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

use crate::models::{LoginCredentials, NewArticle, ProfileUpdate, Registration};

/// A rule violation on a named form field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

impl fmt::Display for FieldError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}: {}", self.field, self.message)
    }
}

/// Every violation found in a form, in field order
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("{}", join_errors(.0))]
pub struct ValidationErrors(pub Vec<FieldError>);

impl ValidationErrors {
    pub fn fields(&self) -> &[FieldError] {
        &self.0
    }

    pub fn message_for(&self, field: &str) -> Option<&'static str> {
        self.0
            .iter()
            .find(|error| error.field == field)
            .map(|error| error.message)
    }

    fn check(&mut self, field: &'static str, rule: Option<&'static str>) {
        if let Some(message) = rule {
            self.0.push(FieldError { field, message });
        }
    }

    fn into_result<T>(self, value: impl FnOnce() -> T) -> Result<T, Self> {
        if self.0.is_empty() {
            Ok(value())
        } else {
            Err(self)
        }
    }
}

fn join_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

fn loose_email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\S+@\S+\.\S+$").expect("Invalid regex"))
}

fn strict_email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^[A-Z0-9._%+-]+@[A-Z0-9.-]+\.[A-Z]{2,4}$").expect("Invalid regex")
    })
}

fn url_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?:https?://(?:www\.)?|www\.)[a-zA-Z0-9][a-zA-Z0-9-]*\.\S{2,}$")
            .expect("Invalid regex")
    })
}

fn length_between(value: &str, min: usize, max: usize) -> bool {
    (min..=max).contains(&value.chars().count())
}

fn username_rule(value: &str) -> Option<&'static str> {
    if value.is_empty() {
        Some("Username is required")
    } else if !length_between(value, 3, 20) {
        Some("Username must be 3-20 characters long")
    } else {
        None
    }
}

fn email_rule(value: &str, pattern: &Regex, required: &'static str) -> Option<&'static str> {
    if value.is_empty() {
        Some(required)
    } else if !pattern.is_match(value) {
        Some("Invalid email format")
    } else {
        None
    }
}

fn new_password_rule(value: &str) -> Option<&'static str> {
    (value.chars().count() < 6).then_some("Your password needs to be at least 6 characters")
}

fn ranged_rule(
    value: &str,
    (min, max): (usize, usize),
    required: &'static str,
    length: &'static str,
) -> Option<&'static str> {
    if value.is_empty() {
        Some(required)
    } else if !length_between(value, min, max) {
        Some(length)
    } else {
        None
    }
}

#[derive(Debug, Clone, Default)]
pub struct SignUpForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub repeat_password: String,
    /// Consent to the processing of personal information
    pub agree: bool,
}

impl SignUpForm {
    pub fn validate(self) -> Result<Registration, ValidationErrors> {
        let mut errors = ValidationErrors::default();
        errors.check("username", username_rule(&self.username));
        errors.check(
            "email",
            email_rule(&self.email, loose_email_regex(), "Email is required"),
        );
        let password = if self.password.is_empty() {
            Some("Password is required")
        } else {
            new_password_rule(&self.password)
        };
        errors.check("password", password);
        errors.check(
            "repeatPassword",
            (self.repeat_password != self.password).then_some("Passwords must match"),
        );
        errors.check(
            "agree",
            (!self.agree)
                .then_some("You must agree to the processing of your personal information"),
        );

        errors.into_result(|| Registration {
            username: self.username,
            email: self.email,
            password: self.password,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct SignInForm {
    pub email: String,
    pub password: String,
}

impl SignInForm {
    pub fn validate(self) -> Result<LoginCredentials, ValidationErrors> {
        let mut errors = ValidationErrors::default();
        errors.check(
            "email",
            email_rule(&self.email, loose_email_regex(), "This field is required"),
        );
        let password = if self.password.is_empty() {
            Some("This field is required")
        } else if self.password.chars().count() < 6 {
            Some("Password must be at least 6 characters")
        } else if self.password.chars().count() > 40 {
            Some("Password cannot exceed 40 characters")
        } else {
            None
        };
        errors.check("password", password);

        errors.into_result(|| LoginCredentials {
            email: self.email,
            password: self.password,
        })
    }
}

/// Profile edit form; blank password and avatar are left unchanged
#[derive(Debug, Clone, Default)]
pub struct ProfileForm {
    pub username: String,
    pub email: String,
    pub bio: Option<String>,
    pub password: String,
    pub avatar: String,
}

impl ProfileForm {
    pub fn validate(self) -> Result<ProfileUpdate, ValidationErrors> {
        let mut errors = ValidationErrors::default();
        errors.check("username", username_rule(&self.username));
        errors.check(
            "email",
            email_rule(&self.email, strict_email_regex(), "Email is required"),
        );
        if !self.password.is_empty() {
            errors.check("password", new_password_rule(&self.password));
        }
        let avatar = self.avatar.trim();
        if !avatar.is_empty() && !url_regex().is_match(avatar) {
            errors.check("avatar", Some("Invalid URL"));
        }

        errors.into_result(|| ProfileUpdate {
            username: self.username,
            email: self.email,
            bio: crate::util::normalize_text_option(self.bio),
            password: Some(self.password).filter(|password| !password.is_empty()),
            image: Some(self.avatar.trim().to_string()).filter(|image| !image.is_empty()),
        })
    }
}

/// Create/edit article form
#[derive(Debug, Clone, Default)]
pub struct ArticleForm {
    pub title: String,
    pub description: String,
    pub body: String,
    pub tags: Vec<String>,
}

impl ArticleForm {
    pub fn validate(self) -> Result<NewArticle, ValidationErrors> {
        let mut errors = ValidationErrors::default();
        errors.check(
            "title",
            ranged_rule(
                &self.title,
                (2, 250),
                "Title is required",
                "Title must be 2-250 characters long",
            ),
        );
        errors.check(
            "description",
            ranged_rule(
                &self.description,
                (3, 250),
                "Short description is required",
                "Short description must be 3-250 characters long",
            ),
        );
        errors.check(
            "body",
            ranged_rule(
                &self.body,
                (3, 2000),
                "Text is required",
                "Text must be 3-2000 characters long",
            ),
        );

        errors.into_result(|| NewArticle {
            title: self.title,
            description: self.description,
            body: self.body,
            tag_list: self
                .tags
                .into_iter()
                .map(|tag| tag.trim().to_string())
                .filter(|tag| !tag.is_empty())
                .collect(),
        })
    }
}
