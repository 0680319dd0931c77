//! Article model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Author summary embedded in every article payload
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    pub username: String,
    #[serde(default)]
    pub image: Option<String>,
}

/// An article as returned by the API
///
/// Only `slug` is guaranteed. Partial payloads (favorite responses, stale
/// snapshots) leave the optional fields as `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    /// Unique, URL-safe identifier
    pub slug: String,
    #[serde(default)]
    pub favorited: bool,
    #[serde(default)]
    pub favorites_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Markdown body
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag_list: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<Author>,
}

impl Article {
    /// Overlay the fields present in `patch` onto this article.
    ///
    /// Fields absent from the patch keep their current value, so merging the
    /// same patch twice yields the same article as merging it once.
    #[must_use]
    pub fn merged_with(self, patch: &ArticlePatch) -> Self {
        Self {
            slug: self.slug,
            favorited: patch.favorited.unwrap_or(self.favorited),
            favorites_count: patch.favorites_count.unwrap_or(self.favorites_count),
            title: patch.title.clone().or(self.title),
            description: patch.description.clone().or(self.description),
            body: patch.body.clone().or(self.body),
            tag_list: patch.tag_list.clone().or(self.tag_list),
            created_at: patch.created_at.or(self.created_at),
            author: patch.author.clone().or(self.author),
        }
    }

    /// Apply a favorite/unfavorite response, touching only the favorite fields.
    pub fn apply_favorite(&mut self, status: &FavoriteStatus) {
        self.favorited = status.favorited;
        self.favorites_count = status.favorites_count;
    }

    pub fn title_or_default(&self) -> &str {
        self.title.as_deref().unwrap_or("")
    }

    pub fn tags(&self) -> &[String] {
        self.tag_list.as_deref().unwrap_or(&[])
    }

    pub fn author_name(&self) -> &str {
        self.author
            .as_ref()
            .map_or("", |author| author.username.as_str())
    }

    /// Whether `username` wrote this article.
    pub fn is_authored_by(&self, username: &str) -> bool {
        !username.is_empty() && self.author_name() == username
    }
}

/// One page of the article feed plus the total count used for pagination
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticlesPage {
    #[serde(default)]
    pub articles: Vec<Article>,
    #[serde(default)]
    pub articles_count: u32,
}

/// Favorite state returned by the favorite/unfavorite endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteStatus {
    pub slug: String,
    pub favorited: bool,
    pub favorites_count: u32,
}

/// Payload for creating an article
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewArticle {
    pub title: String,
    pub description: String,
    pub body: String,
    pub tag_list: Vec<String>,
}

/// Article as echoed back by an edit; every field but `slug` may be missing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticlePatch {
    pub slug: String,
    #[serde(default)]
    pub favorited: Option<bool>,
    #[serde(default)]
    pub favorites_count: Option<u32>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub tag_list: Option<Vec<String>>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub author: Option<Author>,
}

/// Payload for editing an article; absent fields are left unchanged server-side
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag_list: Option<Vec<String>>,
}

impl From<NewArticle> for ArticleUpdate {
    fn from(value: NewArticle) -> Self {
        Self {
            title: Some(value.title),
            description: Some(value.description),
            body: Some(value.body),
            tag_list: Some(value.tag_list),
        }
    }
}
