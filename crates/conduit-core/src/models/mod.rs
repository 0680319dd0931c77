//! Data models for Conduit

mod article;
mod user;

pub use article::{
    Article, ArticlePatch, ArticleUpdate, ArticlesPage, Author, FavoriteStatus, NewArticle,
};
pub use user::{AuthUser, LoginCredentials, ProfileUpdate, Registration};
