//! Async action dispatchers.
//!
//! Each dispatcher wraps exactly one REST call and reports its progress to a
//! [`Dispatch`] target as start/success/error/end actions. Failures never
//! propagate: they are turned into a message and stored in the relevant
//! container. The returned `bool` tells the caller whether the call succeeded.

use crate::api::{body_errors, first_field_error, ApiError, ConduitApi, Transport};
use crate::models::{ArticleUpdate, LoginCredentials, NewArticle, ProfileUpdate, Registration};
use crate::persist::{KeyValueStorage, USER_KEY};
use crate::state::{ArticlesAction, UserAction};
use crate::store::Dispatch;

/// Number of articles requested per list page.
pub const DEFAULT_PAGE_SIZE: u32 = 5;

const ARTICLE_NOT_FETCHED: &str = "Article could not be fetched!";
const GENERIC_REGISTER_ERROR: &str = "An error occurred";

pub async fn fetch_articles<D, T>(
    store: &mut D,
    api: &ConduitApi<T>,
    limit: u32,
    offset: u32,
    token: Option<&str>,
) -> bool
where
    D: Dispatch,
    T: Transport,
{
    store.dispatch(ArticlesAction::StartLoading.into());
    let ok = match api.list_articles(limit, offset, token).await {
        Ok(page) => {
            tracing::debug!(
                "Fetched {} of {} articles",
                page.articles.len(),
                page.articles_count
            );
            store.dispatch(ArticlesAction::SetPage(page).into());
            true
        }
        Err(error) => fail_articles(store, "list articles", &error, status_message(&error)),
    };
    store.dispatch(ArticlesAction::EndLoading.into());
    ok
}

pub async fn fetch_article<D, T>(
    store: &mut D,
    api: &ConduitApi<T>,
    slug: &str,
    token: Option<&str>,
) -> bool
where
    D: Dispatch,
    T: Transport,
{
    store.dispatch(ArticlesAction::StartLoading.into());
    let ok = match api.get_article(slug, token).await {
        Ok(article) => {
            store.dispatch(ArticlesAction::SetArticle(article).into());
            true
        }
        Err(error) => {
            let message = if error.status().is_some() {
                ARTICLE_NOT_FETCHED.to_string()
            } else {
                error.to_string()
            };
            fail_articles(store, "fetch article", &error, message)
        }
    };
    store.dispatch(ArticlesAction::EndLoading.into());
    ok
}

pub async fn create_article<D, T>(
    store: &mut D,
    api: &ConduitApi<T>,
    article: &NewArticle,
    token: Option<&str>,
) -> bool
where
    D: Dispatch,
    T: Transport,
{
    store.dispatch(ArticlesAction::StartLoading.into());
    let ok = match api.create_article(article, token).await {
        Ok(created) => {
            tracing::info!("Created article {}", created.slug);
            store.dispatch(ArticlesAction::Created(created).into());
            true
        }
        Err(error) => {
            let mut message = status_message(&error);
            let details = error.body().map(body_errors).unwrap_or_default();
            if !details.is_empty() {
                message = format!("{message}, Message: {}", details.join(", "));
            }
            fail_articles(store, "create article", &error, message)
        }
    };
    store.dispatch(ArticlesAction::EndLoading.into());
    ok
}

pub async fn update_article<D, T>(
    store: &mut D,
    api: &ConduitApi<T>,
    slug: &str,
    update: &ArticleUpdate,
    token: Option<&str>,
) -> bool
where
    D: Dispatch,
    T: Transport,
{
    store.dispatch(ArticlesAction::StartLoading.into());
    let ok = match api.update_article(slug, update, token).await {
        Ok(updated) => {
            store.dispatch(ArticlesAction::Updated(updated).into());
            true
        }
        Err(error) => fail_articles(store, "update article", &error, status_message(&error)),
    };
    store.dispatch(ArticlesAction::EndLoading.into());
    ok
}

pub async fn delete_article<D, T>(
    store: &mut D,
    api: &ConduitApi<T>,
    slug: &str,
    token: Option<&str>,
) -> bool
where
    D: Dispatch,
    T: Transport,
{
    store.dispatch(ArticlesAction::StartLoading.into());
    let ok = match api.delete_article(slug, token).await {
        Ok(()) => {
            tracing::info!("Deleted article {}", slug);
            store.dispatch(ArticlesAction::Deleted(slug.to_string()).into());
            true
        }
        Err(error) => fail_articles(store, "delete article", &error, status_message(&error)),
    };
    store.dispatch(ArticlesAction::EndLoading.into());
    ok
}

/// Favorite an article. Does not touch the loading flag.
pub async fn favorite_article<D, T>(
    store: &mut D,
    api: &ConduitApi<T>,
    slug: &str,
    token: Option<&str>,
) -> bool
where
    D: Dispatch,
    T: Transport,
{
    match api.favorite(slug, token).await {
        Ok(status) => {
            store.dispatch(ArticlesAction::SetFavorite(status).into());
            true
        }
        Err(error) => fail_articles(store, "favorite article", &error, status_message(&error)),
    }
}

/// Remove a favorite. Does not touch the loading flag.
pub async fn unfavorite_article<D, T>(
    store: &mut D,
    api: &ConduitApi<T>,
    slug: &str,
    token: Option<&str>,
) -> bool
where
    D: Dispatch,
    T: Transport,
{
    match api.unfavorite(slug, token).await {
        Ok(status) => {
            store.dispatch(ArticlesAction::UnsetFavorite(status).into());
            true
        }
        Err(error) => fail_articles(store, "unfavorite article", &error, status_message(&error)),
    }
}

/// Sign in and keep a copy of the returned user under [`USER_KEY`].
pub async fn login<D, T, S>(
    store: &mut D,
    api: &ConduitApi<T>,
    storage: &S,
    credentials: &LoginCredentials,
) -> bool
where
    D: Dispatch,
    T: Transport,
    S: KeyValueStorage,
{
    store.dispatch(UserAction::StartLoading.into());
    let ok = match api.login(credentials).await {
        Ok(user) => {
            match serde_json::to_string(&user) {
                Ok(raw) => {
                    if let Err(error) = storage.set(USER_KEY, &raw) {
                        tracing::warn!("Failed to store signed-in user: {}", error);
                    }
                }
                Err(error) => tracing::warn!("Failed to serialize signed-in user: {}", error),
            }
            tracing::info!("Signed in as {}", user.username);
            store.dispatch(UserAction::UpdateUserData(user).into());
            true
        }
        Err(error) => fail_user(store, "login", &error, status_message(&error)),
    };
    store.dispatch(UserAction::EndLoading.into());
    ok
}

pub async fn register<D, T>(
    store: &mut D,
    api: &ConduitApi<T>,
    registration: &Registration,
) -> bool
where
    D: Dispatch,
    T: Transport,
{
    store.dispatch(UserAction::StartLoading.into());
    let ok = match api.register(registration).await {
        Ok(user) => {
            tracing::info!("Registered {}", user.username);
            store.dispatch(UserAction::UpdateUserData(user).into());
            true
        }
        Err(error) => {
            let message = match error.body() {
                Some(body) => {
                    first_field_error(body).unwrap_or_else(|| GENERIC_REGISTER_ERROR.to_string())
                }
                None => error.to_string(),
            };
            fail_user(store, "register", &error, message)
        }
    };
    store.dispatch(UserAction::EndLoading.into());
    ok
}

pub async fn update_profile<D, T>(
    store: &mut D,
    api: &ConduitApi<T>,
    update: &ProfileUpdate,
    token: Option<&str>,
) -> bool
where
    D: Dispatch,
    T: Transport,
{
    store.dispatch(UserAction::StartLoading.into());
    let ok = match api.update_user(update, token).await {
        Ok(user) => {
            store.dispatch(UserAction::UpdateUserData(user).into());
            true
        }
        Err(error) => {
            let message = error
                .body()
                .and_then(|body| body_errors(body).into_iter().next())
                .unwrap_or_else(|| status_message(&error));
            fail_user(store, "update profile", &error, message)
        }
    };
    store.dispatch(UserAction::EndLoading.into());
    ok
}

/// Forget the signed-in user.
pub fn logout<D: Dispatch, S: KeyValueStorage>(store: &mut D, storage: &S) {
    if let Err(error) = storage.remove(USER_KEY) {
        tracing::warn!("Failed to remove stored user: {}", error);
    }
    store.dispatch(UserAction::LoggedOut.into());
}

pub fn clear_error<D: Dispatch>(store: &mut D) {
    store.dispatch(UserAction::ClearError.into());
}

fn status_message(error: &ApiError) -> String {
    error
        .status()
        .map_or_else(|| error.to_string(), |status| format!("Error: {status}"))
}

fn fail_articles<D: Dispatch>(
    store: &mut D,
    operation: &str,
    error: &ApiError,
    message: String,
) -> bool {
    tracing::warn!("Failed to {}: {}", operation, error);
    store.dispatch(ArticlesAction::SetError(message).into());
    false
}

fn fail_user<D: Dispatch>(store: &mut D, operation: &str, error: &ApiError, message: String) -> bool {
    tracing::warn!("Failed to {}: {}", operation, error);
    store.dispatch(UserAction::SetError(message).into());
    false
}
