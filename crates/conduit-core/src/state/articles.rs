//! Articles container: the current feed page plus loading/error flags.

use serde::{Deserialize, Serialize};

use super::Action;
use crate::models::{Article, ArticlePatch, ArticlesPage, FavoriteStatus};

/// Upper bound on articles kept by single-article upserts; oldest go first.
pub const CACHED_ARTICLE_LIMIT: usize = 20;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticlesState {
    #[serde(default)]
    pub page: ArticlesPage,
    #[serde(default)]
    pub loading: bool,
    #[serde(default)]
    pub error: Option<String>,
}

impl ArticlesState {
    pub fn articles(&self) -> &[Article] {
        &self.page.articles
    }

    pub fn articles_count(&self) -> u32 {
        self.page.articles_count
    }

    pub fn find(&self, slug: &str) -> Option<&Article> {
        self.page.articles.iter().find(|article| article.slug == slug)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArticlesAction {
    StartLoading,
    EndLoading,
    SetError(String),
    /// Replace the list and the total count with a freshly fetched page
    SetPage(ArticlesPage),
    /// Upsert a single article fetched by slug
    SetArticle(Article),
    Created(Article),
    /// Remove by slug
    Deleted(String),
    /// Merge the fields present in an edit response
    Updated(ArticlePatch),
    SetFavorite(FavoriteStatus),
    UnsetFavorite(FavoriteStatus),
}

#[must_use]
pub fn reduce(state: ArticlesState, action: &Action) -> ArticlesState {
    let Action::Articles(action) = action else {
        return state;
    };

    match action {
        ArticlesAction::StartLoading => ArticlesState {
            loading: true,
            error: None,
            ..state
        },
        ArticlesAction::EndLoading => ArticlesState {
            loading: false,
            ..state
        },
        ArticlesAction::SetError(message) => ArticlesState {
            loading: false,
            error: Some(message.clone()),
            ..state
        },
        ArticlesAction::SetPage(page) => ArticlesState {
            page: page.clone(),
            loading: false,
            ..state
        },
        ArticlesAction::SetArticle(article) => {
            let mut page = state.page;
            if let Some(existing) = page.articles.iter_mut().find(|a| a.slug == article.slug) {
                existing.clone_from(article);
            } else {
                page.articles.push(article.clone());
                let overflow = page.articles.len().saturating_sub(CACHED_ARTICLE_LIMIT);
                page.articles.drain(..overflow);
            }
            ArticlesState {
                page,
                loading: false,
                ..state
            }
        }
        ArticlesAction::Created(article) => {
            let mut page = state.page;
            page.articles.push(article.clone());
            page.articles_count = page.articles_count.saturating_add(1);
            ArticlesState {
                page,
                loading: false,
                error: None,
            }
        }
        ArticlesAction::Deleted(slug) => {
            let mut page = state.page;
            page.articles.retain(|article| &article.slug != slug);
            page.articles_count = page.articles_count.saturating_sub(1);
            ArticlesState {
                page,
                loading: false,
                error: None,
            }
        }
        ArticlesAction::Updated(patch) => {
            let mut page = state.page;
            page.articles = page
                .articles
                .into_iter()
                .map(|article| {
                    if article.slug == patch.slug {
                        article.merged_with(patch)
                    } else {
                        article
                    }
                })
                .collect();
            ArticlesState {
                page,
                loading: false,
                error: None,
            }
        }
        ArticlesAction::SetFavorite(status) | ArticlesAction::UnsetFavorite(status) => {
            let mut page = state.page;
            for article in page.articles.iter_mut().filter(|a| a.slug == status.slug) {
                article.apply_favorite(status);
            }
            ArticlesState {
                page,
                loading: false,
                ..state
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::models::Author;
    use crate::state::UserAction;

    fn article(slug: &str) -> Article {
        Article {
            slug: slug.to_string(),
            favorited: false,
            favorites_count: 1,
            title: Some(format!("Title of {slug}")),
            description: Some("desc".to_string()),
            body: Some("body".to_string()),
            tag_list: Some(vec!["rust".to_string()]),
            created_at: None,
            author: Some(Author {
                username: "jake".to_string(),
                image: None,
            }),
        }
    }

    fn with_page(slugs: &[&str], count: u32) -> ArticlesState {
        ArticlesState {
            page: ArticlesPage {
                articles: slugs.iter().map(|slug| article(slug)).collect(),
                articles_count: count,
            },
            loading: false,
            error: None,
        }
    }

    fn apply(state: ArticlesState, action: ArticlesAction) -> ArticlesState {
        reduce(state, &Action::Articles(action))
    }

    #[test]
    fn start_loading_clears_previous_error() {
        let state = apply(
            ArticlesState::default(),
            ArticlesAction::SetError("Error: 500".to_string()),
        );
        assert!(!state.loading);
        assert_eq!(state.error.as_deref(), Some("Error: 500"));

        let state = apply(state, ArticlesAction::StartLoading);
        assert!(state.loading);
        assert_eq!(state.error, None);

        let state = apply(state, ArticlesAction::EndLoading);
        assert!(!state.loading);
    }

    #[test]
    fn set_page_replaces_list_and_count() {
        let state = with_page(&["old"], 1);
        let state = apply(
            state,
            ArticlesAction::SetPage(ArticlesPage {
                articles: vec![article("a"), article("b")],
                articles_count: 42,
            }),
        );

        assert_eq!(state.articles().len(), 2);
        assert_eq!(state.articles_count(), 42);
        assert!(state.find("old").is_none());
    }

    #[test]
    fn set_article_replaces_matching_slug_and_is_idempotent() {
        let mut fetched = article("b");
        fetched.body = Some("full body".to_string());

        let once = apply(with_page(&["a", "b"], 2), ArticlesAction::SetArticle(fetched.clone()));
        let twice = apply(once.clone(), ArticlesAction::SetArticle(fetched));

        assert_eq!(once, twice);
        assert_eq!(once.articles().len(), 2);
        assert_eq!(once.find("b").unwrap().body.as_deref(), Some("full body"));
        assert_eq!(once.articles_count(), 2);
    }

    #[test]
    fn set_article_appends_unknown_slug_without_touching_count() {
        let state = apply(with_page(&["a"], 7), ArticlesAction::SetArticle(article("z")));
        assert_eq!(state.articles().len(), 2);
        assert_eq!(state.articles_count(), 7);
    }

    #[test]
    fn set_article_keeps_list_bounded() {
        let mut state = with_page(&["a", "b"], 2);
        for index in 0..CACHED_ARTICLE_LIMIT + 5 {
            state = apply(state, ArticlesAction::SetArticle(article(&format!("shown-{index}"))));
        }

        assert_eq!(state.articles().len(), CACHED_ARTICLE_LIMIT);
        assert_eq!(
            state.articles().last().unwrap().slug,
            format!("shown-{}", CACHED_ARTICLE_LIMIT + 4)
        );
        assert!(state.find("a").is_none());
        assert_eq!(state.articles_count(), 2);
    }

    #[test]
    fn created_appends_and_increments_count() {
        let state = apply(
            ArticlesState {
                error: Some("stale".to_string()),
                ..with_page(&["a"], 1)
            },
            ArticlesAction::Created(article("new")),
        );
        assert_eq!(state.articles().last().unwrap().slug, "new");
        assert_eq!(state.articles_count(), 2);
        assert_eq!(state.error, None);
    }

    #[test]
    fn deleted_removes_slug_and_floors_count_at_zero() {
        let state = apply(with_page(&["a", "b"], 2), ArticlesAction::Deleted("a".to_string()));
        assert_eq!(state.articles().len(), 1);
        assert_eq!(state.articles_count(), 1);

        let mut state = state;
        for _ in 0..5 {
            state = apply(state, ArticlesAction::Deleted("missing".to_string()));
        }
        assert_eq!(state.articles_count(), 0);
        assert_eq!(state.articles().len(), 1);
    }

    #[test]
    fn updated_merges_fields_and_is_idempotent() {
        let patch = ArticlePatch {
            slug: "b".to_string(),
            title: Some("Edited".to_string()),
            ..ArticlePatch::default()
        };

        let once = apply(with_page(&["a", "b"], 2), ArticlesAction::Updated(patch.clone()));
        let twice = apply(once.clone(), ArticlesAction::Updated(patch));

        assert_eq!(once, twice);
        let edited = once.find("b").unwrap();
        assert_eq!(edited.title.as_deref(), Some("Edited"));
        assert_eq!(edited.body.as_deref(), Some("body"));
        assert_eq!(once.find("a").unwrap(), &article("a"));
    }

    #[test]
    fn updated_without_favorite_fields_keeps_them() {
        let mut state = with_page(&["a"], 1);
        state.page.articles[0].favorited = true;
        state.page.articles[0].favorites_count = 8;

        let state = apply(
            state,
            ArticlesAction::Updated(ArticlePatch {
                slug: "a".to_string(),
                body: Some("new body".to_string()),
                ..ArticlePatch::default()
            }),
        );

        let article = state.find("a").unwrap();
        assert!(article.favorited);
        assert_eq!(article.favorites_count, 8);
        assert_eq!(article.body.as_deref(), Some("new body"));
    }

    #[test]
    fn favorite_updates_only_matching_article() {
        let before = with_page(&["foo", "bar"], 2);
        let status = FavoriteStatus {
            slug: "foo".to_string(),
            favorited: true,
            favorites_count: 3,
        };

        let after = apply(before.clone(), ArticlesAction::SetFavorite(status.clone()));
        let again = apply(after.clone(), ArticlesAction::SetFavorite(status));

        assert_eq!(after, again);
        let foo = after.find("foo").unwrap();
        assert!(foo.favorited);
        assert_eq!(foo.favorites_count, 3);
        assert_eq!(foo.title, before.find("foo").unwrap().title);
        assert_eq!(after.find("bar"), before.find("bar"));
    }

    #[test]
    fn unset_favorite_clears_flag() {
        let mut state = with_page(&["foo"], 1);
        state.page.articles[0].favorited = true;
        state.page.articles[0].favorites_count = 5;

        let state = apply(
            state,
            ArticlesAction::UnsetFavorite(FavoriteStatus {
                slug: "foo".to_string(),
                favorited: false,
                favorites_count: 4,
            }),
        );
        assert!(!state.find("foo").unwrap().favorited);
        assert_eq!(state.find("foo").unwrap().favorites_count, 4);
    }

    #[test]
    fn user_actions_are_ignored() {
        let state = with_page(&["a"], 1);
        let next = reduce(state.clone(), &Action::User(UserAction::StartLoading));
        assert_eq!(next, state);
    }
}
