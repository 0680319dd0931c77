//! Create, edit and delete articles owned by the signed-in user.

use std::io::{BufRead, Write};

use conduit_core::actions;
use conduit_core::api::Transport;
use conduit_core::models::ArticleUpdate;
use conduit_core::persist::KeyValueStorage;
use conduit_core::validation::ArticleForm;
use conduit_core::Article;

use crate::app::App;
use crate::commands::common::{
    capture_editor_input_with_initial, confirm, normalize_slug, resolve_body,
};
use crate::commands::show::fetch_article;
use crate::error::CliError;

/// Field values given on the command line; `None` keeps the current value.
#[derive(Debug, Default)]
pub struct ArticleEdits {
    pub title: Option<String>,
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub body: Option<String>,
}

impl ArticleEdits {
    const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.tags.is_empty()
            && self.body.is_none()
    }

    fn apply_to(self, article: &Article) -> ArticleForm {
        ArticleForm {
            title: self
                .title
                .unwrap_or_else(|| article.title_or_default().to_string()),
            description: self
                .description
                .or_else(|| article.description.clone())
                .unwrap_or_default(),
            body: self
                .body
                .or_else(|| article.body.clone())
                .unwrap_or_default(),
            tags: if self.tags.is_empty() {
                article.tags().to_vec()
            } else {
                self.tags
            },
        }
    }
}

pub async fn run_create<S, T>(
    app: &mut App<S, T>,
    title: String,
    description: String,
    tags: Vec<String>,
    body: Option<String>,
    out: &mut impl Write,
) -> Result<(), CliError>
where
    S: KeyValueStorage,
    T: Transport,
{
    let token = app.require_user()?.token.clone();
    let form = ArticleForm {
        title,
        description,
        body: resolve_body(body)?,
        tags,
    };
    let article = form.validate()?;

    if !actions::create_article(&mut app.store, &app.api, &article, Some(&token)).await {
        return Err(app.articles_error());
    }

    let slug = app
        .state()
        .articles
        .articles()
        .last()
        .map(|created| created.slug.clone())
        .unwrap_or_default();
    writeln!(out, "{slug}")?;
    Ok(())
}

/// Fetch `slug` and make sure the signed-in user wrote it.
async fn fetch_own_article<S, T>(
    app: &mut App<S, T>,
    slug: &str,
    out: &mut impl Write,
) -> Result<(Article, String), CliError>
where
    S: KeyValueStorage,
    T: Transport,
{
    let user = app.require_user()?;
    let username = user.username.clone();
    let token = user.token.clone();

    let article = fetch_article(app, slug, out).await?;
    if !article.is_authored_by(&username) {
        return Err(CliError::NotAuthor(article.slug));
    }
    Ok((article, token))
}

pub async fn run_edit<S, T>(
    app: &mut App<S, T>,
    slug: &str,
    mut edits: ArticleEdits,
    out: &mut impl Write,
) -> Result<(), CliError>
where
    S: KeyValueStorage,
    T: Transport,
{
    let (article, token) = fetch_own_article(app, slug, out).await?;

    if edits.is_empty() {
        let initial = article.body.as_deref().unwrap_or_default();
        let Some(body) = capture_editor_input_with_initial(initial)? else {
            return Err(CliError::EmptyBody);
        };
        if body == initial.trim() {
            writeln!(out, "{}", article.slug)?;
            return Ok(());
        }
        edits.body = Some(body);
    }

    let update = ArticleUpdate::from(edits.apply_to(&article).validate()?);
    if !actions::update_article(&mut app.store, &app.api, &article.slug, &update, Some(&token))
        .await
    {
        return Err(app.articles_error());
    }

    writeln!(out, "{}", article.slug)?;
    Ok(())
}

pub async fn run_delete<S, T>(
    app: &mut App<S, T>,
    slug: &str,
    skip_confirmation: bool,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> Result<(), CliError>
where
    S: KeyValueStorage,
    T: Transport,
{
    let slug = normalize_slug(slug)?;
    let (article, token) = fetch_own_article(app, &slug, out).await?;

    if !skip_confirmation
        && !confirm("Are you sure to delete this article?", input, out)?
    {
        return Err(CliError::Cancelled);
    }

    if !actions::delete_article(&mut app.store, &app.api, &article.slug, Some(&token)).await {
        return Err(app.articles_error());
    }

    writeln!(out, "Deleted {}", article.slug)?;
    Ok(())
}
