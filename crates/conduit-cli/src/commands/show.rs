use std::io::Write;

use conduit_core::actions;
use conduit_core::api::Transport;
use conduit_core::persist::KeyValueStorage;
use conduit_core::Article;

use crate::app::App;
use crate::commands::common::{format_article_detail, normalize_slug, NO_DATA_MESSAGE};
use crate::error::CliError;

/// Fetch an article by slug into the store and return a copy of it.
pub async fn fetch_article<S, T>(
    app: &mut App<S, T>,
    slug: &str,
    out: &mut impl Write,
) -> Result<Article, CliError>
where
    S: KeyValueStorage,
    T: Transport,
{
    let slug = normalize_slug(slug)?;
    let token = app.token();
    if !actions::fetch_article(&mut app.store, &app.api, &slug, token.as_deref()).await {
        writeln!(out, "{NO_DATA_MESSAGE}")?;
        return Err(app.articles_error());
    }

    app.state()
        .articles
        .find(&slug)
        .cloned()
        .ok_or(CliError::ArticleNotFound(slug))
}

pub async fn run_show<S, T>(
    app: &mut App<S, T>,
    slug: &str,
    as_json: bool,
    out: &mut impl Write,
) -> Result<(), CliError>
where
    S: KeyValueStorage,
    T: Transport,
{
    let article = fetch_article(app, slug, out).await?;

    if as_json {
        writeln!(out, "{}", serde_json::to_string_pretty(&article)?)?;
        return Ok(());
    }

    let viewer = app.state().user.username();
    for line in format_article_detail(&article, viewer) {
        writeln!(out, "{line}")?;
    }
    Ok(())
}
