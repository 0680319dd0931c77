use std::io::Write;

use conduit_core::actions;
use conduit_core::api::Transport;
use conduit_core::persist::KeyValueStorage;

use crate::app::App;
use crate::commands::common::normalize_slug;
use crate::error::CliError;

pub async fn run_favorite<S, T>(
    app: &mut App<S, T>,
    slug: &str,
    favorite: bool,
    out: &mut impl Write,
) -> Result<(), CliError>
where
    S: KeyValueStorage,
    T: Transport,
{
    let slug = normalize_slug(slug)?;
    // Favoriting is gated here; the dispatchers send whatever token they get.
    let token = app.require_user()?.token.clone();

    let done = if favorite {
        actions::favorite_article(&mut app.store, &app.api, &slug, Some(&token)).await
    } else {
        actions::unfavorite_article(&mut app.store, &app.api, &slug, Some(&token)).await
    };
    if !done {
        return Err(app.articles_error());
    }

    let verb = if favorite { "Favorited" } else { "Unfavorited" };
    match app.state().articles.find(&slug) {
        Some(article) => writeln!(out, "{verb} {slug} ({})", article.favorites_count)?,
        None => writeln!(out, "{verb} {slug}")?,
    }
    Ok(())
}
