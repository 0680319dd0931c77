use std::io::Write;

use conduit_core::actions::{self, DEFAULT_PAGE_SIZE};
use conduit_core::api::Transport;
use conduit_core::pagination::{offset_for, page_count, Paginator};
use conduit_core::persist::KeyValueStorage;

use crate::app::App;
use crate::commands::common::{
    article_to_list_item, format_article_lines, format_pagination, ArticleListItem,
    NO_DATA_MESSAGE,
};
use crate::error::CliError;

async fn fetch_page<S, T>(app: &mut App<S, T>, page: u32) -> bool
where
    S: KeyValueStorage,
    T: Transport,
{
    let token = app.token();
    actions::fetch_articles(
        &mut app.store,
        &app.api,
        DEFAULT_PAGE_SIZE,
        offset_for(page, DEFAULT_PAGE_SIZE),
        token.as_deref(),
    )
    .await
}

/// Fetch one page into the store; renders the no-data notice on failure.
///
/// A page past the end is clamped to the last page and fetched again.
pub async fn load_page<S, T>(
    app: &mut App<S, T>,
    page: u32,
    out: &mut impl Write,
) -> Result<Paginator, CliError>
where
    S: KeyValueStorage,
    T: Transport,
{
    let mut page = page.max(1);
    let mut loaded = fetch_page(app, page).await;
    if loaded {
        let total = page_count(app.state().articles.articles_count(), DEFAULT_PAGE_SIZE);
        if page > total {
            tracing::debug!("Page {} is past the end, showing page {}", page, total);
            page = total;
            loaded = fetch_page(app, page).await;
        }
    }
    if !loaded {
        writeln!(out, "{NO_DATA_MESSAGE}")?;
        return Err(app.articles_error());
    }

    let total = page_count(app.state().articles.articles_count(), DEFAULT_PAGE_SIZE);
    Ok(Paginator::new(total, page))
}

pub fn render_page<S, T>(
    app: &App<S, T>,
    paginator: &Paginator,
    out: &mut impl Write,
) -> Result<(), CliError>
where
    S: KeyValueStorage,
    T: Transport,
{
    let articles = app.state().articles.articles();
    if articles.is_empty() {
        writeln!(out, "No articles yet.")?;
    }
    for line in format_article_lines(articles) {
        writeln!(out, "{line}")?;
    }
    writeln!(out)?;
    writeln!(out, "{}", format_pagination(paginator))?;
    Ok(())
}

pub async fn run_list<S, T>(
    app: &mut App<S, T>,
    page: u32,
    as_json: bool,
    out: &mut impl Write,
) -> Result<(), CliError>
where
    S: KeyValueStorage,
    T: Transport,
{
    let paginator = load_page(app, page, out).await?;

    if as_json {
        let items = app
            .state()
            .articles
            .articles()
            .iter()
            .map(article_to_list_item)
            .collect::<Vec<ArticleListItem>>();
        writeln!(out, "{}", serde_json::to_string_pretty(&items)?)?;
    } else {
        render_page(app, &paginator, out)?;
    }

    Ok(())
}
