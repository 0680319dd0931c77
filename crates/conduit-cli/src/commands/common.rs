use std::env;
use std::io::{self, BufRead, IsTerminal, Read, Write};
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{DateTime, Utc};
use conduit_core::pagination::Paginator;
use conduit_core::render::{
    format_date, render_markdown, visible_tags, DETAIL_TAG_LIMIT, LIST_TAG_LIMIT,
};
use conduit_core::util::preview;
use conduit_core::Article;
use serde::Serialize;

use crate::error::CliError;

/// Shown in place of any view whose container holds an error.
pub const NO_DATA_MESSAGE: &str = "Error! No data received!";

#[derive(Debug, Serialize)]
pub struct ArticleListItem {
    pub slug: String,
    pub title: String,
    pub description: Option<String>,
    pub author: String,
    pub created_at: Option<DateTime<Utc>>,
    pub favorited: bool,
    pub favorites_count: u32,
    pub tags: Vec<String>,
}

pub fn article_to_list_item(article: &Article) -> ArticleListItem {
    ArticleListItem {
        slug: article.slug.clone(),
        title: article.title_or_default().to_string(),
        description: article.description.clone(),
        author: article.author_name().to_string(),
        created_at: article.created_at,
        favorited: article.favorited,
        favorites_count: article.favorites_count,
        tags: article.tags().to_vec(),
    }
}

fn heart(article: &Article) -> &'static str {
    if article.favorited {
        "♥"
    } else {
        "♡"
    }
}

fn byline(article: &Article) -> String {
    article.created_at.as_ref().map_or_else(
        || article.author_name().to_string(),
        |date| format!("{} · {}", article.author_name(), format_date(date)),
    )
}

fn tag_line(article: &Article, limit: usize) -> Option<String> {
    let tags = visible_tags(article.tags(), limit);
    if tags.is_empty() {
        None
    } else {
        Some(
            tags.iter()
                .map(|tag| format!("[{tag}]"))
                .collect::<Vec<_>>()
                .join(" "),
        )
    }
}

pub fn format_article_lines(articles: &[Article]) -> Vec<String> {
    let mut lines = Vec::new();
    for (index, article) in articles.iter().enumerate() {
        if index > 0 {
            lines.push(String::new());
        }
        lines.push(format!(
            "{} {:<3} {}",
            heart(article),
            article.favorites_count,
            article.title_or_default()
        ));
        if let Some(tags) = tag_line(article, LIST_TAG_LIMIT) {
            lines.push(format!("      {tags}"));
        }
        if let Some(description) = article.description.as_deref() {
            let description = preview(description, 80);
            if !description.is_empty() {
                lines.push(format!("      {description}"));
            }
        }
        lines.push(format!("      {}  ({})", byline(article), article.slug));
    }
    lines
}

/// Full article view; `viewer` is the signed-in username, if any.
pub fn format_article_detail(article: &Article, viewer: Option<&str>) -> Vec<String> {
    let title = article.title_or_default();
    let mut lines = vec![
        title.to_string(),
        "=".repeat(title.chars().count().max(3)),
        format!("{} {}", heart(article), article.favorites_count),
    ];
    if let Some(tags) = tag_line(article, DETAIL_TAG_LIMIT) {
        lines.push(tags);
    }
    lines.push(byline(article));
    if viewer.is_some_and(|username| article.is_authored_by(username)) {
        lines.push(format!(
            "You wrote this: `conduit edit {0}` / `conduit delete {0}`",
            article.slug
        ));
    }
    if let Some(description) = article.description.as_deref() {
        lines.push(String::new());
        lines.push(description.trim().to_string());
    }
    if let Some(body) = article.body.as_deref() {
        let rendered = render_markdown(body);
        if !rendered.is_empty() {
            lines.push(String::new());
            lines.extend(rendered.lines().map(ToString::to_string));
        }
    }
    lines
}

/// One-line pager such as `< 1 2 [3] 4 5 >`; disabled arrows are blanked.
pub fn format_pagination(paginator: &Paginator) -> String {
    let previous = if paginator.is_first() { " " } else { "<" };
    let next = if paginator.is_last() { " " } else { ">" };
    let pages = paginator
        .window()
        .map(|page| {
            if page == paginator.current() {
                format!("[{page}]")
            } else {
                page.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ");
    format!("{previous} {pages} {next}")
}

pub fn normalize_content(content: &str) -> Option<String> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

pub fn normalize_slug(slug: &str) -> Result<String, CliError> {
    let trimmed = slug.trim();
    if trimmed.is_empty() {
        Err(CliError::EmptySlug)
    } else {
        Ok(trimmed.to_string())
    }
}

/// Body from the flag, then piped stdin, then `$EDITOR`.
pub fn resolve_body(body: Option<String>) -> Result<String, CliError> {
    if let Some(body) = body.as_deref().and_then(normalize_content) {
        return Ok(body);
    }
    if let Some(body) = read_piped_stdin()? {
        return Ok(body);
    }
    capture_editor_input_with_initial("")?.ok_or(CliError::EmptyBody)
}

pub fn read_piped_stdin() -> Result<Option<String>, CliError> {
    let stdin = io::stdin();
    if stdin.is_terminal() {
        return Ok(None);
    }

    let mut buffer = String::new();
    stdin.lock().read_to_string(&mut buffer)?;
    Ok(normalize_content(&buffer))
}

/// Ask a yes/no question; anything but `y`/`yes` is a no.
pub fn confirm(question: &str, input: &mut impl BufRead, out: &mut impl Write) -> io::Result<bool> {
    write!(out, "{question} [y/N] ")?;
    out.flush()?;
    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(matches!(
        answer.trim().to_ascii_lowercase().as_str(),
        "y" | "yes"
    ))
}

pub fn capture_editor_input_with_initial(
    initial_content: &str,
) -> Result<Option<String>, CliError> {
    let editor = preferred_editor();
    let temp_file = create_temp_article_file_path();
    std::fs::write(&temp_file, initial_content)?;

    let launch_result = launch_editor(&editor, &temp_file);
    let content = std::fs::read_to_string(&temp_file)?;
    let _ = std::fs::remove_file(&temp_file);

    launch_result?;
    Ok(normalize_content(&content))
}

pub fn launch_editor(editor: &str, file_path: &Path) -> Result<(), CliError> {
    let status = match Command::new(editor).arg(file_path).status() {
        Ok(status) => status,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            // EDITOR may carry arguments, e.g. "code --wait".
            let mut parts = editor.split_whitespace();
            let Some(program) = parts.next() else {
                return Err(CliError::EditorFailed("empty EDITOR command".into()));
            };
            Command::new(program).args(parts).arg(file_path).status()?
        }
        Err(err) => return Err(CliError::Io(err)),
    };

    if status.success() {
        Ok(())
    } else {
        Err(CliError::EditorFailed(format!(
            "`{editor}` exited with status {status}"
        )))
    }
}

pub fn preferred_editor() -> String {
    env::var("VISUAL")
        .or_else(|_| env::var("EDITOR"))
        .unwrap_or_else(|_| default_editor().to_string())
}

pub const fn default_editor() -> &'static str {
    if cfg!(windows) {
        "notepad"
    } else {
        "vi"
    }
}

fn create_temp_article_file_path() -> PathBuf {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |duration| duration.as_nanos());
    env::temp_dir().join(format!("conduit-article-{}-{now}.md", std::process::id()))
}
