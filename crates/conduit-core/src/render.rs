//! Plain-text rendering for the terminal front end.

use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;

/// Tags shown per article in the list view.
pub const LIST_TAG_LIMIT: usize = 5;
/// Tags shown on the article page.
pub const DETAIL_TAG_LIMIT: usize = 20;

/// Format a timestamp as `March 5, 2024`.
pub fn format_date(date: &DateTime<Utc>) -> String {
    date.format("%B %-d, %Y").to_string()
}

/// At most `limit` tags, skipping blank entries.
pub fn visible_tags(tags: &[String], limit: usize) -> Vec<&str> {
    tags.iter()
        .map(|tag| tag.trim())
        .filter(|tag| !tag.is_empty())
        .take(limit)
        .collect()
}

fn image_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"!\[([^\]]*)\]\(([^)\s]+)[^)]*\)").expect("Invalid regex"))
}

fn link_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\[([^\]]+)\]\(([^)\s]+)[^)]*\)").expect("Invalid regex"))
}

fn strong_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\*\*|__)(\S(?:.*?\S)?)(\*\*|__)").expect("Invalid regex"))
}

fn emphasis_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(^|[^\w*])[*_](\S(?:[^*_]*?\S)?)[*_]($|[^\w*])").expect("Invalid regex")
    })
}

fn strike_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"~~(.+?)~~").expect("Invalid regex"))
}

fn ordered_item_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\s*)(\d+)[.)]\s+(.*)$").expect("Invalid regex"))
}

fn bullet_item_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\s*)[-*+]\s+(.*)$").expect("Invalid regex"))
}

fn rule_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*([-*_])(\s*([-*_])){2,}\s*$").expect("Invalid regex"))
}

/// Render a markdown body as plain terminal text.
///
/// Block structure (headings, fenced code, quotes, lists, rules) is kept as
/// layout; inline markup is stripped except for code spans. Links become
/// `text (url)` and images `[image: alt] (url)`.
pub fn render_markdown(source: &str) -> String {
    let mut out: Vec<String> = Vec::new();
    let mut in_fence = false;

    for line in source.lines() {
        let trimmed = line.trim_start();

        if trimmed.starts_with("```") || trimmed.starts_with("~~~") {
            in_fence = !in_fence;
            continue;
        }
        if in_fence {
            out.push(format!("    {line}"));
            continue;
        }

        if trimmed.is_empty() {
            if out.last().is_some_and(|previous| !previous.is_empty()) {
                out.push(String::new());
            }
            continue;
        }

        if rule_regex().is_match(line) {
            out.push("-".repeat(40));
            continue;
        }

        if let Some(heading) = heading(trimmed) {
            let text = render_inline(heading.1);
            let underline = if heading.0 == 1 { '=' } else { '-' };
            out.push(text.clone());
            out.push(underline.to_string().repeat(text.chars().count()));
            continue;
        }

        if let Some(quoted) = trimmed.strip_prefix('>') {
            out.push(format!("| {}", render_inline(quoted.trim_start())));
            continue;
        }

        if let Some(captures) = bullet_item_regex().captures(line) {
            let indent = captures[1].len();
            out.push(format!(
                "{}* {}",
                " ".repeat(indent),
                render_inline(&captures[2])
            ));
            continue;
        }

        if let Some(captures) = ordered_item_regex().captures(line) {
            let indent = captures[1].len();
            out.push(format!(
                "{}{}. {}",
                " ".repeat(indent),
                &captures[2],
                render_inline(&captures[3])
            ));
            continue;
        }

        out.push(render_inline(trimmed));
    }

    while out.last().is_some_and(String::is_empty) {
        out.pop();
    }
    out.join("\n")
}

fn heading(line: &str) -> Option<(usize, &str)> {
    let level = line.chars().take_while(|c| *c == '#').count();
    if level == 0 || level > 6 {
        return None;
    }
    let rest = &line[level..];
    if !rest.is_empty() && !rest.starts_with(' ') {
        return None;
    }
    Some((level, rest.trim().trim_end_matches('#').trim_end()))
}

/// Strip inline markup outside of code spans.
fn render_inline(text: &str) -> String {
    text.split('`')
        .enumerate()
        .map(|(index, part)| {
            if index % 2 == 1 {
                format!("`{part}`")
            } else {
                strip_inline(part)
            }
        })
        .collect()
}

fn strip_inline(text: &str) -> String {
    let text = image_regex().replace_all(text, "[image: $1] ($2)");
    let text = link_regex().replace_all(&text, "$1 ($2)");
    let text = strong_regex().replace_all(&text, "$2");
    let text = emphasis_regex().replace_all(&text, "$1$2$3");
    let text = strike_regex().replace_all(&text, "$1");
    text.into_owned()
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn formats_dates_without_padding() {
        let date = Utc.with_ymd_and_hms(2024, 3, 5, 10, 0, 0).unwrap();
        assert_eq!(format_date(&date), "March 5, 2024");
    }

    #[test]
    fn visible_tags_respects_limit() {
        let tags: Vec<String> = ["a", " ", "b", "c", "d", "e", "f"]
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(visible_tags(&tags, LIST_TAG_LIMIT), vec!["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn renders_block_structure() {
        let source = "# Title\n\nSome **bold** and *soft* text.\n\n- one\n- two\n\n1. first\n\n> quoted\n\n---";
        let expected = "Title\n=====\n\nSome bold and soft text.\n\n* one\n* two\n\n1. first\n\n| quoted\n\n----------------------------------------";
        assert_eq!(render_markdown(source), expected);
    }

    #[test]
    fn renders_links_and_images() {
        assert_eq!(
            render_markdown("See [docs](https://example.com) ![logo](https://example.com/l.png)"),
            "See docs (https://example.com) [image: logo] (https://example.com/l.png)"
        );
    }

    #[test]
    fn keeps_code_untouched() {
        let source = "Use `**raw**` here\n```\nlet x = *y;\n```";
        assert_eq!(
            render_markdown(source),
            "Use `**raw**` here\n    let x = *y;"
        );
    }

    #[test]
    fn subheadings_use_dashes() {
        assert_eq!(render_markdown("## Part _two_"), "Part two\n--------");
    }

    #[test]
    fn snake_case_words_survive() {
        assert_eq!(render_markdown("call snake_case_name now"), "call snake_case_name now");
    }
}
