use std::io::{BufRead, Write};

use conduit_core::api::Transport;
use conduit_core::pagination::{PageView, Paginator};
use conduit_core::persist::KeyValueStorage;

use crate::app::App;
use crate::commands::list::{load_page, render_page};
use crate::error::CliError;

const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";
const HELP: &str = "n: next  p: previous  f: first  l: last  <number>: go to page  q: quit";

/// Terminal side of the pager: remembers the page to fetch next.
struct BrowseView<'a, W: Write> {
    out: &'a mut W,
    clear_screen: bool,
    requested: Option<u32>,
}

impl<W: Write> PageView for BrowseView<'_, W> {
    fn set_page(&mut self, page: u32) {
        self.requested = Some(page);
    }

    fn scroll_to_top(&mut self) {
        if self.clear_screen {
            if let Err(error) = write!(self.out, "{CLEAR_SCREEN}") {
                tracing::debug!("Failed to clear the screen: {}", error);
            }
        }
    }
}

enum BrowseCommand {
    Go(i64),
    Quit,
    Help,
}

fn parse_command(line: &str, paginator: &Paginator) -> BrowseCommand {
    let current = i64::from(paginator.current());
    match line.trim().to_ascii_lowercase().as_str() {
        "q" | "quit" | "exit" => BrowseCommand::Quit,
        "n" | "next" | "" => BrowseCommand::Go(current + 1),
        "p" | "prev" | "previous" => BrowseCommand::Go(current - 1),
        "f" | "first" => BrowseCommand::Go(1),
        "l" | "last" => BrowseCommand::Go(i64::from(paginator.total_pages())),
        other => other
            .parse::<i64>()
            .map_or(BrowseCommand::Help, BrowseCommand::Go),
    }
}

/// Interactive pager reading commands from `input` until `q` or end of input.
pub async fn run_browse<S, T>(
    app: &mut App<S, T>,
    start_page: u32,
    input: &mut impl BufRead,
    out: &mut impl Write,
    clear_screen: bool,
) -> Result<(), CliError>
where
    S: KeyValueStorage,
    T: Transport,
{
    let mut page = start_page.max(1);
    let mut paginator = load_page(app, page, out).await?;
    render_page(app, &paginator, out)?;

    loop {
        write!(out, "page {}/{}> ", paginator.current(), paginator.total_pages())?;
        out.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            writeln!(out)?;
            break;
        }

        let target = match parse_command(&line, &paginator) {
            BrowseCommand::Quit => break,
            BrowseCommand::Help => {
                writeln!(out, "{HELP}")?;
                continue;
            }
            BrowseCommand::Go(target) => target,
        };

        let mut view = BrowseView {
            out: &mut *out,
            clear_screen,
            requested: None,
        };
        if !paginator.go_to(target, &mut view) {
            continue;
        }
        if let Some(requested) = view.requested {
            page = requested;
        }

        paginator = load_page(app, page, out).await?;
        render_page(app, &paginator, out)?;
    }

    Ok(())
}
