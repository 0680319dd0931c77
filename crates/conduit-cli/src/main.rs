//! Conduit CLI - read and write articles on a RealWorld blog from the terminal.

mod app;
mod cli;
mod commands;
mod config_profiles;
mod error;

#[cfg(test)]
mod tests;

use std::io::{self, IsTerminal};

use clap::Parser;
use conduit_core::validation::SignUpForm;

use crate::app::{App, Settings};
use crate::cli::{Cli, Commands};
use crate::commands::articles::{run_create, run_delete, run_edit, ArticleEdits};
use crate::commands::auth_cmd::{run_login, run_logout, run_register, run_whoami};
use crate::commands::browse::run_browse;
use crate::commands::completions::run_completions;
use crate::commands::config::run_config;
use crate::commands::favorite::run_favorite;
use crate::commands::list::run_list;
use crate::commands::profile::{run_profile, ProfileEdits};
use crate::commands::show::run_show;
use crate::error::CliError;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    let directive = "conduit=info"
        .parse()
        .map_err(|error| CliError::Config(format!("invalid log directive: {error}")))?;
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(directive))
        .init();

    let cli = Cli::parse();
    let mut out = io::stdout().lock();

    // Commands that never touch the session.
    let command = match cli.command {
        Commands::Config { command } => {
            return run_config(command, cli.profile.as_deref(), &mut out);
        }
        Commands::Completions { shell, output } => {
            return run_completions(shell, output.as_deref(), &mut out);
        }
        command => command,
    };

    let settings = Settings::resolve(cli.api_url, cli.data_dir, cli.profile.as_deref())?;
    tracing::debug!(
        "API {} with session in {}",
        settings.api_url,
        settings.data_dir.display()
    );
    let mut app = App::open(&settings)?;

    match command {
        Commands::List { page, json } => run_list(&mut app, page, json, &mut out).await,
        Commands::Browse { page } => {
            let clear_screen = io::stdout().is_terminal();
            let mut input = io::stdin().lock();
            run_browse(&mut app, page, &mut input, &mut out, clear_screen).await
        }
        Commands::Show { slug, json } => run_show(&mut app, &slug, json, &mut out).await,
        Commands::Create {
            title,
            description,
            tags,
            body,
        } => run_create(&mut app, title, description, tags, body, &mut out).await,
        Commands::Edit {
            slug,
            title,
            description,
            tags,
            body,
        } => {
            let edits = ArticleEdits {
                title,
                description,
                tags,
                body,
            };
            run_edit(&mut app, &slug, edits, &mut out).await
        }
        Commands::Delete { slug, yes } => {
            let mut input = io::stdin().lock();
            run_delete(&mut app, &slug, yes, &mut input, &mut out).await
        }
        Commands::Favorite { slug } => run_favorite(&mut app, &slug, true, &mut out).await,
        Commands::Unfavorite { slug } => run_favorite(&mut app, &slug, false, &mut out).await,
        Commands::Login { email, password } => run_login(&mut app, email, password, &mut out).await,
        Commands::Register {
            username,
            email,
            password,
            repeat_password,
            agree,
        } => {
            let form = SignUpForm {
                username,
                email,
                repeat_password: repeat_password.unwrap_or_else(|| password.clone()),
                password,
                agree,
            };
            run_register(&mut app, form, &mut out).await
        }
        Commands::Logout => run_logout(&mut app, &mut out),
        Commands::Profile {
            username,
            email,
            bio,
            password,
            image,
        } => {
            let edits = ProfileEdits {
                username,
                email,
                bio,
                password,
                image,
            };
            run_profile(&mut app, edits, &mut out).await
        }
        Commands::Whoami => run_whoami(&app, &mut out),
        Commands::Config { .. } | Commands::Completions { .. } => Ok(()),
    }
}
