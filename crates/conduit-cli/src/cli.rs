use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "conduit")]
#[command(about = "Read and write articles on a Conduit blog from the command line")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// API base URL (overrides CONDUIT_API_URL and the profile)
    #[arg(long, global = true, value_name = "URL")]
    pub api_url: Option<String>,

    /// Directory for the persisted session (overrides CONDUIT_DATA_DIR)
    #[arg(long, global = true, value_name = "PATH")]
    pub data_dir: Option<PathBuf>,

    /// CLI profile name
    #[arg(long, global = true, value_name = "NAME")]
    pub profile: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List one page of articles
    #[command(alias = "ls")]
    List {
        /// Page number, starting at 1
        #[arg(short, long, default_value = "1")]
        page: u32,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Page through articles interactively
    Browse {
        /// Page to start on
        #[arg(short, long, default_value = "1")]
        page: u32,
    },
    /// Show a single article
    Show {
        /// Article slug
        slug: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Publish a new article
    #[command(alias = "new")]
    Create {
        #[arg(long)]
        title: String,
        /// Short description
        #[arg(long)]
        description: String,
        /// Tag to attach; repeat for several
        #[arg(long = "tag", value_name = "TAG")]
        tags: Vec<String>,
        /// Markdown body (read from stdin or $EDITOR when omitted)
        #[arg(long)]
        body: Option<String>,
    },
    /// Edit an article you wrote
    Edit {
        /// Article slug
        slug: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        /// Replacement tags; repeat for several
        #[arg(long = "tag", value_name = "TAG")]
        tags: Vec<String>,
        /// Markdown body (opens $EDITOR when no field is given)
        #[arg(long)]
        body: Option<String>,
    },
    /// Delete an article you wrote
    Delete {
        /// Article slug
        slug: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Favorite an article
    #[command(alias = "like")]
    Favorite {
        /// Article slug
        slug: String,
    },
    /// Remove an article from favorites
    #[command(alias = "unlike")]
    Unfavorite {
        /// Article slug
        slug: String,
    },
    /// Sign in with email and password
    #[command(alias = "sign-in")]
    Login {
        #[arg(long, value_name = "EMAIL")]
        email: String,
        #[arg(long, value_name = "PASSWORD")]
        password: String,
    },
    /// Create a new account
    #[command(alias = "sign-up")]
    Register {
        #[arg(long)]
        username: String,
        #[arg(long, value_name = "EMAIL")]
        email: String,
        #[arg(long, value_name = "PASSWORD")]
        password: String,
        /// Defaults to --password
        #[arg(long, value_name = "PASSWORD")]
        repeat_password: Option<String>,
        /// Agree to the processing of personal information
        #[arg(long)]
        agree: bool,
    },
    /// Sign out and forget the stored session
    Logout,
    /// Edit your profile; omitted fields keep their current value
    Profile {
        #[arg(long)]
        username: Option<String>,
        #[arg(long, value_name = "EMAIL")]
        email: Option<String>,
        #[arg(long)]
        bio: Option<String>,
        /// New password
        #[arg(long, value_name = "PASSWORD")]
        password: Option<String>,
        /// Avatar image URL
        #[arg(long, value_name = "URL")]
        image: Option<String>,
    },
    /// Show the signed-in user
    Whoami,
    /// Configure CLI profiles
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// Generate shell completion scripts
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: CompletionShell,
        /// Optional output path (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Initialize or update a profile
    Init {
        /// Profile name to initialize
        #[arg(long = "name", value_name = "NAME")]
        name: Option<String>,
        /// Conduit API base URL
        #[arg(long, value_name = "URL")]
        api_base_url: Option<String>,
        /// Directory for the persisted session
        #[arg(long, value_name = "PATH")]
        session_dir: Option<PathBuf>,
        /// Keep current active profile instead of activating this one
        #[arg(long)]
        no_activate: bool,
    },
}
