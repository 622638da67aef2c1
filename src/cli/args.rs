//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--debug`: Enable debug logging
//! - `--quiet` / `-q`: Minimal output
//! - `--api-url <url>`: Override the backend base URL

use clap::{Parser, Subcommand, ValueEnum};

use crate::api::Resource;

/// partnerlink - client for the student-partnership backend
#[derive(Parser, Debug)]
#[command(name = "partnerlink")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Minimal output; disables prompts
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Backend API base URL (overrides config and PARTNERLINK_API_URL)
    #[arg(long, global = true, value_name = "URL")]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }

    /// True when prompts may be shown.
    pub fn interactive(&self) -> bool {
        use std::io::IsTerminal;
        !self.quiet && std::io::stdin().is_terminal()
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Sign in, sign out, and inspect the session
    #[command(
        name = "auth",
        long_about = "Sign in, sign out, and inspect the stored session.\n\n\
            Signing in exchanges a Google identity token for a backend session. \
            The bearer token is refreshed automatically when it expires; if the \
            refresh is rejected you are signed out and must sign in again.",
        after_help = "\
EXAMPLES:
    # Sign in (prompts for the identity token)
    partnerlink auth login

    # Sign in non-interactively
    partnerlink auth login --id-token \"$GOOGLE_ID_TOKEN\"

    # Check whether a session is stored
    partnerlink auth status

    # Revoke the session and clear local state
    partnerlink auth logout"
    )]
    Auth {
        #[command(subcommand)]
        action: AuthAction,
    },

    /// Read and modify partners, projects, contacts, and activities
    #[command(
        name = "resource",
        after_help = "\
EXAMPLES:
    partnerlink resource list partners
    partnerlink resource get project 12
    partnerlink resource create contact --data '{\"name\":\"Ana\"}'
    partnerlink resource update contact 3 --data '{\"name\":\"Ana M.\"}'
    partnerlink resource delete activity 9
    partnerlink resource activities-for 4"
    )]
    Resource {
        #[command(subcommand)]
        action: ResourceAction,
    },

    /// Read backend users
    Users {
        #[command(subcommand)]
        action: UsersAction,
    },

    /// Show or change configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completion scripts
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Auth subcommands.
#[derive(Subcommand, Debug)]
pub enum AuthAction {
    /// Exchange an identity token for a backend session
    Login {
        /// Google identity token (prompted for when omitted)
        #[arg(long, value_name = "TOKEN")]
        id_token: Option<String>,
    },

    /// Revoke the session and clear stored credentials
    Logout,

    /// Show whether a session is stored
    Status,

    /// Show the signed-in user's profile from the backend
    Whoami,
}

/// Resource subcommands.
#[derive(Subcommand, Debug)]
pub enum ResourceAction {
    /// List every record of a kind
    List {
        #[arg(value_enum)]
        kind: Resource,
    },

    /// Show one record
    Get {
        #[arg(value_enum)]
        kind: Resource,
        id: u64,
    },

    /// Create a record from JSON
    Create {
        #[arg(value_enum)]
        kind: Resource,

        /// Record body as JSON
        #[arg(long, value_name = "JSON")]
        data: String,
    },

    /// Replace a record with JSON
    Update {
        #[arg(value_enum)]
        kind: Resource,
        id: u64,

        /// Record body as JSON
        #[arg(long, value_name = "JSON")]
        data: String,
    },

    /// Delete a record
    Delete {
        #[arg(value_enum)]
        kind: Resource,
        id: u64,
    },

    /// List activities recorded against a partner
    ActivitiesFor {
        /// Partner id
        partner_id: u64,
    },
}

/// Users subcommands.
#[derive(Subcommand, Debug)]
pub enum UsersAction {
    /// List users
    List,

    /// Show one user
    Get { id: u64 },
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Print the resolved configuration
    Show,

    /// Persist the backend base URL
    SetApiUrl {
        /// Absolute http(s) URL, e.g. https://backend.example/api
        url: String,
    },
}

/// Supported shells for completion.
#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    #[value(name = "powershell")]
    PowerShell,
}
