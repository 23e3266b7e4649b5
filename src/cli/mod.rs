//! CLI module for AI-Attorney
//!
//! Provides command-line interface parsing and handling for the `ai-attorney`
//! binary. Uses clap for argument parsing and owo-colors for colored terminal
//! output.
//!
//! Every command behaves like loading one page of the application: the
//! session is activated from the store, the route guard decides what the page
//! may show, and only then does the command do its work.

pub mod commands;
pub mod output;
pub mod page;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// AI-Attorney - AI for legal help
///
/// Document insights, legal guidance and lawyer discovery from the terminal.
#[derive(Parser, Debug)]
#[command(
    name = "ai-attorney",
    version,
    about = "AI-Attorney - AI for legal help",
    long_about = "Your AI powered legal assistant for document insights, legal guidance,\n\
                  and lawyer discovery.\n\n\
                  Log in with the demo account (admin / password) or register your own.",
    after_help = "EXAMPLES:\n    \
                  ai-attorney login admin -p password\n    \
                  ai-attorney guidance \"My landlord kept my deposit\"\n    \
                  ai-attorney summarize contract.txt\n    \
                  ai-attorney lawyers --location pune --specialization \"Family Law\"\n    \
                  ai-attorney logout"
)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "ai-attorney.toml", global = true)]
    pub config: PathBuf,

    /// Override the session store file
    #[arg(long, env = "AI_ATTORNEY_STORE", global = true)]
    pub store: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the current session status
    Status,

    /// Log in (admin / password, or any registered username)
    Login {
        username: String,

        #[arg(short, long, default_value = "")]
        password: String,
    },

    /// Register a demo account and log in
    Register {
        username: String,

        #[arg(short, long)]
        password: String,

        /// Repeat the password
        #[arg(long)]
        confirm: String,
    },

    /// Log out
    Logout,

    /// List registered demo accounts
    Users,

    /// Show what the route guard does for a path
    Visit {
        /// Path to open, e.g. /legal-guidance
        path: String,
    },

    /// Get legal guidance for a situation (Indian law)
    Guidance {
        /// Description of the situation
        #[arg(required = true, num_args = 1..)]
        situation: Vec<String>,
    },

    /// Summarize a legal document
    Summarize {
        /// Text file with the document content
        file: PathBuf,

        /// Also suggest next steps from the summary
        #[arg(long)]
        next_steps: bool,
    },

    /// Suggest next steps for a document summary
    NextSteps {
        #[arg(required = true, num_args = 1..)]
        summary: Vec<String>,
    },

    /// Generate an image for a prompt
    Image {
        /// Visual description; empty uses the fallback
        #[arg(default_value = "")]
        prompt: String,

        #[arg(long)]
        width: Option<u32>,

        #[arg(long)]
        height: Option<u32>,

        /// Image to show if generation fails
        #[arg(long)]
        fallback: Option<String>,
    },

    /// Find lawyers by location and/or specialization
    Lawyers {
        #[arg(short, long)]
        location: Option<String>,

        #[arg(short, long)]
        specialization: Option<String>,

        /// Generate a portrait for each result
        #[arg(long)]
        portraits: bool,
    },

    /// Show the effective configuration
    Config,
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
