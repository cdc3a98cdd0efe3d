// src/cli/args.rs
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)] // Read from `Cargo.toml`
#[command(arg_required_else_help = true, disable_help_subcommand = true)]
pub struct Args {
    /// Path to config file (optional)
    #[arg(short, long, value_name = "CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Verbosity level (-v = debug, -vv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Subcommand to execute (pull, push, or config)
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Replace a document with its note from DocBase
    Pull {
        /// Markdown document with a docbase_note_id in its front matter
        #[arg(value_name = "FILE")]
        path: PathBuf,
    },

    /// Send a document to DocBase
    Push {
        /// Markdown document to push
        #[arg(value_name = "FILE")]
        path: PathBuf,

        /// Create the note when the document has no docbase_note_id yet
        #[arg(long)]
        create: bool,
    },

    /// Show or change the stored DocBase settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Print the current settings (token masked)
    Show,

    /// Update one or more settings
    Set {
        /// DocBase access token
        #[arg(long)]
        token: Option<String>,

        /// DocBase team (subdomain)
        #[arg(long)]
        team: Option<String>,

        /// API base URL
        #[arg(long, value_name = "URL")]
        base_url: Option<String>,

        /// Request timeout in seconds
        #[arg(long, value_name = "SECONDS")]
        timeout_secs: Option<u64>,
    },
}
