//! CLI module for tubeqa.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use clap::{Parser, Subcommand};

/// tubeqa - Ask questions about a YouTube video
///
/// Fetches a video's transcript, indexes it, and answers questions from it,
/// falling back to general knowledge when the video doesn't cover the question.
#[derive(Parser, Debug)]
#[command(name = "tubeqa")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "TUBEQA_CONFIG")]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Serve the single-page web app
    Serve {
        /// Host to bind to (default from config)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to (default from config)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Start an interactive terminal session
    Chat {
        /// Video to process before the first question
        #[arg(long)]
        video: Option<String>,
    },

    /// Process a video and answer a single question
    Ask {
        /// YouTube video ID or URL
        video: String,

        /// The question to ask
        question: String,

        /// LLM model to use for answer generation
        #[arg(short, long)]
        model: Option<String>,

        /// Number of transcript segments to retrieve
        #[arg(short = 'k', long)]
        top_k: Option<usize>,
    },

    /// Inspect configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,
}
