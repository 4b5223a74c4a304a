use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "tokviz")]
#[command(about = "Show how text is split into tokens")]
pub struct Cli {
    /// JSON pipeline configuration
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Model whose encoding is tried first
    #[arg(long, global = true)]
    pub model: Option<String>,

    /// Encoding used when the model cannot be resolved
    #[arg(long, global = true)]
    pub fallback: Option<String>,

    /// Upper bound for one encode call, in milliseconds
    #[arg(long, global = true)]
    pub timeout_ms: Option<u64>,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the tokens of TEXT as colored chips
    Tokenize {
        /// Text to tokenize, or `-` to read stdin
        text: String,

        /// Print the token records as JSON
        #[arg(long)]
        json: bool,

        /// Show each token's id next to it
        #[arg(long)]
        ids: bool,

        /// Print one line per token with its bytes and codepoints
        #[arg(long)]
        inspect: bool,
    },

    /// Print the token ids of TEXT, comma separated
    Ids {
        /// Text to tokenize, or `-` to read stdin
        text: String,
    },

    /// List the example prompts, or tokenize one of them
    Examples {
        /// Index of the example to tokenize
        #[arg(long)]
        run: Option<usize>,
    },
}
