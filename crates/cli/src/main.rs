//! Tika CLI — the main entry point.
//!
//! Commands:
//! - `onboard`  — Initialize config and knowledge directories
//! - `chat`     — Interactive, single-question, or spoken-question mode
//! - `ingest`   — Build the knowledge index from a folder of documents
//! - `lexicon`  — Inspect the topic lexicon and classify sample text

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(
    name = "tika",
    about = "Tika — multilingual vaccination voice assistant",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize configuration and knowledge directories
    Onboard,

    /// Ask vaccination questions
    Chat {
        /// Ask a single question instead of entering interactive mode
        #[arg(short, long)]
        message: Option<String>,

        /// Answer language (e.g. hindi, english, tamil)
        #[arg(short, long, env = "TIKA_LANGUAGE")]
        language: Option<String>,

        /// Transcribe this recording and answer it
        #[arg(short, long, conflicts_with = "message")]
        audio: Option<PathBuf>,

        /// Where to write the spoken answer in audio mode
        #[arg(short, long, default_value = "answer.mp3")]
        output: PathBuf,

        /// Print the full turn outcome as JSON (single-question mode)
        #[arg(long)]
        json: bool,
    },

    /// Build the knowledge index from .txt / .md documents
    Ingest {
        /// A document or a directory of documents
        path: PathBuf,

        /// Index file to write (defaults to the configured index path)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Store chunks without embeddings (keyword retrieval only)
        #[arg(long)]
        no_embed: bool,
    },

    /// Show the topic lexicon, or classify a sample utterance
    Lexicon {
        /// Only show this language
        #[arg(short, long)]
        language: Option<String>,

        /// Classify this text as trigger / follow-up / rejection
        #[arg(short, long)]
        check: Option<String>,

        /// Print the resolved lexicon as TOML
        #[arg(long)]
        export: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Logs go to stderr so answers on stdout stay clean
    let filter = if cli.verbose { "debug" } else { "warn" };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter));
    if cli.json_logs {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }

    match cli.command {
        Commands::Onboard => commands::onboard::run().await?,
        Commands::Chat {
            message,
            language,
            audio,
            output,
            json,
        } => {
            let options = commands::chat::ChatOptions {
                message,
                language,
                audio,
                output,
                json,
            };
            commands::chat::run(options).await?
        }
        Commands::Ingest {
            path,
            output,
            no_embed,
        } => commands::ingest::run(path, output, no_embed).await?,
        Commands::Lexicon {
            language,
            check,
            export,
        } => commands::lexicon::run(language, check, export).await?,
    }

    Ok(())
}
