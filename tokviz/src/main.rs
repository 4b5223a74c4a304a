mod commands;
mod print_tokens;

use clap::Parser;
use commands::{Cli, Commands};
use std::error::Error;
use std::io::{self, Read};
use tokenizer::{Pipeline, PipelineConfig, EXAMPLE_PROMPTS};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = load_config(&cli)?;
    debug!(?config, "pipeline configuration");
    let pipeline = Pipeline::from_config(&config);

    match cli.command {
        Commands::Tokenize {
            text,
            json,
            ids,
            inspect,
        } => {
            let text = read_text(&text)?;
            let tokens = pipeline.try_tokenize(&text).await?;
            if json {
                print_tokens::print_json(&tokens)?;
            } else if inspect {
                print_tokens::print_inspection(&tokens);
            } else {
                print_tokens::print_tokens(&tokens, ids);
            }
        }
        Commands::Ids { text } => {
            let text = read_text(&text)?;
            let tokens = pipeline.try_tokenize(&text).await?;
            print_tokens::print_ids(tokens);
        }
        Commands::Examples { run: None } => {
            print_tokens::print_examples();
        }
        Commands::Examples { run: Some(index) } => {
            let prompt = EXAMPLE_PROMPTS
                .get(index)
                .ok_or_else(|| format!("no example {} (0-{})", index, EXAMPLE_PROMPTS.len() - 1))?;
            info!(title = prompt.title, "tokenizing example");
            let tokens = pipeline.try_tokenize(prompt.text).await?;
            print_tokens::print_tokens(&tokens, false);
        }
    }

    Ok(())
}

/// Log to stderr; RUST_LOG overrides the default level
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Config file first, then command-line overrides
fn load_config(cli: &Cli) -> Result<PipelineConfig, Box<dyn Error>> {
    let mut config = match &cli.config {
        Some(path) => {
            info!(path = %path.display(), "loading config");
            PipelineConfig::from_file(path)?
        }
        None => PipelineConfig::default(),
    };
    if let Some(model) = &cli.model {
        config.preferred_model = model.clone();
    }
    if let Some(fallback) = &cli.fallback {
        config.fallback_encoding = fallback.clone();
    }
    if cli.timeout_ms.is_some() {
        config.encode_timeout_ms = cli.timeout_ms;
    }
    Ok(config)
}

/// `-` reads all of stdin
fn read_text(arg: &str) -> io::Result<String> {
    if arg != "-" {
        return Ok(arg.to_string());
    }
    let mut text = String::new();
    io::stdin().read_to_string(&mut text)?;
    Ok(text)
}
