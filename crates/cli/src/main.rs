//! Anigate CLI — the main entry point.
//!
//! Commands:
//! - `serve`  — Start the HTTP chat gateway
//! - `chat`   — Send a single message and print the reply
//! - `config` — Print the default configuration TOML

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "anigate",
    about = "Anigate — persona chat relay with key rotation and cached GitHub context",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP chat gateway
    Serve {
        /// Override the port
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Send a single message through the pipeline and print the reply
    Chat {
        /// The message to send
        #[arg(short, long)]
        message: String,
    },

    /// Print the default configuration TOML
    Config,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Keys are usually supplied via a .env file during development
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    match cli.command {
        Commands::Serve { port } => commands::serve::run(port).await?,
        Commands::Chat { message } => commands::chat::run(&message).await?,
        Commands::Config => commands::config_cmd::run(),
    }

    Ok(())
}
