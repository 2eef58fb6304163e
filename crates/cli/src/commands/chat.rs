//! `anigate chat` — Send a single message and print the reply.

use anyhow::Context;

use anigate_agent::Responder;
use anigate_config::AppConfig;

pub async fn run(message: &str) -> anyhow::Result<()> {
    let config = AppConfig::load().context("Failed to load config")?;
    let responder = Responder::from_config(&config).context("Failed to build responder")?;

    let reply = responder.respond(message).await;
    println!("{reply}");

    Ok(())
}
