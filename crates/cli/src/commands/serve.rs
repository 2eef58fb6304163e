//! `anigate serve` — Start the HTTP chat gateway.

use anyhow::Context;

use anigate_agent::Responder;
use anigate_config::AppConfig;

pub async fn run(port_override: Option<u16>) -> anyhow::Result<()> {
    let mut config = AppConfig::load().context("Failed to load config")?;

    if let Some(port) = port_override {
        config.gateway.port = port;
    }

    println!("Anigate gateway");
    println!("   Listening: {}:{}", config.gateway.host, config.gateway.port);
    println!("   Keys in pool: {}", config.api_keys.len());
    println!("   GitHub user: {}", config.github.username);

    let responder = Responder::from_config(&config).context("Failed to build responder")?;

    anigate_gateway::start(&config.gateway, responder)
        .await
        .map_err(|e| anyhow::anyhow!("Gateway failed: {e}"))?;

    Ok(())
}
