//! `anigate config` — Print the default configuration TOML.

use anigate_config::AppConfig;

pub fn run() {
    println!("# Default Anigate configuration");
    println!("# Save as {}", AppConfig::config_dir().join("config.toml").display());
    println!();
    print!("{}", AppConfig::default_toml());
}
