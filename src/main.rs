use std::fs::File;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use snakegame::app::App;
use snakegame::config::{GameConfig, Settings};

fn main() -> Result<()> {
    let settings = Settings::from_env();

    // The terminal is in raw mode while playing, so logs go to a file
    let log_file = File::create(&settings.log_path)
        .with_context(|| format!("Error creating log file {:?}", settings.log_path))?;
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(Mutex::new(log_file))
        .with_ansi(false)
        .with_target(false)
        .init();

    let mut app = App::new(GameConfig::default(), settings.muted)?;
    app.play()
}
