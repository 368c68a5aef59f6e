mod config;
mod console;
mod menu;

use std::io;

use tracing::info;

use chirp_session::Session;

use crate::config::Config;
use crate::console::Console;

fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Logs go to stderr so they stay out of the prompts
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chirp=warn".into()),
        )
        .with_writer(io::stderr)
        .init();

    let config = Config::from_env()?;
    let store = config.backend.open(config.scheme)?;
    info!("Using {:?} with {} fingerprints", config.backend, config.scheme);

    let mut session = Session::open(store);

    let stdin = io::stdin();
    let mut console = Console::new(stdin.lock(), io::stdout().lock());
    menu::run(&mut session, &mut console)?;

    Ok(())
}
