use anyhow::{Context, Result};
use env_logger::{Builder, Env, Target};
use light_panel::{
    clock::LocalClock,
    config::AppConfig,
    device_client::DeviceClient,
    shell::Shell,
    terminal::TerminalView,
};
use log::{error, info};
use std::io::{Write, stdout};
use tokio::io::{BufReader, stdin};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("application error: {e:#}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    initialize();

    let config = AppConfig::load().context("failed to load configuration")?;
    info!(
        "controlling device at {} (api prefix: {})",
        config.device.base_url,
        config.panel.api_prefix.as_deref().unwrap_or("none")
    );

    let clock = match config.time_zone {
        Some(zone) => LocalClock::new(Some(zone)),
        None => LocalClock::system(),
    };
    info!("time zone: {:?}", clock.time_zone());

    let client = DeviceClient::new(&config.device).context("failed to create device client")?;
    let mut shell = Shell::new(client, TerminalView::new(stdout())).with_clock(clock);

    shell
        .run(config.panel, BufReader::new(stdin()))
        .await
        .context("panel stopped unexpectedly")
}

fn initialize() {
    log_panics::init();

    let mut builder = if cfg!(debug_assertions) {
        Builder::from_env(Env::default().default_filter_or("debug"))
    } else {
        Builder::from_env(Env::default().default_filter_or("info"))
    };

    builder.format(|f, record| match record.level() {
        log::Level::Error => {
            eprintln!("{}", record.args());
            Ok(())
        }
        _ => {
            writeln!(f, "{}", record.args())
        }
    });

    // stdout belongs to the panel
    builder.target(Target::Stderr).init();

    info!("module version: {}", env!("CARGO_PKG_VERSION"));
}
