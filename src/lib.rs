pub mod aggregation;
pub mod cli;
pub mod db;
pub mod filter;
pub mod models;
pub mod parser;
pub mod recorder;
pub mod report;
pub mod sensing;
pub mod settings;
pub mod utils;

use anyhow::{Context, Result};
use log::{info, warn};
use tokio_util::sync::CancellationToken;

use cli::{Cli, Command};
use db::Database;
use recorder::Recorder;
use sensing::{CameraDisplay, LoopSettings};
use settings::Settings;

pub async fn run(cli: Cli) -> Result<()> {
    utils::logging::init_logging(cli.debug, cli.file_log)?;
    let settings = Settings::load(&cli.settings)?;

    match cli.command {
        Command::Run => run_capture(&settings, cli.dry_run).await,
        Command::Report => {
            let db = open_database(&settings)?;
            let recorder = if cli.dry_run {
                Recorder::dry_run()
            } else {
                Recorder::live(db.clone())
            };
            report::run_report(&db, &recorder).await.map(|_| ())
        }
    }
}

fn open_database(settings: &Settings) -> Result<Database> {
    let path = settings.app.database.path.clone();
    Database::new(path.clone())
        .with_context(|| format!("Failed to open database at {}", path.display()))
}

async fn run_capture(settings: &Settings, dry_run: bool) -> Result<()> {
    let recorder = if dry_run {
        info!("Dry run: readings are logged, not stored");
        Recorder::dry_run()
    } else {
        Recorder::live(open_database(settings)?)
    };

    let source = CameraDisplay::new(settings.camera.clone(), settings.ocr.clone());
    let cancel_token = CancellationToken::new();

    tokio::spawn({
        let cancel_token = cancel_token.clone();
        async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => info!("Interrupted, stopping after the current cycle"),
                Err(err) => warn!("Failed to listen for Ctrl-C: {err}"),
            }
            cancel_token.cancel();
        }
    });

    sensing::sensing_loop(
        &source,
        recorder,
        LoopSettings::from_settings(settings),
        cancel_token,
    )
    .await
}
