use std::{path::PathBuf, sync::mpsc, thread};

use anyhow::{anyhow, Context, Result};
use log::{error, info};
use rusqlite::Connection;
use tokio::sync::oneshot;

use super::migrations::run_migrations;

type DbTask = Box<dyn FnOnce(&mut Connection) + Send + 'static>;

/// Handle to the SQLite store.
///
/// The connection lives on a dedicated thread and every call is a closure
/// shipped to it, one at a time. The thread exits once the last handle is
/// dropped.
#[derive(Clone)]
pub struct Database {
    sender: mpsc::Sender<DbTask>,
}

impl Database {
    /// Opens (creating if needed) and migrates the store before the worker starts,
    /// so schema problems surface here rather than on the first write.
    pub fn new(db_path: PathBuf) -> Result<Self> {
        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("failed to create database directory {}", parent.display())
            })?;
        }

        let mut conn = Connection::open(&db_path)
            .with_context(|| format!("failed to open SQLite database {}", db_path.display()))?;
        if let Err(err) = conn.pragma_update(None, "journal_mode", "WAL") {
            error!("Failed to enable WAL mode: {err}");
        }
        run_migrations(&mut conn).context("failed to run database migrations")?;

        let (sender, receiver) = mpsc::channel::<DbTask>();
        thread::Builder::new()
            .name("boiler-db".into())
            .spawn(move || {
                while let Ok(task) = receiver.recv() {
                    task(&mut conn);
                }
                info!("Database thread shutting down");
            })
            .context("failed to spawn database worker thread")?;

        info!("Database initialized at {}", db_path.display());
        Ok(Self { sender })
    }

    pub async fn execute<F, T>(&self, task: F) -> Result<T>
    where
        F: FnOnce(&mut Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.sender
            .send(Box::new(move |conn| {
                if reply_tx.send(task(conn)).is_err() {
                    error!("DB caller dropped before receiving result");
                }
            }))
            .map_err(|_| anyhow!("database thread is gone"))?;

        reply_rx
            .await
            .map_err(|_| anyhow!("database thread terminated unexpectedly"))?
    }
}
