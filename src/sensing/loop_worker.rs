use anyhow::{bail, Context, Result};
use chrono::{DateTime, Local};
use tokio::time::{Duration, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::{
    filter::{FilterAction, FilterState},
    parser,
    recorder::Recorder,
    settings::Settings,
};

use super::{CaptureError, DisplaySource};

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

// Import the logging macros (exported at crate root)
use crate::{log_error, log_info, log_warn};

const CAPTURE_TIMEOUT_SECS: u64 = 30;
const MIN_PERIOD: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopSettings {
    pub period: Duration,
    pub connection_attempts: u32,
    pub retry_delay: Duration,
    pub capture_timeout: Duration,
}

impl LoopSettings {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            period: Duration::from_secs(settings.app.wait).max(MIN_PERIOD),
            connection_attempts: settings.camera.connection_attempts.max(1),
            retry_delay: Duration::from_secs(settings.camera.retry_delay_secs),
            capture_timeout: Duration::from_secs(CAPTURE_TIMEOUT_SECS),
        }
    }
}

/// Polls `source` once per period until cancelled.
///
/// Returns an error when the capture tooling can't be started at all, or when
/// the camera stays unreachable for `connection_attempts` consecutive cycles.
pub async fn sensing_loop<S: DisplaySource + ?Sized>(
    source: &S,
    recorder: Recorder,
    settings: LoopSettings,
    cancel_token: CancellationToken,
) -> Result<()> {
    let mut ticker = tokio::time::interval(settings.period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut state = FilterState::new();
    let mut camera_failures: u32 = 0;

    log_info!(
        "sensing loop started (period {}s, dry run: {})",
        settings.period.as_secs(),
        recorder.is_dry_run()
    );

    loop {
        tokio::select! {
            biased;

            _ = cancel_token.cancelled() => {
                log_info!("sensing loop shutting down");
                break;
            }
            _ = ticker.tick() => {
                let captured_at = Local::now();
                // A timed-out read is dropped, which kills whatever process it started.
                let capture = source.read_display();
                let camera_failure = match tokio::time::timeout(settings.capture_timeout, capture).await {
                    Ok(Ok(text)) => {
                        camera_failures = 0;
                        state = process_display_text(&text, captured_at, &state, &recorder).await;
                        None
                    }
                    Ok(Err(err @ CaptureError::Spawn { .. })) => {
                        return Err(err).context("capture tooling is not available");
                    }
                    Ok(Err(err @ CaptureError::CameraUnavailable { .. })) => Some(err),
                    Ok(Err(err)) => {
                        log_error!("capture failed, skipping cycle: {err}");
                        None
                    }
                    Err(_) => {
                        log_warn!("capture timeout (> {}ms)", settings.capture_timeout.as_millis());
                        None
                    }
                };

                if let Some(err) = camera_failure {
                    camera_failures += 1;
                    if camera_failures >= settings.connection_attempts {
                        bail!(
                            "camera unavailable after {} attempts: {}",
                            camera_failures,
                            err
                        );
                    }
                    log_warn!(
                        "camera attempt {}/{} failed: {}; retrying in {}s",
                        camera_failures,
                        settings.connection_attempts,
                        err,
                        settings.retry_delay.as_secs()
                    );
                    tokio::select! {
                        _ = tokio::time::sleep(settings.retry_delay) => {}
                        _ = cancel_token.cancelled() => {}
                    }
                }
            }
        }
    }

    Ok(())
}

/// One polling cycle after capture: parse, filter, persist.
///
/// The returned state is what the next cycle should use. A failed write leaves
/// the previous state in place so the same change is tried again.
pub async fn process_display_text(
    text: &str,
    captured_at: DateTime<Local>,
    state: &FilterState,
    recorder: &Recorder,
) -> FilterState {
    log::debug!("OCR text: {text:?}");

    let reading = parser::parse(text, captured_at);
    let (action, next) = state.advance(reading);
    if action == FilterAction::Suppress {
        return next;
    }

    let Some(reading) = next.previous() else {
        return next;
    };
    match recorder.persist_reading(reading).await {
        Some(_) => next,
        None => {
            log_warn!("reading at {} was not stored", reading.captured_at());
            state.clone()
        }
    }
}
