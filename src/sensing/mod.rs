pub mod camera;
pub mod loop_worker;
pub mod ocr;
pub mod preprocess;

use async_trait::async_trait;
use thiserror::Error;

use crate::settings::{CameraSettings, OcrSettings};

pub use loop_worker::{process_display_text, sensing_loop, LoopSettings};

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("couldn't open video feed {url}: {reason}")]
    CameraUnavailable { url: String, reason: String },
    #[error("OCR failed: {0}")]
    Ocr(String),
    #[error("couldn't decode frame: {0}")]
    Image(#[from] image::ImageError),
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

/// Something that yields the current display text, once per cycle.
///
/// Dropping the returned future must abandon the read, including any child
/// process it started.
#[async_trait]
pub trait DisplaySource: Send + Sync {
    async fn read_display(&self) -> Result<String, CaptureError>;
}

/// Camera frame -> preprocessing -> tesseract.
pub struct CameraDisplay {
    camera: CameraSettings,
    ocr: OcrSettings,
}

impl CameraDisplay {
    pub fn new(camera: CameraSettings, ocr: OcrSettings) -> Self {
        Self { camera, ocr }
    }
}

#[async_trait]
impl DisplaySource for CameraDisplay {
    async fn read_display(&self) -> Result<String, CaptureError> {
        let frame = camera::grab_frame(&self.camera).await?;

        let ocr = self.ocr.clone();
        let processed = tokio::task::spawn_blocking(move || preprocess::prepare(&frame, &ocr))
            .await
            .map_err(|err| CaptureError::Ocr(format!("preprocessing worker failed: {err}")))??;

        ocr::extract_text(&processed, &self.ocr).await
    }
}

/// Stand-ins for ffmpeg/tesseract that never finish.
#[cfg(all(test, target_os = "linux"))]
pub(crate) mod hanging {
    use std::{
        fs,
        os::unix::fs::PermissionsExt,
        path::{Path, PathBuf},
    };

    /// Writes a script that appends its pid to `pid_file` and then sleeps.
    pub fn program(dir: &Path, pid_file: &Path) -> PathBuf {
        let path = dir.join("hang.sh");
        let script = format!(
            "#!/bin/sh\necho $$ >> '{}'\nexec sleep 30\n",
            pid_file.display()
        );
        fs::write(&path, script).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    pub fn pids(pid_file: &Path) -> Vec<u32> {
        fs::read_to_string(pid_file)
            .unwrap_or_default()
            .lines()
            .filter_map(|line| line.trim().parse().ok())
            .collect()
    }

    /// True while the process exists and is not a zombie waiting to be reaped.
    pub fn is_running(pid: u32) -> bool {
        match fs::read_to_string(format!("/proc/{pid}/stat")) {
            Ok(stat) => stat
                .rsplit_once(") ")
                .and_then(|(_, rest)| rest.chars().next())
                .is_some_and(|state| state != 'Z' && state != 'X'),
            Err(_) => false,
        }
    }

    /// Waits up to two seconds for every pid to stop running.
    pub async fn all_stopped(pids: &[u32]) -> bool {
        for _ in 0..40 {
            if pids.iter().all(|pid| !is_running(*pid)) {
                return true;
            }
            tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        }
        false
    }
}
