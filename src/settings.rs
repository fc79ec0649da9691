use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionSettings {
    pub ip: String,
    pub port: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CameraSettings {
    pub connection: ConnectionSettings,
    #[serde(default = "default_connection_attempts")]
    pub connection_attempts: u32,
    #[serde(default = "default_retry_delay_secs")]
    pub retry_delay_secs: u64,
    #[serde(default = "default_ffmpeg")]
    pub ffmpeg: PathBuf,
}

impl CameraSettings {
    pub fn source_url(&self) -> String {
        format!(
            "rtsp://{}:{}/h264.sdp",
            self.connection.ip, self.connection.port
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct OcrSettings {
    /// Path to the tesseract executable.
    #[serde(rename = "tesseract-dir", default = "default_tesseract")]
    pub tesseract: PathBuf,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_threshold")]
    pub threshold: u8,
    #[serde(default = "default_blur_sigma")]
    pub blur_sigma: f32,
}

impl Default for OcrSettings {
    fn default() -> Self {
        Self {
            tesseract: default_tesseract(),
            language: default_language(),
            threshold: default_threshold(),
            blur_sigma: default_blur_sigma(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseSettings {
    pub path: PathBuf,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from("boiler.sqlite3"),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppSettings {
    #[serde(default)]
    pub database: DatabaseSettings,
    /// Seconds between polling cycles.
    #[serde(default)]
    pub wait: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub camera: CameraSettings,
    #[serde(default)]
    pub ocr: OcrSettings,
    #[serde(default)]
    pub app: AppSettings,
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self> {
        let path = settings_path(path);
        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read settings from {}", path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse settings in {}", path.display()))
    }
}

/// Settings are named without their extension on the command line.
fn settings_path(path: &Path) -> PathBuf {
    if path.extension().is_some() {
        path.to_path_buf()
    } else {
        path.with_extension("json")
    }
}

fn default_connection_attempts() -> u32 {
    3
}

fn default_retry_delay_secs() -> u64 {
    5
}

fn default_ffmpeg() -> PathBuf {
    PathBuf::from("ffmpeg")
}

fn default_tesseract() -> PathBuf {
    PathBuf::from("tesseract")
}

fn default_language() -> String {
    "lets".into()
}

fn default_threshold() -> u8 {
    150
}

// Matches a 13x13 Gaussian kernel.
fn default_blur_sigma() -> f32 {
    2.3
}
