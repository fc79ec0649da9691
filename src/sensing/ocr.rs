use std::process::Stdio;

use tokio::{io::AsyncWriteExt, process::Command};

use crate::settings::OcrSettings;

use super::CaptureError;

/// Characters the display can show.
const CHAR_WHITELIST: &str = "A1234567890";

fn tesseract_args(settings: &OcrSettings) -> Vec<String> {
    vec![
        "stdin".into(),
        "stdout".into(),
        "-l".into(),
        settings.language.clone(),
        "--oem".into(),
        "3".into(),
        "--psm".into(),
        "6".into(),
        "-c".into(),
        format!("tessedit_char_whitelist={CHAR_WHITELIST}"),
    ]
}

/// Runs tesseract over a processed PNG and returns the trimmed text.
///
/// tesseract is killed if the returned future is dropped before it finishes.
pub async fn extract_text(png: &[u8], settings: &OcrSettings) -> Result<String, CaptureError> {
    let program = settings.tesseract.display().to_string();
    let spawn_error = |source| CaptureError::Spawn {
        program: program.clone(),
        source,
    };

    let mut child = Command::new(&settings.tesseract)
        .args(tesseract_args(settings))
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(spawn_error)?;

    // Dropping stdin closes the pipe so tesseract sees the end of the image.
    if let Some(mut stdin) = child.stdin.take() {
        stdin
            .write_all(png)
            .await
            .map_err(|err| CaptureError::Ocr(format!("failed to send image: {err}")))?;
    }

    let output = child.wait_with_output().await.map_err(spawn_error)?;
    if !output.status.success() {
        return Err(CaptureError::Ocr(format!(
            "tesseract exited with {}: {}",
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}
