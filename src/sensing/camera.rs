use std::process::Stdio;

use tokio::process::Command;

use crate::settings::CameraSettings;

use super::CaptureError;

fn ffmpeg_args(url: &str) -> Vec<String> {
    [
        "-hide_banner",
        "-loglevel",
        "error",
        "-rtsp_transport",
        "tcp",
        "-i",
        url,
        "-frames:v",
        "1",
        "-f",
        "image2pipe",
        "-vcodec",
        "png",
        "-",
    ]
    .iter()
    .map(|arg| arg.to_string())
    .collect()
}

/// Grabs a single PNG frame from the camera stream.
///
/// ffmpeg is killed if the returned future is dropped before it finishes.
pub async fn grab_frame(settings: &CameraSettings) -> Result<Vec<u8>, CaptureError> {
    let url = settings.source_url();
    let output = Command::new(&settings.ffmpeg)
        .args(ffmpeg_args(&url))
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .output()
        .await
        .map_err(|source| CaptureError::Spawn {
            program: settings.ffmpeg.display().to_string(),
            source,
        })?;

    if !output.status.success() || output.stdout.is_empty() {
        let reason = String::from_utf8_lossy(&output.stderr).trim().to_string();
        return Err(CaptureError::CameraUnavailable {
            url,
            reason: if reason.is_empty() {
                format!("ffmpeg exited with {}", output.status)
            } else {
                reason
            },
        });
    }

    Ok(output.stdout)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::ConnectionSettings;
    use std::path::PathBuf;

    fn settings(ffmpeg: PathBuf) -> CameraSettings {
        CameraSettings {
            connection: ConnectionSettings {
                ip: "127.0.0.1".into(),
                port: "554".into(),
            },
            connection_attempts: 1,
            retry_delay_secs: 0,
            ffmpeg,
        }
    }

    #[test]
    fn asks_for_one_png_frame_on_stdout() {
        let args = ffmpeg_args("rtsp://cam:554/h264.sdp");
        let joined = args.join(" ");
        assert!(joined.contains("-i rtsp://cam:554/h264.sdp"));
        assert!(joined.contains("-frames:v 1"));
        assert!(joined.ends_with("-vcodec png -"));
    }

    #[tokio::test]
    async fn missing_program_is_a_spawn_error() {
        let err = grab_frame(&settings("/nonexistent/ffmpeg".into()))
            .await
            .unwrap_err();
        assert!(matches!(err, CaptureError::Spawn { .. }));
    }

    #[cfg(target_os = "linux")]
    #[tokio::test]
    async fn abandoned_grab_kills_ffmpeg() -> anyhow::Result<()> {
        use crate::sensing::hanging;

        let dir = tempfile::tempdir()?;
        let pid_file = dir.path().join("pids");
        let program = hanging::program(dir.path(), &pid_file);

        let binding = settings(program);
        let grab = grab_frame(&binding);
        let result = tokio::time::timeout(std::time::Duration::from_millis(500), grab).await;
        assert!(result.is_err(), "grab should still be running");

        let pids = hanging::pids(&pid_file);
        assert_eq!(pids.len(), 1);
        assert!(hanging::all_stopped(&pids).await);
        Ok(())
    }
}
