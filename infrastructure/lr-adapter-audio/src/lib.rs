//! ffmpegによる音声判定・WAV変換アダプター

use async_trait::async_trait;
use lr_domain::model::is_target_container;
use lr_domain::port::driven::AudioConverter;
use lr_domain::DomainError;
use std::ffi::OsStr;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, warn};

const INVALID_INPUT_MARKER: &str = "Invalid data found when processing input";
const AUDIO_STREAM_MARKER: &str = "Audio:";
const CONVERTED_SUFFIX: &str = "_converted.wav";

#[derive(Debug, Clone)]
pub struct FfmpegConverter {
    ffmpeg: PathBuf,
    work_dir: PathBuf,
}

impl FfmpegConverter {
    /// `PATH` 上の ffmpeg を使い、変換結果は一時ディレクトリに置く
    pub fn new() -> Self {
        Self::with_binary("ffmpeg")
    }

    pub fn with_binary(ffmpeg: impl Into<PathBuf>) -> Self {
        Self {
            ffmpeg: ffmpeg.into(),
            work_dir: std::env::temp_dir(),
        }
    }

    pub fn work_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.work_dir = dir.into();
        self
    }

    /// 変換後の出力先（`<work_dir>/<stem>_converted.wav`）
    pub fn converted_path(&self, source: &Path) -> PathBuf {
        let stem = source
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "audio".to_string());
        self.work_dir.join(format!("{stem}{CONVERTED_SUFFIX}"))
    }

    async fn ffmpeg(&self, args: &[&OsStr]) -> io::Result<std::process::Output> {
        Command::new(&self.ffmpeg)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
    }
}

impl Default for FfmpegConverter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AudioConverter for FfmpegConverter {
    async fn is_audio_file(&self, path: &Path) -> bool {
        let args: [&OsStr; 6] = [
            "-hide_banner".as_ref(),
            "-i".as_ref(),
            path.as_os_str(),
            "-f".as_ref(),
            "null".as_ref(),
            "-".as_ref(),
        ];
        match self.ffmpeg(&args).await {
            // 判定結果はストリーム情報が出る stderr 側に載る
            Ok(out) => {
                let mut text = String::from_utf8_lossy(&out.stdout).into_owned();
                text.push_str(&String::from_utf8_lossy(&out.stderr));
                let audio = reports_audio_stream(&text);
                debug!(path = %path.display(), audio, "probed audio file");
                audio
            }
            Err(err) => {
                warn!(ffmpeg = %self.ffmpeg.display(), error = %err, "ffmpeg unavailable; falling back to WAV header check");
                is_target_container(path)
                    && tokio::fs::read(path)
                        .await
                        .is_ok_and(|bytes| has_wave_header(&bytes))
            }
        }
    }

    async fn convert_to_wav(&self, path: &Path) -> Result<PathBuf, DomainError> {
        if is_target_container(path) {
            return Ok(path.to_path_buf());
        }
        let output = self.converted_path(path);
        let args: [&OsStr; 8] = [
            "-y".as_ref(),
            "-i".as_ref(),
            path.as_os_str(),
            "-acodec".as_ref(),
            "pcm_s16le".as_ref(),
            "-ar".as_ref(),
            "44100".as_ref(),
            output.as_os_str(),
        ];
        let out = self
            .ffmpeg(&args)
            .await
            .map_err(|e| DomainError::ConversionFailed(format!("failed to launch ffmpeg: {e}")))?;
        if !out.status.success() {
            let stderr = String::from_utf8_lossy(&out.stderr);
            let _ = std::fs::remove_file(&output);
            return Err(DomainError::ConversionFailed(format!(
                "ffmpeg exited with {}: {}",
                out.status,
                last_line(&stderr)
            )));
        }
        debug!(source = %path.display(), output = %output.display(), "converted to wav");
        Ok(output)
    }

    fn discard(&self, converted: &Path) -> Result<(), DomainError> {
        match std::fs::remove_file(converted) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(DomainError::IoError(format!(
                "remove {}: {e}",
                converted.display()
            ))),
        }
    }
}

/// ffmpegの出力が音声ストリームを報告しているか
pub fn reports_audio_stream(output: &str) -> bool {
    output.contains(AUDIO_STREAM_MARKER) && !output.contains(INVALID_INPUT_MARKER)
}

/// RIFF/WAVE ヘッダーを持つか
pub fn has_wave_header(bytes: &[u8]) -> bool {
    bytes.len() >= 12 && &bytes[0..4] == b"RIFF" && &bytes[8..12] == b"WAVE"
}

fn last_line(text: &str) -> &str {
    text.lines()
        .rev()
        .find(|l| !l.trim().is_empty())
        .unwrap_or("")
        .trim()
}
