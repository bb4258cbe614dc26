//! ログ初期化（tracing-subscriber）とタイムスタンプ整形

use std::fs::{File, OpenOptions};
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// ライフサイクルログのファイル名
pub const LIFECYCLE_LOG_NAME: &str = "lr-lifecycle.log";
/// フィルタ指定の環境変数（なければ `RUST_LOG`）
pub const LOG_ENV: &str = "LR_LOG";

#[derive(Debug, Clone)]
pub struct LogConfig {
    /// 環境変数がないときのフィルタ
    pub level: String,
    /// 追記するライフサイクルログ
    pub log_file: Option<PathBuf>,
    /// stderr を色付けするか（None なら端末かどうかで決める）
    pub ansi: Option<bool>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            log_file: None,
            ansi: None,
        }
    }
}

impl LogConfig {
    pub fn with_log_dir(mut self, dir: &Path) -> Self {
        self.log_file = Some(dir.join(LIFECYCLE_LOG_NAME));
        self
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        if verbose {
            self.level = "debug".to_string();
        }
        self
    }

    fn filter(&self) -> EnvFilter {
        EnvFilter::try_from_env(LOG_ENV)
            .or_else(|_| EnvFilter::try_from_default_env())
            .unwrap_or_else(|_| EnvFilter::new(&self.level))
    }
}

/// グローバルsubscriberを設定する。
///
/// ログファイルを開けない場合はエラーを返す（stderr 出力のみで続行するかは呼び出し側が決める）。
/// 既に設定済みなら何もしない。
pub fn init_logging(config: &LogConfig) -> io::Result<()> {
    let file_layer = match &config.log_file {
        Some(path) => Some(
            fmt::layer()
                .with_writer(Mutex::new(open_append(path)?))
                .with_timer(UtcMillis)
                .with_ansi(false),
        ),
        None => None,
    };

    let use_ansi = config.ansi.unwrap_or_else(|| io::stderr().is_terminal());
    let stderr_layer = fmt::layer()
        .with_writer(io::stderr)
        .with_target(false)
        .with_timer(UtcMillis)
        .with_ansi(use_ansi);

    let _ = tracing_subscriber::registry()
        .with(config.filter())
        .with(stderr_layer)
        .with(file_layer)
        .try_init();
    Ok(())
}

fn open_append(path: &Path) -> io::Result<File> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// `2025-01-15T10:30:00.123Z` 形式のタイマー
#[derive(Debug, Clone, Copy, Default)]
pub struct UtcMillis;

impl FormatTime for UtcMillis {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        w.write_str(&utc_rfc3339_millis())
    }
}

/// UTCのRFC3339（ミリ秒付き）。例: 2025-01-15T10:30:00.123Z
pub fn utc_rfc3339_millis() -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    format_utc_millis(now.as_secs(), now.subsec_millis())
}

fn format_utc_millis(secs: u64, millis: u32) -> String {
    let days = (secs / 86_400) as i64;
    let rem = secs % 86_400;
    let (year, month, day) = civil_from_days(days);
    format!(
        "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}.{:03}Z",
        year,
        month,
        day,
        rem / 3_600,
        (rem % 3_600) / 60,
        rem % 60,
        millis
    )
}

fn civil_from_days(days: i64) -> (i32, u32, u32) {
    // Howard Hinnant のアルゴリズム
    let z = days + 719_468;
    let era = if z >= 0 { z } else { z - 146_096 } / 146_097;
    let doe = z - era * 146_097;
    let yoe = (doe - doe / 1_460 + doe / 36_524 - doe / 146_096) / 365;
    let y = yoe + era * 400;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let d = doy - (153 * mp + 2) / 5 + 1;
    let m = mp + if mp < 10 { 3 } else { -9 };
    let year = y + if m <= 2 { 1 } else { 0 };
    (year as i32, m as u32, d as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn formats_known_instants() {
        assert_eq!(format_utc_millis(0, 0), "1970-01-01T00:00:00.000Z");
        assert_eq!(format_utc_millis(1_736_937_000, 123), "2025-01-15T10:30:00.123Z");
        assert_eq!(format_utc_millis(951_782_400, 5), "2000-02-29T00:00:00.005Z");
    }

    #[test]
    fn log_dir_selects_lifecycle_file() {
        let cfg = LogConfig::default().with_log_dir(Path::new("/var/log/lr")).verbose(true);
        assert_eq!(cfg.log_file, Some(PathBuf::from("/var/log/lr/lr-lifecycle.log")));
        assert_eq!(cfg.level, "debug");
    }

    #[test]
    fn init_creates_log_file_and_tolerates_reinit() {
        let tmp = tempdir().unwrap();
        let cfg = LogConfig {
            ansi: Some(false),
            ..LogConfig::default()
        }
        .with_log_dir(&tmp.path().join("logs"));

        init_logging(&cfg).unwrap();
        init_logging(&cfg).unwrap();
        assert!(tmp.path().join("logs").join(LIFECYCLE_LOG_NAME).exists());
    }
}
