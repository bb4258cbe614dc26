//! テストモードの実アダプタ（ローカル実行・実ファイルシステム）での通し確認

use async_trait::async_trait;
use lr_composition::domain::model::{FailureKind, Language, SwapConfig};
use lr_composition::domain::port::driven::{AudioConverter, ConfigRepository};
use lr_composition::domain::DomainError;
use lr_composition::{
    load_config, save_config, AppInfo, ConfigOverrides, JsonConfigRepository, SwapRuntime,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::{tempdir, TempDir};

const ORIGINAL: &[u8] = b"RIFF\x24\x00\x00\x00WAVEoriginal";
const NEW: &[u8] = b"RIFF\x24\x00\x00\x00WAVEnew";

/// ffmpegを使わない変換器。RIFFで始まれば音声、WAV以外は作業ディレクトリへコピーする。
struct CopyConverter {
    work_dir: PathBuf,
}

#[async_trait]
impl AudioConverter for CopyConverter {
    async fn is_audio_file(&self, path: &Path) -> bool {
        std::fs::read(path).is_ok_and(|b| b.starts_with(b"RIFF"))
    }

    async fn convert_to_wav(&self, path: &Path) -> Result<PathBuf, DomainError> {
        if path.extension().is_some_and(|e| e == "wav") {
            return Ok(path.to_path_buf());
        }
        let stem = path.file_stem().unwrap().to_string_lossy();
        let out = self.work_dir.join(format!("{stem}_converted.wav"));
        std::fs::copy(path, &out).map_err(|e| DomainError::ConversionFailed(e.to_string()))?;
        Ok(out)
    }

    fn discard(&self, converted: &Path) -> Result<(), DomainError> {
        std::fs::remove_file(converted).map_err(|e| DomainError::IoError(e.to_string()))
    }
}

struct Fixture {
    tmp: TempDir,
    runtime: SwapRuntime,
}

impl Fixture {
    fn new() -> Self {
        let tmp = tempdir().unwrap();
        let work = tmp.path().join("work");
        std::fs::create_dir_all(&work).unwrap();
        let config = SwapConfig {
            test_mode: true,
            language: Language::English,
            ..SwapConfig::default()
        };
        let runtime = SwapRuntime::builder(config)
            .test_root(tmp.path().join("data"))
            .converter(Arc::new(CopyConverter { work_dir: work }))
            .build();
        Self { tmp, runtime }
    }

    fn target(&self) -> PathBuf {
        self.runtime.resource().unwrap().target_path()
    }

    fn backup(&self) -> PathBuf {
        self.runtime.resource().unwrap().backup_path()
    }

    fn source(&self, name: &str, bytes: &[u8]) -> PathBuf {
        let path = self.tmp.path().join(name);
        std::fs::write(&path, bytes).unwrap();
        path
    }

    fn install_original(&self) {
        let target = self.target();
        std::fs::create_dir_all(target.parent().unwrap()).unwrap();
        std::fs::write(target, ORIGINAL).unwrap();
    }
}

#[tokio::test]
async fn replace_and_restore_on_disk() {
    let fx = Fixture::new();
    fx.install_original();
    let engine = fx.runtime.engine();
    let src = fx.source("ring.mp3", NEW);

    let replaced = engine.replace(&src).await;
    assert!(replaced.success, "{}", replaced.message);
    assert_eq!(std::fs::read(fx.target()).unwrap(), NEW);
    assert_eq!(std::fs::read(fx.backup()).unwrap(), ORIGINAL);
    assert!(engine.check_backup_exists().await.exists);
    assert!(!fx.tmp.path().join("work/ring_converted.wav").exists());
    assert!(src.exists());

    let restored = engine.restore().await;
    assert!(restored.success, "{}", restored.message);
    assert_eq!(std::fs::read(fx.target()).unwrap(), ORIGINAL);
    assert!(!fx.backup().exists());
    assert!(!engine.check_backup_exists().await.exists);
}

#[tokio::test]
async fn first_replace_without_original_creates_the_sound_dir() {
    let fx = Fixture::new();
    let src = fx.source("ring.wav", NEW);

    let outcome = fx.runtime.use_case().replace(&src).await;

    assert!(outcome.success, "{}", outcome.message);
    assert_eq!(std::fs::read(fx.target()).unwrap(), NEW);
    assert!(!fx.backup().exists());
    assert!(!fx.runtime.use_case().check_backup_exists().await.exists);
}

#[tokio::test]
async fn restore_without_backup_touches_nothing() {
    let fx = Fixture::new();
    fx.install_original();

    let outcome = fx.runtime.engine().restore().await;

    assert_eq!(outcome.failure, Some(FailureKind::NoBackup));
    assert_eq!(
        outcome.message,
        "No backup file was found. There is nothing to restore."
    );
    assert_eq!(std::fs::read(fx.target()).unwrap(), ORIGINAL);
}

#[tokio::test]
async fn non_audio_and_missing_sources_are_rejected() {
    let fx = Fixture::new();
    let text = fx.source("notes.txt", b"hello");

    let not_audio = fx.runtime.engine().replace(&text).await;
    let missing = fx
        .runtime
        .engine()
        .replace(&fx.tmp.path().join("absent.wav"))
        .await;

    assert_eq!(not_audio.failure, Some(FailureKind::NotAudio));
    assert_eq!(missing.failure, Some(FailureKind::FileNotFound));
    assert!(!fx.target().exists());
}

#[test]
fn config_file_and_overrides_feed_the_runtime() {
    let tmp = tempdir().unwrap();
    let repo = JsonConfigRepository::new(tmp.path().join("config.json"));

    // ファイルがなければ既定値
    let cfg = load_config(&repo, &ConfigOverrides::default()).unwrap();
    assert_eq!(cfg.resource_file_name, "VoipRing.wav");

    repo.save(&SwapConfig {
        cache_ttl_ms: 1_000,
        ..SwapConfig::default()
    })
    .unwrap();
    let cfg = load_config(
        &repo,
        &ConfigOverrides {
            test_mode: Some(true),
            language: Some(Language::English),
        },
    )
    .unwrap();
    assert!(cfg.test_mode);
    assert_eq!(cfg.language, Language::English);
    assert_eq!(cfg.cache_ttl_ms, 1_000);
}

#[test]
fn effective_settings_persist_and_reload() {
    let tmp = tempdir().unwrap();
    let repo = JsonConfigRepository::new(tmp.path().join("conf/config.json"));
    let overrides = ConfigOverrides {
        test_mode: Some(true),
        language: Some(Language::English),
    };
    let effective = load_config(&repo, &overrides).unwrap();

    save_config(&repo, &effective).unwrap();

    let reloaded = load_config(&repo, &ConfigOverrides::default()).unwrap();
    assert!(reloaded.test_mode);
    assert_eq!(reloaded.language, Language::English);
    assert!(repo.exists());
}

#[test]
fn invalid_settings_are_not_written() {
    let tmp = tempdir().unwrap();
    let repo = JsonConfigRepository::new(tmp.path().join("config.json"));
    let bad = SwapConfig {
        cache_ttl_ms: 0,
        ..SwapConfig::default()
    };

    assert!(save_config(&repo, &bad).is_err());
    assert!(!repo.exists());
}

#[test]
fn app_info_reports_version_and_platform() {
    let info = AppInfo::current(Language::Japanese);
    assert_eq!(info.name, "LINE着信音置換くん");
    assert_eq!(info.version, env!("CARGO_PKG_VERSION"));
    assert!(!info.platform.is_empty());
}
