//! JSONファイルによる設定永続化

use lr_domain::model::{ElevatedProbePolicy, Language, SwapConfig};
use lr_domain::port::driven::ConfigRepository;
use lr_domain::DomainError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Debug, Clone)]
pub struct JsonConfigRepository {
    config_path: PathBuf,
}

impl JsonConfigRepository {
    /// ファイルは保存時に遅延作成する
    pub fn new(config_path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: config_path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.config_path
    }

    fn ensure_parent_dir(&self, path: &Path) -> Result<(), DomainError> {
        let Some(dir) = path.parent() else {
            return Ok(());
        };
        fs::create_dir_all(dir).map_err(|e| DomainError::IoError(format!("create_dir_all: {e}")))
    }

    fn write_atomic(&self, path: &Path, data: &[u8]) -> Result<(), DomainError> {
        self.ensure_parent_dir(path)?;
        let tmp_path = path.with_extension(format!("tmp.{}", unique_suffix()));
        {
            let mut f = fs::File::create(&tmp_path)
                .map_err(|e| DomainError::IoError(format!("create temp file: {e}")))?;
            f.write_all(data)
                .map_err(|e| DomainError::IoError(format!("write temp file: {e}")))?;
            let _ = f.sync_all();
        }
        if path.exists() {
            #[cfg(windows)]
            {
                if let Err(e) = replace_file(&tmp_path, path) {
                    let _ = fs::remove_file(&tmp_path);
                    return Err(e);
                }
                return Ok(());
            }
        }
        fs::rename(&tmp_path, path).map_err(|e| {
            let _ = fs::remove_file(&tmp_path);
            DomainError::IoError(format!("rename temp file: {e}"))
        })
    }
}

impl ConfigRepository for JsonConfigRepository {
    fn load(&self) -> Result<SwapConfig, DomainError> {
        let buf = fs::read_to_string(&self.config_path)
            .map_err(|e| DomainError::ConfigLoadFailed(format!("read config: {e}")))?;
        let dto: ConfigDto =
            serde_json::from_str(&buf).map_err(|e| DomainError::ConfigLoadFailed(e.to_string()))?;
        SwapConfig::try_from(dto).map_err(|e| DomainError::ConfigLoadFailed(e.to_string()))
    }

    fn save(&self, config: &SwapConfig) -> Result<(), DomainError> {
        let data = render_config(config)?;
        self.write_atomic(&self.config_path, data.as_bytes())
    }

    fn exists(&self) -> bool {
        self.config_path.exists()
    }
}

/// 保存時と同じ形式のJSON
pub fn render_config(config: &SwapConfig) -> Result<String, DomainError> {
    serde_json::to_string_pretty(&ConfigDto::from(config))
        .map_err(|e| DomainError::IoError(format!("serialize config: {e}")))
}

fn unique_suffix() -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    format!("{}.{}", std::process::id(), nanos)
}

#[cfg(windows)]
fn replace_file(src: &Path, dst: &Path) -> Result<(), DomainError> {
    use std::os::windows::ffi::OsStrExt;
    use windows::core::PCWSTR;
    use windows::Win32::Storage::FileSystem::{ReplaceFileW, REPLACE_FILE_FLAGS};

    fn to_wide(path: &Path) -> Vec<u16> {
        path.as_os_str().encode_wide().chain(Some(0)).collect()
    }

    let src_w = to_wide(src);
    let dst_w = to_wide(dst);
    unsafe {
        ReplaceFileW(
            PCWSTR(dst_w.as_ptr()),
            PCWSTR(src_w.as_ptr()),
            PCWSTR::null(),
            REPLACE_FILE_FLAGS(0),
            None,
            None,
        )
        .map_err(|e| DomainError::IoError(format!("ReplaceFileW failed: {}", e.message())))?;
    }
    Ok(())
}

// ---------- DTO 定義 ----------

/// 欠けている項目は既定値で補う
#[derive(Serialize, Deserialize)]
#[serde(default)]
struct ConfigDto {
    test_mode: bool,
    cache_ttl_ms: u64,
    /// "always" または "never"
    elevated_probe: String,
    /// UI言語（"ja" または "en"）
    language: String,
    app_name: String,
    resource_file_name: String,
    confirm_on_windows: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    ffmpeg_path: Option<String>,
}

impl Default for ConfigDto {
    fn default() -> Self {
        Self::from(&SwapConfig::default())
    }
}

impl From<&SwapConfig> for ConfigDto {
    fn from(cfg: &SwapConfig) -> Self {
        Self {
            test_mode: cfg.test_mode,
            cache_ttl_ms: cfg.cache_ttl_ms,
            elevated_probe: cfg.elevated_probe.as_str().to_string(),
            language: cfg.language.to_code().to_string(),
            app_name: cfg.app_name.clone(),
            resource_file_name: cfg.resource_file_name.clone(),
            confirm_on_windows: cfg.confirm_on_windows,
            ffmpeg_path: cfg
                .ffmpeg_path
                .as_ref()
                .map(|p| p.to_string_lossy().into_owned()),
        }
    }
}

impl TryFrom<ConfigDto> for SwapConfig {
    type Error = DomainError;

    fn try_from(dto: ConfigDto) -> Result<Self, Self::Error> {
        let elevated_probe = ElevatedProbePolicy::from_code(&dto.elevated_probe).ok_or_else(|| {
            DomainError::InvalidConfig(format!("unknown elevated_probe: {:?}", dto.elevated_probe))
        })?;
        let language = if dto.language.is_empty() {
            Language::default()
        } else {
            Language::from_code(&dto.language)
        };
        let cfg = SwapConfig {
            test_mode: dto.test_mode,
            cache_ttl_ms: dto.cache_ttl_ms,
            elevated_probe,
            language,
            app_name: dto.app_name,
            resource_file_name: dto.resource_file_name,
            confirm_on_windows: dto.confirm_on_windows,
            ffmpeg_path: dto.ffmpeg_path.filter(|p| !p.is_empty()).map(PathBuf::from),
        };
        cfg.validate()?;
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn save_then_load_keeps_settings() {
        let tmp = tempdir().unwrap();
        let repo = JsonConfigRepository::new(tmp.path().join("nested/config.json"));
        assert!(!repo.exists());

        let cfg = SwapConfig {
            test_mode: true,
            cache_ttl_ms: 5_000,
            elevated_probe: ElevatedProbePolicy::Never,
            language: Language::English,
            ffmpeg_path: Some(PathBuf::from("/opt/ffmpeg/bin/ffmpeg")),
            ..SwapConfig::default()
        };
        repo.save(&cfg).unwrap();
        assert!(repo.exists());
        assert_eq!(repo.load().unwrap(), cfg);

        // 上書き保存でも一時ファイルが残らない
        repo.save(&SwapConfig::default()).unwrap();
        let leftovers = fs::read_dir(tmp.path().join("nested")).unwrap().count();
        assert_eq!(leftovers, 1);
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("config.json");
        fs::write(&path, r#"{ "language": "en" }"#).unwrap();

        let cfg = JsonConfigRepository::new(&path).load().unwrap();
        assert_eq!(cfg.language, Language::English);
        assert_eq!(cfg.cache_ttl_ms, 30_000);
        assert_eq!(cfg.resource_file_name, "VoipRing.wav");
        assert_eq!(cfg.elevated_probe, ElevatedProbePolicy::Always);
    }

    #[test]
    fn invalid_values_fail_to_load() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("config.json");
        let repo = JsonConfigRepository::new(&path);

        fs::write(&path, r#"{ "elevated_probe": "sometimes" }"#).unwrap();
        assert!(matches!(repo.load(), Err(DomainError::ConfigLoadFailed(_))));

        fs::write(&path, r#"{ "cache_ttl_ms": 0 }"#).unwrap();
        assert!(matches!(repo.load(), Err(DomainError::ConfigLoadFailed(_))));

        fs::write(&path, "not json").unwrap();
        assert!(matches!(repo.load(), Err(DomainError::ConfigLoadFailed(_))));
    }

    #[test]
    fn missing_file_is_a_load_failure() {
        let tmp = tempdir().unwrap();
        let repo = JsonConfigRepository::new(tmp.path().join("absent.json"));
        assert!(matches!(repo.load(), Err(DomainError::ConfigLoadFailed(_))));
    }
}
