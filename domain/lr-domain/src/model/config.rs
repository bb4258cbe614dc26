use super::{validate_file_name, Language, APP_DISPLAY_NAME_EN, DEFAULT_RESOURCE_FILE_NAME};
use crate::DomainError;
use std::path::PathBuf;
use std::time::Duration;

/// バックアップ存在確認キャッシュの既定有効期間
pub const DEFAULT_CACHE_TTL_MS: u64 = 30_000;
const MAX_CACHE_TTL_MS: u64 = 600_000;

/// 通常権限の確認が失敗したとき、管理者権限で確認し直すか
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ElevatedProbePolicy {
    /// 権限エラー時は昇格して確認する
    #[default]
    Always,
    /// 昇格せず「バックアップなし」とみなす
    Never,
}

impl ElevatedProbePolicy {
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_lowercase().as_str() {
            "always" => Some(Self::Always),
            "never" => Some(Self::Never),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Always => "always",
            Self::Never => "never",
        }
    }
}

/// アプリ設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapConfig {
    /// 実データではなく一時ディレクトリを対象にする
    pub test_mode: bool,
    pub cache_ttl_ms: u64,
    pub elevated_probe: ElevatedProbePolicy,
    pub language: Language,
    /// 昇格ダイアログに表示する名前
    pub app_name: String,
    pub resource_file_name: String,
    /// Windowsで変更前に確認ダイアログを出す
    pub confirm_on_windows: bool,
    pub ffmpeg_path: Option<PathBuf>,
}

impl Default for SwapConfig {
    fn default() -> Self {
        Self {
            test_mode: false,
            cache_ttl_ms: DEFAULT_CACHE_TTL_MS,
            elevated_probe: ElevatedProbePolicy::default(),
            language: Language::default(),
            app_name: APP_DISPLAY_NAME_EN.to_string(),
            resource_file_name: DEFAULT_RESOURCE_FILE_NAME.to_string(),
            confirm_on_windows: true,
            ffmpeg_path: None,
        }
    }
}

impl SwapConfig {
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_millis(self.cache_ttl_ms)
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.cache_ttl_ms == 0 || self.cache_ttl_ms > MAX_CACHE_TTL_MS {
            return Err(DomainError::InvalidConfig(format!(
                "cache_ttl_ms は 1-{} の範囲である必要があります (現在 {})",
                MAX_CACHE_TTL_MS, self.cache_ttl_ms
            )));
        }
        // 昇格ヘルパーに渡すため英数字と空白のみ
        if self.app_name.trim().is_empty()
            || !self
                .app_name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == ' ')
        {
            return Err(DomainError::InvalidConfig(format!(
                "app_name must be ASCII alphanumerics and spaces: {:?}",
                self.app_name
            )));
        }
        validate_file_name(&self.resource_file_name)
            .map_err(|e| DomainError::InvalidConfig(e.to_string()))?;
        if let Some(path) = &self.ffmpeg_path {
            if path.as_os_str().is_empty() {
                return Err(DomainError::InvalidConfig(
                    "ffmpeg_path must not be empty".into(),
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let cfg = SwapConfig::default();
        cfg.validate().unwrap();
        assert_eq!(cfg.cache_ttl(), Duration::from_secs(30));
        assert_eq!(cfg.resource_file_name, "VoipRing.wav");
    }

    #[test]
    fn rejects_out_of_range_ttl_and_bad_names() {
        let mut cfg = SwapConfig::default();
        cfg.cache_ttl_ms = 0;
        assert!(cfg.validate().is_err());

        let mut cfg = SwapConfig::default();
        cfg.app_name = "Ringtone\"; rm -rf".into();
        assert!(cfg.validate().is_err());

        let mut cfg = SwapConfig::default();
        cfg.resource_file_name = "../VoipRing.wav".into();
        assert!(matches!(cfg.validate(), Err(DomainError::InvalidConfig(_))));
    }

    #[test]
    fn probe_policy_codes() {
        assert_eq!(ElevatedProbePolicy::from_code("Never"), Some(ElevatedProbePolicy::Never));
        assert_eq!(ElevatedProbePolicy::from_code("sometimes"), None);
    }
}
