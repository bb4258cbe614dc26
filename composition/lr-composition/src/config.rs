//! 設定の読込と上書き（ファイル → 環境変数 → コマンドライン）

use crate::error::{err, Result};
use lr_domain::model::{Language, SwapConfig};
use lr_domain::port::driven::ConfigRepository;
use std::path::PathBuf;
use tracing::debug;

pub const ENV_TEST_MODE: &str = "LR_TEST_MODE";
pub const ENV_LANG: &str = "LR_LANG";
pub const ENV_FFMPEG: &str = "LR_FFMPEG";

/// コマンドラインからの上書き
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub test_mode: Option<bool>,
    pub language: Option<Language>,
}

/// 設定ファイルがなければ既定値、あれば読み込んで検証する
pub fn load_config(repo: &dyn ConfigRepository, overrides: &ConfigOverrides) -> Result<SwapConfig> {
    let mut cfg = if repo.exists() {
        repo.load()?
    } else {
        debug!("config file not found; using defaults");
        SwapConfig::default()
    };
    apply_env_overrides(&mut cfg, |key| std::env::var(key).ok())?;
    if let Some(test_mode) = overrides.test_mode {
        cfg.test_mode = test_mode;
    }
    if let Some(language) = overrides.language {
        cfg.language = language;
    }
    cfg.validate()?;
    Ok(cfg)
}

/// 検証を通った設定だけを書き込む
pub fn save_config(repo: &dyn ConfigRepository, cfg: &SwapConfig) -> Result<()> {
    cfg.validate()?;
    repo.save(cfg)?;
    debug!("config saved");
    Ok(())
}

/// 環境変数による上書き。`lookup` はテストで差し替える。
pub fn apply_env_overrides(
    cfg: &mut SwapConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<()> {
    if let Some(raw) = lookup(ENV_TEST_MODE) {
        cfg.test_mode = parse_flag(&raw)
            .ok_or_else(|| err(format!("{ENV_TEST_MODE} must be 1/0/true/false, got {raw:?}")))?;
    }
    if let Some(raw) = lookup(ENV_LANG).filter(|s| !s.trim().is_empty()) {
        cfg.language = Language::from_code(raw.trim());
    }
    if let Some(raw) = lookup(ENV_FFMPEG).filter(|s| !s.trim().is_empty()) {
        cfg.ffmpeg_path = Some(PathBuf::from(raw.trim()));
    }
    Ok(())
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn env_overrides_apply() {
        let mut cfg = SwapConfig::default();
        apply_env_overrides(
            &mut cfg,
            env(&[(ENV_TEST_MODE, "1"), (ENV_LANG, "en"), (ENV_FFMPEG, "/opt/ffmpeg")]),
        )
        .unwrap();
        assert!(cfg.test_mode);
        assert_eq!(cfg.language, Language::English);
        assert_eq!(cfg.ffmpeg_path, Some(PathBuf::from("/opt/ffmpeg")));
    }

    #[test]
    fn absent_env_keeps_file_values() {
        let mut cfg = SwapConfig {
            test_mode: true,
            ..SwapConfig::default()
        };
        apply_env_overrides(&mut cfg, env(&[])).unwrap();
        assert!(cfg.test_mode);
        assert_eq!(cfg.language, Language::Japanese);
    }

    #[test]
    fn bad_flag_is_rejected() {
        let mut cfg = SwapConfig::default();
        assert!(apply_env_overrides(&mut cfg, env(&[(ENV_TEST_MODE, "maybe")])).is_err());
    }
}
