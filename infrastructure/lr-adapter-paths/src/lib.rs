//! LINEデータディレクトリと本アプリ既定パスの解決

use lr_domain::model::Platform;
use lr_domain::port::driven::PathResolver;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// 本アプリのディレクトリ名（設定・ログ用）
const APP_DIR_NAME: &str = "line-ringtone-replacer";
/// テストモードで実データの代わりに使うディレクトリ名
const TEST_OUTPUT_DIR_NAME: &str = "line-ringtone-replace-test-output";

#[cfg(windows)]
fn known_folder_path(id: &windows::core::GUID) -> Option<PathBuf> {
    use windows::core::PWSTR;
    use windows::Win32::System::Com::CoTaskMemFree;
    use windows::Win32::UI::Shell::{SHGetKnownFolderPath, KF_FLAG_DEFAULT};

    unsafe {
        let raw: PWSTR = SHGetKnownFolderPath(id, KF_FLAG_DEFAULT, None).ok()?;
        let s = raw.to_string().unwrap_or_default();
        CoTaskMemFree(Some(raw.0 as _));
        if s.is_empty() {
            None
        } else {
            Some(PathBuf::from(s))
        }
    }
}

/// `%LOCALAPPDATA%`（既知フォルダ優先）
fn local_app_data_dir() -> Option<PathBuf> {
    #[cfg(windows)]
    {
        use windows::Win32::UI::Shell::FOLDERID_LocalAppData;

        known_folder_path(&FOLDERID_LocalAppData).or_else(dirs::data_local_dir)
    }
    #[cfg(not(windows))]
    {
        None
    }
}

/// LINEのデータディレクトリ候補（優先順）
///
/// - Windows: `<LocalAppData>\LineCall\Data`, `<LocalAppData>\LINECall\Data`
/// - macOS: `~/Library/Application Support/LINECall/Data`, `.../LineCall/Data`
/// - その他: 候補なし
pub fn candidates(platform: Platform, home: &Path, local_app_data: Option<&Path>) -> Vec<PathBuf> {
    match platform {
        Platform::Windows => {
            let base = local_app_data
                .map(Path::to_path_buf)
                .unwrap_or_else(|| home.join("AppData").join("Local"));
            vec![
                base.join("LineCall").join("Data"),
                base.join("LINECall").join("Data"),
            ]
        }
        Platform::MacOs => {
            let base = home.join("Library").join("Application Support");
            vec![
                base.join("LINECall").join("Data"),
                base.join("LineCall").join("Data"),
            ]
        }
        Platform::Linux | Platform::Other => Vec::new(),
    }
}

/// テストモードの既定ルート（`<tmp>/line-ringtone-replace-test-output`）
pub fn default_test_root() -> PathBuf {
    std::env::temp_dir().join(TEST_OUTPUT_DIR_NAME)
}

/// 設定ファイルの既定パス
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR_NAME)
        .join("config.json")
}

/// ログファイル用ディレクトリ
pub fn default_log_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR_NAME)
        .join("logs")
}

#[derive(Debug, Clone)]
enum Mode {
    Test { root: PathBuf },
    Live { platform: Platform, candidates: Vec<PathBuf> },
}

/// `PathResolver` の実装
#[derive(Debug, Clone)]
pub struct DataDirResolver {
    mode: Mode,
}

impl DataDirResolver {
    /// 実行中のOSの候補で解決する
    pub fn live() -> Self {
        let platform = Platform::current();
        let home = dirs::home_dir().unwrap_or_default();
        let local = local_app_data_dir();
        Self::with_candidates(platform, candidates(platform, &home, local.as_deref()))
    }

    pub fn with_candidates(platform: Platform, candidates: Vec<PathBuf>) -> Self {
        Self {
            mode: Mode::Live {
                platform,
                candidates,
            },
        }
    }

    pub fn test_mode() -> Self {
        Self::test_mode_at(default_test_root())
    }

    pub fn test_mode_at(root: impl Into<PathBuf>) -> Self {
        Self {
            mode: Mode::Test { root: root.into() },
        }
    }

    pub fn is_test_mode(&self) -> bool {
        matches!(self.mode, Mode::Test { .. })
    }
}

impl PathResolver for DataDirResolver {
    fn resolve(&self) -> Option<PathBuf> {
        match &self.mode {
            Mode::Test { root } => match std::fs::create_dir_all(root) {
                Ok(()) => Some(root.clone()),
                Err(err) => {
                    warn!(root = %root.display(), error = %err, "cannot prepare test directory");
                    None
                }
            },
            Mode::Live {
                platform,
                candidates,
            } => {
                if let Some(found) = candidates.iter().find(|c| c.is_dir()) {
                    debug!(dir = %found.display(), "resolved data directory");
                    return Some(found.clone());
                }
                let primary = candidates.first()?;
                if !platform.allows_unprivileged_dir_create() {
                    debug!(platform = platform.as_str(), "no data directory found");
                    return None;
                }
                match std::fs::create_dir_all(primary) {
                    Ok(()) => {
                        debug!(dir = %primary.display(), "created data directory");
                        Some(primary.clone())
                    }
                    Err(err) => {
                        warn!(dir = %primary.display(), error = %err, "cannot create data directory");
                        None
                    }
                }
            }
        }
    }
}
