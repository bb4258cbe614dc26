/// 実行中のOS。
///
/// 分岐はパス解決と昇格実行のアダプタだけが参照する。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Windows,
    MacOs,
    Linux,
    Other,
}

impl Platform {
    pub fn current() -> Self {
        if cfg!(windows) {
            Platform::Windows
        } else if cfg!(target_os = "macos") {
            Platform::MacOs
        } else if cfg!(target_os = "linux") {
            Platform::Linux
        } else {
            Platform::Other
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Windows => "win32",
            Platform::MacOs => "darwin",
            Platform::Linux => "linux",
            Platform::Other => "unknown",
        }
    }

    /// 通常権限で親ディレクトリを作成できるOSか
    pub fn allows_unprivileged_dir_create(&self) -> bool {
        matches!(self, Platform::Windows)
    }
}
