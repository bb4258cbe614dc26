//! 管理者権限でのコマンド実行アダプター
//!
//! - Windows: `powershell.exe -EncodedCommand` を `runas` で起動（UAC）
//! - macOS: `osascript` の `with administrator privileges`
//! - その他のUnix: `pkexec sh -c`
//!
//! 認証ダイアログを閉じられた場合も `DomainError::Execution` として返す。

mod dialect;
#[cfg(not(windows))]
mod unix;
#[cfg(windows)]
mod windows_runas;

pub use dialect::{encode_powershell_command, encode_utf16le_base64, escape_applescript, ShellDialect};

use async_trait::async_trait;
use lr_domain::model::{CommandPlan, Platform};
use lr_domain::port::driven::{ExecOutput, PrivilegedExecutor};
use lr_domain::DomainError;
use std::path::Path;
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct ElevatedExecutor {
    platform: Platform,
    app_name: String,
}

impl ElevatedExecutor {
    /// `app_name` は認証ダイアログに表示される（英数字と空白のみ）
    pub fn new(platform: Platform, app_name: impl Into<String>) -> Self {
        Self {
            platform,
            app_name: app_name.into(),
        }
    }

    pub fn dialect(&self) -> ShellDialect {
        dialect_for(self.platform)
    }

    async fn elevate(&self, script: String) -> Result<ExecOutput, DomainError> {
        info!(platform = self.platform.as_str(), "requesting administrator rights");
        debug!(script = %script, "elevated script");
        match self.platform {
            Platform::Windows => run_windows(script).await,
            Platform::MacOs => run_osascript(&script, &self.app_name).await,
            Platform::Linux | Platform::Other => run_pkexec(&script).await,
        }
    }
}

pub fn dialect_for(platform: Platform) -> ShellDialect {
    match platform {
        Platform::Windows => ShellDialect::PowerShell,
        _ => ShellDialect::Posix,
    }
}

#[async_trait]
impl PrivilegedExecutor for ElevatedExecutor {
    async fn run(&self, plan: &CommandPlan) -> Result<ExecOutput, DomainError> {
        if plan.is_empty() {
            return Ok(ExecOutput::default());
        }
        self.elevate(self.dialect().render(plan)).await
    }

    async fn probe_exists(&self, path: &Path) -> Result<bool, DomainError> {
        let dialect = self.dialect();
        let out = self.elevate(dialect.presence_script(path)).await?;
        Ok(dialect.parse_presence(&out.stdout))
    }
}

#[cfg(windows)]
async fn run_windows(script: String) -> Result<ExecOutput, DomainError> {
    tokio::task::spawn_blocking(move || windows_runas::run_elevated(&script))
        .await
        .map_err(|e| DomainError::execution(format!("elevation task failed: {e}"), None))?
}

#[cfg(not(windows))]
async fn run_windows(_script: String) -> Result<ExecOutput, DomainError> {
    Err(DomainError::execution(
        "PowerShell elevation is only available on Windows",
        None,
    ))
}

#[cfg(not(windows))]
async fn run_osascript(script: &str, app_name: &str) -> Result<ExecOutput, DomainError> {
    unix::run_osascript(script, app_name).await
}

#[cfg(windows)]
async fn run_osascript(_script: &str, _app_name: &str) -> Result<ExecOutput, DomainError> {
    Err(DomainError::execution("osascript is not available on Windows", None))
}

#[cfg(not(windows))]
async fn run_pkexec(script: &str) -> Result<ExecOutput, DomainError> {
    unix::run_pkexec(script).await
}

#[cfg(windows)]
async fn run_pkexec(_script: &str) -> Result<ExecOutput, DomainError> {
    Err(DomainError::execution("pkexec is not available on Windows", None))
}
