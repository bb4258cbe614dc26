//! 操作結果と状態遷移

use serde::Serialize;
use std::fmt;

/// 利用者に見せる失敗分類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    FileNotFound,
    NotAudio,
    ConversionFailed,
    DirectoryUnresolved,
    NoBackup,
    ExecutionError,
    VerificationFailed,
    UserCancelled,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FileNotFound => "FileNotFound",
            Self::NotAudio => "NotAudio",
            Self::ConversionFailed => "ConversionFailed",
            Self::DirectoryUnresolved => "DirectoryUnresolved",
            Self::NoBackup => "NoBackup",
            Self::ExecutionError => "ExecutionError",
            Self::VerificationFailed => "VerificationFailed",
            Self::UserCancelled => "UserCancelled",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 置換／復元の結果（UI層へ返す値）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SwapOutcome {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<FailureKind>,
}

impl SwapOutcome {
    pub fn succeeded(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            failure: None,
        }
    }

    pub fn failed(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            failure: Some(kind),
        }
    }
}

/// バックアップ存在確認の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BackupStatus {
    pub exists: bool,
}

/// 操作の種類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    Replace,
    Restore,
}

impl OperationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Replace => "replace",
            Self::Restore => "restore",
        }
    }
}

/// 置換／復元の状態機械
///
/// `Idle → Validating → (NeedsBackup | NoBackupNeeded) → Mutating → Verifying → {Succeeded, Failed}`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapPhase {
    Idle,
    Validating,
    NeedsBackup,
    NoBackupNeeded,
    Mutating,
    Verifying,
    Succeeded,
    Failed,
}

impl SwapPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Validating => "validating",
            Self::NeedsBackup => "needs-backup",
            Self::NoBackupNeeded => "no-backup-needed",
            Self::Mutating => "mutating",
            Self::Verifying => "verifying",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
        }
    }

    /// 許可された遷移か
    pub fn can_advance_to(&self, next: SwapPhase) -> bool {
        use SwapPhase::*;
        if next == Failed {
            return !matches!(self, Succeeded | Failed);
        }
        matches!(
            (self, next),
            (Idle, Validating)
                | (Validating, NeedsBackup)
                | (Validating, NoBackupNeeded)
                | (NeedsBackup, Mutating)
                | (NoBackupNeeded, Mutating)
                | (Mutating, Verifying)
                | (Verifying, Succeeded)
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }
}
