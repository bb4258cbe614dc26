//! ドメインエラー型

use crate::model::FailureKind;
use thiserror::Error;

/// ドメイン層のエラー型
/// 各バリアントは特定の失敗シナリオを表現
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// 置換元のファイルが存在しない
    #[error("file not found: {0}")]
    FileNotFound(String),

    /// 音声として解釈できないファイル
    #[error("not an audio file: {0}")]
    NotAudio(String),

    /// WAVへの変換に失敗
    #[error("audio conversion failed: {0}")]
    ConversionFailed(String),

    /// 対象アプリのデータディレクトリが見つからない
    #[error("data directory could not be resolved")]
    DirectoryUnresolved,

    /// 復元に使うバックアップがない
    #[error("no backup found at {0}")]
    NoBackup(String),

    /// 昇格実行の失敗（拒否／ダイアログを閉じた／コマンド失敗）
    #[error("privileged execution failed: {message}")]
    Execution {
        message: String,
        /// 診断用に残す標準エラー出力（部分的な場合あり）
        stderr: Option<String>,
    },

    /// コマンドは成功を返したが事後条件を満たさない
    #[error("verification failed: {0}")]
    VerificationFailed(String),

    /// 確認ダイアログでキャンセルされた
    #[error("operation cancelled by user")]
    UserCancelled,

    /// 通常権限でのアクセス拒否
    #[error("access denied: {0}")]
    AccessDenied(String),

    /// ファイルI/Oエラー
    #[error("IO error: {0}")]
    IoError(String),

    /// 設定値が無効
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// 設定ファイルの読み込み失敗
    #[error("configuration load failed: {0}")]
    ConfigLoadFailed(String),

    /// バリデーションエラー
    #[error("validation error: {0}")]
    ValidationError(String),
}

impl DomainError {
    /// 昇格実行エラーを作る
    pub fn execution(message: impl Into<String>, stderr: Option<String>) -> Self {
        let stderr = stderr.filter(|s| !s.trim().is_empty());
        Self::Execution {
            message: message.into(),
            stderr,
        }
    }

    /// 利用者に見せる失敗分類へ変換する
    pub fn failure_kind(&self) -> FailureKind {
        match self {
            Self::FileNotFound(_) => FailureKind::FileNotFound,
            Self::NotAudio(_) => FailureKind::NotAudio,
            Self::ConversionFailed(_) => FailureKind::ConversionFailed,
            Self::DirectoryUnresolved => FailureKind::DirectoryUnresolved,
            Self::NoBackup(_) => FailureKind::NoBackup,
            Self::VerificationFailed(_) => FailureKind::VerificationFailed,
            Self::UserCancelled => FailureKind::UserCancelled,
            Self::Execution { .. }
            | Self::AccessDenied(_)
            | Self::IoError(_)
            | Self::InvalidConfig(_)
            | Self::ConfigLoadFailed(_)
            | Self::ValidationError(_) => FailureKind::ExecutionError,
        }
    }

    /// 昇格実行エラーに付いた診断テキスト
    pub fn diagnostic(&self) -> Option<&str> {
        match self {
            Self::Execution { stderr, .. } => stderr.as_deref(),
            _ => None,
        }
    }
}
