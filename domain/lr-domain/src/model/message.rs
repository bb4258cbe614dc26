//! 利用者向けメッセージ（日本語／英語）
//!
//! 「復元する元ファイルがない」「管理者権限の失敗」「音声ではない」は
//! 利用者が取るべき行動が違うため、必ず別の文言にする。

use super::{Language, OperationKind};
use crate::DomainError;

/// 日本語表示用アプリ名
pub const APP_DISPLAY_NAME_JA: &str = "LINE着信音置換くん";
/// 英語表示用アプリ名（昇格ダイアログにも使うため英数字のみ）
pub const APP_DISPLAY_NAME_EN: &str = "LINE Ringtone Replacer";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserMessage {
    ReplaceSucceeded,
    RestoreSucceeded,
    FileNotFound,
    NotAudio,
    ConversionFailed,
    DirectoryUnresolved,
    NoBackup,
    ExecutionFailed {
        operation: OperationKind,
        detail: String,
        stderr: Option<String>,
    },
    VerificationFailed,
    Cancelled,
}

impl UserMessage {
    /// ドメインエラーから文言を選ぶ
    pub fn for_error(operation: OperationKind, err: &DomainError) -> Self {
        match err {
            DomainError::FileNotFound(_) => Self::FileNotFound,
            DomainError::NotAudio(_) => Self::NotAudio,
            DomainError::ConversionFailed(_) => Self::ConversionFailed,
            DomainError::DirectoryUnresolved => Self::DirectoryUnresolved,
            DomainError::NoBackup(_) => Self::NoBackup,
            DomainError::VerificationFailed(_) => Self::VerificationFailed,
            DomainError::UserCancelled => Self::Cancelled,
            DomainError::Execution { message, stderr } => Self::ExecutionFailed {
                operation,
                detail: message.clone(),
                stderr: stderr.clone(),
            },
            other => Self::ExecutionFailed {
                operation,
                detail: other.to_string(),
                stderr: None,
            },
        }
    }

    pub fn text(&self, lang: Language) -> String {
        match lang {
            Language::Japanese => self.japanese(),
            Language::English => self.english(),
        }
    }

    fn japanese(&self) -> String {
        match self {
            Self::ReplaceSucceeded => "着信音の置換が完了しました！".into(),
            Self::RestoreSucceeded => {
                "デフォルトの着信音に戻しました。バックアップファイルも削除しました。".into()
            }
            Self::FileNotFound => "ファイルが見つかりません。".into(),
            Self::NotAudio => "選択されたファイルは音声ファイルではありません。".into(),
            Self::ConversionFailed => "音声ファイルの変換に失敗しました。".into(),
            Self::DirectoryUnresolved => "LINEのデータディレクトリが見つかりません。".into(),
            Self::NoBackup => "バックアップファイルが見つかりません。".into(),
            Self::ExecutionFailed {
                operation,
                detail,
                stderr,
            } => {
                let action = match operation {
                    OperationKind::Replace => "着信音置換",
                    OperationKind::Restore => "復元",
                };
                let mut msg = format!("管理者権限での{action}に失敗しました: {detail}");
                if let Some(stderr) = stderr {
                    msg.push_str(&format!("\n詳細: {}", stderr.trim()));
                }
                msg
            }
            Self::VerificationFailed => concat!(
                "着信音ファイルの置換に失敗しました。以下の原因が考えられます：\n",
                "・LINEアプリがファイルをロックしている\n",
                "・管理者権限が正しく機能していない\n",
                "・ファイルパスに問題がある\n\n",
                "LINEアプリを完全に終了してから再試行してください。"
            )
            .into(),
            Self::Cancelled => "操作がキャンセルされました。".into(),
        }
    }

    fn english(&self) -> String {
        match self {
            Self::ReplaceSucceeded => "The ringtone has been replaced.".into(),
            Self::RestoreSucceeded => {
                "The default ringtone has been restored and the backup removed.".into()
            }
            Self::FileNotFound => "The selected file was not found.".into(),
            Self::NotAudio => "The selected file is not an audio file.".into(),
            Self::ConversionFailed => "Failed to convert the audio file.".into(),
            Self::DirectoryUnresolved => "The LINE data directory could not be found.".into(),
            Self::NoBackup => "No backup file was found. There is nothing to restore.".into(),
            Self::ExecutionFailed {
                operation,
                detail,
                stderr,
            } => {
                let action = match operation {
                    OperationKind::Replace => "replace the ringtone",
                    OperationKind::Restore => "restore the ringtone",
                };
                let mut msg = format!("Failed to {action} with administrator rights: {detail}");
                if let Some(stderr) = stderr {
                    msg.push_str(&format!("\nDetails: {}", stderr.trim()));
                }
                msg
            }
            Self::VerificationFailed => concat!(
                "The command reported success but the ringtone file is missing.\n",
                "LINE may be holding the file open, or elevation did not take effect.\n\n",
                "Quit LINE completely and try again."
            )
            .into(),
            Self::Cancelled => "The operation was cancelled.".into(),
        }
    }
}

/// 変更前に表示する確認ダイアログの内容
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmRequest {
    pub operation: OperationKind,
    pub title: String,
    pub message: String,
    pub detail: String,
}

impl ConfirmRequest {
    pub fn new(operation: OperationKind, lang: Language) -> Self {
        match lang {
            Language::Japanese => Self {
                operation,
                title: format!("{APP_DISPLAY_NAME_JA} - 実行確認"),
                message: "LINEアプリは実行中のまま続行することをお勧めします".into(),
                detail: concat!(
                    "LINEアプリは起動直後の最初の着信時に、強制的にデフォルトの着信音に戻す処理が行われます。\n\n",
                    "そのためLINEアプリを起動中に本アプリケーションを用いて着信音を置換してください。"
                )
                .into(),
            },
            Language::English => Self {
                operation,
                title: format!("{APP_DISPLAY_NAME_EN} - Confirm"),
                message: "It is recommended to keep LINE running while you continue".into(),
                detail: concat!(
                    "LINE resets the ringtone to its default on the first incoming call after it starts.\n\n",
                    "Replace the ringtone while LINE is already running."
                )
                .into(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distinct_guidance_for_distinct_failures() {
        let lang = Language::English;
        let no_backup = UserMessage::NoBackup.text(lang);
        let not_audio = UserMessage::NotAudio.text(lang);
        let admin = UserMessage::for_error(
            OperationKind::Restore,
            &DomainError::execution("User canceled.", None),
        )
        .text(lang);
        assert_ne!(no_backup, not_audio);
        assert_ne!(no_backup, admin);
        assert!(admin.contains("administrator"));
    }

    #[test]
    fn execution_message_carries_stderr() {
        let err = DomainError::execution("exit code 1", Some("Access is denied.\r\n".into()));
        let text = UserMessage::for_error(OperationKind::Replace, &err).text(Language::Japanese);
        assert!(text.starts_with("管理者権限での着信音置換に失敗しました: exit code 1"));
        assert!(text.ends_with("詳細: Access is denied."));
    }
}
