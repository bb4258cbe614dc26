//! 変更前の確認ダイアログポート

use crate::model::ConfirmRequest;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmDecision {
    Continue,
    Cancel,
}

/// 対象アプリがファイルを開いている可能性があるOSでのみ実際に表示する。
/// 表示はブロッキングなので、呼び出し側は非同期ランタイム外で実行する。
pub trait ConfirmationPrompt: Send + Sync {
    fn ask(&self, request: &ConfirmRequest) -> ConfirmDecision;
}

/// 常に続行する（確認不要な環境・テストモード用）
#[derive(Debug, Default, Clone, Copy)]
pub struct AutoContinue;

impl ConfirmationPrompt for AutoContinue {
    fn ask(&self, _request: &ConfirmRequest) -> ConfirmDecision {
        ConfirmDecision::Continue
    }
}
