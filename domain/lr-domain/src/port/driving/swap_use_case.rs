//! 置換／復元ユースケースポート

use crate::model::{BackupStatus, SwapOutcome};
use async_trait::async_trait;
use std::path::Path;

/// UI層に公開する操作。
///
/// いずれも失敗を値で返し、内部エラーを呼び出し元に漏らさない。
/// 再試行しても安全（同じファイルでの再置換、バックアップなしでの復元）。
#[async_trait]
pub trait SwapUseCase: Send + Sync {
    /// 着信音を指定の音声ファイルで置換
    async fn replace(&self, source: &Path) -> SwapOutcome;

    /// バックアップから元の着信音に戻す
    async fn restore(&self) -> SwapOutcome;

    /// 復元可能か（キャッシュ付き）
    async fn check_backup_exists(&self) -> BackupStatus;
}
