//! 昇格実行ポート

use crate::error::DomainError;
use crate::model::CommandPlan;
use async_trait::async_trait;
use std::path::Path;

/// 昇格実行の出力
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecOutput {
    pub stdout: String,
    pub stderr: String,
}

/// 管理者権限でコマンド計画を実行する。
///
/// OSの認証ダイアログが出るため完了まで長時間かかりうる。
/// ダイアログを閉じられた場合は `DomainError::Execution` を返し、ハングもパニックもしない。
#[async_trait]
pub trait PrivilegedExecutor: Send + Sync {
    async fn run(&self, plan: &CommandPlan) -> Result<ExecOutput, DomainError>;

    /// 昇格した状態での存在確認
    async fn probe_exists(&self, path: &Path) -> Result<bool, DomainError>;
}
