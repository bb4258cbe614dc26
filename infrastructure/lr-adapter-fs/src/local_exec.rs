//! テストモード用の実行器。昇格せずにコマンド計画をその場で適用する。

use async_trait::async_trait;
use lr_domain::model::{CommandPlan, CommandStep};
use lr_domain::port::driven::{ExecOutput, PrivilegedExecutor};
use lr_domain::DomainError;
use std::path::Path;
use tokio::fs;
use tracing::debug;

#[derive(Debug, Default, Clone, Copy)]
pub struct LocalExecutor;

impl LocalExecutor {
    pub fn new() -> Self {
        Self
    }

    async fn apply(&self, step: &CommandStep, out: &mut Vec<String>) -> Result<(), DomainError> {
        let fail = |e: std::io::Error| DomainError::execution(format!("{}: {e}", step.label()), None);
        match step {
            CommandStep::EnsureDir(dir) => {
                fs::create_dir_all(dir).await.map_err(fail)?;
                out.push(format!("ensured {}", dir.display()));
            }
            CommandStep::CopyIfAbsent { from, to } => {
                if exists(from).await? && !exists(to).await? {
                    fs::copy(from, to).await.map_err(fail)?;
                    out.push(format!("backed up {} -> {}", from.display(), to.display()));
                }
            }
            CommandStep::Copy { from, to } => {
                fs::copy(from, to).await.map_err(fail)?;
                out.push(format!("copied {} -> {}", from.display(), to.display()));
            }
            CommandStep::Delete(path) => match fs::remove_file(path).await {
                Ok(()) => out.push(format!("deleted {}", path.display())),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(fail(e)),
            },
        }
        Ok(())
    }
}

async fn exists(path: &Path) -> Result<bool, DomainError> {
    fs::try_exists(path)
        .await
        .map_err(|e| DomainError::execution(format!("{}: {e}", path.display()), None))
}

#[async_trait]
impl PrivilegedExecutor for LocalExecutor {
    async fn run(&self, plan: &CommandPlan) -> Result<ExecOutput, DomainError> {
        debug!(plan = %plan.summary(), "applying plan without elevation");
        let mut lines = Vec::new();
        for step in plan.steps() {
            self.apply(step, &mut lines).await?;
        }
        Ok(ExecOutput {
            stdout: lines.join("\n"),
            stderr: String::new(),
        })
    }

    async fn probe_exists(&self, path: &Path) -> Result<bool, DomainError> {
        exists(path).await
    }
}
