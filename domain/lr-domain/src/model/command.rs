//! 昇格実行するコマンド計画
//!
//! 文字列連結ではなく型付きのステップで表現し、
//! シェル構文への変換はインフラ層のレンダラが行う。

use std::path::{Path, PathBuf};

/// 1ステップ分の操作
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandStep {
    /// ディレクトリがなければ作成
    EnsureDir(PathBuf),
    /// コピー元があり、コピー先がない場合だけコピー（バックアップ用）
    CopyIfAbsent { from: PathBuf, to: PathBuf },
    /// 上書きコピー
    Copy { from: PathBuf, to: PathBuf },
    /// ファイル削除
    Delete(PathBuf),
}

impl CommandStep {
    /// ログ用の短い名前
    pub fn label(&self) -> &'static str {
        match self {
            Self::EnsureDir(_) => "ensure-dir",
            Self::CopyIfAbsent { .. } => "copy-if-absent",
            Self::Copy { .. } => "copy",
            Self::Delete(_) => "delete",
        }
    }
}

/// 順序付きのステップ列。1回の実行で組み立てて捨てる。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandPlan {
    steps: Vec<CommandStep>,
}

impl CommandPlan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ensure_dir(mut self, dir: &Path) -> Self {
        self.steps.push(CommandStep::EnsureDir(dir.to_path_buf()));
        self
    }

    pub fn copy_if_absent(mut self, from: &Path, to: &Path) -> Self {
        self.steps.push(CommandStep::CopyIfAbsent {
            from: from.to_path_buf(),
            to: to.to_path_buf(),
        });
        self
    }

    pub fn copy(mut self, from: &Path, to: &Path) -> Self {
        self.steps.push(CommandStep::Copy {
            from: from.to_path_buf(),
            to: to.to_path_buf(),
        });
        self
    }

    pub fn delete(mut self, path: &Path) -> Self {
        self.steps.push(CommandStep::Delete(path.to_path_buf()));
        self
    }

    pub fn steps(&self) -> &[CommandStep] {
        &self.steps
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn summary(&self) -> String {
        self.steps
            .iter()
            .map(CommandStep::label)
            .collect::<Vec<_>>()
            .join(" -> ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_keeps_insertion_order() {
        let plan = CommandPlan::new()
            .ensure_dir(Path::new("/d"))
            .copy_if_absent(Path::new("/d/a"), Path::new("/d/a.backup"))
            .copy(Path::new("/tmp/n.wav"), Path::new("/d/a"));
        assert_eq!(plan.summary(), "ensure-dir -> copy-if-absent -> copy");
        assert_eq!(plan.steps().len(), 3);
    }
}
