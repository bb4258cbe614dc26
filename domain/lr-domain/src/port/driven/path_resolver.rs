use std::path::PathBuf;

/// 対象アプリのデータディレクトリ解決ポート。
///
/// 見つからないのは想定内の結果なので `None` で返す（エラーにしない）。
pub trait PathResolver: Send + Sync {
    fn resolve(&self) -> Option<PathBuf>;
}
