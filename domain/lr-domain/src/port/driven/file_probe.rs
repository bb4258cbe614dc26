//! 通常権限での存在確認ポート

use crate::error::DomainError;
use std::path::Path;

pub trait FileProbe: Send + Sync {
    /// 存在すれば `Ok(true)`、ないと確定すれば `Ok(false)`。
    /// 権限不足などで判定できない場合は `Err`（呼び出し側が昇格確認に切り替える）。
    fn exists(&self, path: &Path) -> Result<bool, DomainError>;

    /// 診断用のファイルサイズ（取得できなければ None）
    fn size(&self, path: &Path) -> Option<u64>;
}
