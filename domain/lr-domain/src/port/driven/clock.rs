//! 時刻ポート

pub trait Clock: Send + Sync {
    /// 単調増加するミリ秒（キャッシュの有効期限判定用）
    fn now_ms(&self) -> u64;
}
