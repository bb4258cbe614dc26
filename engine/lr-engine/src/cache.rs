//! バックアップ存在確認のTTL付きキャッシュ。
//!
//! 管理する着信音は1つなのでエントリも1つ。期限切れと明示的な無効化以外の追い出しはない。

use lr_domain::port::driven::Clock;
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Entry {
    exists: bool,
    observed_at_ms: u64,
}

#[derive(Debug, Default)]
struct Slot {
    entry: Option<Entry>,
    /// 変更（無効化・確定値の書込み）ごとに進む世代番号
    generation: u64,
}

/// 確認処理が導出を始めた時点の世代
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Generation(u64);

pub struct ExistenceCache {
    slot: Mutex<Slot>,
    ttl_ms: u64,
    clock: Arc<dyn Clock>,
}

impl ExistenceCache {
    pub fn new(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            slot: Mutex::new(Slot::default()),
            ttl_ms: ttl.as_millis().min(u64::MAX as u128) as u64,
            clock,
        }
    }

    /// 有効期間内の値があれば返す
    pub fn get(&self) -> Option<bool> {
        let now = self.clock.now_ms();
        let slot = self.lock();
        let entry = slot.entry?;
        if now.saturating_sub(entry.observed_at_ms) < self.ttl_ms {
            Some(entry.exists)
        } else {
            None
        }
    }

    /// 変更操作が確定させた値を書き込む
    pub fn set(&self, exists: bool) {
        let observed_at_ms = self.clock.now_ms();
        let mut slot = self.lock();
        slot.generation += 1;
        slot.entry = Some(Entry {
            exists,
            observed_at_ms,
        });
        tracing::debug!(exists, "backup existence cache updated");
    }

    pub fn invalidate(&self) {
        let mut slot = self.lock();
        slot.generation += 1;
        slot.entry = None;
        tracing::debug!("backup existence cache invalidated");
    }

    pub fn generation(&self) -> Generation {
        Generation(self.lock().generation)
    }

    /// 導出開始後に変更が入っていなければ書き込む。
    /// 実行中の置換／復元より前に観測した値で上書きしないためのもの。
    pub fn set_if_current(&self, observed: Generation, exists: bool) -> bool {
        let observed_at_ms = self.clock.now_ms();
        let mut slot = self.lock();
        if slot.generation != observed.0 {
            tracing::debug!(exists, "discarding backup existence derived before a mutation");
            return false;
        }
        slot.entry = Some(Entry {
            exists,
            observed_at_ms,
        });
        true
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Slot> {
        // 中身は Copy な値だけなので、ポイズンしても値は壊れていない
        self.slot.lock().unwrap_or_else(|e| e.into_inner())
    }
}
