//! 時刻アダプター
use lr_domain::port::driven::Clock;
use std::time::Instant;

/// 生成時点からの経過ミリ秒（単調増加、壁時計の変更に影響されない）
#[derive(Debug, Clone, Copy)]
pub struct ClockAdapter {
    origin: Instant,
}

impl ClockAdapter {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for ClockAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ClockAdapter {
    fn now_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn never_goes_backwards() {
        let clock = ClockAdapter::new();
        let a = clock.now_ms();
        std::thread::sleep(std::time::Duration::from_millis(5));
        let b = clock.now_ms();
        assert!(b >= a + 5);
    }
}
