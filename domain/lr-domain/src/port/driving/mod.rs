//! 駆動ポート（UI層から呼び出されるユースケースの入口）

mod swap_use_case;

pub use swap_use_case::*;
