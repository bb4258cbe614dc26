//! ポート（ヘキサゴナルアーキテクチャのインターフェース）

pub mod driven;
pub mod driving;
