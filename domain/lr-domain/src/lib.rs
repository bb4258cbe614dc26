//! LINE Ringtone Replacer ドメイン層
//!
//! 着信音の置換／復元に関するモデルとポートを定義する。
//! ヘキサゴナルアーキテクチャの最内層で、OS依存の処理は一切持たない。

pub mod error; // ドメインエラー定義
pub mod model; // ドメインモデル（値オブジェクト、設定型）
pub mod port; // ポート（driving/driven）

pub use error::DomainError; // エラー型を再エクスポート
