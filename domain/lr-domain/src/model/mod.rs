//! ドメインモデル
//!
//! 値オブジェクト、コマンド計画、操作結果、設定型を定義

mod audio; // 対応音声フォーマット
mod command; // 昇格実行するコマンド計画
mod config; // アプリ設定
mod language; // 言語設定（日本語/英語）
mod message; // 利用者向けメッセージ
mod outcome; // 操作結果と状態遷移
mod platform; // 実行中のOS
mod resource; // 置換対象の着信音ファイル

pub use audio::*;
pub use command::*;
pub use config::*;
pub use language::*;
pub use message::*;
pub use outcome::*;
pub use platform::*;
pub use resource::*;
