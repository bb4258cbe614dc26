//! 被駆動ポート（出力インターフェース）。
//!
//! ドメインが外部に求める機能を定義する。
//! インフラ層のアダプタが実装する。

mod audio_converter;
mod clock;
mod config_repository;
mod confirmation_prompt;
mod file_probe;
mod path_resolver;
mod privileged_executor;

pub use audio_converter::*;
pub use clock::*;
pub use config_repository::*;
pub use confirmation_prompt::*;
pub use file_probe::*;
pub use path_resolver::*;
pub use privileged_executor::*;
