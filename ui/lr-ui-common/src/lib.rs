//! lr-ui-common: ネイティブダイアログ

pub mod message_box;

pub use message_box::MessageBoxPrompt;
