//! 言語設定
//!
//! 利用者向けメッセージの表示言語を制御する。

use serde::{Deserialize, Serialize};
use std::fmt;

/// サポートする言語
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Language {
    /// 日本語
    #[default]
    #[serde(rename = "ja")]
    Japanese,
    /// 英語
    #[serde(rename = "en")]
    English,
}

impl Language {
    /// 言語コードから変換
    pub fn from_code(code: &str) -> Self {
        match code.to_lowercase().as_str() {
            "en" | "english" => Language::English,
            "ja" | "jp" | "japanese" => Language::Japanese,
            _ => Language::default(),
        }
    }

    /// 言語コードに変換
    pub fn to_code(&self) -> &'static str {
        match self {
            Language::Japanese => "ja",
            Language::English => "en",
        }
    }

    /// 表示名を取得
    pub fn display_name(&self) -> &'static str {
        match self {
            Language::Japanese => "日本語",
            Language::English => "English",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_code() {
        assert_eq!(Language::from_code("ja"), Language::Japanese);
        assert_eq!(Language::from_code("JP"), Language::Japanese);
        assert_eq!(Language::from_code("en"), Language::English);
        assert_eq!(Language::from_code("unknown"), Language::Japanese); // 既定
    }

    #[test]
    fn serde_uses_language_codes() {
        let json = serde_json::to_string(&Language::English).unwrap();
        assert_eq!(json, "\"en\"");
        let back: Language = serde_json::from_str("\"ja\"").unwrap();
        assert_eq!(back, Language::Japanese);
    }
}
