//! 対応している音声ファイル形式

use std::path::Path;

/// 変換後のコンテナ拡張子
pub const TARGET_AUDIO_EXTENSION: &str = "wav";

/// 対応音声ファイル形式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioFormat {
    Mp3,
    Wav,
    Ogg,
    M4a,
    Flac,
    Aac,
}

impl AudioFormat {
    pub const ALL: [AudioFormat; 6] = [
        AudioFormat::Mp3,
        AudioFormat::Wav,
        AudioFormat::Ogg,
        AudioFormat::M4a,
        AudioFormat::Flac,
        AudioFormat::Aac,
    ];

    pub fn extension(&self) -> &'static str {
        match self {
            AudioFormat::Mp3 => "mp3",
            AudioFormat::Wav => "wav",
            AudioFormat::Ogg => "ogg",
            AudioFormat::M4a => "m4a",
            AudioFormat::Flac => "flac",
            AudioFormat::Aac => "aac",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            AudioFormat::Mp3 => "MP3 audio",
            AudioFormat::Wav => "WAV audio",
            AudioFormat::Ogg => "OGG audio",
            AudioFormat::M4a => "M4A audio",
            AudioFormat::Flac => "FLAC audio",
            AudioFormat::Aac => "AAC audio",
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        Self::ALL.into_iter().find(|f| f.extension() == ext)
    }

    /// ".mp3, .wav, ..." 形式の一覧
    pub fn extensions_display() -> String {
        Self::ALL
            .iter()
            .map(|f| format!(".{}", f.extension()))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// 既にWAVか（変換不要か）
pub fn is_target_container(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(TARGET_AUDIO_EXTENSION))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_format_case_insensitively() {
        assert_eq!(AudioFormat::from_path(Path::new("a/B.MP3")), Some(AudioFormat::Mp3));
        assert_eq!(AudioFormat::from_path(Path::new("x.txt")), None);
        assert_eq!(AudioFormat::from_path(Path::new("noext")), None);
        assert!(is_target_container(Path::new("ring.WAV")));
        assert!(!is_target_container(Path::new("ring.flac")));
    }

    #[test]
    fn display_list_has_dots() {
        assert_eq!(
            AudioFormat::extensions_display(),
            ".mp3, .wav, .ogg, .m4a, .flac, .aac"
        );
    }
}
