use crate::DomainError;
use std::path::{Path, PathBuf};

/// 既定の着信音ファイル名
pub const DEFAULT_RESOURCE_FILE_NAME: &str = "VoipRing.wav";

/// バックアップファイルの接尾辞
pub const BACKUP_SUFFIX: &str = ".backup";

/// データディレクトリ配下で着信音を置くサブディレクトリ
pub const SOUND_SUBDIR: &str = "sound";

/// 置換対象のファイル（対象アプリが所有する着信音）。
///
/// ファイル名は生成時に検証され、以後変わらない。
/// バックアップは常に同じディレクトリの `<file_name>.backup` に1世代だけ置かれる。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetResource {
    directory: PathBuf,
    file_name: String,
}

impl TargetResource {
    pub fn new(directory: impl Into<PathBuf>, file_name: impl Into<String>) -> Result<Self, DomainError> {
        let file_name = file_name.into();
        validate_file_name(&file_name)?;
        Ok(Self {
            directory: directory.into(),
            file_name,
        })
    }

    /// 解決済みのデータディレクトリから作る（`<data>/sound/<file_name>`）
    pub fn in_data_dir(data_dir: &Path, file_name: &str) -> Result<Self, DomainError> {
        Self::new(data_dir.join(SOUND_SUBDIR), file_name)
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn target_path(&self) -> PathBuf {
        self.directory.join(&self.file_name)
    }

    pub fn backup_path(&self) -> PathBuf {
        self.directory
            .join(format!("{}{}", self.file_name, BACKUP_SUFFIX))
    }
}

/// ファイル名の検証（区切り文字や相対指定を拒否）
pub fn validate_file_name(name: &str) -> Result<(), DomainError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(DomainError::ValidationError(
            "resource file name must not be empty".into(),
        ));
    }
    if trimmed != name {
        return Err(DomainError::ValidationError(format!(
            "resource file name must not have surrounding whitespace: {name:?}"
        )));
    }
    if name == "." || name == ".." {
        return Err(DomainError::ValidationError(format!(
            "resource file name is not a file: {name}"
        )));
    }
    if name.contains(['/', '\\', ':', '\0']) {
        return Err(DomainError::ValidationError(format!(
            "resource file name must not contain path separators: {name}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backup_sits_next_to_target() {
        let res = TargetResource::in_data_dir(Path::new("/data"), "VoipRing.wav").unwrap();
        assert_eq!(res.directory(), Path::new("/data/sound"));
        assert_eq!(res.target_path(), Path::new("/data/sound/VoipRing.wav"));
        assert_eq!(
            res.backup_path(),
            Path::new("/data/sound/VoipRing.wav.backup")
        );
    }

    #[test]
    fn rejects_names_that_escape_the_directory() {
        for bad in ["", " ", "..", ".", "a/b.wav", r"a\b.wav", "C:x.wav", " x.wav"] {
            assert!(TargetResource::new("/data", bad).is_err(), "{bad:?}");
        }
    }
}
