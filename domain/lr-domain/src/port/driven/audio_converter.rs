//! 音声検証・変換ポート

use crate::error::DomainError;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

#[async_trait]
pub trait AudioConverter: Send + Sync {
    /// デコード可能な音声ストリームか
    async fn is_audio_file(&self, path: &Path) -> bool;

    /// WAVに変換したファイルのパスを返す。
    /// 既にWAVなら入力をそのまま返す。
    async fn convert_to_wav(&self, path: &Path) -> Result<PathBuf, DomainError>;

    /// `convert_to_wav` が新しく作った一時ファイルを削除する
    fn discard(&self, converted: &Path) -> Result<(), DomainError>;
}
