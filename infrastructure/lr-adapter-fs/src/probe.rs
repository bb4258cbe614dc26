use lr_domain::port::driven::FileProbe;
use lr_domain::DomainError;
use std::io;
use std::path::Path;

/// 通常権限での存在確認
#[derive(Debug, Default, Clone, Copy)]
pub struct FsProbe;

impl FsProbe {
    pub fn new() -> Self {
        Self
    }
}

impl FileProbe for FsProbe {
    fn exists(&self, path: &Path) -> Result<bool, DomainError> {
        path.try_exists().map_err(|e| classify(path, e))
    }

    fn size(&self, path: &Path) -> Option<u64> {
        std::fs::metadata(path).ok().map(|m| m.len())
    }
}

/// 権限不足だけは呼び出し側が昇格確認に切り替えられるよう区別する
fn classify(path: &Path, err: io::Error) -> DomainError {
    match err.kind() {
        io::ErrorKind::PermissionDenied => DomainError::AccessDenied(path.display().to_string()),
        _ => DomainError::IoError(format!("{}: {err}", path.display())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn reports_presence_and_size() {
        let tmp = tempdir().unwrap();
        let file = tmp.path().join("VoipRing.wav");
        std::fs::write(&file, b"RIFF1234").unwrap();

        let probe = FsProbe::new();
        assert_eq!(probe.exists(&file), Ok(true));
        assert_eq!(probe.exists(tmp.path()), Ok(true));
        assert_eq!(probe.exists(&tmp.path().join("missing")), Ok(false));
        assert_eq!(probe.size(&file), Some(8));
        assert_eq!(probe.size(&tmp.path().join("missing")), None);
    }

    #[test]
    fn permission_errors_are_access_denied() {
        let path = Path::new("/locked/VoipRing.wav.backup");
        let err = classify(path, io::Error::from(io::ErrorKind::PermissionDenied));
        assert!(matches!(err, DomainError::AccessDenied(p) if p.contains("VoipRing")));

        let err = classify(path, io::Error::from(io::ErrorKind::Other));
        assert!(matches!(err, DomainError::IoError(_)));
    }
}
