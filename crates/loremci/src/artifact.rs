//! Writing generated text to disk.

use std::fs;
use std::path::{Path, PathBuf};

use ecow::eco_format;

use crate::diag::StrResult;

/// Writes `text` to `dir/file_name`, creating `dir` if necessary.
///
/// An existing file is overwritten. The write is not atomic.
pub fn write(dir: &Path, file_name: &str, text: &str) -> StrResult<PathBuf> {
    fs::create_dir_all(dir).map_err(|err| {
        eco_format!("failed to create output directory {} ({err})", dir.display())
    })?;

    let path = dir.join(file_name);
    fs::write(&path, text)
        .map_err(|err| eco_format!("failed to write {} ({err})", path.display()))?;

    tracing::info!(path = %path.display(), chars = text.chars().count(), "wrote artifact");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_creates_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("assets").join("artifacts");
        let path = write(&dir, "result.txt", "Lorem ipsum.").unwrap();
        assert_eq!(path, dir.join("result.txt"));
        assert_eq!(fs::read_to_string(path).unwrap(), "Lorem ipsum.");
    }

    #[test]
    fn test_write_overwrites() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), "result2.txt", "A much longer first paragraph.").unwrap();
        let path = write(tmp.path(), "result2.txt", "Short.").unwrap();
        assert_eq!(fs::read_to_string(path).unwrap(), "Short.");
        assert_eq!(fs::read_dir(tmp.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_write_into_file_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let blocker = tmp.path().join("assets");
        fs::write(&blocker, "").unwrap();
        let err = write(&blocker, "result.txt", "Lorem.").unwrap_err();
        assert!(err.contains("failed to create output directory"));
    }
}
