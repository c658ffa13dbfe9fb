//! Artifact writing with optional gzip siblings.

use flate2::{Compression, write::GzEncoder};
use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

/// Write `data` to `path`, creating parent directories.
///
/// When `gzip` is set a `<path>.gz` sibling is written next to the plain file.
pub fn write_artifact(path: &Path, data: &[u8], gzip: bool) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, data)?;

    if gzip {
        let mut encoder = GzEncoder::new(Vec::with_capacity(data.len() / 2), Compression::best());
        encoder.write_all(data)?;
        fs::write(gz_path(path), encoder.finish()?)?;
    }
    Ok(())
}

/// `app.js` -> `app.js.gz`
pub fn gz_path(path: &Path) -> PathBuf {
    let mut os = path.as_os_str().to_owned();
    os.push(".gz");
    PathBuf::from(os)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::GzDecoder;
    use std::io::Read;
    use tempfile::TempDir;

    #[test]
    fn test_write_creates_parents() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("js/vendor/app.js");
        write_artifact(&path, b"var a;", false).unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"var a;");
        assert!(!gz_path(&path).exists());
    }

    #[test]
    fn test_write_gzip_sibling() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("css/app.css");
        write_artifact(&path, b"body{}", true).unwrap();

        let gz = fs::read(dir.path().join("css/app.css.gz")).unwrap();
        let mut decoded = String::new();
        GzDecoder::new(gz.as_slice())
            .read_to_string(&mut decoded)
            .unwrap();
        assert_eq!(decoded, "body{}");
    }
}
