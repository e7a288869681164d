//! Markdown file reading
//!
//! Provides the storage boundary of the preview pipeline:
//! - UTF-8 (with or without BOM) and UTF-16 encoding detection
//! - file size limits
//! - structured errors that never mutate navigation state

use crate::config::MAX_FILE_SIZE;
use crate::error::{FileError, FileResult};
use std::path::{Path, PathBuf};

/// Detected encoding of a file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileEncoding {
    /// UTF-8 without BOM
    Utf8,
    /// UTF-8 with BOM
    Utf8Bom,
    /// UTF-16 Little Endian with BOM
    Utf16Le,
    /// UTF-16 Big Endian with BOM
    Utf16Be,
    /// Undecodable binary content
    Unknown,
}

/// Read a markdown file to a string, enforcing the default size limit
pub fn read_markdown_file(path: impl AsRef<Path>) -> FileResult<String> {
    read_markdown_file_with_limit(path, MAX_FILE_SIZE)
}

/// Read a markdown file to a string with an explicit size limit
pub fn read_markdown_file_with_limit(
    path: impl AsRef<Path>,
    max_size: u64,
) -> FileResult<String> {
    let path = path.as_ref();

    let metadata = match path.metadata() {
        Ok(m) => m,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(FileError::NotFound {
                path: path.to_path_buf(),
            });
        }
        Err(e) => {
            return Err(FileError::ReadError {
                path: path.to_path_buf(),
                source: e,
            });
        }
    };

    if !metadata.is_file() {
        return Err(FileError::NotAFile {
            path: path.to_path_buf(),
        });
    }

    if metadata.len() > max_size {
        return Err(FileError::TooLarge {
            path: path.to_path_buf(),
            size: metadata.len(),
            max_size,
        });
    }

    let bytes = std::fs::read(path).map_err(|e| FileError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;

    let encoding = detect_encoding(&bytes);
    log::debug!(
        "read {} ({} bytes, {:?})",
        path.display(),
        bytes.len(),
        encoding
    );

    decode_content(&bytes, encoding).ok_or_else(|| FileError::DecodeError {
        path: path.to_path_buf(),
    })
}

/// Directory used to resolve a document's relative resources
///
/// The parent of `path`, falling back to `.` for bare filenames.
pub fn resolve_dirname(path: &Path) -> PathBuf {
    path.parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Detect file encoding from raw bytes
fn detect_encoding(bytes: &[u8]) -> FileEncoding {
    if bytes.len() >= 3 && bytes[0] == 0xEF && bytes[1] == 0xBB && bytes[2] == 0xBF {
        return FileEncoding::Utf8Bom;
    }
    if bytes.len() >= 2 {
        if bytes[0] == 0xFF && bytes[1] == 0xFE {
            return FileEncoding::Utf16Le;
        }
        if bytes[0] == 0xFE && bytes[1] == 0xFF {
            return FileEncoding::Utf16Be;
        }
    }

    if std::str::from_utf8(bytes).is_ok() {
        FileEncoding::Utf8
    } else {
        FileEncoding::Unknown
    }
}

/// Decode bytes to a string, or `None` when the content is not text
fn decode_content(bytes: &[u8], encoding: FileEncoding) -> Option<String> {
    match encoding {
        FileEncoding::Utf8 => std::str::from_utf8(bytes).ok().map(str::to_string),
        FileEncoding::Utf8Bom => std::str::from_utf8(&bytes[3..]).ok().map(str::to_string),
        FileEncoding::Utf16Le => decode_utf16(&bytes[2..], u16::from_le_bytes),
        FileEncoding::Utf16Be => decode_utf16(&bytes[2..], u16::from_be_bytes),
        FileEncoding::Unknown => None,
    }
}

fn decode_utf16(bytes: &[u8], combine: fn([u8; 2]) -> u16) -> Option<String> {
    if bytes.len() % 2 != 0 {
        return None;
    }
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| combine([pair[0], pair[1]]))
        .collect();
    String::from_utf16(&units).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn init_logs() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    #[test]
    fn test_read_utf8_file() {
        init_logs();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.md");
        std::fs::write(&path, "# Heading\n").unwrap();
        assert_eq!(read_markdown_file(&path).unwrap(), "# Heading\n");
    }

    #[test]
    fn test_read_utf8_bom_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bom.md");
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(&[0xEF, 0xBB, 0xBF]).unwrap();
        f.write_all("text".as_bytes()).unwrap();
        drop(f);
        assert_eq!(read_markdown_file(&path).unwrap(), "text");
    }

    #[test]
    fn test_read_utf16_le_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("utf16.md");
        let mut bytes = vec![0xFF, 0xFE];
        for unit in "hi".encode_utf16() {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }
        std::fs::write(&path, bytes).unwrap();
        assert_eq!(read_markdown_file(&path).unwrap(), "hi");
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_markdown_file(dir.path().join("missing.md")).unwrap_err();
        assert!(matches!(err, FileError::NotFound { .. }));
    }

    #[test]
    fn test_directory_is_not_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_markdown_file(dir.path()).unwrap_err();
        assert!(matches!(err, FileError::NotAFile { .. }));
    }

    #[test]
    fn test_binary_file_is_decode_error() {
        init_logs();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bin.md");
        std::fs::write(&path, [0x00, 0x9F, 0x92, 0x96, 0xFF, 0x01]).unwrap();
        let err = read_markdown_file(&path).unwrap_err();
        assert!(matches!(err, FileError::DecodeError { .. }));
    }

    #[test]
    fn test_oversize_file_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("big.md");
        std::fs::write(&path, "0123456789").unwrap();
        let err = read_markdown_file_with_limit(&path, 4).unwrap_err();
        assert!(matches!(err, FileError::TooLarge { size: 10, .. }));
    }

    #[test]
    fn test_resolve_dirname() {
        assert_eq!(
            resolve_dirname(Path::new("/docs/a.md")),
            PathBuf::from("/docs")
        );
        assert_eq!(resolve_dirname(Path::new("a.md")), PathBuf::from("."));
    }
}
