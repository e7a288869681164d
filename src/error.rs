//! Error types for the preview pipeline
//!
//! Errors are organized by category: file access, rendering, and
//! navigation. All of them are recovered locally and reported upward;
//! none should tear down a preview pane.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type encompassing all preview error categories
#[derive(Error, Debug)]
pub enum PreviewError {
    /// File access related errors
    #[error(transparent)]
    File(#[from] FileError),

    /// Rendering errors
    #[error(transparent)]
    Render(#[from] RenderError),

    /// Navigation errors
    #[error(transparent)]
    Navigation(#[from] NavigationError),

    /// Configuration errors
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// File access errors raised while loading markdown documents
#[derive(Error, Debug)]
pub enum FileError {
    /// File not found at the given path
    #[error("File not found: {path}")]
    NotFound { path: PathBuf },

    /// Path exists but is not a regular file
    #[error("Path is not a file: {path}")]
    NotAFile { path: PathBuf },

    /// File exceeds the configured size limit
    #[error("File too large: {path} ({size} bytes, max {max_size} bytes)")]
    TooLarge {
        path: PathBuf,
        size: u64,
        max_size: u64,
    },

    /// File could not be decoded as text
    #[error("Unable to read file as text. File may be binary or use unsupported encoding: {path}")]
    DecodeError { path: PathBuf },

    /// Underlying read failure
    #[error("Could not read file: {path}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Rendering errors
///
/// The renderer degrades gracefully wherever it can; these variants
/// describe what went wrong when it had to fall back.
#[derive(Error, Debug)]
pub enum RenderError {
    /// Code block syntax highlighting failed
    #[error("Syntax highlighting failed: {0}")]
    Highlight(#[from] syntect::Error),

    /// Markdown conversion produced no usable output
    #[error("Markdown conversion failed: {reason}")]
    Conversion { reason: String },
}

/// Navigation errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum NavigationError {
    /// Back history is empty
    #[error("Nothing to go back to")]
    BackStackEmpty,

    /// Forward history is empty
    #[error("Nothing to go forward to")]
    ForwardStackEmpty,

    /// No document is currently shown
    #[error("No document is currently displayed")]
    NoCurrentDocument,
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Error loading configuration file
    #[error("Could not load configuration: {0}")]
    LoadError(String),

    /// Error saving configuration
    #[error("Could not save configuration: {0}")]
    SaveError(String),

    /// Configuration directory unavailable
    #[error("Could not access configuration directory")]
    DirectoryError,
}

/// Result type alias for preview operations
pub type PreviewResult<T> = Result<T, PreviewError>;

/// Result type alias for file operations
pub type FileResult<T> = Result<T, FileError>;

/// Result type alias for navigation operations
pub type NavResult<T> = Result<T, NavigationError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

impl FileError {
    /// The path the failing operation was working on
    pub fn path(&self) -> &PathBuf {
        match self {
            FileError::NotFound { path }
            | FileError::NotAFile { path }
            | FileError::TooLarge { path, .. }
            | FileError::DecodeError { path }
            | FileError::ReadError { path, .. } => path,
        }
    }

    /// Create a user-friendly error message suitable for display in dialogs
    pub fn user_message(&self) -> String {
        match self {
            FileError::NotFound { .. } => {
                "The file could not be found. It may have been moved or deleted.".to_string()
            }
            FileError::NotAFile { .. } => {
                "The selected path is not a file.".to_string()
            }
            FileError::TooLarge { max_size, .. } => {
                format!(
                    "This file is too large to preview. Maximum file size is {} bytes.",
                    max_size
                )
            }
            FileError::DecodeError { .. } => {
                "This file cannot be opened as text. It may be a binary file or use an unsupported encoding.".to_string()
            }
            FileError::ReadError { .. } => {
                "Could not read the file. Check file permissions.".to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_error_display() {
        let err = FileError::NotFound {
            path: PathBuf::from("/docs/missing.md"),
        };
        assert!(err.to_string().contains("/docs/missing.md"));
    }

    #[test]
    fn test_file_error_user_message() {
        let err = FileError::DecodeError {
            path: PathBuf::from("/docs/binary.md"),
        };
        let msg = err.user_message();
        assert!(msg.contains("binary"));
    }

    #[test]
    fn test_file_error_path_accessor() {
        let err = FileError::TooLarge {
            path: PathBuf::from("/docs/big.md"),
            size: 20,
            max_size: 10,
        };
        assert_eq!(err.path(), &PathBuf::from("/docs/big.md"));
    }

    #[test]
    fn test_preview_error_from_navigation_error() {
        let err: PreviewError = NavigationError::BackStackEmpty.into();
        assert!(matches!(err, PreviewError::Navigation(_)));
    }
}
