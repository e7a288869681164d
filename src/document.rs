//! Document value types
//!
//! A `Document` is one immutable markdown snapshot together with the
//! directory used to resolve its relative links and images. Navigation
//! history stores whole documents, so going back never requires
//! re-reading from disk.

use crate::file_io;
use std::path::PathBuf;

/// One markdown source snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// The raw markdown text
    pub source_text: String,

    /// Path the text was loaded from; `None` for in-memory content
    pub source_path: Option<PathBuf>,

    /// Directory for resolving relative image and link paths
    pub base_dir: PathBuf,
}

impl Document {
    /// Create a document loaded from a file
    ///
    /// The base directory is the file's parent, falling back to `.`
    /// for bare filenames.
    pub fn from_file(path: impl Into<PathBuf>, source_text: String) -> Self {
        let path = path.into();
        let base_dir = file_io::resolve_dirname(&path);
        Self {
            source_text,
            source_path: Some(path),
            base_dir,
        }
    }

    /// Create an unsaved in-memory document
    pub fn in_memory(source_text: String, base_dir: impl Into<PathBuf>) -> Self {
        Self {
            source_text,
            source_path: None,
            base_dir: base_dir.into(),
        }
    }

    /// The built-in welcome document shown before any file is opened
    pub fn welcome() -> Self {
        Self::in_memory(WELCOME_CONTENT.to_string(), PathBuf::from("."))
    }

    /// Display name for titles and diagnostics
    pub fn display_name(&self) -> String {
        match &self.source_path {
            Some(path) => path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string()),
            None => "Untitled".to_string(),
        }
    }
}

/// The rendered form of a document
///
/// Produced deterministically: identical document content and base
/// directory always yield byte-identical HTML.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedOutput {
    /// Complete HTML document
    pub html: String,

    /// Base URL the rendering surface resolves relative resources against
    pub base_url: String,
}

/// Welcome content rendered before any file is opened
const WELCOME_CONTENT: &str = r#"# Welcome

A live markdown preview with math rendering and link navigation.

## What works here

- **Standard markdown** with tables, footnotes and task lists
- Fenced code blocks with syntax highlighting
- Inline math like $e^{i\pi} + 1 = 0$ and display math:

$$
\int_{-\infty}^{\infty} e^{-x^2}\,dx = \sqrt{\pi}
$$

- Local images with relative paths, and sizing via
  `![logo](logo.png){width=120}`

## Navigation

Click a link to another `.md` file to follow it; use back and forward
to retrace your steps, exactly like a browser. Web links open in your
default browser.
"#;
