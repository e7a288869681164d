//! Link classification
//!
//! Decides what a clicked URL is before the navigation controller acts
//! on it: a web link to hand to the default browser, a local markdown
//! file to follow in the preview, or some other local file delegated
//! to the host's generic loader. Pure decision logic, no I/O.

use std::path::{Path, PathBuf};

/// Scheme prefix used by rendering surfaces for local files
const FILE_SCHEME: &str = "file://";

/// Classification of a clicked link
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkTarget {
    /// An `http://` or `https://` URL, opened externally
    ExternalWeb { url: String },

    /// A local markdown file the preview follows in place
    LocalMarkdownFile { path: PathBuf },

    /// Any other local file, delegated to the host environment
    LocalOtherFile { path: PathBuf },
}

impl LinkTarget {
    /// Classify a raw URL or path as it arrives from the rendering surface
    ///
    /// Total function: every input maps to exactly one variant.
    pub fn classify(raw_url: &str) -> Self {
        if raw_url.starts_with("http://") || raw_url.starts_with("https://") {
            return LinkTarget::ExternalWeb {
                url: raw_url.to_string(),
            };
        }

        let local = raw_url.strip_prefix(FILE_SCHEME).unwrap_or(raw_url);
        let path = PathBuf::from(local);

        if is_markdown_path(&path) {
            LinkTarget::LocalMarkdownFile { path }
        } else {
            LinkTarget::LocalOtherFile { path }
        }
    }
}

/// Whether a path names a markdown file
///
/// The extension match is case-sensitive: only `.md` is followed in
/// the preview.
pub fn is_markdown_path(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some("md")
}
