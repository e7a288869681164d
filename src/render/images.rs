//! Image resolution and the inline resize directive
//!
//! Relative image paths resolve against the document's base directory
//! and are rewritten to `file://` URLs so the rendering surface can
//! load them. Remote (`http://`, `https://`) and `data:` references
//! pass through unchanged. A local image that does not exist renders
//! as a visible placeholder instead of a broken `<img>`.
//!
//! An image reference may be followed immediately by a resize
//! directive, `![alt](pic.png){width=100 height=50}`, which fixes the
//! rendered size in pixels. A directive with non-numeric values is
//! consumed and ignored.

use crate::render::escape_html;
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;

/// Where an image reference points after resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSrc {
    /// Remote or data URI, passed through unchanged
    Remote(String),
    /// Existing local file, as a `file://` URL
    Local(String),
    /// Local file that does not exist; carries the path as written
    Missing(String),
}

/// Resolve an image reference against the document's base directory
pub fn resolve_image_src(src: &str, base_dir: &Path) -> ImageSrc {
    if src.starts_with("http://") || src.starts_with("https://") || src.starts_with("data:") {
        return ImageSrc::Remote(src.to_string());
    }

    let raw = src.strip_prefix("file://").unwrap_or(src);
    let path = Path::new(raw);
    let resolved = if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    };

    if resolved.is_file() {
        ImageSrc::Local(format!("file://{}", resolved.display()))
    } else {
        log::warn!("image not found: {}", resolved.display());
        ImageSrc::Missing(src.to_string())
    }
}

/// Explicit pixel sizing parsed from a resize directive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SizeDirective {
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl SizeDirective {
    /// Whether the directive carries any usable dimension
    pub fn is_empty(&self) -> bool {
        self.width.is_none() && self.height.is_none()
    }

    /// Inline style attribute for the parsed dimensions, if any
    pub fn style_attr(&self) -> Option<String> {
        let mut parts = Vec::new();
        if let Some(w) = self.width {
            parts.push(format!("width:{}px", w));
        }
        if let Some(h) = self.height {
            parts.push(format!("height:{}px", h));
        }
        if parts.is_empty() {
            None
        } else {
            Some(format!(r#" style="{};""#, parts.join(";")))
        }
    }
}

fn directive_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\{\s*(?:(?:width|height)\s*=\s*[^\s}]+\s*)+\}").unwrap()
    })
}

fn dimension_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(width|height)\s*=\s*([^\s}]+)").unwrap())
}

/// Parse a resize directive at the start of `text`
///
/// Returns the parsed sizing and the number of bytes consumed. Text
/// that does not look like a directive at all consumes nothing and
/// renders literally; a directive with malformed values is consumed
/// but yields no sizing.
pub fn parse_size_directive(text: &str) -> Option<(SizeDirective, usize)> {
    let m = directive_re().find(text)?;
    let mut directive = SizeDirective::default();

    for caps in dimension_re().captures_iter(m.as_str()) {
        let value = match caps[2].parse::<u32>() {
            Ok(v) => Some(v),
            Err(_) => {
                log::debug!("ignoring malformed image dimension: {}", &caps[0]);
                None
            }
        };
        match &caps[1] {
            "width" => directive.width = value,
            _ => directive.height = value,
        }
    }

    Some((directive, m.end()))
}

/// Build the HTML for one image reference
pub fn image_html(src: &ImageSrc, alt: &str, title: &str, size: SizeDirective) -> String {
    match src {
        ImageSrc::Missing(path) => format!(
            r#"<span class="image-missing">Image not found: {}</span>"#,
            escape_html(path)
        ),
        ImageSrc::Remote(url) | ImageSrc::Local(url) => {
            let mut tag = format!(r#"<img src="{}" alt="{}""#, escape_html(url), escape_html(alt));
            if !title.is_empty() {
                tag.push_str(&format!(r#" title="{}""#, escape_html(title)));
            }
            if let Some(style) = size.style_attr() {
                tag.push_str(&style);
            }
            tag.push_str(" />");
            tag
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_passes_through() {
        let src = resolve_image_src("https://example.com/a.png", Path::new("/docs"));
        assert_eq!(src, ImageSrc::Remote("https://example.com/a.png".to_string()));
    }

    #[test]
    fn test_data_uri_passes_through() {
        let src = resolve_image_src("data:image/png;base64,AAAA", Path::new("/docs"));
        assert!(matches!(src, ImageSrc::Remote(_)));
    }

    #[test]
    fn test_relative_path_resolves_against_base_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("pic.png"), [0x89, 0x50]).unwrap();
        let src = resolve_image_src("pic.png", dir.path());
        match src {
            ImageSrc::Local(url) => {
                assert!(url.starts_with("file://"));
                assert!(url.ends_with("pic.png"));
            }
            other => panic!("expected local image, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_file_keeps_original_path() {
        let _ = env_logger::builder().is_test(true).try_init();
        let dir = tempfile::tempdir().unwrap();
        let src = resolve_image_src("missing.png", dir.path());
        assert_eq!(src, ImageSrc::Missing("missing.png".to_string()));
    }

    #[test]
    fn test_parse_width_only() {
        let (size, consumed) = parse_size_directive("{width=100} tail").unwrap();
        assert_eq!(size.width, Some(100));
        assert_eq!(size.height, None);
        assert_eq!(consumed, "{width=100}".len());
    }

    #[test]
    fn test_parse_width_and_height() {
        let (size, _) = parse_size_directive("{width=100 height=50}").unwrap();
        assert_eq!(size.width, Some(100));
        assert_eq!(size.height, Some(50));
    }

    #[test]
    fn test_malformed_values_consumed_but_ignored() {
        let (size, consumed) = parse_size_directive("{width=wide}").unwrap();
        assert!(size.is_empty());
        assert_eq!(consumed, "{width=wide}".len());
    }

    #[test]
    fn test_non_directive_brace_text_untouched() {
        assert!(parse_size_directive("{not a directive}").is_none());
        assert!(parse_size_directive("plain text").is_none());
    }

    #[test]
    fn test_style_attr_width_only() {
        let size = SizeDirective {
            width: Some(100),
            height: None,
        };
        assert_eq!(size.style_attr().unwrap(), r#" style="width:100px;""#);
    }

    #[test]
    fn test_missing_image_html_placeholder() {
        let html = image_html(
            &ImageSrc::Missing("missing.png".to_string()),
            "alt",
            "",
            SizeDirective::default(),
        );
        assert!(html.contains("Image not found: missing.png"));
        assert!(!html.contains("<img"));
    }

    #[test]
    fn test_image_html_with_size() {
        let html = image_html(
            &ImageSrc::Remote("https://e.com/p.png".to_string()),
            "a picture",
            "hover",
            SizeDirective {
                width: Some(100),
                height: None,
            },
        );
        assert!(html.contains(r#"src="https://e.com/p.png""#));
        assert!(html.contains("width:100px"));
        assert!(!html.contains("height:"));
    }
}
