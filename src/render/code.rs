//! Code block syntax highlighting
//!
//! Fenced code blocks are highlighted with syntect using CSS classes
//! rather than inline colors, so one generated stylesheet in the
//! document shell covers every block.

use crate::render::escape_html;
use syntect::html::{css_for_theme_with_class_style, ClassStyle, ClassedHTMLGenerator};
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

/// Theme the class stylesheet is generated from
const THEME: &str = "InspiredGitHub";

/// Highlighter shared across renders
pub struct CodeHighlighter {
    syntax_set: SyntaxSet,
    theme_css: String,
}

impl CodeHighlighter {
    pub fn new() -> Self {
        let syntax_set = SyntaxSet::load_defaults_newlines();
        let theme_set = syntect::highlighting::ThemeSet::load_defaults();
        let theme_css = match theme_set.themes.get(THEME) {
            Some(theme) => css_for_theme_with_class_style(theme, ClassStyle::Spaced)
                .unwrap_or_else(|e| {
                    log::warn!("could not generate syntax theme CSS: {}", e);
                    String::new()
                }),
            None => {
                log::warn!("syntax theme {} not bundled", THEME);
                String::new()
            }
        };

        Self {
            syntax_set,
            theme_css,
        }
    }

    /// CSS covering the classes emitted by `highlight`
    pub fn theme_css(&self) -> &str {
        &self.theme_css
    }

    /// Highlight one code block into a `<pre><code>` fragment
    ///
    /// Unknown languages fall back to plain text; a highlighting error
    /// falls back to an escaped, unhighlighted block. Never fails the
    /// render.
    pub fn highlight(&self, code: &str, language: Option<&str>) -> String {
        match self.try_highlight(code, language) {
            Ok(html) => html,
            Err(e) => {
                log::warn!(
                    "syntax highlighting failed for language {:?}: {}",
                    language,
                    e
                );
                format!(
                    "<pre class=\"code-block\"><code>{}</code></pre>\n",
                    escape_html(code)
                )
            }
        }
    }

    fn try_highlight(
        &self,
        code: &str,
        language: Option<&str>,
    ) -> Result<String, syntect::Error> {
        let syntax = language
            .and_then(|lang| self.syntax_set.find_syntax_by_token(lang))
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());

        let mut generator = ClassedHTMLGenerator::new_with_class_style(
            syntax,
            &self.syntax_set,
            ClassStyle::Spaced,
        );
        for line in LinesWithEndings::from(code) {
            generator.parse_html_for_line_which_includes_newline(line)?;
        }

        Ok(format!(
            "<pre class=\"code-block\"><code>{}</code></pre>\n",
            generator.finalize()
        ))
    }
}

impl Default for CodeHighlighter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_highlight_known_language() {
        let hl = CodeHighlighter::new();
        let html = hl.highlight("let x = 1;\n", Some("rust"));
        assert!(html.starts_with("<pre class=\"code-block\"><code>"));
        assert!(html.contains("<span"));
        assert!(html.contains("x"));
    }

    #[test]
    fn test_unknown_language_falls_back_to_plain() {
        let hl = CodeHighlighter::new();
        let html = hl.highlight("anything at all\n", Some("no-such-language"));
        assert!(html.contains("anything at all"));
    }

    #[test]
    fn test_no_language_is_plain_text() {
        let hl = CodeHighlighter::new();
        let html = hl.highlight("plain\n", None);
        assert!(html.contains("plain"));
    }

    #[test]
    fn test_theme_css_generated() {
        let hl = CodeHighlighter::new();
        assert!(!hl.theme_css().is_empty());
    }

    #[test]
    fn test_highlight_is_deterministic() {
        let hl = CodeHighlighter::new();
        let a = hl.highlight("fn main() {}\n", Some("rust"));
        let b = hl.highlight("fn main() {}\n", Some("rust"));
        assert_eq!(a, b);
    }
}
