//! Markdown rendering pipeline
//!
//! Converts one markdown source snapshot into a complete, styled HTML
//! document:
//! - optional search-term highlighting
//! - math delimiter conversion
//! - markdown to HTML with the extended option set
//! - syntax-highlighted code blocks
//! - image path resolution with missing-image placeholders
//! - a document shell with fixed styling and KaTeX assets
//!
//! `render` is deterministic: identical source, base directory and
//! configuration produce byte-identical HTML. Failures degrade to a
//! visible fallback; they never escape the renderer.

pub mod code;
pub mod highlight;
pub mod images;
pub mod math;
pub mod shell;

use crate::config::{AssetConfig, PreviewConfig, ShellConfig};
use crate::document::RenderedOutput;
use code::CodeHighlighter;
use images::SizeDirective;
use pulldown_cmark::{html, CodeBlockKind, CowStr, Event, Options, Parser, Tag};
use std::panic::AssertUnwindSafe;
use std::path::Path;

/// The preview renderer
///
/// Holds the parser options and the syntax highlighter, both of which
/// are immutable after construction; one renderer serves a whole
/// preview session.
pub struct Renderer {
    options: Options,
    code: CodeHighlighter,
    shell: ShellConfig,
    assets: AssetConfig,
}

impl Renderer {
    pub fn new() -> Self {
        Self::with_config(&PreviewConfig::default())
    }

    pub fn with_config(config: &PreviewConfig) -> Self {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_FOOTNOTES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TASKLISTS);
        options.insert(Options::ENABLE_SMART_PUNCTUATION);

        Self {
            options,
            code: CodeHighlighter::new(),
            shell: config.shell.clone(),
            assets: config.assets.clone(),
        }
    }

    /// Render markdown source into a complete HTML document
    ///
    /// `base_dir` anchors relative image and link paths;
    /// `highlight_term`, when present, marks every occurrence of the
    /// term in the source before parsing.
    pub fn render(
        &self,
        source_text: &str,
        base_dir: &Path,
        highlight_term: Option<&str>,
    ) -> RenderedOutput {
        let prepared = match highlight_term {
            Some(term) if !term.is_empty() => highlight::apply_highlight(source_text, term),
            _ => source_text.to_string(),
        };
        let math = math::extract_math(&prepared);

        let body = match std::panic::catch_unwind(AssertUnwindSafe(|| {
            self.render_body(&math.masked, base_dir)
        })) {
            Ok(body) => math::restore_math(&body, &math.markup),
            Err(payload) => {
                let reason = panic_message(&payload);
                log::error!("markdown conversion failed: {}", reason);
                fallback_body(source_text, &reason)
            }
        };

        let html = shell::wrap_document(&body, &self.shell, &self.assets, self.code.theme_css());
        RenderedOutput {
            html,
            base_url: base_url_for(base_dir),
        }
    }

    /// Convert prepared markdown into an HTML fragment
    fn render_body(&self, markdown: &str, base_dir: &Path) -> String {
        let events: Vec<Event> = Parser::new_ext(markdown, self.options).collect();
        let mut out: Vec<Event> = Vec::with_capacity(events.len());
        let mut i = 0;

        while i < events.len() {
            match &events[i] {
                Event::Start(Tag::CodeBlock(kind)) => {
                    let language = match kind {
                        CodeBlockKind::Fenced(lang) if !lang.is_empty() => {
                            lang.split_whitespace().next().map(str::to_string)
                        }
                        _ => None,
                    };
                    let mut source = String::new();
                    i += 1;
                    while i < events.len() {
                        match &events[i] {
                            Event::Text(text) => source.push_str(text),
                            Event::End(Tag::CodeBlock(_)) => break,
                            _ => {}
                        }
                        i += 1;
                    }
                    let highlighted = self.code.highlight(&source, language.as_deref());
                    out.push(Event::Html(CowStr::from(highlighted)));
                }
                Event::Start(Tag::Image(_, dest, title)) => {
                    let dest = dest.to_string();
                    let title = title.to_string();
                    let mut alt = String::new();
                    i += 1;
                    while i < events.len() {
                        match &events[i] {
                            Event::Text(text) => alt.push_str(text),
                            Event::Code(text) => alt.push_str(text),
                            Event::End(Tag::Image(..)) => break,
                            _ => {}
                        }
                        i += 1;
                    }

                    // A resize directive may follow the image reference
                    let mut size = SizeDirective::default();
                    let mut trailing: Option<String> = None;
                    if let Some(Event::Text(text)) = events.get(i + 1) {
                        if let Some((parsed, consumed)) = images::parse_size_directive(text) {
                            size = parsed;
                            let rest = &text[consumed..];
                            if !rest.is_empty() {
                                trailing = Some(rest.to_string());
                            }
                            i += 1;
                        }
                    }

                    let src = images::resolve_image_src(&dest, base_dir);
                    out.push(Event::Html(CowStr::from(images::image_html(
                        &src, &alt, &title, size,
                    ))));
                    if let Some(rest) = trailing {
                        out.push(Event::Text(CowStr::from(rest)));
                    }
                }
                event => out.push(event.clone()),
            }
            i += 1;
        }

        let mut body = String::new();
        html::push_html(&mut body, out.into_iter());
        body
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Base URL the rendering surface resolves relative resources against
fn base_url_for(base_dir: &Path) -> String {
    format!("file://{}/", base_dir.display())
}

/// Fallback document body: escaped raw source with a diagnostic notice
fn fallback_body(source_text: &str, reason: &str) -> String {
    format!(
        "<div class=\"render-error\">Could not render document: {}</div>\n<pre>{}</pre>\n",
        escape_html(reason),
        escape_html(source_text)
    )
}

fn panic_message(payload: &Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "renderer panicked".to_string()
    }
}

/// Minimal HTML escaping for text and attribute values
pub(crate) fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
