//! Navigation control
//!
//! The navigation controller owns the current-document pointer and the
//! back/forward history for one preview pane. It decides what happens
//! when a link is clicked, delegates HTML production to the renderer,
//! and feeds the preview surface. External collaborators (the surface,
//! the host environment, the shell listening for events) attach
//! through plain trait interfaces.

pub mod history;

use crate::config::PreviewConfig;
use crate::document::Document;
use crate::error::{NavResult, NavigationError, PreviewResult};
use crate::file_io;
use crate::links::LinkTarget;
use crate::render::Renderer;
use history::NavigationState;
use std::path::{Path, PathBuf};

/// The embedded HTML rendering surface
///
/// Owned by exactly one pane; the controller pushes `(html, base_url)`
/// pairs and the surface displays the most recent call it received.
pub trait PreviewSurface: Send {
    fn set_content(&mut self, html: &str, base_url: &str);
}

/// Services provided by the host environment
pub trait HostServices: Send {
    /// Open a web URL in the user's default browser
    fn open_in_default_browser(&mut self, url: &str);

    /// Load a non-markdown local file with the host's generic loader
    fn open_with_default_app(&mut self, path: &Path);
}

/// Events the controller emits for the application shell
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewEvent {
    /// The user asked to edit the previewed file in the editor pane
    FileSelectedForExternalEditing(PathBuf),

    /// The user designated a directory as the active workspace root
    FolderChanged(PathBuf),
}

/// Navigation controller for one preview pane
pub struct NavigationController {
    state: NavigationState,
    renderer: Renderer,
    surface: Box<dyn PreviewSurface>,
    host: Box<dyn HostServices>,
    listener: Option<Box<dyn FnMut(PreviewEvent) + Send>>,
    max_file_size: u64,
}

impl NavigationController {
    pub fn new(surface: Box<dyn PreviewSurface>, host: Box<dyn HostServices>) -> Self {
        Self::with_config(&PreviewConfig::default(), surface, host)
    }

    pub fn with_config(
        config: &PreviewConfig,
        surface: Box<dyn PreviewSurface>,
        host: Box<dyn HostServices>,
    ) -> Self {
        Self {
            state: NavigationState::new(),
            renderer: Renderer::with_config(config),
            surface,
            host,
            listener: None,
            max_file_size: config.files.max_file_size,
        }
    }

    /// Subscribe the shell to controller events
    pub fn set_event_listener(&mut self, listener: Box<dyn FnMut(PreviewEvent) + Send>) {
        self.listener = Some(listener);
    }

    /// Navigation state, read-only
    pub fn state(&self) -> &NavigationState {
        &self.state
    }

    /// The document currently shown
    pub fn current(&self) -> Option<&Document> {
        self.state.current()
    }

    /// Display the built-in welcome document
    pub fn show_welcome(&mut self) {
        let doc = Document::welcome();
        let output = self
            .renderer
            .render(&doc.source_text, &doc.base_dir, None);
        self.state.record_open(doc);
        self.surface.set_content(&output.html, &output.base_url);
    }

    /// Open a markdown file and navigate to it
    ///
    /// The file is read and rendered before any state changes; a
    /// failed read aborts the operation with current document and both
    /// stacks untouched.
    pub fn open(&mut self, path: &Path) -> PreviewResult<()> {
        let resolved = self.resolve_link_path(path);
        let text = file_io::read_markdown_file_with_limit(&resolved, self.max_file_size)
            .map_err(|e| {
                log::error!("open aborted: {}", e);
                e
            })?;
        self.open_loaded(resolved, text)
    }

    /// Navigate to a document whose text has already been read
    pub fn open_loaded(&mut self, path: PathBuf, text: String) -> PreviewResult<()> {
        log::debug!("opening {}", path.display());
        let doc = Document::from_file(path, text);
        let output = self
            .renderer
            .render(&doc.source_text, &doc.base_dir, None);
        self.state.record_open(doc);
        self.surface.set_content(&output.html, &output.base_url);
        Ok(())
    }

    /// Step back in history and redisplay
    pub fn back(&mut self) -> NavResult<()> {
        let doc = self.state.go_back()?;
        self.display(&doc);
        Ok(())
    }

    /// Step forward in history and redisplay
    pub fn forward(&mut self) -> NavResult<()> {
        let doc = self.state.go_forward()?;
        self.display(&doc);
        Ok(())
    }

    /// Handle a link click reported by the preview surface
    ///
    /// Web links and non-markdown files are delegated to the host and
    /// never touch navigation state; markdown files navigate in place.
    pub fn handle_link_click(&mut self, raw_url: &str) -> PreviewResult<()> {
        match LinkTarget::classify(raw_url) {
            LinkTarget::ExternalWeb { url } => {
                log::debug!("delegating web link to browser: {}", url);
                self.host.open_in_default_browser(&url);
                Ok(())
            }
            LinkTarget::LocalMarkdownFile { path } => self.open(&path),
            LinkTarget::LocalOtherFile { path } => {
                let resolved = self.resolve_link_path(&path);
                log::debug!("delegating {} to host loader", resolved.display());
                self.host.open_with_default_app(&resolved);
                Ok(())
            }
        }
    }

    /// Re-render editor text in place, without touching history
    ///
    /// The text keeps the current document's path and base directory,
    /// so relative resources still resolve while editing. With no
    /// current document the text becomes an unsaved in-memory one.
    pub fn preview_text(&mut self, text: &str) {
        let doc = match self.state.current() {
            Some(current) => Document {
                source_text: text.to_string(),
                source_path: current.source_path.clone(),
                base_dir: current.base_dir.clone(),
            },
            None => Document::in_memory(text.to_string(), PathBuf::from(".")),
        };
        let output = self
            .renderer
            .render(&doc.source_text, &doc.base_dir, None);
        self.state.replace_current(doc);
        self.surface.set_content(&output.html, &output.base_url);
    }

    /// Re-render the current document with a search term marked
    pub fn highlight_term(&mut self, term: &str) -> NavResult<()> {
        let doc = self
            .state
            .current()
            .cloned()
            .ok_or(NavigationError::NoCurrentDocument)?;
        let output = self
            .renderer
            .render(&doc.source_text, &doc.base_dir, Some(term));
        self.surface.set_content(&output.html, &output.base_url);
        Ok(())
    }

    /// Ask the shell to open the previewed file in the editor pane
    pub fn edit_current_externally(&mut self) -> NavResult<()> {
        let path = self
            .state
            .current()
            .and_then(|d| d.source_path.clone())
            .ok_or(NavigationError::NoCurrentDocument)?;
        self.emit(PreviewEvent::FileSelectedForExternalEditing(path));
        Ok(())
    }

    /// Make the current document's directory the workspace root
    pub fn designate_workspace_root(&mut self) -> NavResult<()> {
        let dir = self
            .state
            .current()
            .map(|d| d.base_dir.clone())
            .ok_or(NavigationError::NoCurrentDocument)?;
        self.emit(PreviewEvent::FolderChanged(dir));
        Ok(())
    }

    /// Resolve a clicked path against the current document's directory
    pub fn resolve_link_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            return path.to_path_buf();
        }
        match self.state.current() {
            Some(doc) => doc.base_dir.join(path),
            None => path.to_path_buf(),
        }
    }

    fn display(&mut self, doc: &Document) {
        let output = self
            .renderer
            .render(&doc.source_text, &doc.base_dir, None);
        self.surface.set_content(&output.html, &output.base_url);
    }

    fn emit(&mut self, event: PreviewEvent) {
        if let Some(listener) = self.listener.as_mut() {
            listener(event);
        }
    }
}
