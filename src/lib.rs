//! mdpreview - A live markdown preview pipeline
//!
//! Turns markdown source into styled HTML documents and manages the
//! preview pane around them: math delimiter conversion, syntax
//! highlighted code blocks, image path resolution with resize
//! directives, link classification, back/forward navigation history,
//! and debounced editor-to-preview updates.
//!
//! The crate is host-agnostic: the embedding application supplies the
//! rendering surface and host services through the traits in
//! [`navigation`], and drives the async pieces through a
//! [`session::PreviewSession`].

pub mod config;
pub mod debounce;
pub mod document;
pub mod error;
pub mod file_io;
pub mod links;
pub mod navigation;
pub mod render;
pub mod session;

pub use config::PreviewConfig;
pub use document::{Document, RenderedOutput};
pub use error::{PreviewError, PreviewResult};
pub use links::LinkTarget;
pub use navigation::{HostServices, NavigationController, PreviewEvent, PreviewSurface};
pub use render::Renderer;
pub use session::{EditorContent, PreviewSession};
