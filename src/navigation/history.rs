//! Back/forward navigation state
//!
//! Two ordered stacks and a current-document pointer, owned
//! exclusively by one navigation controller. The defining behavior:
//! only `record_open` clears the forward stack; `go_back` and
//! `go_forward` shuffle entries between the stacks without ever
//! clearing the other side.

use crate::document::Document;
use crate::error::{NavResult, NavigationError};

/// Navigation history for one preview pane
#[derive(Debug, Default)]
pub struct NavigationState {
    current: Option<Document>,
    back_stack: Vec<Document>,
    forward_stack: Vec<Document>,
}

impl NavigationState {
    pub fn new() -> Self {
        Self::default()
    }

    /// The document currently shown in the preview surface
    pub fn current(&self) -> Option<&Document> {
        self.current.as_ref()
    }

    /// Back history, most recent last
    pub fn back_stack(&self) -> &[Document] {
        &self.back_stack
    }

    /// Forward history, most recent last
    pub fn forward_stack(&self) -> &[Document] {
        &self.forward_stack
    }

    /// Record navigation to a newly opened document
    ///
    /// The previous current document is pushed onto the back stack
    /// unless it would duplicate the entry already on top. The forward
    /// stack is cleared unconditionally: forward history is only valid
    /// while retracing a path already traveled.
    pub fn record_open(&mut self, doc: Document) {
        if let Some(prev) = self.current.take() {
            let duplicate = self
                .back_stack
                .last()
                .map_or(false, |top| same_target(top, &prev));
            if !duplicate {
                self.back_stack.push(prev);
            }
        }
        self.forward_stack.clear();
        self.current = Some(doc);
    }

    /// Replace the current document without touching either stack
    ///
    /// Used when the editor re-renders in place; editing is not
    /// navigation.
    pub fn replace_current(&mut self, doc: Document) {
        self.current = Some(doc);
    }

    /// Step back one entry, returning the document to display
    pub fn go_back(&mut self) -> NavResult<Document> {
        let doc = self
            .back_stack
            .pop()
            .ok_or(NavigationError::BackStackEmpty)?;
        if let Some(prev) = self.current.take() {
            self.forward_stack.push(prev);
        }
        self.current = Some(doc.clone());
        Ok(doc)
    }

    /// Step forward one entry, returning the document to display
    pub fn go_forward(&mut self) -> NavResult<Document> {
        let doc = self
            .forward_stack
            .pop()
            .ok_or(NavigationError::ForwardStackEmpty)?;
        if let Some(prev) = self.current.take() {
            self.back_stack.push(prev);
        }
        self.current = Some(doc.clone());
        Ok(doc)
    }
}

/// Whether two documents name the same navigation target
///
/// File-backed documents compare by path; in-memory documents only
/// ever equal themselves by content.
fn same_target(a: &Document, b: &Document) -> bool {
    match (&a.source_path, &b.source_path) {
        (Some(pa), Some(pb)) => pa == pb,
        _ => a == b,
    }
}
