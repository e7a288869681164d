//! Preview session: editor integration
//!
//! Ties one editor to one navigation controller. Content-change
//! notifications are debounced so rapid keystrokes coalesce into a
//! single render of the latest text; file opens run off-thread and are
//! tagged with a sequence number so a stale read never overwrites a
//! newer navigation (last request wins).

use crate::debounce::DebounceTimer;
use crate::error::{FileError, NavResult, PreviewResult};
use crate::file_io;
use crate::navigation::NavigationController;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{mpsc, Mutex};

/// The editor side of the session
///
/// The session pulls the text at render time, so a debounced render
/// always shows the content as of its firing, not its scheduling.
pub trait EditorContent: Send + Sync {
    fn current_markdown_text(&self) -> String;
}

/// One preview session: a debounce runner plus sequenced opens
pub struct PreviewSession {
    controller: Arc<Mutex<NavigationController>>,
    changes: mpsc::UnboundedSender<()>,
    open_seq: Arc<AtomicU64>,
}

impl PreviewSession {
    /// Start the session, spawning its debounce runner
    ///
    /// Must be called within a tokio runtime.
    pub fn start(
        controller: Arc<Mutex<NavigationController>>,
        editor: Arc<dyn EditorContent>,
        debounce_delay: Duration,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(run_debounce(
            rx,
            DebounceTimer::new(debounce_delay),
            controller.clone(),
            editor,
        ));
        Self {
            controller,
            changes: tx,
            open_seq: Arc::new(AtomicU64::new(0)),
        }
    }

    /// The shared controller, for wiring events and direct queries
    pub fn controller(&self) -> Arc<Mutex<NavigationController>> {
        self.controller.clone()
    }

    /// Notify the session that the editor content changed
    ///
    /// Restarts the debounce quiet period; the render fires only once
    /// the editor goes quiet.
    pub fn content_changed(&self) {
        if self.changes.send(()).is_err() {
            log::warn!("content change dropped: debounce runner has stopped");
        }
    }

    /// Open a markdown file, reading it off-thread
    ///
    /// A request issued later always wins: if another open completes
    /// in the meantime, this one's result is discarded.
    pub async fn open_path(&self, path: impl AsRef<Path>) -> PreviewResult<()> {
        let resolved = self.controller.lock().await.resolve_link_path(path.as_ref());
        let seq = self.begin_open();

        let read_path = resolved.clone();
        let text = tokio::task::spawn_blocking(move || file_io::read_markdown_file(&read_path))
            .await
            .map_err(|e| FileError::ReadError {
                path: resolved.clone(),
                source: std::io::Error::new(std::io::ErrorKind::Other, e),
            })??;

        self.finish_open(seq, resolved, text).await
    }

    /// Step back in history
    pub async fn back(&self) -> NavResult<()> {
        self.controller.lock().await.back()
    }

    /// Step forward in history
    pub async fn forward(&self) -> NavResult<()> {
        self.controller.lock().await.forward()
    }

    /// Route a link click from the preview surface
    pub async fn handle_link_click(&self, raw_url: &str) -> PreviewResult<()> {
        self.controller.lock().await.handle_link_click(raw_url)
    }

    /// Claim the next open sequence number, superseding earlier opens
    fn begin_open(&self) -> u64 {
        self.open_seq.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Apply a completed read, unless a newer open has started
    async fn finish_open(&self, seq: u64, path: PathBuf, text: String) -> PreviewResult<()> {
        if self.open_seq.load(Ordering::SeqCst) != seq {
            log::debug!("open of {} superseded by a newer request", path.display());
            return Ok(());
        }
        self.controller.lock().await.open_loaded(path, text)
    }
}

/// Debounce runner: coalesce change notifications into trailing renders
async fn run_debounce(
    mut rx: mpsc::UnboundedReceiver<()>,
    mut timer: DebounceTimer,
    controller: Arc<Mutex<NavigationController>>,
    editor: Arc<dyn EditorContent>,
) {
    loop {
        let deadline = timer.deadline();
        tokio::select! {
            changed = rx.recv() => match changed {
                Some(()) => timer.record_change(Instant::now()),
                None => break,
            },
            _ = tokio::time::sleep_until(as_tokio_instant(deadline)), if deadline.is_some() => {
                if timer.fire_if_due(Instant::now()) {
                    let text = editor.current_markdown_text();
                    controller.lock().await.preview_text(&text);
                }
            }
        }
    }
    log::debug!("debounce runner stopped");
}

fn as_tokio_instant(deadline: Option<Instant>) -> tokio::time::Instant {
    tokio::time::Instant::from_std(deadline.unwrap_or_else(Instant::now))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigation::{HostServices, PreviewSurface};
    use std::sync::Mutex as StdMutex;

    #[derive(Clone, Default)]
    struct RecordingSurface {
        calls: Arc<StdMutex<Vec<String>>>,
    }

    impl PreviewSurface for RecordingSurface {
        fn set_content(&mut self, html: &str, _base_url: &str) {
            self.calls.lock().unwrap().push(html.to_string());
        }
    }

    #[derive(Clone, Default)]
    struct NullHost;

    impl HostServices for NullHost {
        fn open_in_default_browser(&mut self, _url: &str) {}
        fn open_with_default_app(&mut self, _path: &Path) {}
    }

    struct FakeEditor {
        text: StdMutex<String>,
    }

    impl FakeEditor {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                text: StdMutex::new(String::new()),
            })
        }

        fn set(&self, text: &str) {
            *self.text.lock().unwrap() = text.to_string();
        }
    }

    impl EditorContent for FakeEditor {
        fn current_markdown_text(&self) -> String {
            self.text.lock().unwrap().clone()
        }
    }

    fn session_with(
        editor: Arc<FakeEditor>,
        delay: Duration,
    ) -> (PreviewSession, RecordingSurface) {
        let surface = RecordingSurface::default();
        let controller = NavigationController::new(
            Box::new(surface.clone()),
            Box::new(NullHost),
        );
        let session = PreviewSession::start(
            Arc::new(Mutex::new(controller)),
            editor,
            delay,
        );
        (session, surface)
    }

    #[tokio::test]
    async fn test_debounce_coalesces_rapid_changes() {
        let editor = FakeEditor::new();
        let (session, surface) = session_with(editor.clone(), Duration::from_millis(50));

        for i in 0..5 {
            editor.set(&format!("version {}", i));
            session.content_changed();
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        tokio::time::sleep(Duration::from_millis(300)).await;

        let calls = surface.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].contains("version 4"));
    }

    #[tokio::test]
    async fn test_separate_bursts_render_separately() {
        let editor = FakeEditor::new();
        let (session, surface) = session_with(editor.clone(), Duration::from_millis(30));

        editor.set("first");
        session.content_changed();
        tokio::time::sleep(Duration::from_millis(150)).await;

        editor.set("second");
        session.content_changed();
        tokio::time::sleep(Duration::from_millis(150)).await;

        let calls = surface.calls.lock().unwrap();
        assert_eq!(calls.len(), 2);
        assert!(calls[0].contains("first"));
        assert!(calls[1].contains("second"));
    }

    #[tokio::test]
    async fn test_no_change_no_render() {
        let editor = FakeEditor::new();
        let (_session, surface) = session_with(editor, Duration::from_millis(20));
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(surface.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_open_path_displays_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.md");
        std::fs::write(&path, "# From Disk").unwrap();

        let editor = FakeEditor::new();
        let (session, surface) = session_with(editor, Duration::from_millis(20));

        session.open_path(&path).await.unwrap();

        let calls = surface.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].contains("From Disk"));
    }

    #[tokio::test]
    async fn test_open_missing_path_errors() {
        let dir = tempfile::tempdir().unwrap();
        let editor = FakeEditor::new();
        let (session, surface) = session_with(editor, Duration::from_millis(20));

        let result = session.open_path(dir.path().join("missing.md")).await;
        assert!(result.is_err());
        assert!(surface.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_stale_open_is_discarded() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.md");
        let b = dir.path().join("b.md");
        std::fs::write(&a, "# A").unwrap();
        std::fs::write(&b, "# B").unwrap();

        let editor = FakeEditor::new();
        let (session, surface) = session_with(editor, Duration::from_millis(20));

        // Two reads in flight; the older one completes last
        let seq_a = session.begin_open();
        let seq_b = session.begin_open();
        session
            .finish_open(seq_b, b.clone(), "# B".to_string())
            .await
            .unwrap();
        session
            .finish_open(seq_a, a.clone(), "# A".to_string())
            .await
            .unwrap();

        let calls = surface.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].contains("# B") || calls[0].contains(">B<"));
    }
}
