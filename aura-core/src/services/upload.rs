//! Simulated image upload
//!
//! Nothing leaves the machine. Each slot runs a tokio task that raises the
//! progress by a random step every tick; at 100% the file is encoded as a
//! `data:` URL and handed to the completion callback. The slot keeps showing
//! `Complete` for a short delay, then goes back to `Idle`.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use rand::Rng;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::domain::result::Result;

/// Largest random progress step per tick (exclusive)
const MAX_STEP: u32 = 35;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UploadState {
    #[default]
    Idle,
    InProgress(u8),
    Complete,
}

impl UploadState {
    /// Progress bar value, `None` when nothing is shown
    pub fn percent(&self) -> Option<u8> {
        match self {
            UploadState::Idle => None,
            UploadState::InProgress(p) => Some(*p),
            UploadState::Complete => Some(100),
        }
    }
}

/// A picked file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadSource {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl UploadSource {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self { file_name, bytes })
    }

    /// MIME type guessed from the file extension
    pub fn mime_type(&self) -> &'static str {
        let ext = Path::new(&self.file_name)
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "png" => "image/png",
            "jpg" | "jpeg" => "image/jpeg",
            "gif" => "image/gif",
            "webp" => "image/webp",
            "svg" => "image/svg+xml",
            "avif" => "image/avif",
            "bmp" => "image/bmp",
            "ico" => "image/x-icon",
            _ => "application/octet-stream",
        }
    }

    /// `data:<mime>;base64,<payload>`
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type(), STANDARD.encode(&self.bytes))
    }
}

struct SlotEntry {
    generation: u64,
    state: watch::Receiver<UploadState>,
    task: JoinHandle<()>,
}

#[derive(Default)]
struct Slots {
    next_generation: u64,
    entries: HashMap<String, SlotEntry>,
}

/// Per-slot upload tasks
///
/// Must be used from within a tokio runtime.
pub struct UploadTracker {
    tick: Duration,
    clear_delay: Duration,
    slots: Arc<Mutex<Slots>>,
}

impl UploadTracker {
    pub fn new(tick: Duration, clear_delay: Duration) -> Self {
        Self {
            tick,
            clear_delay,
            slots: Arc::new(Mutex::new(Slots::default())),
        }
    }

    /// Start uploading `source` into `slot`
    ///
    /// A running upload on the same slot is cancelled first. `on_complete`
    /// receives the data URL once progress reaches 100%.
    pub fn start<F>(
        &self,
        slot: impl Into<String>,
        source: UploadSource,
        on_complete: F,
    ) -> watch::Receiver<UploadState>
    where
        F: FnOnce(String) + Send + 'static,
    {
        let slot = slot.into();
        let (tx, rx) = watch::channel(UploadState::InProgress(0));

        let mut slots = lock(&self.slots);
        if let Some(previous) = slots.entries.remove(&slot) {
            tracing::debug!(slot = %slot, "replacing running upload");
            previous.task.abort();
        }
        slots.next_generation += 1;
        let generation = slots.next_generation;

        let task = tokio::spawn(run_upload(
            Arc::clone(&self.slots),
            slot.clone(),
            generation,
            source,
            tx,
            self.tick,
            self.clear_delay,
            on_complete,
        ));
        slots.entries.insert(
            slot,
            SlotEntry {
                generation,
                state: rx.clone(),
                task,
            },
        );
        rx
    }

    /// Current state of `slot`
    pub fn state(&self, slot: &str) -> UploadState {
        lock(&self.slots)
            .entries
            .get(slot)
            .map(|entry| *entry.state.borrow())
            .unwrap_or_default()
    }

    /// Progress of `slot`, `None` when idle
    pub fn progress(&self, slot: &str) -> Option<u8> {
        self.state(slot).percent()
    }

    /// Slots with an upload running or just finished
    pub fn active_slots(&self) -> Vec<String> {
        let mut slots: Vec<String> = lock(&self.slots).entries.keys().cloned().collect();
        slots.sort();
        slots
    }

    /// Cancel the upload on `slot`; returns whether one was running
    pub fn cancel(&self, slot: &str) -> bool {
        match lock(&self.slots).entries.remove(slot) {
            Some(entry) => {
                entry.task.abort();
                true
            }
            None => false,
        }
    }

    /// Cancel every upload; returns how many were running
    pub fn cancel_all(&self) -> usize {
        let entries: Vec<SlotEntry> = lock(&self.slots).entries.drain().map(|(_, e)| e).collect();
        for entry in &entries {
            entry.task.abort();
        }
        entries.len()
    }
}

impl Drop for UploadTracker {
    fn drop(&mut self) {
        self.cancel_all();
    }
}

fn lock(slots: &Mutex<Slots>) -> MutexGuard<'_, Slots> {
    slots.lock().unwrap_or_else(|e| e.into_inner())
}

#[allow(clippy::too_many_arguments)]
async fn run_upload<F>(
    slots: Arc<Mutex<Slots>>,
    slot: String,
    generation: u64,
    source: UploadSource,
    state: watch::Sender<UploadState>,
    tick: Duration,
    clear_delay: Duration,
    on_complete: F,
) where
    F: FnOnce(String) + Send + 'static,
{
    let mut progress: u32 = 0;
    loop {
        tokio::time::sleep(tick).await;
        progress += rand::thread_rng().gen_range(0..MAX_STEP);
        if progress >= 100 {
            break;
        }
        state.send_replace(UploadState::InProgress(progress as u8));
    }

    on_complete(source.data_url());
    state.send_replace(UploadState::Complete);

    tokio::time::sleep(clear_delay).await;

    let mut slots = lock(&slots);
    if slots
        .entries
        .get(&slot)
        .is_some_and(|entry| entry.generation == generation)
    {
        slots.entries.remove(&slot);
    }
    drop(slots);
    state.send_replace(UploadState::Idle);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use tokio::sync::oneshot;

    const TICK: Duration = Duration::from_millis(150);
    const CLEAR: Duration = Duration::from_millis(800);

    fn png() -> UploadSource {
        UploadSource::new("logo.PNG", vec![0x89, b'P', b'N', b'G'])
    }

    #[test]
    fn test_data_url() {
        assert_eq!(png().data_url(), "data:image/png;base64,iVBORw==");
        assert_eq!(
            UploadSource::new("notes", b"hi".to_vec()).data_url(),
            "data:application/octet-stream;base64,aGk="
        );
    }

    #[test]
    fn test_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("photo.jpg");
        std::fs::write(&path, b"jpeg").unwrap();

        let source = UploadSource::from_path(&path).unwrap();
        assert_eq!(source.file_name, "photo.jpg");
        assert_eq!(source.mime_type(), "image/jpeg");
        assert!(UploadSource::from_path(&dir.path().join("missing.png")).is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_upload_runs_to_completion_and_clears() {
        let tracker = UploadTracker::new(TICK, CLEAR);
        let (done_tx, done_rx) = oneshot::channel();

        let mut rx = tracker.start("hero", png(), move |url| {
            let _ = done_tx.send(url);
        });
        assert_eq!(tracker.progress("hero"), Some(0));

        let mut seen = Vec::new();
        while rx.changed().await.is_ok() {
            seen.push(*rx.borrow_and_update());
        }

        assert_eq!(done_rx.await.unwrap(), png().data_url());
        assert!(seen.contains(&UploadState::Complete));
        assert_eq!(seen.last(), Some(&UploadState::Idle));
        let percents: Vec<u8> = seen.iter().filter_map(|s| s.percent()).collect();
        assert!(percents.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(tracker.progress("hero"), None);
        assert!(tracker.active_slots().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_complete_shows_until_clear_delay() {
        let tracker = UploadTracker::new(TICK, CLEAR);
        let (done_tx, done_rx) = oneshot::channel();
        tracker.start("about_img", png(), move |url| {
            let _ = done_tx.send(url);
        });

        done_rx.await.unwrap();
        assert_eq!(tracker.state("about_img"), UploadState::Complete);

        tokio::time::sleep(CLEAR + Duration::from_millis(10)).await;
        assert_eq!(tracker.state("about_img"), UploadState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_stops_callback() {
        let tracker = UploadTracker::new(TICK, CLEAR);
        let called = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&called);
        tracker.start("p1", png(), move |_| flag.store(true, Ordering::SeqCst));

        tokio::time::sleep(TICK).await;
        assert!(tracker.cancel("p1"));
        assert!(!tracker.cancel("p1"));

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert!(!called.load(Ordering::SeqCst));
        assert_eq!(tracker.progress("p1"), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_on_busy_slot_replaces_previous() {
        let tracker = UploadTracker::new(TICK, CLEAR);
        let first = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&first);
        tracker.start("hero", png(), move |_| flag.store(true, Ordering::SeqCst));

        let (done_tx, done_rx) = oneshot::channel();
        tracker.start("hero", png(), move |url| {
            let _ = done_tx.send(url);
        });

        done_rx.await.unwrap();
        tokio::time::sleep(Duration::from_secs(60)).await;
        assert!(!first.load(Ordering::SeqCst));
        assert!(tracker.active_slots().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_slots_are_independent() {
        let tracker = UploadTracker::new(TICK, CLEAR);
        let (a_tx, a_rx) = oneshot::channel();
        let (b_tx, b_rx) = oneshot::channel();
        tracker.start("a", png(), move |url| {
            let _ = a_tx.send(url);
        });
        tracker.start("b", UploadSource::new("b.gif", vec![1]), move |url| {
            let _ = b_tx.send(url);
        });
        assert_eq!(tracker.active_slots(), vec!["a", "b"]);

        assert!(a_rx.await.unwrap().starts_with("data:image/png"));
        assert!(b_rx.await.unwrap().starts_with("data:image/gif"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_all() {
        let tracker = UploadTracker::new(TICK, CLEAR);
        tracker.start("a", png(), |_| {});
        tracker.start("b", png(), |_| {});
        assert_eq!(tracker.cancel_all(), 2);
        assert!(tracker.active_slots().is_empty());
    }
}
