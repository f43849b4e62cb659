use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::queue::ImageQueue;
use super::registry::{is_safe_dir_name, Bucket, CategoryId, CategoryRegistry, CategorySlot};
use super::throughput::{SessionClock, Throughput};
use crate::error::{Result, SorterError};
use crate::export::{self, ExportFailure, ExportReport};

/// Where the sorting workflow currently stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No folder loaded, or the folder had no images
    Idle,
    /// An image is displayed and waits for a category click
    Showing,
    /// Every image of the folder has been assigned
    Done,
}

/// Result of one successful category click
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub image: PathBuf,
    pub category: String,
    /// This click set the card's preview (its first image)
    pub preview_set: bool,
    pub remaining: usize,
}

/// The sorting session: image queue, categories and counters.
///
/// The presentation layer owns exactly one `Session` and only changes it
/// through these methods.
#[derive(Debug, Clone, Default)]
pub struct Session {
    queue: ImageQueue,
    registry: CategoryRegistry,
    clock: SessionClock,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn with_clock(clock: SessionClock) -> Self {
        Self {
            clock,
            ..Default::default()
        }
    }

    /// Replace the queue with the images of `folder`.
    ///
    /// On success all previous assignments and card previews are cleared
    /// (the cards and their names stay). On failure nothing changes.
    pub fn load_folder(&mut self, folder: &Path) -> Result<usize> {
        let queue = ImageQueue::load(folder)?;
        let count = queue.len();

        self.queue = queue;
        self.registry.reset_assignments();

        info!("🎨 Session loaded {} images from {}", count, folder.display());
        Ok(count)
    }

    pub fn create_category(&mut self) -> CategoryId {
        let id = self.registry.create_category();
        debug!("Created category {}", id);
        id
    }

    pub fn set_category_name(&mut self, id: CategoryId, text: impl Into<String>) -> Result<()> {
        self.registry.set_name(id, text)
    }

    /// Assign the current image to the category behind `id`.
    ///
    /// Validation failures (blank name, nothing to assign, unknown card)
    /// leave the session untouched.
    pub fn handle_category_selected(&mut self, id: CategoryId) -> Result<Assignment> {
        let name = self.registry.slot(id)?.name_input.trim().to_string();
        if name.is_empty() {
            return Err(SorterError::EmptyCategoryName);
        }
        if !is_safe_dir_name(&name) {
            return Err(SorterError::UnsafeCategoryName(name));
        }

        let image = self
            .queue
            .current()
            .map(Path::to_path_buf)
            .ok_or(SorterError::NothingToAssign)?;

        let assigned = self.registry.assign(id, &name, &image)?;
        self.queue.advance();
        self.queue.record_processed();

        debug!(
            "Assigned {} to '{}' ({} remaining)",
            image.display(),
            name,
            self.queue.remaining()
        );

        Ok(Assignment {
            image,
            category: name,
            preview_set: assigned.preview_set,
            remaining: self.queue.remaining(),
        })
    }

    pub fn phase(&self) -> Phase {
        if self.queue.is_empty() {
            Phase::Idle
        } else if self.queue.is_exhausted() {
            Phase::Done
        } else {
            Phase::Showing
        }
    }

    pub fn current_image(&self) -> Option<&Path> {
        self.queue.current()
    }

    pub fn processed(&self) -> usize {
        self.queue.processed()
    }

    pub fn remaining(&self) -> usize {
        self.queue.remaining()
    }

    pub fn total(&self) -> usize {
        self.queue.len()
    }

    pub fn categories(&self) -> &[CategorySlot] {
        self.registry.slots()
    }

    pub fn category(&self, id: CategoryId) -> Result<&CategorySlot> {
        self.registry.slot(id)
    }

    pub fn buckets(&self) -> &[Bucket] {
        self.registry.buckets()
    }

    pub fn throughput(&self, now: DateTime<Local>) -> Throughput {
        self.clock.throughput(self.queue.processed(), now)
    }

    /// Export every bucket into `destination` on the calling thread
    pub fn export(&self, destination: &Path) -> ExportReport {
        export::export_buckets(self.registry.buckets(), destination)
    }

    /// Export a snapshot of this session on a blocking worker thread
    pub async fn export_async(self, destination: PathBuf) -> ExportReport {
        let fallback = destination.clone();
        tokio::task::spawn_blocking(move || self.export(&destination))
            .await
            .unwrap_or_else(|e| ExportReport {
                failures: vec![ExportFailure {
                    image: fallback.clone(),
                    reason: format!("Export task failed: {}", e),
                }],
                destination: fallback,
                ..Default::default()
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use std::fs;
    use tempfile::{tempdir, TempDir};

    fn folder_with(names: &[&str]) -> TempDir {
        let dir = tempdir().unwrap();
        for name in names {
            fs::write(dir.path().join(name), name.as_bytes()).unwrap();
        }
        dir
    }

    fn named_category(session: &mut Session, name: &str) -> CategoryId {
        let id = session.create_category();
        session.set_category_name(id, name).unwrap();
        id
    }

    #[test]
    fn test_load_shows_first_image() {
        let dir = folder_with(&["a.jpg", "b.png", "c.jpeg", "c.txt"]);
        let mut session = Session::new();
        assert_eq!(session.phase(), Phase::Idle);

        let count = session.load_folder(dir.path()).unwrap();

        assert_eq!(count, 3);
        assert_eq!(session.total(), 3);
        assert_eq!(session.remaining(), 3);
        assert_eq!(session.phase(), Phase::Showing);
        assert!(session.current_image().is_some());
    }

    #[test]
    fn test_assignment_increments_by_one() {
        let dir = folder_with(&["a.jpg", "b.jpg", "c.jpg"]);
        let mut session = Session::new();
        session.load_folder(dir.path()).unwrap();
        let cats = named_category(&mut session, "Cats");

        let shown = session.current_image().unwrap().to_path_buf();
        let assignment = session.handle_category_selected(cats).unwrap();

        assert_eq!(assignment.image, shown);
        assert_eq!(assignment.category, "Cats");
        assert_eq!(assignment.remaining, 2);
        assert_eq!(session.processed(), 1);
        assert_ne!(session.current_image().unwrap(), shown);

        session.handle_category_selected(cats).unwrap();
        assert_eq!(session.processed(), 2);
    }

    #[test]
    fn test_whitespace_name_changes_nothing() {
        let dir = folder_with(&["a.jpg", "b.jpg"]);
        let mut session = Session::new();
        session.load_folder(dir.path()).unwrap();
        let blank = named_category(&mut session, "   ");
        let shown = session.current_image().unwrap().to_path_buf();

        let result = session.handle_category_selected(blank);

        assert!(matches!(result, Err(SorterError::EmptyCategoryName)));
        assert_eq!(session.processed(), 0);
        assert_eq!(session.current_image().unwrap(), shown);
        assert!(session.buckets().is_empty());
        assert_eq!(session.category(blank).unwrap().preview, None);
    }

    #[test]
    fn test_parent_dir_name_changes_nothing() {
        let dir = folder_with(&["a.jpg"]);
        let mut session = Session::new();
        session.load_folder(dir.path()).unwrap();
        let up = named_category(&mut session, "..");

        let result = session.handle_category_selected(up);

        assert!(matches!(result, Err(SorterError::UnsafeCategoryName(_))));
        assert_eq!(session.processed(), 0);
        assert!(session.buckets().is_empty());
        assert_eq!(session.phase(), Phase::Showing);
    }

    #[test]
    fn test_preview_is_fixed_by_first_assignment() {
        let dir = folder_with(&["a.jpg", "b.jpg", "c.jpg"]);
        let mut session = Session::new();
        session.load_folder(dir.path()).unwrap();
        let cats = named_category(&mut session, "Cats");

        let first = session.handle_category_selected(cats).unwrap();
        let second = session.handle_category_selected(cats).unwrap();

        assert!(first.preview_set);
        assert!(!second.preview_set);
        assert_ne!(first.image, second.image);
        assert_eq!(session.category(cats).unwrap().preview, Some(first.image.clone()));
        assert_eq!(session.buckets()[0].images, vec![first.image, second.image]);
    }

    #[test]
    fn test_done_after_last_image() {
        let dir = folder_with(&["a.jpg", "b.jpg"]);
        let mut session = Session::new();
        session.load_folder(dir.path()).unwrap();
        let cats = named_category(&mut session, "Cats");
        let dogs = named_category(&mut session, "Dogs");

        session.handle_category_selected(cats).unwrap();
        let last = session.handle_category_selected(dogs).unwrap();

        assert_eq!(last.remaining, 0);
        assert_eq!(session.phase(), Phase::Done);
        assert_eq!(session.current_image(), None);

        let extra = session.handle_category_selected(cats);
        assert!(matches!(extra, Err(SorterError::NothingToAssign)));
        assert_eq!(session.processed(), 2);
        assert_eq!(session.buckets().len(), 2);
    }

    #[test]
    fn test_click_before_any_folder() {
        let mut session = Session::new();
        let cats = named_category(&mut session, "Cats");
        assert!(matches!(
            session.handle_category_selected(cats),
            Err(SorterError::NothingToAssign)
        ));
    }

    #[test]
    fn test_reload_resets_assignments_keeps_cards() {
        let first = folder_with(&["a.jpg", "b.jpg"]);
        let second = folder_with(&["x.png"]);
        let mut session = Session::new();
        session.load_folder(first.path()).unwrap();
        let cats = named_category(&mut session, "Cats");
        session.handle_category_selected(cats).unwrap();

        session.load_folder(second.path()).unwrap();

        assert_eq!(session.processed(), 0);
        assert_eq!(session.total(), 1);
        assert!(session.buckets().is_empty());
        let card = session.category(cats).unwrap();
        assert_eq!(card.name_input, "Cats");
        assert_eq!(card.preview, None);
    }

    #[test]
    fn test_failed_reload_keeps_state() {
        let dir = folder_with(&["a.jpg", "b.jpg"]);
        let mut session = Session::new();
        session.load_folder(dir.path()).unwrap();
        let cats = named_category(&mut session, "Cats");
        session.handle_category_selected(cats).unwrap();

        let result = session.load_folder(&dir.path().join("missing"));

        assert!(result.is_err());
        assert_eq!(session.total(), 2);
        assert_eq!(session.processed(), 1);
        assert_eq!(session.buckets().len(), 1);
    }

    #[test]
    fn test_throughput_uses_processed_count() {
        let dir = folder_with(&["a.jpg", "b.jpg"]);
        let clock = SessionClock::start();
        let mut session = Session::with_clock(clock);
        session.load_folder(dir.path()).unwrap();
        let cats = named_category(&mut session, "Cats");
        session.handle_category_selected(cats).unwrap();
        session.handle_category_selected(cats).unwrap();

        let snapshot = session.throughput(clock.started_at() + Duration::seconds(60));
        assert_eq!(snapshot.elapsed_secs, 60);
        assert!((snapshot.images_per_minute - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_sort_and_export_round_trip() {
        let src = tempdir().unwrap();
        fs::write(src.path().join("a.jpg"), b"image a").unwrap();
        fs::write(src.path().join("a.txt"), "red").unwrap();
        fs::write(src.path().join("b.jpg"), b"image b").unwrap();
        let dest = tempdir().unwrap();

        let mut session = Session::new();
        session.load_folder(src.path()).unwrap();
        let cats = named_category(&mut session, "Cats");
        session.handle_category_selected(cats).unwrap();
        session.handle_category_selected(cats).unwrap();

        let report = session.export(dest.path());

        assert!(report.is_clean());
        let out = dest.path().join("Cats");
        assert_eq!(fs::read(out.join("a.jpg")).unwrap(), b"image a");
        assert_eq!(fs::read(out.join("b.jpg")).unwrap(), b"image b");
        assert_eq!(fs::read_to_string(out.join("a.txt")).unwrap(), "red, Cats");
        assert_eq!(fs::read_to_string(out.join("b.txt")).unwrap(), "Cats");
    }
}
