use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{Result, SorterError};

/// Handle identifying one category card.
///
/// Handles are handed out in creation order and never reused, so the UI
/// can pass them straight back into an assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CategoryId(u32);

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A bucket name becomes one directory under the export folder, so it
/// must be a single plain path component.
pub fn is_safe_dir_name(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".." && !name.contains(['/', '\\'])
}

/// One category card: what the user typed plus its preview image
#[derive(Debug, Clone, PartialEq)]
pub struct CategorySlot {
    pub id: CategoryId,
    /// Raw contents of the name input (trimmed only at assignment)
    pub name_input: String,
    /// First image ever assigned through this card
    pub preview: Option<PathBuf>,
}

/// Named collection of assigned images
#[derive(Debug, Clone, PartialEq)]
pub struct Bucket {
    pub name: String,
    pub images: Vec<PathBuf>,
}

/// What happened to a slot during `assign`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Assigned {
    /// The slot's preview was empty and now shows the assigned image
    pub preview_set: bool,
}

/// Growable set of category cards and the buckets they fill.
///
/// Buckets are keyed by trimmed name, so two cards with the same name
/// feed the same bucket. Bucket order is first-seen order.
#[derive(Debug, Default, Clone)]
pub struct CategoryRegistry {
    slots: Vec<CategorySlot>,
    buckets: Vec<Bucket>,
    next_id: u32,
}

impl CategoryRegistry {
    #[cfg(test)]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new, unnamed and empty category card
    pub fn create_category(&mut self) -> CategoryId {
        let id = CategoryId(self.next_id);
        self.next_id += 1;
        self.slots.push(CategorySlot {
            id,
            name_input: String::new(),
            preview: None,
        });
        id
    }

    /// Store what the user typed into a card's name input
    pub fn set_name(&mut self, id: CategoryId, text: impl Into<String>) -> Result<()> {
        let slot = self.slot_mut(id)?;
        slot.name_input = text.into();
        Ok(())
    }

    /// Add `image` to the bucket named `trim(name)`.
    ///
    /// The card's preview is fixed by its first assignment and never
    /// replaced afterwards.
    pub fn assign(&mut self, id: CategoryId, name: &str, image: &Path) -> Result<Assigned> {
        let name = name.trim();
        if name.is_empty() {
            return Err(SorterError::EmptyCategoryName);
        }
        if !is_safe_dir_name(name) {
            return Err(SorterError::UnsafeCategoryName(name.to_string()));
        }
        // Look the slot up before touching any bucket
        let slot_index = self.slot_index(id)?;

        match self.buckets.iter_mut().find(|b| b.name == name) {
            Some(bucket) => bucket.images.push(image.to_path_buf()),
            None => self.buckets.push(Bucket {
                name: name.to_string(),
                images: vec![image.to_path_buf()],
            }),
        }

        let slot = &mut self.slots[slot_index];
        let preview_set = slot.preview.is_none();
        if preview_set {
            slot.preview = Some(image.to_path_buf());
        }

        Ok(Assigned { preview_set })
    }

    /// Drop every assignment and preview, keeping the cards and their names
    pub fn reset_assignments(&mut self) {
        self.buckets.clear();
        for slot in &mut self.slots {
            slot.preview = None;
        }
    }

    pub fn slot(&self, id: CategoryId) -> Result<&CategorySlot> {
        self.slots
            .iter()
            .find(|s| s.id == id)
            .ok_or(SorterError::UnknownCategory(id))
    }

    pub fn slots(&self) -> &[CategorySlot] {
        &self.slots
    }

    pub fn buckets(&self) -> &[Bucket] {
        &self.buckets
    }

    #[cfg(test)]
    pub fn bucket(&self, name: &str) -> Option<&Bucket> {
        self.buckets.iter().find(|b| b.name == name)
    }

    fn slot_index(&self, id: CategoryId) -> Result<usize> {
        self.slots
            .iter()
            .position(|s| s.id == id)
            .ok_or(SorterError::UnknownCategory(id))
    }

    fn slot_mut(&mut self, id: CategoryId) -> Result<&mut CategorySlot> {
        let index = self.slot_index(id)?;
        Ok(&mut self.slots[index])
    }
}
