//! Nested collection editing
//!
//! Add, update and remove photos or notes inside a trip. One generic editor
//! serves both lists; `NestedItem` says where a list lives on the trip and
//! how its items are validated, built and merged.
//!
//! Every edit goes through `TripRepository::update_with`, so it reads the
//! latest stored trip and is serialized with all other writes.

use crate::config::{DEFAULT_NOTE_MOOD, DEFAULT_PHOTO_CAPTION};
use crate::dates::{format_note_date, format_note_time, Clock};
use crate::error::{AppError, Result};
use crate::ids::unique_id;
use crate::models::{Note, NoteDraft, NotePatch, Photo, PhotoDraft, PhotoPatch, Trip};
use crate::repository::TripRepository;
use std::marker::PhantomData;
use std::sync::Arc;

/// An item embedded in one of a trip's lists
pub trait NestedItem: Clone + Send + Sync + 'static {
    type Draft: Send;
    type Patch: Send;

    /// Entity name used in errors and logs
    const ENTITY: &'static str;

    fn id(&self) -> &str;

    /// The list this item type lives in
    fn list(trip: &Trip) -> &[Self];

    /// Copy of `trip` with the list replaced
    fn with_list(trip: &Trip, items: Vec<Self>) -> Trip;

    /// Caller-chosen id, if any
    fn draft_id(draft: &Self::Draft) -> Option<&str>;

    fn validate_draft(draft: &Self::Draft) -> Result<()>;

    fn validate_patch(patch: &Self::Patch) -> Result<()>;

    fn build(draft: Self::Draft, id: String, clock: &dyn Clock) -> Self;

    fn merge(&self, patch: Self::Patch) -> Self;
}

fn require_text(value: &str, what: &str) -> Result<()> {
    if value.trim().is_empty() {
        Err(AppError::validation(format!("{} is required", what)))
    } else {
        Ok(())
    }
}

fn caption_or_default(caption: Option<String>) -> String {
    caption
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| DEFAULT_PHOTO_CAPTION.to_string())
}

fn mood_or_default(mood: Option<String>) -> String {
    mood.map(|m| m.trim().to_string())
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| DEFAULT_NOTE_MOOD.to_string())
}

impl NestedItem for Photo {
    type Draft = PhotoDraft;
    type Patch = PhotoPatch;

    const ENTITY: &'static str = "Photo";

    fn id(&self) -> &str {
        &self.id
    }

    fn list(trip: &Trip) -> &[Self] {
        &trip.photos
    }

    fn with_list(trip: &Trip, items: Vec<Self>) -> Trip {
        Trip {
            photos: items,
            ..trip.clone()
        }
    }

    fn draft_id(draft: &PhotoDraft) -> Option<&str> {
        draft.id.as_deref()
    }

    fn validate_draft(draft: &PhotoDraft) -> Result<()> {
        require_text(&draft.uri, "Photo uri")
    }

    fn validate_patch(patch: &PhotoPatch) -> Result<()> {
        match &patch.uri {
            Some(uri) => require_text(uri, "Photo uri"),
            None => Ok(()),
        }
    }

    fn build(draft: PhotoDraft, id: String, _clock: &dyn Clock) -> Self {
        Photo {
            id,
            uri: draft.uri,
            caption: caption_or_default(draft.caption),
            category: draft.category,
        }
    }

    fn merge(&self, patch: PhotoPatch) -> Self {
        Photo {
            id: self.id.clone(),
            uri: patch.uri.unwrap_or_else(|| self.uri.clone()),
            caption: match patch.caption {
                Some(caption) => caption_or_default(Some(caption)),
                None => self.caption.clone(),
            },
            category: patch.category.or(self.category),
        }
    }
}

impl NestedItem for Note {
    type Draft = NoteDraft;
    type Patch = NotePatch;

    const ENTITY: &'static str = "Note";

    fn id(&self) -> &str {
        &self.id
    }

    fn list(trip: &Trip) -> &[Self] {
        &trip.notes
    }

    fn with_list(trip: &Trip, items: Vec<Self>) -> Trip {
        Trip {
            notes: items,
            ..trip.clone()
        }
    }

    fn draft_id(draft: &NoteDraft) -> Option<&str> {
        draft.id.as_deref()
    }

    fn validate_draft(draft: &NoteDraft) -> Result<()> {
        require_text(&draft.title, "Note title")?;
        require_text(&draft.content, "Note content")
    }

    fn validate_patch(patch: &NotePatch) -> Result<()> {
        if let Some(title) = &patch.title {
            require_text(title, "Note title")?;
        }
        if let Some(content) = &patch.content {
            require_text(content, "Note content")?;
        }
        Ok(())
    }

    fn build(draft: NoteDraft, id: String, clock: &dyn Clock) -> Self {
        let now = clock.now();
        Note {
            id,
            title: draft.title,
            content: draft.content,
            date: format_note_date(now),
            time: format_note_time(now),
            mood: mood_or_default(draft.mood),
        }
    }

    fn merge(&self, patch: NotePatch) -> Self {
        Note {
            title: patch.title.unwrap_or_else(|| self.title.clone()),
            content: patch.content.unwrap_or_else(|| self.content.clone()),
            mood: match patch.mood {
                Some(mood) => mood_or_default(Some(mood)),
                None => self.mood.clone(),
            },
            ..self.clone()
        }
    }
}

/// Editor for one kind of nested list
pub struct NestedCollectionEditor<T: NestedItem> {
    repo: TripRepository,
    clock: Arc<dyn Clock>,
    _item: PhantomData<fn() -> T>,
}

impl<T: NestedItem> Clone for NestedCollectionEditor<T> {
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            clock: Arc::clone(&self.clock),
            _item: PhantomData,
        }
    }
}

pub type PhotoEditor = NestedCollectionEditor<Photo>;
pub type NoteEditor = NestedCollectionEditor<Note>;

impl<T: NestedItem> NestedCollectionEditor<T> {
    pub fn new(repo: TripRepository, clock: Arc<dyn Clock>) -> Self {
        Self {
            repo,
            clock,
            _item: PhantomData,
        }
    }

    /// Items of one trip in display order
    pub async fn list_items(&self, trip_id: &str) -> Result<Vec<T>> {
        let trip = self.repo.get_by_id(trip_id).await?;
        Ok(T::list(&trip).to_vec())
    }

    /// Append a new item, assigning an id unless the draft carries one
    pub async fn add_item(&self, trip_id: &str, draft: T::Draft) -> Result<Trip> {
        T::validate_draft(&draft)?;

        let ids = self.repo.id_generator();
        let clock = Arc::clone(&self.clock);

        let trip = self
            .repo
            .update_with(trip_id, move |trip| {
                let existing = T::list(trip);

                let id = match T::draft_id(&draft) {
                    Some(id) if id.trim().is_empty() => {
                        return Err(AppError::validation(format!(
                            "{} id cannot be empty",
                            T::ENTITY
                        )))
                    }
                    Some(id) if existing.iter().any(|item| item.id() == id) => {
                        return Err(AppError::validation(format!(
                            "Duplicate {} id: {}",
                            T::ENTITY,
                            id
                        )))
                    }
                    Some(id) => id.to_string(),
                    None => unique_id(ids.as_ref(), existing.iter().map(|item| item.id()))?,
                };

                let item = T::build(draft, id, clock.as_ref());
                let items = existing
                    .iter()
                    .cloned()
                    .chain(std::iter::once(item))
                    .collect();

                Ok(Some(T::with_list(trip, items)))
            })
            .await?;

        tracing::debug!("Added {} to trip: {}", T::ENTITY, trip_id);
        Ok(trip)
    }

    /// Merge `patch` into the item `item_id`
    pub async fn update_item(&self, trip_id: &str, item_id: &str, patch: T::Patch) -> Result<Trip> {
        T::validate_patch(&patch)?;

        let trip = self
            .repo
            .update_with(trip_id, move |trip| {
                let existing = T::list(trip);
                let pos = existing
                    .iter()
                    .position(|item| item.id() == item_id)
                    .ok_or_else(|| AppError::not_found(T::ENTITY, item_id))?;

                let merged = existing[pos].merge(patch);
                let items = existing
                    .iter()
                    .enumerate()
                    .map(|(i, item)| if i == pos { merged.clone() } else { item.clone() })
                    .collect();

                Ok(Some(T::with_list(trip, items)))
            })
            .await?;

        tracing::debug!("Updated {} {} in trip: {}", T::ENTITY, item_id, trip_id);
        Ok(trip)
    }

    /// Remove the item `item_id`. Removing an unknown item returns the trip
    /// unchanged; an unknown trip is `NotFound`.
    pub async fn remove_item(&self, trip_id: &str, item_id: &str) -> Result<Trip> {
        let trip = self
            .repo
            .update_with(trip_id, move |trip| {
                let existing = T::list(trip);
                if !existing.iter().any(|item| item.id() == item_id) {
                    return Ok(None);
                }

                let items = existing
                    .iter()
                    .filter(|item| item.id() != item_id)
                    .cloned()
                    .collect();

                Ok(Some(T::with_list(trip, items)))
            })
            .await?;

        tracing::debug!("Removed {} {} from trip: {}", T::ENTITY, item_id, trip_id);
        Ok(trip)
    }
}
