//! Trip repository
//!
//! CRUD over the trip collection stored behind a `StorageGateway`.
//! There is no cache: every call re-reads storage. Mutations run as
//! read-modify-write cycles through a single async mutex shared by all
//! clones, so two writes never interleave and neither can lose the other.

use crate::config::{DEFAULT_TRIP_EMOJI, EMOJI_OPTIONS};
use crate::dates::{count_days, format_date_range};
use crate::error::{AppError, Result};
use crate::ids::{ensure_distinct, unique_id, IdGenerator};
use crate::models::{Trip, TripDraft, TripPatch};
use crate::storage::{envelope, StorageGateway};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Result of a mutation step: either a new collection to persist or
/// nothing to write
enum Outcome<T> {
    Commit(Vec<Trip>, T),
    Unchanged(T),
}

/// Repository for the trip collection
#[derive(Clone)]
pub struct TripRepository {
    gateway: StorageGateway,
    ids: Arc<dyn IdGenerator>,
    write_lock: Arc<Mutex<()>>,
}

impl TripRepository {
    pub fn new(gateway: StorageGateway, ids: Arc<dyn IdGenerator>) -> Self {
        Self {
            gateway,
            ids,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Shared id source, also used for nested items
    pub fn id_generator(&self) -> Arc<dyn IdGenerator> {
        Arc::clone(&self.ids)
    }

    /// All trips in insertion order; empty if nothing was ever stored
    pub async fn list_all(&self) -> Result<Vec<Trip>> {
        self.load().await
    }

    /// Get a trip by ID
    pub async fn get_by_id(&self, id: &str) -> Result<Trip> {
        self.load()
            .await?
            .into_iter()
            .find(|t| t.id == id)
            .ok_or_else(|| AppError::not_found("Trip", id))
    }

    /// Create a new trip from a submitted form
    pub async fn create(&self, draft: TripDraft) -> Result<Trip> {
        let destination = draft.destination.trim().to_string();
        if destination.is_empty() {
            return Err(AppError::validation("Destination is required"));
        }
        let start = draft
            .start_date
            .ok_or_else(|| AppError::validation("Start date is required"))?;
        let end = draft
            .end_date
            .ok_or_else(|| AppError::validation("End date is required"))?;
        if end < start {
            return Err(AppError::validation("End date cannot be before start date"));
        }

        let emoji = draft
            .emoji
            .unwrap_or_else(|| DEFAULT_TRIP_EMOJI.to_string());
        validate_emoji(&emoji)?;

        let description = draft
            .description
            .map(|d| d.trim().to_string())
            .unwrap_or_default();

        let ids = Arc::clone(&self.ids);
        let trip = self
            .transact(move |mut trips| {
                let id = unique_id(ids.as_ref(), trips.iter().map(|t| t.id.as_str()))?;
                let trip = Trip {
                    id,
                    destination,
                    date: format_date_range(start, end),
                    start_date: Some(start),
                    end_date: Some(end),
                    emoji,
                    gradient: draft.gradient.unwrap_or_default(),
                    description,
                    memories: 0,
                    days: count_days(Some(start), Some(end)),
                    photos: Vec::new(),
                    notes: Vec::new(),
                };
                trips.push(trip.clone());
                Ok(Outcome::Commit(trips, trip))
            })
            .await?;

        tracing::debug!("Created trip: {}", trip.id);
        Ok(trip)
    }

    /// Merge `patch` into the stored trip
    pub async fn update(&self, id: &str, patch: TripPatch) -> Result<Trip> {
        let trip = self
            .update_with(id, move |current| apply_patch(current, patch).map(Some))
            .await?;

        tracing::debug!("Updated trip: {}", id);
        Ok(trip)
    }

    /// Replace the trip `id` with whatever `f` derives from its current value.
    ///
    /// `f` runs inside the write queue against freshly loaded data. Returning
    /// `Ok(None)` leaves storage untouched and yields the current trip.
    pub async fn update_with<F>(&self, id: &str, f: F) -> Result<Trip>
    where
        F: FnOnce(&Trip) -> Result<Option<Trip>> + Send,
    {
        self.transact(move |trips| {
            let pos = trips
                .iter()
                .position(|t| t.id == id)
                .ok_or_else(|| AppError::not_found("Trip", id))?;

            let Some(updated) = f(&trips[pos])? else {
                let current = trips.into_iter().nth(pos);
                return current
                    .map(Outcome::Unchanged)
                    .ok_or_else(|| AppError::not_found("Trip", id));
            };

            if updated.id != id {
                return Err(AppError::validation("Trip id cannot be changed"));
            }

            let next: Vec<Trip> = trips
                .into_iter()
                .enumerate()
                .map(|(i, t)| if i == pos { updated.clone() } else { t })
                .collect();

            Ok(Outcome::Commit(next, updated))
        })
        .await
    }

    /// Delete a trip together with its photos and notes. Deleting an unknown
    /// id succeeds without writing; the flag says whether anything was removed.
    pub async fn delete(&self, id: &str) -> Result<bool> {
        let removed = self
            .transact(|trips| {
                if !trips.iter().any(|t| t.id == id) {
                    return Ok(Outcome::Unchanged(false));
                }
                let next = trips.into_iter().filter(|t| t.id != id).collect();
                Ok(Outcome::Commit(next, true))
            })
            .await?;

        if removed {
            tracing::debug!("Deleted trip: {}", id);
        } else {
            tracing::debug!("Trip already absent, nothing to delete: {}", id);
        }
        Ok(removed)
    }

    /// Store `trips` only if the collection was never written.
    /// An empty stored list counts as written.
    pub async fn seed_if_absent(&self, trips: Vec<Trip>) -> Result<bool> {
        ensure_distinct("Trip", trips.iter().map(|t| t.id.as_str()))?;

        let _guard = self.write_lock.lock().await;

        if self.gateway.read().await?.is_some() {
            return Ok(false);
        }

        self.persist(&trips).await?;
        tracing::debug!("Seeded {} trips", trips.len());
        Ok(true)
    }

    async fn load(&self) -> Result<Vec<Trip>> {
        match self.gateway.read().await? {
            Some(bytes) => envelope::decode(&bytes),
            None => Ok(Vec::new()),
        }
    }

    async fn persist(&self, trips: &[Trip]) -> Result<()> {
        let bytes = envelope::encode(trips)?;
        self.gateway.write(&bytes).await
    }

    /// One read-modify-write cycle under the write lock
    async fn transact<T, F>(&self, op: F) -> Result<T>
    where
        F: FnOnce(Vec<Trip>) -> Result<Outcome<T>> + Send,
        T: Send,
    {
        let _guard = self.write_lock.lock().await;

        let trips = self.load().await?;
        match op(trips)? {
            Outcome::Commit(trips, value) => {
                self.persist(&trips).await?;
                Ok(value)
            }
            Outcome::Unchanged(value) => Ok(value),
        }
    }
}

fn validate_emoji(emoji: &str) -> Result<()> {
    if EMOJI_OPTIONS.contains(&emoji) {
        Ok(())
    } else {
        Err(AppError::validation(format!(
            "Emoji {} is not one of the trip icons",
            emoji
        )))
    }
}

/// Shallow merge. Nested lists are replaced wholesale when present; the
/// derived date string and day count follow any date change.
fn apply_patch(current: &Trip, patch: TripPatch) -> Result<Trip> {
    let mut next = current.clone();

    if let Some(destination) = patch.destination {
        let destination = destination.trim();
        if destination.is_empty() {
            return Err(AppError::validation("Destination cannot be empty"));
        }
        next.destination = destination.to_string();
    }

    let dates_changed = patch.start_date.is_some() || patch.end_date.is_some();
    if let Some(start) = patch.start_date {
        next.start_date = Some(start);
    }
    if let Some(end) = patch.end_date {
        next.end_date = Some(end);
    }
    if dates_changed {
        let (Some(start), Some(end)) = (next.start_date, next.end_date) else {
            return Err(AppError::validation(
                "Both start and end dates are required when changing dates",
            ));
        };
        if end < start {
            return Err(AppError::validation("End date cannot be before start date"));
        }
        next.date = format_date_range(start, end);
        next.days = count_days(Some(start), Some(end));
    }

    if let Some(emoji) = patch.emoji {
        validate_emoji(&emoji)?;
        next.emoji = emoji;
    }
    if let Some(gradient) = patch.gradient {
        next.gradient = gradient;
    }
    if let Some(description) = patch.description {
        next.description = description.trim().to_string();
    }
    if let Some(memories) = patch.memories {
        next.memories = memories;
    }

    if let Some(photos) = patch.photos {
        ensure_distinct("Photo", photos.iter().map(|p| p.id.as_str()))?;
        if photos.iter().any(|p| p.uri.trim().is_empty()) {
            return Err(AppError::validation("Photo uri is required"));
        }
        next.photos = photos;
    }
    if let Some(notes) = patch.notes {
        ensure_distinct("Note", notes.iter().map(|n| n.id.as_str()))?;
        next.notes = notes;
    }

    Ok(next)
}
