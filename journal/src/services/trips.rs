//! Trips service
//!
//! Trip lifecycle on top of the repository: first-run seeding, CRUD with
//! logging, the per-card summaries and the form palettes.

use crate::config::EMOJI_OPTIONS;
use crate::error::Result;
use crate::ids::unique_id;
use crate::models::{Gradient, Trip, TripDraft, TripPatch};
use crate::repository::TripRepository;
use serde::Serialize;

/// Counts shown on a trip card
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TripSummary {
    pub id: String,
    pub destination: String,
    pub date: String,
    pub emoji: String,
    pub gradient: Gradient,
    pub days: u32,
    pub photo_count: usize,
    pub note_count: usize,
}

impl From<&Trip> for TripSummary {
    fn from(trip: &Trip) -> Self {
        Self {
            id: trip.id.clone(),
            destination: trip.destination.clone(),
            date: trip.date.clone(),
            emoji: trip.emoji.clone(),
            gradient: trip.gradient,
            days: trip.days,
            photo_count: trip.photo_count(),
            note_count: trip.note_count(),
        }
    }
}

/// One entry of the gradient picker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GradientOption {
    pub name: &'static str,
    pub colors: [&'static str; 2],
    pub gradient: Gradient,
}

// destination, date, emoji, memories, gradient, days
const SAMPLE_TRIPS: &[(&str, &str, &str, u32, Gradient, u32)] = &[
    ("Paris, France", "June 15-22, 2024", "🗼", 12, Gradient::Sunset, 7),
    ("Tokyo, Japan", "March 10-20, 2024", "🗾", 24, Gradient::Ocean, 10),
    ("Bali, Indonesia", "December 1-8, 2023", "🏝️", 18, Gradient::Forest, 7),
    ("New York, USA", "September 5-12, 2023", "🗽", 15, Gradient::Golden, 7),
    ("Santorini, Greece", "July 20-28, 2023", "🏛️", 20, Gradient::Purple, 8),
];

/// Service for managing trips
#[derive(Clone)]
pub struct TripsService {
    repo: TripRepository,
}

impl TripsService {
    pub fn new(repo: TripRepository) -> Self {
        Self { repo }
    }

    /// Seed the sample trips if storage was never written.
    /// Returns whether seeding happened; an explicitly empty list stays empty.
    pub async fn initialize(&self) -> Result<bool> {
        let samples = self.sample_trips()?;
        let seeded = self.repo.seed_if_absent(samples).await?;

        if seeded {
            tracing::info!("First run: seeded {} sample trips", SAMPLE_TRIPS.len());
        } else {
            tracing::debug!("Trips already stored, skipping seed");
        }

        Ok(seeded)
    }

    fn sample_trips(&self) -> Result<Vec<Trip>> {
        let ids = self.repo.id_generator();
        let mut trips: Vec<Trip> = Vec::with_capacity(SAMPLE_TRIPS.len());

        for &(destination, date, emoji, memories, gradient, days) in SAMPLE_TRIPS {
            let id = unique_id(ids.as_ref(), trips.iter().map(|t| t.id.as_str()))?;
            trips.push(Trip {
                id,
                destination: destination.to_string(),
                date: date.to_string(),
                start_date: None,
                end_date: None,
                emoji: emoji.to_string(),
                gradient,
                description: String::new(),
                memories,
                days,
                photos: Vec::new(),
                notes: Vec::new(),
            });
        }

        Ok(trips)
    }

    /// Create a new trip
    pub async fn create_trip(&self, draft: TripDraft) -> Result<Trip> {
        tracing::info!("Creating new trip: {}", draft.destination);

        let trip = self.repo.create(draft).await?;

        tracing::info!("Trip created successfully: {}", trip.id);

        Ok(trip)
    }

    /// Get a trip by ID
    pub async fn get_trip(&self, id: &str) -> Result<Trip> {
        self.repo.get_by_id(id).await
    }

    /// List all trips
    pub async fn list_trips(&self) -> Result<Vec<Trip>> {
        self.repo.list_all().await
    }

    /// Update a trip
    pub async fn update_trip(&self, id: &str, patch: TripPatch) -> Result<Trip> {
        tracing::debug!("Updating trip: {}", id);

        let trip = self.repo.update(id, patch).await?;

        tracing::debug!("Trip updated successfully: {}", trip.id);

        Ok(trip)
    }

    /// Delete a trip with its photos and notes
    pub async fn delete_trip(&self, id: &str) -> Result<bool> {
        tracing::info!("Deleting trip: {}", id);

        let removed = self.repo.delete(id).await?;

        if removed {
            tracing::info!("Trip deleted successfully: {}", id);
        } else {
            tracing::debug!("Trip {} was already gone", id);
        }

        Ok(removed)
    }

    /// Search trips by destination
    pub async fn search_trips(&self, query: &str) -> Result<Vec<Trip>> {
        let query_lower = query.to_lowercase();

        Ok(self
            .list_trips()
            .await?
            .into_iter()
            .filter(|trip| trip.destination.to_lowercase().contains(&query_lower))
            .collect())
    }

    pub async fn list_summaries(&self) -> Result<Vec<TripSummary>> {
        Ok(self.list_trips().await?.iter().map(TripSummary::from).collect())
    }

    pub fn gradient_options() -> Vec<GradientOption> {
        Gradient::ALL
            .into_iter()
            .map(|gradient| GradientOption {
                name: gradient.name(),
                colors: gradient.colors(),
                gradient,
            })
            .collect()
    }

    pub fn emoji_options() -> &'static [&'static str] {
        EMOJI_OPTIONS
    }
}
