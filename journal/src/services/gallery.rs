//! Photo gallery
//!
//! Flattens photos across all trips, filters them by category and computes
//! the header statistics. The free functions are pure; `GalleryService`
//! feeds them from the repository.

use crate::config::CATEGORY_ALL;
use crate::error::{AppError, Result};
use crate::models::{Photo, PhotoCategory, Trip};
use crate::repository::TripRepository;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// A photo together with the trip it belongs to
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotatedPhoto {
    #[serde(flatten)]
    pub photo: Photo,
    pub trip_id: String,
    pub trip_destination: String,
    pub trip_date: String,
}

/// Category chip selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(PhotoCategory),
}

impl CategoryFilter {
    /// Chip labels in display order, "All" first
    pub fn labels() -> Vec<&'static str> {
        std::iter::once(CATEGORY_ALL)
            .chain(PhotoCategory::ALL.iter().map(|c| c.as_str()))
            .collect()
    }

    fn matches(self, photo: &Photo) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(category) => photo.category == Some(category),
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        if s == CATEGORY_ALL {
            return Ok(CategoryFilter::All);
        }
        s.parse::<PhotoCategory>()
            .map(CategoryFilter::Only)
            .map_err(AppError::Validation)
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryFilter::All => f.write_str(CATEGORY_ALL),
            CategoryFilter::Only(category) => write!(f, "{}", category),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryStats {
    pub total: usize,
    /// Distinct trip destinations among the photos
    pub distinct_trips: usize,
    /// Photos whose trip date mentions the year token
    pub recent_count: usize,
}

/// What the gallery screen renders
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryView {
    pub photos: Vec<AnnotatedPhoto>,
    /// Computed over every photo, not just the filtered ones
    pub stats: GalleryStats,
}

/// Every photo of every trip, in trip order then stored order
pub fn flatten(trips: &[Trip]) -> Vec<AnnotatedPhoto> {
    trips
        .iter()
        .flat_map(|trip| {
            trip.photos.iter().map(move |photo| AnnotatedPhoto {
                photo: photo.clone(),
                trip_id: trip.id.clone(),
                trip_destination: trip.destination.clone(),
                trip_date: trip.date.clone(),
            })
        })
        .collect()
}

pub fn filter_by_category(
    photos: Vec<AnnotatedPhoto>,
    filter: CategoryFilter,
) -> Vec<AnnotatedPhoto> {
    photos
        .into_iter()
        .filter(|p| filter.matches(&p.photo))
        .collect()
}

pub fn compute_stats(photos: &[AnnotatedPhoto], year_token: &str) -> GalleryStats {
    let destinations: HashSet<&str> = photos
        .iter()
        .map(|p| p.trip_destination.as_str())
        .collect();

    GalleryStats {
        total: photos.len(),
        distinct_trips: destinations.len(),
        recent_count: photos
            .iter()
            .filter(|p| p.trip_date.contains(year_token))
            .count(),
    }
}

#[derive(Clone)]
pub struct GalleryService {
    repo: TripRepository,
}

impl GalleryService {
    pub fn new(repo: TripRepository) -> Self {
        Self { repo }
    }

    pub async fn load(&self, filter: CategoryFilter, year_token: &str) -> Result<GalleryView> {
        let trips = self.repo.list_all().await?;
        let all = flatten(&trips);
        let stats = compute_stats(&all, year_token);
        let photos = filter_by_category(all, filter);

        tracing::debug!(
            "Gallery loaded: {} of {} photos shown for {}",
            photos.len(),
            stats.total,
            filter
        );

        Ok(GalleryView { photos, stats })
    }
}
