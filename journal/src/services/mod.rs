//! Services module
//!
//! Business logic services that sit between callers and the repository.

pub mod gallery;
pub mod nested;
pub mod trips;

pub use gallery::{CategoryFilter, GalleryService, GalleryStats, GalleryView};
pub use nested::{NestedCollectionEditor, NestedItem, NoteEditor, PhotoEditor};
pub use trips::{TripSummary, TripsService};
