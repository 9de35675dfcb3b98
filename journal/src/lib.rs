//! Trip journal library
//!
//! Persistence and aggregation core of the trip journal: trips with their
//! photos and notes, stored as one JSON document in a local key-value store,
//! plus the gallery view across all trips.

pub mod app;
pub mod config;
pub mod database;
pub mod dates;
pub mod error;
pub mod ids;
pub mod models;
pub mod repository;
pub mod services;
pub mod storage;

pub use app::{setup, AppState};
pub use error::{AppError, Result};
