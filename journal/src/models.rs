//! Journal models
//!
//! Rust structs for trips and the photos and notes embedded in them.
//! Field names serialize in camelCase to match the stored documents.

use crate::config::{DEFAULT_NOTE_MOOD, DEFAULT_PHOTO_CAPTION, DEFAULT_TRIP_EMOJI};
use crate::dates::iso_date;
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Color theme of a trip card, from a fixed palette
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Gradient {
    #[default]
    Sunset,
    Ocean,
    Forest,
    Golden,
    Purple,
    Rose,
    Mint,
    Candy,
}

impl Gradient {
    pub const ALL: [Gradient; 8] = [
        Gradient::Sunset,
        Gradient::Ocean,
        Gradient::Forest,
        Gradient::Golden,
        Gradient::Purple,
        Gradient::Rose,
        Gradient::Mint,
        Gradient::Candy,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Gradient::Sunset => "Sunset",
            Gradient::Ocean => "Ocean",
            Gradient::Forest => "Forest",
            Gradient::Golden => "Golden",
            Gradient::Purple => "Purple",
            Gradient::Rose => "Rose",
            Gradient::Mint => "Mint",
            Gradient::Candy => "Candy",
        }
    }

    /// Start and end color
    pub fn colors(self) -> [&'static str; 2] {
        match self {
            Gradient::Sunset => ["#FF6B6B", "#FF8E53"],
            Gradient::Ocean => ["#4E65FF", "#92EFFD"],
            Gradient::Forest => ["#11998E", "#38EF7D"],
            Gradient::Golden => ["#FFA500", "#FFD700"],
            Gradient::Purple => ["#667EEA", "#764BA2"],
            Gradient::Rose => ["#F857A6", "#FF5858"],
            Gradient::Mint => ["#43E97B", "#38F9D7"],
            Gradient::Candy => ["#FA709A", "#FEE140"],
        }
    }

    pub fn from_colors(colors: &[String]) -> Option<Self> {
        Self::ALL.into_iter().find(|g| {
            let [start, end] = g.colors();
            colors.len() == 2
                && colors[0].eq_ignore_ascii_case(start)
                && colors[1].eq_ignore_ascii_case(end)
        })
    }
}

// Persisted as the color pair so documents stay readable by older builds.
impl Serialize for Gradient {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.colors().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Gradient {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let colors: Vec<String> = Vec::deserialize(deserializer)?;
        match Gradient::from_colors(&colors) {
            Some(gradient) => Ok(gradient),
            None => {
                // The edit form falls back to the first palette entry the same way
                tracing::warn!("Unknown gradient {:?}, using Sunset", colors);
                Ok(Gradient::default())
            }
        }
    }
}

/// Gallery category of a photo
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PhotoCategory {
    Landmarks,
    Nature,
    Food,
    Culture,
    Street,
}

impl PhotoCategory {
    pub const ALL: [PhotoCategory; 5] = [
        PhotoCategory::Landmarks,
        PhotoCategory::Nature,
        PhotoCategory::Food,
        PhotoCategory::Culture,
        PhotoCategory::Street,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PhotoCategory::Landmarks => "Landmarks",
            PhotoCategory::Nature => "Nature",
            PhotoCategory::Food => "Food",
            PhotoCategory::Culture => "Culture",
            PhotoCategory::Street => "Street",
        }
    }
}

impl fmt::Display for PhotoCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PhotoCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("unknown photo category '{}'", s))
    }
}

/// A photo attached to a trip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Photo {
    pub id: String,
    /// Local file handle or remote locator; opaque here
    pub uri: String,
    #[serde(default = "default_caption")]
    pub caption: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<PhotoCategory>,
}

fn default_caption() -> String {
    DEFAULT_PHOTO_CAPTION.to_string()
}

/// A journal entry attached to a trip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: String,
    pub title: String,
    pub content: String,
    /// Creation date, e.g. "October 19, 2026"
    #[serde(default)]
    pub date: String,
    /// Creation time, e.g. "3:05 PM"
    #[serde(default)]
    pub time: String,
    #[serde(default = "default_mood")]
    pub mood: String,
}

fn default_mood() -> String {
    DEFAULT_NOTE_MOOD.to_string()
}

/// A planned or past journey
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "StoredTrip")]
pub struct Trip {
    pub id: String,
    pub destination: String,
    /// Display string derived from the dates
    pub date: String,
    #[serde(with = "iso_date")]
    pub start_date: Option<NaiveDate>,
    #[serde(with = "iso_date")]
    pub end_date: Option<NaiveDate>,
    pub emoji: String,
    pub gradient: Gradient,
    /// Free-text notes about the whole trip, separate from the `notes` entries
    pub description: String,
    /// Display counter only; use `photos.len()` / `notes.len()` for real counts
    pub memories: u32,
    pub days: u32,
    pub photos: Vec<Photo>,
    pub notes: Vec<Note>,
}

impl Trip {
    pub fn photo_count(&self) -> usize {
        self.photos.len()
    }

    pub fn note_count(&self) -> usize {
        self.notes.len()
    }
}

/// On-disk trip shape, tolerant of what earlier app builds wrote
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredTrip {
    id: String,
    destination: String,
    #[serde(default)]
    date: String,
    #[serde(default, with = "iso_date")]
    start_date: Option<NaiveDate>,
    #[serde(default, with = "iso_date")]
    end_date: Option<NaiveDate>,
    #[serde(default)]
    emoji: Option<String>,
    /// Older duplicate of `emoji`
    #[serde(default)]
    image: Option<String>,
    #[serde(default)]
    gradient: Option<Gradient>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    memories: Option<u32>,
    #[serde(default)]
    days: Option<u32>,
    #[serde(default)]
    photos: Value,
    #[serde(default)]
    notes: Value,
}

impl TryFrom<StoredTrip> for Trip {
    type Error = String;

    fn try_from(stored: StoredTrip) -> Result<Self, Self::Error> {
        let photos = embedded_list(&stored.id, "photos", stored.photos)?;

        // Older trip forms saved their free-text notes field into `notes`
        let (notes, legacy_text) = match stored.notes {
            Value::String(text) => {
                tracing::warn!(
                    "Trip {} stored notes as text, moving it to the description",
                    stored.id
                );
                (Vec::new(), text.trim().to_string())
            }
            other => (embedded_list(&stored.id, "notes", other)?, String::new()),
        };
        let description = stored
            .description
            .filter(|d| !d.trim().is_empty())
            .unwrap_or(legacy_text);

        Ok(Trip {
            id: stored.id,
            destination: stored.destination,
            date: stored.date,
            start_date: stored.start_date,
            end_date: stored.end_date,
            emoji: stored
                .emoji
                .or(stored.image)
                .unwrap_or_else(|| DEFAULT_TRIP_EMOJI.to_string()),
            gradient: stored.gradient.unwrap_or_default(),
            description,
            memories: stored.memories.unwrap_or(0),
            days: stored.days.unwrap_or(0),
            photos,
            notes,
        })
    }
}

/// Decode an embedded array, dropping null holes
fn embedded_list<T: DeserializeOwned>(
    trip_id: &str,
    field: &str,
    value: Value,
) -> Result<Vec<T>, String> {
    match value {
        Value::Null => Ok(Vec::new()),
        Value::Array(items) => items
            .into_iter()
            .filter(|item| !item.is_null())
            .map(|item| {
                serde_json::from_value(item)
                    .map_err(|e| format!("invalid entry in {} of trip {}: {}", field, trip_id, e))
            })
            .collect(),
        other => Err(format!(
            "expected {} of trip {} to be a list, found {}",
            field, trip_id, other
        )),
    }
}

/// Input for creating a trip
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripDraft {
    pub destination: String,
    #[serde(default, with = "iso_date")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, with = "iso_date")]
    pub end_date: Option<NaiveDate>,
    pub emoji: Option<String>,
    pub gradient: Option<Gradient>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Shallow merge applied to an existing trip; `None` keeps the stored value
#[derive(Debug, Clone, Default)]
pub struct TripPatch {
    pub destination: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub emoji: Option<String>,
    pub gradient: Option<Gradient>,
    pub description: Option<String>,
    pub memories: Option<u32>,
    /// Replaces the whole list when present
    pub photos: Option<Vec<Photo>>,
    /// Replaces the whole list when present
    pub notes: Option<Vec<Note>>,
}

/// Input for attaching a photo
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoDraft {
    /// Kept when set, otherwise assigned on insert
    pub id: Option<String>,
    pub uri: String,
    pub caption: Option<String>,
    pub category: Option<PhotoCategory>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoPatch {
    pub uri: Option<String>,
    pub caption: Option<String>,
    pub category: Option<PhotoCategory>,
}

/// Input for writing a note
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteDraft {
    pub id: Option<String>,
    pub title: String,
    pub content: String,
    pub mood: Option<String>,
}

/// Editable note fields; date and time stay as stamped
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotePatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub mood: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gradient_round_trips_as_color_pair() {
        let json = serde_json::to_string(&Gradient::Ocean).unwrap();
        assert_eq!(json, r##"["#4E65FF","#92EFFD"]"##);

        let parsed: Gradient = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, Gradient::Ocean);
    }

    #[test]
    fn test_unknown_gradient_falls_back_to_sunset() {
        let parsed: Gradient = serde_json::from_str(r##"["#000000","#FFFFFF"]"##).unwrap();
        assert_eq!(parsed, Gradient::Sunset);
    }

    #[test]
    fn test_legacy_trip_with_image_and_no_nested_lists() {
        let raw = r##"{
            "id": "1",
            "destination": "Paris, France",
            "date": "June 15-22, 2024",
            "image": "🗼",
            "memories": 12,
            "gradient": ["#FF6B6B", "#FF8E53"],
            "days": 7
        }"##;

        let trip: Trip = serde_json::from_str(raw).unwrap();
        assert_eq!(trip.emoji, "🗼");
        assert_eq!(trip.gradient, Gradient::Sunset);
        assert_eq!(trip.days, 7);
        assert!(trip.photos.is_empty());
        assert!(trip.notes.is_empty());
        assert_eq!(trip.start_date, None);
    }

    #[test]
    fn test_emoji_wins_over_image_when_both_present() {
        let raw = r#"{"id":"1","destination":"Tokyo","emoji":"🗾","image":"✈️"}"#;
        let trip: Trip = serde_json::from_str(raw).unwrap();
        assert_eq!(trip.emoji, "🗾");

        let written = serde_json::to_value(&trip).unwrap();
        assert!(written.get("image").is_none());
        assert_eq!(written["emoji"], "🗾");
    }

    #[test]
    fn test_null_entries_and_string_notes_are_repaired() {
        let raw = r#"{
            "id": "1",
            "destination": "Bali",
            "startDate": "2023-12-01T08:00:00.000Z",
            "photos": [null, {"id": "p1", "uri": "file:///a.jpg"}],
            "notes": ""
        }"#;

        let trip: Trip = serde_json::from_str(raw).unwrap();
        assert_eq!(trip.photos.len(), 1);
        assert_eq!(trip.photos[0].caption, "Untitled");
        assert!(trip.notes.is_empty());
        assert_eq!(trip.start_date, NaiveDate::from_ymd_opt(2023, 12, 1));
    }

    #[test]
    fn test_text_notes_become_description() {
        let raw = r#"{"id":"a","destination":"Rome","notes":"Loved the food"}"#;

        let trip: Trip = serde_json::from_str(raw).unwrap();
        assert!(trip.notes.is_empty());
        assert_eq!(trip.description, "Loved the food");

        let written = serde_json::to_value(&trip).unwrap();
        assert_eq!(written["description"], "Loved the food");
        assert_eq!(written["notes"], serde_json::json!([]));
        assert_eq!(serde_json::from_value::<Trip>(written).unwrap(), trip);
    }

    #[test]
    fn test_stored_description_wins_over_text_notes() {
        let raw = r#"{"id":"a","destination":"Rome","description":"Pasta","notes":"old"}"#;
        let trip: Trip = serde_json::from_str(raw).unwrap();
        assert_eq!(trip.description, "Pasta");
    }

    #[test]
    fn test_malformed_nested_entry_is_an_error() {
        let raw = r#"{"id":"1","destination":"Bali","photos":[{"caption":"no uri"}]}"#;
        assert!(serde_json::from_str::<Trip>(raw).is_err());

        let raw = r#"{"id":"1","destination":"Bali","notes":42}"#;
        assert!(serde_json::from_str::<Trip>(raw).is_err());
    }

    #[test]
    fn test_dates_serialize_as_iso() {
        let raw = r#"{"id":"1","destination":"Rome","startDate":"2024-05-01","endDate":"2024-05-03"}"#;
        let trip: Trip = serde_json::from_str(raw).unwrap();
        let written = serde_json::to_value(&trip).unwrap();
        assert_eq!(written["startDate"], "2024-05-01");
        assert_eq!(written["endDate"], "2024-05-03");
    }

    #[test]
    fn test_photo_category_parsing() {
        assert_eq!("Nature".parse::<PhotoCategory>(), Ok(PhotoCategory::Nature));
        assert!("nature".parse::<PhotoCategory>().is_err());
    }
}
