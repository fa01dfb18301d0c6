//! Memo domain model.
//!
//! # Responsibility
//! - Define the user-authored note record with optional geotag and category.
//! - Own the persisted wire shape (`id`, `text`, `latitude`, `longitude`,
//!   `categoryId`).
//!
//! # Invariants
//! - `id` is stable and never reused for another memo.
//! - `location` is written at most once; `stamp_location` never overwrites
//!   and never stamps an invalid coordinate.
//! - Encoding fails on a non-finite coordinate instead of writing `null`.
//! - A location is decoded only when both `latitude` and `longitude` exist.

use crate::model::category::CategoryId;
use crate::model::coordinate::Coordinate;
use serde::{Deserialize, Serialize, Serializer};
use uuid::Uuid;

/// Stable identifier for a memo.
pub type MemoId = Uuid;

/// User-authored text note, optionally geotagged and categorized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "MemoWire", into = "MemoWire")]
pub struct Memo {
    pub id: MemoId,
    /// Free-form text; may span multiple lines.
    pub text: String,
    pub location: Option<Coordinate>,
    /// Soft reference into the category collection.
    pub category_id: Option<CategoryId>,
}

impl Memo {
    /// Creates a memo with a generated stable ID and no location/category.
    pub fn new(text: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4(), text)
    }

    /// Creates a memo with a caller-provided stable ID.
    pub fn with_id(id: MemoId, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            location: None,
            category_id: None,
        }
    }

    /// Builder-style category assignment.
    pub fn in_category(mut self, category_id: CategoryId) -> Self {
        self.category_id = Some(category_id);
        self
    }

    /// Returns whether the text is empty after trimming whitespace/newlines.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Sets `location` when it is still unset and `coordinate` is valid.
    ///
    /// Returns `true` when the memo was stamped by this call.
    pub fn stamp_location(&mut self, coordinate: Coordinate) -> bool {
        if self.location.is_some() || !coordinate.is_valid() {
            return false;
        }
        self.location = Some(coordinate);
        true
    }
}

/// Persisted shape: coordinate flattened into two optional keys.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MemoWire {
    id: MemoId,
    text: String,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "finite_degrees"
    )]
    latitude: Option<f64>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "finite_degrees"
    )]
    longitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    category_id: Option<CategoryId>,
}

fn finite_degrees<S: Serializer>(value: &Option<f64>, serializer: S) -> Result<S::Ok, S::Error> {
    match value {
        Some(degrees) if !degrees.is_finite() => Err(serde::ser::Error::custom(format!(
            "non-finite coordinate component `{degrees}`"
        ))),
        _ => value.serialize(serializer),
    }
}

impl From<MemoWire> for Memo {
    fn from(wire: MemoWire) -> Self {
        let location = match (wire.latitude, wire.longitude) {
            (Some(latitude), Some(longitude)) => Some(Coordinate::new(latitude, longitude)),
            _ => None,
        };
        Self {
            id: wire.id,
            text: wire.text,
            location,
            category_id: wire.category_id,
        }
    }
}

impl From<Memo> for MemoWire {
    fn from(memo: Memo) -> Self {
        Self {
            id: memo.id,
            text: memo.text,
            latitude: memo.location.map(|c| c.latitude),
            longitude: memo.location.map(|c| c.longitude),
            category_id: memo.category_id,
        }
    }
}
