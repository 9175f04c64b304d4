use serde::{Deserialize, Serialize};

use crate::domain::types::{MaklerId, Position};

/// Broker record as returned by the roster service.
///
/// Everything except `id` is presentation data; the roster order is carried by
/// the record's index, never by a field.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Makler {
    pub id: MaklerId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub bio: String,
    #[serde(rename = "expiriense", default)]
    pub years_experience: i32,
    #[serde(default)]
    pub photo: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
}

impl Makler {
    /// Builds a record carrying only the identifier and a display name.
    pub fn new(id: MaklerId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            phone: String::new(),
            bio: String::new(),
            years_experience: 0,
            photo: None,
            rating: None,
        }
    }
}

/// One entry of the reorder request body.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PositionAssignment {
    pub makler_id: MaklerId,
    pub position: Position,
}

/// Body of the reorder submit request.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReorderPayload {
    pub positions: Vec<PositionAssignment>,
}

impl ReorderPayload {
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Identifiers in submitted rank order.
    pub fn ids(&self) -> Vec<MaklerId> {
        self.positions.iter().map(|p| p.makler_id).collect()
    }
}
