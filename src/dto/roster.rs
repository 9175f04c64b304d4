//! DTOs rendered on the broker roster page and returned by the drag API.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::drag::{Clock, DropIndicator};
use crate::services::roster::RosterController;

/// One rendered roster row.
#[derive(Debug, Serialize)]
pub struct RosterRow {
    pub index: usize,
    /// 1-based rank shown next to the row.
    pub rank: usize,
    pub key: String,
    pub id: i64,
    pub name: String,
    pub phone: String,
    pub bio: String,
    pub years_experience: i32,
    pub photo: Option<String>,
    pub rating: Option<f64>,
    pub dragging: bool,
    /// CSS class of the drop indicator on this row.
    pub indicator: Option<&'static str>,
}

/// State of the roster as seen by the renderer.
#[derive(Debug, Serialize)]
pub struct RosterView {
    pub rows: Vec<RosterRow>,
    pub dirty: bool,
    pub busy: bool,
    pub saved_recently: bool,
}

impl RosterView {
    pub fn from_controller<C: Clock>(controller: &RosterController<C>, now: DateTime<Utc>) -> Self {
        let dragging = controller.dragging_index();
        let hover = controller.hover();
        let rows = controller
            .current()
            .entries()
            .iter()
            .enumerate()
            .map(|(index, entry)| RosterRow {
                index,
                rank: index + 1,
                key: entry.key.to_string(),
                id: entry.makler.id.get(),
                name: entry.makler.name.clone(),
                phone: entry.makler.phone.clone(),
                bio: entry.makler.bio.clone(),
                years_experience: entry.makler.years_experience,
                photo: entry.makler.photo.clone(),
                rating: entry.makler.rating,
                dragging: dragging == Some(index),
                indicator: hover
                    .filter(|marker| marker.index == index)
                    .map(|marker| marker.indicator.css_class()),
            })
            .collect();

        Self {
            rows,
            dirty: controller.is_dirty(),
            busy: controller.is_busy(),
            saved_recently: controller.notice(now).is_some(),
        }
    }
}

/// Response of the drag-over endpoint.
#[derive(Debug, Serialize)]
pub struct DragOverResponse {
    #[serde(flatten)]
    pub roster: RosterView,
    pub moved: bool,
    /// Scroll offset the browser should apply.
    pub scroll_top: f64,
    pub indicator: Option<DropIndicator>,
}

/// Response of the drag-scroll endpoint.
#[derive(Debug, Serialize)]
pub struct DragScrollResponse {
    pub scrolled: bool,
    pub scroll_top: f64,
}

/// Error body of the JSON endpoints.
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: String,
}

impl ApiError {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
