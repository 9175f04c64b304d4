//! Drag gesture primitives: the per-gesture session, the reorder throttle,
//! the edge auto-scroll curve and the drop indicators.
//!
//! Everything here is plain data. Coordinates are viewport pixels as reported
//! by the UI layer.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use serde::Serialize;

/// Minimum spacing between two reorder moves within one gesture.
pub const REORDER_THROTTLE: Duration = Duration::from_millis(50);

/// Height of the auto-scroll zone at each edge of the scroll container.
pub const SCROLL_ZONE: f64 = 100.0;
/// Speed at exactly the container edge, in pixels per drag-over event.
pub const SCROLL_BASE_SPEED: f64 = 25.0;
pub const SCROLL_MAX_SPEED: f64 = 60.0;
/// Exponent of the velocity response curve.
pub const SCROLL_CURVE: f64 = 2.5;

/// Source of monotonic time for the reorder throttle.
pub trait Clock {
    fn now(&self) -> Instant;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock that only moves when told to. Clones share the same time.
#[derive(Clone, Debug)]
pub struct ManualClock {
    now: Arc<Mutex<Instant>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Arc::new(Mutex::new(Instant::now())),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        *now += by;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// State of one in-progress reorder gesture.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DragSession {
    source_index: usize,
    last_mutation: Option<Instant>,
}

impl DragSession {
    pub fn new(source_index: usize) -> Self {
        Self {
            source_index,
            last_mutation: None,
        }
    }

    /// Current index of the dragged entry.
    pub fn source_index(&self) -> usize {
        self.source_index
    }

    /// Whether the throttle window since the last move has elapsed.
    pub fn can_reposition(&self, now: Instant) -> bool {
        self.last_mutation
            .is_none_or(|last| now.saturating_duration_since(last) >= REORDER_THROTTLE)
    }

    /// Records a move of the dragged entry to `target_index`.
    pub fn record_move(&mut self, target_index: usize, now: Instant) {
        self.source_index = target_index;
        self.last_mutation = Some(now);
    }
}

/// Which half of the hovered row the pointer is in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DropIndicator {
    Above,
    Below,
}

impl DropIndicator {
    pub fn for_pointer(pointer_y: f64, bounds: ItemBounds) -> Self {
        if pointer_y < bounds.top + bounds.height / 2.0 {
            DropIndicator::Above
        } else {
            DropIndicator::Below
        }
    }

    /// CSS class the renderer puts on the hovered row.
    pub fn css_class(self) -> &'static str {
        match self {
            DropIndicator::Above => "drop-above",
            DropIndicator::Below => "drop-below",
        }
    }
}

/// Vertical bounding box of a rendered row.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ItemBounds {
    pub top: f64,
    pub height: f64,
}

/// Geometry of the scroll container at the time of an event.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ScrollMetrics {
    /// Viewport coordinate of the container's top edge.
    pub top: f64,
    pub client_height: f64,
    pub scroll_height: f64,
    pub scroll_top: f64,
}

impl ScrollMetrics {
    pub fn max_scroll_top(&self) -> f64 {
        (self.scroll_height - self.client_height).max(0.0)
    }
}

/// The scrollable region whose offset the drag gesture may drive.
pub trait ScrollContainer {
    fn metrics(&self) -> ScrollMetrics;
    fn set_scroll_top(&mut self, scroll_top: f64);
}

/// Scroll container backed by metrics reported from the browser.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Viewport {
    metrics: ScrollMetrics,
}

impl Viewport {
    pub fn new(metrics: ScrollMetrics) -> Self {
        Self { metrics }
    }

    pub fn scroll_top(&self) -> f64 {
        self.metrics.scroll_top
    }
}

impl ScrollContainer for Viewport {
    fn metrics(&self) -> ScrollMetrics {
        self.metrics
    }

    fn set_scroll_top(&mut self, scroll_top: f64) {
        self.metrics.scroll_top = scroll_top;
    }
}

fn edge_speed(depth: f64) -> f64 {
    (SCROLL_BASE_SPEED * (depth / SCROLL_ZONE).powf(SCROLL_CURVE)).min(SCROLL_MAX_SPEED)
}

/// Signed scroll velocity for a pointer at `pointer_y`.
///
/// Negative scrolls up. Zero outside both edge zones. The top zone wins when
/// the container is too short for the zones not to overlap.
pub fn scroll_velocity(pointer_y: f64, metrics: &ScrollMetrics) -> f64 {
    let into_top = metrics.top + SCROLL_ZONE - pointer_y;
    let into_bottom = pointer_y - (metrics.top + metrics.client_height - SCROLL_ZONE);
    if into_top > 0.0 {
        -edge_speed(into_top)
    } else if into_bottom > 0.0 {
        edge_speed(into_bottom)
    } else {
        0.0
    }
}

/// Scrolls `container` for a pointer at `pointer_y`.
///
/// The new offset is clamped to `[0, scroll_height - client_height]`. Returns
/// the applied offset, or `None` when the container did not move.
pub fn apply_auto_scroll<S>(container: &mut S, pointer_y: f64) -> Option<f64>
where
    S: ScrollContainer + ?Sized,
{
    let metrics = container.metrics();
    let velocity = scroll_velocity(pointer_y, &metrics);
    if velocity == 0.0 {
        return None;
    }
    let next = (metrics.scroll_top + velocity).clamp(0.0, metrics.max_scroll_top());
    if next == metrics.scroll_top {
        return None;
    }
    container.set_scroll_top(next);
    Some(next)
}
