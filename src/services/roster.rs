//! Reorderable broker list controller.
//!
//! Holds the working order (`current`), the last server-confirmed order
//! (`last_saved`) and the state of an in-progress drag gesture. All list
//! mutation is synchronous; network round trips are split into a `begin_*`
//! step that snapshots what the request needs and a `complete_*` step that
//! applies the response, so the caller never holds the controller across an
//! await point.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::domain::drag::{
    Clock, DragSession, DropIndicator, ItemBounds, ScrollContainer, SystemClock, apply_auto_scroll,
};
use crate::domain::makler::{Makler, ReorderPayload};
use crate::domain::roster::OrderedRoster;
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{CredentialProvider, RosterReader, RosterWriter};
use crate::services::{ServiceError, ServiceResult};

/// How long the "saved" notice stays visible.
pub const SAVE_NOTICE_TTL: TimeDelta = TimeDelta::seconds(3);

/// A drag-over event forwarded by the UI layer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragOver {
    pub target_index: usize,
    /// Pointer position in viewport coordinates.
    pub pointer_y: f64,
    pub target_bounds: ItemBounds,
}

/// What a drag-over event changed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct DragOverOutcome {
    pub moved: bool,
    /// New scroll offset when auto-scroll moved the container.
    pub scroll_top: Option<f64>,
    pub indicator: Option<DropIndicator>,
}

/// Row currently hovered by the dragged entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct HoverMarker {
    pub index: usize,
    pub indicator: DropIndicator,
}

/// Transient confirmation shown after a successful save.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct SaveNotice {
    pub saved_at: DateTime<Utc>,
}

impl SaveNotice {
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        now - self.saved_at < SAVE_NOTICE_TTL
    }
}

/// The positions were accepted but re-reading the roster failed.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("positions saved, but reloading the roster failed: {0}")]
pub struct RefreshAfterSaveError(pub String);

#[derive(Debug, PartialEq)]
pub struct SaveOutcome {
    /// Number of positions the service accepted.
    pub submitted: usize,
    /// Set when the view may be stale after the save.
    pub refresh_error: Option<RefreshAfterSaveError>,
}

/// Everything a roster fetch needs.
#[derive(Debug)]
pub struct LoadTicket {
    pub token: String,
}

/// Everything a reorder submit needs, captured when the save started.
///
/// The controller reports busy for as long as the ticket is alive. Dropping
/// it without completing the save clears the flag.
#[derive(Debug)]
pub struct SaveTicket {
    pub token: String,
    pub payload: ReorderPayload,
    snapshot: OrderedRoster,
    _in_flight: InFlight,
}

/// Holds the controller's busy flag raised until dropped.
#[derive(Debug)]
struct InFlight(Arc<AtomicBool>);

impl InFlight {
    fn raise(flag: &Arc<AtomicBool>) -> Self {
        flag.store(true, Ordering::SeqCst);
        Self(Arc::clone(flag))
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

pub struct RosterController<C = SystemClock> {
    current: OrderedRoster,
    last_saved: OrderedRoster,
    dirty: bool,
    drag: Option<DragSession>,
    hover: Option<HoverMarker>,
    saving: Arc<AtomicBool>,
    notice: Option<SaveNotice>,
    closed: bool,
    credentials: Arc<dyn CredentialProvider>,
    clock: C,
}

impl RosterController<SystemClock> {
    pub fn new(credentials: Arc<dyn CredentialProvider>) -> Self {
        Self::with_clock(credentials, SystemClock)
    }
}

impl<C: Clock> RosterController<C> {
    pub fn with_clock(credentials: Arc<dyn CredentialProvider>, clock: C) -> Self {
        Self {
            current: OrderedRoster::default(),
            last_saved: OrderedRoster::default(),
            dirty: false,
            drag: None,
            hover: None,
            saving: Arc::new(AtomicBool::new(false)),
            notice: None,
            closed: false,
            credentials,
            clock,
        }
    }

    pub fn current(&self) -> &OrderedRoster {
        &self.current
    }

    pub fn last_saved(&self) -> &OrderedRoster {
        &self.last_saved
    }

    /// Whether the working order differs from the last confirmed one.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Whether a save is in flight.
    pub fn is_busy(&self) -> bool {
        self.saving.load(Ordering::SeqCst)
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn drag_session(&self) -> Option<&DragSession> {
        self.drag.as_ref()
    }

    /// Index of the row being dragged.
    pub fn dragging_index(&self) -> Option<usize> {
        self.drag.map(|session| session.source_index())
    }

    pub fn hover(&self) -> Option<HoverMarker> {
        self.hover
    }

    /// The success notice, while it is still visible at `now`.
    pub fn notice(&self, now: DateTime<Utc>) -> Option<SaveNotice> {
        self.notice.filter(|notice| notice.is_active(now))
    }

    /// Reads the bearer token; every request calls this first.
    pub fn credential(&self) -> ServiceResult<String> {
        self.credentials.token().ok_or(ServiceError::AuthMissing)
    }

    pub fn begin_load(&self) -> ServiceResult<LoadTicket> {
        if self.closed {
            return Err(ServiceError::Closed);
        }
        Ok(LoadTicket {
            token: self.credential()?,
        })
    }

    /// Applies a roster fetch. On success both lists become the deduplicated
    /// response; on failure nothing changes.
    pub fn complete_load(
        &mut self,
        result: RepositoryResult<Vec<Makler>>,
    ) -> ServiceResult<usize> {
        if self.closed {
            return Err(ServiceError::Closed);
        }
        let records = result.map_err(ServiceError::from_load)?;
        Ok(self.replace_all(records))
    }

    /// Loads the roster when the controller is owned by a single caller.
    pub async fn load<R>(&mut self, repo: &R) -> ServiceResult<usize>
    where
        R: RosterReader + ?Sized,
    {
        let ticket = self.begin_load()?;
        let result = repo.fetch_roster(&ticket.token).await;
        self.complete_load(result)
    }

    /// Opens a drag session for the row at `source_index`.
    pub fn begin_drag(&mut self, source_index: usize) -> ServiceResult<()> {
        if self.closed {
            return Err(ServiceError::Closed);
        }
        if source_index >= self.current.len() {
            return Err(ServiceError::Form(format!(
                "row {source_index} does not exist"
            )));
        }
        self.drag = Some(DragSession::new(source_index));
        self.hover = None;
        Ok(())
    }

    /// Handles the pointer hovering row `event.target_index`.
    ///
    /// Moves the dragged entry there when the throttle window allows it,
    /// auto-scrolls `container` on every call and records the drop indicator.
    /// A no-op without an open session or when hovering the dragged row.
    pub fn drag_over<S>(&mut self, event: DragOver, container: &mut S) -> DragOverOutcome
    where
        S: ScrollContainer + ?Sized,
    {
        let Some(mut session) = self.drag else {
            return DragOverOutcome::default();
        };
        if event.target_index == session.source_index() || event.target_index >= self.current.len()
        {
            return DragOverOutcome::default();
        }

        let mut outcome = DragOverOutcome::default();
        let now = self.clock.now();
        if session.can_reposition(now)
            && self
                .current
                .move_entry(session.source_index(), event.target_index)
        {
            session.record_move(event.target_index, now);
            self.drag = Some(session);
            self.refresh_dirty();
            outcome.moved = true;
        }

        outcome.scroll_top = apply_auto_scroll(container, event.pointer_y);

        let indicator = DropIndicator::for_pointer(event.pointer_y, event.target_bounds);
        self.hover = Some(HoverMarker {
            index: event.target_index,
            indicator,
        });
        outcome.indicator = Some(indicator);
        outcome
    }

    /// Auto-scrolls `container` for a pointer that is not over any row, such
    /// as one held past the container edge. Only acts while a session is open;
    /// the order and the hover marker are left alone.
    pub fn drag_scroll<S>(&mut self, pointer_y: f64, container: &mut S) -> Option<f64>
    where
        S: ScrollContainer + ?Sized,
    {
        self.drag?;
        apply_auto_scroll(container, pointer_y)
    }

    /// Closes the drag session and clears every drag marker.
    pub fn end_drag(&mut self) {
        self.drag = None;
        self.hover = None;
    }

    /// Drop ends the gesture; the move already happened during drag-over.
    pub fn drop_on_target(&mut self) {
        self.end_drag();
    }

    /// Snapshots the order to submit.
    ///
    /// Returns `Ok(None)` when there is nothing to persist and
    /// [`ServiceError::Busy`] while another save is in flight.
    pub fn begin_save(&mut self) -> ServiceResult<Option<SaveTicket>> {
        if self.closed {
            return Err(ServiceError::Closed);
        }
        if self.is_busy() {
            return Err(ServiceError::Busy);
        }
        if !self.dirty {
            return Ok(None);
        }
        let token = self.credential()?;
        Ok(Some(SaveTicket {
            token,
            payload: self.current.position_payload(),
            snapshot: self.current.clone(),
            _in_flight: InFlight::raise(&self.saving),
        }))
    }

    /// Records a rejected submit. The working order and dirty flag stay as
    /// they are so the operator can retry.
    pub fn fail_save(&mut self, ticket: SaveTicket, err: RepositoryError) -> ServiceError {
        drop(ticket);
        if self.closed {
            return ServiceError::Closed;
        }
        ServiceError::from_save(err)
    }

    /// Applies the roster re-read after an accepted submit.
    pub fn complete_save(
        &mut self,
        ticket: SaveTicket,
        refreshed: RepositoryResult<Vec<Makler>>,
    ) -> ServiceResult<SaveOutcome> {
        let SaveTicket { payload, snapshot, .. } = ticket;
        if self.closed {
            return Err(ServiceError::Closed);
        }
        let submitted = payload.len();
        let refresh_error = match refreshed {
            Ok(records) => {
                self.replace_all(records);
                None
            }
            Err(err) => {
                self.last_saved = snapshot;
                self.refresh_dirty();
                Some(RefreshAfterSaveError(err.to_string()))
            }
        };
        self.notice = Some(SaveNotice {
            saved_at: Utc::now(),
        });
        Ok(SaveOutcome {
            submitted,
            refresh_error,
        })
    }

    /// Persists the order when the controller is owned by a single caller.
    pub async fn save<R>(&mut self, repo: &R) -> ServiceResult<Option<SaveOutcome>>
    where
        R: RosterReader + RosterWriter + ?Sized,
    {
        let Some(ticket) = self.begin_save()? else {
            return Ok(None);
        };
        if let Err(err) = repo.submit_positions(&ticket.token, &ticket.payload).await {
            return Err(self.fail_save(ticket, err));
        }
        let refreshed = match self.credential() {
            Ok(token) => repo.fetch_roster(&token).await,
            Err(_) => Err(RepositoryError::AuthMissing),
        };
        self.complete_save(ticket, refreshed).map(Some)
    }

    /// Stops all observable effects. Responses arriving later are discarded.
    pub fn teardown(&mut self) {
        self.closed = true;
        self.end_drag();
        self.notice = None;
    }

    fn replace_all(&mut self, records: Vec<Makler>) -> usize {
        let (roster, dropped) = OrderedRoster::from_records(records);
        if dropped > 0 {
            log::warn!("Dropped {dropped} duplicate broker records");
        }
        self.last_saved = roster.clone();
        self.current = roster;
        self.dirty = false;
        self.end_drag();
        self.current.len()
    }

    fn refresh_dirty(&mut self) {
        self.dirty = !self.current.same_order(&self.last_saved);
    }
}
