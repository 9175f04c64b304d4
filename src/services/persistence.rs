//! Load and save workflows for a controller shared between request handlers.
//!
//! The controller lock is only taken to hand out a ticket and to apply the
//! response; it is never held while a request is in flight.

use std::sync::{Mutex, MutexGuard};

use crate::domain::drag::{Clock, SystemClock};
use crate::repository::errors::RepositoryError;
use crate::repository::{RosterReader, RosterWriter};
use crate::services::roster::{RosterController, SaveOutcome};
use crate::services::{ServiceError, ServiceResult};

/// Controller shared by the HTTP handlers.
pub type SharedRoster<C = SystemClock> = Mutex<RosterController<C>>;

/// Locks the shared controller.
pub fn lock_roster<C>(
    roster: &SharedRoster<C>,
) -> ServiceResult<MutexGuard<'_, RosterController<C>>> {
    roster
        .lock()
        .map_err(|_| ServiceError::Internal("roster state lock poisoned".to_string()))
}

/// Fetches the roster and replaces the working and saved order with it.
///
/// Returns the number of brokers after deduplication.
pub async fn load_roster<R, C>(repo: &R, roster: &SharedRoster<C>) -> ServiceResult<usize>
where
    R: RosterReader + ?Sized,
    C: Clock,
{
    let ticket = lock_roster(roster)?.begin_load()?;

    let result = repo.fetch_roster(&ticket.token).await;

    let loaded = lock_roster(roster)?.complete_load(result).map_err(|err| {
        log::error!("Failed to load brokers: {err}");
        err
    })?;
    log::info!("Loaded {loaded} brokers");
    Ok(loaded)
}

/// Submits the working order and re-reads the roster.
///
/// `Ok(None)` means there was nothing to save.
pub async fn save_roster<R, C>(
    repo: &R,
    roster: &SharedRoster<C>,
) -> ServiceResult<Option<SaveOutcome>>
where
    R: RosterReader + RosterWriter + ?Sized,
    C: Clock,
{
    let Some(ticket) = lock_roster(roster)?.begin_save()? else {
        return Ok(None);
    };

    if let Err(err) = repo.submit_positions(&ticket.token, &ticket.payload).await {
        log::error!("Failed to submit broker positions: {err}");
        return Err(lock_roster(roster)?.fail_save(ticket, err));
    }

    let token = lock_roster(roster)?.credential();
    let refreshed = match token {
        Ok(token) => repo.fetch_roster(&token).await,
        Err(_) => Err(RepositoryError::AuthMissing),
    };

    let outcome = lock_roster(roster)?.complete_save(ticket, refreshed)?;
    match &outcome.refresh_error {
        Some(warning) => log::warn!("{warning}"),
        None => log::info!("Saved positions of {} brokers", outcome.submitted),
    }
    Ok(Some(outcome))
}
