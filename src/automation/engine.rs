//! The retry loop that drives a browser session through login, search and
//! repeated result scans until it claims a seat, is cancelled, or faults.
//!
//! The scan loop is intentionally unbounded: there is no retry cap and no
//! wall-clock timeout. The only exits are a successful claim, cooperative
//! cancellation, or a fatal fault. Cancellation is polled at pass and row
//! boundaries only; an in-flight browser call is never interrupted.

use crate::browser::{
    BrowserError, BrowserSession, Field, Locator, OptionMatch, ResultColumn, SelectField, Surface,
};
use crate::log_pipeline::LogBuffer;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Which kind of claim a successful run made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReservationKind {
    Reserve,
    Waitlist,
}

/// Terminal, non-success outcomes of a run.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The user asked the run to stop. Not a failure.
    #[error("Stopped by user")]
    Cancelled,

    /// Authentication, navigation or page-structure fault. Fatal to the run.
    #[error("{0}")]
    Fault(String),
}

impl From<BrowserError> for EngineError {
    fn from(err: BrowserError) -> Self {
        EngineError::Fault(err.to_string())
    }
}

/// Timing knobs and site cell markers for the engine.
///
/// The marker strings are the site's own action labels; they come from
/// configuration so the engine never hardcodes site text.
#[derive(Debug, Clone)]
pub struct AutomationSettings {
    /// Settle delay after submitting the login form.
    pub post_login_delay: Duration,
    /// Settle delay after submitting the search form.
    pub post_search_delay: Duration,
    /// How long to wait for a confirmation modal after a reserve click.
    pub modal_wait: Duration,
    /// Base delay between scan passes.
    pub requery_base_delay: Duration,
    /// Upper bound of the uniformly random extra delay added to each pass.
    pub requery_jitter: Duration,
    /// Substring of the seat cell that marks an open reservation action.
    pub reserve_marker: String,
    /// Substring of the waitlist cell that marks an open apply action.
    pub waitlist_marker: String,
}

impl Default for AutomationSettings {
    fn default() -> Self {
        Self {
            post_login_delay: Duration::from_millis(1500),
            post_search_delay: Duration::from_millis(800),
            modal_wait: Duration::from_millis(1500),
            requery_base_delay: Duration::from_millis(2000),
            requery_jitter: Duration::from_millis(1500),
            // The booking site's action labels.
            reserve_marker: "예약하기".to_string(),
            waitlist_marker: "신청하기".to_string(),
        }
    }
}

use super::request::{Mode, SearchRequest};

/// Drive a full automation run. The session is closed on every exit path.
pub async fn run_automation(
    session: Box<dyn BrowserSession>,
    request: &SearchRequest,
    settings: &AutomationSettings,
    log: &LogBuffer,
    cancel: &CancellationToken,
) -> Result<ReservationKind, EngineError> {
    let result = run_inner(session.as_ref(), request, settings, log, cancel).await;
    session.close().await;
    result
}

fn check_cancel(cancel: &CancellationToken) -> Result<(), EngineError> {
    if cancel.is_cancelled() {
        Err(EngineError::Cancelled)
    } else {
        Ok(())
    }
}

async fn run_inner(
    session: &dyn BrowserSession,
    request: &SearchRequest,
    settings: &AutomationSettings,
    log: &LogBuffer,
    cancel: &CancellationToken,
) -> Result<ReservationKind, EngineError> {
    debug!("phase: authenticating");
    log.append("Navigating to the login page...");
    session.navigate(Surface::Login).await?;
    session
        .fill_field(Field::LoginUserId, &request.user_id)
        .await?;
    session
        .fill_field(Field::LoginPassword, &request.password)
        .await?;
    session.click(&Locator::LoginSubmit).await?;
    tokio::time::sleep(settings.post_login_delay).await;

    check_cancel(cancel)?;

    debug!("phase: searching");
    log.append("Navigating to the schedule page...");
    session.navigate(Surface::Search).await?;

    session
        .fill_field(Field::DepartureStation, &request.departure_station)
        .await?;
    session
        .fill_field(Field::ArrivalStation, &request.arrival_station)
        .await?;

    session
        .select_option_matching(
            SelectField::DepartureDate,
            &OptionMatch::ValueEquals(request.date_compact.clone()),
        )
        .await?;

    let time_selected = session
        .select_option_matching(
            SelectField::DepartureTime,
            &OptionMatch::LabelPrefixThenValueContains(request.target_slot.clone()),
        )
        .await?;
    if time_selected {
        log.append(format!(
            "Requested time {} mapped to the {}:00 slot.",
            request.time, request.target_slot
        ));
    } else {
        log.append(format!(
            "Could not select the {}:00 time option. Proceeding with the default.",
            request.target_slot
        ));
    }

    log.append("Search conditions entered. Querying...");
    session.click(&Locator::SearchSubmit).await?;
    tokio::time::sleep(settings.post_search_delay).await;

    debug!("phase: scanning");
    let mut requery_count: u64 = 0;
    loop {
        check_cancel(cancel)?;

        let rows = session.get_rows().await?;
        if rows.is_empty() {
            log.append("No results listed. Requerying.");
        }

        for (idx, row) in rows.iter().take(request.num_to_check).enumerate() {
            check_cancel(cancel)?;
            let display_idx = idx + 1;

            // A row that can't be read (missing cell, concurrent re-render)
            // is skipped; it never aborts the pass.
            let seat_text = match session.get_cell_text(row, ResultColumn::Seat).await {
                Ok(Some(text)) => text,
                Ok(None) | Err(_) => continue,
            };
            let wait_text = match session.get_cell_text(row, ResultColumn::Waitlist).await {
                Ok(Some(text)) => text,
                Ok(None) | Err(_) => continue,
            };

            match request.mode {
                Mode::Reserve if seat_text.contains(&settings.reserve_marker) => {
                    log.append(format!("Row {}: attempting reservation", display_idx));
                    match session
                        .click(&Locator::RowAction(*row, ResultColumn::Seat))
                        .await
                    {
                        Ok(()) => {}
                        Err(e) => {
                            log.append(format!("Error during reservation attempt: {}", e));
                            continue;
                        }
                    }

                    if let Some(text) = session.wait_for_modal(settings.modal_wait).await {
                        log.append(format!("Alert: {}", text));
                        let _ = session.accept_modal().await;
                    }

                    if session
                        .element_exists(&Locator::ReservationConfirmedMarker)
                        .await
                    {
                        log.append("Reservation succeeded! Moved to the payment screen.");
                        return Ok(ReservationKind::Reserve);
                    }
                    log.append("No seats left. Returning to the results.");
                    session.go_back().await?;
                }
                Mode::Waitlist if wait_text.contains(&settings.waitlist_marker) => {
                    log.append(format!("Row {}: applying for the waitlist", display_idx));
                    match session
                        .click(&Locator::RowAction(*row, ResultColumn::Waitlist))
                        .await
                    {
                        Ok(()) => {
                            log.append("Waitlist application submitted!");
                            return Ok(ReservationKind::Waitlist);
                        }
                        Err(e) => {
                            log.append(format!("Error during waitlist attempt: {}", e));
                        }
                    }
                }
                _ => {}
            }
        }

        debug!("phase: requerying");
        requery_count += 1;
        log.append(format!("Requery {}", requery_count));
        // Requery click failures are not fatal; the next pass retries.
        let _ = session.click(&Locator::SearchSubmit).await;

        let jitter_ms = settings.requery_jitter.as_millis() as u64;
        let extra = if jitter_ms > 0 {
            rand::rng().random_range(0..jitter_ms)
        } else {
            0
        };
        tokio::time::sleep(settings.requery_base_delay + Duration::from_millis(extra)).await;
    }
}
