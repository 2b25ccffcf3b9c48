//! Abstract browser-session capability consumed by the automation engine.
//!
//! The engine only speaks in semantic operations (surfaces, fields, row
//! cells); concrete URLs, selectors and DOM quirks belong to the driver
//! implementing [`BrowserSession`]. Drivers are external collaborators; the
//! crate only ships [`NoopSessionProvider`] so the server can run without
//! one configured.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Errors surfaced by a browser driver.
#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("Navigation failed: {0}")]
    Navigation(String),

    #[error("Element not found: {0}")]
    ElementNotFound(String),

    #[error("Stale element: the page re-rendered underneath us")]
    Stale,

    #[error("Interaction failed: {0}")]
    Interaction(String),

    #[error("Session could not be created: {0}")]
    SessionUnavailable(String),
}

/// Top-level pages the engine navigates between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    Login,
    Search,
}

/// Plain-text input fields the engine fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    LoginUserId,
    LoginPassword,
    DepartureStation,
    ArrivalStation,
}

/// Dropdowns whose option the engine picks by predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectField {
    DepartureDate,
    DepartureTime,
}

/// How to pick an option within a select field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionMatch {
    /// Option whose underlying value equals the string exactly.
    ValueEquals(String),
    /// Option whose visible label starts with the string; if none, fall back
    /// to an option whose underlying value contains it.
    LabelPrefixThenValueContains(String),
}

/// Columns of a result row the engine inspects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultColumn {
    /// Seat-availability cell; carries the reserve action when open.
    Seat,
    /// Waitlist cell; carries the apply action when open.
    Waitlist,
}

/// Opaque handle to a result row, valid until the page re-renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowHandle(pub usize);

/// Things the engine clicks or probes for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Locator {
    LoginSubmit,
    SearchSubmit,
    /// The action link inside a result row's cell.
    RowAction(RowHandle, ResultColumn),
    /// Element only present on the post-reservation confirmation surface.
    ReservationConfirmedMarker,
}

/// A live browser session against the booking site.
///
/// All methods may suspend on network or DOM waits; none of them observe
/// cancellation — the engine checks its token between calls.
#[async_trait]
pub trait BrowserSession: Send + Sync {
    async fn navigate(&self, surface: Surface) -> Result<(), BrowserError>;

    async fn fill_field(&self, field: Field, value: &str) -> Result<(), BrowserError>;

    /// Pick an option in a select field. `Ok(false)` means no option matched
    /// the predicate and the field keeps its default selection.
    async fn select_option_matching(
        &self,
        field: SelectField,
        predicate: &OptionMatch,
    ) -> Result<bool, BrowserError>;

    async fn click(&self, locator: &Locator) -> Result<(), BrowserError>;

    /// Handles to the currently listed result rows, in presentation order.
    async fn get_rows(&self) -> Result<Vec<RowHandle>, BrowserError>;

    /// Text of one cell of a result row. `Ok(None)` when the cell is absent;
    /// `Err(Stale)` when the row vanished under a concurrent re-render. Both
    /// are recoverable per-row conditions for the caller.
    async fn get_cell_text(
        &self,
        row: &RowHandle,
        column: ResultColumn,
    ) -> Result<Option<String>, BrowserError>;

    /// Wait up to `timeout` for a modal dialog; returns its text if one
    /// appeared. Absence of a modal is not an error.
    async fn wait_for_modal(&self, timeout: Duration) -> Option<String>;

    async fn accept_modal(&self) -> Result<(), BrowserError>;

    async fn element_exists(&self, locator: &Locator) -> bool;

    async fn go_back(&self) -> Result<(), BrowserError>;

    /// Tear the session down. Called on every exit path.
    async fn close(&self);
}

/// Factory for browser sessions; one session is created per run.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    async fn create(&self, headless: bool) -> Result<Box<dyn BrowserSession>, BrowserError>;
}

/// Provider used when no real driver is wired in; every run fails fast with
/// a session fault instead of hanging.
pub struct NoopSessionProvider;

#[async_trait]
impl SessionProvider for NoopSessionProvider {
    async fn create(&self, _headless: bool) -> Result<Box<dyn BrowserSession>, BrowserError> {
        Err(BrowserError::SessionUnavailable(
            "no browser driver configured".to_string(),
        ))
    }
}
