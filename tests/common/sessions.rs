//! Scripted browser sessions for end-to-end tests
//!
//! Real runs drive an external browser; tests drive a scripted session whose
//! behavior is chosen per test server.

use async_trait::async_trait;
use autoreserve_server::browser::{
    BrowserError, BrowserSession, Field, Locator, OptionMatch, ResultColumn, RowHandle,
    SelectField, SessionProvider, Surface,
};
use std::time::Duration;

/// Markers the scripted sessions expose; the test server config uses the same.
pub const RESERVE_MARKER: &str = "Reserve";
pub const WAITLIST_MARKER: &str = "Apply";

/// What the scripted session does when the engine scans results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionScript {
    /// One row with an open seat; the reserve click confirms immediately.
    InstantReserve,
    /// One row with an open waitlist cell; the apply click succeeds.
    InstantWaitlist,
    /// The result list stays empty, so the run only ends when stopped.
    NeverClaim,
    /// Session creation fails, as when no driver is configured.
    Unavailable,
}

struct ScriptedSession {
    script: SessionScript,
}

#[async_trait]
impl BrowserSession for ScriptedSession {
    async fn navigate(&self, _surface: Surface) -> Result<(), BrowserError> {
        Ok(())
    }

    async fn fill_field(&self, _field: Field, _value: &str) -> Result<(), BrowserError> {
        Ok(())
    }

    async fn select_option_matching(
        &self,
        _field: SelectField,
        _predicate: &OptionMatch,
    ) -> Result<bool, BrowserError> {
        Ok(true)
    }

    async fn click(&self, _locator: &Locator) -> Result<(), BrowserError> {
        Ok(())
    }

    async fn get_rows(&self) -> Result<Vec<RowHandle>, BrowserError> {
        Ok(match self.script {
            SessionScript::NeverClaim => vec![],
            _ => vec![RowHandle(0)],
        })
    }

    async fn get_cell_text(
        &self,
        _row: &RowHandle,
        column: ResultColumn,
    ) -> Result<Option<String>, BrowserError> {
        let text = match (self.script, column) {
            (SessionScript::InstantReserve, ResultColumn::Seat) => RESERVE_MARKER,
            (SessionScript::InstantWaitlist, ResultColumn::Waitlist) => WAITLIST_MARKER,
            _ => "-",
        };
        Ok(Some(text.to_string()))
    }

    async fn wait_for_modal(&self, _timeout: Duration) -> Option<String> {
        None
    }

    async fn accept_modal(&self) -> Result<(), BrowserError> {
        Ok(())
    }

    async fn element_exists(&self, locator: &Locator) -> bool {
        matches!(locator, Locator::ReservationConfirmedMarker)
            && self.script == SessionScript::InstantReserve
    }

    async fn go_back(&self) -> Result<(), BrowserError> {
        Ok(())
    }

    async fn close(&self) {}
}

pub struct ScriptedProvider {
    pub script: SessionScript,
}

#[async_trait]
impl SessionProvider for ScriptedProvider {
    async fn create(&self, _headless: bool) -> Result<Box<dyn BrowserSession>, BrowserError> {
        match self.script {
            SessionScript::Unavailable => Err(BrowserError::SessionUnavailable(
                "no driver in test".to_string(),
            )),
            script => Ok(Box::new(ScriptedSession { script })),
        }
    }
}
