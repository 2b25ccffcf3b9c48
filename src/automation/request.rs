//! Request model for one automation run.

use crate::slot::even_hour_bucket;
use serde::{Deserialize, Serialize};

/// What the run should claim when it finds an open row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Reserve,
    Waitlist,
}

/// Wire-level start parameters, as posted to `/start`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartParams {
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub departure_station: String,
    #[serde(default)]
    pub arrival_station: String,
    /// `YYYY-MM-DD`
    #[serde(default)]
    pub date: String,
    /// `HH:mm`
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub num_to_check: usize,
    #[serde(default)]
    pub mode: Mode,
    #[serde(default)]
    pub headless: bool,
}

/// How many result rows a pass scans when the caller doesn't say.
const DEFAULT_NUM_TO_CHECK: usize = 3;

/// Validated, immutable parameters for an admitted run.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub user_id: String,
    pub password: String,
    pub departure_station: String,
    pub arrival_station: String,
    /// `YYYY-MM-DD` as entered.
    pub date: String,
    /// `YYYYMMDD`, the form the site's date options use as values.
    pub date_compact: String,
    /// `HH:mm` as entered.
    pub time: String,
    /// Even-hour slot label derived from `time`.
    pub target_slot: String,
    pub num_to_check: usize,
    pub mode: Mode,
    pub headless: bool,
}

impl SearchRequest {
    /// Validate start parameters and derive the computed fields.
    ///
    /// Validation never partially admits: the first failing check rejects the
    /// whole request with a user-correctable message.
    pub fn validate(params: StartParams) -> Result<SearchRequest, String> {
        if params.user_id.trim().is_empty() || params.password.is_empty() {
            return Err("User ID and password are required.".to_string());
        }
        if params.departure_station.trim().is_empty() || params.arrival_station.trim().is_empty() {
            return Err("Departure and arrival stations are required.".to_string());
        }
        if params.departure_station == params.arrival_station {
            return Err("Departure and arrival stations must differ.".to_string());
        }
        if params.date.trim().is_empty() || params.time.trim().is_empty() {
            return Err("Departure date and time are required.".to_string());
        }

        let num_to_check = if params.num_to_check == 0 {
            DEFAULT_NUM_TO_CHECK
        } else {
            params.num_to_check
        };

        let target_slot = even_hour_bucket(&params.time);
        let date_compact = params.date.replace('-', "");

        Ok(SearchRequest {
            user_id: params.user_id.trim().to_string(),
            password: params.password,
            departure_station: params.departure_station,
            arrival_station: params.arrival_station,
            date: params.date,
            date_compact,
            time: params.time,
            target_slot,
            num_to_check,
            mode: params.mode,
            headless: params.headless,
        })
    }
}
