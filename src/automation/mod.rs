mod engine;
mod request;

pub use engine::{run_automation, AutomationSettings, EngineError, ReservationKind};
pub use request::{Mode, SearchRequest, StartParams};
