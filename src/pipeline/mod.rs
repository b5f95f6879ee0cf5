//! Pipeline orchestration
//!
//! This module drives the per-unit state machine (accumulate → normalize →
//! transcribe → extract → enrich → respond) and owns temporary-resource
//! lifetime. One `Pipeline` is shared by the whole process; one `Session`
//! exists per transport connection.

mod session;
mod state;

pub use session::{Pipeline, Session, UnitOutcome};
pub use state::{PipelineState, SessionStats, UnitFailure, UnitResponse};
