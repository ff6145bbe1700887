//! `sim` — Event generator: hadronic taus, jets, soft activity, event logs.

pub mod eventlog;
pub mod generator;
pub mod scenarios;

pub use eventlog::{load_event_log, save_event_log, EventLog};
pub use generator::{EventGenerator, GeneratedEvent};
pub use scenarios::{Scenario, ScenarioKind};
