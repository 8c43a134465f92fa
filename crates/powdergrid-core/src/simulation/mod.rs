//! Material rules that go beyond movement

mod state_changes;
mod temperature;

pub use state_changes::{StateChange, StateChangeSystem};
pub use temperature::TemperatureSimulator;
