//! Headless host for the powdergrid engine
//!
//! Loads layered configuration, feeds scripted commands into a [`World`],
//! drives it on a fixed timestep and writes frames out as PNG.
//!
//! [`World`]: powdergrid_core::World

pub mod config;
pub mod render;
pub mod runner;
pub mod stats;
pub mod timer;

pub use config::{RunnerConfig, ScriptAction, ScriptedCommand};
pub use render::{DisplayMode, FrameRenderer};
pub use runner::Runner;
pub use stats::CountingStats;
pub use timer::TickTimer;
