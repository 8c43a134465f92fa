//! Runner configuration with layered loading
//!
//! Configuration is loaded from multiple sources (lowest to highest priority):
//! 1. Compiled defaults
//! 2. `powdergrid.ron` file (if exists), or the file given on the command line
//! 3. Environment variables prefixed with `POWDERGRID_`
//!
//! Command line flags are applied on top by the binary.
//!
//! Example environment variable: `POWDERGRID_GRID__RULES__SLEEP_THRESHOLD=80`

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use config::{Config, Environment, File, FileFormat};
use powdergrid_core::{Command, GridConfig, ParticleType};
use serde::{Deserialize, Serialize};

use crate::render::DisplayMode;

/// Main runner configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Grid size, ambient temperature and rule tuning
    pub grid: GridConfig,
    /// Ticks to simulate
    pub ticks: u64,
    /// Seed for the simulation RNG
    pub seed: u64,
    /// Seconds per tick in realtime mode
    pub tick_seconds: f32,
    /// Pace ticks against the wall clock instead of running flat out
    pub realtime: bool,
    /// Log a summary every this many ticks (0 disables)
    pub summary_interval: u64,
    /// RON file whose templates replace entries of the built-in table
    pub materials: Option<PathBuf>,
    /// Where to write the final frame
    pub snapshot: Option<PathBuf>,
    pub display: DisplayMode,
    /// Interactions to feed in, standing in for pointer input
    pub script: Vec<ScriptedCommand>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            grid: GridConfig::default(),
            ticks: 600,
            seed: 0,
            tick_seconds: 1.0 / 60.0,
            realtime: false,
            summary_interval: 120,
            materials: None,
            snapshot: None,
            display: DisplayMode::Default,
            script: Vec::new(),
        }
    }
}

/// What a scripted entry does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScriptAction {
    Spawn,
    Kill,
}

/// One interaction, applied at the start of `tick`
///
/// The engine holds one command per tick, so of several entries sharing a
/// tick only the last one takes effect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptedCommand {
    pub tick: u64,
    pub action: ScriptAction,
    /// Required for spawns
    #[serde(default)]
    pub particle: Option<ParticleType>,
    pub x: i32,
    pub y: i32,
    #[serde(default)]
    pub radius: u32,
}

impl ScriptedCommand {
    pub fn to_command(&self) -> Result<Command> {
        match (self.action, self.particle) {
            (ScriptAction::Spawn, Some(particle)) if !particle.is_none() => {
                Ok(Command::spawn(particle, self.x, self.y, self.radius))
            }
            (ScriptAction::Spawn, _) => bail!(
                "scripted spawn at tick {} needs a particle type",
                self.tick
            ),
            (ScriptAction::Kill, _) => Ok(Command::kill(self.x, self.y, self.radius)),
        }
    }
}

impl RunnerConfig {
    /// Load configuration with layered priority:
    /// 1. Compiled defaults (lowest priority)
    /// 2. `path`, or `powdergrid.ron` if it exists
    /// 3. Environment variables prefixed with `POWDERGRID_` (highest priority)
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(path) => File::from(path).format(FileFormat::Ron).required(true),
            None => File::with_name("powdergrid")
                .format(FileFormat::Ron)
                .required(false),
        };

        let builder = Config::builder()
            // Layer 1: Compiled defaults
            .set_default("grid.width", 160_i64)?
            .set_default("grid.height", 120_i64)?
            .set_default("grid.ambient_temperature", 20_i64)?
            .set_default("ticks", 600_i64)?
            .set_default("seed", 0_i64)?
            .set_default("tick_seconds", 1.0 / 60.0)?
            .set_default("realtime", false)?
            .set_default("summary_interval", 120_i64)?
            // Layer 2: Config file
            .add_source(file)
            // Layer 3: Environment variables (POWDERGRID_TICKS, POWDERGRID_GRID__WIDTH, ...)
            .add_source(Environment::with_prefix("POWDERGRID").separator("__"));

        let config: Self = builder
            .build()
            .context("Failed to build configuration")?
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        config.validate()?;
        Ok(config)
    }

    /// Reject settings the runner cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.tick_seconds.is_nan() || self.tick_seconds <= 0.0 {
            bail!("tick_seconds must be positive, got {}", self.tick_seconds);
        }
        for entry in &self.script {
            entry.to_command()?;
        }
        Ok(())
    }
}
