//! Grid engine for the powdergrid falling-sand simulation
//!
//! The [`World`] owns a fixed-size grid of cells and a dense particle store,
//! and advances both one tick at a time with [`World::step`].

pub mod error;
pub mod simulation;
pub mod world;

pub use error::WorldError;
pub use powdergrid_simulation::{MaterialClass, Particle, ParticleType, PropertyTable};
pub use world::{
    CellInfo, Command, CommandKind, GridCell, GridConfig, NoopStats, RuleConfig, SimStats, World,
    WorldRng,
};
