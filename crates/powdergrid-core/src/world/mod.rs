//! World management - grid bookkeeping, commands and the per-tick stepper

mod ca_update;
mod chemistry_system;
pub mod command;
mod factory;
pub mod grid_config;
mod neighbor_queries;
mod particle_store;
mod row_scheduler;
pub mod rng_trait;
mod sim_context;
pub mod spatial_index;
pub mod stats;
#[cfg(test)]
pub(crate) mod test_support;
#[allow(clippy::module_inception)]
mod world;

pub use ca_update::{CellularAutomataUpdater, MoveOutcome, SwapRule};
pub use chemistry_system::ChemistrySystem;
pub use command::{BrushCache, Command, CommandBuffer, CommandKind};
pub use factory::ParticleFactory;
pub use grid_config::{GridConfig, RuleConfig};
pub use neighbor_queries::{Neighbor, Neighborhood};
pub use particle_store::ParticleStore;
pub use row_scheduler::{RowOrder, RowScheduler};
pub use rng_trait::WorldRng;
pub use sim_context::SimContext;
pub use spatial_index::{CellQuery, GridCell, SpatialIndex};
pub use stats::{NoopStats, SimStats};
pub use world::{CellInfo, World};
