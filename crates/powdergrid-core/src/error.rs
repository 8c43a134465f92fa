//! Engine errors

use powdergrid_simulation::TableError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WorldError {
    #[error("grid dimensions must be positive, got {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error(transparent)]
    Table(#[from] TableError),

    /// A particle without a material class reached the rule engine
    #[error("particle {particle_type:?} in slot {slot} has no material class")]
    UnknownMaterial {
        slot: usize,
        particle_type: powdergrid_simulation::ParticleType,
    },

    #[error("grid invariant violated: {0}")]
    InvariantViolation(String),
}
