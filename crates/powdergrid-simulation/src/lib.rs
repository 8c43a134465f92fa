//! Particle property data for powdergrid
//!
//! This crate provides the read-only inputs of the grid engine:
//! - Particle kinds and coarse material classes (ParticleType, MaterialClass)
//! - Per-type physical templates (ParticleTemplate)
//! - The validated lookup table the engine consumes (PropertyTable)
//! - The particle record itself (Particle)

mod error;
mod materials;
mod particle;

pub use error::TableError;
pub use materials::{MaterialClass, ParticleTemplate, ParticleType, PropertyTable};
pub use particle::{Color, Particle};
