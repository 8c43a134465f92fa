//! Simulation statistics collection trait

/// Trait for collecting simulation statistics
///
/// Lets the engine report what happened during a step without owning the
/// counters; the host decides what to keep.
pub trait SimStats {
    /// A particle moved into an empty cell
    fn record_particle_moved(&mut self);

    /// Two particles exchanged cells by density
    fn record_swap(&mut self);

    /// A particle changed type (melting, boiling, ignition, ...)
    fn record_state_change(&mut self);

    /// Acid dissolved a neighbor or water put out a heat source
    fn record_reaction(&mut self);

    fn record_spawn(&mut self);

    fn record_removal(&mut self);
}

/// A no-op implementation for when stats collection is not needed
#[derive(Default)]
pub struct NoopStats;

impl SimStats for NoopStats {
    fn record_particle_moved(&mut self) {}
    fn record_swap(&mut self) {}
    fn record_state_change(&mut self) {}
    fn record_reaction(&mut self) {}
    fn record_spawn(&mut self) {}
    fn record_removal(&mut self) {}
}
