//! Run statistics

use powdergrid_core::SimStats;

/// Counts everything the engine reports over a run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CountingStats {
    pub moves: u64,
    pub swaps: u64,
    pub state_changes: u64,
    pub reactions: u64,
    pub spawns: u64,
    pub removals: u64,
}

impl SimStats for CountingStats {
    fn record_particle_moved(&mut self) {
        self.moves += 1;
    }

    fn record_swap(&mut self) {
        self.swaps += 1;
    }

    fn record_state_change(&mut self) {
        self.state_changes += 1;
    }

    fn record_reaction(&mut self) {
        self.reactions += 1;
    }

    fn record_spawn(&mut self) {
        self.spawns += 1;
    }

    fn record_removal(&mut self) {
        self.removals += 1;
    }
}

impl CountingStats {
    pub fn log_summary(&self) {
        log::info!(
            "Moves: {}, swaps: {}, state changes: {}, reactions: {}, spawns: {}, removals: {}",
            self.moves,
            self.swaps,
            self.state_changes,
            self.reactions,
            self.spawns,
            self.removals
        );
    }
}
