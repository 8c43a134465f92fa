//! Drives a world through a configured run

use std::time::Duration;

use anyhow::{Context, Result};
use powdergrid_core::{PropertyTable, World};
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256StarStar;
use web_time::Instant;

use crate::config::{RunnerConfig, ScriptedCommand};
use crate::stats::CountingStats;
use crate::timer::TickTimer;

/// Owns the world, its RNG and the command script
pub struct Runner {
    world: World,
    rng: Xoshiro256StarStar,
    stats: CountingStats,
    /// Sorted by tick
    script: Vec<ScriptedCommand>,
    next_entry: usize,
    summary_interval: u64,
}

impl Runner {
    pub fn new(config: &RunnerConfig) -> Result<Self> {
        let mut table = PropertyTable::default();
        if let Some(path) = &config.materials {
            let source = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read materials from {}", path.display()))?;
            let replaced = table
                .overlay_ron_str(&source)
                .with_context(|| format!("Invalid materials in {}", path.display()))?;
            log::info!("Loaded {} material overrides from {}", replaced, path.display());
        }

        let world = World::new(config.grid.clone(), table).context("Failed to create world")?;

        let mut script = config.script.clone();
        script.sort_by_key(|entry| entry.tick);

        Ok(Self {
            world,
            rng: Xoshiro256StarStar::seed_from_u64(config.seed),
            stats: CountingStats::default(),
            script,
            next_entry: 0,
            summary_interval: config.summary_interval,
        })
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn stats(&self) -> &CountingStats {
        &self.stats
    }

    /// Feed due script entries and advance one tick
    pub fn step(&mut self) -> Result<()> {
        let tick = self.world.tick_count();
        while let Some(entry) = self.script.get(self.next_entry) {
            if entry.tick > tick {
                break;
            }
            self.world.enqueue_command(entry.to_command()?);
            self.next_entry += 1;
        }

        self.world
            .step(&mut self.stats, &mut self.rng)
            .with_context(|| format!("Simulation failed at tick {tick}"))?;

        let done = self.world.tick_count();
        if self.summary_interval > 0 && done % self.summary_interval == 0 {
            log::info!(
                "Tick {}: {} particles",
                done,
                self.world.live_particle_count()
            );
        }
        Ok(())
    }

    /// Run `ticks` ticks as fast as possible
    pub fn run_ticks(&mut self, ticks: u64) -> Result<()> {
        for _ in 0..ticks {
            self.step()?;
        }
        Ok(())
    }

    /// Run `ticks` ticks paced against the wall clock
    pub fn run_realtime(&mut self, ticks: u64, tick_seconds: f32) -> Result<()> {
        let mut timer = TickTimer::new(tick_seconds);
        let mut last_update = Instant::now();
        let mut remaining = ticks;

        while remaining > 0 {
            let now = Instant::now();
            let dt = now.duration_since(last_update).as_secs_f32();
            last_update = now;

            let due = u64::from(timer.advance(dt)).min(remaining);
            for _ in 0..due {
                self.step()?;
            }
            remaining -= due;

            if due == 0 {
                std::thread::sleep(Duration::from_secs_f32(timer.tick_seconds() / 4.0));
            }
        }
        Ok(())
    }
}
