//! powdergrid - headless falling-sand runner

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use powdergrid::{DisplayMode, FrameRenderer, Runner, RunnerConfig};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file (RON); powdergrid.ron is used when present
    #[arg(long)]
    config: Option<PathBuf>,

    /// RON file with material templates that replace the built-in ones
    #[arg(long)]
    materials: Option<PathBuf>,

    /// Number of ticks to simulate
    #[arg(long)]
    ticks: Option<u64>,

    /// Seed for the simulation RNG
    #[arg(long)]
    seed: Option<u64>,

    /// Pace ticks against the wall clock
    #[arg(long)]
    realtime: bool,

    /// Write the final frame to this PNG
    #[arg(long)]
    snapshot: Option<PathBuf>,

    /// What the snapshot shows
    #[arg(long, value_enum)]
    display: Option<DisplayMode>,
}

impl Args {
    fn apply(self, config: &mut RunnerConfig) {
        if let Some(materials) = self.materials {
            config.materials = Some(materials);
        }
        if let Some(ticks) = self.ticks {
            config.ticks = ticks;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if self.realtime {
            config.realtime = true;
        }
        if let Some(snapshot) = self.snapshot {
            config.snapshot = Some(snapshot);
        }
        if let Some(display) = self.display {
            config.display = display;
        }
    }
}

fn main() -> anyhow::Result<()> {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let mut config = RunnerConfig::load(args.config.as_deref())?;
    args.apply(&mut config);

    log::info!(
        "Starting powdergrid: {}x{}, {} ticks, seed {}",
        config.grid.width,
        config.grid.height,
        config.ticks,
        config.seed
    );

    let mut runner = Runner::new(&config)?;
    if config.realtime {
        runner.run_realtime(config.ticks, config.tick_seconds)?;
    } else {
        runner.run_ticks(config.ticks)?;
    }

    log::info!(
        "Finished after {} ticks with {} particles",
        runner.world().tick_count(),
        runner.world().live_particle_count()
    );
    runner.stats().log_summary();

    if let Some(path) = &config.snapshot {
        let world = runner.world();
        let mut renderer = FrameRenderer::new(world.width(), world.height());
        renderer.render(world, config.display);
        renderer
            .save_png(path)
            .with_context(|| format!("Failed to save snapshot to {}", path.display()))?;
        log::info!("Snapshot saved to {}", path.display());
    }

    Ok(())
}
