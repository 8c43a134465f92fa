//! CPU-based frame renderer
//!
//! Renders the grid to an RGBA pixel buffer without GPU dependencies and
//! writes it out as PNG.

use std::path::Path;

use anyhow::{Context, Result};
use image::{ImageBuffer, Rgba, RgbaImage};
use powdergrid_core::World;
use serde::{Deserialize, Serialize};

const BACKGROUND: [u8; 4] = [0, 0, 0, 255];
const OCCUPIED: [u8; 4] = [255, 0, 0, 255];
const EMPTY: [u8; 4] = [0, 255, 0, 255];

/// Cold to hot
const HEAT_GRADIENT: [[u8; 4]; 4] = [
    [0, 0, 255, 255],
    [0, 255, 0, 255],
    [255, 255, 0, 255],
    [255, 0, 0, 255],
];

/// What a frame shows
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    /// Particle colors
    #[default]
    Default,
    /// Temperature, scaled to the observed range
    Heat,
    /// Occupied cells red, empty cells green
    Debug,
}

/// CPU-based renderer that outputs to a pixel buffer
pub struct FrameRenderer {
    width: usize,
    height: usize,
    /// RGBA pixel buffer (4 bytes per pixel), row 0 is the top of the grid
    buffer: Vec<u8>,
    /// Smoothed temperature range of the heat view
    heat_range: Option<(f32, f32)>,
    /// Fraction of the way the heat range moves toward a new frame's range
    heat_smoothing: f32,
}

impl FrameRenderer {
    pub fn new(width: u32, height: u32) -> Self {
        let (width, height) = (width as usize, height as usize);
        Self {
            width,
            height,
            buffer: vec![0u8; width * height * 4],
            heat_range: None,
            heat_smoothing: 0.5,
        }
    }

    pub fn buffer(&self) -> &[u8] {
        &self.buffer
    }

    pub fn heat_range(&self) -> Option<(f32, f32)> {
        self.heat_range
    }

    /// Render the whole grid
    pub fn render(&mut self, world: &World, mode: DisplayMode) {
        for pixel in self.buffer.chunks_exact_mut(4) {
            pixel.copy_from_slice(&BACKGROUND);
        }

        match mode {
            DisplayMode::Default => {
                for particle in world.particles().iter().filter(|p| !p.is_tombstone()) {
                    self.set_cell(particle.x, particle.y, particle.color);
                }
            }
            DisplayMode::Heat => self.render_heat(world),
            DisplayMode::Debug => {
                let width = self.width;
                for (i, cell) in world.occupancy().iter().enumerate() {
                    let color = if cell.is_occupied() { OCCUPIED } else { EMPTY };
                    self.set_cell((i % width) as i32, (i / width) as i32, color);
                }
            }
        }
    }

    fn render_heat(&mut self, world: &World) {
        let live = || world.particles().iter().filter(|p| !p.is_tombstone());
        let Some((min, max)) = live().fold(None, |range: Option<(f32, f32)>, p| {
            let t = p.temperature as f32;
            Some(range.map_or((t, t), |(lo, hi)| (lo.min(t), hi.max(t))))
        }) else {
            return;
        };

        let (low, high) = match self.heat_range {
            Some((low, high)) => (
                low + (min - low) * self.heat_smoothing,
                high + (max - high) * self.heat_smoothing,
            ),
            None => (min, max),
        };
        self.heat_range = Some((low, high));

        for particle in live() {
            let t = inverse_lerp(low, high, particle.temperature as f32);
            self.set_cell(particle.x, particle.y, heat_color(t));
        }
    }

    /// Set a grid cell, flipping Y so the floor ends up at the bottom
    fn set_cell(&mut self, x: i32, y: i32, color: [u8; 4]) {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return;
        }
        let row = self.height - 1 - y as usize;
        let idx = (row * self.width + x as usize) * 4;
        self.buffer[idx..idx + 4].copy_from_slice(&color);
    }

    pub fn to_image(&self) -> Result<RgbaImage> {
        ImageBuffer::<Rgba<u8>, _>::from_raw(
            self.width as u32,
            self.height as u32,
            self.buffer.clone(),
        )
        .context("Failed to create image buffer")
    }

    /// Save the current frame as PNG
    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        self.to_image()?
            .save(path)
            .with_context(|| format!("Failed to write {}", path.display()))
    }
}

fn inverse_lerp(low: f32, high: f32, value: f32) -> f32 {
    if high <= low {
        return 0.0;
    }
    ((value - low) / (high - low)).clamp(0.0, 1.0)
}

/// Sample the heat gradient at `t` in `[0, 1]`
pub fn heat_color(t: f32) -> [u8; 4] {
    let position = t.clamp(0.0, 1.0) * (HEAT_GRADIENT.len() - 1) as f32;
    let index = (position.floor() as usize).min(HEAT_GRADIENT.len() - 2);
    let frac = position - index as f32;
    let (a, b) = (HEAT_GRADIENT[index], HEAT_GRADIENT[index + 1]);

    std::array::from_fn(|c| (a[c] as f32 + (b[c] as f32 - a[c] as f32) * frac).round() as u8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use powdergrid_core::{GridConfig, ParticleType, PropertyTable};
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256StarStar;

    fn world_with_stone() -> World {
        let mut world = World::new(GridConfig::new(4, 3), PropertyTable::default()).unwrap();
        let mut rng = Xoshiro256StarStar::seed_from_u64(1);
        world.place(ParticleType::Stone, 0, 0, &mut rng);
        world.place(ParticleType::Fire, 3, 2, &mut rng);
        world
    }

    fn pixel(renderer: &FrameRenderer, col: usize, row: usize) -> [u8; 4] {
        let idx = (row * 4 + col) * 4;
        let mut out = [0u8; 4];
        out.copy_from_slice(&renderer.buffer()[idx..idx + 4]);
        out
    }

    #[test]
    fn test_default_view_flips_rows() {
        let world = world_with_stone();
        let mut renderer = FrameRenderer::new(4, 3);

        renderer.render(&world, DisplayMode::Default);

        let stone = world.particle_at(0, 0).particle.unwrap();
        // Floor is the bottom image row
        assert_eq!(pixel(&renderer, 0, 2), stone.color);
        assert_eq!(pixel(&renderer, 1, 1), BACKGROUND);
    }

    #[test]
    fn test_debug_view_marks_occupancy() {
        let world = world_with_stone();
        let mut renderer = FrameRenderer::new(4, 3);

        renderer.render(&world, DisplayMode::Debug);

        assert_eq!(pixel(&renderer, 0, 2), OCCUPIED);
        assert_eq!(pixel(&renderer, 3, 0), OCCUPIED);
        assert_eq!(pixel(&renderer, 1, 1), EMPTY);
    }

    #[test]
    fn test_heat_view_spans_observed_range() {
        let world = world_with_stone();
        let mut renderer = FrameRenderer::new(4, 3);

        renderer.render(&world, DisplayMode::Heat);

        assert_eq!(renderer.heat_range(), Some((20.0, 600.0)));
        assert_eq!(pixel(&renderer, 0, 2), HEAT_GRADIENT[0]);
        assert_eq!(pixel(&renderer, 3, 0), HEAT_GRADIENT[3]);
    }

    #[test]
    fn test_heat_range_is_smoothed() {
        let mut world = world_with_stone();
        let mut renderer = FrameRenderer::new(4, 3);
        renderer.render(&world, DisplayMode::Heat);

        world.set_ambient_temperature(-20);
        let mut rng = Xoshiro256StarStar::seed_from_u64(2);
        world.place(ParticleType::Sand, 1, 0, &mut rng);
        renderer.render(&world, DisplayMode::Heat);

        assert_eq!(renderer.heat_range(), Some((0.0, 600.0)));
    }

    #[test]
    fn test_heat_gradient_endpoints() {
        assert_eq!(heat_color(0.0), [0, 0, 255, 255]);
        assert_eq!(heat_color(1.0), [255, 0, 0, 255]);
        assert_eq!(heat_color(0.5), [128, 255, 0, 255]);
    }

    #[test]
    fn test_to_image_dimensions() {
        let renderer = FrameRenderer::new(4, 3);
        let image = renderer.to_image().unwrap();
        assert_eq!(image.dimensions(), (4, 3));
    }
}
