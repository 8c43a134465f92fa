//! External interactions and the circular brush

use ahash::{AHashMap, AHashSet};
use glam::IVec2;
use powdergrid_simulation::ParticleType;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommandKind {
    #[default]
    None,
    Spawn(ParticleType),
    Kill,
}

/// One-shot interaction applied at the start of the next step
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Command {
    pub kind: CommandKind,
    pub coordinate: IVec2,
    /// 0 targets a single cell
    pub radius: u32,
}

impl Command {
    pub const NONE: Command = Command {
        kind: CommandKind::None,
        coordinate: IVec2::ZERO,
        radius: 0,
    };

    pub fn spawn(particle_type: ParticleType, x: i32, y: i32, radius: u32) -> Self {
        Self {
            kind: CommandKind::Spawn(particle_type),
            coordinate: IVec2::new(x, y),
            radius,
        }
    }

    pub fn kill(x: i32, y: i32, radius: u32) -> Self {
        Self {
            kind: CommandKind::Kill,
            coordinate: IVec2::new(x, y),
            radius,
        }
    }

    pub fn is_none(&self) -> bool {
        self.kind == CommandKind::None
    }
}

/// Holds at most one pending command; the last write wins
#[derive(Debug, Default)]
pub struct CommandBuffer {
    pending: Command,
}

impl CommandBuffer {
    pub fn enqueue(&mut self, command: Command) {
        if !self.pending.is_none() {
            log::debug!(
                "Replacing unconsumed command {:?} with {:?}",
                self.pending.kind,
                command.kind
            );
        }
        self.pending = command;
    }

    /// Consume the pending command, leaving `NONE` behind
    pub fn take(&mut self) -> Command {
        std::mem::replace(&mut self.pending, Command::NONE)
    }

    pub fn peek(&self) -> &Command {
        &self.pending
    }
}

/// Half-height of a brush column `dx` cells from the center, if covered
fn column_reach(radius: u32, dx: u64) -> Option<u64> {
    let r = u64::from(radius);
    if dx > r {
        return None;
    }
    let rest = r * r - dx * dx;
    let root = rest.isqrt();
    Some(if root * root < rest { root + 1 } else { root })
}

/// Whether the brush of `radius` covers the offset `(dx, dy)`
pub fn brush_covers(radius: u32, dx: i64, dy: i64) -> bool {
    column_reach(radius, dx.unsigned_abs()).is_some_and(|reach| dy.unsigned_abs() <= reach)
}

/// Radius past which a brush centered on the grid covers every cell
pub fn grid_reach(width: u32, height: u32) -> u32 {
    let (w, h) = (u64::from(width), u64::from(height));
    let diagonal = (w * w + h * h).isqrt() + 1;
    u32::try_from(diagonal).unwrap_or(u32::MAX)
}

/// Per-radius cache of circular brush offsets
#[derive(Debug, Default)]
pub struct BrushCache {
    offsets: AHashMap<u32, Vec<IVec2>>,
}

impl BrushCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Distinct integer offsets covered by a brush of `radius`
    pub fn offsets(&mut self, radius: u32) -> &[IVec2] {
        self.offsets
            .entry(radius)
            .or_insert_with(|| Self::build(radius))
    }

    fn build(radius: u32) -> Vec<IVec2> {
        let mut seen: AHashSet<IVec2> = AHashSet::new();
        let mut offsets: Vec<IVec2> = Vec::new();

        for x in 0..=radius {
            let Some(reach) = column_reach(radius, u64::from(x)) else {
                continue;
            };
            let (Ok(x), Ok(reach)) = (i32::try_from(x), i32::try_from(reach)) else {
                break;
            };
            for y in 0..=reach {
                for offset in [
                    IVec2::new(x, y),
                    IVec2::new(-x, y),
                    IVec2::new(x, -y),
                    IVec2::new(-x, -y),
                ] {
                    if seen.insert(offset) {
                        offsets.push(offset);
                    }
                }
            }
        }

        offsets
    }
}
