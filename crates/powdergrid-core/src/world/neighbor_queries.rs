//! 3x3 neighborhood descriptors

use super::spatial_index::{CellQuery, SpatialIndex};

/// One cell of a neighborhood
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Neighbor {
    pub x: i32,
    pub y: i32,
    pub cell: CellQuery,
}

/// Value snapshot of the 3x3 block around a cell
///
/// Layout, with row 0 above the center (`y + 1`):
///
/// ```text
/// 0 1 2
/// 3 4 5
/// 6 7 8
/// ```
#[derive(Clone, Copy, Debug)]
pub struct Neighborhood {
    cells: [Neighbor; 9],
}

impl Neighborhood {
    pub const CENTER: usize = 4;

    /// Up, left, right, down
    pub const CARDINALS: [usize; 4] = [1, 3, 5, 7];

    pub fn around(index: &SpatialIndex, x: i32, y: i32) -> Self {
        let mut cells = [Neighbor {
            x,
            y,
            cell: CellQuery::Illegal,
        }; 9];

        for (i, neighbor) in cells.iter_mut().enumerate() {
            let dx = (i % 3) as i32 - 1;
            let dy = 1 - (i / 3) as i32;
            neighbor.x = x + dx;
            neighbor.y = y + dy;
            neighbor.cell = index.occupant(x + dx, y + dy);
        }

        Self { cells }
    }

    pub fn get(&self, dx: i32, dy: i32) -> Neighbor {
        self.cells[((1 - dy) * 3 + dx + 1) as usize]
    }

    /// The 8 surrounding cells
    pub fn neighbors(&self) -> impl Iterator<Item = &Neighbor> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != Self::CENTER)
            .map(|(_, n)| n)
    }

    /// Slots of the occupied surrounding cells
    pub fn occupied_slots(&self) -> impl Iterator<Item = usize> + '_ {
        self.neighbors().filter_map(|n| n.cell.slot())
    }

    pub fn cardinal_slots(&self) -> impl Iterator<Item = usize> + '_ {
        Self::CARDINALS
            .iter()
            .filter_map(|&i| self.cells[i].cell.slot())
    }

    /// Any surrounding cell that is empty or off the grid
    pub fn has_air(&self) -> bool {
        self.neighbors()
            .any(|n| matches!(n.cell, CellQuery::Empty | CellQuery::Illegal))
    }

    /// First surrounding cell a particle could be spawned into
    pub fn first_empty(&self) -> Option<(i32, i32)> {
        self.neighbors()
            .find(|n| n.cell.is_empty())
            .map(|n| (n.x, n.y))
    }
}
