//! Dense occupancy grid mapping cells to particle store slots

use serde::{Deserialize, Serialize};

/// One grid position
///
/// `slot` is `Some` exactly when the cell is occupied.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridCell {
    pub slot: Option<usize>,
}

impl GridCell {
    pub const EMPTY: GridCell = GridCell { slot: None };

    pub fn is_occupied(&self) -> bool {
        self.slot.is_some()
    }
}

/// Result of looking up a coordinate
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellQuery {
    /// Outside the grid
    Illegal,
    Empty,
    Occupied(usize),
}

impl CellQuery {
    pub fn slot(self) -> Option<usize> {
        match self {
            CellQuery::Occupied(slot) => Some(slot),
            _ => None,
        }
    }

    pub fn is_empty(self) -> bool {
        self == CellQuery::Empty
    }
}

/// Occupancy index, `index = y * width + x`, with `y = 0` as the floor
#[derive(Clone, Debug)]
pub struct SpatialIndex {
    width: i32,
    height: i32,
    cells: Vec<GridCell>,
}

impl SpatialIndex {
    /// Callers guarantee non-zero dimensions
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width as i32,
            height: height as i32,
            cells: vec![GridCell::EMPTY; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    #[inline]
    pub fn is_legal(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < self.width && y < self.height
    }

    #[inline]
    fn cell_index(&self, x: i32, y: i32) -> Option<usize> {
        self.is_legal(x, y)
            .then(|| (y * self.width + x) as usize)
    }

    pub fn occupant(&self, x: i32, y: i32) -> CellQuery {
        match self.cell_index(x, y) {
            None => CellQuery::Illegal,
            Some(i) => match self.cells[i].slot {
                Some(slot) => CellQuery::Occupied(slot),
                None => CellQuery::Empty,
            },
        }
    }

    /// Point a cell at a slot; ignored for illegal coordinates
    pub fn set(&mut self, x: i32, y: i32, slot: usize) {
        if let Some(i) = self.cell_index(x, y) {
            self.cells[i].slot = Some(slot);
        }
    }

    pub fn clear(&mut self, x: i32, y: i32) {
        if let Some(i) = self.cell_index(x, y) {
            self.cells[i] = GridCell::EMPTY;
        }
    }

    /// Exchange the contents of two legal cells
    pub fn swap(&mut self, a: (i32, i32), b: (i32, i32)) {
        if let (Some(i), Some(j)) = (self.cell_index(a.0, a.1), self.cell_index(b.0, b.1)) {
            self.cells.swap(i, j);
        }
    }

    pub fn cells(&self) -> &[GridCell] {
        &self.cells
    }

    /// Coordinates of the cell at a flat index
    pub fn coords_of(&self, index: usize) -> (i32, i32) {
        let index = index as i32;
        (index % self.width, index / self.width)
    }
}
