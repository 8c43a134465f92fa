//! Per-row worklists of particle slots

/// Which way a pass walks the rows
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RowOrder {
    /// Floor first (falling materials)
    BottomUp,
    /// Ceiling first (rising materials)
    TopDown,
}

/// Rows of slots to visit this tick
///
/// Row vectors keep their allocation across ticks.
#[derive(Debug)]
pub struct RowScheduler {
    rows: Vec<Vec<usize>>,
    order: RowOrder,
}

impl RowScheduler {
    pub fn new(height: u32, order: RowOrder) -> Self {
        Self {
            rows: vec![Vec::new(); height as usize],
            order,
        }
    }

    /// Queue a slot on row `y`; out-of-range rows are ignored
    pub fn queue(&mut self, y: i32, slot: usize) {
        if let Some(row) = usize::try_from(y).ok().and_then(|y| self.rows.get_mut(y)) {
            row.push(slot);
        }
    }

    pub fn clear(&mut self, y: usize) {
        if let Some(row) = self.rows.get_mut(y) {
            row.clear();
        }
    }

    pub fn clear_all(&mut self) {
        for row in &mut self.rows {
            row.clear();
        }
    }

    pub fn row(&self, y: usize) -> &[usize] {
        self.rows.get(y).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Order every row by a per-slot key, typically the particle's x
    pub fn sort_rows_by_key<K: Ord>(&mut self, mut key: impl FnMut(usize) -> K) {
        for row in &mut self.rows {
            row.sort_unstable_by_key(|&slot| key(slot));
        }
    }

    /// Row indices in walk order
    pub fn row_indices(&self) -> Box<dyn Iterator<Item = usize>> {
        let height = self.rows.len();
        match self.order {
            RowOrder::BottomUp => Box::new(0..height),
            RowOrder::TopDown => Box::new((0..height).rev()),
        }
    }

    /// Total queued slots
    pub fn len(&self) -> usize {
        self.rows.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.iter().all(Vec::is_empty)
    }
}
