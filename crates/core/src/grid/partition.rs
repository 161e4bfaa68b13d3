//! Coarse spatial partition used to batch render signals
//!
//! The terrain is split into square cells of `cell_size` world units. Each
//! object belongs to exactly one cell, fixed at spawn. Cells carry no
//! simulation logic: they count how many members burnt since the last batch
//! so the renderer can merge a fully burnt cell into one mesh, and they
//! remember whether such a merged batch currently exists so it can be
//! invalidated when a member changes.

use crate::core_types::{CellId, GridCoord};
use rustc_hash::{FxHashMap, FxHashSet};

/// A single partition cell
#[derive(Debug, Clone, Default)]
pub struct GridCell {
    members: FxHashSet<GridCoord>,
    burnt_since_batch: usize,
    batched: bool,
}

impl GridCell {
    /// Number of objects assigned to this cell
    #[must_use]
    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    #[must_use]
    pub fn contains(&self, coord: GridCoord) -> bool {
        self.members.contains(&coord)
    }

    pub fn members(&self) -> impl Iterator<Item = GridCoord> + '_ {
        self.members.iter().copied()
    }

    /// Members that became burnt since the last batch event
    #[must_use]
    pub fn burnt_since_batch(&self) -> usize {
        self.burnt_since_batch
    }

    /// Whether the renderer currently holds a merged batch for this cell
    #[must_use]
    pub fn is_batched(&self) -> bool {
        self.batched
    }
}

/// Maps coordinates to cells and tracks per-cell bookkeeping
#[derive(Debug, Clone)]
pub struct GridPartition {
    cell_size: i32,
    cells: FxHashMap<CellId, GridCell>,
}

impl GridPartition {
    /// Create an empty partition. `cell_size` must be positive.
    #[must_use]
    pub fn new(cell_size: i32) -> Self {
        debug_assert!(cell_size > 0, "cell size must be positive");
        Self {
            cell_size,
            cells: FxHashMap::default(),
        }
    }

    #[must_use]
    pub fn cell_size(&self) -> i32 {
        self.cell_size
    }

    /// Cell containing `coord` (floor division, so negative coordinates
    /// land in negative cells rather than collapsing onto cell 0)
    #[inline]
    #[must_use]
    pub fn cell_of(&self, coord: GridCoord) -> CellId {
        CellId::new(
            coord.x.div_euclid(self.cell_size),
            coord.z.div_euclid(self.cell_size),
        )
    }

    #[must_use]
    pub fn cell(&self, id: CellId) -> Option<&GridCell> {
        self.cells.get(&id)
    }

    /// Number of cells that have ever received a member since the last clear
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    pub fn cells(&self) -> impl Iterator<Item = (CellId, &GridCell)> + '_ {
        self.cells.iter().map(|(id, cell)| (*id, cell))
    }

    pub fn on_member_added(&mut self, cell: CellId, coord: GridCoord) {
        self.cells.entry(cell).or_default().members.insert(coord);
    }

    /// Detach a member. A burnt member also leaves the pending burnt count so
    /// the count never exceeds the membership.
    ///
    /// Returns `true` when the removal leaves every remaining member burnt
    /// since the last batch. The cell is then reset and marked batched,
    /// exactly as if its last member had just burnt.
    pub fn on_member_removed(
        &mut self,
        cell: CellId,
        coord: GridCoord,
        was_burnt: bool,
    ) -> bool {
        let Some(grid_cell) = self.cells.get_mut(&cell) else {
            return false;
        };
        if !grid_cell.members.remove(&coord) {
            return false;
        }
        if was_burnt {
            grid_cell.burnt_since_batch = grid_cell.burnt_since_batch.saturating_sub(1);
        }
        let pending = grid_cell.burnt_since_batch;
        if pending > 0 && pending == grid_cell.members.len() {
            grid_cell.burnt_since_batch = 0;
            grid_cell.batched = true;
            true
        } else {
            false
        }
    }

    /// Count a member as newly burnt.
    ///
    /// Returns `true` when the count reaches the cell's membership, i.e. the
    /// whole cell is ready to be merged. The count then resets to zero and
    /// the cell is marked batched.
    pub fn on_member_burnt(&mut self, cell: CellId) -> bool {
        let Some(grid_cell) = self.cells.get_mut(&cell) else {
            return false;
        };
        grid_cell.burnt_since_batch += 1;
        if grid_cell.burnt_since_batch == grid_cell.members.len() {
            grid_cell.burnt_since_batch = 0;
            grid_cell.batched = true;
            true
        } else {
            false
        }
    }

    /// Drop any merged batch for the cell. Returns whether one existed.
    pub fn invalidate(&mut self, cell: CellId) -> bool {
        self.cells
            .get_mut(&cell)
            .is_some_and(|grid_cell| std::mem::replace(&mut grid_cell.batched, false))
    }

    /// Record that the renderer merged the cell
    pub fn mark_batched(&mut self, cell: CellId) {
        if let Some(grid_cell) = self.cells.get_mut(&cell) {
            grid_cell.batched = true;
        }
    }

    pub fn clear(&mut self) {
        self.cells.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_of_floor_division() {
        let grid = GridPartition::new(20);
        assert_eq!(grid.cell_of(GridCoord::new(0, 0)), CellId::new(0, 0));
        assert_eq!(grid.cell_of(GridCoord::new(19, 19)), CellId::new(0, 0));
        assert_eq!(grid.cell_of(GridCoord::new(20, 39)), CellId::new(1, 1));
        assert_eq!(grid.cell_of(GridCoord::new(-1, 0)), CellId::new(-1, 0));
    }

    #[test]
    fn test_membership() {
        let mut grid = GridPartition::new(10);
        let cell = CellId::new(0, 0);
        grid.on_member_added(cell, GridCoord::new(1, 1));
        grid.on_member_added(cell, GridCoord::new(2, 2));
        assert_eq!(grid.cell(cell).map(GridCell::member_count), Some(2));

        assert!(!grid.on_member_removed(cell, GridCoord::new(1, 1), false));
        let grid_cell = grid.cell(cell).unwrap();
        assert_eq!(grid_cell.member_count(), 1);
        assert!(!grid_cell.contains(GridCoord::new(1, 1)));
    }

    #[test]
    fn test_batch_ready_only_on_last_member() {
        let mut grid = GridPartition::new(10);
        let cell = CellId::new(0, 0);
        for i in 0..3 {
            grid.on_member_added(cell, GridCoord::new(i, 0));
        }

        assert!(!grid.on_member_burnt(cell));
        assert!(!grid.on_member_burnt(cell));
        assert_eq!(grid.cell(cell).unwrap().burnt_since_batch(), 2);

        assert!(grid.on_member_burnt(cell));
        let grid_cell = grid.cell(cell).unwrap();
        assert_eq!(grid_cell.burnt_since_batch(), 0);
        assert!(grid_cell.is_batched());
    }

    #[test]
    fn test_removing_burnt_member_keeps_count_bounded() {
        let mut grid = GridPartition::new(10);
        let cell = CellId::new(0, 0);
        grid.on_member_added(cell, GridCoord::new(0, 0));
        grid.on_member_added(cell, GridCoord::new(1, 0));
        grid.on_member_added(cell, GridCoord::new(2, 0));

        assert!(!grid.on_member_burnt(cell));
        assert!(!grid.on_member_removed(cell, GridCoord::new(0, 0), true));
        assert_eq!(grid.cell(cell).unwrap().burnt_since_batch(), 0);

        assert!(!grid.on_member_burnt(cell));
        assert!(grid.on_member_burnt(cell));
    }

    #[test]
    fn test_removing_last_unburnt_member_completes_batch() {
        let mut grid = GridPartition::new(10);
        let cell = CellId::new(0, 0);
        for i in 0..3 {
            grid.on_member_added(cell, GridCoord::new(i, 0));
        }
        assert!(!grid.on_member_burnt(cell));
        assert!(!grid.on_member_burnt(cell));

        assert!(grid.on_member_removed(cell, GridCoord::new(2, 0), false));
        let grid_cell = grid.cell(cell).unwrap();
        assert_eq!(grid_cell.member_count(), 2);
        assert_eq!(grid_cell.burnt_since_batch(), 0);
        assert!(grid_cell.is_batched());
    }

    #[test]
    fn test_removing_last_member_of_empty_cell_is_not_a_batch() {
        let mut grid = GridPartition::new(10);
        let cell = CellId::new(0, 0);
        grid.on_member_added(cell, GridCoord::new(0, 0));

        assert!(!grid.on_member_removed(cell, GridCoord::new(0, 0), false));
        assert!(!grid.cell(cell).unwrap().is_batched());
        assert!(!grid.on_member_removed(cell, GridCoord::new(0, 0), false));
    }

    #[test]
    fn test_invalidate() {
        let mut grid = GridPartition::new(10);
        let cell = CellId::new(0, 0);
        grid.on_member_added(cell, GridCoord::new(0, 0));
        assert!(!grid.invalidate(cell));

        grid.mark_batched(cell);
        assert!(grid.invalidate(cell));
        assert!(!grid.invalidate(cell));
        assert!(!grid.invalidate(CellId::new(5, 5)));
    }
}
