//! Table rows

use super::Cell;
use super::DataType;
use super::HeaderColumn;

/// One row of a table: its server id and one cell per column.
///
/// Index-based cell operations refuse out-of-range positions instead of
/// panicking. Keeping every row aligned with the header is the caller's job:
/// the same operation has to be applied to all rows.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    id: String,
    cells: Vec<Cell>,
}

impl Row {
    pub fn new(id: impl Into<String>, cells: Vec<Cell>) -> Self {
        Self {
            id: id.into(),
            cells,
        }
    }

    /// A row with one empty cell per column.
    pub fn empty(id: impl Into<String>, columns: &[HeaderColumn]) -> Self {
        let cells = columns.iter().map(|c| Cell::empty(c.data_type())).collect();
        Self::new(id, cells)
    }

    /// A row whose cells take `values` in column order.
    ///
    /// Missing values become empty cells and extra values are dropped, so the
    /// row always has exactly one cell per column.
    pub fn from_values(id: impl Into<String>, values: &[Option<String>], columns: &[HeaderColumn]) -> Self {
        let cells = columns
            .iter()
            .enumerate()
            .map(|(i, column)| Cell::new(values.get(i).cloned().flatten(), column.data_type()))
            .collect();
        Self::new(id, cells)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn cell(&self, index: usize) -> Option<&Cell> {
        self.cells.get(index)
    }

    pub fn cell_mut(&mut self, index: usize) -> Option<&mut Cell> {
        self.cells.get_mut(index)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Values in column order.
    pub fn values(&self) -> Vec<Option<String>> {
        self.cells.iter().map(|c| c.value().map(str::to_string)).collect()
    }

    pub fn append_new_cell(&mut self, data_type: DataType) {
        self.cells.push(Cell::empty(data_type));
    }

    /// Inserts an empty cell. Returns `false` if `index > len`.
    pub fn insert_new_cell_at(&mut self, index: usize, data_type: DataType) -> bool {
        self.insert_cell_at(index, Cell::empty(data_type))
    }

    /// Inserts a cell. Returns `false` if `index > len`.
    pub fn insert_cell_at(&mut self, index: usize, cell: Cell) -> bool {
        if index > self.cells.len() {
            return false;
        }
        self.cells.insert(index, cell);
        true
    }

    /// Removes and returns the cell at `index`.
    pub fn delete_cell(&mut self, index: usize) -> Option<Cell> {
        (index < self.cells.len()).then(|| self.cells.remove(index))
    }

    /// Swaps in a new cell, returning the old one.
    pub fn replace_cell(&mut self, index: usize, cell: Cell) -> Option<Cell> {
        self.cells
            .get_mut(index)
            .map(|slot| std::mem::replace(slot, cell))
    }

    pub(crate) fn cells_mut(&mut self) -> &mut Vec<Cell> {
        &mut self.cells
    }
}
