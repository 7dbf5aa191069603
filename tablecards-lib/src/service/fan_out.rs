//! Which cells a single edit reaches.

use std::collections::HashSet;

use crate::api::dto::PatchCellRequest;
use crate::model::HeaderColumn;
use crate::model::Row;
use crate::model::Selection;

/// How an edit of one body cell spreads over the current selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FanOut {
    /// Neither the cell's row nor its column is selected: only that cell.
    Single,
    /// The cell's row is selected: the cell's column in every selected row.
    SelectedRows,
    /// The cell's column is selected: the cell's row in every selected column.
    SelectedColumns,
    /// Both are selected: the union of the two groups above, not their
    /// cartesian product.
    Both,
}

impl FanOut {
    pub fn resolve(row_selected: bool, column_selected: bool) -> Self {
        match (row_selected, column_selected) {
            (false, false) => Self::Single,
            (true, false) => Self::SelectedRows,
            (false, true) => Self::SelectedColumns,
            (true, true) => Self::Both,
        }
    }
}

/// The table state an edit is resolved against.
pub(crate) struct EditScope<'a> {
    pub rows: &'a [Row],
    pub columns: &'a [HeaderColumn],
    pub selected_rows: &'a Selection,
    pub selected_columns: &'a Selection,
}

impl EditScope<'_> {
    /// Builds the patch items for editing the body cell at
    /// (`row_index`, `column_index`), in table order and without duplicates.
    ///
    /// Returns an empty list when the coordinate is outside the table.
    pub fn patches(&self, row_index: usize, column_index: usize, value: &str, data_type_id: i32) -> Vec<PatchCellRequest> {
        let (Some(row), Some(column)) = (self.rows.get(row_index), self.columns.get(column_index)) else {
            return Vec::new();
        };

        let policy = FanOut::resolve(
            self.selected_rows.is_selected(row.id()),
            self.selected_columns.is_selected(column.id()),
        );

        let mut targets: Vec<(&str, &str)> = Vec::new();
        match policy {
            FanOut::Single => targets.push((row.id(), column.id())),
            FanOut::SelectedRows => targets.extend(self.across_selected_rows(column)),
            FanOut::SelectedColumns => targets.extend(self.across_selected_columns(row)),
            FanOut::Both => {
                targets.extend(self.across_selected_rows(column));
                targets.extend(self.across_selected_columns(row));
            }
        }

        let mut seen = HashSet::new();
        targets
            .into_iter()
            .filter(|target| seen.insert(*target))
            .map(|(row_id, column_id)| PatchCellRequest {
                row_id: Some(row_id.to_string()),
                column_id: Some(column_id.to_string()),
                data_type_id,
                new_value: value.to_string(),
            })
            .collect()
    }

    fn across_selected_rows<'s>(&'s self, column: &'s HeaderColumn) -> impl Iterator<Item = (&'s str, &'s str)> {
        self.rows
            .iter()
            .filter(|row| self.selected_rows.is_selected(row.id()))
            .map(move |row| (row.id(), column.id()))
    }

    fn across_selected_columns<'s>(&'s self, row: &'s Row) -> impl Iterator<Item = (&'s str, &'s str)> {
        self.columns
            .iter()
            .filter(|column| self.selected_columns.is_selected(column.id()))
            .map(move |column| (row.id(), column.id()))
    }
}
