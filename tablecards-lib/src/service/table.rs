//! TableService
//!
//! Owns the rows, columns and selections of one table and exposes every
//! structural and value edit. Each operation follows the same two phases:
//!
//! 1. validate locally (a failed check returns [`Outcome::Skipped`] and sends
//!    nothing), then send one request;
//! 2. once the server answers, apply its ids/indices/delta to the local
//!    arrays.
//!
//! Nothing is changed speculatively. A failed request leaves local state as
//! it was; the error goes to the [`Notifier`] and back to the caller.

use std::sync::Arc;

use super::fan_out::EditScope;
use super::notify::Notifier;
use super::reconcile;
use super::reconcile::ShiftPlan;
use crate::api::TableApi;
use crate::api::dto::CellPatchedDto;
use crate::api::dto::ColumnCreatedDto;
use crate::api::dto::ColumnPatchedDto;
use crate::api::dto::CreateColumnRequest;
use crate::api::dto::CreateRowRequest;
use crate::api::dto::IdsRequest;
use crate::api::dto::MoveRequest;
use crate::api::dto::PatchColumnRequest;
use crate::api::dto::RowCreatedDto;
use crate::api::dto::TableDto;
use crate::error::Error;
use crate::model::Cell;
use crate::model::CellCord;
use crate::model::DataType;
use crate::model::HeaderColumn;
use crate::model::Row;
use crate::model::Selection;

/// Loading state of a [`TableService`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Unloaded,
    /// A fetch is in flight, or the last one failed.
    Loading,
    Loaded,
}

/// What an operation did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum Outcome {
    /// The server confirmed and local state was updated.
    Applied,
    /// Local validation failed; no request was sent.
    Skipped,
}

impl Outcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied)
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped)
    }
}

/// In-memory mirror of one remote table.
///
/// Operations take `&mut self`, so one service runs one operation at a time.
///
/// # Example
///
/// ```ignore
/// let mut service = TableService::new(Arc::new(client));
/// service.init("table-id").await?;
///
/// service.add_new_row().await?;
/// service.set_cells_value(CellCord::body(0, 0), "Ada", DataType::TEXTUAL_ID).await?;
/// ```
pub struct TableService {
    api: Arc<dyn TableApi>,
    notifier: Option<Arc<dyn Notifier>>,
    table_id: Option<String>,
    state: LoadState,
    rows: Vec<Row>,
    header_columns: Vec<HeaderColumn>,
    selected_rows: Selection,
    selected_columns: Selection,
}

impl TableService {
    pub fn new(api: Arc<dyn TableApi>) -> Self {
        Self {
            api,
            notifier: None,
            table_id: None,
            state: LoadState::Unloaded,
            rows: Vec::new(),
            header_columns: Vec::new(),
            selected_rows: Selection::new(),
            selected_columns: Selection::new(),
        }
    }

    /// Sets the sink that failed operations are reported to.
    pub fn with_notifier(mut self, notifier: impl Notifier + 'static) -> Self {
        self.notifier = Some(Arc::new(notifier));
        self
    }

    // =========================================================================
    // Loading
    // =========================================================================

    /// Loads a table, replacing whatever was loaded before.
    ///
    /// On failure the service stays in [`LoadState::Loading`] and keeps its
    /// previous content.
    pub async fn init(&mut self, table_id: impl Into<String>) -> Result<(), Error> {
        let table_id = table_id.into();
        self.state = LoadState::Loading;
        log::debug!("Loading table {}", table_id);

        let table = self.report(self.api.table_content(&table_id).await)?;
        let (header_columns, rows) = self.report(content_from_dto(table))?;

        log::debug!(
            "Loaded table {} with {} columns and {} rows",
            table_id,
            header_columns.len(),
            rows.len()
        );

        self.header_columns = header_columns;
        self.rows = rows;
        self.selected_rows.clear();
        self.selected_columns.clear();
        self.table_id = Some(table_id);
        self.state = LoadState::Loaded;
        Ok(())
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn state(&self) -> LoadState {
        self.state
    }

    pub fn is_loaded(&self) -> bool {
        self.state == LoadState::Loaded
    }

    pub fn table_id(&self) -> Option<&str> {
        self.table_id.as_deref()
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn header_columns(&self) -> &[HeaderColumn] {
        &self.header_columns
    }

    /// The cell at `cord`; for header coordinates, the cell holding the column name.
    pub fn cell(&self, cord: CellCord) -> Option<&Cell> {
        match cord.row_index() {
            None => self
                .header_columns
                .get(cord.column_index())
                .map(|column| column.header_cell().as_cell()),
            Some(row) => self.rows.get(row)?.cell(cord.column_index()),
        }
    }

    pub fn selected_rows(&self) -> &Selection {
        &self.selected_rows
    }

    pub fn selected_rows_mut(&mut self) -> &mut Selection {
        &mut self.selected_rows
    }

    pub fn selected_columns(&self) -> &Selection {
        &self.selected_columns
    }

    pub fn selected_columns_mut(&mut self) -> &mut Selection {
        &mut self.selected_columns
    }

    pub fn is_row_selected(&self, index: usize) -> bool {
        self.rows
            .get(index)
            .is_some_and(|row| self.selected_rows.is_selected(row.id()))
    }

    pub fn is_column_selected(&self, index: usize) -> bool {
        self.header_columns
            .get(index)
            .is_some_and(|column| self.selected_columns.is_selected(column.id()))
    }

    /// Toggles the row at `index`; `None` if there is no such row.
    pub fn toggle_row_selection(&mut self, index: usize) -> Option<bool> {
        let id = self.rows.get(index)?.id();
        Some(self.selected_rows.toggle(id))
    }

    /// Toggles the column at `index`; `None` if there is no such column.
    pub fn toggle_column_selection(&mut self, index: usize) -> Option<bool> {
        let id = self.header_columns.get(index)?.id();
        Some(self.selected_columns.toggle(id))
    }

    pub fn clear_selection(&mut self) {
        self.selected_rows.clear();
        self.selected_columns.clear();
    }

    /// Data types offered by the backend for `term`.
    pub async fn data_types(&self, term: &str) -> Result<Vec<DataType>, Error> {
        self.report(self.api.data_types(term).await)
    }

    // =========================================================================
    // Columns
    // =========================================================================

    /// Adds an empty column at the end.
    pub async fn append_new_column(&mut self, data_type: DataType) -> Result<Outcome, Error> {
        self.create_column(CreateColumnRequest {
            data_type_id: data_type.id(),
            column_index: None,
            duplicate: false,
        })
        .await
    }

    /// Adds an empty column at `index` (`index <= column count`).
    pub async fn insert_new_column_at(&mut self, index: usize, data_type: DataType) -> Result<Outcome, Error> {
        if index > self.header_columns.len() {
            return Ok(Outcome::Skipped);
        }
        self.create_column(CreateColumnRequest {
            data_type_id: data_type.id(),
            column_index: Some(index),
            duplicate: false,
        })
        .await
    }

    /// Asks the server to clone the column at `index`, values included.
    pub async fn duplicate_column(&mut self, index: usize) -> Result<Outcome, Error> {
        let Some(column) = self.header_columns.get(index) else {
            return Ok(Outcome::Skipped);
        };
        let request = CreateColumnRequest {
            data_type_id: column.data_type().id(),
            column_index: Some(index),
            duplicate: true,
        };
        self.create_column(request).await
    }

    async fn create_column(&mut self, request: CreateColumnRequest) -> Result<Outcome, Error> {
        let Some(table_id) = self.loaded_table_id() else {
            return Ok(Outcome::Skipped);
        };
        let created = self.report(self.api.create_column(&table_id, &request).await)?;
        let result = self.apply_created_column(created);
        self.report(result)
    }

    fn apply_created_column(&mut self, created: ColumnCreatedDto) -> Result<Outcome, Error> {
        let index = reconcile::insertion_index(self.header_columns.len(), created.column_index)?;
        let data_type = DataType::from_id(created.data_type_id)?;

        for (position, row) in self.rows.iter_mut().enumerate() {
            let value = created.cells_values.get(position).cloned().flatten();
            row.insert_cell_at(index, Cell::new(value, data_type));
        }
        self.header_columns
            .insert(index, HeaderColumn::new(created.id, created.column_name, data_type));

        log::debug!("Inserted {} column at {}", data_type, index);
        Ok(Outcome::Applied)
    }

    /// Deletes the column at `index`, or the whole column selection if that
    /// column is part of it.
    pub async fn delete_column(&mut self, index: usize) -> Result<Outcome, Error> {
        let Some(column) = self.header_columns.get(index) else {
            return Ok(Outcome::Skipped);
        };
        let ids = if self.selected_columns.is_selected(column.id()) {
            self.selected_column_ids()
        } else {
            vec![column.id().to_string()]
        };
        self.delete_columns_by_id(ids).await
    }

    pub async fn delete_selected_columns(&mut self) -> Result<Outcome, Error> {
        let ids = self.selected_column_ids();
        if ids.is_empty() {
            return Ok(Outcome::Skipped);
        }
        self.delete_columns_by_id(ids).await
    }

    async fn delete_columns_by_id(&mut self, ids: Vec<String>) -> Result<Outcome, Error> {
        let Some(table_id) = self.loaded_table_id() else {
            return Ok(Outcome::Skipped);
        };
        let deleted = self.report(self.api.delete_columns(&table_id, &IdsRequest { ids }).await)?;
        let result = self.apply_deleted_columns(&deleted.indexes);
        self.report(result)
    }

    fn apply_deleted_columns(&mut self, indexes: &[usize]) -> Result<Outcome, Error> {
        let order = reconcile::deletion_order(self.header_columns.len(), indexes)?;
        for index in order {
            let column = self.header_columns.remove(index);
            self.selected_columns.deselect(column.id());
            for row in &mut self.rows {
                row.delete_cell(index);
            }
        }
        log::debug!("Deleted columns at {:?}", indexes);
        Ok(Outcome::Applied)
    }

    /// Moves the column at `from` to `to`. A selected column drags the whole
    /// column selection along.
    pub async fn move_columns(&mut self, from: usize, to: usize) -> Result<Outcome, Error> {
        let len = self.header_columns.len();
        if from == to || from >= len || to >= len {
            return Ok(Outcome::Skipped);
        }
        let Some(table_id) = self.loaded_table_id() else {
            return Ok(Outcome::Skipped);
        };

        let dragged = self.header_columns[from].id();
        let ids_to_move = if self.selected_columns.is_selected(dragged) {
            self.selected_column_ids()
        } else {
            vec![dragged.to_string()]
        };
        let request = MoveRequest {
            ids_to_move,
            from_index: from,
            to_index: to,
        };

        let moved = self.report(self.api.move_columns(&table_id, &request).await)?;
        let result = shift_columns(&mut self.header_columns, &mut self.rows, &moved.indexes, moved.delta);
        self.report(result.map(|()| Outcome::Applied))
    }

    /// Changes the data type of the column at `index`.
    ///
    /// The column is rebuilt and every cell in it is emptied; values are not
    /// converted. Choosing the type the column already has does nothing.
    pub async fn change_column_data_type(&mut self, index: usize, data_type: DataType) -> Result<Outcome, Error> {
        let Some(column) = self.header_columns.get(index) else {
            return Ok(Outcome::Skipped);
        };
        if column.data_type().same_variant(&data_type) {
            return Ok(Outcome::Skipped);
        }
        let Some(table_id) = self.loaded_table_id() else {
            return Ok(Outcome::Skipped);
        };

        let column_id = column.id().to_string();
        let request = PatchColumnRequest::change_data_type(data_type.id());
        let patched = self.report(self.api.patch_column(&table_id, &column_id, &request).await)?;
        let result = self.apply_column_data_type(patched, data_type);
        self.report(result)
    }

    fn apply_column_data_type(&mut self, patched: ColumnPatchedDto, requested: DataType) -> Result<Outcome, Error> {
        let index = patched.column_index;
        let Some(current) = self.header_columns.get(index) else {
            return Err(Error::reconciliation(format!(
                "patched column index {} is outside a table of {}",
                index,
                self.header_columns.len()
            )));
        };

        let data_type = match patched.data_type_id {
            Some(id) => DataType::from_id(id)?,
            None => requested,
        };
        let name = patched
            .column_name
            .unwrap_or_else(|| current.name().to_string());

        self.header_columns[index] = HeaderColumn::new(patched.id, name, data_type);
        for row in &mut self.rows {
            row.replace_cell(index, Cell::empty(data_type));
        }

        log::debug!("Column {} is now {}", index, data_type);
        Ok(Outcome::Applied)
    }

    /// Renames the column at `index`.
    pub async fn rename_column(&mut self, index: usize, name: impl Into<String>) -> Result<Outcome, Error> {
        let Some(column) = self.header_columns.get(index) else {
            return Ok(Outcome::Skipped);
        };
        let Some(table_id) = self.loaded_table_id() else {
            return Ok(Outcome::Skipped);
        };

        let column_id = column.id().to_string();
        let name = name.into();
        let request = PatchColumnRequest::rename(name.clone());
        let patched = self.report(self.api.patch_column(&table_id, &column_id, &request).await)?;

        let result = match self.header_columns.get_mut(patched.column_index) {
            Some(column) => {
                column.rename(patched.column_name.unwrap_or(name));
                Ok(Outcome::Applied)
            }
            None => Err(Error::reconciliation(format!(
                "renamed column index {} is outside a table of {}",
                patched.column_index,
                self.header_columns.len()
            ))),
        };
        self.report(result)
    }

    // =========================================================================
    // Rows
    // =========================================================================

    /// Adds an empty row at the end.
    pub async fn add_new_row(&mut self) -> Result<Outcome, Error> {
        self.create_row(CreateRowRequest::append()).await
    }

    /// Adds an empty row at `index` (`index <= row count`).
    pub async fn insert_new_row_at(&mut self, index: usize) -> Result<Outcome, Error> {
        if index > self.rows.len() {
            return Ok(Outcome::Skipped);
        }
        self.create_row(CreateRowRequest::insert_at(index)).await
    }

    /// Asks the server to clone the row at `index`, values included.
    pub async fn duplicate_row(&mut self, index: usize) -> Result<Outcome, Error> {
        if index >= self.rows.len() {
            return Ok(Outcome::Skipped);
        }
        self.create_row(CreateRowRequest::duplicate(index)).await
    }

    async fn create_row(&mut self, request: CreateRowRequest) -> Result<Outcome, Error> {
        let Some(table_id) = self.loaded_table_id() else {
            return Ok(Outcome::Skipped);
        };
        let created = self.report(self.api.create_row(&table_id, &request).await)?;
        let result = self.apply_created_row(created);
        self.report(result)
    }

    fn apply_created_row(&mut self, created: RowCreatedDto) -> Result<Outcome, Error> {
        let index = reconcile::insertion_index(self.rows.len(), created.row_index)?;
        if !created.cells_values.is_empty() && created.cells_values.len() != self.header_columns.len() {
            log::warn!(
                "Row {} came with {} values for {} columns",
                created.id,
                created.cells_values.len(),
                self.header_columns.len()
            );
        }

        let row = Row::from_values(created.id, &created.cells_values, &self.header_columns);
        self.rows.insert(index, row);

        log::debug!("Inserted row at {}", index);
        Ok(Outcome::Applied)
    }

    /// Deletes the row at `index`, or the whole row selection if that row is
    /// part of it.
    pub async fn delete_row(&mut self, index: usize) -> Result<Outcome, Error> {
        let Some(row) = self.rows.get(index) else {
            return Ok(Outcome::Skipped);
        };
        let ids = if self.selected_rows.is_selected(row.id()) {
            self.selected_row_ids()
        } else {
            vec![row.id().to_string()]
        };
        self.delete_rows_by_id(ids).await
    }

    pub async fn delete_selected_rows(&mut self) -> Result<Outcome, Error> {
        let ids = self.selected_row_ids();
        if ids.is_empty() {
            return Ok(Outcome::Skipped);
        }
        self.delete_rows_by_id(ids).await
    }

    async fn delete_rows_by_id(&mut self, ids: Vec<String>) -> Result<Outcome, Error> {
        let Some(table_id) = self.loaded_table_id() else {
            return Ok(Outcome::Skipped);
        };
        let deleted = self.report(self.api.delete_rows(&table_id, &IdsRequest { ids }).await)?;
        let result = self.apply_deleted_rows(&deleted.indexes);
        self.report(result)
    }

    fn apply_deleted_rows(&mut self, indexes: &[usize]) -> Result<Outcome, Error> {
        let order = reconcile::deletion_order(self.rows.len(), indexes)?;
        for index in order {
            let row = self.rows.remove(index);
            self.selected_rows.deselect(row.id());
        }
        log::debug!("Deleted rows at {:?}", indexes);
        Ok(Outcome::Applied)
    }

    /// Moves the row at `from` to `to`. A selected row drags the whole row
    /// selection along.
    pub async fn move_rows(&mut self, from: usize, to: usize) -> Result<Outcome, Error> {
        let len = self.rows.len();
        if from == to || from >= len || to >= len {
            return Ok(Outcome::Skipped);
        }
        let Some(table_id) = self.loaded_table_id() else {
            return Ok(Outcome::Skipped);
        };

        let dragged = self.rows[from].id();
        let ids_to_move = if self.selected_rows.is_selected(dragged) {
            self.selected_row_ids()
        } else {
            vec![dragged.to_string()]
        };
        let request = MoveRequest {
            ids_to_move,
            from_index: from,
            to_index: to,
        };

        let moved = self.report(self.api.move_rows(&table_id, &request).await)?;
        let result = ShiftPlan::new(self.rows.len(), &moved.indexes, moved.delta).map(|plan| {
            plan.apply(&mut self.rows);
            log::debug!("Shifted rows {:?} by {}", moved.indexes, moved.delta);
            Outcome::Applied
        });
        self.report(result)
    }

    // =========================================================================
    // Values
    // =========================================================================

    /// Writes `value` at `cord`, spreading over the selection as described
    /// by [`FanOut`](super::FanOut).
    ///
    /// Header coordinates rename that one column and never fan out.
    pub async fn set_cells_value(
        &mut self,
        cord: CellCord,
        value: impl Into<String>,
        data_type_id: i32,
    ) -> Result<Outcome, Error> {
        let value = value.into();
        let Some(row_index) = cord.row_index() else {
            return self.rename_column(cord.column_index(), value).await;
        };
        let Some(table_id) = self.loaded_table_id() else {
            return Ok(Outcome::Skipped);
        };

        let scope = EditScope {
            rows: &self.rows,
            columns: &self.header_columns,
            selected_rows: &self.selected_rows,
            selected_columns: &self.selected_columns,
        };
        let patches = scope.patches(row_index, cord.column_index(), &value, data_type_id);
        if patches.is_empty() {
            return Ok(Outcome::Skipped);
        }

        let patched = self.report(self.api.patch_cells(&table_id, &patches).await)?;
        self.apply_patched_cells(patched);
        Ok(Outcome::Applied)
    }

    /// Writes patched values by the reply's indices.
    ///
    /// The indices are trusted to still match the local table; an operation
    /// on another service instance in between can make them stale.
    fn apply_patched_cells(&mut self, patched: Vec<CellPatchedDto>) {
        for cell in patched {
            match self
                .rows
                .get_mut(cell.row_index)
                .and_then(|row| row.cell_mut(cell.column_index))
            {
                Some(target) => target.set_value(cell.value),
                None => log::warn!(
                    "Skipping patched cell ({}, {}) outside the table",
                    cell.row_index,
                    cell.column_index
                ),
            }
        }
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    fn loaded_table_id(&self) -> Option<String> {
        match self.state {
            LoadState::Loaded => self.table_id.clone(),
            _ => None,
        }
    }

    /// Selected row ids in table order.
    fn selected_row_ids(&self) -> Vec<String> {
        self.rows
            .iter()
            .filter(|row| self.selected_rows.is_selected(row.id()))
            .map(|row| row.id().to_string())
            .collect()
    }

    /// Selected column ids in table order.
    fn selected_column_ids(&self) -> Vec<String> {
        self.header_columns
            .iter()
            .filter(|column| self.selected_columns.is_selected(column.id()))
            .map(|column| column.id().to_string())
            .collect()
    }

    fn report<T>(&self, result: Result<T, Error>) -> Result<T, Error> {
        if let Err(error) = &result {
            log::warn!("Table operation failed: {}", error);
            if let Some(notifier) = &self.notifier {
                notifier.notify_error(error);
            }
        }
        result
    }
}

impl std::fmt::Debug for TableService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TableService")
            .field("table_id", &self.table_id)
            .field("state", &self.state)
            .field("columns", &self.header_columns.len())
            .field("rows", &self.rows.len())
            .finish()
    }
}

/// Applies one column shift to the header and to every row.
///
/// All rows must have one cell per column; otherwise nothing is touched.
fn shift_columns(
    header_columns: &mut Vec<HeaderColumn>,
    rows: &mut [Row],
    indexes: &[usize],
    delta: i64,
) -> Result<(), Error> {
    let width = header_columns.len();
    let plan = ShiftPlan::new(width, indexes, delta)?;
    if let Some(row) = rows.iter().find(|row| row.len() != width) {
        return Err(Error::reconciliation(format!(
            "row {} has {} cells for {} columns",
            row.id(),
            row.len(),
            width
        )));
    }

    plan.apply(header_columns);
    for row in rows {
        plan.apply(row.cells_mut());
    }
    log::debug!("Shifted columns {:?} by {}", indexes, delta);
    Ok(())
}

/// Builds the local model from a fetched table.
fn content_from_dto(table: TableDto) -> Result<(Vec<HeaderColumn>, Vec<Row>), Error> {
    let header_columns = table
        .header
        .into_iter()
        .map(|column| {
            let data_type = DataType::from_id(column.data_type_id)?;
            Ok(HeaderColumn::new(column.id, column.column_name, data_type))
        })
        .collect::<Result<Vec<_>, Error>>()?;

    let rows = table
        .content
        .into_iter()
        .map(|row| {
            if row.cells_values.len() != header_columns.len() {
                log::warn!(
                    "Row {} has {} values for {} columns, aligning",
                    row.id,
                    row.cells_values.len(),
                    header_columns.len()
                );
            }
            Row::from_values(row.id, &row.cells_values, &header_columns)
        })
        .collect();

    Ok((header_columns, rows))
}
