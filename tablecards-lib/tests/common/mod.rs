//! In-process table backend used by the service tests.
//!
//! Keeps its own copy of the table, answers the way the real server does
//! and records every call it receives.

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use tablecards_lib::api::TableApi;
use tablecards_lib::api::dto::*;
use tablecards_lib::error::ApiError;
use tablecards_lib::error::Error;
use tablecards_lib::error::ServerErrorDetail;
use tablecards_lib::model::DataType;
use tablecards_lib::service::Notifier;

pub const TABLE_ID: &str = "table-1";

/// One call received by the backend.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    TableContent(String),
    CreateRow(CreateRowRequest),
    CreateColumn(CreateColumnRequest),
    PatchColumn(String, PatchColumnRequest),
    PatchCells(Vec<PatchCellRequest>),
    DeleteRows(IdsRequest),
    DeleteColumns(IdsRequest),
    MoveRows(MoveRequest),
    MoveColumns(MoveRequest),
    DataTypes(String),
}

/// Which indices a move reply lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MoveReply {
    /// The moved entities, shifted by the move distance.
    #[default]
    Moved,
    /// The displaced neighbours, shifted the other way by the block size.
    Neighbours,
}

#[derive(Default)]
struct State {
    columns: Vec<ColumnDto>,
    rows: Vec<RowDto>,
    calls: Vec<Call>,
    fail_next: Option<(u16, String)>,
    move_reply: MoveReply,
    forced_move: Option<MovedDto>,
    forced_delete: Option<DeletedDto>,
}

#[derive(Default)]
pub struct FakeBackend {
    state: Mutex<State>,
}

impl FakeBackend {
    /// A table whose columns are `c0, c1, ..` and rows `r0, r1, ..`.
    pub fn with_table(columns: &[(&str, DataType)], rows: &[&[Option<&str>]]) -> Self {
        let columns = columns
            .iter()
            .enumerate()
            .map(|(i, (name, data_type))| ColumnDto {
                id: format!("c{}", i),
                column_name: name.to_string(),
                data_type_id: data_type.id(),
            })
            .collect();
        let rows = rows
            .iter()
            .enumerate()
            .map(|(i, values)| RowDto {
                id: format!("r{}", i),
                cells_values: values.iter().map(|v| v.map(str::to_string)).collect(),
            })
            .collect();

        Self {
            state: Mutex::new(State {
                columns,
                rows,
                ..State::default()
            }),
        }
    }

    /// Two text columns `A`, `B` and two rows of values.
    pub fn two_by_two() -> Self {
        Self::with_table(
            &[("A", DataType::Textual), ("B", DataType::Textual)],
            &[&[Some("a0"), Some("b0")], &[Some("a1"), Some("b1")]],
        )
    }

    /// `n` rows holding `v0..`, in a single text column.
    pub fn single_column(n: usize) -> Self {
        let values: Vec<Vec<Option<String>>> = (0..n).map(|i| vec![Some(format!("v{}", i))]).collect();
        let backend = Self::with_table(&[("Value", DataType::Textual)], &[]);
        {
            let mut state = backend.lock();
            state.rows = values
                .into_iter()
                .enumerate()
                .map(|(i, cells_values)| RowDto {
                    id: format!("r{}", i),
                    cells_values,
                })
                .collect();
        }
        backend
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    /// Rejects the next call with `status`.
    pub fn fail_next(&self, status: u16, message: &str) {
        self.lock().fail_next = Some((status, message.to_string()));
    }

    pub fn set_move_reply(&self, reply: MoveReply) {
        self.lock().move_reply = reply;
    }

    /// Answers the next move with `reply` instead of computing one.
    pub fn force_move_reply(&self, reply: MovedDto) {
        self.lock().forced_move = Some(reply);
    }

    /// Answers the next row or column delete with `reply` and keeps the table.
    pub fn force_delete_reply(&self, reply: DeletedDto) {
        self.lock().forced_delete = Some(reply);
    }

    /// Stores a raw type id on the column at `index`, registered or not.
    pub fn set_column_type_id(&self, index: usize, data_type_id: i32) {
        self.lock().columns[index].data_type_id = data_type_id;
    }

    pub fn calls(&self) -> Vec<Call> {
        self.lock().calls.clone()
    }

    /// Calls other than the initial load.
    pub fn mutating_calls(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|call| !matches!(call, Call::TableContent(_)))
            .collect()
    }

    pub fn row_ids(&self) -> Vec<String> {
        self.lock().rows.iter().map(|row| row.id.clone()).collect()
    }

    pub fn column_ids(&self) -> Vec<String> {
        self.lock().columns.iter().map(|column| column.id.clone()).collect()
    }

    pub fn values(&self) -> Vec<Vec<Option<String>>> {
        self.lock().rows.iter().map(|row| row.cells_values.clone()).collect()
    }

    /// Records `call` and returns the pending failure, if any.
    fn begin(&self, call: Call) -> Result<std::sync::MutexGuard<'_, State>, Error> {
        let mut state = self.lock();
        state.calls.push(call);
        match state.fail_next.take() {
            Some((status, message)) => {
                let detail = ServerErrorDetail::new(message.clone());
                Err(Error::Api(ApiError::http_with_detail(status, message, detail)))
            }
            None => Ok(state),
        }
    }
}

fn bad_request(message: impl Into<String>) -> Error {
    Error::Api(ApiError::http(400, message))
}

fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

fn position<T>(items: &[T], id: &str, id_of: impl Fn(&T) -> &str) -> Result<usize, Error> {
    items
        .iter()
        .position(|item| id_of(item) == id)
        .ok_or_else(|| bad_request(format!("unknown id {}", id)))
}

/// Moves the contiguous block at `indexes` by `to - from`, clamped to the
/// list, and returns the reply listing either side of the move.
fn move_block<T>(items: &mut Vec<T>, indexes: &[usize], from: usize, to: usize, reply: MoveReply) -> MovedDto {
    let (Some(&first), Some(&last)) = (indexes.first(), indexes.last()) else {
        return MovedDto {
            indexes: Vec::new(),
            delta: 0,
        };
    };
    let size = last - first + 1;
    let wanted = first as i64 + (to as i64 - from as i64);
    let start = wanted.clamp(0, (items.len() - size) as i64) as usize;
    let delta = start as i64 - first as i64;

    let block: Vec<T> = items.drain(first..=last).collect();
    for (offset, item) in block.into_iter().enumerate() {
        items.insert(start + offset, item);
    }

    match reply {
        MoveReply::Moved => MovedDto {
            indexes: indexes.to_vec(),
            delta,
        },
        MoveReply::Neighbours => {
            let neighbours: Vec<usize> = if delta > 0 {
                (last + 1..=last + delta as usize).collect()
            } else {
                (start..first).collect()
            };
            let shift = if delta > 0 { -(size as i64) } else { size as i64 };
            MovedDto {
                indexes: neighbours,
                delta: shift,
            }
        }
    }
}

#[async_trait]
impl TableApi for FakeBackend {
    async fn table_content(&self, table_id: &str) -> Result<TableDto, Error> {
        let state = self.begin(Call::TableContent(table_id.to_string()))?;
        if table_id != TABLE_ID {
            return Err(Error::Api(ApiError::http(404, "Table not found")));
        }
        Ok(TableDto {
            id: table_id.to_string(),
            header: state.columns.clone(),
            content: state.rows.clone(),
        })
    }

    async fn create_row(&self, table_id: &str, request: &CreateRowRequest) -> Result<RowCreatedDto, Error> {
        let mut state = self.begin(Call::CreateRow(request.clone()))?;
        let len = state.rows.len();

        let (index, cells_values) = if request.duplicate {
            let source = request
                .row_index
                .filter(|&i| i < len)
                .ok_or_else(|| bad_request("no row to duplicate"))?;
            (source + 1, state.rows[source].cells_values.clone())
        } else {
            let index = request.row_index.unwrap_or(len);
            if index > len {
                return Err(bad_request("row index out of range"));
            }
            (index, vec![None; state.columns.len()])
        };

        let row = RowDto {
            id: new_id(),
            cells_values: cells_values.clone(),
        };
        let id = row.id.clone();
        state.rows.insert(index, row);

        Ok(RowCreatedDto {
            id,
            table_id: table_id.to_string(),
            row_index: index,
            cells_values,
        })
    }

    async fn create_column(&self, table_id: &str, request: &CreateColumnRequest) -> Result<ColumnCreatedDto, Error> {
        let mut state = self.begin(Call::CreateColumn(request.clone()))?;
        let len = state.columns.len();

        let (index, column_name, cells_values) = if request.duplicate {
            let source = request
                .column_index
                .filter(|&i| i < len)
                .ok_or_else(|| bad_request("no column to duplicate"))?;
            let values = state
                .rows
                .iter()
                .map(|row| row.cells_values.get(source).cloned().flatten())
                .collect();
            (source + 1, format!("{} copy", state.columns[source].column_name), values)
        } else {
            let index = request.column_index.unwrap_or(len);
            if index > len {
                return Err(bad_request("column index out of range"));
            }
            (index, format!("Column {}", len + 1), Vec::new())
        };

        let id = new_id();
        state.columns.insert(
            index,
            ColumnDto {
                id: id.clone(),
                column_name: column_name.clone(),
                data_type_id: request.data_type_id,
            },
        );
        for (position, row) in state.rows.iter_mut().enumerate() {
            let value = cells_values.get(position).cloned().flatten();
            row.cells_values.insert(index, value);
        }

        Ok(ColumnCreatedDto {
            id,
            table_id: table_id.to_string(),
            data_type_id: request.data_type_id,
            column_index: index,
            column_name,
            cells_values,
        })
    }

    async fn patch_column(
        &self,
        _table_id: &str,
        column_id: &str,
        request: &PatchColumnRequest,
    ) -> Result<ColumnPatchedDto, Error> {
        let mut state = self.begin(Call::PatchColumn(column_id.to_string(), request.clone()))?;
        let index = position(&state.columns, column_id, |c| c.id.as_str())?;

        if let Some(name) = &request.column_name {
            state.columns[index].column_name = name.clone();
        }
        if let Some(data_type_id) = request.data_type_id {
            state.columns[index].data_type_id = data_type_id;
            for row in &mut state.rows {
                row.cells_values[index] = None;
            }
        }

        let column = &state.columns[index];
        Ok(ColumnPatchedDto {
            id: column.id.clone(),
            column_index: index,
            column_name: Some(column.column_name.clone()),
            data_type_id: Some(column.data_type_id),
        })
    }

    async fn patch_cells(&self, _table_id: &str, cells: &[PatchCellRequest]) -> Result<Vec<CellPatchedDto>, Error> {
        let mut state = self.begin(Call::PatchCells(cells.to_vec()))?;

        let mut patched = Vec::new();
        for cell in cells {
            let (Some(row_id), Some(column_id)) = (&cell.row_id, &cell.column_id) else {
                return Err(bad_request("cell patch needs a row and a column"));
            };
            let row_index = position(&state.rows, row_id, |r| r.id.as_str())?;
            let column_index = position(&state.columns, column_id, |c| c.id.as_str())?;
            state.rows[row_index].cells_values[column_index] = Some(cell.new_value.clone());
            patched.push(CellPatchedDto {
                row_index,
                column_index,
                value: Some(cell.new_value.clone()),
            });
        }
        Ok(patched)
    }

    async fn delete_rows(&self, _table_id: &str, request: &IdsRequest) -> Result<DeletedDto, Error> {
        let mut state = self.begin(Call::DeleteRows(request.clone()))?;
        if let Some(reply) = state.forced_delete.take() {
            return Ok(reply);
        }

        let mut indexes = request
            .ids
            .iter()
            .map(|id| position(&state.rows, id, |r| r.id.as_str()))
            .collect::<Result<Vec<_>, _>>()?;
        indexes.sort_unstable();
        for &index in indexes.iter().rev() {
            state.rows.remove(index);
        }
        Ok(DeletedDto { indexes })
    }

    async fn delete_columns(&self, _table_id: &str, request: &IdsRequest) -> Result<DeletedDto, Error> {
        let mut state = self.begin(Call::DeleteColumns(request.clone()))?;
        if let Some(reply) = state.forced_delete.take() {
            return Ok(reply);
        }

        let mut indexes = request
            .ids
            .iter()
            .map(|id| position(&state.columns, id, |c| c.id.as_str()))
            .collect::<Result<Vec<_>, _>>()?;
        indexes.sort_unstable();
        for &index in indexes.iter().rev() {
            state.columns.remove(index);
            for row in &mut state.rows {
                row.cells_values.remove(index);
            }
        }
        Ok(DeletedDto { indexes })
    }

    async fn move_rows(&self, _table_id: &str, request: &MoveRequest) -> Result<MovedDto, Error> {
        let mut state = self.begin(Call::MoveRows(request.clone()))?;
        if let Some(reply) = state.forced_move.take() {
            return Ok(reply);
        }

        let mut indexes = request
            .ids_to_move
            .iter()
            .map(|id| position(&state.rows, id, |r| r.id.as_str()))
            .collect::<Result<Vec<_>, _>>()?;
        indexes.sort_unstable();
        let reply = state.move_reply;
        Ok(move_block(
            &mut state.rows,
            &indexes,
            request.from_index,
            request.to_index,
            reply,
        ))
    }

    async fn move_columns(&self, _table_id: &str, request: &MoveRequest) -> Result<MovedDto, Error> {
        let mut state = self.begin(Call::MoveColumns(request.clone()))?;
        if let Some(reply) = state.forced_move.take() {
            return Ok(reply);
        }

        let mut indexes = request
            .ids_to_move
            .iter()
            .map(|id| position(&state.columns, id, |c| c.id.as_str()))
            .collect::<Result<Vec<_>, _>>()?;
        indexes.sort_unstable();
        let reply = state.move_reply;
        let State { columns, rows, .. } = &mut *state;

        let mut order: Vec<usize> = (0..columns.len()).collect();
        let moved = move_block(&mut order, &indexes, request.from_index, request.to_index, reply);

        let old_columns = std::mem::take(columns);
        *columns = order.iter().map(|&i| old_columns[i].clone()).collect();
        for row in rows.iter_mut() {
            let old = std::mem::take(&mut row.cells_values);
            row.cells_values = order.iter().map(|&i| old[i].clone()).collect();
        }
        Ok(moved)
    }

    async fn data_types(&self, term: &str) -> Result<Vec<DataType>, Error> {
        let _state = self.begin(Call::DataTypes(term.to_string()))?;
        let term = term.to_lowercase();
        Ok(DataType::ALL
            .into_iter()
            .filter(|data_type| data_type.name().to_lowercase().contains(&term))
            .collect())
    }
}

/// Notifier that keeps the messages it receives. Clones share the list.
#[derive(Clone, Default)]
pub struct RecordingNotifier {
    messages: Arc<Mutex<Vec<String>>>,
}

impl RecordingNotifier {
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify_error(&self, error: &Error) {
        self.messages.lock().unwrap().push(error.user_message());
    }
}
