//! Column descriptors

use super::DataType;
use super::HeaderCell;

/// One column of a table: its server id and its header cell.
///
/// The column at position `i` owns the cell at position `i` of every row.
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderColumn {
    id: String,
    header_cell: HeaderCell,
}

impl HeaderColumn {
    pub fn new(id: impl Into<String>, name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            id: id.into(),
            header_cell: HeaderCell::new(name, data_type),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        self.header_cell.name()
    }

    pub fn rename(&mut self, name: impl Into<String>) {
        self.header_cell.set_name(name);
    }

    pub fn data_type(&self) -> DataType {
        self.header_cell.column_data_type()
    }

    pub fn header_cell(&self) -> &HeaderCell {
        &self.header_cell
    }
}
