//! Body and header cells

use super::DataType;
use super::TypedValue;
use super::ValueError;

/// A single value in a row, or the name of a column.
///
/// The value is always a plain string (or nothing); its meaning comes from
/// the cell's [`DataType`].
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    value: Option<String>,
    data_type: DataType,
}

impl Cell {
    /// Creates a cell holding `value`.
    pub fn new(value: Option<String>, data_type: DataType) -> Self {
        Self { value, data_type }
    }

    /// Creates an empty cell.
    pub fn empty(data_type: DataType) -> Self {
        Self {
            value: None,
            data_type,
        }
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub fn set_value(&mut self, value: Option<String>) {
        self.value = value;
    }

    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    /// The value parsed through the cell's data type, `None` when empty.
    pub fn typed_value(&self) -> Option<Result<TypedValue, ValueError>> {
        self.value.as_deref().map(|value| self.data_type.parse(value))
    }

    /// The value formatted for display, empty string when unset.
    pub fn display_value(&self) -> String {
        self.value
            .as_deref()
            .map(|value| self.data_type.format(value))
            .unwrap_or_default()
    }
}

/// The cell at the top of a column.
///
/// Its own value is the column name, edited as text. The data type of the
/// column beneath it is fixed at construction; changing a column's type
/// builds a new [`HeaderColumn`](super::HeaderColumn).
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderCell {
    cell: Cell,
    column_data_type: DataType,
}

impl HeaderCell {
    pub fn new(name: impl Into<String>, column_data_type: DataType) -> Self {
        Self {
            cell: Cell::new(Some(name.into()), DataType::Textual),
            column_data_type,
        }
    }

    /// Column name, empty if the server never sent one.
    pub fn name(&self) -> &str {
        self.cell.value().unwrap_or_default()
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.cell.set_value(Some(name.into()));
    }

    /// Data type of every cell in this column.
    pub fn column_data_type(&self) -> DataType {
        self.column_data_type
    }

    /// The underlying text cell holding the name.
    pub fn as_cell(&self) -> &Cell {
        &self.cell
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_value() {
        let mut cell = Cell::empty(DataType::Monetary);
        assert_eq!(cell.value(), None);
        assert!(cell.typed_value().is_none());
        assert_eq!(cell.display_value(), "");

        cell.set_value(Some("3.5".to_string()));
        assert_eq!(cell.value(), Some("3.5"));
        assert_eq!(cell.display_value(), "3.50");
        assert!(cell.typed_value().unwrap().is_ok());
    }

    #[test]
    fn test_header_cell() {
        let mut header = HeaderCell::new("Price", DataType::Monetary);
        assert_eq!(header.name(), "Price");
        assert_eq!(header.column_data_type(), DataType::Monetary);
        assert_eq!(header.as_cell().data_type(), DataType::Textual);

        header.set_name("Cost");
        assert_eq!(header.name(), "Cost");
        assert_eq!(header.column_data_type(), DataType::Monetary);
    }
}
