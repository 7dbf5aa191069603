//! Cell coordinates

/// Row index reported for header cells.
pub const HEADER_ROW_INDEX: isize = -1;

/// Identifies one cell: either a header cell (column only) or a body cell
/// (row and column).
///
/// # Example
///
/// ```
/// use tablecards_lib::model::CellCord;
///
/// let cord = CellCord::new(4, 2, true);
/// assert!(cord.is_header_cell());
/// assert_eq!(cord.row_index(), None);
/// assert_eq!(cord.raw_row_index(), -1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellCord {
    row_index: Option<usize>,
    column_index: usize,
}

impl CellCord {
    /// Creates a coordinate. The row index is discarded when `is_header_cell` is set.
    pub fn new(row_index: usize, column_index: usize, is_header_cell: bool) -> Self {
        if is_header_cell {
            Self::header(column_index)
        } else {
            Self::body(row_index, column_index)
        }
    }

    /// Coordinate of the header cell above `column_index`.
    pub fn header(column_index: usize) -> Self {
        Self {
            row_index: None,
            column_index,
        }
    }

    /// Coordinate of a body cell.
    pub fn body(row_index: usize, column_index: usize) -> Self {
        Self {
            row_index: Some(row_index),
            column_index,
        }
    }

    pub fn is_header_cell(&self) -> bool {
        self.row_index.is_none()
    }

    /// Row index, `None` for header cells.
    pub fn row_index(&self) -> Option<usize> {
        self.row_index
    }

    /// Row index with header cells mapped to [`HEADER_ROW_INDEX`].
    pub fn raw_row_index(&self) -> isize {
        self.row_index
            .and_then(|row| isize::try_from(row).ok())
            .unwrap_or(HEADER_ROW_INDEX)
    }

    pub fn column_index(&self) -> usize {
        self.column_index
    }
}

impl std::fmt::Display for CellCord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.raw_row_index(), self.column_index)
    }
}
