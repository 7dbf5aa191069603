//! Wire types exchanged with the table-storage backend.
//!
//! Field names follow the backend's camelCase JSON. Indices are positions
//! inside the table as the server sees it when answering.

use serde::Deserialize;
use serde::Serialize;

// =============================================================================
// Table content
// =============================================================================

/// Whole table content, as returned by `GET /tables/{id}/content`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableDto {
    pub id: String,
    #[serde(default)]
    pub header: Vec<ColumnDto>,
    #[serde(default)]
    pub content: Vec<RowDto>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnDto {
    pub id: String,
    #[serde(default)]
    pub column_name: String,
    pub data_type_id: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RowDto {
    pub id: String,
    #[serde(default)]
    pub cells_values: Vec<Option<String>>,
}

// =============================================================================
// Rows and columns
// =============================================================================

/// Body of `POST /tables/{id}/content/rows`.
///
/// A `None` index appends. With `duplicate` set, `row_index` names the row
/// to clone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRowRequest {
    pub row_index: Option<usize>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub duplicate: bool,
}

impl CreateRowRequest {
    pub fn append() -> Self {
        Self {
            row_index: None,
            duplicate: false,
        }
    }

    pub fn insert_at(index: usize) -> Self {
        Self {
            row_index: Some(index),
            duplicate: false,
        }
    }

    pub fn duplicate(index: usize) -> Self {
        Self {
            row_index: Some(index),
            duplicate: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RowCreatedDto {
    pub id: String,
    pub table_id: String,
    pub row_index: usize,
    #[serde(default)]
    pub cells_values: Vec<Option<String>>,
}

/// Body of `POST /tables/{id}/content/columns`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateColumnRequest {
    pub data_type_id: i32,
    pub column_index: Option<usize>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub duplicate: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnCreatedDto {
    pub id: String,
    pub table_id: String,
    pub data_type_id: i32,
    pub column_index: usize,
    #[serde(default)]
    pub column_name: String,
    #[serde(default)]
    pub cells_values: Vec<Option<String>>,
}

/// Body of `PATCH /tables/{id}/content/columns/{columnId}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatchColumnRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_type_id: Option<i32>,
}

impl PatchColumnRequest {
    pub fn rename(name: impl Into<String>) -> Self {
        Self {
            column_name: Some(name.into()),
            data_type_id: None,
        }
    }

    pub fn change_data_type(data_type_id: i32) -> Self {
        Self {
            column_name: None,
            data_type_id: Some(data_type_id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnPatchedDto {
    pub id: String,
    pub column_index: usize,
    #[serde(default)]
    pub column_name: Option<String>,
    #[serde(default)]
    pub data_type_id: Option<i32>,
}

// =============================================================================
// Cells
// =============================================================================

/// One item of the `PATCH /tables/{id}/content/cells` body.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatchCellRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column_id: Option<String>,
    pub data_type_id: i32,
    pub new_value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellPatchedDto {
    pub row_index: usize,
    pub column_index: usize,
    pub value: Option<String>,
}

// =============================================================================
// Delete and move
// =============================================================================

/// Body of the row/column `DELETE` routes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdsRequest {
    pub ids: Vec<String>,
}

/// Indices actually removed by a delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletedDto {
    pub indexes: Vec<usize>,
}

/// Body of the row/column move (`PATCH`) routes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveRequest {
    pub ids_to_move: Vec<String>,
    pub from_index: usize,
    pub to_index: usize,
}

/// Result of a move: every listed index is shifted by `delta`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovedDto {
    pub indexes: Vec<usize>,
    pub delta: i64,
}

// =============================================================================
// Catalog and table cards
// =============================================================================

/// Entry of the `GET /data-type` catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataTypeDto {
    pub id: i32,
    pub name: String,
}

/// A table as listed on the home dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableCardDto {
    pub id: String,
    pub name: String,
}

/// Body of the table-card create/rename routes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableCardRequest {
    pub name: String,
}
