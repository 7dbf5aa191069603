//! Table content routes
//!
//! Every method maps to exactly one call under `/tables/{tableId}/content`
//! and returns the server's reply unchanged. Callers reconcile local state
//! from it; nothing here keeps state.

use reqwest::Method;

use super::dto::CellPatchedDto;
use super::dto::ColumnCreatedDto;
use super::dto::ColumnPatchedDto;
use super::dto::CreateColumnRequest;
use super::dto::CreateRowRequest;
use super::dto::DeletedDto;
use super::dto::IdsRequest;
use super::dto::MoveRequest;
use super::dto::MovedDto;
use super::dto::PatchCellRequest;
use super::dto::PatchColumnRequest;
use super::dto::RowCreatedDto;
use super::dto::TableDto;
use super::request::NO_BODY;
use super::request::segment;
use crate::TableCardsClient;
use crate::error::Error;

impl TableCardsClient {
    fn content_url(&self, table_id: &str, rest: &str) -> String {
        self.build_url(&format!("/tables/{}/content{}", segment(table_id), rest))
    }

    /// Fetches the whole table.
    pub async fn table_content(&self, table_id: &str) -> Result<TableDto, Error> {
        let url = self.content_url(table_id, "");
        self.request_json(Method::GET, &url, NO_BODY).await
    }

    /// Creates (or duplicates) a row.
    pub async fn create_row(&self, table_id: &str, request: &CreateRowRequest) -> Result<RowCreatedDto, Error> {
        let url = self.content_url(table_id, "/rows");
        self.request_json(Method::POST, &url, Some(request)).await
    }

    /// Creates (or duplicates) a column.
    pub async fn create_column(
        &self,
        table_id: &str,
        request: &CreateColumnRequest,
    ) -> Result<ColumnCreatedDto, Error> {
        let url = self.content_url(table_id, "/columns");
        self.request_json(Method::POST, &url, Some(request)).await
    }

    /// Renames a column or changes its data type.
    pub async fn patch_column(
        &self,
        table_id: &str,
        column_id: &str,
        request: &PatchColumnRequest,
    ) -> Result<ColumnPatchedDto, Error> {
        let url = self.content_url(table_id, &format!("/columns/{}", segment(column_id)));
        self.request_json(Method::PATCH, &url, Some(request)).await
    }

    /// Writes cell values in one batch.
    pub async fn patch_cells(
        &self,
        table_id: &str,
        cells: &[PatchCellRequest],
    ) -> Result<Vec<CellPatchedDto>, Error> {
        let url = self.content_url(table_id, "/cells");
        self.request_json(Method::PATCH, &url, Some(cells)).await
    }

    /// Deletes rows by id.
    pub async fn delete_rows(&self, table_id: &str, request: &IdsRequest) -> Result<DeletedDto, Error> {
        let url = self.content_url(table_id, "/rows");
        self.request_json(Method::DELETE, &url, Some(request)).await
    }

    /// Deletes columns by id.
    pub async fn delete_columns(&self, table_id: &str, request: &IdsRequest) -> Result<DeletedDto, Error> {
        let url = self.content_url(table_id, "/columns");
        self.request_json(Method::DELETE, &url, Some(request)).await
    }

    /// Moves rows.
    pub async fn move_rows(&self, table_id: &str, request: &MoveRequest) -> Result<MovedDto, Error> {
        let url = self.content_url(table_id, "/rows");
        self.request_json(Method::PATCH, &url, Some(request)).await
    }

    /// Moves columns.
    pub async fn move_columns(&self, table_id: &str, request: &MoveRequest) -> Result<MovedDto, Error> {
        let url = self.content_url(table_id, "/columns");
        self.request_json(Method::PATCH, &url, Some(request)).await
    }
}
