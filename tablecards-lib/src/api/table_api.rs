//! The backend seam used by the table service.

use async_trait::async_trait;

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
use crate::TableCardsClient;
use crate::error::Error;
use crate::model::DataType;

/// Remote table storage as seen by [`TableService`](crate::service::TableService).
///
/// [`TableCardsClient`] is the HTTP implementation. Every mutating call
/// returns enough (id, index, delta) to update a local copy without
/// re-fetching the table.
#[async_trait]
pub trait TableApi: Send + Sync {
    async fn table_content(&self, table_id: &str) -> Result<TableDto, Error>;

    async fn create_row(&self, table_id: &str, request: &CreateRowRequest) -> Result<RowCreatedDto, Error>;

    async fn create_column(&self, table_id: &str, request: &CreateColumnRequest) -> Result<ColumnCreatedDto, Error>;

    async fn patch_column(
        &self,
        table_id: &str,
        column_id: &str,
        request: &PatchColumnRequest,
    ) -> Result<ColumnPatchedDto, Error>;

    async fn patch_cells(&self, table_id: &str, cells: &[PatchCellRequest]) -> Result<Vec<CellPatchedDto>, Error>;

    async fn delete_rows(&self, table_id: &str, request: &IdsRequest) -> Result<DeletedDto, Error>;

    async fn delete_columns(&self, table_id: &str, request: &IdsRequest) -> Result<DeletedDto, Error>;

    async fn move_rows(&self, table_id: &str, request: &MoveRequest) -> Result<MovedDto, Error>;

    async fn move_columns(&self, table_id: &str, request: &MoveRequest) -> Result<MovedDto, Error>;

    async fn data_types(&self, term: &str) -> Result<Vec<DataType>, Error>;
}

#[async_trait]
impl TableApi for TableCardsClient {
    async fn table_content(&self, table_id: &str) -> Result<TableDto, Error> {
        TableCardsClient::table_content(self, table_id).await
    }

    async fn create_row(&self, table_id: &str, request: &CreateRowRequest) -> Result<RowCreatedDto, Error> {
        TableCardsClient::create_row(self, table_id, request).await
    }

    async fn create_column(&self, table_id: &str, request: &CreateColumnRequest) -> Result<ColumnCreatedDto, Error> {
        TableCardsClient::create_column(self, table_id, request).await
    }

    async fn patch_column(
        &self,
        table_id: &str,
        column_id: &str,
        request: &PatchColumnRequest,
    ) -> Result<ColumnPatchedDto, Error> {
        TableCardsClient::patch_column(self, table_id, column_id, request).await
    }

    async fn patch_cells(&self, table_id: &str, cells: &[PatchCellRequest]) -> Result<Vec<CellPatchedDto>, Error> {
        TableCardsClient::patch_cells(self, table_id, cells).await
    }

    async fn delete_rows(&self, table_id: &str, request: &IdsRequest) -> Result<DeletedDto, Error> {
        TableCardsClient::delete_rows(self, table_id, request).await
    }

    async fn delete_columns(&self, table_id: &str, request: &IdsRequest) -> Result<DeletedDto, Error> {
        TableCardsClient::delete_columns(self, table_id, request).await
    }

    async fn move_rows(&self, table_id: &str, request: &MoveRequest) -> Result<MovedDto, Error> {
        TableCardsClient::move_rows(self, table_id, request).await
    }

    async fn move_columns(&self, table_id: &str, request: &MoveRequest) -> Result<MovedDto, Error> {
        TableCardsClient::move_columns(self, table_id, request).await
    }

    async fn data_types(&self, term: &str) -> Result<Vec<DataType>, Error> {
        TableCardsClient::data_types(self, term).await
    }
}
