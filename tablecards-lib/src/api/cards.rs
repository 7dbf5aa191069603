//! Table cards shown on the home dashboard

use reqwest::Method;

use super::dto::TableCardDto;
use super::dto::TableCardRequest;
use super::request::NO_BODY;
use super::request::segment;
use crate::TableCardsClient;
use crate::error::Error;

impl TableCardsClient {
    /// Lists the signed-in user's tables.
    pub async fn table_cards(&self) -> Result<Vec<TableCardDto>, Error> {
        let url = self.build_url("/tables");
        self.request_json(Method::GET, &url, NO_BODY).await
    }

    /// Creates an empty table.
    pub async fn create_table_card(&self, name: impl Into<String>) -> Result<TableCardDto, Error> {
        let url = self.build_url("/tables");
        let body = TableCardRequest { name: name.into() };
        self.request_json(Method::POST, &url, Some(&body)).await
    }

    /// Renames a table.
    pub async fn rename_table_card(&self, table_id: &str, name: impl Into<String>) -> Result<TableCardDto, Error> {
        let url = self.build_url(&format!("/tables/{}", segment(table_id)));
        let body = TableCardRequest { name: name.into() };
        self.request_json(Method::PATCH, &url, Some(&body)).await
    }

    /// Deletes a table and all of its content.
    pub async fn delete_table_card(&self, table_id: &str) -> Result<(), Error> {
        let url = self.build_url(&format!("/tables/{}", segment(table_id)));
        self.request(Method::DELETE, &url, NO_BODY).await?;
        Ok(())
    }
}
