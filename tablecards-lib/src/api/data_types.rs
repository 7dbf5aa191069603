//! Data-type catalog

use reqwest::Method;

use super::dto::DataTypeDto;
use super::request::NO_BODY;
use crate::TableCardsClient;
use crate::error::Error;
use crate::model::DataType;

impl TableCardsClient {
    /// Raw catalog entries matching `term` (empty term lists everything).
    pub async fn data_type_catalog(&self, term: &str) -> Result<Vec<DataTypeDto>, Error> {
        let url = self.build_url_with_query("/data-type", &[("term", term)])?;
        self.request_json(Method::GET, &url, NO_BODY).await
    }

    /// Catalog entries resolved through the [`DataType`] registry.
    ///
    /// Fails with [`Error::UnknownDataType`] if the backend lists an id this
    /// client does not know.
    pub async fn data_types(&self, term: &str) -> Result<Vec<DataType>, Error> {
        self.data_type_catalog(term)
            .await?
            .into_iter()
            .map(|dto| DataType::from_id(dto.id).map_err(Error::from))
            .collect()
    }
}
