//! Request plumbing shared by every route.

use reqwest::Method;
use reqwest::header::ACCEPT;
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

use crate::TableCardsClient;
use crate::error::ApiError;
use crate::error::Error;

impl TableCardsClient {
    /// Joins `path` onto the base URL.
    pub(crate) fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.inner.base_url, path)
    }

    /// Joins `path` onto the base URL and appends query pairs.
    pub(crate) fn build_url_with_query(&self, path: &str, query: &[(&str, &str)]) -> Result<String, Error> {
        let mut url = Url::parse(&self.build_url(path))
            .map_err(|e| ApiError::InvalidUrl(format!("{}: {}", path, e)))?;
        url.query_pairs_mut().extend_pairs(query);
        Ok(url.into())
    }

    /// Sends a request and decodes the JSON reply.
    pub(crate) async fn request_json<B, T>(&self, method: Method, url: &str, body: Option<&B>) -> Result<T, Error>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.request(method, url, body).await?;
        let text = response.text().await.map_err(ApiError::from)?;
        serde_json::from_str(&text).map_err(|e| Error::Api(ApiError::parse_with_body(e.to_string(), text)))
    }

    /// Sends a single authenticated request.
    ///
    /// Non-success replies become [`ApiError::Http`]; there is no retry.
    pub(crate) async fn request<B>(&self, method: Method, url: &str, body: Option<&B>) -> Result<reqwest::Response, Error>
    where
        B: Serialize + ?Sized,
    {
        let token = self.inner.token_provider.get_token().await?;

        log::debug!("{} {}", method, url);

        let mut request = self
            .inner
            .http_client
            .request(method.clone(), url)
            .header(ACCEPT, "application/json")
            .bearer_auth(&token.access_token);

        if let Some(timeout) = self.inner.timeout {
            request = request.timeout(timeout);
        }

        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| match self.inner.timeout {
            Some(timeout) if e.is_timeout() => ApiError::Timeout(timeout),
            _ => ApiError::Network(e),
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        log::debug!("{} {} rejected with {}", method, url, status);
        Err(Error::Api(ApiError::from_response_body(status.as_u16(), body)))
    }
}

/// Percent-encodes one path segment.
pub(crate) fn segment(value: &str) -> std::borrow::Cow<'_, str> {
    urlencoding::encode(value)
}

/// Body placeholder for requests without one.
pub(crate) const NO_BODY: Option<&'static ()> = None;
