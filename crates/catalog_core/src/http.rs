//! REST adapter for [`RemoteCatalog`].
//!
//! Collection routes follow the backend's conventions: `GET`/`POST` on
//! `<endpoint>` and `PUT`/`DELETE` on `<endpoint><id>/`.

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde_json::Value;
use shared::{
    domain::{CatalogId, CatalogItem, CatalogKind, CatalogSchema},
    error::{ApiError, ErrorCode},
    protocol::{decode_item, decode_list, name_payload},
};
use tracing::debug;
use url::Url;

use crate::{
    error::{looks_like_constraint_violation, RemoteError, RemoteErrorKind},
    remote::RemoteCatalog,
};

pub struct HttpCatalogClient {
    http: Client,
    collection_url: Url,
    schema: CatalogSchema,
}

impl HttpCatalogClient {
    pub fn new(api_url: &str, kind: CatalogKind, timeout: Option<Duration>) -> anyhow::Result<Self> {
        Self::with_schema(api_url, kind.endpoint(), kind.schema(), timeout)
    }

    pub fn with_schema(
        api_url: &str,
        endpoint: &str,
        schema: CatalogSchema,
        timeout: Option<Duration>,
    ) -> anyhow::Result<Self> {
        let mut base =
            Url::parse(api_url).with_context(|| format!("invalid catalog API url '{api_url}'"))?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let collection_url = base
            .join(endpoint)
            .with_context(|| format!("invalid catalog endpoint '{endpoint}'"))?;

        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().context("failed to build HTTP client")?;

        Ok(Self {
            http,
            collection_url,
            schema,
        })
    }

    pub fn collection_url(&self) -> &Url {
        &self.collection_url
    }

    /// `<collection>/<id>/` with the id pushed as a single encoded segment.
    fn item_url(&self, id: &CatalogId) -> Result<Url, RemoteError> {
        let segment = id.to_string();
        if matches!(segment.as_str(), "" | "." | "..") {
            return Err(RemoteError::new(
                RemoteErrorKind::Validation,
                format!("invalid item id '{segment}'"),
            ));
        }
        let mut url = self.collection_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                RemoteError::unknown(format!(
                    "catalog url {} cannot take an item id",
                    self.collection_url
                ))
            })?
            .pop_if_empty()
            .push(&segment)
            .push("");
        Ok(url)
    }

    async fn read_item(&self, response: Response) -> Result<CatalogItem, RemoteError> {
        let body = read_json(response).await?;
        decode_item(&body, &self.schema).map_err(|err| RemoteError::unknown(err.to_string()))
    }
}

#[async_trait]
impl RemoteCatalog for HttpCatalogClient {
    async fn fetch_all(&self) -> Result<Vec<CatalogItem>, RemoteError> {
        let response = self
            .http
            .get(self.collection_url.clone())
            .send()
            .await
            .map_err(transport)?;
        let body = read_json(ensure_success(response).await?).await?;
        decode_list(&body, &self.schema).map_err(|err| RemoteError::unknown(err.to_string()))
    }

    async fn create(&self, name: &str) -> Result<CatalogItem, RemoteError> {
        let response = self
            .http
            .post(self.collection_url.clone())
            .json(&name_payload(&self.schema, name))
            .send()
            .await
            .map_err(transport)?;
        self.read_item(ensure_success(response).await?).await
    }

    async fn update(&self, id: &CatalogId, name: &str) -> Result<CatalogItem, RemoteError> {
        let response = self
            .http
            .put(self.item_url(id)?)
            .json(&name_payload(&self.schema, name))
            .send()
            .await
            .map_err(transport)?;
        self.read_item(ensure_success(response).await?).await
    }

    async fn remove(&self, id: &CatalogId) -> Result<(), RemoteError> {
        let response = self
            .http
            .delete(self.item_url(id)?)
            .send()
            .await
            .map_err(transport)?;
        ensure_success(response).await?;
        Ok(())
    }
}

fn transport(err: reqwest::Error) -> RemoteError {
    RemoteError::unknown(format!("request failed: {err}"))
}

async fn read_json(response: Response) -> Result<Value, RemoteError> {
    response
        .json::<Value>()
        .await
        .map_err(|err| RemoteError::unknown(format!("invalid response body: {err}")))
}

async fn ensure_success(response: Response) -> Result<Response, RemoteError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    debug!(%status, body = %body, "catalog request rejected");
    Err(classify_failure(status, &body))
}

/// Maps a rejected response to a [`RemoteError`]. A structured error code in
/// the body wins; then the status; then the detail text.
pub fn classify_failure(status: StatusCode, body: &str) -> RemoteError {
    let parsed = serde_json::from_str::<ApiError>(body).ok();
    if let Some(api) = &parsed {
        if !matches!(api.code, ErrorCode::Unknown | ErrorCode::Internal) {
            return RemoteError::from(api.clone());
        }
    }

    let detail = match parsed {
        Some(api) => api.message,
        None if !body.trim().is_empty() => body.trim().to_string(),
        None => status
            .canonical_reason()
            .unwrap_or("request rejected")
            .to_string(),
    };

    let kind = match status {
        StatusCode::CONFLICT => RemoteErrorKind::ConstraintViolation,
        StatusCode::NOT_FOUND => RemoteErrorKind::NotFound,
        _ if looks_like_constraint_violation(&detail) => RemoteErrorKind::ConstraintViolation,
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => RemoteErrorKind::Validation,
        _ => RemoteErrorKind::Unknown,
    };
    RemoteError::new(kind, detail)
}

#[cfg(test)]
#[path = "tests/http_tests.rs"]
mod tests;
