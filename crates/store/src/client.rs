//! REST client for a Firestore-compatible document store

use crate::codec::{decode_fields, encode_fields};
use crate::config::StoreClientConfig;
use crate::document::{validate_id, Document, DocumentPath};
use crate::error::{StoreError, StoreResult};
use crate::store::{DeleteOutcome, DocumentStore};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, Url};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, instrument};
use uuid::Uuid;

/// Request correlation ID header
const X_REQUEST_ID: &str = "X-Request-ID";

/// Document store client over the REST API
///
/// Cheap to clone; clones share one connection pool. Build it once per
/// process and hand it to whatever needs it.
#[derive(Clone)]
pub struct FirestoreStore {
    inner: Client,
    config: Arc<StoreClientConfig>,
    documents_root: Arc<Url>,
}

/// REST representation of a document
#[derive(Debug, Deserialize)]
struct RestDocument {
    #[serde(default)]
    fields: Option<serde_json::Value>,
}

impl FirestoreStore {
    /// Create a client with specific configuration
    pub fn with_config(config: StoreClientConfig) -> StoreResult<Self> {
        config.validate()?;

        let documents_root = Url::parse(&config.documents_root())
            .map_err(|e| StoreError::config(format!("invalid base_url: {e}")))?;

        let mut default_headers = HeaderMap::new();
        default_headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        default_headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("fitgen-store/", env!("CARGO_PKG_VERSION"))),
        );

        if let Some(ref token) = config.access_token {
            let mut value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|_| StoreError::config("access token contains invalid characters"))?;
            value.set_sensitive(true);
            default_headers.insert(AUTHORIZATION, value);
        }

        let inner = Client::builder()
            .timeout(config.timeout)
            .default_headers(default_headers)
            .build()
            .map_err(StoreError::Transport)?;

        Ok(Self {
            inner,
            config: Arc::new(config),
            documents_root: Arc::new(documents_root),
        })
    }

    /// Get the current configuration
    #[must_use]
    pub fn config(&self) -> &StoreClientConfig {
        &self.config
    }

    /// URL of a single document
    pub fn document_url(&self, path: &DocumentPath) -> StoreResult<Url> {
        self.segment_url(&[path.collection(), path.document_id()])
    }

    fn segment_url(&self, segments: &[&str]) -> StoreResult<Url> {
        let mut url = (*self.documents_root).clone();
        url.path_segments_mut()
            .map_err(|()| StoreError::config("base_url cannot be a base"))?
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, url: Url, request_id: &str) -> RequestBuilder {
        self.inner
            .request(method, url)
            .header(X_REQUEST_ID, request_id)
    }

    /// Send a request and log its timing
    async fn send(&self, request: RequestBuilder, request_id: &str) -> StoreResult<Response> {
        let start = Instant::now();
        let response = request.send().await?;
        debug!(
            request_id = %request_id,
            status = response.status().as_u16(),
            elapsed_ms = start.elapsed().as_millis(),
            "Store responded"
        );
        Ok(response)
    }
}

/// Turn a non-success response into a classified error
async fn error_from(response: Response) -> StoreError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    StoreError::from_response(status, &body)
}

impl DocumentStore for FirestoreStore {
    #[instrument(skip(self), fields(path = %path))]
    async fn get(&self, path: &DocumentPath) -> StoreResult<Option<Document>> {
        let request_id = Uuid::new_v4().to_string();
        let url = self.document_url(path)?;
        let response = self
            .send(self.request(Method::GET, url, &request_id), &request_id)
            .await?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => {
                let document: RestDocument = response.json().await?;
                decode_fields(document.fields.as_ref()).map(Some)
            }
            _ => Err(error_from(response).await),
        }
    }

    #[instrument(skip(self, document), fields(path = %path))]
    async fn set(&self, path: &DocumentPath, document: Document) -> StoreResult<()> {
        let request_id = Uuid::new_v4().to_string();
        let url = self.document_url(path)?;
        let body = json!({ "fields": encode_fields(&document) });
        let response = self
            .send(
                self.request(Method::PATCH, url, &request_id).json(&body),
                &request_id,
            )
            .await?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(error_from(response).await)
        }
    }

    #[instrument(skip(self), fields(path = %path))]
    async fn delete(&self, path: &DocumentPath) -> StoreResult<DeleteOutcome> {
        let request_id = Uuid::new_v4().to_string();
        let url = self.document_url(path)?;
        let response = self
            .send(self.request(Method::DELETE, url, &request_id), &request_id)
            .await?;

        // 200 whether or not the document existed; 404 means the project or
        // database is missing
        if response.status().is_success() {
            Ok(DeleteOutcome::Deleted)
        } else {
            Err(error_from(response).await)
        }
    }

    #[instrument(skip(self))]
    async fn probe(&self, collection: &str) -> StoreResult<()> {
        validate_id("collection", collection)?;
        let request_id = Uuid::new_v4().to_string();
        let mut url = self.segment_url(&[collection])?;
        url.query_pairs_mut().append_pair("pageSize", "1");

        let response = self
            .send(self.request(Method::GET, url, &request_id), &request_id)
            .await?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(error_from(response).await)
        }
    }
}
