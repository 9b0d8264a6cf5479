//! Pinecone REST clients.
//!
//! - [`PineconeIndex`] queries one index on its data-plane host.
//! - [`PineconeControl`] lists, describes and creates indexes on the
//!   control plane (`https://api.pinecone.io`).

use crate::config::mask_secret;
use crate::embeddings::EMBEDDING_DIMENSIONS;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

use super::{INDEX_METRIC, Match, VectorIndex};

const API_VERSION: &str = "2024-07";

fn build_client(timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| Error::Index(format!("Failed to build HTTP client: {e}")))
}

/// Hosts are reported without a scheme by the control plane.
fn normalize_host(host: &str) -> String {
    let host = host.trim_end_matches('/');
    if host.starts_with("http://") || host.starts_with("https://") {
        host.to_string()
    } else {
        format!("https://{host}")
    }
}

async fn error_from(response: reqwest::Response, what: &str) -> Error {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    Error::Index(format!("Pinecone {what} failed ({status}): {body}"))
}

// ── Data plane ────────────────────────────────────────────────

/// Query client for one Pinecone index.
pub struct PineconeIndex {
    client: reqwest::Client,
    host: String,
    api_key: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryRequest<'a> {
    vector: &'a [f32],
    top_k: usize,
    include_metadata: bool,
    include_values: bool,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<Match>,
}

impl PineconeIndex {
    /// Create a client for the index served at `host`.
    pub fn new(host: &str, api_key: impl Into<String>, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: build_client(timeout)?,
            host: normalize_host(host),
            api_key: api_key.into(),
        })
    }

    /// Data-plane base URL.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }
}

impl std::fmt::Debug for PineconeIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PineconeIndex")
            .field("host", &self.host)
            .field("api_key", &mask_secret(&self.api_key))
            .finish_non_exhaustive()
    }
}

impl VectorIndex for PineconeIndex {
    async fn query(&self, vector: &[f32], top_k: usize, include_metadata: bool) -> Result<Vec<Match>> {
        let url = format!("{}/query", self.host);
        debug!(top_k, dimensions = vector.len(), "index query");

        let request = QueryRequest {
            vector,
            top_k,
            include_metadata,
            include_values: false,
        };

        let response = self
            .client
            .post(&url)
            .header("Api-Key", &self.api_key)
            .header("X-Pinecone-API-Version", API_VERSION)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Index(format!("Pinecone query request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(error_from(response, "query").await);
        }

        let data: QueryResponse = response
            .json()
            .await
            .map_err(|e| Error::Index(format!("Failed to parse Pinecone query response: {e}")))?;

        debug!(matches = data.matches.len(), "index query complete");
        Ok(data.matches)
    }
}

// ── Control plane ─────────────────────────────────────────────

/// Index metadata from the control plane.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexDescription {
    pub name: String,
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default)]
    pub dimension: Option<usize>,
    #[serde(default)]
    pub metric: Option<String>,
}

/// Result of [`PineconeControl::ensure_index`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnsureOutcome {
    Existing(IndexDescription),
    Created(IndexDescription),
}

impl EnsureOutcome {
    #[must_use]
    pub fn description(&self) -> &IndexDescription {
        match self {
            Self::Existing(d) | Self::Created(d) => d,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ListIndexesResponse {
    #[serde(default)]
    indexes: Vec<IndexDescription>,
}

#[derive(Debug, Serialize)]
struct CreateIndexRequest<'a> {
    name: &'a str,
    dimension: usize,
    metric: &'a str,
    spec: IndexSpec<'a>,
}

#[derive(Debug, Serialize)]
struct IndexSpec<'a> {
    serverless: ServerlessSpec<'a>,
}

#[derive(Debug, Serialize)]
struct ServerlessSpec<'a> {
    cloud: &'a str,
    region: &'a str,
}

/// Control-plane client.
pub struct PineconeControl {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl PineconeControl {
    pub fn new(controller_url: &str, api_key: impl Into<String>, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: build_client(timeout)?,
            endpoint: controller_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    fn get(&self, url: &str) -> reqwest::RequestBuilder {
        self.client
            .get(url)
            .header("Api-Key", &self.api_key)
            .header("X-Pinecone-API-Version", API_VERSION)
    }

    /// List all indexes in the project.
    pub async fn list_indexes(&self) -> Result<Vec<IndexDescription>> {
        let response = self
            .get(&format!("{}/indexes", self.endpoint))
            .send()
            .await
            .map_err(|e| Error::Index(format!("Pinecone list request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(error_from(response, "list indexes").await);
        }

        let data: ListIndexesResponse = response
            .json()
            .await
            .map_err(|e| Error::Index(format!("Failed to parse Pinecone index list: {e}")))?;
        Ok(data.indexes)
    }

    /// Describe one index.
    pub async fn describe_index(&self, name: &str) -> Result<IndexDescription> {
        let response = self
            .get(&format!("{}/indexes/{name}", self.endpoint))
            .send()
            .await
            .map_err(|e| Error::Index(format!("Pinecone describe request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(error_from(response, "describe index").await);
        }

        response
            .json()
            .await
            .map_err(|e| Error::Index(format!("Failed to parse Pinecone index description: {e}")))
    }

    /// Data-plane host of `name`, as a URL.
    pub async fn resolve_host(&self, name: &str) -> Result<String> {
        let description = self.describe_index(name).await?;
        match description.host.as_deref() {
            Some(host) if !host.is_empty() => Ok(normalize_host(host)),
            _ => Err(Error::Index(format!(
                "Index '{name}' has no host yet; it may still be initializing"
            ))),
        }
    }

    /// Create `name` as a serverless euclidean index of the embedding
    /// dimension, unless an index with that name already exists.
    pub async fn ensure_index(&self, name: &str, cloud: &str, region: &str) -> Result<EnsureOutcome> {
        if let Some(existing) = self
            .list_indexes()
            .await?
            .into_iter()
            .find(|i| i.name == name)
        {
            debug!(index = name, "index already exists");
            return Ok(EnsureOutcome::Existing(existing));
        }

        let request = CreateIndexRequest {
            name,
            dimension: EMBEDDING_DIMENSIONS,
            metric: INDEX_METRIC,
            spec: IndexSpec {
                serverless: ServerlessSpec { cloud, region },
            },
        };

        let response = self
            .client
            .post(format!("{}/indexes", self.endpoint))
            .header("Api-Key", &self.api_key)
            .header("X-Pinecone-API-Version", API_VERSION)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Index(format!("Pinecone create request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(error_from(response, "create index").await);
        }

        let created: IndexDescription = response
            .json()
            .await
            .map_err(|e| Error::Index(format!("Failed to parse created index: {e}")))?;

        info!(index = name, cloud, region, "created index");
        Ok(EnsureOutcome::Created(created))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};
    use serde_json::json;

    const TIMEOUT: Duration = Duration::from_secs(5);

    #[test]
    fn test_debug_masks_api_key() {
        let index = PineconeIndex::new("docs.svc.pinecone.io", "pcsk_topsecret", TIMEOUT).unwrap();
        let shown = format!("{index:?}");
        assert!(shown.contains("https://docs.svc.pinecone.io"));
        assert!(!shown.contains("topsecret"));
    }

    #[test]
    fn test_normalize_host() {
        assert_eq!(
            normalize_host("laws-abc123.svc.pinecone.io"),
            "https://laws-abc123.svc.pinecone.io"
        );
        assert_eq!(normalize_host("http://localhost:5080/"), "http://localhost:5080");
    }

    #[tokio::test]
    async fn test_query_preserves_index_order() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/query")
            .match_header("api-key", "pc-key")
            .match_body(Matcher::PartialJson(json!({
                "topK": 2,
                "includeMetadata": true
            })))
            .with_status(200)
            .with_body(
                json!({
                    "matches": [
                        {"id": "b", "score": 0.9, "metadata": {"text": "שני"}},
                        {"id": "a", "score": 0.1, "metadata": {"text": "ראשון"}}
                    ],
                    "namespace": ""
                })
                .to_string(),
            )
            .create_async()
            .await;

        let index = PineconeIndex::new(&server.url(), "pc-key", TIMEOUT).unwrap();
        let matches = index.query(&[0.0; 4], 2, true).await.unwrap();

        let ids: Vec<&str> = matches.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, ["b", "a"]);
        assert_eq!(matches[1].text().unwrap(), "ראשון");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_query_error_propagates() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/query")
            .with_status(500)
            .with_body("internal")
            .create_async()
            .await;

        let index = PineconeIndex::new(&server.url(), "pc-key", TIMEOUT).unwrap();
        let err = index.query(&[0.0; 4], 5, true).await.unwrap_err();
        assert!(matches!(err, Error::Index(_)));
        assert!(err.to_string().contains("500"));
    }

    #[tokio::test]
    async fn test_ensure_index_skips_existing() {
        let mut server = Server::new_async().await;
        let _list = server
            .mock("GET", "/indexes")
            .with_status(200)
            .with_body(
                json!({"indexes": [{"name": "laws", "host": "laws-1.svc.pinecone.io", "dimension": 1536, "metric": "euclidean"}]})
                    .to_string(),
            )
            .create_async()
            .await;
        let create = server
            .mock("POST", "/indexes")
            .expect(0)
            .create_async()
            .await;

        let control = PineconeControl::new(&server.url(), "pc-key", TIMEOUT).unwrap();
        let outcome = control.ensure_index("laws", "aws", "us-east-1").await.unwrap();

        assert!(matches!(outcome, EnsureOutcome::Existing(_)));
        assert_eq!(outcome.description().dimension, Some(1536));
        create.assert_async().await;
    }

    #[tokio::test]
    async fn test_ensure_index_creates_missing() {
        let mut server = Server::new_async().await;
        let _list = server
            .mock("GET", "/indexes")
            .with_status(200)
            .with_body(json!({"indexes": []}).to_string())
            .create_async()
            .await;
        let create = server
            .mock("POST", "/indexes")
            .match_body(Matcher::Json(json!({
                "name": "laws",
                "dimension": 1536,
                "metric": "euclidean",
                "spec": {"serverless": {"cloud": "aws", "region": "us-east-1"}}
            })))
            .with_status(201)
            .with_body(json!({"name": "laws", "dimension": 1536, "metric": "euclidean", "host": ""}).to_string())
            .create_async()
            .await;

        let control = PineconeControl::new(&server.url(), "pc-key", TIMEOUT).unwrap();
        let outcome = control.ensure_index("laws", "aws", "us-east-1").await.unwrap();

        assert!(matches!(outcome, EnsureOutcome::Created(_)));
        create.assert_async().await;
    }

    #[tokio::test]
    async fn test_resolve_host_from_description() {
        let mut server = Server::new_async().await;
        let _describe = server
            .mock("GET", "/indexes/laws")
            .with_status(200)
            .with_body(json!({"name": "laws", "host": "laws-1.svc.pinecone.io"}).to_string())
            .create_async()
            .await;

        let control = PineconeControl::new(&server.url(), "pc-key", TIMEOUT).unwrap();
        assert_eq!(
            control.resolve_host("laws").await.unwrap(),
            "https://laws-1.svc.pinecone.io"
        );
    }

    #[tokio::test]
    async fn test_resolve_host_missing_index() {
        let mut server = Server::new_async().await;
        let _describe = server
            .mock("GET", "/indexes/nope")
            .with_status(404)
            .with_body(r#"{"error":{"code":"NOT_FOUND","message":"Resource nope not found"}}"#)
            .create_async()
            .await;

        let control = PineconeControl::new(&server.url(), "pc-key", TIMEOUT).unwrap();
        let err = control.resolve_host("nope").await.unwrap_err();
        assert!(err.to_string().contains("404"));
    }
}
