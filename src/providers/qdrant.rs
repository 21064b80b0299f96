//! Qdrant REST adapter for the vector index
//!
//! Speaks the plain REST API: collection create, batched point upsert,
//! top-k search, and delete-by-payload-filter. Points carry the chunk text
//! and its provenance as payload; `metadata.source_id` is the filter key
//! used for deletion.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::OnceCell;

use crate::config::VectorIndexConfig;
use crate::error::{Error, Result};
use crate::types::SourceMetadata;

use super::vector_index::{ScoredEntry, VectorEntry, VectorIndexProvider};

const API_KEY_HEADER: &str = "api-key";

/// Vector index backed by a remote Qdrant service
pub struct QdrantIndex {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    collection: String,
    dimensions: usize,
    /// Collection is created lazily on first write
    ensured: OnceCell<()>,
}

impl QdrantIndex {
    /// Create an adapter from configuration
    pub fn new(config: &VectorIndexConfig, dimensions: usize) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: config.url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            collection: config.collection.clone(),
            dimensions,
            ensured: OnceCell::new(),
        })
    }

    fn collection_url(&self, suffix: &str) -> String {
        format!("{}/collections/{}{}", self.base_url, self.collection, suffix)
    }

    fn request(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if self.api_key.is_empty() {
            builder
        } else {
            builder.header(API_KEY_HEADER, &self.api_key)
        }
    }

    /// Create the collection if it does not exist yet
    async fn ensure_collection(&self) -> Result<()> {
        self.ensured
            .get_or_try_init(|| async {
                let exists = self
                    .request(self.http.get(self.collection_url("")))
                    .send()
                    .await
                    .map_err(|e| Error::IndexWrite(format!("collection check failed: {}", e)))?;

                if exists.status().is_success() {
                    return Ok(());
                }

                let body = CreateCollection {
                    vectors: VectorParams {
                        size: self.dimensions,
                        distance: "Cosine",
                    },
                };

                let response = self
                    .request(self.http.put(self.collection_url("")))
                    .json(&body)
                    .send()
                    .await
                    .map_err(|e| Error::IndexWrite(format!("collection create failed: {}", e)))?;

                // A concurrent ingestion may have created it first.
                if response.status().is_success() || response.status() == reqwest::StatusCode::CONFLICT {
                    tracing::info!(collection = %self.collection, "qdrant collection ready");
                    Ok(())
                } else {
                    Err(Error::IndexWrite(format!(
                        "collection create returned HTTP {}",
                        response.status()
                    )))
                }
            })
            .await
            .map(|_| ())
    }
}

#[async_trait]
impl VectorIndexProvider for QdrantIndex {
    async fn upsert(&self, entries: &[VectorEntry]) -> Result<()> {
        if entries.is_empty() {
            return Ok(());
        }

        self.ensure_collection().await?;

        // One batched request so the write is all-or-nothing per call.
        let points: Vec<Point> = entries
            .iter()
            .map(|entry| Point {
                id: entry.id.to_string(),
                vector: entry.vector.clone(),
                payload: Payload {
                    text: entry.text.clone(),
                    metadata: entry.metadata.clone(),
                },
            })
            .collect();

        let response = self
            .request(self.http.put(self.collection_url("/points?wait=true")))
            .json(&UpsertPoints { points })
            .send()
            .await
            .map_err(|e| Error::IndexWrite(format!("upsert failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::IndexWrite(format!("upsert returned HTTP {}: {}", status, body)));
        }

        tracing::debug!(count = entries.len(), collection = %self.collection, "upserted points");
        Ok(())
    }

    async fn search(&self, vector: &[f32], k: usize) -> Result<Vec<ScoredEntry>> {
        let body = SearchPoints {
            vector: vector.to_vec(),
            limit: k,
            with_payload: true,
        };

        let response = self
            .request(self.http.post(self.collection_url("/points/search")))
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::IndexRead(format!("search failed: {}", e)))?;

        // A missing collection is an empty result, not an error.
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(Vec::new());
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::IndexRead(format!("search returned HTTP {}: {}", status, body)));
        }

        let parsed: SearchResponse = response
            .json()
            .await
            .map_err(|e| Error::IndexRead(format!("invalid search response: {}", e)))?;

        Ok(parsed
            .result
            .into_iter()
            .map(|hit| ScoredEntry {
                text: hit.payload.text,
                metadata: hit.payload.metadata,
                score: hit.score,
            })
            .collect())
    }

    async fn delete_by_metadata(&self, key: &str, value: &str) -> Result<()> {
        let body = DeletePoints {
            filter: Filter {
                must: vec![Condition {
                    key: format!("metadata.{}", key),
                    r#match: Match {
                        value: value.to_string(),
                    },
                }],
            },
        };

        let response = self
            .request(self.http.post(self.collection_url("/points/delete?wait=true")))
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::IndexWrite(format!("delete failed: {}", e)))?;

        // Deleting from a collection that does not exist is a no-op.
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(());
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::IndexWrite(format!("delete returned HTTP {}: {}", status, body)));
        }

        Ok(())
    }

    async fn count(&self) -> Result<usize> {
        let response = self
            .request(self.http.post(self.collection_url("/points/count")))
            .json(&serde_json::json!({ "exact": true }))
            .send()
            .await
            .map_err(|e| Error::IndexRead(format!("count failed: {}", e)))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(0);
        }

        if !response.status().is_success() {
            return Err(Error::IndexRead(format!(
                "count returned HTTP {}",
                response.status()
            )));
        }

        let parsed: CountResponse = response
            .json()
            .await
            .map_err(|e| Error::IndexRead(format!("invalid count response: {}", e)))?;

        Ok(parsed.result.count)
    }

    fn name(&self) -> &str {
        "qdrant"
    }
}

#[derive(Serialize)]
struct CreateCollection {
    vectors: VectorParams,
}

#[derive(Serialize)]
struct VectorParams {
    size: usize,
    distance: &'static str,
}

#[derive(Serialize)]
struct UpsertPoints {
    points: Vec<Point>,
}

#[derive(Serialize)]
struct Point {
    id: String,
    vector: Vec<f32>,
    payload: Payload,
}

#[derive(Serialize, Deserialize)]
struct Payload {
    text: String,
    metadata: SourceMetadata,
}

#[derive(Serialize)]
struct SearchPoints {
    vector: Vec<f32>,
    limit: usize,
    with_payload: bool,
}

#[derive(Deserialize)]
struct SearchResponse {
    result: Vec<SearchHit>,
}

#[derive(Deserialize)]
struct SearchHit {
    score: f32,
    payload: Payload,
}

#[derive(Serialize)]
struct DeletePoints {
    filter: Filter,
}

#[derive(Serialize)]
struct Filter {
    must: Vec<Condition>,
}

#[derive(Serialize)]
struct Condition {
    key: String,
    r#match: Match,
}

#[derive(Serialize)]
struct Match {
    value: String,
}

#[derive(Deserialize)]
struct CountResponse {
    result: CountResult,
}

#[derive(Deserialize)]
struct CountResult {
    count: usize,
}
