//! HTTP client for the hosted content-lake API.

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};

use super::{query, ContentStore};
use crate::config::StoreConfig;
use crate::content::{News, Promotion};
use crate::error::{CoopervalError, Result};

/// `ContentStore` implementation backed by the hosted HTTP API.
#[derive(Debug, Clone)]
pub struct HttpStore {
    config: StoreConfig,
    http: Client,
}

impl HttpStore {
    pub fn new(config: StoreConfig) -> Self {
        Self {
            config,
            http: Client::new(),
        }
    }

    fn query_url(&self) -> String {
        format!("{}/data/query/{}", self.config.api_base(), self.config.dataset)
    }

    fn mutate_url(&self) -> String {
        format!("{}/data/mutate/{}", self.config.api_base(), self.config.dataset)
    }

    fn asset_url(&self) -> String {
        format!("{}/assets/images/{}", self.config.api_base(), self.config.dataset)
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.config.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn run_query<T: DeserializeOwned>(&self, groq: &str) -> Result<T> {
        let response = self
            .authorize(self.http.get(self.query_url()).query(&[("query", groq)]))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(CoopervalError::RemoteRead(format!(
                "query failed with status {status}: {text}"
            )));
        }

        let parsed: QueryResponse<T> = response.json().await?;
        Ok(parsed.result)
    }

    async fn mutate(&self, mutations: Value) -> Result<MutateResponse> {
        let body = json!({ "mutations": mutations });

        let response = self
            .authorize(
                self.http
                    .post(self.mutate_url())
                    .query(&[("returnIds", "true")])
                    .json(&body),
            )
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(CoopervalError::RemoteWrite(format!(
                "mutation failed with status {status}: {text}"
            )));
        }

        Ok(response.json().await?)
    }

    async fn create(&self, doc: Value) -> Result<String> {
        let response = self.mutate(json!([{ "create": doc }])).await?;
        response
            .results
            .into_iter()
            .next()
            .map(|r| r.id)
            .ok_or_else(|| CoopervalError::RemoteWrite("store returned no document id".into()))
    }

    async fn patch(&self, id: &str, doc: Value) -> Result<()> {
        self.mutate(json!([{ "patch": { "id": id, "set": doc } }]))
            .await?;
        Ok(())
    }
}

#[async_trait]
impl ContentStore for HttpStore {
    async fn create_news(&self, doc: &News) -> Result<String> {
        self.create(serde_json::to_value(doc)?).await
    }

    async fn patch_news(&self, id: &str, doc: &News) -> Result<()> {
        self.patch(id, serde_json::to_value(doc)?).await
    }

    async fn create_promotion(&self, doc: &Promotion) -> Result<String> {
        self.create(serde_json::to_value(doc)?).await
    }

    async fn patch_promotion(&self, id: &str, doc: &Promotion) -> Result<()> {
        self.patch(id, serde_json::to_value(doc)?).await
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.mutate(json!([{ "delete": { "id": id } }])).await?;
        Ok(())
    }

    async fn upload_asset(&self, bytes: Vec<u8>, filename: &str) -> Result<String> {
        let response = self
            .authorize(
                self.http
                    .post(self.asset_url())
                    .query(&[("filename", filename)])
                    .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
                    .body(bytes),
            )
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(CoopervalError::RemoteUpload(format!(
                "upload failed with status {status}: {text}"
            )));
        }

        let parsed: UploadResponse = response.json().await?;
        Ok(parsed.document.id)
    }

    async fn fetch_news(&self) -> Result<Vec<News>> {
        self.run_query(query::ALL_NEWS).await
    }

    async fn fetch_recent_news(&self) -> Result<Vec<News>> {
        self.run_query(query::RECENT_NEWS).await
    }

    async fn fetch_news_by_slug(&self, slug: &str) -> Result<Option<News>> {
        self.run_query(&query::news_by_slug(slug)).await
    }

    async fn fetch_promotions(&self) -> Result<Vec<Promotion>> {
        self.run_query(query::ALL_PROMOTIONS).await
    }
}

#[derive(Debug, Deserialize)]
struct QueryResponse<T> {
    result: T,
}

#[derive(Debug, Deserialize)]
struct MutateResponse {
    results: Vec<MutateResult>,
}

#[derive(Debug, Deserialize)]
struct MutateResult {
    id: String,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    document: UploadedAsset,
}

#[derive(Debug, Deserialize)]
struct UploadedAsset {
    #[serde(rename = "_id")]
    id: String,
}
