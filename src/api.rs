use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use url::Url;

use crate::config::Config;
use crate::dates::DateRange;
use crate::error::RequestError;
use crate::model::{FiltersResponse, OpsResponse, Record};
use crate::query::Query;

/// Where the dashboard gets its data.
#[async_trait]
pub trait OpsSource {
    async fn fetch_ops(&self, query: &Query) -> Result<Vec<Record>, RequestError>;
    async fn fetch_subspecies(&self, range: &DateRange) -> Result<Vec<String>, RequestError>;
}

/// `OpsSource` over the dashboard's HTTP API. No retries, no timeout.
pub struct HttpOpsSource {
    client: Client,
    ops_url: String,
    filters_url: String,
}

impl HttpOpsSource {
    pub fn new(cfg: &Config) -> Self {
        Self::with_client(Client::new(), cfg)
    }

    pub fn with_client(client: Client, cfg: &Config) -> Self {
        Self {
            client,
            ops_url: cfg.endpoint(&cfg.ops_path),
            filters_url: cfg.endpoint(&cfg.filters_path),
        }
    }

    fn build_url(base: &str, params: &[(&str, String)]) -> Result<Url, RequestError> {
        Url::parse_with_params(base, params.iter().map(|(k, v)| (*k, v.as_str())))
            .map_err(|e| RequestError::Transport(format!("invalid url {}: {}", base, e)))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, RequestError> {
        let resp = self.client.get(url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(RequestError::from_status(status));
        }
        let body = resp.text().await?;
        serde_json::from_str(&body).map_err(|e| RequestError::Decode(e.to_string()))
    }
}

#[async_trait]
impl OpsSource for HttpOpsSource {
    async fn fetch_ops(&self, query: &Query) -> Result<Vec<Record>, RequestError> {
        let url = Self::build_url(&self.ops_url, &query.params())?;
        let data: OpsResponse = self.get_json(url).await?;
        Ok(data.ops)
    }

    async fn fetch_subspecies(&self, range: &DateRange) -> Result<Vec<String>, RequestError> {
        let url = Self::build_url(&self.filters_url, &range.wire_params())?;
        let data: FiltersResponse = self.get_json(url).await?;
        Ok(data.subespecies)
    }
}
