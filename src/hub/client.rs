//! HuggingFace Hub REST API client for dataset download.
//!
//! Resolves a split through the Hub's parquet listing
//! (`/api/datasets/{repo}/parquet`), downloads every shard of it and
//! decodes the shards into a [`Split`].

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use bytes::Bytes;
use reqwest::{Client, Response, StatusCode};

use crate::error::FetchError;
use crate::record::{Record, Split};

use super::decode_parquet;

pub const DEFAULT_ENDPOINT: &str = "https://huggingface.co";

/// Config name the Hub gives datasets that declare no explicit subsets.
pub const DEFAULT_CONFIG: &str = "default";

/// Parquet listing as returned by the Hub: config -> split -> shard URLs.
pub type ParquetListing = BTreeMap<String, BTreeMap<String, Vec<String>>>;

/// Connection settings for the Hub.
#[derive(Debug, Clone)]
pub struct HubConfig {
    pub endpoint: String,
    /// Bearer token for gated or private datasets.
    pub token: Option<String>,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            token: None,
        }
    }
}

impl HubConfig {
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.is_empty());
        self
    }
}

/// Which part of a dataset to fetch, and where to keep the downloaded shards.
#[derive(Debug, Clone)]
pub struct FetchOptions {
    pub split: String,
    pub config: Option<String>,
    pub cache_dir: Option<PathBuf>,
}

impl FetchOptions {
    pub fn new(split: impl Into<String>) -> Self {
        Self {
            split: split.into(),
            config: None,
            cache_dir: None,
        }
    }

    pub fn with_config(mut self, config: Option<String>) -> Self {
        self.config = config;
        self
    }

    pub fn with_cache_dir(mut self, cache_dir: Option<PathBuf>) -> Self {
        self.cache_dir = cache_dir;
        self
    }
}

pub struct HubClient {
    client: Client,
    config: HubConfig,
}

impl HubClient {
    pub fn new(config: HubConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(concat!("hf-export/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client, config })
    }

    pub fn listing_url(&self, repo_id: &str) -> String {
        format!(
            "{}/api/datasets/{}/parquet",
            self.config.endpoint.trim_end_matches('/'),
            repo_id
        )
    }

    /// Fetch the config/split/shard listing of a dataset.
    pub async fn parquet_listing(&self, repo_id: &str) -> Result<ParquetListing, FetchError> {
        validate_dataset_id(repo_id)?;

        let url = self.listing_url(repo_id);
        tracing::debug!(url = %url, "Requesting parquet listing");

        let resp = self.get(&url).send().await?;
        let resp = check_listing_status(repo_id, resp).await?;
        let listing: ParquetListing = resp.json().await?;

        tracing::info!(
            repo = repo_id,
            configs = listing.len(),
            "Parquet listing fetched"
        );
        Ok(listing)
    }

    /// Download and decode one split of a Hub dataset.
    pub async fn fetch_split(
        &self,
        repo_id: &str,
        options: &FetchOptions,
    ) -> Result<Split, FetchError> {
        let listing = self.parquet_listing(repo_id).await?;
        let (config, shards) = select_shards(&listing, options.config.as_deref(), &options.split)?;

        tracing::info!(
            repo = repo_id,
            config = config,
            split = %options.split,
            shards = shards.len(),
            "Downloading dataset from HuggingFace"
        );

        let mut records: Vec<Record> = Vec::new();
        for (index, url) in shards.iter().enumerate() {
            let bytes = self.download(url).await?;

            if let Some(ref cache_dir) = options.cache_dir {
                let local_path = shard_cache_path(cache_dir, repo_id, config, &options.split, index);
                if let Some(parent) = local_path.parent() {
                    std::fs::create_dir_all(parent)?;
                }
                std::fs::write(&local_path, &bytes)?;
                tracing::debug!(path = %local_path.display(), "Shard written to cache dir");
            }

            tracing::info!(
                shard = index,
                size = bytes.len(),
                "Shard downloaded"
            );
            records.extend(decode_parquet(bytes)?);
        }

        tracing::info!(
            repo = repo_id,
            split = %options.split,
            rows = records.len(),
            "Split loaded"
        );

        Ok(Split::new(options.split.clone(), records))
    }

    /// Shard URLs come from a listing that already resolved, so any failure
    /// here is reported with its raw status rather than as a missing dataset.
    async fn download(&self, url: &str) -> Result<Bytes, FetchError> {
        let resp = self.get(url).send().await?;
        if !resp.status().is_success() {
            tracing::warn!(url = url, status = %resp.status(), "Shard download failed");
            return Err(http_error(resp).await);
        }
        Ok(resp.bytes().await?)
    }

    fn get(&self, url: &str) -> reqwest::RequestBuilder {
        let request = self.client.get(url);
        match self.config.token {
            Some(ref token) => request.bearer_auth(token),
            None => request,
        }
    }
}

async fn check_listing_status(repo_id: &str, resp: Response) -> Result<Response, FetchError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    match status {
        StatusCode::NOT_FOUND => Err(FetchError::DatasetNotFound(repo_id.to_string())),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            Err(FetchError::Unauthorized(repo_id.to_string()))
        }
        _ => Err(http_error(resp).await),
    }
}

async fn http_error(resp: Response) -> FetchError {
    FetchError::Http {
        status: resp.status().as_u16(),
        body: resp.text().await.unwrap_or_default(),
    }
}

/// Dataset ids on the Hub are `owner/name`.
pub fn validate_dataset_id(repo_id: &str) -> Result<(), FetchError> {
    match repo_id.split_once('/') {
        Some((owner, name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/') => {
            Ok(())
        }
        _ => Err(FetchError::InvalidDatasetId(repo_id.to_string())),
    }
}

/// Pick the config and the shard URLs of `split` from a parquet listing.
///
/// Without an explicit config, `default` wins, then a lone config; several
/// named configs require the caller to choose.
pub fn select_shards<'a>(
    listing: &'a ParquetListing,
    config: Option<&str>,
    split: &str,
) -> Result<(&'a str, &'a [String]), FetchError> {
    let available = || listing.keys().cloned().collect::<Vec<_>>();

    let (config_name, splits) = match config {
        Some(name) => listing
            .get_key_value(name)
            .ok_or_else(|| FetchError::ConfigNotFound {
                config: name.to_string(),
                available: available(),
            })?,
        None => match listing.get_key_value(DEFAULT_CONFIG) {
            Some(entry) => entry,
            None => {
                let mut configs = listing.iter();
                match (configs.next(), configs.next()) {
                    (Some(entry), None) => entry,
                    (None, _) => {
                        return Err(FetchError::SplitNotFound {
                            split: split.to_string(),
                            available: Vec::new(),
                        })
                    }
                    _ => {
                        return Err(FetchError::ConfigRequired {
                            available: available(),
                        })
                    }
                }
            }
        },
    };

    let shards = splits
        .get(split)
        .ok_or_else(|| FetchError::SplitNotFound {
            split: split.to_string(),
            available: splits.keys().cloned().collect(),
        })?;

    Ok((config_name.as_str(), shards.as_slice()))
}

/// Where a downloaded shard lands inside the cache directory.
pub fn shard_cache_path(
    cache_dir: &Path,
    repo_id: &str,
    config: &str,
    split: &str,
    index: usize,
) -> PathBuf {
    cache_dir
        .join("datasets")
        .join(repo_id.replace('/', "___"))
        .join(urlencoding::encode(config).as_ref())
        .join(urlencoding::encode(split).as_ref())
        .join(format!("{:05}.parquet", index))
}
