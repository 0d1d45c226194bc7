pub mod memory;
mod source;

pub use source::ItemSource;

use crate::config::AppConfig;
use crate::internal::models::Item;
use anyhow::{Context, Result};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use strum_macros::{Display, EnumIter, EnumString};

/// Ranked story lists exposed by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum StoryListType {
    Top,
    New,
    Best,
    Ask,
    Show,
    Job,
}

impl StoryListType {
    fn as_api_str(&self) -> &str {
        match self {
            Self::Best => "beststories",
            Self::Top => "topstories",
            Self::New => "newstories",
            Self::Ask => "askstories",
            Self::Show => "showstories",
            Self::Job => "jobstories",
        }
    }
}

pub const HN_API_BASE_URL: &str = "https://hacker-news.firebaseio.com/v0/";

/// HTTP item source backed by the public Firebase API.
///
/// Every call is a fresh request; nothing is cached between views. Errors are
/// `anyhow` errors carrying the URL that failed, and non-2xx statuses count as
/// failures rather than empty bodies.
#[derive(Clone)]
pub struct ApiService {
    client: Client,
    base_url: String,
}

impl ApiService {
    /// Create a new `ApiService` pointed at the public API.
    pub fn new() -> Self {
        Self::with_base_url(HN_API_BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: normalize_base_url(base_url.into()),
        }
    }

    /// Build a client honoring the configured base URL and request timeout.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: normalize_base_url(config.api_base_url.clone()),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn item_url(&self, id: u32) -> String {
        format!("{}item/{}.json", self.base_url, id)
    }

    pub fn story_list_url(&self, list_type: StoryListType) -> String {
        format!("{}{}.json", self.base_url, list_type.as_api_str())
    }

    /// GET a URL and deserialize the JSON body into `T`.
    async fn get_json<T>(&self, url: &str) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("failed to send GET request to {}", url))?
            .error_for_status()
            .with_context(|| format!("unsuccessful response from {}", url))?;

        resp.json::<T>()
            .await
            .with_context(|| format!("failed to parse JSON response from {}", url))
    }

    /// Fetch the ranked id list for the given list type.
    pub async fn fetch_story_ids(&self, list_type: StoryListType) -> Result<Vec<u32>> {
        let url = self.story_list_url(list_type);
        self.get_json(&url)
            .await
            .with_context(|| format!("fetch_story_ids failed for list {}", list_type))
    }

    /// Fetch a single item. The API answers `null` for ids it does not know.
    pub async fn fetch_item(&self, id: u32) -> Result<Option<Item>> {
        let url = self.item_url(id);
        let item: Option<Item> = self
            .get_json(&url)
            .await
            .with_context(|| format!("fetch_item failed for id {}", id))?;
        tracing::debug!(id, found = item.is_some(), "fetched item");
        Ok(item)
    }
}

impl Default for ApiService {
    fn default() -> Self {
        Self::new()
    }
}

impl ItemSource for ApiService {
    async fn item(&self, id: u32) -> Result<Option<Item>> {
        self.fetch_item(id).await
    }

    async fn story_ids(&self, list_type: StoryListType) -> Result<Vec<u32>> {
        self.fetch_story_ids(list_type).await
    }
}

fn normalize_base_url(mut base_url: String) -> String {
    if !base_url.ends_with('/') {
        base_url.push('/');
    }
    base_url
}
