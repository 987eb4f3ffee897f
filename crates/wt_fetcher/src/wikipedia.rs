use std::path::{Path, PathBuf};
use async_trait::async_trait;
use chrono::{DateTime, Local};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info};
use url::Url;
use wt_core::persist::{self, Persisted};
use wt_core::types::format_retrieval_date;
use wt_core::{ArticleRecord, ContentSource, Error, Result};
use crate::format::{format_sections, parse_extract};

const USER_AGENT: &str = concat!("wt/", env!("CARGO_PKG_VERSION"), " (wikipedia script generator)");

#[derive(Debug, Deserialize)]
pub struct QueryResponse {
    #[serde(default)]
    query: Option<Query>,
}

#[derive(Debug, Deserialize)]
struct Query {
    #[serde(default)]
    pages: Vec<Page>,
}

#[derive(Debug, Deserialize)]
struct Page {
    title: String,
    #[serde(default)]
    missing: bool,
    #[serde(default)]
    invalid: bool,
    #[serde(default)]
    extract: String,
    #[serde(default)]
    fullurl: String,
}

#[derive(Debug, Clone)]
pub struct WikipediaFetcher {
    client: Client,
    endpoint: Url,
}

impl WikipediaFetcher {
    pub fn new(language: &str) -> Result<Self> {
        Self::with_base_url(&format!("https://{}.wikipedia.org", language))
    }

    pub fn with_base_url(base_url: &str) -> Result<Self> {
        let endpoint = Url::parse(base_url)
            .and_then(|base| base.join("w/api.php"))
            .map_err(|e| Error::Config(format!("Invalid Wikipedia URL {}: {}", base_url, e)))?;
        let client = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Fetch the page titled `topic` and flatten its sections.
    pub async fn fetch_wikipedia_content(&self, topic: &str) -> Result<ArticleRecord> {
        debug!("Querying {} for '{}'", self.endpoint, topic);
        let response = self
            .client
            .get(self.endpoint.clone())
            .query(&[
                ("action", "query"),
                ("format", "json"),
                ("formatversion", "2"),
                ("redirects", "1"),
                ("prop", "extracts|info"),
                ("explaintext", "1"),
                ("exsectionformat", "wiki"),
                ("inprop", "url"),
                ("titles", topic),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Error::backend("Wikipedia", format!("HTTP {}", response.status())));
        }

        let body: QueryResponse = response
            .json()
            .await
            .map_err(|e| Error::from_http("Wikipedia", e))?;
        record_from_response(body, topic, Local::now())
    }

    /// Fetch `topic` and save it under a sanitized, timestamped name in `output_dir`.
    pub async fn fetch_and_save(&self, topic: &str, output_dir: &Path) -> Result<PathBuf> {
        let now = Local::now();
        let path = output_dir.join(format!("{}_{}.json", safe_filename(topic), now.format("%Y%m%d_%H%M%S")));
        let record = self.fetch_wikipedia_content(topic).await?;
        let saved = save_content(&record, &path).into_result()?;
        info!("Content for {} fetched and saved to {}", topic, saved.display());
        Ok(saved)
    }
}

#[async_trait]
impl ContentSource for WikipediaFetcher {
    fn name(&self) -> &str {
        "Wikipedia"
    }

    async fn fetch(&self, topic: &str) -> Result<ArticleRecord> {
        self.fetch_wikipedia_content(topic).await
    }
}

pub fn record_from_response(
    response: QueryResponse,
    topic: &str,
    retrieved_at: DateTime<Local>,
) -> Result<ArticleRecord> {
    let page = response
        .query
        .and_then(|q| q.pages.into_iter().next())
        .filter(|p| !p.missing && !p.invalid)
        .ok_or_else(|| Error::NotFound(topic.to_string()))?;

    let (summary, sections) = parse_extract(&page.extract);
    Ok(ArticleRecord {
        title: page.title,
        summary,
        content: format_sections(&sections),
        url: page.fullurl,
        retrieval_date: format_retrieval_date(retrieved_at),
    })
}

/// Every non-alphanumeric character becomes `_`.
pub fn safe_filename(topic: &str) -> String {
    topic
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect()
}

pub fn save_content(record: &ArticleRecord, path: &Path) -> Persisted<PathBuf> {
    persist::save_json(record, path)
}

pub fn load_content(path: &Path) -> Persisted<ArticleRecord> {
    persist::load_json(path)
}
