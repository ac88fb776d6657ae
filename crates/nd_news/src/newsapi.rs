use std::fmt;
use std::time::Duration;
use anyhow::anyhow;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use nd_core::{Article, CategoryQuery, Error, NewsSource, Result};

pub const DEFAULT_BASE_URL: &str = "https://newsapi.org/v2";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Clone)]
pub struct NewsApiConfig {
    pub base_url: String,
    pub api_key: String,
    pub timeout: Duration,
}

impl NewsApiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl fmt::Debug for NewsApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewsApiConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[derive(Deserialize)]
struct HeadlinesResponse {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default, deserialize_with = "lenient_articles")]
    articles: Vec<RawArticle>,
}

/// Decode each entry on its own so one malformed item doesn't sink the page.
fn lenient_articles<'de, D>(deserializer: D) -> std::result::Result<Vec<RawArticle>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let entries = Option::<Vec<serde_json::Value>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(entries
        .into_iter()
        .filter_map(|entry| match serde_json::from_value::<RawArticle>(entry) {
            Ok(article) => Some(article),
            Err(e) => {
                tracing::debug!(error = %e, "skipping malformed article entry");
                None
            }
        })
        .collect())
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawArticle {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    published_at: Option<String>,
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    source: Option<RawSource>,
}

#[derive(Deserialize)]
struct RawSource {
    #[serde(default)]
    name: Option<String>,
}

impl From<RawArticle> for Article {
    fn from(raw: RawArticle) -> Self {
        Article {
            title: raw.title.unwrap_or_default(),
            source: raw.source.and_then(|s| s.name).unwrap_or_default(),
            published_at: raw.published_at.unwrap_or_default(),
            content: raw.content,
            url: raw.url.unwrap_or_default(),
        }
    }
}

/// Client for the NewsAPI `top-headlines` endpoint.
pub struct NewsApiClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl fmt::Debug for NewsApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewsApiClient")
            .field("client", &"<reqwest::Client>")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl NewsApiClient {
    pub fn new(config: NewsApiConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(Error::Config("News API key is required".to_string()));
        }
        url::Url::parse(&config.base_url)?;

        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key,
        })
    }

    /// Performs the single upstream request; every failure surfaces as an error.
    pub async fn try_fetch(&self, query: &CategoryQuery) -> Result<Vec<Article>> {
        let mut params: Vec<(&str, String)> = vec![("category", query.category.clone())];
        if let Some(country) = &query.country {
            params.push(("country", country.clone()));
        }
        if let Some(language) = &query.language {
            params.push(("language", language.clone()));
        }
        params.push(("pageSize", query.page_size.to_string()));

        // The key travels in a header and reqwest errors lose their URL, so
        // it never reaches error text or logs.
        let response = self
            .client
            .get(format!("{}/top-headlines", self.base_url))
            .header("X-Api-Key", &self.api_key)
            .query(&params)
            .send()
            .await
            .map_err(|e| Error::Http(e.without_url()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::External(anyhow!("news API responded with {}", status)));
        }

        let body = response.bytes().await.map_err(|e| Error::Http(e.without_url()))?;
        let payload: HeadlinesResponse = serde_json::from_slice(&body)?;
        if payload.status.as_deref() == Some("error") {
            return Err(Error::External(anyhow!(
                "news API reported an error: {}",
                payload.message.unwrap_or_default()
            )));
        }

        Ok(payload.articles.into_iter().map(Article::from).collect())
    }
}

#[async_trait]
impl NewsSource for NewsApiClient {
    fn name(&self) -> &str {
        "NewsAPI"
    }

    async fn fetch_articles(&self, query: &CategoryQuery) -> Vec<Article> {
        match self.try_fetch(query).await {
            Ok(articles) => {
                tracing::debug!(category = %query.category, count = articles.len(), "fetched headlines");
                articles
            }
            Err(e) => {
                // Upstream trouble means "no news", not a failed request.
                tracing::warn!(category = %query.category, error = %e, "news fetch failed, returning no articles");
                Vec::new()
            }
        }
    }
}
