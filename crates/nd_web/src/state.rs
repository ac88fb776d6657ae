use std::sync::Arc;
use nd_core::{NewsSource, DEFAULT_COUNTRY, DEFAULT_PAGE_SIZE};
use nd_inference::Summarizer;

pub const MAX_SUMMARIES: usize = 5;
pub const DEFAULT_CONCURRENCY: usize = 5;

/// Defaults applied to every `/news/{category}` request.
#[derive(Debug, Clone)]
pub struct NewsSettings {
    pub country: Option<String>,
    pub language: Option<String>,
    pub page_size: u32,
    pub max_summaries: usize,
    pub concurrency: usize,
}

impl Default for NewsSettings {
    fn default() -> Self {
        Self {
            country: Some(DEFAULT_COUNTRY.to_string()),
            language: None,
            page_size: DEFAULT_PAGE_SIZE,
            max_summaries: MAX_SUMMARIES,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }
}

pub struct AppState {
    pub summarizer: Arc<Summarizer>,
    pub news_source: Arc<dyn NewsSource>,
    pub news_settings: NewsSettings,
}

impl AppState {
    pub fn new(summarizer: Arc<Summarizer>, news_source: Arc<dyn NewsSource>) -> Self {
        Self {
            summarizer,
            news_source,
            news_settings: NewsSettings::default(),
        }
    }

    pub fn with_news_settings(mut self, news_settings: NewsSettings) -> Self {
        self.news_settings = news_settings;
        self
    }
}
