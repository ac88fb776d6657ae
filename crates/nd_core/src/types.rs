use serde::{Deserialize, Serialize};

/// A headline as returned by the upstream news-listing API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub title: String,
    pub source: String,
    /// Upstream timestamp, kept verbatim.
    pub published_at: String,
    pub content: Option<String>,
    pub url: String,
}

impl Article {
    /// Returns the article body when it carries any non-whitespace text.
    pub fn summarizable_content(&self) -> Option<&str> {
        self.content
            .as_deref()
            .filter(|content| !content.trim().is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryRequest {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u32>,
}

impl SummaryRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_bounds(mut self, max_length: u32, min_length: u32) -> Self {
        self.max_length = Some(max_length);
        self.min_length = Some(min_length);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryResult {
    pub summary: String,
}

pub const DEFAULT_COUNTRY: &str = "us";
pub const DEFAULT_PAGE_SIZE: u32 = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryQuery {
    pub category: String,
    pub country: Option<String>,
    pub language: Option<String>,
    pub page_size: u32,
}

impl CategoryQuery {
    pub fn new(category: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            country: Some(DEFAULT_COUNTRY.to_string()),
            language: None,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn with_country(mut self, country: Option<String>) -> Self {
        self.country = country;
        self
    }

    pub fn with_language(mut self, language: Option<String>) -> Self {
        self.language = language;
        self
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }
}

/// Decoding parameters handed to a summarization backend on every call.
///
/// Decoding is always deterministic: backends must not sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationParams {
    pub max_length: u32,
    pub min_length: u32,
    pub num_beams: u32,
    pub length_penalty: f32,
    pub early_stopping: bool,
}
