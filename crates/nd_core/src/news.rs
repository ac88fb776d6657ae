use async_trait::async_trait;
use crate::types::{Article, CategoryQuery};

#[async_trait]
pub trait NewsSource: Send + Sync {
    /// Returns the name of the news provider
    fn name(&self) -> &str;

    /// Fetch the headlines for a category.
    ///
    /// Upstream failures are not errors here: implementations log them and
    /// return an empty list, which callers treat as "no news".
    async fn fetch_articles(&self, query: &CategoryQuery) -> Vec<Article>;
}
