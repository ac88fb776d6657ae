use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;
use nd_core::{Article, Error, Result, SummaryRequest};
use nd_inference::Summarizer;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleSummary {
    pub title: String,
    pub source: String,
    pub published_at: String,
    pub summary: String,
    pub url: String,
}

/// Summarize up to `limit` articles that carry content, at most
/// `concurrency` at a time.
///
/// A failed article is logged and dropped. Only when every candidate fails is
/// the first failure returned. Output keeps upstream order.
pub async fn summarize_articles(
    summarizer: &Summarizer,
    articles: Vec<Article>,
    limit: usize,
    concurrency: usize,
) -> Result<Vec<ArticleSummary>> {
    let candidates: Vec<Article> = articles
        .into_iter()
        .filter(|article| article.summarizable_content().is_some())
        .take(limit)
        .collect();
    if candidates.is_empty() {
        return Ok(Vec::new());
    }

    let semaphore = Semaphore::new(concurrency.max(1));
    let semaphore = &semaphore;
    let total = candidates.len();

    let futures = candidates.into_iter().enumerate().map(move |(i, article)| async move {
        let _permit = semaphore
            .acquire()
            .await
            .map_err(|e| Error::External(e.into()))?;
        tracing::debug!("📝 Summarizing article {}/{}: {}", i + 1, total, article.title);

        let request = SummaryRequest {
            text: article.content.clone().unwrap_or_default(),
            url: Some(article.url.clone()),
            ..Default::default()
        };
        let result = summarizer.summarize(&request).await?;

        Ok::<_, Error>(ArticleSummary {
            title: article.title,
            source: article.source,
            published_at: article.published_at,
            summary: result.summary,
            url: article.url,
        })
    });

    let mut summaries = Vec::with_capacity(total);
    let mut first_error = None;
    for result in join_all(futures).await {
        match result {
            Ok(summary) => summaries.push(summary),
            Err(e) => {
                tracing::warn!(error = %e, "skipping article that failed to summarize");
                first_error.get_or_insert(e);
            }
        }
    }

    match first_error {
        Some(e) if summaries.is_empty() => Err(e),
        _ => Ok(summaries),
    }
}
