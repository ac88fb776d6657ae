use axum::{
    extract::{Path, Query, State},
    Json,
};
use std::sync::Arc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use nd_core::{CategoryQuery, SummaryRequest, SummaryResult};
use crate::digest::{summarize_articles, ArticleSummary};
use crate::error::ApiError;
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct NewsParams {
    pub country: Option<String>,
    pub language: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct NewsResponse {
    pub category: String,
    pub summaries: Vec<ArticleSummary>,
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

pub async fn summarize(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SummaryRequest>,
) -> Result<Json<SummaryResult>, ApiError> {
    let result = state.summarizer.summarize(&request).await?;
    Ok(Json(result))
}

pub async fn news(
    State(state): State<Arc<AppState>>,
    Path(category): Path<String>,
    Query(params): Query<NewsParams>,
) -> Result<Json<NewsResponse>, ApiError> {
    let settings = &state.news_settings;
    // An explicit empty value clears the default
    let country = match params.country {
        Some(country) => non_blank(country),
        None => settings.country.clone(),
    };
    let language = match params.language {
        Some(language) => non_blank(language),
        None => settings.language.clone(),
    };
    let query = CategoryQuery::new(category.clone())
        .with_country(country)
        .with_language(language)
        .with_page_size(settings.page_size);

    let articles = state.news_source.fetch_articles(&query).await;
    tracing::info!(category = %category, fetched = articles.len(), "📰 fetched headlines");

    let summaries = summarize_articles(
        &state.summarizer,
        articles,
        settings.max_summaries,
        settings.concurrency,
    )
    .await?;

    Ok(Json(NewsResponse { category, summaries }))
}

pub async fn health(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "model": state.summarizer.model_id(),
        "backend": state.summarizer.backend_name(),
        "news": state.news_source.name(),
    }))
}
