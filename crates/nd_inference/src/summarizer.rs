use std::sync::Arc;
use std::time::Duration;
use nd_core::{Error, GenerationParams, Result, SummarizationModel, SummaryRequest, SummaryResult};
use crate::models::create_model;
use crate::presets::GenerationConfig;
use crate::text;
use crate::Config;

/// Request-level summarization pipeline: validate, truncate, generate,
/// shape the output.
///
/// Built once at startup and shared read-only between requests.
#[derive(Debug, Clone)]
pub struct Summarizer {
    model: Arc<dyn SummarizationModel>,
    generation: GenerationConfig,
    timeout: Duration,
}

impl Summarizer {
    pub fn new(model: Arc<dyn SummarizationModel>, generation: GenerationConfig, timeout: Duration) -> Self {
        Self {
            model,
            generation,
            timeout,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let model = create_model(config)?;
        Ok(Self::new(model, config.generation.clone(), config.timeout))
    }

    pub fn backend_name(&self) -> &str {
        self.model.name()
    }

    pub fn model_id(&self) -> &str {
        self.model.model_id()
    }

    pub fn generation(&self) -> &GenerationConfig {
        &self.generation
    }

    /// Resolve the decoding parameters for one request.
    ///
    /// A lone `max_length` override pulls the default `min_length` down with
    /// it; two explicit bounds must be ordered.
    pub fn params_for(&self, request: &SummaryRequest) -> Result<GenerationParams> {
        let mut params = self.generation.params();

        if let Some(max_length) = request.max_length {
            if max_length == 0 {
                return Err(Error::InvalidRequest("max_length must be positive".to_string()));
            }
            params.max_length = max_length;
            params.min_length = params.min_length.min(max_length);
        }
        if let Some(min_length) = request.min_length {
            if min_length > params.max_length {
                return Err(Error::InvalidRequest(format!(
                    "min_length ({}) exceeds max_length ({})",
                    min_length, params.max_length
                )));
            }
            params.min_length = min_length;
        }
        Ok(params)
    }

    pub fn prepare_input<'a>(&self, text: &'a str) -> &'a str {
        text::truncate_chars(text.trim(), self.generation.input_limit)
    }

    pub async fn summarize(&self, request: &SummaryRequest) -> Result<SummaryResult> {
        if request.text.trim().is_empty() {
            return Err(Error::InvalidRequest("text must not be empty".to_string()));
        }
        let params = self.params_for(request)?;
        let input = self.prepare_input(&request.text);
        if input.len() < request.text.trim().len() {
            tracing::debug!(
                original = request.text.len(),
                kept = input.len(),
                "truncated input before summarization"
            );
        }

        let raw = tokio::time::timeout(self.timeout, self.model.generate(input, &params))
            .await
            .map_err(|_| Error::Timeout(self.timeout))??;

        let raw = raw.trim();
        if raw.is_empty() {
            return Err(Error::Inference(format!(
                "{} returned an empty summary",
                self.model.model_id()
            )));
        }

        let mut summary = match self.generation.max_sentences {
            Some(max) => text::limit_sentences(raw, max),
            None => raw.to_string(),
        };
        if let Some(url) = request.url.as_deref().map(str::trim).filter(|u| !u.is_empty()) {
            summary = text::append_source_link(&summary, url);
        }

        Ok(SummaryResult { summary })
    }
}
