use std::fmt;
use nd_core::{Error, GenerationParams, Result, SummarizationModel};
use crate::text::split_sentences;

/// Extractive baseline: the leading sentences of the input, up to
/// `max_length` words.
///
/// Runs offline and is fully deterministic, which makes it the backend of
/// choice for local runs and tests.
pub struct LeadModel {
    model_id: String,
}

impl fmt::Debug for LeadModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LeadModel").field("model_id", &self.model_id).finish()
    }
}

impl LeadModel {
    pub fn new(model_id: impl Into<String>) -> Self {
        Self {
            model_id: model_id.into(),
        }
    }
}

#[async_trait::async_trait]
impl SummarizationModel for LeadModel {
    fn name(&self) -> &str {
        "lead"
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }

    async fn generate(&self, text: &str, params: &GenerationParams) -> Result<String> {
        let max_words = params.max_length.max(1) as usize;

        let mut kept = Vec::new();
        let mut words = 0;
        for sentence in split_sentences(text) {
            let count = sentence.split_whitespace().count();
            if words + count > max_words {
                break;
            }
            kept.push(sentence);
            words += count;
        }

        let summary = if kept.is_empty() {
            // First sentence alone is already too long
            text.split_whitespace().take(max_words).collect::<Vec<_>>().join(" ")
        } else {
            kept.join(" ")
        };

        if summary.is_empty() {
            return Err(Error::Inference("nothing to summarize".to_string()));
        }
        Ok(summary)
    }
}
