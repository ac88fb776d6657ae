use std::sync::Arc;
use nd_core::{Result, SummarizationModel};
use crate::{Backend, Config};

pub mod huggingface;
pub mod lead;

use huggingface::HuggingFaceModel;
use lead::LeadModel;

pub fn create_model(config: &Config) -> Result<Arc<dyn SummarizationModel>> {
    let model: Arc<dyn SummarizationModel> = match config.backend {
        Backend::HuggingFace => Arc::new(HuggingFaceModel::new(config)?),
        Backend::Lead => Arc::new(LeadModel::new(&config.generation.model_id)),
    };
    tracing::debug!(backend = model.name(), model = model.model_id(), "summarization model ready");
    Ok(model)
}
