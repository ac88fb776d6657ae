use async_trait::async_trait;
use std::fmt;
use crate::types::GenerationParams;
use crate::Result;

#[async_trait]
pub trait SummarizationModel: Send + Sync + fmt::Debug {
    /// Short backend name used in logs and the health endpoint
    fn name(&self) -> &str;

    /// Identifier of the pretrained model behind this backend
    fn model_id(&self) -> &str;

    /// Condense `text` with the given decoding parameters.
    ///
    /// The caller truncates the input beforehand. Failures must be returned,
    /// never papered over with an empty string.
    async fn generate(&self, text: &str, params: &GenerationParams) -> Result<String>;
}
