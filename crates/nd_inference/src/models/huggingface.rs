use std::fmt;
use std::time::Duration;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use nd_core::{Error, GenerationParams, Result, SummarizationModel};
use crate::Config;

pub const DEFAULT_BASE_URL: &str = "https://api-inference.huggingface.co";

#[derive(Serialize)]
struct SummarizationRequest {
    inputs: String,
    parameters: SummarizationParameters,
    options: RequestOptions,
}

#[derive(Serialize)]
struct SummarizationParameters {
    max_length: u32,
    min_length: u32,
    num_beams: u32,
    length_penalty: f32,
    early_stopping: bool,
    do_sample: bool,
}

#[derive(Serialize)]
struct RequestOptions {
    wait_for_model: bool,
}

#[derive(Deserialize)]
struct SummarizationOutput {
    summary_text: String,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// Seq2seq summarization served by the Hugging Face Inference API.
pub struct HuggingFaceModel {
    client: Client,
    api_token: Option<String>,
    endpoint: String,
    model_id: String,
    prompt_prefix: Option<String>,
    timeout: Duration,
}

impl fmt::Debug for HuggingFaceModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HuggingFaceModel")
            .field("client", &"<reqwest::Client>")
            .field("api_token", &self.api_token.as_deref().map(|_| "<redacted>"))
            .field("endpoint", &self.endpoint)
            .field("model_id", &self.model_id)
            .finish()
    }
}

impl HuggingFaceModel {
    pub fn new(config: &Config) -> Result<Self> {
        let base_url = config.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL);
        let base = url::Url::parse(base_url)?;
        let endpoint = format!(
            "{}/models/{}",
            base.as_str().trim_end_matches('/'),
            config.generation.model_id
        );

        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            api_token: config.api_token.clone().filter(|t| !t.trim().is_empty()),
            endpoint,
            model_id: config.generation.model_id.clone(),
            prompt_prefix: config.generation.prompt_prefix.clone(),
            timeout: config.timeout,
        })
    }

    /// The client timeout spans headers and body, so either await can expire.
    fn transport_error(&self, e: reqwest::Error) -> Error {
        if e.is_timeout() {
            Error::Timeout(self.timeout)
        } else {
            Error::Inference(format!("request to {} failed: {}", self.model_id, e))
        }
    }

    fn request_body(&self, text: &str, params: &GenerationParams) -> SummarizationRequest {
        let inputs = match &self.prompt_prefix {
            Some(prefix) => format!("{}{}", prefix, text),
            None => text.to_string(),
        };
        SummarizationRequest {
            inputs,
            parameters: SummarizationParameters {
                max_length: params.max_length,
                min_length: params.min_length,
                num_beams: params.num_beams,
                length_penalty: params.length_penalty,
                early_stopping: params.early_stopping,
                do_sample: false,
            },
            options: RequestOptions { wait_for_model: true },
        }
    }
}

#[async_trait]
impl SummarizationModel for HuggingFaceModel {
    fn name(&self) -> &str {
        "huggingface"
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }

    async fn generate(&self, text: &str, params: &GenerationParams) -> Result<String> {
        let mut request = self.client.post(&self.endpoint).json(&self.request_body(text, params));
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| self.transport_error(e))?;

        let status = response.status();
        let body = response.bytes().await.map_err(|e| self.transport_error(e))?;
        if !status.is_success() {
            let message = serde_json::from_slice::<ErrorBody>(&body)
                .map(|b| b.error)
                .unwrap_or_else(|_| String::from_utf8_lossy(&body).into_owned());
            return Err(Error::Inference(format!(
                "{} responded with {}: {}",
                self.model_id, status, message
            )));
        }

        let outputs: Vec<SummarizationOutput> = serde_json::from_slice(&body).map_err(|e| {
            Error::Inference(format!("unexpected response from {}: {}", self.model_id, e))
        })?;

        outputs
            .into_iter()
            .next()
            .map(|o| o.summary_text)
            .ok_or_else(|| Error::Inference(format!("{} returned no summary", self.model_id)))
    }
}
