use std::fmt;
use std::str::FromStr;
use nd_core::GenerationParams;

/// Known summarization models with the decoding settings tuned for each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModelPreset {
    #[default]
    BartLargeCnn,
    DistilBartCnn,
    T5Small,
}

impl ModelPreset {
    pub const ALL: [ModelPreset; 3] = [
        ModelPreset::BartLargeCnn,
        ModelPreset::DistilBartCnn,
        ModelPreset::T5Small,
    ];

    pub fn cli_name(&self) -> &'static str {
        match self {
            ModelPreset::BartLargeCnn => "bart-large-cnn",
            ModelPreset::DistilBartCnn => "distilbart-cnn",
            ModelPreset::T5Small => "t5-small",
        }
    }

    pub fn model_id(&self) -> &'static str {
        match self {
            ModelPreset::BartLargeCnn => "facebook/bart-large-cnn",
            ModelPreset::DistilBartCnn => "sshleifer/distilbart-cnn-12-6",
            ModelPreset::T5Small => "t5-small",
        }
    }
}

impl fmt::Display for ModelPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.cli_name())
    }
}

impl FromStr for ModelPreset {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        ModelPreset::ALL
            .into_iter()
            .find(|preset| preset.cli_name() == wanted || preset.model_id() == wanted)
            .ok_or_else(|| {
                let known: Vec<_> = ModelPreset::ALL.iter().map(|p| p.cli_name()).collect();
                format!("Unknown model preset '{}'. Available: {}", s, known.join(", "))
            })
    }
}

/// Everything that decides how text is fed to the model and how its output
/// is shaped.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationConfig {
    pub model_id: String,
    pub max_length: u32,
    pub min_length: u32,
    pub num_beams: u32,
    pub length_penalty: f32,
    pub early_stopping: bool,
    /// Input cap in characters, applied before the model sees the text
    pub input_limit: usize,
    /// Task prefix some checkpoints expect, e.g. `summarize: ` for T5
    pub prompt_prefix: Option<String>,
    /// Keep at most this many `". "`-separated sentences of the output
    pub max_sentences: Option<usize>,
}

pub const DEFAULT_MAX_SENTENCES: usize = 10;

impl From<ModelPreset> for GenerationConfig {
    fn from(preset: ModelPreset) -> Self {
        let base = GenerationConfig {
            model_id: preset.model_id().to_string(),
            max_length: 250,
            min_length: 100,
            num_beams: 4,
            length_penalty: 2.0,
            early_stopping: true,
            input_limit: 1024,
            prompt_prefix: None,
            max_sentences: Some(DEFAULT_MAX_SENTENCES),
        };

        match preset {
            ModelPreset::BartLargeCnn => base,
            ModelPreset::DistilBartCnn => GenerationConfig {
                max_length: 150,
                min_length: 40,
                ..base
            },
            ModelPreset::T5Small => GenerationConfig {
                max_length: 150,
                min_length: 40,
                input_limit: 1000,
                prompt_prefix: Some("summarize: ".to_string()),
                ..base
            },
        }
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        ModelPreset::default().into()
    }
}

impl GenerationConfig {
    pub fn with_model_id(mut self, model_id: impl Into<String>) -> Self {
        self.model_id = model_id.into();
        self
    }

    pub fn with_max_sentences(mut self, max_sentences: Option<usize>) -> Self {
        self.max_sentences = max_sentences.map(|n| n.max(1));
        self
    }

    pub fn params(&self) -> GenerationParams {
        GenerationParams {
            max_length: self.max_length,
            min_length: self.min_length,
            num_beams: self.num_beams,
            length_penalty: self.length_penalty,
            early_stopping: self.early_stopping,
        }
    }
}
