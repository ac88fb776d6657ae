use anyhow::{anyhow, Context};
use clap::Parser;
use nd_core::{CategoryQuery, NewsSource, SummaryRequest};
use nd_inference::{Backend, Config as InferenceConfig, GenerationConfig, ModelPreset, Summarizer};
use nd_news::{NewsApiClient, NewsApiConfig};
use nd_web::digest::summarize_articles;
use nd_web::handlers::NewsResponse;
use nd_web::{AppState, NewsSettings};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, PartialEq)]
struct HumanDuration(Duration);

impl FromStr for HumanDuration {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let mut total_seconds = 0u64;
        let mut current_number = String::new();
        let mut has_unit = false;

        for c in s.chars() {
            if c.is_ascii_digit() {
                current_number.push(c);
            } else if let Ok(num) = current_number.parse::<u64>() {
                let multiplier = match c {
                    's' => 1,
                    'm' => 60,
                    'h' => 3600,
                    _ => return Err(format!("Invalid duration unit: {}", c)),
                };
                total_seconds = num
                    .checked_mul(multiplier)
                    .and_then(|secs| total_seconds.checked_add(secs))
                    .ok_or_else(|| "Duration is too large".to_string())?;
                current_number.clear();
                has_unit = true;
            } else if !c.is_whitespace() {
                return Err(format!("Invalid character in duration: {}", c));
            }
        }

        // A bare number means seconds
        if !current_number.is_empty() {
            let num = current_number
                .parse::<u64>()
                .map_err(|_| "Invalid number in duration".to_string())?;
            total_seconds = total_seconds
                .checked_add(num)
                .ok_or_else(|| "Duration is too large".to_string())?;
            has_unit = true;
        }

        if !has_unit {
            return Err("Duration must include a number".to_string());
        }
        if total_seconds == 0 {
            return Err("Duration must be positive".to_string());
        }

        Ok(HumanDuration(Duration::from_secs(total_seconds)))
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Fetch news headlines and summarize them", long_about = None)]
pub struct Cli {
    /// NewsAPI key
    #[arg(long, env = "NEWS_API_KEY", hide_env_values = true, global = true)]
    news_api_key: Option<String>,
    #[arg(long, default_value = nd_news::newsapi::DEFAULT_BASE_URL, global = true)]
    news_api_url: String,
    /// Default country for headlines; pass an empty string to omit it
    #[arg(long, default_value = nd_core::DEFAULT_COUNTRY, global = true)]
    country: String,
    #[arg(long, global = true)]
    language: Option<String>,
    #[arg(long, default_value_t = nd_core::DEFAULT_PAGE_SIZE, global = true)]
    page_size: u32,
    #[arg(long, default_value = "bart-large-cnn", global = true, help = "Model preset: bart-large-cnn (default), distilbart-cnn, t5-small")]
    model: ModelPreset,
    /// Override the pretrained model identifier while keeping the preset's decoding settings
    #[arg(long, global = true)]
    model_id: Option<String>,
    #[arg(long, default_value = "huggingface", global = true, help = "Inference backend: huggingface (default), lead")]
    backend: Backend,
    #[arg(long, global = true)]
    inference_url: Option<String>,
    #[arg(long, env = "HF_API_TOKEN", hide_env_values = true, global = true)]
    inference_token: Option<String>,
    /// Timeout for upstream calls (e.g. 30s, 1m, 1m30s)
    #[arg(long, default_value = "30s", global = true)]
    timeout: HumanDuration,
    /// Articles summarized in parallel per news request
    #[arg(long, default_value_t = nd_web::state::DEFAULT_CONCURRENCY, global = true)]
    concurrency: usize,
    #[arg(long, default_value_t = nd_inference::presets::DEFAULT_MAX_SENTENCES, global = true)]
    max_sentences: usize,
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API
    Serve {
        #[arg(long, env = "ND_BIND", default_value = "127.0.0.1:8000")]
        bind: SocketAddr,
    },
    /// Summarize a piece of text and print the result
    Summarize {
        #[arg(long, conflicts_with = "file", required_unless_present = "file")]
        text: Option<String>,
        /// Read the text from a file, or `-` for stdin
        #[arg(long)]
        file: Option<PathBuf>,
        #[arg(long)]
        url: Option<String>,
        #[arg(long)]
        max_length: Option<u32>,
        #[arg(long)]
        min_length: Option<u32>,
    },
    /// Fetch and summarize the headlines of a category
    News {
        /// e.g. business, entertainment, health, science, sports, technology
        category: String,
    },
}

impl Cli {
    fn inference_config(&self) -> InferenceConfig {
        let mut generation = GenerationConfig::from(self.model)
            .with_max_sentences(Some(self.max_sentences));
        if let Some(model_id) = &self.model_id {
            generation = generation.with_model_id(model_id.clone());
        }

        InferenceConfig {
            backend: self.backend,
            generation,
            api_token: self.inference_token.clone(),
            base_url: self.inference_url.clone(),
            timeout: self.timeout.0,
        }
    }

    fn news_settings(&self) -> NewsSettings {
        NewsSettings {
            country: Some(self.country.trim().to_string()).filter(|c| !c.is_empty()),
            language: self.language.clone(),
            page_size: self.page_size,
            concurrency: self.concurrency.max(1),
            ..Default::default()
        }
    }

    fn news_source(&self) -> anyhow::Result<NewsApiClient> {
        let api_key = self
            .news_api_key
            .clone()
            .ok_or_else(|| anyhow!("a NewsAPI key is required: pass --news-api-key or set NEWS_API_KEY"))?;
        let config = NewsApiConfig::new(api_key)
            .with_base_url(self.news_api_url.clone())
            .with_timeout(self.timeout.0);
        Ok(NewsApiClient::new(config)?)
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn read_text(text: Option<String>, file: Option<PathBuf>) -> anyhow::Result<String> {
    match (text, file) {
        (Some(text), _) => Ok(text),
        (None, Some(path)) if path.as_os_str() == "-" => {
            std::io::read_to_string(std::io::stdin()).context("failed to read stdin")
        }
        (None, Some(path)) => std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display())),
        (None, None) => Err(anyhow!("either --text or --file is required")),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();

    let inference_config = cli.inference_config();
    let summarizer = Arc::new(Summarizer::from_config(&inference_config)?);
    info!(
        "🧠 Summarizer initialized (backend {}, model {})",
        summarizer.backend_name(),
        summarizer.model_id()
    );

    match &cli.command {
        Commands::Serve { bind } => {
            let news_source = Arc::new(cli.news_source()?);
            info!("📰 News source ready ({})", news_source.name());
            let state = AppState::new(summarizer, news_source).with_news_settings(cli.news_settings());
            nd_web::serve(*bind, state).await?;
        }
        Commands::Summarize { text, file, url, max_length, min_length } => {
            let request = SummaryRequest {
                text: read_text(text.clone(), file.clone())?,
                url: url.clone(),
                max_length: *max_length,
                min_length: *min_length,
            };
            let result = summarizer.summarize(&request).await?;
            println!("{}", result.summary);
        }
        Commands::News { category } => {
            let news_source = cli.news_source()?;
            let settings = cli.news_settings();
            let query = CategoryQuery::new(category.clone())
                .with_country(settings.country.clone())
                .with_language(settings.language.clone())
                .with_page_size(settings.page_size);

            let articles = news_source.fetch_articles(&query).await;
            info!("📰 Fetched {} headlines for {}", articles.len(), category);
            let summaries = summarize_articles(
                &summarizer,
                articles,
                settings.max_summaries,
                settings.concurrency,
            )
            .await?;

            let response = NewsResponse {
                category: category.clone(),
                summaries,
            };
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }

    Ok(())
}
