pub mod error;
pub mod models;
pub mod news;
pub mod types;

pub use error::{Error, Result};
pub use models::SummarizationModel;
pub use news::NewsSource;
pub use types::{
    Article, CategoryQuery, GenerationParams, SummaryRequest, SummaryResult, DEFAULT_COUNTRY,
    DEFAULT_PAGE_SIZE,
};
