pub mod newsapi;

pub use newsapi::{NewsApiClient, NewsApiConfig};

pub mod prelude {
    pub use super::newsapi::{NewsApiClient, NewsApiConfig, DEFAULT_BASE_URL};
    pub use nd_core::{Article, CategoryQuery, NewsSource, Result, Error};
}
