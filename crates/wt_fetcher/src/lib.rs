pub mod format;
pub mod wikipedia;

pub use format::{format_sections, parse_extract};
pub use wikipedia::{load_content, safe_filename, save_content, WikipediaFetcher};

pub mod prelude {
    pub use super::wikipedia::WikipediaFetcher;
    pub use wt_core::{ArticleRecord, ContentSource, Error, Result};
}
