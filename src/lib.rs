pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliArgs;

pub use crate::adapters::http::LmStudioClient;
pub use crate::config::{cli::LocalStorage, AppConfig};
pub use crate::core::{
    batch::{BatchRunner, PacingPolicy},
    etl::{EtlEngine, RunReport},
    extractor::{ComplaintExtractor, ExtractionOutcome},
    pipeline::ComplaintPipeline,
    prompt::PromptBuilder,
    report::{summarize, SummaryStats},
};
pub use crate::domain::model::{ComplaintRecord, ExtractedFields, ResultRow};
pub use crate::utils::error::{EtlError, Result};
