pub mod batch;
pub mod etl;
pub mod extractor;
pub mod pipeline;
pub mod prompt;
pub mod report;
pub mod table;

pub use crate::domain::model::{ComplaintRecord, ExtractedFields, ResultRow};
pub use crate::domain::ports::{ConfigProvider, ModelClient, Pause, Pipeline, Storage};
pub use crate::utils::error::Result;
