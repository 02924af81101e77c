use crate::core::report::{self, SummaryStats};
use crate::core::Pipeline;
use crate::utils::error::Result;

#[derive(Debug, Clone)]
pub struct RunReport {
    pub output_path: String,
    pub summary: SummaryStats,
}

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<RunReport> {
        tracing::info!("Starting complaint extraction...");

        // Extract
        let records = self.pipeline.extract().await?;
        let input_count = records.len();
        tracing::info!("Extracted {} records", input_count);

        // Transform
        let rows = self.pipeline.transform(records).await?;
        debug_assert_eq!(rows.len(), input_count);
        let summary = report::summarize(&rows);

        // Load
        tracing::info!("Saving {} result rows...", rows.len());
        let output_path = self.pipeline.load(rows).await?;
        tracing::info!("Output saved to: {}", output_path);

        Ok(RunReport {
            output_path,
            summary,
        })
    }
}
