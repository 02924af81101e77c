use crate::core::extractor::{ComplaintExtractor, ExtractionOutcome};
use crate::domain::model::{ComplaintRecord, ResultRow};
use crate::domain::ports::{ConfigProvider, ModelClient, Pause};
use crate::utils::progress::BatchProgress;
use async_trait::async_trait;
use std::time::Duration;

pub const DEFAULT_PAUSE_INTERVAL: usize = 10;
pub const DEFAULT_PAUSE_DURATION: Duration = Duration::from_secs(1);

/// Fixed pause after every `interval` records. An interval of 0 disables it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacingPolicy {
    pub interval: usize,
    pub duration: Duration,
}

impl Default for PacingPolicy {
    fn default() -> Self {
        Self {
            interval: DEFAULT_PAUSE_INTERVAL,
            duration: DEFAULT_PAUSE_DURATION,
        }
    }
}

impl PacingPolicy {
    pub fn from_config<C: ConfigProvider>(config: &C) -> Self {
        Self {
            interval: config.batch_pause_interval(),
            duration: config.batch_pause_duration(),
        }
    }

    /// `processed` is 1-indexed.
    pub fn should_pause(&self, processed: usize) -> bool {
        self.interval > 0 && processed % self.interval == 0
    }
}

pub struct TokioPause;

#[async_trait]
impl Pause for TokioPause {
    async fn pause(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

pub struct BatchRunner<M: ModelClient, P: Pause = TokioPause> {
    extractor: ComplaintExtractor<M>,
    pacing: PacingPolicy,
    pause: P,
    show_progress: bool,
}

impl<M: ModelClient> BatchRunner<M, TokioPause> {
    pub fn new(extractor: ComplaintExtractor<M>, pacing: PacingPolicy) -> Self {
        Self::with_pause(extractor, pacing, TokioPause)
    }
}

impl<M: ModelClient, P: Pause> BatchRunner<M, P> {
    pub fn with_pause(extractor: ComplaintExtractor<M>, pacing: PacingPolicy, pause: P) -> Self {
        Self {
            extractor,
            pacing,
            pause,
            show_progress: false,
        }
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub fn pause_hook(&self) -> &P {
        &self.pause
    }

    pub fn extractor(&self) -> &ComplaintExtractor<M> {
        &self.extractor
    }

    /// Processes every record in order. Always returns one row per record.
    pub async fn run(&self, records: &[ComplaintRecord]) -> Vec<ResultRow> {
        let progress = BatchProgress::new(records.len(), self.show_progress);
        let mut rows = Vec::with_capacity(records.len());
        let mut failed = 0usize;
        let mut skipped = 0usize;

        for (idx, record) in records.iter().enumerate() {
            let processed = idx + 1;

            let outcome = self.extractor.extract(record.content.as_deref()).await;
            match &outcome {
                ExtractionOutcome::Failed(e) => {
                    failed += 1;
                    tracing::warn!("⚠️ Extraction failed for record {}: {}", processed, e);
                }
                ExtractionOutcome::Skipped => skipped += 1,
                ExtractionOutcome::Extracted(fields) => {
                    tracing::debug!("Record {} extracted: {:?}", processed, fields);
                }
            }

            rows.push(ResultRow::new(record, outcome.into_fields()));
            progress.inc();

            if self.pacing.should_pause(processed) {
                progress.milestone(processed);
                self.pause.pause(self.pacing.duration).await;
            }
        }

        progress.finish();
        tracing::info!(
            "Batch finished: {} records, {} skipped (empty content), {} failed",
            rows.len(),
            skipped,
            failed
        );

        rows
    }
}
