#[cfg(feature = "cli")]
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

/// Per-record progress bar for the batch runner.
#[cfg(feature = "cli")]
pub struct BatchProgress {
    bar: ProgressBar,
}

#[cfg(feature = "cli")]
impl BatchProgress {
    pub fn new(total: usize, enabled: bool) -> Self {
        let bar = ProgressBar::new(total as u64);
        if enabled {
            bar.set_style(
                ProgressStyle::default_bar()
                    .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} records {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_bar())
                    .progress_chars("=>-"),
            );
        } else {
            bar.set_draw_target(ProgressDrawTarget::hidden());
        }
        Self { bar }
    }

    pub fn inc(&self) {
        self.bar.inc(1);
    }

    /// 里程碑訊息印在進度條上方，避免被覆蓋；沒有進度條時改寫日誌
    pub fn milestone(&self, processed: usize) {
        if self.bar.is_hidden() {
            tracing::info!("Processed {} records", processed);
        } else {
            self.bar.println(format!("✔ Processed {} records", processed));
        }
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

// 為非CLI環境提供空實現
#[cfg(not(feature = "cli"))]
pub struct BatchProgress;

#[cfg(not(feature = "cli"))]
impl BatchProgress {
    pub fn new(_total: usize, _enabled: bool) -> Self {
        Self
    }

    pub fn inc(&self) {}

    pub fn milestone(&self, processed: usize) {
        tracing::info!("Processed {} records", processed);
    }

    pub fn finish(&self) {}
}
