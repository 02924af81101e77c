use crate::core::batch::BatchRunner;
use crate::core::table::{self, TableFormat};
use crate::core::{ComplaintRecord, ConfigProvider, ModelClient, Pause, Pipeline, ResultRow, Storage};
use crate::utils::error::Result;

/// Reads the complaint table, extracts fields record by record and writes the
/// result table.
pub struct ComplaintPipeline<S: Storage, C: ConfigProvider, M: ModelClient, P: Pause> {
    storage: S,
    config: C,
    runner: BatchRunner<M, P>,
}

impl<S: Storage, C: ConfigProvider, M: ModelClient, P: Pause> ComplaintPipeline<S, C, M, P> {
    pub fn new(storage: S, config: C, runner: BatchRunner<M, P>) -> Self {
        Self {
            storage,
            config,
            runner,
        }
    }

    pub fn runner(&self) -> &BatchRunner<M, P> {
        &self.runner
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider, M: ModelClient, P: Pause> Pipeline for ComplaintPipeline<S, C, M, P> {
    async fn extract(&self) -> Result<Vec<ComplaintRecord>> {
        let input_path = self.config.input_path();
        tracing::debug!("Reading complaint table from: {}", input_path);

        let data = self.storage.read_file(input_path).await?;
        let records = table::read_records(&data, TableFormat::from_path(input_path))?;

        tracing::info!("📥 Loaded {} records from {}", records.len(), input_path);
        Ok(records)
    }

    async fn transform(&self, records: Vec<ComplaintRecord>) -> Result<Vec<ResultRow>> {
        tracing::info!(
            "🤖 Extracting fields with model {}",
            self.runner.extractor().model().model_identifier()
        );
        Ok(self.runner.run(&records).await)
    }

    async fn load(&self, rows: Vec<ResultRow>) -> Result<String> {
        let output_path = self.config.output_path();
        let data = table::write_rows(&rows, TableFormat::from_path(output_path))?;

        tracing::debug!("Writing {} rows ({} bytes) to storage", rows.len(), data.len());
        self.storage.write_file(output_path, &data).await?;

        Ok(output_path.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::batch::PacingPolicy;
    use crate::core::etl::EtlEngine;
    use crate::core::extractor::tests::{metro_info, StubModel};
    use crate::core::extractor::ComplaintExtractor;
    use crate::utils::error::{ErrorSeverity, EtlError};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::Mutex;

    #[derive(Clone)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
        read_only: bool,
    }

    impl MockStorage {
        fn with_file(path: &str, data: &str) -> Self {
            let mut files = HashMap::new();
            files.insert(path.to_string(), data.as_bytes().to_vec());
            Self {
                files: Arc::new(Mutex::new(files)),
                read_only: false,
            }
        }

        fn read_only(mut self) -> Self {
            self.read_only = true;
            self
        }

        async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned()
        }
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned().ok_or_else(|| {
                EtlError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", path),
                ))
            })
        }

        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            if self.read_only {
                return Err(EtlError::IoError(std::io::Error::new(
                    std::io::ErrorKind::PermissionDenied,
                    format!("Permission denied: {}", path),
                )));
            }
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    struct MockConfig {
        input_path: String,
        output_path: String,
    }

    impl ConfigProvider for MockConfig {
        fn input_path(&self) -> &str {
            &self.input_path
        }

        fn output_path(&self) -> &str {
            &self.output_path
        }

        fn batch_pause_interval(&self) -> usize {
            10
        }

        fn batch_pause_duration(&self) -> Duration {
            Duration::ZERO
        }
    }

    struct NoPause;

    #[async_trait]
    impl Pause for NoPause {
        async fn pause(&self, _duration: Duration) {}
    }

    fn pipeline(
        storage: MockStorage,
        output_path: &str,
    ) -> ComplaintPipeline<MockStorage, MockConfig, StubModel, NoPause> {
        let config = MockConfig {
            input_path: "in.csv".to_string(),
            output_path: output_path.to_string(),
        };
        let runner = BatchRunner::with_pause(
            ComplaintExtractor::new(StubModel::answering(metro_info())),
            PacingPolicy::from_config(&config),
            NoPause,
        );
        ComplaintPipeline::new(storage, config, runner)
    }

    #[tokio::test]
    async fn test_extract_transform_load() {
        let storage = MockStorage::with_file(
            "in.csv",
            "工单内容,来电号码\n1号线噪音很大，小区是望京花园,456\n,123\n",
        );
        let pipeline = pipeline(storage.clone(), "out.csv");

        let records = pipeline.extract().await.unwrap();
        assert_eq!(records.len(), 2);

        let rows = pipeline.transform(records).await.unwrap();
        let path = pipeline.load(rows).await.unwrap();

        assert_eq!(path, "out.csv");
        let written = String::from_utf8(storage.get_file("out.csv").await.unwrap()).unwrap();
        let lines: Vec<&str> = written.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "1号线噪音很大，小区是望京花园,456,1号线,望京花园,列车噪音,");
        assert_eq!(lines[2], ",123,,,,");
        assert_eq!(pipeline.runner().extractor().model().calls(), 1);
    }

    #[tokio::test]
    async fn test_extract_missing_input_is_error() {
        let storage = MockStorage::with_file("other.csv", "工单内容,来电号码\n");
        let pipeline = pipeline(storage, "out.csv");

        let err = pipeline.extract().await.unwrap_err();

        assert!(matches!(err, EtlError::IoError(_)));
    }

    #[tokio::test]
    async fn test_load_writes_tsv_by_extension() {
        let storage = MockStorage::with_file("in.csv", "工单内容,来电号码\n");
        let pipeline = pipeline(storage.clone(), "out.tsv");

        pipeline.load(Vec::new()).await.unwrap();

        let written = String::from_utf8(storage.get_file("out.tsv").await.unwrap()).unwrap();
        assert!(written.starts_with("工单内容\t来电号码\t线路"));
    }

    #[tokio::test]
    async fn test_unwritable_output_fails_the_run() {
        let storage = MockStorage::with_file(
            "in.csv",
            "工单内容,来电号码\n1号线噪音很大，小区是望京花园,456\n",
        )
        .read_only();
        let engine = EtlEngine::new(pipeline(storage.clone(), "out.csv"));

        let err = engine.run().await.unwrap_err();

        assert!(matches!(err, EtlError::IoError(ref e) if e.kind() == std::io::ErrorKind::PermissionDenied));
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert!(storage.get_file("out.csv").await.is_none());
    }
}
