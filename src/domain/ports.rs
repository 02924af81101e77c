use crate::domain::model::{ComplaintRecord, ResultRow};
use crate::domain::schema::ComplaintInfo;
use crate::utils::error::Result;
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn input_path(&self) -> &str;
    fn output_path(&self) -> &str;
    fn batch_pause_interval(&self) -> usize;
    fn batch_pause_duration(&self) -> Duration;
}

/// The language model as a black box: a prompt plus the expected JSON
/// Schema in, one structured answer out.
#[async_trait]
pub trait ModelClient: Send + Sync {
    fn model_identifier(&self) -> &str;

    async fn respond(&self, prompt: &str, schema: &Value) -> Result<ComplaintInfo>;
}

/// Pacing hook used between batches of requests.
#[async_trait]
pub trait Pause: Send + Sync {
    async fn pause(&self, duration: Duration);
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<ComplaintRecord>>;
    async fn transform(&self, records: Vec<ComplaintRecord>) -> Result<Vec<ResultRow>>;
    async fn load(&self, rows: Vec<ResultRow>) -> Result<String>;
}
