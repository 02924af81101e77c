use anyhow::Result;
use httpmock::prelude::*;
use metro_complaint_etl::{
    AppConfig, BatchRunner, ComplaintExtractor, ComplaintPipeline, EtlEngine, EtlError,
    LmStudioClient, LocalStorage, PacingPolicy,
};
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;

const MODEL: &str = "qwen/qwen3-30b-a3b-mlx";

fn config_for(dir: &Path, base_url: &str) -> AppConfig {
    AppConfig {
        input_path: dir.join("complaints.csv").to_string_lossy().into_owned(),
        output_path: dir.join("out/result.csv").to_string_lossy().into_owned(),
        model_identifier: MODEL.to_string(),
        base_url: base_url.to_string(),
        batch_pause_duration: Duration::ZERO,
        ..AppConfig::default()
    }
}

async fn mock_models(server: &MockServer) {
    server
        .mock_async(|when, then| {
            when.method(GET).path("/v1/models");
            then.status(200)
                .json_body(serde_json::json!({ "object": "list", "data": [{ "id": MODEL }] }));
        })
        .await;
}

fn completion(content: serde_json::Value) -> serde_json::Value {
    serde_json::json!({
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content.to_string() },
            "finish_reason": "stop"
        }]
    })
}

#[tokio::test]
async fn test_end_to_end_with_lmstudio() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let server = MockServer::start_async().await;
    mock_models(&server).await;

    let answered = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/v1/chat/completions")
                .body_contains("望京花园");
            then.status(200).json_body(completion(serde_json::json!({
                "line": "1号线",
                "location": "望京花园",
                "noise_type": "列车噪音",
                "vibration_type": "null"
            })));
        })
        .await;
    let broken = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/v1/chat/completions")
                .body_contains("深夜轰鸣");
            then.status(500).body("model crashed");
        })
        .await;

    let config = config_for(temp_dir.path(), &server.url("/v1"));
    std::fs::write(
        &config.input_path,
        "工单内容,来电号码\n1号线噪音很大，小区是望京花园,456\n,123\n2号线深夜轰鸣,789\n",
    )?;

    let model = LmStudioClient::connect(&config.base_url, MODEL, Duration::from_secs(5)).await?;
    let runner = BatchRunner::new(ComplaintExtractor::new(model), PacingPolicy::from_config(&config));
    let output_path = config.output_path.clone();
    let engine = EtlEngine::new(ComplaintPipeline::new(LocalStorage::current_dir(), config, runner));

    let report = engine.run().await?;

    answered.assert_hits_async(1).await;
    broken.assert_hits_async(1).await;
    assert_eq!(report.output_path, output_path);
    assert_eq!(report.summary.total, 3);
    assert_eq!(report.summary.line_count, 1);
    assert_eq!(report.summary.vibration_type_count, 0);

    let written = std::fs::read_to_string(&output_path)?;
    let lines: Vec<&str> = written.lines().collect();
    assert_eq!(
        lines,
        vec![
            "工单内容,来电号码,线路,小区/位置,噪音类型,振动类型",
            "1号线噪音很大，小区是望京花园,456,1号线,望京花园,列车噪音,",
            ",123,,,,",
            "2号线深夜轰鸣,789,,,,",
        ]
    );
    Ok(())
}

#[tokio::test]
async fn test_model_unavailable_aborts_before_processing() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let server = MockServer::start_async().await;
    let models = server
        .mock_async(|when, then| {
            when.method(GET).path("/v1/models");
            then.status(503);
        })
        .await;
    let chat = server
        .mock_async(|when, then| {
            when.method(POST).path("/v1/chat/completions");
            then.status(200);
        })
        .await;

    let config = config_for(temp_dir.path(), &server.url("/v1"));
    let result = LmStudioClient::connect(&config.base_url, MODEL, Duration::from_secs(5)).await;

    models.assert_async().await;
    assert!(matches!(result, Err(EtlError::ModelUnavailable { .. })));
    assert_eq!(chat.hits_async().await, 0);
    assert!(!Path::new(&config.output_path).exists());
    Ok(())
}

#[tokio::test]
async fn test_unreadable_input_writes_no_output() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let server = MockServer::start_async().await;
    mock_models(&server).await;

    let config = config_for(temp_dir.path(), &server.url("/v1"));
    let output_path = config.output_path.clone();
    let model = LmStudioClient::connect(&config.base_url, MODEL, Duration::from_secs(5)).await?;
    let runner = BatchRunner::new(ComplaintExtractor::new(model), PacingPolicy::from_config(&config));
    let engine = EtlEngine::new(ComplaintPipeline::new(LocalStorage::current_dir(), config, runner));

    let err = engine.run().await.unwrap_err();

    assert!(matches!(err, EtlError::IoError(_)));
    assert!(!Path::new(&output_path).exists());
    Ok(())
}

#[tokio::test]
async fn test_input_without_required_columns_is_fatal() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let server = MockServer::start_async().await;
    mock_models(&server).await;

    let config = config_for(temp_dir.path(), &server.url("/v1"));
    std::fs::write(&config.input_path, "内容,电话\n噪音,1\n")?;
    let output_path = config.output_path.clone();
    let model = LmStudioClient::connect(&config.base_url, MODEL, Duration::from_secs(5)).await?;
    let runner = BatchRunner::new(ComplaintExtractor::new(model), PacingPolicy::from_config(&config));
    let engine = EtlEngine::new(ComplaintPipeline::new(LocalStorage::current_dir(), config, runner));

    let err = engine.run().await.unwrap_err();

    assert!(matches!(err, EtlError::MissingColumnError { .. }));
    assert!(!Path::new(&output_path).exists());
    Ok(())
}

#[tokio::test]
async fn test_unwritable_output_path_is_fatal() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let server = MockServer::start_async().await;
    mock_models(&server).await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/v1/chat/completions");
            then.status(200).json_body(completion(serde_json::json!({
                "line": "1号线",
                "location": "null",
                "noise_type": "null",
                "vibration_type": "null"
            })));
        })
        .await;

    // 輸出目錄的位置被一般檔案佔用，無法建立
    let blocker = temp_dir.path().join("out");
    std::fs::write(&blocker, "not a directory")?;
    let config = config_for(temp_dir.path(), &server.url("/v1"));
    std::fs::write(&config.input_path, "工单内容,来电号码\n1号线噪音,1\n")?;
    let model = LmStudioClient::connect(&config.base_url, MODEL, Duration::from_secs(5)).await?;
    let runner = BatchRunner::new(ComplaintExtractor::new(model), PacingPolicy::from_config(&config));
    let engine = EtlEngine::new(ComplaintPipeline::new(LocalStorage::current_dir(), config, runner));

    let err = engine.run().await.unwrap_err();

    assert!(matches!(err, EtlError::IoError(_)));
    assert_eq!(std::fs::read_to_string(&blocker)?, "not a directory");
    Ok(())
}
