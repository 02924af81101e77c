use clap::Parser;
use metro_complaint_etl::utils::error::{EtlError, ErrorSeverity};
use metro_complaint_etl::utils::{logger, validation::Validate};
use metro_complaint_etl::{
    AppConfig, BatchRunner, CliArgs, ComplaintExtractor, ComplaintPipeline, EtlEngine,
    LmStudioClient, LocalStorage, PacingPolicy,
};

fn exit_with(e: EtlError) -> ! {
    tracing::error!(
        "❌ Run failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 建議: {}", e.recovery_suggestion());

    let exit_code = match e.severity() {
        ErrorSeverity::Medium => 2,   // 模型回應錯誤
        ErrorSeverity::High => 1,     // 配置或檔案錯誤
        ErrorSeverity::Critical => 3, // 無法連線模型
    };
    std::process::exit(exit_code);
}

#[tokio::main]
async fn main() {
    let args = CliArgs::parse();

    // 初始化日誌
    if args.log_json {
        logger::init_json_logger(args.verbose);
    } else {
        logger::init_cli_logger(args.verbose);
    }

    tracing::info!("🚀 Starting metro complaint extraction");

    let config = AppConfig::from_args(&args).unwrap_or_else(|e| exit_with(e));
    if args.verbose {
        tracing::debug!("Resolved config: {:?}", config);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        exit_with(e);
    }
    let prompts = config.prompt_builder().unwrap_or_else(|e| exit_with(e));

    // 先連線模型，失敗則不讀取任何資料
    let model = LmStudioClient::connect(
        &config.base_url,
        &config.model_identifier,
        config.request_timeout,
    )
    .await
    .unwrap_or_else(|e| exit_with(e));

    let runner = BatchRunner::new(
        ComplaintExtractor::with_prompts(model, prompts),
        PacingPolicy::from_config(&config),
    )
    .with_progress(!args.no_progress);
    let pipeline = ComplaintPipeline::new(LocalStorage::current_dir(), config, runner);
    let engine = EtlEngine::new(pipeline);

    match engine.run().await {
        Ok(report) => {
            println!("{}", report.summary);
            tracing::info!("✅ Extraction completed successfully!");
            println!("✅ Extraction completed successfully!");
            println!("📁 Output saved to: {}", report.output_path);
        }
        Err(e) => exit_with(e),
    }
}
