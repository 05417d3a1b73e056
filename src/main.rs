use anyhow::Context;
use clap::Parser;
use job_aggregator::utils::{logger, validation::Validate};
use job_aggregator::{
    analyze_resume, AggregateResult, CliConfig, JobSearchService, ResumeAnalysis, SearchConfig,
    SearchError, SearchRequest,
};
use serde::Serialize;

/// 搜尋結果加上履歷分析摘要，與前端期待的回應格式一致
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchResponse<'a> {
    #[serde(flatten)]
    result: &'a AggregateResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    resume_analysis: Option<ResumeAnalysis>,
}

fn exit_code(error: &SearchError) -> i32 {
    match error {
        SearchError::ConfigError { .. } | SearchError::InvalidConfigValueError { .. } => 1,
        SearchError::IoError(_) | SearchError::SerializationError(_) => 2,
        _ => 3,
    }
}

fn fail(error: SearchError) -> ! {
    tracing::error!("❌ {}", error);
    eprintln!("❌ {}", error.user_friendly_message());
    std::process::exit(exit_code(&error));
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(cli.verbose);

    tracing::info!("Starting job-search CLI");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    if let Err(e) = cli.validate() {
        fail(e);
    }

    let config = SearchConfig::load(cli.config.as_deref()).unwrap_or_else(|e| fail(e));

    let resume = cli.load_resume().unwrap_or_else(|e| fail(e));
    let profile = resume.as_ref().map(|resume| analyze_resume(Some(resume)));
    if let Some(profile) = &profile {
        tracing::info!("📄 Resume analyzed: {}", profile.summary);
    }

    let service = JobSearchService::from_config(config).unwrap_or_else(|e| fail(e));
    let request = SearchRequest {
        skills: cli.skills.clone(),
        locations: Vec::new(),
        profile: profile.clone(),
    };

    let result = service.search(request).await.unwrap_or_else(|e| fail(e));

    let response = SearchResponse {
        result: &result,
        resume_analysis: profile.as_ref().map(ResumeAnalysis::from),
    };
    let output = if cli.pretty {
        serde_json::to_string_pretty(&response)
    } else {
        serde_json::to_string(&response)
    }
    .context("failed to serialize search response")?;
    println!("{}", output);

    Ok(())
}
