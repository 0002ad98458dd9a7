use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use tracing::info;

use seoscout::analysis::{self, AnalysisRequest};
use seoscout::config::{Provider, Settings};
use seoscout::error::AnalysisError;
use seoscout::{fetch, logging, report};

#[derive(Parser)]
#[clap(
    name = "seoscout",
    about = "Compare a page against its competitors for a keyword set and get an LLM-built content analysis"
)]
struct Cli {
    /// Primary keyword the pages compete for
    #[clap(long)]
    primary_keyword: String,

    /// Comma-separated secondary keywords
    #[clap(long, default_value = "")]
    secondary_keywords: String,

    /// URL of your own page
    #[clap(long)]
    client_url: String,

    /// Competitor page URL; repeat once per competitor, order is kept
    #[clap(long = "competitor", value_name = "URL")]
    competitors: Vec<String>,

    /// File with page text for your own page, used instead of fetching it
    #[clap(long, value_name = "FILE")]
    client_content: Option<PathBuf>,

    /// Manual competitor content as URL=FILE; repeat per competitor
    #[clap(long = "manual", value_name = "URL=FILE")]
    manual: Vec<String>,

    /// Model provider to submit the analysis to
    #[clap(long, value_enum, default_value = "gemini")]
    provider: Provider,

    /// Model name; defaults to the selected provider's standard model
    #[clap(long)]
    model: Option<String>,

    /// Google API key; read from GOOGLE_API_KEY when not given
    #[clap(long, value_name = "KEY")]
    google_api_key: Option<String>,

    /// OpenAI API key; read from OPENAI_API_KEY when not given
    #[clap(long, value_name = "KEY")]
    openai_api_key: Option<String>,

    /// Sampling temperature
    #[clap(long, default_value = "0.0")]
    temperature: f32,

    /// Maximum tokens requested from the provider
    #[clap(long, default_value = "1500")]
    max_tokens: u32,

    /// Where the JSON result is written
    #[clap(long, default_value = report::DEFAULT_ARTIFACT_NAME)]
    output: PathBuf,

    /// Print the built prompt before submitting it
    #[clap(long)]
    show_prompt: bool,

    /// Build and print the prompt, then exit without contacting any provider
    #[clap(long)]
    prompt_only: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    logging::configure_logging();

    // Parse command line arguments
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        report_failure(&e);
        process::exit(1);
    }
    Ok(())
}

async fn run(cli: Cli) -> Result<()> {
    let request = build_request(&cli)?;
    let http = fetch::create_http_client()?;

    if cli.prompt_only {
        let prepared = analysis::prepare_analysis(&http, &request).await?;
        println!("{}", prepared.prompt);
        return Ok(());
    }

    let settings = Settings::resolve(
        cli.provider,
        cli.model.clone(),
        cli.temperature,
        cli.max_tokens,
        cli.google_api_key.clone(),
        cli.openai_api_key.clone(),
    );
    // Resolve the provider client before any fetching, so a missing
    // credential fails the run in milliseconds instead of after the fetches.
    let params = settings.llm_params()?;

    info!(
        "Starting analysis of {} against {} competitors via {}",
        request.client_url,
        request.competitor_urls.len(),
        params.llm_client.provider_name()
    );

    let prepared = analysis::prepare_analysis(&http, &request).await?;
    if cli.show_prompt {
        println!("{}", prepared.prompt);
    }

    let analysis_report = analysis::run_prepared(&params, &prepared).await?;

    print!("{}", report::render(&analysis_report.result, &analysis_report.warnings));
    report::write_artifact(&analysis_report.result, &cli.output)?;
    println!("Saved analysis to {}", cli.output.display());

    Ok(())
}

fn build_request(cli: &Cli) -> Result<AnalysisRequest> {
    let client_url = cli.client_url.trim().to_string();
    if !fetch::is_valid_url(&client_url) {
        anyhow::bail!("Client URL is not a valid http(s) URL: '{}'", client_url);
    }

    let mut competitor_urls = Vec::new();
    for url in &cli.competitors {
        let url = url.trim();
        if url.is_empty() {
            continue;
        }
        if !fetch::is_valid_url(url) {
            anyhow::bail!("Competitor URL is not a valid http(s) URL: '{}'", url);
        }
        competitor_urls.push(url.to_string());
    }

    let manual_client_content = match &cli.client_content {
        Some(path) => Some(
            fs::read_to_string(path)
                .with_context(|| format!("Failed to read client content from {}", path.display()))?,
        ),
        None => None,
    };

    let mut manual_competitor_content = HashMap::new();
    for entry in &cli.manual {
        let (url, path) = analysis::parse_manual_entry(entry)?;
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read manual content from {}", path))?;
        manual_competitor_content.insert(url, content);
    }

    Ok(AnalysisRequest {
        primary_keyword: cli.primary_keyword.trim().to_string(),
        secondary_keywords: analysis::parse_secondary_keywords(&cli.secondary_keywords),
        client_url,
        competitor_urls,
        manual_client_content,
        manual_competitor_content,
    })
}

/// Failure output tailored to what the user can do next.
fn report_failure(e: &anyhow::Error) {
    match e.downcast_ref::<AnalysisError>() {
        Some(AnalysisError::ExtractionFailure { raw_output }) => {
            eprintln!("{} {}", "error:".red().bold(), e);
            eprintln!("Raw model output follows; the prompt may need adjusting or resubmitting:\n");
            eprintln!("{}", raw_output);
        }
        Some(AnalysisError::ProviderUnavailable { .. }) => {
            eprintln!("{} {}", "error:".red().bold(), e);
            eprintln!("Use --prompt-only to build the prompt and submit it elsewhere.");
        }
        _ => {
            eprintln!("{} {:#}", "error:".red().bold(), e);
        }
    }
}
