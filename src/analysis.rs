//! Sequential orchestration: gather page content, build the prompt, submit
//! it, and recover the JSON result.

use std::collections::HashMap;

use anyhow::Result;
use serde_json::Value;
use tracing::{info, warn};

use crate::error::AnalysisError;
use crate::prompt::{self, CompetitorContent};
use crate::{extract, fetch, llm, normalize, LLMParams};

/// Everything one analysis run needs as input. Competitor order is
/// preserved all the way into the prompt; manual overrides are keyed by the
/// exact URL string they replace.
#[derive(Clone, Debug, Default)]
pub struct AnalysisRequest {
    pub primary_keyword: String,
    pub secondary_keywords: Vec<String>,
    pub client_url: String,
    pub competitor_urls: Vec<String>,
    pub manual_client_content: Option<String>,
    pub manual_competitor_content: HashMap<String, String>,
}

/// Page text for the client and each competitor, plus warnings for
/// competitors that could not be fetched.
#[derive(Clone, Debug)]
pub struct GatheredContent {
    pub client_content: String,
    pub competitors: Vec<CompetitorContent>,
    pub warnings: Vec<String>,
}

/// A built prompt, ready to submit or to hand to the user for inspection.
#[derive(Clone, Debug)]
pub struct PreparedAnalysis {
    pub prompt: String,
    pub warnings: Vec<String>,
}

/// The parsed model reply together with any gathering warnings, so the
/// caller can show partial-input caveats next to the result.
#[derive(Clone, Debug)]
pub struct AnalysisReport {
    pub result: Value,
    pub warnings: Vec<String>,
}

/// Splits the comma-separated secondary keyword list, dropping blanks.
pub fn parse_secondary_keywords(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|keyword| !keyword.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parses one `URL=FILE` manual-content argument.
pub fn parse_manual_entry(entry: &str) -> Result<(String, String)> {
    match entry.split_once('=') {
        Some((url, path)) if !url.trim().is_empty() && !path.trim().is_empty() => {
            Ok((url.trim().to_string(), path.trim().to_string()))
        }
        _ => anyhow::bail!("Manual content must be given as URL=FILE, got '{}'", entry),
    }
}

/// Collects page text for the client URL and every competitor URL, one at a
/// time, in input order. A manual override skips the fetch for its URL. A
/// client page that cannot be fetched ends the run; a competitor that cannot
/// be fetched becomes a warning and an empty content block so the remaining
/// competitors still get analyzed.
pub async fn gather_site_content(
    client: &reqwest::Client,
    request: &AnalysisRequest,
) -> Result<GatheredContent, AnalysisError> {
    let client_content = match manual_override(request.manual_client_content.as_deref()) {
        Some(manual) => manual,
        None => fetch::fetch_page_text(client, &request.client_url).await?,
    };

    let mut competitors = Vec::with_capacity(request.competitor_urls.len());
    let mut warnings = Vec::new();
    for url in &request.competitor_urls {
        let manual = request.manual_competitor_content.get(url).map(String::as_str);
        let content = match manual_override(manual) {
            Some(manual) => manual,
            None => match fetch::fetch_page_text(client, url).await {
                Ok(text) => text,
                Err(e) => {
                    warn!("Continuing without competitor content: {}", e);
                    warnings.push(e.to_string());
                    String::new()
                }
            },
        };
        competitors.push(CompetitorContent {
            url: url.clone(),
            content,
        });
    }

    info!(
        "Gathered content for {} and {} competitors ({} warnings)",
        request.client_url,
        competitors.len(),
        warnings.len()
    );

    Ok(GatheredContent {
        client_content,
        competitors,
        warnings,
    })
}

/// Gathers content and builds the full prompt for `request`.
pub async fn prepare_analysis(
    client: &reqwest::Client,
    request: &AnalysisRequest,
) -> Result<PreparedAnalysis, AnalysisError> {
    let gathered = gather_site_content(client, request).await?;
    let prompt = prompt::competitor_analysis_prompt(
        &gathered.client_content,
        &gathered.competitors,
        &request.primary_keyword,
        &request.secondary_keywords,
    );
    Ok(PreparedAnalysis {
        prompt,
        warnings: gathered.warnings,
    })
}

/// Submits a prepared prompt and parses the reply into the final report.
pub async fn run_prepared(
    params: &LLMParams,
    prepared: &PreparedAnalysis,
) -> Result<AnalysisReport, AnalysisError> {
    let raw_reply = llm::submit_prompt(&prepared.prompt, prompt::SYSTEM_INSTRUCTION, params).await?;
    let result = extract::extract_json_object(&raw_reply)?;
    Ok(AnalysisReport {
        result,
        warnings: prepared.warnings.clone(),
    })
}

/// Trimmed and capped manual text. Blank or absent text resolves to `None`,
/// which sends the URL through the fetch chain instead.
fn manual_override(text: Option<&str>) -> Option<String> {
    let trimmed = text?.trim();
    if trimmed.is_empty() {
        return None;
    }
    let mut content = trimmed.to_string();
    normalize::truncate_chars(&mut content, normalize::MAX_CONTENT_CHARS);
    Some(content)
}
