//! Terminal rendering of an analysis result and the JSON artifact writer.
//!
//! The model promises a fixed field set, but replies are still treated as
//! untrusted: every field is optional, wrong types are skipped, and
//! unrecognized fields simply stay in the artifact.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;
use prettytable::{Cell, Row as PrettyRow, Table};
use serde_json::Value;

/// Artifact filename used when no --output is given.
pub const DEFAULT_ARTIFACT_NAME: &str = "competitor_analysis.json";

/// Renders the recognized sections of `result` for the terminal, with any
/// gathering warnings first. Returns an explanatory line when nothing in the
/// reply is recognized.
pub fn render(result: &Value, warnings: &[String]) -> String {
    let mut out = String::new();

    for warning in warnings {
        out.push_str(&format!("{} {}\n", "warning:".yellow().bold(), warning));
    }
    if !warnings.is_empty() {
        out.push('\n');
    }

    let rendered_any = render_sections(result, &mut out);
    if !rendered_any {
        out.push_str(
            "No recognized sections in the analysis result; the full reply is in the JSON artifact.\n",
        );
    }

    out
}

/// Serializes `result` to `path` as indented JSON.
pub fn write_artifact(result: &Value, path: &Path) -> Result<()> {
    let pretty =
        serde_json::to_string_pretty(result).context("Failed to serialize analysis result")?;
    fs::write(path, pretty).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

fn render_sections(result: &Value, out: &mut String) -> bool {
    let mut rendered_any = false;

    if let Some(overview) = result.get("strategicOverview").and_then(Value::as_str) {
        push_section(out, "Strategic Overview");
        out.push_str(overview);
        out.push_str("\n\n");
        rendered_any = true;
    }

    if let Some(intent) = result.get("searchIntent").and_then(Value::as_str) {
        push_section(out, "Search Intent");
        out.push_str(intent);
        out.push_str("\n\n");
        rendered_any = true;
    }

    if let Some(opportunities) = non_empty_array(result, "topRankingOpportunities") {
        push_section(out, "Top Ranking Opportunities");
        for opportunity in opportunities {
            if let Some(opportunity) = opportunity.as_str() {
                out.push_str(&format!("- {}\n", opportunity));
            }
        }
        out.push('\n');
        rendered_any = true;
    }

    if let Some(gaps) = non_empty_array(result, "contentGaps") {
        push_section(out, "Content Gaps");
        let mut table = Table::new();
        table.add_row(PrettyRow::new(vec![
            Cell::new("Topic"),
            Cell::new("Importance"),
            Cell::new("Missing From"),
            Cell::new("Description"),
        ]));
        for gap in gaps {
            table.add_row(PrettyRow::new(vec![
                Cell::new(&text_field(gap, "topic")),
                Cell::new(&text_field(gap, "importance")),
                Cell::new(&text_field(gap, "missingFrom")),
                Cell::new(&text_field(gap, "description")),
            ]));
        }
        out.push_str(&table.to_string());
        out.push('\n');
        rendered_any = true;
    }

    if let Some(recommendations) = result
        .get("linkableAssets")
        .and_then(|assets| assets.get("recommendations"))
        .and_then(Value::as_array)
        .filter(|items| !items.is_empty())
    {
        push_section(out, "Linkable Assets");
        for recommendation in recommendations {
            let asset_type = text_field(recommendation, "type");
            let reason = text_field(recommendation, "reason");
            out.push_str(&format!("- {}: {}\n", asset_type.bold(), reason));
            let example = text_field(recommendation, "exampleFromCompetitor");
            if !example.is_empty() {
                out.push_str(&format!("  Example: {}\n", example));
            }
            let url = text_field(recommendation, "competitorUrl");
            if !url.is_empty() {
                out.push_str(&format!("  {}\n", url));
            }
        }
        out.push('\n');
        rendered_any = true;
    }

    if let Some(steps) = non_empty_array(result, "actionPlan") {
        push_section(out, "Action Plan");
        for (index, step) in steps.iter().enumerate() {
            if let Some(step) = step.as_str() {
                out.push_str(&format!("{}. {}\n", index + 1, step));
            }
        }
        out.push('\n');
        rendered_any = true;
    }

    if let Some(comparisons) = non_empty_array(result, "competitorComparisons") {
        push_section(out, "Competitor Comparisons");
        let mut table = Table::new();
        table.add_row(PrettyRow::new(vec![
            Cell::new("URL"),
            Cell::new("Title"),
            Cell::new("Word Count"),
            Cell::new("Top Keywords"),
        ]));
        for comparison in comparisons {
            table.add_row(PrettyRow::new(vec![
                Cell::new(&text_field(comparison, "url")),
                Cell::new(&text_field(comparison, "title")),
                Cell::new(&text_field(comparison, "wordCount")),
                Cell::new(&string_list(comparison, "topKeywords")),
            ]));
        }
        out.push_str(&table.to_string());
        out.push('\n');
        rendered_any = true;
    }

    if let Some(notes) = result.get("notes").and_then(Value::as_str) {
        push_section(out, "Notes");
        out.push_str(notes);
        out.push('\n');
        rendered_any = true;
    }

    rendered_any
}

fn push_section(out: &mut String, title: &str) {
    out.push_str(&format!("{}\n", title.bold()));
}

fn non_empty_array<'a>(result: &'a Value, field: &str) -> Option<&'a Vec<Value>> {
    result
        .get(field)
        .and_then(Value::as_array)
        .filter(|items| !items.is_empty())
}

/// String or number rendered as text; anything else is an empty cell.
fn text_field(value: &Value, field: &str) -> String {
    match value.get(field) {
        Some(Value::String(text)) => text.clone(),
        Some(Value::Number(number)) => number.to_string(),
        _ => String::new(),
    }
}

fn string_list(value: &Value, field: &str) -> String {
    value
        .get(field)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .collect::<Vec<_>>()
                .join(", ")
        })
        .unwrap_or_default()
}
