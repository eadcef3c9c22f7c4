//! Markdown summary generation
//!
//! This module generates human-readable markdown summaries of a harvest,
//! including collection facts, verification outcomes, and the bookmarks
//! that failed verification.

use crate::model::CombinedResult;
use crate::output::stats::HarvestStatistics;
use crate::output::OutputResult;
use chrono::{DateTime, Utc};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Generates a markdown summary of a harvest and writes it to disk
///
/// # Arguments
///
/// * `result` - The combined result
/// * `config_hash` - Hash of the configuration the harvest ran with
/// * `output_path` - Path where the markdown file should be written
///
/// # Returns
///
/// * `Ok(())` - Successfully wrote markdown summary
/// * `Err(OutputError)` - Failed to write summary
pub fn generate_markdown_summary(
    result: &CombinedResult,
    config_hash: Option<&str>,
    output_path: &Path,
) -> OutputResult<()> {
    let stats = HarvestStatistics::from_result(result);
    let markdown = format_markdown_summary(result, &stats, config_hash, Utc::now());

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    Ok(())
}

/// Formats a harvest as markdown
///
/// # Returns
///
/// A formatted markdown string
pub fn format_markdown_summary(
    result: &CombinedResult,
    stats: &HarvestStatistics,
    config_hash: Option<&str>,
    generated_at: DateTime<Utc>,
) -> String {
    let mut md = String::new();

    // Title
    md.push_str(&format!("# Bookmark Harvest: {}\n\n", result.title));

    // Run metadata
    md.push_str("## Run Information\n\n");
    md.push_str(&format!(
        "- **Generated**: {}\n",
        generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    if let Some(hash) = config_hash {
        md.push_str(&format!("- **Config Hash**: {}\n", hash));
    }
    md.push('\n');

    // Collection facts
    md.push_str("## Collection\n\n");
    md.push_str(&format!("- **Pages**: {}\n", stats.pages));
    md.push_str(&format!(
        "- **Bookmarks**: {} (declared: {})\n",
        stats.total_items, stats.declared_items
    ));
    md.push_str(&format!("- **Unique URLs**: {}\n", stats.unique_urls));
    if !stats.duplicate_ids.is_empty() {
        md.push_str(&format!(
            "- **Duplicate IDs**: {}\n",
            stats.duplicate_ids.join(", ")
        ));
    }
    md.push('\n');

    if !stats.is_complete() {
        md.push_str(
            "> **Warning**: the number of collected bookmarks differs from the declared total.\n\n",
        );
    }

    // Verification
    md.push_str("## Verification\n\n");
    if stats.outcomes.is_empty() {
        md.push_str("Verification was not run.\n");
        return md;
    }

    md.push_str("| Check | Outcome | Count |\n");
    md.push_str("|-------|---------|-------|\n");
    for (check, counts) in &stats.outcomes {
        for (label, count) in counts {
            md.push_str(&format!("| {} | {} | {} |\n", check, label, count));
        }
    }
    md.push('\n');

    for check in stats.outcomes.keys() {
        md.push_str(&format!(
            "- **{} success rate**: {:.2}%\n",
            check,
            stats.success_rate(check)
        ));
    }
    md.push('\n');

    let failures: Vec<_> = result
        .items
        .iter()
        .flat_map(|item| {
            item.validity
                .iter()
                .flatten()
                .filter(|(_, outcome)| !outcome.is_success())
                .map(move |(check, outcome)| (item, check, outcome))
        })
        .collect();

    if !failures.is_empty() {
        md.push_str("## Failed Bookmarks\n\n");
        md.push_str("| ID | Title | URL | Check | Outcome |\n");
        md.push_str("|----|-------|-----|-------|---------|\n");
        for (item, check, outcome) in failures {
            md.push_str(&format!(
                "| {} | {} | {} | {} | {} |\n",
                item.id,
                escape_cell(&item.title),
                item.url,
                check,
                escape_cell(&outcome.to_string())
            ));
        }
        md.push('\n');
    }

    md
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}
