//! Statistics over a harvested collection
//!
//! This module tallies verification outcomes and other collection facts for
//! display on the command line and in the markdown summary.

use crate::model::{CombinedResult, ValidityOutcome};
use std::collections::{BTreeMap, HashSet};

/// Harvest statistics summary
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HarvestStatistics {
    /// Number of items collected
    pub total_items: u64,

    /// Number of pages declared by the collection
    pub pages: u32,

    /// Number of items declared by the collection
    pub declared_items: u64,

    /// Number of items carrying at least one check outcome
    pub verified_items: u64,

    /// Outcome counts per check, keyed by check name then outcome label
    pub outcomes: BTreeMap<String, BTreeMap<&'static str, u64>>,

    /// Number of distinct URLs
    pub unique_urls: u64,

    /// Items whose id appears more than once
    pub duplicate_ids: Vec<String>,
}

impl HarvestStatistics {
    /// Computes statistics for a harvested collection
    pub fn from_result(result: &CombinedResult) -> Self {
        let mut stats = Self {
            total_items: result.items.len() as u64,
            pages: result.pages,
            declared_items: result.total_elements,
            ..Self::default()
        };

        let mut urls = HashSet::new();
        let mut ids = HashSet::new();

        for item in &result.items {
            urls.insert(item.url.as_str());
            if !ids.insert(item.id.as_str()) && !stats.duplicate_ids.contains(&item.id) {
                stats.duplicate_ids.push(item.id.clone());
            }

            let Some(validity) = &item.validity else {
                continue;
            };
            stats.verified_items += 1;

            for (check, outcome) in validity {
                *stats
                    .outcomes
                    .entry(check.clone())
                    .or_default()
                    .entry(outcome.as_str())
                    .or_insert(0) += 1;
            }
        }

        stats.unique_urls = urls.len() as u64;
        stats
    }

    /// Returns true if the number of items matches the declared total
    pub fn is_complete(&self) -> bool {
        self.total_items == self.declared_items
    }

    /// Number of outcomes for one check with the given label
    pub fn count(&self, check: &str, label: &str) -> u64 {
        self.outcomes
            .get(check)
            .and_then(|counts| counts.get(label))
            .copied()
            .unwrap_or(0)
    }

    /// Percentage of checked items that passed one check
    pub fn success_rate(&self, check: &str) -> f64 {
        let Some(counts) = self.outcomes.get(check) else {
            return 0.0;
        };
        let checked: u64 = counts.values().sum();
        if checked == 0 {
            return 0.0;
        }
        let passed = counts
            .get(ValidityOutcome::Reachable.as_str())
            .copied()
            .unwrap_or(0);
        (passed as f64 / checked as f64) * 100.0
    }
}

/// Prints statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `stats` - The statistics to display
pub fn print_statistics(stats: &HarvestStatistics) {
    println!("=== Harvest Statistics ===\n");

    println!("Overview:");
    println!("  Pages: {}", stats.pages);
    println!(
        "  Items collected: {} (declared: {})",
        stats.total_items, stats.declared_items
    );
    println!("  Unique URLs: {}", stats.unique_urls);
    if !stats.is_complete() {
        println!("  Warning: collected item count differs from the declared total");
    }
    println!();

    if !stats.duplicate_ids.is_empty() {
        println!("Duplicate Item IDs ({}):", stats.duplicate_ids.len());
        for id in &stats.duplicate_ids {
            println!("  - {}", id);
        }
        println!();
    }

    if stats.outcomes.is_empty() {
        println!("Verification: not run");
        return;
    }

    println!("Verification ({} items):", stats.verified_items);
    for (check, counts) in &stats.outcomes {
        println!("  {}:", check);

        // Sort outcomes by count (descending)
        let mut sorted: Vec<_> = counts.iter().collect();
        sorted.sort_by(|a, b| b.1.cmp(a.1));

        for (label, count) in sorted {
            let percentage = if stats.verified_items > 0 {
                (*count as f64 / stats.verified_items as f64) * 100.0
            } else {
                0.0
            };
            println!("    {}: {} ({:.1}%)", label, count, percentage);
        }
        println!("    Success Rate: {:.1}%", stats.success_rate(check));
    }
}
