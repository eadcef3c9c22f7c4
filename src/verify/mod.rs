//! Item verification
//!
//! After the page chain has been collected, every item is run through a set
//! of independent checks. All items are verified concurrently and every
//! check of one item runs concurrently as well.
//!
//! # Failure Absorption
//!
//! Verification never fails the batch:
//! - A check that returns `Err` is recorded as `ValidityOutcome::Error`
//! - A check that panics is caught and recorded the same way
//! - A panic anywhere else in one item's unit is caught at the unit, and
//!   every check that has no outcome yet is recorded as an error
//!
//! Each verification unit owns a disjoint `&mut Item`, so units never
//! contend for shared state.

mod reachability;

pub use reachability::{HttpReachabilityChecker, ReachabilityChecker, UrlCheck};

use crate::model::{Item, ValidityOutcome};
use crate::progress::ProgressSink;
use crate::Result;
use async_trait::async_trait;
use futures::future::join_all;
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

/// One independent check run against every item
///
/// The outcome is stored in the item's `validity` map under `name()`.
#[async_trait]
pub trait ItemCheck: Send + Sync {
    /// Key the outcome is recorded under
    fn name(&self) -> &'static str;

    /// Runs the check for one item
    async fn run(&self, item: &Item) -> Result<ValidityOutcome>;
}

/// Counts of recorded outcomes after a verification run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VerificationSummary {
    pub items: usize,
    pub passed: usize,
    pub failed: usize,
    pub errors: usize,
}

impl VerificationSummary {
    /// Tallies the outcomes recorded on a set of items
    pub fn from_items(items: &[Item]) -> Self {
        let mut summary = Self {
            items: items.len(),
            ..Self::default()
        };

        for outcome in items
            .iter()
            .filter_map(|item| item.validity.as_ref())
            .flat_map(|validity| validity.values())
        {
            match outcome {
                ValidityOutcome::Reachable => summary.passed += 1,
                ValidityOutcome::Unreachable { .. } => summary.failed += 1,
                ValidityOutcome::Error { .. } => summary.errors += 1,
            }
        }

        summary
    }
}

/// Runs every configured check against every item
#[derive(Clone, Default)]
pub struct VerificationPipeline {
    checks: Vec<Arc<dyn ItemCheck>>,
    verbose: bool,
}

impl VerificationPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a check to the pipeline
    pub fn with_check(mut self, check: Arc<dyn ItemCheck>) -> Self {
        self.checks.push(check);
        self
    }

    /// Logs per-item start/completion at info level instead of debug
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Verifies all items in place
    ///
    /// Items are neither reordered nor removed. With no checks configured the
    /// items are left untouched.
    ///
    /// # Arguments
    ///
    /// * `items` - The items to annotate
    /// * `progress` - Receives the total and one tick per verified item
    pub async fn verify(&self, items: &mut [Item], progress: &dyn ProgressSink) -> VerificationSummary {
        progress.set_total(items.len() as u64);

        let units = items
            .iter_mut()
            .enumerate()
            .map(|(index, item)| self.verify_unit(index, item, progress));
        join_all(units).await;

        VerificationSummary::from_items(items)
    }

    /// Verifies one item; never unwinds past this point
    async fn verify_unit(&self, index: usize, item: &mut Item, progress: &dyn ProgressSink) {
        let unit = AssertUnwindSafe(self.verify_item(index, &mut *item, progress))
            .catch_unwind()
            .await;

        let Err(panic) = unit else {
            return;
        };

        let message = panic_message(panic.as_ref());
        tracing::warn!("Verification of #{} {} panicked: {}", index, item.url, message);

        for check in &self.checks {
            if item.validity_of(check.name()).is_none() {
                item.record_validity(
                    check.name(),
                    ValidityOutcome::error(format!("verification panicked: {}", message)),
                );
            }
        }
    }

    async fn verify_item(&self, index: usize, item: &mut Item, progress: &dyn ProgressSink) {
        if self.checks.is_empty() {
            progress.tick();
            return;
        }

        if self.verbose {
            tracing::info!("Verifying #{} {} start", index, item.url);
        } else {
            tracing::debug!("Verifying #{} {} start", index, item.url);
        }

        let outcomes = {
            let item: &Item = item;
            join_all(self.checks.iter().map(|check| run_guarded(check.as_ref(), item))).await
        };

        for (check, outcome) in self.checks.iter().zip(outcomes) {
            item.record_validity(check.name(), outcome);
        }

        if self.verbose {
            tracing::info!("Verifying #{} {} completed", index, item.url);
        } else {
            tracing::debug!("Verifying #{} {} completed", index, item.url);
        }

        progress.tick();
    }
}

/// Runs one check, turning errors and panics into outcomes
async fn run_guarded(check: &dyn ItemCheck, item: &Item) -> ValidityOutcome {
    match AssertUnwindSafe(check.run(item)).catch_unwind().await {
        Ok(Ok(outcome)) => outcome,
        Ok(Err(e)) => {
            tracing::debug!("Check '{}' failed for {}: {}", check.name(), item.url, e);
            ValidityOutcome::error(e.to_string())
        }
        Err(panic) => {
            let message = panic_message(panic.as_ref());
            tracing::warn!("Check '{}' panicked for {}: {}", check.name(), item.url, message);
            ValidityOutcome::error(format!("check panicked: {}", message))
        }
    }
}

pub(crate) fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
