//! In-memory fakes shared by unit tests

use crate::model::{Item, PageId, ValidityOutcome};
use crate::progress::ProgressSink;
use crate::source::{PageArchive, PageSource};
use crate::verify::ReachabilityChecker;
use crate::{Result, ShioriError};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

/// Builds one item per URL with ids `0..n`
pub fn items(urls: &[&str]) -> Vec<Item> {
    urls.iter()
        .enumerate()
        .map(|(i, url)| Item::new(i.to_string(), format!("Bookmark {}", i), *url))
        .collect()
}

/// Renders a JSON page
pub fn json_page(number: u32, total: u32, total_elements: u64, next: Option<&str>, ids: &[&str]) -> String {
    let items: Vec<_> = ids
        .iter()
        .map(|id| {
            serde_json::json!({
                "id": id,
                "title": format!("Bookmark {}", id),
                "url": format!("https://{}.example", id),
            })
        })
        .collect();

    let mut meta = serde_json::json!({
        "number": number,
        "total": total,
        "totalElements": total_elements,
    });
    if let Some(next) = next {
        meta["next"] = serde_json::Value::String(next.to_string());
    }

    serde_json::json!({ "pageMeta": meta, "items": items }).to_string()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    Begin(String),
    Total(u64),
    Tick,
    Finish,
}

/// Records every progress call in order
#[derive(Debug, Default)]
pub struct RecordingProgress {
    events: Mutex<Vec<ProgressEvent>>,
}

impl RecordingProgress {
    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn ticks(&self) -> usize {
        self.events()
            .iter()
            .filter(|e| **e == ProgressEvent::Tick)
            .count()
    }

    /// The most recent total
    pub fn total(&self) -> Option<u64> {
        self.events().iter().rev().find_map(|e| match e {
            ProgressEvent::Total(total) => Some(*total),
            _ => None,
        })
    }

    fn push(&self, event: ProgressEvent) {
        self.events.lock().unwrap().push(event);
    }
}

impl ProgressSink for RecordingProgress {
    fn begin_step(&self, label: &str) {
        self.push(ProgressEvent::Begin(label.to_string()));
    }

    fn set_total(&self, total: u64) {
        self.push(ProgressEvent::Total(total));
    }

    fn tick(&self) {
        self.push(ProgressEvent::Tick);
    }

    fn finish(&self) {
        self.push(ProgressEvent::Finish);
    }
}

/// Serves pages from memory and records the order they were requested in
#[derive(Debug, Default)]
pub struct ScriptedSource {
    pages: HashMap<PageId, String>,
    requested: Mutex<Vec<PageId>>,
}

impl ScriptedSource {
    pub fn with_page(mut self, page: &str, content: String) -> Self {
        self.pages.insert(PageId::new(page), content);
        self
    }

    pub fn requested(&self) -> Vec<String> {
        self.requested
            .lock()
            .unwrap()
            .iter()
            .map(|p| p.to_string())
            .collect()
    }
}

#[async_trait]
impl PageSource for ScriptedSource {
    async fn load_page(&self, page: &PageId) -> Result<String> {
        self.requested.lock().unwrap().push(page.clone());
        self.pages
            .get(page)
            .cloned()
            .ok_or_else(|| ShioriError::PageStatus {
                page: page.to_string(),
                status: 404,
            })
    }
}

/// Records saved pages, failing for the configured ids
#[derive(Debug, Default)]
pub struct RecordingArchive {
    failing: HashSet<String>,
    saved: Mutex<Vec<String>>,
}

impl RecordingArchive {
    pub fn failing_on(pages: &[&str]) -> Self {
        Self {
            failing: pages.iter().map(|p| p.to_string()).collect(),
            saved: Mutex::new(Vec::new()),
        }
    }

    pub fn saved(&self) -> Vec<String> {
        self.saved.lock().unwrap().clone()
    }
}

#[async_trait]
impl PageArchive for RecordingArchive {
    async fn save_page(&self, page: &PageId, _content: &str) -> Result<()> {
        if self.failing.contains(page.as_str()) {
            return Err(ShioriError::Archive(format!("disk full while saving {}", page)));
        }
        self.saved.lock().unwrap().push(page.to_string());
        Ok(())
    }
}

/// Reachability checker with scripted answers; every other URL is reachable
#[derive(Debug, Default)]
pub struct ScriptedChecker {
    unreachable: HashSet<String>,
    erroring: HashSet<String>,
    panicking: HashSet<String>,
}

impl ScriptedChecker {
    pub fn unreachable(urls: &[&str]) -> Self {
        Self {
            unreachable: urls.iter().map(|u| u.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn erroring(urls: &[&str]) -> Self {
        Self {
            erroring: urls.iter().map(|u| u.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn panicking(urls: &[&str]) -> Self {
        Self::default().with_panicking(urls)
    }

    pub fn with_panicking(mut self, urls: &[&str]) -> Self {
        self.panicking.extend(urls.iter().map(|u| u.to_string()));
        self
    }
}

#[async_trait]
impl ReachabilityChecker for ScriptedChecker {
    async fn check(&self, url: &str) -> Result<ValidityOutcome> {
        if self.panicking.contains(url) {
            panic!("checker blew up on {}", url);
        }
        if self.erroring.contains(url) {
            return Err(ShioriError::Check {
                url: url.to_string(),
                message: "resolver unavailable".to_string(),
            });
        }
        if self.unreachable.contains(url) {
            return Ok(ValidityOutcome::unreachable(Some(404), "Dead link"));
        }
        Ok(ValidityOutcome::Reachable)
    }
}
