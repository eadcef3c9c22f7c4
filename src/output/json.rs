//! JSON persistence of the combined result

use crate::model::CombinedResult;
use crate::output::{OutputError, OutputResult};
use std::fs;
use std::path::Path;

/// Writes a harvest result as pretty-printed JSON
///
/// Missing parent directories are created.
///
/// # Arguments
///
/// * `result` - The combined result to persist
/// * `output_path` - Destination file
pub fn write_result(result: &CombinedResult, output_path: &Path) -> OutputResult<()> {
    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut json = serde_json::to_string_pretty(result)?;
    json.push('\n');

    fs::write(output_path, json).map_err(|source| OutputError::Write {
        path: output_path.display().to_string(),
        source,
    })?;

    tracing::info!(
        "Wrote {} items to {}",
        result.items.len(),
        output_path.display()
    );
    Ok(())
}

/// Loads a previously written harvest result
pub fn load_result(path: &Path) -> OutputResult<CombinedResult> {
    let contents = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Item, ValidityOutcome};
    use tempfile::TempDir;

    #[test]
    fn test_written_result_loads_back() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("result.json");

        let mut item = Item::new("7", "Rust", "https://rust-lang.org");
        item.record_validity("url", ValidityOutcome::unreachable(Some(503), "Server error"));
        let result = CombinedResult {
            title: "alice".to_string(),
            pages: 1,
            total_elements: 1,
            items: vec![item],
        };

        write_result(&result, &path).unwrap();
        let loaded = load_result(&path).unwrap();

        assert_eq!(loaded, result);
    }

    #[test]
    fn test_written_json_uses_camel_case() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("result.json");
        let result = CombinedResult {
            title: "alice".to_string(),
            pages: 0,
            total_elements: 0,
            items: Vec::new(),
        };

        write_result(&result, &path).unwrap();
        let text = fs::read_to_string(&path).unwrap();

        assert!(text.contains("\"totalElements\": 0"));
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn test_load_missing_result() {
        let dir = TempDir::new().unwrap();
        let err = load_result(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, OutputError::Io(_)));
    }
}
