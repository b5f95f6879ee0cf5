use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

/// Catalog entry for one course
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseInfo {
    pub name: String,
    pub description: String,
}

/// Static course reference table keyed by normalized course code
/// (e.g. "CMPSC130A"). Loaded once at startup, read-only afterwards, so
/// concurrent sessions share it without locking.
#[derive(Debug, Clone)]
pub struct CourseCatalog {
    courses: HashMap<String, CourseInfo>,
}

impl CourseCatalog {
    /// Load a catalog from a JSON file mapping code → {name, description}
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read course catalog: {}", path.display()))?;
        let catalog = Self::from_json(&raw)
            .with_context(|| format!("Failed to parse course catalog: {}", path.display()))?;

        info!(
            "Course catalog loaded from {}: {} courses",
            path.display(),
            catalog.len()
        );

        Ok(catalog)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let courses: HashMap<String, CourseInfo> = serde_json::from_str(json)?;
        Ok(Self { courses })
    }

    /// The catalog shipped with the binary
    pub fn builtin() -> Self {
        Self::from_json(include_str!("../../data/courses.json"))
            .expect("embedded course catalog is valid JSON")
    }

    /// Exact-match lookup by normalized course code
    pub fn get(&self, code: &str) -> Option<&CourseInfo> {
        self.courses.get(code)
    }

    pub fn len(&self) -> usize {
        self.courses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_has_known_codes() {
        let catalog = CourseCatalog::builtin();
        assert!(!catalog.is_empty());
        assert!(catalog.get("CMPSC130").is_some());
        assert!(catalog.get("PSTAT160A").is_some());
        assert!(catalog.get("NOPE999").is_none());
    }

    #[test]
    fn from_json_parses_entries() {
        let catalog = CourseCatalog::from_json(
            r#"{"MATH4A": {"name": "Linear Algebra", "description": "Vector spaces."}}"#,
        )
        .unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get("MATH4A").unwrap().name, "Linear Algebra");
    }

    #[test]
    fn invalid_json_is_rejected() {
        assert!(CourseCatalog::from_json("not json").is_err());
    }
}
