//! Index of published curricula.
//!
//! The programs directory contains `programs.json`:
//! `{ "2023": [ { "key": "luat-2023", "department": "Luật", "file": "2023/Luat-2023.json" } ] }`
//! and the curriculum documents it references. Documents are read from disk on
//! every `load_program` call; only the small index is kept in memory.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use strsim::normalized_levenshtein;
use tracing::{debug, info, warn};

use crate::curriculum::{parse_document, normalize_curriculum};
use crate::error::{Error, Result};
use crate::models::CurriculumProgram;

pub const INDEX_FILE: &str = "programs.json";

/// Minimum similarity accepted by `find_by_department` after exact matching fails.
const DEPARTMENT_SIMILARITY: f64 = 0.85;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramEntry {
    pub key: String,
    pub department: String,
    pub file: String,
}

#[derive(Debug, Clone, Default)]
pub struct ProgramRegistry {
    dir: PathBuf,
    years: BTreeMap<String, Vec<ProgramEntry>>,
}

impl ProgramRegistry {
    /// Read `programs.json` from `dir`.
    pub fn load<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        let index_path = dir.join(INDEX_FILE);
        let text = fs::read_to_string(&index_path)
            .map_err(|e| Error::CurriculumLoad(format!("cannot read {}: {}", index_path.display(), e)))?;
        let years: BTreeMap<String, Vec<ProgramEntry>> = serde_json::from_str(&text)
            .map_err(|e| Error::CurriculumLoad(format!("invalid {}: {}", index_path.display(), e)))?;
        let total: usize = years.values().map(Vec::len).sum();
        info!(dir = %dir.display(), years = years.len(), programs = total, "program index loaded");
        Ok(ProgramRegistry { dir, years })
    }

    /// Registry that lists nothing; used when the index is missing at startup.
    pub fn empty<P: AsRef<Path>>(dir: P) -> Self {
        ProgramRegistry { dir: dir.as_ref().to_path_buf(), years: BTreeMap::new() }
    }

    pub fn from_entries<P: AsRef<Path>>(dir: P, years: BTreeMap<String, Vec<ProgramEntry>>) -> Self {
        ProgramRegistry { dir: dir.as_ref().to_path_buf(), years }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Academic years in ascending order.
    pub fn years(&self) -> Vec<String> {
        self.years.keys().cloned().collect()
    }

    pub fn entries(&self, year: &str) -> &[ProgramEntry] {
        self.years.get(year).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn index(&self) -> &BTreeMap<String, Vec<ProgramEntry>> {
        &self.years
    }

    pub fn find(&self, year: &str, key: &str) -> Option<&ProgramEntry> {
        self.entries(year).iter().find(|p| p.key == key)
    }

    /// Exact department match first, then the closest name above the similarity threshold.
    pub fn find_by_department(&self, year: &str, department: &str) -> Option<&ProgramEntry> {
        let entries = self.entries(year);
        if let Some(exact) = entries.iter().find(|p| p.department == department) {
            return Some(exact);
        }

        let wanted = department.trim().to_lowercase();
        let mut best: Option<(f64, &ProgramEntry)> = None;
        for p in entries {
            let score = normalized_levenshtein(&wanted, &p.department.to_lowercase());
            if score >= DEPARTMENT_SIMILARITY && best.map_or(true, |(s, _)| score > s) {
                best = Some((score, p));
            }
        }
        if let Some((score, p)) = best {
            debug!(requested = department, matched = %p.department, score, "department resolved by similarity");
        }
        best.map(|(_, p)| p)
    }

    /// Resolve a selection given either a program key or a department name.
    pub fn resolve(&self, year: &str, key: Option<&str>, department: Option<&str>) -> Result<&ProgramEntry> {
        let found = match (key.filter(|k| !k.trim().is_empty()), department.filter(|d| !d.trim().is_empty())) {
            (Some(k), _) => self.find(year, k),
            (None, Some(d)) => self.find_by_department(year, d),
            (None, None) => return Err(Error::MissingCurriculum),
        };
        found.ok_or_else(|| Error::UnknownProgram {
            year: year.to_string(),
            key: key.or(department).unwrap_or_default().to_string(),
        })
    }

    /// Read, parse and normalize the curriculum for a selection.
    /// Year and department fall back to the index entry when the document omits them.
    pub fn load_program(&self, year: &str, entry: &ProgramEntry) -> Result<CurriculumProgram> {
        if entry.file.contains("..") {
            return Err(Error::InvalidInput(format!("invalid program file '{}'", entry.file)));
        }
        let path = self.dir.join(entry.file.trim_start_matches('/'));
        let text = fs::read_to_string(&path).map_err(|e| {
            warn!(path = %path.display(), error = %e, "curriculum file unreadable");
            Error::CurriculumLoad(format!("cannot read {}: {}", path.display(), e))
        })?;
        let doc = parse_document(&text).map_err(|e| Error::CurriculumLoad(format!("invalid curriculum {}: {}", entry.key, e)))?;

        let mut program = normalize_curriculum(&doc);
        if program.year.trim().is_empty() {
            program.year = year.to_string();
        }
        if program.department.trim().is_empty() {
            program.department = entry.department.clone();
        }
        info!(key = %entry.key, courses = program.course_catalog.len(), "curriculum loaded");
        Ok(program)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> ProgramRegistry {
        let mut years = BTreeMap::new();
        years.insert(
            "2023".to_string(),
            vec![
                ProgramEntry { key: "luat-2023".into(), department: "Luật".into(), file: "2023/Luat-2023.json".into() },
                ProgramEntry { key: "cntt-2023".into(), department: "Công nghệ thông tin".into(), file: "2023/Cntt-2023.json".into() },
            ],
        );
        ProgramRegistry::from_entries("/nonexistent", years)
    }

    #[test]
    fn find_by_key_and_department() {
        let r = registry();
        assert_eq!(r.find("2023", "luat-2023").map(|p| p.department.as_str()), Some("Luật"));
        assert!(r.find("2022", "luat-2023").is_none());
        assert_eq!(r.find_by_department("2023", "Công nghệ thông tin").map(|p| p.key.as_str()), Some("cntt-2023"));
        // trailing whitespace / case differences still resolve
        assert_eq!(r.find_by_department("2023", "công nghệ thông tin ").map(|p| p.key.as_str()), Some("cntt-2023"));
        assert!(r.find_by_department("2023", "Dược học").is_none());
    }

    #[test]
    fn resolve_requires_a_selection() {
        let r = registry();
        assert!(matches!(r.resolve("2023", None, None), Err(Error::MissingCurriculum)));
        assert!(matches!(r.resolve("2023", Some("nope"), None), Err(Error::UnknownProgram { .. })));
    }

    #[test]
    fn load_program_reports_missing_file() {
        let r = registry();
        let entry = r.find("2023", "luat-2023").unwrap().clone();
        assert!(matches!(r.load_program("2023", &entry), Err(Error::CurriculumLoad(_))));
    }
}
