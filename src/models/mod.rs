// Core data structures shared by the loader, the engine and the presenter.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A catalog course. Identity is the upper-cased `code`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Course {
    pub code: String,
    pub name: String,
    pub credits: u32,
}

impl Course {
    pub fn new(code: &str, name: &str, credits: u32) -> Self {
        Course {
            code: normalize_code(code),
            name: name.to_string(),
            credits,
        }
    }
}

/// Named group of subjects. Elective groups are mutually exclusive tracks
/// (thesis vs. alternative subjects); physical-education groups are
/// alternatives of which the student completes exactly one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElectiveGroup {
    #[serde(rename = "group_name")]
    pub name: String,
    pub subjects: Vec<Course>,
}

impl ElectiveGroup {
    pub fn contains(&self, code: &str) -> bool {
        self.subjects.iter().any(|s| s.code == code)
    }

    pub fn codes(&self) -> HashSet<String> {
        self.subjects.iter().map(|s| s.code.clone()).collect()
    }
}

/// Physical-education subcategory found under the non-accumulated category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhysicalEducationBlock {
    pub groups: Vec<ElectiveGroup>,
    /// Subjects declared directly on the subcategory, outside any group.
    pub loose_subjects: Vec<Course>,
}

impl PhysicalEducationBlock {
    /// Every code that belongs to physical education, grouped or not.
    pub fn codes(&self) -> HashSet<String> {
        self.groups
            .iter()
            .flat_map(|g| g.subjects.iter())
            .chain(self.loose_subjects.iter())
            .map(|s| s.code.clone())
            .collect()
    }
}

/// Normalized curriculum for one (year, department) selection.
/// Built once by `curriculum::normalize` and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurriculumProgram {
    pub year: String,
    pub department: String,
    pub program_code: String,
    pub total_credits_required: Option<f64>,
    pub non_accumulated_credits_required: Option<f64>,
    pub course_catalog: Vec<Course>,
    pub code_name_map: HashMap<String, String>,
    pub non_accumulated_codes: HashSet<String>,
    pub elective_catalog: Vec<Course>,
    pub elective_groups: Vec<ElectiveGroup>,
    pub elective_credit_quota: u32,
    pub physical_education: Option<PhysicalEducationBlock>,
}

impl CurriculumProgram {
    pub fn contains(&self, code: &str) -> bool {
        self.code_name_map.contains_key(code)
    }

    pub fn is_non_accumulated(&self, code: &str) -> bool {
        self.non_accumulated_codes.contains(code)
    }

    pub fn elective_codes(&self) -> HashSet<&str> {
        self.elective_catalog.iter().map(|c| c.code.as_str()).collect()
    }
}

/// One canonical transcript record. `course_code` is trimmed and upper-cased;
/// an empty code marks a display-only row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TranscriptEntry {
    pub course_code: String,
    pub course_name: Option<String>,
    pub credits: Option<f64>,
    pub score10: Option<f64>,
    pub letter_grade: Option<String>,
    pub gpa4: Option<f64>,
    pub is_failed: bool,
}

impl TranscriptEntry {
    pub fn has_code(&self) -> bool {
        !self.course_code.is_empty()
    }
}

/// Output of one reconciliation. Recomputed on every request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReconciliationSummary {
    pub matched_count: usize,
    pub unmatched_count: usize,
    pub accumulated_credits: f64,
    pub non_accumulated_credits: f64,
    /// `None` when there is nothing to report (see `algorithm::reconcile`).
    pub gpa4_weighted: Option<f64>,
    pub gpa10_weighted: Option<f64>,
    pub elective_credits_earned: f64,
    pub elective_credits_missing: f64,
    pub elective_credits_required: u32,
    pub not_yet_learned: Vec<Course>,
}

/// Flat shape handed to rendering and to the advice generator.
/// Every field is optional on input: clients send back whatever they kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalysisPayload {
    pub student_id: String,
    pub program_code: String,
    pub department: String,
    pub academic_year: String,
    pub total_credits_required: Option<f64>,
    pub non_accumulated_credits_required: Option<f64>,
    pub curriculum_found: bool,
    pub total_subjects: usize,
    pub grades: Vec<TranscriptEntry>,
    pub summary: ReconciliationSummary,
    pub elective_groups: Vec<ElectiveGroup>,
    pub generated_at: DateTime<Utc>,
}

impl Default for AnalysisPayload {
    fn default() -> Self {
        AnalysisPayload {
            student_id: String::new(),
            program_code: String::new(),
            department: String::new(),
            academic_year: String::new(),
            total_credits_required: None,
            non_accumulated_credits_required: None,
            curriculum_found: false,
            total_subjects: 0,
            grades: Vec::new(),
            summary: ReconciliationSummary::default(),
            elective_groups: Vec::new(),
            generated_at: Utc::now(),
        }
    }
}

/// Canonical course key: trimmed, upper-cased.
pub fn normalize_code(raw: &str) -> String {
    raw.trim().to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn course_code_is_canonical() {
        let c = Course::new("  cmp101 ", "Nhập môn", 3);
        assert_eq!(c.code, "CMP101");
    }

    #[test]
    fn pe_block_codes_include_loose_subjects() {
        let block = PhysicalEducationBlock {
            groups: vec![ElectiveGroup { name: "Bóng đá".into(), subjects: vec![Course::new("PHT101", "Bóng đá 1", 1)] }],
            loose_subjects: vec![Course::new("PHT001", "Lý thuyết", 1)],
        };
        let codes = block.codes();
        assert!(codes.contains("PHT101"));
        assert!(codes.contains("PHT001"));
        assert_eq!(codes.len(), 2);
    }

    #[test]
    fn partial_payloads_deserialize() {
        let p: AnalysisPayload = serde_json::from_value(serde_json::json!({
            "studentId": "1",
            "grades": [{"courseCode": "MAT101"}],
            "summary": {"gpa4Weighted": 3.1}
        }))
        .unwrap();
        assert_eq!(p.student_id, "1");
        assert_eq!(p.grades[0].credits, None);
        assert_eq!(p.summary.gpa4_weighted, Some(3.1));
        assert_eq!(p.summary.matched_count, 0);
        assert!(p.department.is_empty());
    }
}
