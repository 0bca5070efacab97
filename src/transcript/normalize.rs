//! Canonicalizes raw grade records.
//!
//! Upstream sources disagree on key casing (`courseCode` vs `CourseCode`,
//! `gpa` vs `Gpa4`...). This is the only place that knows about it; everything
//! after works on `TranscriptEntry`.

use std::collections::HashSet;

use serde_json::{Map, Value};

use crate::curriculum::document::coerce_number;
use crate::models::{normalize_code, TranscriptEntry};

/// Scores strictly below this on the 10-point scale are failures.
pub const FAIL_THRESHOLD: f64 = 4.0;

const CODE_KEYS: &[&str] = &["courseCode", "CourseCode"];
const NAME_KEYS: &[&str] = &["courseName", "CourseName"];
const CREDIT_KEYS: &[&str] = &["credits", "Credits"];
const SCORE10_KEYS: &[&str] = &["score10", "Score10"];
const LETTER_KEYS: &[&str] = &["letterGrade", "LetterGrade"];
const GPA4_KEYS: &[&str] = &["gpa", "Gpa", "gpa4", "Gpa4"];
const FAILED_KEYS: &[&str] = &["isFailed", "IsFailed"];

/// First present, non-null value among the aliases.
fn field<'a>(obj: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().filter_map(|k| obj.get(*k)).find(|v| !v.is_null())
}

fn text_field(obj: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    match field(obj, keys)? {
        Value::String(s) => {
            let t = s.trim();
            if t.is_empty() { None } else { Some(t.to_string()) }
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn number_field(obj: &Map<String, Value>, keys: &[&str]) -> Option<f64> {
    field(obj, keys).and_then(coerce_number)
}

/// Normalize a single raw record. Non-object values yield an empty display row.
pub fn normalize_record(raw: &Value) -> TranscriptEntry {
    let Some(obj) = raw.as_object() else {
        return TranscriptEntry::default();
    };

    let score10 = number_field(obj, SCORE10_KEYS);
    let is_failed = match field(obj, FAILED_KEYS) {
        Some(Value::Bool(b)) => *b,
        _ => score10.map_or(false, |s| s < FAIL_THRESHOLD),
    };

    TranscriptEntry {
        course_code: normalize_code(&text_field(obj, CODE_KEYS).unwrap_or_default()),
        course_name: text_field(obj, NAME_KEYS),
        credits: number_field(obj, CREDIT_KEYS),
        score10,
        letter_grade: text_field(obj, LETTER_KEYS),
        gpa4: number_field(obj, GPA4_KEYS),
        is_failed,
    }
}

/// Normalize a batch. Records sharing a (case-insensitive) code collapse to the
/// first occurrence; records without a code are all kept for display.
pub fn normalize_transcript(raw: &[Value]) -> Vec<TranscriptEntry> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut out = Vec::with_capacity(raw.len());
    for r in raw {
        let entry = normalize_record(r);
        if entry.has_code() && !seen.insert(entry.course_code.clone()) {
            continue;
        }
        out.push(entry);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn accepts_both_key_styles() {
        let lower = normalize_record(&json!({"courseCode": " cmp167 ", "courseName": "Lập trình", "credits": 3, "score10": 8.5, "letterGrade": "A", "gpa": 4}));
        let upper = normalize_record(&json!({"CourseCode": "CMP167", "CourseName": "Lập trình", "Credits": "3", "Score10": "8,5", "LetterGrade": "A", "Gpa4": "4"}));
        assert_eq!(lower, upper);
        assert_eq!(lower.course_code, "CMP167");
        assert_eq!(lower.score10, Some(8.5));
    }

    #[test]
    fn malformed_numbers_are_absent_not_zero() {
        let e = normalize_record(&json!({"courseCode": "X", "credits": "ba", "score10": "", "gpa": null}));
        assert_eq!(e.credits, None);
        assert_eq!(e.score10, None);
        assert_eq!(e.gpa4, None);
        assert!(!e.is_failed);
    }

    #[test]
    fn failure_flag_is_derived_when_missing() {
        assert!(normalize_record(&json!({"courseCode": "X", "score10": 3.9})).is_failed);
        assert!(!normalize_record(&json!({"courseCode": "X", "score10": 4})).is_failed);
        assert!(!normalize_record(&json!({"courseCode": "X", "score10": 2, "isFailed": false})).is_failed);
    }

    #[test]
    fn duplicates_collapse_but_blank_codes_stay() {
        let rows = vec![
            json!({"courseCode": "A1", "score10": 5}),
            json!({"courseCode": "a1", "score10": 9}),
            json!({"courseName": "Sinh hoạt lớp"}),
            json!({"courseCode": "  ", "courseName": "Ghi chú"}),
            json!("not an object"),
        ];
        let out = normalize_transcript(&rows);
        assert_eq!(out.len(), 4);
        assert_eq!(out[0].score10, Some(5.0));
        assert!(out[1..].iter().all(|e| !e.has_code()));
    }
}
