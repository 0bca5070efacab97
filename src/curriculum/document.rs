//! Raw curriculum document as published per (academic year, department).
//!
//! ```json
//! {
//!   "academic_year": "2023",
//!   "department": "Công nghệ thông tin",
//!   "program_code": "7480201",
//!   "total_credits": 150,
//!   "non_accumulated_credits": 11,
//!   "courses": [
//!     { "category": "Kiến thức giáo dục đại cương",
//!       "subjects": [ { "code": "POS104", "name": "Triết học Mác - Lênin", "credits": 3 } ],
//!       "subcategories": [
//!         { "name": "Tự chọn chuyên ngành", "total_credits": 12,
//!           "groups": [ { "group_name": "Đồ án tốt nghiệp", "subjects": [] } ] }
//!       ] }
//!   ]
//! }
//! ```
//!
//! Numeric fields are read leniently: upstream files mix numbers, numeric
//! strings and empty strings.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CurriculumDocument {
    #[serde(default, deserialize_with = "lenient_string")]
    pub academic_year: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub department: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub program_code: Option<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub total_credits: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub non_accumulated_credits: Option<f64>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub courses: Vec<Category>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Category {
    #[serde(default, deserialize_with = "lenient_string")]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub subjects: Vec<RawSubject>,
    /// `None` when absent or null; a declared empty list is kept as `Some`.
    #[serde(default)]
    pub groups: Option<Vec<RawGroup>>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub subcategories: Vec<Subcategory>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub total_credits: Option<f64>,
}

impl Category {
    pub fn group_list(&self) -> &[RawGroup] {
        self.groups.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Subcategory {
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub subjects: Vec<RawSubject>,
    /// `None` when absent or null; a declared empty list is kept as `Some`.
    #[serde(default)]
    pub groups: Option<Vec<RawGroup>>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub total_credits: Option<f64>,
}

impl Subcategory {
    pub fn group_list(&self) -> &[RawGroup] {
        self.groups.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawGroup {
    #[serde(default, deserialize_with = "lenient_string")]
    pub group_name: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub subjects: Vec<RawSubject>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSubject {
    #[serde(default, deserialize_with = "lenient_string")]
    pub code: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub credits: Option<f64>,
}

impl RawSubject {
    /// Catalog credits: non-numeric or negative values count as 0.
    pub fn credits_or_zero(&self) -> u32 {
        match self.credits {
            Some(c) if c.is_finite() && c > 0.0 => c.round() as u32,
            _ => 0,
        }
    }
}

/// Parse a document from JSON text.
pub fn parse_document(json_str: &str) -> Result<CurriculumDocument, serde_json::Error> {
    serde_json::from_str::<CurriculumDocument>(json_str)
}

/// Best-effort numeric coercion shared with the transcript normalizer.
/// Returns `None` for anything that is not a finite number.
pub fn coerce_number(v: &Value) -> Option<f64> {
    match v {
        Value::Number(n) => n.as_f64().filter(|f| f.is_finite()),
        Value::String(s) => {
            let t = s.trim().replace(',', ".");
            if t.is_empty() {
                return None;
            }
            t.parse::<f64>().ok().filter(|f| f.is_finite())
        }
        _ => None,
    }
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Option::<Value>::deserialize(deserializer)?;
    Ok(v.as_ref().and_then(coerce_number))
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Option::<Value>::deserialize(deserializer)?;
    Ok(match v {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
