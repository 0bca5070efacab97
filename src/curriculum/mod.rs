//! Curriculum intake.
//!
//! Submodules:
//! - `document`: serde tree of the published curriculum JSON
//! - `normalize`: one-pass flattening into `CurriculumProgram`
//! - `registry`: program index per academic year and file loading

pub mod document;
pub mod normalize;
pub mod registry;

pub use document::{parse_document, CurriculumDocument};
pub use normalize::{normalize_curriculum, DEFAULT_ELECTIVE_QUOTA};
pub use registry::{ProgramEntry, ProgramRegistry, INDEX_FILE};

/// Label marker of categories whose credits do not count toward graduation.
pub const NON_ACCUMULATED_MARKER: &str = "không tích lũy";
/// Label marker of elective scopes.
pub const ELECTIVE_MARKER: &str = "tự chọn";
/// Label marker of the physical-education subcategory.
pub const PHYSICAL_EDUCATION_MARKER: &str = "thể chất";
/// Group-name marker of the graduation project (thesis) track.
pub const THESIS_MARKER: &str = "tốt nghiệp";

/// Case-insensitive substring test used for every label marker.
pub fn has_marker(label: &str, marker: &str) -> bool {
    label.to_lowercase().contains(&marker.to_lowercase())
}

/// Parse and normalize in one step.
pub fn load_program_from_str(json_str: &str) -> crate::error::Result<crate::models::CurriculumProgram> {
    let doc = parse_document(json_str).map_err(|e| crate::error::Error::CurriculumLoad(e.to_string()))?;
    Ok(normalize_curriculum(&doc))
}
