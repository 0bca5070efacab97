use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::algorithm::{build_view, major_options, reconcile, StatusFilter, TrackFilter, ViewPage};
use crate::curriculum::ProgramRegistry;
use crate::error::{Error, Result};
use crate::models::{AnalysisPayload, CurriculumProgram, ReconciliationSummary, TranscriptEntry};
use crate::transcript::normalize_transcript;

pub mod handlers;

/// Input parameters of an analysis.
///
/// # Expected JSON:
/// ```json
/// {
///   "studentId": "2180601234",
///   "academicYear": "2021",
///   "programKey": "cntt-2021",
///   "department": null,
///   "grades": [
///     {"courseCode": "CMP167", "courseName": "Lập trình hướng đối tượng", "credits": 3,
///      "score10": 8.2, "letterGrade": "B+", "gpa": 3.5}
///   ]
/// }
/// ```
///
/// # Fields:
/// - `studentId`: student number, only echoed back
/// - `academicYear`: intake year selecting the curriculum index (required)
/// - `programKey` / `department`: which curriculum of that year; the key wins when both are set
/// - `grades`: raw transcript records, either key casing (`courseCode` or `CourseCode`...)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    #[serde(default, alias = "mssv")]
    pub student_id: String,
    #[serde(default)]
    pub academic_year: String,
    #[serde(default)]
    pub program_key: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub grades: Vec<Value>,
}

/// An analysis request plus the table filters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewRequest {
    #[serde(flatten)]
    pub analysis: AnalyzeRequest,
    #[serde(default)]
    pub status: StatusFilter,
    /// `all`, `thesis` or `four-subjects`.
    #[serde(default = "default_track")]
    pub track: String,
    #[serde(default)]
    pub major: Option<String>,
    #[serde(default = "first_page")]
    pub page: usize,
}

fn default_track() -> String {
    "all".to_string()
}

fn first_page() -> usize {
    1
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewResponse {
    #[serde(flatten)]
    pub page: ViewPage,
    pub major_options: Vec<String>,
    pub summary: ReconciliationSummary,
}

pub fn parse_json_input(json_str: &str) -> std::result::Result<AnalyzeRequest, serde_json::Error> {
    serde_json::from_str::<AnalyzeRequest>(json_str)
}

/// Assemble the flat payload handed to rendering and advice. No computation happens here.
pub fn present(
    student_id: &str,
    program: &CurriculumProgram,
    transcript: &[TranscriptEntry],
    summary: ReconciliationSummary,
) -> AnalysisPayload {
    AnalysisPayload {
        student_id: student_id.to_string(),
        program_code: program.program_code.clone(),
        department: program.department.clone(),
        academic_year: program.year.clone(),
        total_credits_required: program.total_credits_required,
        non_accumulated_credits_required: program.non_accumulated_credits_required,
        curriculum_found: true,
        total_subjects: transcript.len(),
        grades: transcript.to_vec(),
        summary,
        elective_groups: program.elective_groups.clone(),
        generated_at: chrono::Utc::now(),
    }
}

/// Resolve and load the selected curriculum, and normalize the raw grades.
pub fn prepare(registry: &ProgramRegistry, req: &AnalyzeRequest) -> Result<(CurriculumProgram, Vec<TranscriptEntry>)> {
    let year = req.academic_year.trim();
    if year.is_empty() {
        return Err(Error::MissingCurriculum);
    }
    let entry = registry.resolve(year, req.program_key.as_deref(), req.department.as_deref())?;
    let program = registry.load_program(year, entry)?;
    Ok((program, normalize_transcript(&req.grades)))
}

pub fn analyze(registry: &ProgramRegistry, req: &AnalyzeRequest) -> Result<AnalysisPayload> {
    let (program, transcript) = prepare(registry, req)?;
    let summary = reconcile(&program, &transcript);
    Ok(present(&req.student_id, &program, &transcript, summary))
}

pub fn view(registry: &ProgramRegistry, req: &ViewRequest) -> Result<ViewResponse> {
    let (program, transcript) = prepare(registry, &req.analysis)?;
    let summary = reconcile(&program, &transcript);
    let track = TrackFilter::parse(&req.track, req.major.as_deref());
    let page = build_view(&program, &transcript, &summary, req.status, &track, req.page);

    Ok(ViewResponse { page, major_options: major_options(&program), summary })
}
