use std::collections::HashMap;

use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use futures_util::stream::StreamExt;
use tracing::{debug, info};

use crate::api_json::{analyze, view, AnalyzeRequest, ViewRequest};
use crate::error::{Error, Result};
use crate::server::AppState;
use crate::transcript::read_transcript_bytes;

/// Largest accepted transcript workbook.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

const ALLOWED_EXTENSIONS: &[&str] = &[".xlsx", ".xls"];

/// POST /api/analyze
/// Body: `AnalyzeRequest` (see `api_json`). Returns the `AnalysisPayload`.
pub async fn analyze_handler(state: web::Data<AppState>, body: web::Json<AnalyzeRequest>) -> Result<HttpResponse> {
    let payload = analyze(&state.registry, &body)?;
    info!(
        student = %payload.student_id,
        program = %payload.department,
        matched = payload.summary.matched_count,
        "analysis served"
    );
    Ok(HttpResponse::Ok().json(payload))
}

/// POST /api/view
/// Same body as /api/analyze plus `status`, `track`, `major`, `page`.
pub async fn view_handler(state: web::Data<AppState>, body: web::Json<ViewRequest>) -> Result<HttpResponse> {
    let response = view(&state.registry, &body)?;
    Ok(HttpResponse::Ok().json(response))
}

fn has_allowed_extension(filename: &str) -> bool {
    let lower = filename.to_lowercase();
    ALLOWED_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}

/// Form fields and the transcript file of an upload.
#[derive(Debug, Default)]
struct UploadForm {
    fields: HashMap<String, String>,
    file: Option<(String, Vec<u8>)>,
}

impl UploadForm {
    fn text(&self, name: &str) -> Option<String> {
        self.fields.get(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
    }
}

async fn read_form(mut payload: Multipart) -> Result<UploadForm> {
    let mut form = UploadForm::default();

    while let Some(field_res) = payload.next().await {
        let mut field = field_res.map_err(|e| Error::InvalidInput(format!("multipart field error: {}", e)))?;
        let disposition = field.content_disposition();
        let name = disposition.get_name().unwrap_or_default().to_string();
        let filename = disposition.get_filename().map(|s| s.to_string());

        let mut bytes: Vec<u8> = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk.map_err(|e| Error::InvalidInput(format!("upload stream error: {}", e)))?;
            if bytes.len() + chunk.len() > MAX_UPLOAD_BYTES {
                return Err(Error::InvalidInput(format!("upload exceeds {} bytes", MAX_UPLOAD_BYTES)));
            }
            bytes.extend_from_slice(&chunk);
        }

        match filename {
            Some(f) if name == "file" => form.file = Some((f, bytes)),
            _ => {
                form.fields.insert(name, String::from_utf8_lossy(&bytes).into_owned());
            }
        }
    }
    Ok(form)
}

/// POST /api/upload
/// Multipart form: `mssv`, `academicYear`, `programKey` or `department`, and `file` (.xlsx/.xls).
pub async fn upload_handler(state: web::Data<AppState>, payload: Multipart) -> Result<HttpResponse> {
    let form = read_form(payload).await?;

    let (filename, bytes) = form
        .file
        .as_ref()
        .ok_or_else(|| Error::InvalidInput("missing transcript file".to_string()))?;
    if !has_allowed_extension(filename) {
        return Err(Error::InvalidInput(format!("'{}' is not an Excel workbook (.xlsx/.xls)", filename)));
    }

    let records = read_transcript_bytes(bytes)?;
    debug!(file = %filename, rows = records.len(), "transcript workbook read");

    let request = AnalyzeRequest {
        student_id: form.text("mssv").or_else(|| form.text("studentId")).unwrap_or_default(),
        academic_year: form.text("academicYear").unwrap_or_default(),
        program_key: form.text("programKey"),
        department: form.text("department"),
        grades: records,
    };

    let payload = analyze(&state.registry, &request)?;
    info!(student = %payload.student_id, subjects = payload.total_subjects, "uploaded transcript analysed");
    Ok(HttpResponse::Ok().json(payload))
}
