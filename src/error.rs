//! Error taxonomy for curriculum loading, transcript intake and analysis.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// Reconciliation was requested without a selected curriculum.
    #[error("no curriculum loaded: select an academic year and department first")]
    MissingCurriculum,

    #[error("unknown program '{key}' for academic year {year}")]
    UnknownProgram { year: String, key: String },

    /// The curriculum document could not be fetched or parsed.
    #[error("failed to load curriculum: {0}")]
    CurriculumLoad(String),

    /// The uploaded transcript could not be read.
    #[error("failed to read transcript: {0}")]
    Transcript(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::MissingCurriculum | Error::Transcript(_) | Error::InvalidInput(_) | Error::Json(_) => StatusCode::BAD_REQUEST,
            Error::UnknownProgram { .. } => StatusCode::NOT_FOUND,
            Error::CurriculumLoad(_) | Error::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({"error": self.to_string()}))
    }
}
