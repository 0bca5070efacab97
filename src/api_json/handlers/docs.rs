use actix_web::{HttpResponse, Responder};
use serde_json::json;

use crate::api_json::AnalyzeRequest;

/// GET /help
pub async fn help_handler() -> impl Responder {
    let example = AnalyzeRequest {
        student_id: "2180601234".to_string(),
        academic_year: "2021".to_string(),
        program_key: Some("cntt-2021".to_string()),
        department: None,
        grades: vec![json!({
            "courseCode": "CMP167",
            "courseName": "Lập trình hướng đối tượng",
            "credits": 3,
            "score10": 8.2,
            "letterGrade": "B+",
            "gpa": 3.5
        })],
    };

    HttpResponse::Ok().json(json!({
        "description": "Transcript analysis against a published curriculum. Pick a program from GET /api/programs, then POST the grades to /api/analyze or upload the exported workbook to /api/upload.",
        "endpoints": {
            "GET /api/programs": "curricula per academic year",
            "POST /api/analyze": "JSON body (see 'analyze_example') -> analysis payload",
            "POST /api/upload": "multipart form: mssv, academicYear, programKey|department, file (.xlsx/.xls)",
            "POST /api/view": "analyze body + status (learned|not-learned), track (all|thesis|four-subjects), major, page",
            "POST /api/advice": "{ message, isFirstInteraction, studyData: <analysis payload> } -> { reply }"
        },
        "analyze_example": example,
        "note": "Grade keys are accepted in camelCase or PascalCase (courseCode / CourseCode). Numbers may be strings; unparseable numbers are treated as absent."
    }))
}
