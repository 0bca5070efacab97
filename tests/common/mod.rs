#![allow(dead_code)]

use serde_json::{json, Value};
use studymate::curriculum::load_program_from_str;
use studymate::models::{CurriculumProgram, TranscriptEntry};

/// Small but complete curriculum: general subjects, a non-accumulated category
/// with two physical-education groups, and an elective category with a thesis
/// track and two specializations.
pub fn curriculum_json() -> Value {
    json!({
        "academic_year": "2021",
        "department": "Công nghệ thông tin",
        "program_code": "7480201",
        "total_credits": 150,
        "non_accumulated_credits": 11,
        "courses": [
            {
                "category": "Kiến thức giáo dục đại cương",
                "subjects": [
                    {"code": "MAT101", "name": "Giải tích", "credits": 3},
                    {"code": "CMP101", "name": "Nhập môn lập trình", "credits": 3}
                ]
            },
            {
                "category": "Học phần không tích lũy",
                "subcategories": [
                    {
                        "name": "Giáo dục thể chất",
                        "groups": [
                            {"group_name": "Bóng chuyền", "subjects": [{"code": "P1", "name": "Bóng chuyền", "credits": 3}]},
                            {"group_name": "Bơi lội", "subjects": [
                                {"code": "P2", "name": "Bơi lội 1", "credits": 2},
                                {"code": "P3", "name": "Bơi lội 2", "credits": 3}
                            ]}
                        ]
                    },
                    {
                        "name": "Giáo dục quốc phòng",
                        "subjects": [{"code": "QP1", "name": "Giáo dục quốc phòng", "credits": 4}]
                    }
                ]
            },
            {
                "category": "Kiến thức chuyên ngành tự chọn",
                "total_credits": 12,
                "groups": [
                    {"group_name": "Đồ án tốt nghiệp", "subjects": [{"code": "DATN", "name": "Đồ án tốt nghiệp", "credits": 12}]},
                    {"group_name": "An toàn thông tin", "subjects": [
                        {"code": "E1", "name": "Mật mã học", "credits": 3},
                        {"code": "E2", "name": "An ninh mạng", "credits": 3}
                    ]},
                    {"group_name": "Khoa học dữ liệu", "subjects": [
                        {"code": "E3", "name": "Học máy", "credits": 3},
                        {"code": "E4", "name": "Khai phá dữ liệu", "credits": 3}
                    ]}
                ]
            }
        ]
    })
}

pub fn program() -> CurriculumProgram {
    load_program_from_str(&curriculum_json().to_string()).expect("fixture curriculum parses")
}

pub fn graded(code: &str, credits: f64, score10: f64) -> TranscriptEntry {
    TranscriptEntry {
        course_code: code.to_string(),
        credits: Some(credits),
        score10: Some(score10),
        ..Default::default()
    }
}

pub fn codes(courses: &[studymate::models::Course]) -> Vec<&str> {
    courses.iter().map(|c| c.code.as_str()).collect()
}
