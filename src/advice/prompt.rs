//! System prompt assembly for the advice model.

use std::fmt::Write as _;

use crate::curriculum::{has_marker, THESIS_MARKER};
use crate::models::{AnalysisPayload, TranscriptEntry};

/// Header line opening the student data block.
pub const DATA_HEADER: &str = "DỮ LIỆU SINH VIÊN:";
/// Prefix of the line closing the data block.
pub const TASK_HEADER: &str = "NHIỆM VỤ";

const MAX_GRADE_LINES: usize = 50;
const MAX_NOT_LEARNED_LINES: usize = 10;

/// Rough token estimate above which the prompt is shortened.
pub const TOKEN_BUDGET: usize = 4000;
pub const MAX_DATA_LINES: usize = 30;
pub const MAX_MESSAGE_CHARS: usize = 500;
const ELISION: &str = "...(dữ liệu đã được rút gọn)...";

/// Two decimals at most, trailing zeros dropped ("3.5", "7", "2.67").
fn num(v: f64) -> String {
    let s = format!("{:.2}", v);
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

fn opt_num(v: Option<f64>) -> String {
    v.map(num).unwrap_or_else(|| "N/A".to_string())
}

fn or_na(s: &str) -> &str {
    if s.trim().is_empty() { "N/A" } else { s }
}

fn grade_line(g: &TranscriptEntry) -> String {
    let mut line = format!("- {}", g.course_code);
    if let Some(name) = g.course_name.as_deref().filter(|n| !n.is_empty()) {
        let _ = write!(line, ": {}", name);
    }

    let mut details = Vec::new();
    if let Some(c) = g.credits {
        details.push(format!("{}TC", num(c)));
    }
    if let Some(s) = g.score10 {
        details.push(format!("Điểm 10: {}", num(s)));
    }
    if let Some(l) = g.letter_grade.as_deref() {
        details.push(format!("Xếp loại: {}", l));
    }
    if let Some(p) = g.gpa4 {
        details.push(format!("GPA 4: {}", num(p)));
    }
    if !details.is_empty() {
        let _ = write!(line, " [{}]", details.join(" | "));
    }
    line
}

/// Compact, line-oriented view of an analysis for the model.
pub fn build_data_block(data: &AnalysisPayload) -> String {
    let s = &data.summary;
    let mut out = String::new();

    let _ = writeln!(out, "MSSV: {}", or_na(&data.student_id));
    let _ = writeln!(out, "Khoa: {}", or_na(&data.department));
    let _ = writeln!(out, "Niên khóa: {}", or_na(&data.academic_year));
    let _ = writeln!(out, "Đã học: {} môn", data.total_subjects);
    let _ = writeln!(out, "GPA(4): {}", opt_num(s.gpa4_weighted));
    let _ = writeln!(out, "GPA(10): {}", opt_num(s.gpa10_weighted));
    let _ = writeln!(out, "TC tích lũy: {}", num(s.accumulated_credits));
    let _ = writeln!(out, "TC tự chọn thiếu: {}", num(s.elective_credits_missing));

    let grades: Vec<String> = data.grades.iter().filter(|g| g.has_code()).map(grade_line).collect();
    if !grades.is_empty() {
        let _ = writeln!(out, "\n=== CHI TIẾT MÔN ĐÃ HỌC VÀ ĐIỂM SỐ ===");
        for line in grades.iter().take(MAX_GRADE_LINES) {
            let _ = writeln!(out, "{}", line);
        }
        if grades.len() > MAX_GRADE_LINES {
            let _ = writeln!(out, "... và {} môn khác", grades.len() - MAX_GRADE_LINES);
        }
        let _ = writeln!(out, "\nTổng cộng: {} môn đã hoàn thành", grades.len());
    }

    if !s.not_yet_learned.is_empty() {
        let _ = writeln!(out, "\n=== MÔN CHƯA HỌC ({} môn đầu) ===", MAX_NOT_LEARNED_LINES);
        for c in s.not_yet_learned.iter().take(MAX_NOT_LEARNED_LINES) {
            if c.name.is_empty() {
                let _ = writeln!(out, "- {} ({}TC)", c.code, c.credits);
            } else {
                let _ = writeln!(out, "- {} [{}] ({}TC)", c.name, c.code, c.credits);
            }
        }
        if s.not_yet_learned.len() > MAX_NOT_LEARNED_LINES {
            let _ = writeln!(out, "... và {} môn khác", s.not_yet_learned.len() - MAX_NOT_LEARNED_LINES);
        }
    }

    let majors: Vec<&str> = data
        .elective_groups
        .iter()
        .map(|g| g.name.as_str())
        .filter(|n| !n.is_empty() && !has_marker(n, THESIS_MARKER))
        .collect();
    if !majors.is_empty() {
        let _ = writeln!(out, "\n=== CHUYÊN NGÀNH KHẢ DỤNG CHO {} TC TỰ CHỌN ===", s.elective_credits_required);
        for m in majors {
            let _ = writeln!(out, "- {}", m);
        }
    }

    out
}

/// Full system prompt. The first interaction asks for an overview; later ones for a short answer.
pub fn build_system_prompt(data: &AnalysisPayload, is_first_interaction: bool) -> String {
    let quota = data.summary.elective_credits_required;
    let block = build_data_block(data);

    if is_first_interaction {
        format!(
            "Bạn là trợ lý AI tư vấn học tập chuyên nghiệp.

{DATA_HEADER}
{block}
{TASK_HEADER} LẦN ĐẦU:
- Đưa ra đánh giá tổng quan về tình hình học tập
- Phân tích điểm mạnh, điểm yếu từ dữ liệu thực tế
- Gợi ý hướng phát triển chính
- Nhắc đến {quota} TC tự chọn và hai hướng hoàn thành: đồ án tốt nghiệp hoặc các môn thay thế theo chuyên ngành

QUY TẮC:
1. Trả lời bằng tiếng Việt, khoảng 250-300 từ
2. Xuống dòng rõ ràng, có thể dùng emoji
3. Dựa vào dữ liệu cụ thể ở trên, liệt kê tên môn học chứ không chỉ mã môn
4. Chỉ in đậm 1-2 ý quan trọng nhất
5. Kết thúc bằng câu hỏi về chuyên ngành sinh viên muốn chọn"
        )
    } else {
        format!(
            "Bạn là trợ lý AI tư vấn học tập chuyên nghiệp.

{DATA_HEADER}
{block}
{TASK_HEADER}:
- Trả lời trực tiếp câu hỏi của sinh viên dựa trên dữ liệu đã có
- Không lặp lại các thông số đã nói (GPA, số môn...)
- Khi được hỏi về {quota} TC tự chọn: nêu hai lựa chọn (đồ án hoặc các môn thay thế); nếu chưa biết chuyên ngành thì hỏi lại

QUY TẮC:
1. Trả lời bằng tiếng Việt, tối đa 150 từ
2. Tập trung vào câu hỏi, đưa ra lời khuyên cụ thể
3. Chỉ in đậm tối đa một cụm từ quan trọng"
        )
    }
}

/// Shorten an oversized prompt: at most `MAX_DATA_LINES` lines of the data block survive
/// (followed by an elision marker) and the user message is cut to `MAX_MESSAGE_CHARS`.
pub fn truncate_prompt(system: &str, message: &str) -> (String, String) {
    if (system.chars().count() + message.chars().count()) / 4 <= TOKEN_BUDGET {
        return (system.to_string(), message.to_string());
    }

    let mut kept: Vec<&str> = Vec::new();
    let mut in_data = false;
    let mut data_lines = 0usize;

    for line in system.split('\n') {
        if line.contains(DATA_HEADER) {
            in_data = true;
            kept.push(line);
            continue;
        }
        if in_data && line.starts_with(TASK_HEADER) {
            in_data = false;
            if data_lines > MAX_DATA_LINES {
                kept.push(ELISION);
            }
            kept.push(line);
            continue;
        }
        if in_data {
            data_lines += 1;
            if data_lines <= MAX_DATA_LINES {
                kept.push(line);
            }
        } else {
            kept.push(line);
        }
    }

    let message = if message.chars().count() > MAX_MESSAGE_CHARS {
        let mut cut: String = message.chars().take(MAX_MESSAGE_CHARS).collect();
        cut.push_str("...");
        cut
    } else {
        message.to_string()
    };

    (kept.join("\n"), message)
}
