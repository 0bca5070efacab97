//! Spreadsheet transcript reader: first sheet, header row detected by keywords,
//! one raw grade record per data row.

use std::io::Cursor;
use std::path::Path;

use calamine::{open_workbook_auto, open_workbook_auto_from_rs, Data, Range, Reader};
use serde_json::{json, Map, Value};
use tracing::debug;

use crate::error::{Error, Result};

/// Rows scanned looking for the header row.
const HEADER_SCAN_ROWS: usize = 20;

/// Header key: lowercase, whitespace removed ("Mã MH" -> "mãmh").
pub fn normalize_header(s: &str) -> String {
    s.to_lowercase().chars().filter(|c| !c.is_whitespace()).collect()
}

/// Column positions found in the header row.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct TranscriptColumns {
    pub code: usize,
    pub name: Option<usize>,
    pub credits: Option<usize>,
    pub score10: Option<usize>,
    pub letter: Option<usize>,
    pub gpa4: Option<usize>,
}

fn is_code_header(h: &str) -> bool {
    ["mãmh", "mãmôn", "mãhp", "mãhọcphần", "coursecode"].iter().any(|k| h.contains(k)) || h == "code"
}

fn is_name_header(h: &str) -> bool {
    ["tênmh", "tênmôn", "tênhp", "tênhọcphần", "coursename"].iter().any(|k| h.contains(k)) || h == "name"
}

fn is_credit_header(h: &str) -> bool {
    h == "stc" || h == "tc" || ["sốtc", "tínchỉ", "credit"].iter().any(|k| h.contains(k))
}

fn is_score10_header(h: &str) -> bool {
    ["(10)", "hệ10", "thang10", "score10"].iter().any(|k| h.contains(k))
}

fn is_letter_header(h: &str) -> bool {
    ["chữ", "letter"].iter().any(|k| h.contains(k))
}

fn is_gpa4_header(h: &str) -> bool {
    ["(4)", "hệ4", "thang4", "gpa"].iter().any(|k| h.contains(k))
}

/// Detect columns from one header row. Returns `None` when no code column exists.
/// The first column matching a rule wins.
pub fn detect_columns(headers: &[String]) -> Option<TranscriptColumns> {
    let norm: Vec<String> = headers.iter().map(|h| normalize_header(h)).collect();
    let code = norm.iter().position(|h| is_code_header(h))?;
    let pick = |rule: fn(&str) -> bool| norm.iter().enumerate().position(|(i, h)| i != code && rule(h));

    Some(TranscriptColumns {
        code,
        name: pick(is_name_header),
        credits: pick(is_credit_header),
        score10: pick(is_score10_header),
        letter: pick(is_letter_header),
        gpa4: pick(is_gpa4_header),
    })
}

fn cell_to_string(c: &Data) -> String {
    match c {
        Data::String(s) => s.trim().to_string(),
        Data::Float(f) => {
            if (f.floor() - f).abs() < f64::EPSILON {
                format!("{}", *f as i64)
            } else {
                format!("{}", f)
            }
        }
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        _ => String::new(),
    }
}

fn cell_to_json(c: &Data) -> Value {
    match c {
        Data::Float(f) => json!(f),
        Data::Int(i) => json!(i),
        Data::String(s) if !s.trim().is_empty() => Value::String(s.trim().to_string()),
        _ => Value::Null,
    }
}

/// Turn a sheet into raw grade records (camelCase keys) for `transcript::normalize`.
pub fn records_from_range(range: &Range<Data>) -> Result<Vec<Value>> {
    let rows: Vec<&[Data]> = range.rows().collect();

    let (header_idx, cols) = rows
        .iter()
        .take(HEADER_SCAN_ROWS)
        .enumerate()
        .find_map(|(i, r)| {
            let headers: Vec<String> = r.iter().map(cell_to_string).collect();
            detect_columns(&headers).map(|c| (i, c))
        })
        .ok_or_else(|| Error::Transcript("no course-code column found in the first rows".to_string()))?;

    debug!(header_row = header_idx, ?cols, "transcript columns detected");

    let get = |row: &[Data], idx: Option<usize>| -> Value {
        idx.and_then(|i| row.get(i)).map(cell_to_json).unwrap_or(Value::Null)
    };

    let mut out = Vec::new();
    for row in rows.iter().copied().skip(header_idx + 1) {
        let code = row.get(cols.code).map(cell_to_string).unwrap_or_default();
        let name = get(row, cols.name);
        if code.is_empty() && name.is_null() {
            continue;
        }
        let mut rec = Map::new();
        rec.insert("courseCode".into(), Value::String(code));
        rec.insert("courseName".into(), name);
        rec.insert("credits".into(), get(row, cols.credits));
        rec.insert("score10".into(), get(row, cols.score10));
        rec.insert("letterGrade".into(), get(row, cols.letter));
        rec.insert("gpa".into(), get(row, cols.gpa4));
        out.push(Value::Object(rec));
    }
    Ok(out)
}

fn first_sheet<RS>(workbook: &mut calamine::Sheets<RS>) -> Result<Range<Data>>
where
    RS: std::io::Read + std::io::Seek,
{
    let names = workbook.sheet_names().to_owned();
    let first = names
        .first()
        .ok_or_else(|| Error::Transcript("workbook has no sheets".to_string()))?;
    workbook
        .worksheet_range(first)
        .map_err(|e| Error::Transcript(format!("cannot read sheet '{}': {}", first, e)))
}

/// Read an uploaded workbook (.xlsx/.xls) from memory.
pub fn read_transcript_bytes(bytes: &[u8]) -> Result<Vec<Value>> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))
        .map_err(|e| Error::Transcript(e.to_string()))?;
    let range = first_sheet(&mut workbook)?;
    records_from_range(&range)
}

pub fn read_transcript_file<P: AsRef<Path>>(path: P) -> Result<Vec<Value>> {
    let mut workbook = open_workbook_auto(path).map_err(|e| Error::Transcript(e.to_string()))?;
    let range = first_sheet(&mut workbook)?;
    records_from_range(&range)
}
