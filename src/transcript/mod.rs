//! Transcript intake.
//!
//! - `excel`: reads an uploaded workbook into raw grade records
//! - `normalize`: turns raw records into canonical `TranscriptEntry` values

pub mod excel;
pub mod normalize;

pub use excel::{read_transcript_bytes, read_transcript_file};
pub use normalize::{normalize_record, normalize_transcript, FAIL_THRESHOLD};
