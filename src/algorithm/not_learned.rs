//! Not-yet-learned derivation.
//!
//! Catalog courses the student has no transcript entry for, except that the
//! physical-education groups are alternatives: only the group the student
//! started counts, and a finished group hides all of them.

use std::collections::HashSet;

use tracing::debug;

use crate::models::{Course, CurriculumProgram, ElectiveGroup, TranscriptEntry};

/// Earned credits inside one PE group that complete physical education.
pub const PE_COMPLETION_CREDITS: f64 = 5.0;

/// Where the student stands on physical education.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PhysicalEducationStatus<'a> {
    /// No transcript entry in any group.
    NotStarted,
    /// First touched group has fewer than the completion credits.
    Active(&'a ElectiveGroup),
    /// First touched group reached the completion credits.
    Completed(&'a ElectiveGroup),
}

/// Set of trimmed, upper-cased transcript codes, matched or not.
pub fn learned_codes(transcript: &[TranscriptEntry]) -> HashSet<&str> {
    transcript
        .iter()
        .filter(|e| e.has_code())
        .map(|e| e.course_code.as_str())
        .collect()
}

/// Scan PE groups in declared order; the first group with any transcript entry decides.
pub fn physical_education_status<'a>(groups: &'a [ElectiveGroup], transcript: &[TranscriptEntry]) -> PhysicalEducationStatus<'a> {
    for group in groups {
        let codes = group.codes();
        let mut touched = false;
        let mut earned = 0.0;
        for e in transcript.iter().filter(|e| codes.contains(&e.course_code)) {
            touched = true;
            earned += e.credits.unwrap_or(0.0);
        }
        if touched {
            return if earned >= PE_COMPLETION_CREDITS {
                PhysicalEducationStatus::Completed(group)
            } else {
                PhysicalEducationStatus::Active(group)
            };
        }
    }
    PhysicalEducationStatus::NotStarted
}

/// Courses still outstanding, in catalog order.
pub fn not_yet_learned(program: &CurriculumProgram, transcript: &[TranscriptEntry]) -> Vec<Course> {
    let learned = learned_codes(transcript);
    let outstanding = program.course_catalog.iter().filter(|c| !learned.contains(c.code.as_str()));

    let Some(pe) = &program.physical_education else {
        return outstanding.cloned().collect();
    };

    let pe_codes = pe.codes();
    let status = physical_education_status(&pe.groups, transcript);
    debug!(?status, "physical education status");

    outstanding
        .filter(|c| {
            if !pe_codes.contains(&c.code) {
                return true;
            }
            match status {
                PhysicalEducationStatus::Completed(_) => false,
                PhysicalEducationStatus::Active(g) => g.contains(&c.code),
                PhysicalEducationStatus::NotStarted => true,
            }
        })
        .cloned()
        .collect()
}
