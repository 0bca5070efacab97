//! Transcript ↔ curriculum reconciliation.
//!
//! Pure function of its two inputs: matching, credit classification, weighted
//! GPA, elective fulfillment and the not-yet-learned list.

use tracing::debug;

use crate::algorithm::not_learned::not_yet_learned;
use crate::error::{Error, Result};
use crate::models::{CurriculumProgram, ReconciliationSummary, TranscriptEntry};

/// Running sums for the accumulated (GPA-bearing) credits.
#[derive(Debug, Default, Clone, Copy)]
struct Totals {
    matched: usize,
    unmatched: usize,
    accumulated: f64,
    non_accumulated: f64,
    gpa4_sum: f64,
    score10_sum: f64,
    elective_earned: f64,
}

/// `sum / credits`, reported only when both are strictly positive.
/// An all-zero transcript therefore shows no GPA instead of 0.00.
pub fn weighted_average(weighted_sum: f64, credits: f64) -> Option<f64> {
    if credits > 0.0 && weighted_sum > 0.0 {
        Some(weighted_sum / credits)
    } else {
        None
    }
}

/// Reconcile a transcript against a loaded curriculum.
pub fn reconcile(program: &CurriculumProgram, transcript: &[TranscriptEntry]) -> ReconciliationSummary {
    let elective_codes = program.elective_codes();
    let mut t = Totals::default();

    for entry in transcript.iter().filter(|e| e.has_code()) {
        let code = entry.course_code.as_str();
        if !program.contains(code) {
            t.unmatched += 1;
            continue;
        }
        t.matched += 1;

        // absent credits contribute to nothing
        let Some(credits) = entry.credits else { continue };

        if program.is_non_accumulated(code) {
            t.non_accumulated += credits;
        } else {
            t.accumulated += credits;
            if let Some(g) = entry.gpa4 {
                t.gpa4_sum += g * credits;
            }
            if let Some(s) = entry.score10 {
                t.score10_sum += s * credits;
            }
        }

        if elective_codes.contains(code) {
            t.elective_earned += credits;
        }
    }

    let quota = program.elective_credit_quota;
    let not_yet_learned = not_yet_learned(program, transcript);

    debug!(
        matched = t.matched,
        unmatched = t.unmatched,
        accumulated = t.accumulated,
        not_yet_learned = not_yet_learned.len(),
        "transcript reconciled"
    );

    ReconciliationSummary {
        matched_count: t.matched,
        unmatched_count: t.unmatched,
        accumulated_credits: t.accumulated,
        non_accumulated_credits: t.non_accumulated,
        gpa4_weighted: weighted_average(t.gpa4_sum, t.accumulated),
        gpa10_weighted: weighted_average(t.score10_sum, t.accumulated),
        elective_credits_earned: t.elective_earned,
        elective_credits_missing: (f64::from(quota) - t.elective_earned).max(0.0),
        elective_credits_required: quota,
        not_yet_learned,
    }
}

/// Entry point for callers holding an optional selection: refuses to compute
/// anything without a curriculum.
pub fn try_reconcile(program: Option<&CurriculumProgram>, transcript: &[TranscriptEntry]) -> Result<ReconciliationSummary> {
    let program = program.ok_or(Error::MissingCurriculum)?;
    Ok(reconcile(program, transcript))
}
