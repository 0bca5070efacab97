//! Filtered, paginated views over an analysis.
//!
//! Mirrors what the results table shows: a status filter (learned /
//! not-learned), an elective-track filter (all / thesis / four alternative
//! subjects, optionally narrowed to one specialization) and fixed-size pages.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::curriculum::{has_marker, THESIS_MARKER};
use crate::models::{Course, CurriculumProgram, ElectiveGroup, ReconciliationSummary, TranscriptEntry};

pub const PAGE_SIZE: usize = 10;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StatusFilter {
    #[default]
    Learned,
    NotLearned,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TrackFilter {
    #[default]
    All,
    Thesis,
    /// Alternative-subjects track; `major` narrows it to one group by exact name.
    FourSubjects { major: Option<String> },
}

impl TrackFilter {
    /// Parse the wire values `all`, `thesis`, `four-subjects`. A major of `all`
    /// (or blank) means no specialization. Unknown tracks fall back to `All`.
    pub fn parse(track: &str, major: Option<&str>) -> Self {
        match track.trim() {
            "thesis" => TrackFilter::Thesis,
            "four-subjects" => TrackFilter::FourSubjects {
                major: major
                    .map(str::trim)
                    .filter(|m| !m.is_empty() && *m != "all")
                    .map(str::to_string),
            },
            _ => TrackFilter::All,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RowStatus {
    #[serde(rename = "correct")]
    Correct,
    #[serde(rename = "nonacc")]
    NonAccumulated,
    #[serde(rename = "incorrect")]
    Incorrect,
    #[serde(rename = "not-learned")]
    NotLearned,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewRow {
    /// 1-based position in the whole filtered list.
    pub index: usize,
    pub code: String,
    pub name: String,
    pub credits: Option<f64>,
    pub score10: Option<f64>,
    pub letter_grade: Option<String>,
    pub gpa4: Option<f64>,
    pub status: RowStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewPage {
    pub page: usize,
    pub total_pages: usize,
    pub total_rows: usize,
    pub rows: Vec<ViewRow>,
}

/// A row before formatting: either a transcript record or a bare catalog course.
#[derive(Debug, Clone, Copy)]
enum Item<'a> {
    Grade(&'a TranscriptEntry),
    Course(&'a Course),
}

impl Item<'_> {
    fn code(&self) -> &str {
        match self {
            Item::Grade(g) => &g.course_code,
            Item::Course(c) => &c.code,
        }
    }
}

/// First elective group whose name carries the thesis marker.
pub fn thesis_group(program: &CurriculumProgram) -> Option<&ElectiveGroup> {
    program.elective_groups.iter().find(|g| has_marker(&g.name, THESIS_MARKER))
}

/// Specializations selectable under the alternative-subjects track, in declared order.
pub fn major_options(program: &CurriculumProgram) -> Vec<String> {
    program
        .elective_groups
        .iter()
        .filter(|g| !has_marker(&g.name, THESIS_MARKER))
        .map(|g| g.name.clone())
        .collect()
}

/// Subjects belonging to a track, in group order. `All` has none.
pub fn track_subjects<'a>(program: &'a CurriculumProgram, track: &TrackFilter) -> Vec<&'a Course> {
    match track {
        TrackFilter::All => Vec::new(),
        TrackFilter::Thesis => thesis_group(program).map(|g| g.subjects.iter().collect()).unwrap_or_default(),
        TrackFilter::FourSubjects { major: Some(m) } => program
            .elective_groups
            .iter()
            .find(|g| &g.name == m)
            .map(|g| g.subjects.iter().collect())
            .unwrap_or_default(),
        TrackFilter::FourSubjects { major: None } => program
            .elective_groups
            .iter()
            .filter(|g| !has_marker(&g.name, THESIS_MARKER))
            .flat_map(|g| g.subjects.iter())
            .collect(),
    }
}

/// Code set of a track; `None` means unrestricted.
pub fn track_codes(program: &CurriculumProgram, track: &TrackFilter) -> Option<HashSet<String>> {
    match track {
        TrackFilter::All => None,
        _ => Some(track_subjects(program, track).into_iter().map(|c| c.code.clone()).collect()),
    }
}

fn select_items<'a>(
    program: &'a CurriculumProgram,
    transcript: &'a [TranscriptEntry],
    summary: &'a ReconciliationSummary,
    status: StatusFilter,
    track: &TrackFilter,
) -> Vec<Item<'a>> {
    match status {
        StatusFilter::Learned => {
            let allowed = track_codes(program, track);
            transcript
                .iter()
                .filter(|g| allowed.as_ref().map_or(true, |set| set.contains(&g.course_code)))
                .map(Item::Grade)
                .collect()
        }
        StatusFilter::NotLearned => {
            let mut items: Vec<Item<'a>> = summary.not_yet_learned.iter().map(Item::Course).collect();
            if *track == TrackFilter::All {
                return items;
            }
            // Track subjects are appended even when already taken, so the whole track is visible.
            let mut shown: HashSet<String> = items.iter().map(|i| i.code().to_string()).collect();
            for subj in track_subjects(program, track) {
                if !shown.insert(subj.code.clone()) {
                    continue;
                }
                match transcript.iter().find(|g| g.course_code == subj.code) {
                    Some(g) => items.push(Item::Grade(g)),
                    None => items.push(Item::Course(subj)),
                }
            }
            items
        }
    }
}

fn classify(program: &CurriculumProgram, code: &str, score10: Option<f64>) -> RowStatus {
    if score10.is_none() {
        return RowStatus::NotLearned;
    }
    if !code.is_empty() && program.contains(code) {
        if program.is_non_accumulated(code) { RowStatus::NonAccumulated } else { RowStatus::Correct }
    } else {
        RowStatus::Incorrect
    }
}

fn to_row(program: &CurriculumProgram, index: usize, item: Item<'_>) -> ViewRow {
    let (code, name, credits, score10, letter_grade, gpa4) = match item {
        Item::Grade(g) => (
            g.course_code.clone(),
            g.course_name.clone().unwrap_or_default(),
            g.credits,
            g.score10,
            g.letter_grade.clone(),
            g.gpa4,
        ),
        Item::Course(c) => (c.code.clone(), c.name.clone(), Some(f64::from(c.credits)), None, None, None),
    };

    let name = if name.trim().is_empty() {
        program.code_name_map.get(&code).cloned().unwrap_or_default()
    } else {
        name
    };

    ViewRow {
        index,
        status: classify(program, &code, score10),
        code,
        name,
        credits,
        score10,
        letter_grade,
        gpa4,
    }
}

/// Clamp `page` into range. Returns `(page, total_pages, start, end)` with `end` exclusive.
pub fn paginate(total_rows: usize, page: usize) -> (usize, usize, usize, usize) {
    let total_pages = total_rows.div_ceil(PAGE_SIZE).max(1);
    let page = page.clamp(1, total_pages);
    let start = (page - 1) * PAGE_SIZE;
    let end = (start + PAGE_SIZE).min(total_rows);
    (page, total_pages, start, end)
}

/// Build one page of the results table.
pub fn build_view(
    program: &CurriculumProgram,
    transcript: &[TranscriptEntry],
    summary: &ReconciliationSummary,
    status: StatusFilter,
    track: &TrackFilter,
    page: usize,
) -> ViewPage {
    let items = select_items(program, transcript, summary, status, track);
    let (page, total_pages, start, end) = paginate(items.len(), page);

    let rows = items[start..end]
        .iter()
        .enumerate()
        .map(|(i, item)| to_row(program, start + i + 1, *item))
        .collect();

    ViewPage { page, total_pages, total_rows: items.len(), rows }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paginate_clamps() {
        assert_eq!(paginate(0, 1), (1, 1, 0, 0));
        assert_eq!(paginate(25, 0), (1, 3, 0, 10));
        assert_eq!(paginate(25, 3), (3, 3, 20, 25));
        assert_eq!(paginate(25, 99), (3, 3, 20, 25));
    }

    #[test]
    fn track_parsing() {
        assert_eq!(TrackFilter::parse("thesis", None), TrackFilter::Thesis);
        assert_eq!(TrackFilter::parse("four-subjects", Some("all")), TrackFilter::FourSubjects { major: None });
        assert_eq!(
            TrackFilter::parse("four-subjects", Some("An toàn thông tin")),
            TrackFilter::FourSubjects { major: Some("An toàn thông tin".into()) }
        );
        assert_eq!(TrackFilter::parse("whatever", None), TrackFilter::All);
    }
}
