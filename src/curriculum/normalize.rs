//! Flattens a raw curriculum tree into the lookup tables used by the engine.
//!
//! The tree is walked exactly once. Each category and subcategory becomes a
//! `Scope` carrying its two flags; subjects reached under a non-accumulated
//! scope are flagged, subjects reached under an elective scope also land in
//! the elective catalog. Labels are never consulted again after this point.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::curriculum::document::{Category, CurriculumDocument, RawGroup, RawSubject};
use crate::curriculum::{has_marker, ELECTIVE_MARKER, NON_ACCUMULATED_MARKER, PHYSICAL_EDUCATION_MARKER};
use crate::models::{normalize_code, Course, CurriculumProgram, ElectiveGroup, PhysicalEducationBlock};

/// Elective quota used when no elective scope declares `total_credits`.
pub const DEFAULT_ELECTIVE_QUOTA: u32 = 12;

#[derive(Debug, Clone, Copy)]
enum ScopeKind {
    Category,
    Subcategory,
}

/// One level of the tree with the flags that apply to it.
#[derive(Debug, Clone, Copy)]
struct Scope {
    kind: ScopeKind,
    non_accumulated: bool,
    elective: bool,
}

impl Scope {
    fn category(label: &str) -> Self {
        Scope {
            kind: ScopeKind::Category,
            non_accumulated: has_marker(label, NON_ACCUMULATED_MARKER),
            elective: has_marker(label, ELECTIVE_MARKER),
        }
    }

    /// Non-accumulation is inherited from the parent and never cleared.
    fn subcategory(parent: &Scope, label: &str) -> Self {
        Scope {
            kind: ScopeKind::Subcategory,
            non_accumulated: parent.non_accumulated || has_marker(label, NON_ACCUMULATED_MARKER),
            elective: has_marker(label, ELECTIVE_MARKER),
        }
    }
}

/// Accumulates catalog rows in insertion order; deduplication happens at `finish`.
#[derive(Default)]
struct CatalogBuilder {
    all: Vec<Course>,
    electives: Vec<Course>,
    non_accumulated: HashSet<String>,
    elective_groups: Vec<ElectiveGroup>,
    quota: u32,
}

impl CatalogBuilder {
    fn add_base(&mut self, subjects: &[RawSubject], non_accumulated: bool) {
        for s in subjects {
            if let Some(course) = to_course(s) {
                if non_accumulated {
                    self.non_accumulated.insert(course.code.clone());
                }
                self.all.push(course);
            }
        }
    }

    fn add_groups(&mut self, groups: &[RawGroup], non_accumulated: bool) {
        for g in groups {
            self.add_base(&g.subjects, non_accumulated);
        }
    }

    /// Elective handling shared by categories and subcategories.
    /// `groups` is `None` when the scope does not declare any; a declared empty list still replaces.
    fn add_elective_scope(&mut self, scope: &Scope, subjects: &[RawSubject], groups: Option<&[RawGroup]>, total_credits: Option<f64>) {
        if let Some(tc) = total_credits {
            if tc.is_finite() && tc > 0.0 {
                self.quota = tc.round() as u32;
            }
        }

        self.electives.extend(subjects.iter().filter_map(to_course));

        if let Some(groups) = groups {
            // Only the most recently processed elective scope's groups survive.
            if !self.elective_groups.is_empty() {
                debug!(?scope.kind, "elective groups redeclared; earlier scope's groups are replaced");
            }
            self.elective_groups = groups.iter().map(to_group).collect();
            for g in groups {
                self.electives.extend(g.subjects.iter().filter_map(to_course));
            }
        }
    }

    fn finish(self) -> (Vec<Course>, HashSet<String>, Vec<Course>, Vec<ElectiveGroup>, u32) {
        let all = dedup_first_wins(self.all);
        let electives = dedup_first_wins(self.electives);
        let quota = if self.quota == 0 { DEFAULT_ELECTIVE_QUOTA } else { self.quota };
        (all, self.non_accumulated, electives, self.elective_groups, quota)
    }
}

/// Normalize a raw curriculum document into a `CurriculumProgram`.
pub fn normalize_curriculum(doc: &CurriculumDocument) -> CurriculumProgram {
    let mut builder = CatalogBuilder::default();
    let mut physical_education: Option<PhysicalEducationBlock> = None;
    let mut seen_non_accumulated_category = false;

    for cat in &doc.courses {
        let label = cat.category.as_deref().unwrap_or("");
        let scope = Scope::category(label);

        builder.add_base(&cat.subjects, scope.non_accumulated);
        builder.add_groups(cat.group_list(), scope.non_accumulated);

        for sc in &cat.subcategories {
            let sc_label = sc.name.as_deref().unwrap_or("");
            let sc_scope = Scope::subcategory(&scope, sc_label);

            builder.add_base(&sc.subjects, sc_scope.non_accumulated);
            builder.add_groups(sc.group_list(), sc_scope.non_accumulated);

            if sc_scope.elective {
                builder.add_elective_scope(&sc_scope, &sc.subjects, sc.groups.as_deref(), sc.total_credits);
            }
        }

        if scope.elective {
            builder.add_elective_scope(&scope, &cat.subjects, cat.groups.as_deref(), cat.total_credits);
        }

        if scope.non_accumulated && !seen_non_accumulated_category {
            seen_non_accumulated_category = true;
            physical_education = find_physical_education(cat);
        }
    }

    let (course_catalog, non_accumulated_codes, elective_catalog, elective_groups, elective_credit_quota) = builder.finish();

    let code_name_map: HashMap<String, String> = course_catalog
        .iter()
        .map(|c| (c.code.clone(), c.name.clone()))
        .collect();

    debug!(
        courses = course_catalog.len(),
        electives = elective_catalog.len(),
        groups = elective_groups.len(),
        quota = elective_credit_quota,
        physical_education = physical_education.is_some(),
        "curriculum normalized"
    );

    CurriculumProgram {
        year: doc.academic_year.clone().unwrap_or_default(),
        department: doc.department.clone().unwrap_or_default(),
        program_code: doc.program_code.clone().unwrap_or_default(),
        total_credits_required: doc.total_credits,
        non_accumulated_credits_required: doc.non_accumulated_credits,
        course_catalog,
        code_name_map,
        non_accumulated_codes,
        elective_catalog,
        elective_groups,
        elective_credit_quota,
        physical_education,
    }
}

/// First physical-education subcategory of the (first) non-accumulated category.
fn find_physical_education(cat: &Category) -> Option<PhysicalEducationBlock> {
    let sc = cat
        .subcategories
        .iter()
        .find(|sc| has_marker(sc.name.as_deref().unwrap_or(""), PHYSICAL_EDUCATION_MARKER))?;

    Some(PhysicalEducationBlock {
        groups: sc.group_list().iter().map(to_group).collect(),
        loose_subjects: sc.subjects.iter().filter_map(to_course).collect(),
    })
}

fn to_course(s: &RawSubject) -> Option<Course> {
    let code = normalize_code(s.code.as_deref().unwrap_or(""));
    if code.is_empty() {
        return None;
    }
    Some(Course {
        code,
        name: s.name.clone().unwrap_or_default(),
        credits: s.credits_or_zero(),
    })
}

fn to_group(g: &RawGroup) -> ElectiveGroup {
    ElectiveGroup {
        name: g.group_name.clone().unwrap_or_default(),
        subjects: g.subjects.iter().filter_map(to_course).collect(),
    }
}

fn dedup_first_wins(courses: Vec<Course>) -> Vec<Course> {
    let mut seen: HashSet<String> = HashSet::new();
    courses.into_iter().filter(|c| seen.insert(c.code.clone())).collect()
}
