mod common;

use common::{graded, program};
use studymate::algorithm::filters::{thesis_group, track_codes};
use studymate::algorithm::{build_view, major_options, reconcile, RowStatus, StatusFilter, TrackFilter, PAGE_SIZE};
use studymate::models::TranscriptEntry;

fn four_subjects(major: Option<&str>) -> TrackFilter {
    TrackFilter::FourSubjects { major: major.map(str::to_string) }
}

#[test]
fn majors_exclude_the_thesis_group() {
    let p = program();
    assert_eq!(major_options(&p), vec!["An toàn thông tin".to_string(), "Khoa học dữ liệu".to_string()]);
    assert_eq!(thesis_group(&p).map(|g| g.name.as_str()), Some("Đồ án tốt nghiệp"));
}

#[test]
fn track_code_sets() {
    let p = program();
    assert_eq!(track_codes(&p, &TrackFilter::All), None);

    let thesis = track_codes(&p, &TrackFilter::Thesis).unwrap();
    assert_eq!(thesis.len(), 1);
    assert!(thesis.contains("DATN"));

    let all_four = track_codes(&p, &four_subjects(None)).unwrap();
    assert_eq!(all_four.len(), 4);

    let data = track_codes(&p, &four_subjects(Some("Khoa học dữ liệu"))).unwrap();
    assert!(data.contains("E3") && data.contains("E4") && data.len() == 2);

    assert!(track_codes(&p, &four_subjects(Some("Không tồn tại"))).unwrap().is_empty());
}

#[test]
fn learned_view_classifies_rows() {
    let p = program();
    let transcript = vec![
        graded("MAT101", 3.0, 8.0),
        graded("QP1", 4.0, 7.0),
        graded("XYZ999", 2.0, 6.0),
        TranscriptEntry { course_code: "CMP101".into(), credits: Some(3.0), ..Default::default() },
    ];
    let summary = reconcile(&p, &transcript);
    let page = build_view(&p, &transcript, &summary, StatusFilter::Learned, &TrackFilter::All, 1);

    assert_eq!(page.total_rows, 4);
    let statuses: Vec<RowStatus> = page.rows.iter().map(|r| r.status).collect();
    assert_eq!(
        statuses,
        vec![RowStatus::Correct, RowStatus::NonAccumulated, RowStatus::Incorrect, RowStatus::NotLearned]
    );
    // blank transcript names fall back to the catalog
    assert_eq!(page.rows[0].name, "Giải tích");
    assert_eq!(page.rows[0].index, 1);
}

#[test]
fn learned_view_filtered_by_track() {
    let p = program();
    let transcript = vec![graded("MAT101", 3.0, 8.0), graded("E1", 3.0, 8.0), graded("E3", 3.0, 7.0)];
    let summary = reconcile(&p, &transcript);

    let page = build_view(&p, &transcript, &summary, StatusFilter::Learned, &four_subjects(Some("An toàn thông tin")), 1);
    let shown: Vec<&str> = page.rows.iter().map(|r| r.code.as_str()).collect();
    assert_eq!(shown, vec!["E1"]);

    let page = build_view(&p, &transcript, &summary, StatusFilter::Learned, &TrackFilter::Thesis, 1);
    assert_eq!(page.total_rows, 0);
    assert_eq!(page.total_pages, 1);
}

#[test]
fn not_learned_view_appends_whole_track() {
    let p = program();
    let transcript = vec![graded("E1", 3.0, 8.0)];
    let summary = reconcile(&p, &transcript);

    let base = build_view(&p, &transcript, &summary, StatusFilter::NotLearned, &TrackFilter::All, 1);
    assert_eq!(base.total_rows, summary.not_yet_learned.len());

    let track = four_subjects(Some("An toàn thông tin"));
    let view = build_view(&p, &transcript, &summary, StatusFilter::NotLearned, &track, 99);
    assert_eq!(view.total_rows, summary.not_yet_learned.len() + 1);
    assert_eq!(view.page, view.total_pages);

    let e1 = view.rows.iter().find(|r| r.code == "E1").expect("taken track subject appended");
    assert_eq!(e1.score10, Some(8.0));
    assert_eq!(e1.status, RowStatus::Correct);
    assert!(view.rows.iter().filter(|r| r.code != "E1").all(|r| r.status == RowStatus::NotLearned));
}

#[test]
fn pages_hold_ten_rows() {
    let p = program();
    let transcript: Vec<TranscriptEntry> = (0..23).map(|i| graded(&format!("X{:02}", i), 1.0, 5.0)).collect();
    let summary = reconcile(&p, &transcript);

    let first = build_view(&p, &transcript, &summary, StatusFilter::Learned, &TrackFilter::All, 0);
    assert_eq!((first.page, first.total_pages, first.rows.len()), (1, 3, PAGE_SIZE));

    let last = build_view(&p, &transcript, &summary, StatusFilter::Learned, &TrackFilter::All, 3);
    assert_eq!(last.rows.len(), 3);
    assert_eq!(last.rows[0].index, 21);
    assert!(last.rows.iter().all(|r| r.status == RowStatus::Incorrect));
}
