//! Course member dialog against the mock backend.

mod common;

use assert_matches::assert_matches;
use eduhub_client::Collection;
use eduhub_console::workflows::course_members::MemberDialog;
use eduhub_console::workflows::refetch;
use eduhub_console::ConsoleError;
use eduhub_core::course_members::MemberError;
use eduhub_core::messages;
use eduhub_core::models::{CourseRole, Lecturer};
use serde_json::json;

use common::{harness, lecturer, Backend};

fn course_backend() -> Backend {
    let backend = Backend::default();
    backend.members.lock().unwrap().insert(
        3,
        vec![json!({"lecturer": lecturer(1, "Tác Giả A"), "courseRole": "AUTHOR"})],
    );
    backend.seed_canonical(
        "lecturers",
        vec![lecturer(1, "Tác Giả A"), lecturer(2, "Trần Thị B"), lecturer(4, "Lê Văn C")],
    );
    backend
}

#[tokio::test]
async fn author_cannot_be_removed() {
    let mut h = harness(course_backend()).await;
    let mut dialog = MemberDialog::open(h.app.clone(), 3).await.unwrap();

    let err = dialog.remove(1).unwrap_err();
    assert_matches!(err, ConsoleError::Member(MemberError::AuthorLocked));

    let rows = dialog.rows();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].role, CourseRole::Author);
    assert!(!rows[0].removable);
    assert!(!rows[0].role_editable);
    assert!(!dialog.is_dirty());
    assert!(h.toasts().contains(&messages::AUTHOR_LOCKED.to_string()));
}

#[tokio::test]
async fn save_replaces_whole_array_then_refetches() {
    let mut h = harness(course_backend()).await;
    refetch::<Lecturer>(&h.app, Collection::Canonical).await.unwrap();
    let mut dialog = MemberDialog::open(h.app.clone(), 3).await.unwrap();

    let candidates = dialog.candidates("trần");
    assert_eq!(candidates.len(), 1);
    dialog.add(candidates[0].clone(), CourseRole::Assistant).unwrap();
    assert!(dialog.is_dirty());

    h.backend.calls.lock().unwrap().clear();
    assert!(dialog.save().await.unwrap());

    assert_eq!(
        h.backend.calls(),
        vec![
            "PUT /api/v1/admin/courses/3/lecturers",
            "GET /api/v1/admin/courses/3/lecturers",
        ]
    );
    assert_eq!(
        h.backend.bodies_for("/api/v1/admin/courses/3/lecturers"),
        vec![json!([
            {"lecturerId": 1, "courseRole": "AUTHOR"},
            {"lecturerId": 2, "courseRole": "ASSISTANT"},
        ])]
    );

    assert!(!dialog.is_dirty());
    assert_eq!(h.app.store.snapshot().course_members[&3].len(), 2);
    assert!(h.toasts().contains(&messages::SAVE_SUCCESS.to_string()));
}

#[tokio::test]
async fn saving_without_changes_sends_nothing() {
    let mut h = harness(course_backend()).await;
    let mut dialog = MemberDialog::open(h.app.clone(), 3).await.unwrap();
    h.backend.calls.lock().unwrap().clear();

    assert!(!dialog.save().await.unwrap());
    assert!(h.backend.calls().is_empty());
    assert!(h.toasts().contains(&messages::NO_CHANGES.to_string()));
}

#[tokio::test]
async fn candidates_exclude_current_members() {
    let h = harness(course_backend()).await;
    refetch::<Lecturer>(&h.app, Collection::Canonical).await.unwrap();
    let dialog = MemberDialog::open(h.app.clone(), 3).await.unwrap();

    let ids: Vec<_> = dialog.candidates("").iter().map(|l| l.id).collect();
    assert_eq!(ids, vec![2, 4]);
}
