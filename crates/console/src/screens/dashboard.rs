use std::fmt;

use eduhub_core::status::EntityKind;

use crate::store::{ConsoleState, ReviewSlice};

/// Counts for one reviewable entity kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KindSummary {
    pub kind: EntityKind,
    pub total: usize,
    pub pending_create: usize,
    pub pending_update: usize,
}

impl KindSummary {
    fn of<T>(kind: EntityKind, slice: &ReviewSlice<T>) -> Self {
        Self {
            kind,
            total: slice.canonical.len(),
            pending_create: slice.pending_creates.len(),
            pending_update: slice.pending_updates.len(),
        }
    }
}

/// Dashboard numbers derived from one store snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardSummary {
    pub kinds: Vec<KindSummary>,
    pub courses: usize,
    pub published_courses: usize,
}

impl DashboardSummary {
    pub fn from_state(state: &ConsoleState) -> Self {
        Self {
            kinds: vec![
                KindSummary::of(EntityKind::Partner, &state.partners),
                KindSummary::of(EntityKind::Lecturer, &state.lecturers),
                KindSummary::of(EntityKind::Institution, &state.institutions),
                KindSummary::of(EntityKind::Degree, &state.degrees),
                KindSummary::of(EntityKind::Certification, &state.certifications),
            ],
            courses: state.courses.len(),
            published_courses: state.courses.iter().filter(|c| c.is_published).count(),
        }
    }

    pub fn total_pending(&self) -> usize {
        self.kinds
            .iter()
            .map(|k| k.pending_create + k.pending_update)
            .sum()
    }
}

impl fmt::Display for DashboardSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:<16} {:>8} {:>12} {:>12}",
            "", "Tổng", "Chờ tạo", "Chờ sửa"
        )?;
        for k in &self.kinds {
            writeln!(
                f,
                "{:<16} {:>8} {:>12} {:>12}",
                k.kind.label(),
                k.total,
                k.pending_create,
                k.pending_update
            )?;
        }
        write!(
            f,
            "Khóa học: {} ({} đã xuất bản)",
            self.courses, self.published_courses
        )
    }
}
