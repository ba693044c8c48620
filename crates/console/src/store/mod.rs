//! Client-side store.
//!
//! [`ConsoleState`] is an immutable snapshot of everything fetched from the
//! backend. It only changes through [`reduce`], a pure function of the
//! previous snapshot and an [`Action`]. [`Store`] publishes each new
//! snapshot through a `tokio::sync::watch` channel; consumers that care about
//! one slice use [`Store::select`].

pub mod slices;

use std::collections::BTreeMap;
use std::sync::Arc;

use eduhub_core::models::{
    Account, Certification, Course, CourseMember, Degree, Institution, Lecturer, Partner,
    PendingLecturer,
};
use eduhub_core::review::Reviewable;
use eduhub_core::types::DbId;
use tokio::sync::watch;

pub use slices::{ReviewSlice, SliceAction};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConsoleState {
    pub account: Option<Account>,
    pub partners: ReviewSlice<Partner>,
    pub institutions: ReviewSlice<Institution>,
    pub lecturers: ReviewSlice<Lecturer>,
    pub degrees: ReviewSlice<Degree>,
    pub certifications: ReviewSlice<Certification>,
    pub courses: Vec<Course>,
    /// Membership per course id, each fetched separately.
    pub course_members: BTreeMap<DbId, Vec<CourseMember>>,
    pub lecturer_profile: Option<PendingLecturer>,
    pub partner_profile: Option<Partner>,
    pub institution_profile: Option<Institution>,
}

#[derive(Debug, Clone)]
pub enum Action {
    SetAccount(Option<Account>),
    Partners(SliceAction<Partner>),
    Institutions(SliceAction<Institution>),
    Lecturers(SliceAction<Lecturer>),
    Degrees(SliceAction<Degree>),
    Certifications(SliceAction<Certification>),
    ReplaceCourses(Vec<Course>),
    ReplaceCourseMembers { course_id: DbId, members: Vec<CourseMember> },
    SetLecturerProfile(PendingLecturer),
    SetPartnerProfile(Partner),
    SetInstitutionProfile(Institution),
    /// Forget everything, e.g. after logout.
    Reset,
}

/// Compute the next snapshot.
pub fn reduce(state: &ConsoleState, action: Action) -> ConsoleState {
    let mut next = state.clone();
    match action {
        Action::SetAccount(account) => next.account = account,
        Action::Partners(a) => next.partners = state.partners.reduce(a),
        Action::Institutions(a) => next.institutions = state.institutions.reduce(a),
        Action::Lecturers(a) => next.lecturers = state.lecturers.reduce(a),
        Action::Degrees(a) => next.degrees = state.degrees.reduce(a),
        Action::Certifications(a) => next.certifications = state.certifications.reduce(a),
        Action::ReplaceCourses(courses) => next.courses = courses,
        Action::ReplaceCourseMembers { course_id, members } => {
            next.course_members.insert(course_id, members);
        }
        Action::SetLecturerProfile(profile) => next.lecturer_profile = Some(profile),
        Action::SetPartnerProfile(profile) => next.partner_profile = Some(profile),
        Action::SetInstitutionProfile(profile) => next.institution_profile = Some(profile),
        Action::Reset => next = ConsoleState::default(),
    }
    next
}

/// Links a reviewable entity type to its slice of the store.
pub trait StoredReview: Reviewable {
    fn slice(state: &ConsoleState) -> &ReviewSlice<Self>;
    fn action(action: SliceAction<Self>) -> Action;
}

macro_rules! stored_review {
    ($ty:ty, $field:ident, $variant:ident) => {
        impl StoredReview for $ty {
            fn slice(state: &ConsoleState) -> &ReviewSlice<Self> {
                &state.$field
            }

            fn action(action: SliceAction<Self>) -> Action {
                Action::$variant(action)
            }
        }
    };
}

stored_review!(Partner, partners, Partners);
stored_review!(Institution, institutions, Institutions);
stored_review!(Lecturer, lecturers, Lecturers);
stored_review!(Degree, degrees, Degrees);
stored_review!(Certification, certifications, Certifications);

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

/// Shared handle to the current snapshot. Cheap to clone.
#[derive(Clone)]
pub struct Store {
    sender: Arc<watch::Sender<Arc<ConsoleState>>>,
}

impl Default for Store {
    fn default() -> Self {
        Self::new(ConsoleState::default())
    }
}

impl Store {
    pub fn new(initial: ConsoleState) -> Self {
        let (sender, _) = watch::channel(Arc::new(initial));
        Self {
            sender: Arc::new(sender),
        }
    }

    pub fn snapshot(&self) -> Arc<ConsoleState> {
        self.sender.borrow().clone()
    }

    pub fn dispatch(&self, action: Action) {
        self.sender.send_modify(|current| {
            *current = Arc::new(reduce(current, action));
        });
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<ConsoleState>> {
        self.sender.subscribe()
    }

    /// Watch one derived value, waking only when it changes.
    pub fn select<R, F>(&self, select: F) -> Selector<R, F>
    where
        R: PartialEq + Clone,
        F: Fn(&ConsoleState) -> R,
    {
        let receiver = self.subscribe();
        let last = select(&receiver.borrow());
        Selector {
            receiver,
            select,
            last,
        }
    }
}

pub struct Selector<R, F> {
    receiver: watch::Receiver<Arc<ConsoleState>>,
    select: F,
    last: R,
}

impl<R, F> Selector<R, F>
where
    R: PartialEq + Clone,
    F: Fn(&ConsoleState) -> R,
{
    pub fn current(&self) -> &R {
        &self.last
    }

    /// Wait for the selected value to change. `None` once the store is gone.
    pub async fn changed(&mut self) -> Option<R> {
        loop {
            self.receiver.changed().await.ok()?;
            let next = (self.select)(&self.receiver.borrow_and_update());
            if next != self.last {
                self.last = next.clone();
                return Some(next);
            }
        }
    }
}
