//! In-memory filtering, sorting and pagination for list screens.
//!
//! Collections are fetched whole from the backend, so every table view
//! applies a [`ListQuery`] locally.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::models::{Certification, Course, Degree, Institution, Lecturer, Partner, UpdateRequest};
use crate::review::Reviewable;
use crate::status::ApprovalStatus;
use crate::types::Timestamp;

pub const DEFAULT_PAGE_SIZE: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    Name,
    #[default]
    CreatedAt,
    UpdatedAt,
    Status,
    Price,
    StartDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

/// A comparable sort value. Missing values always sort last.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum SortValue {
    Int(i64),
    Text(String),
    Date(chrono::NaiveDate),
    Time(Timestamp),
    Missing,
}

/// What a list screen needs from a row type.
pub trait Listable {
    /// Text matched by the search box.
    fn search_text(&self) -> String;
    /// Review status, for kinds that have one.
    fn list_status(&self) -> Option<ApprovalStatus> {
        None
    }
    fn sort_value(&self, field: SortField) -> SortValue;
}

fn time(t: Option<Timestamp>) -> SortValue {
    t.map(SortValue::Time).unwrap_or(SortValue::Missing)
}

fn reviewable_text<T: Reviewable>(item: &T) -> String {
    item.fields()
        .into_iter()
        .filter_map(|f| f.value)
        .collect::<Vec<_>>()
        .join(" ")
}

fn reviewable_sort<T: Reviewable>(
    item: &T,
    field: SortField,
    created: Option<Timestamp>,
    updated: Option<Timestamp>,
) -> SortValue {
    match field {
        SortField::Name => SortValue::Text(item.display_name().to_lowercase()),
        SortField::CreatedAt => time(created),
        SortField::UpdatedAt => time(updated),
        SortField::Status => SortValue::Text(item.status().as_str().to_string()),
        SortField::Price | SortField::StartDate => SortValue::Missing,
    }
}

macro_rules! listable_reviewable {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Listable for $ty {
                fn search_text(&self) -> String {
                    reviewable_text(self)
                }

                fn list_status(&self) -> Option<ApprovalStatus> {
                    Some(self.status)
                }

                fn sort_value(&self, field: SortField) -> SortValue {
                    reviewable_sort(self, field, self.created_at, self.updated_at)
                }
            }
        )*
    };
}

listable_reviewable!(Partner, Institution, Lecturer, Degree, Certification);

impl Listable for Course {
    fn search_text(&self) -> String {
        [Some(self.title.as_str()), self.description.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn sort_value(&self, field: SortField) -> SortValue {
        match field {
            SortField::Name => SortValue::Text(self.title.to_lowercase()),
            SortField::CreatedAt => time(self.created_at),
            SortField::UpdatedAt => time(self.updated_at),
            SortField::Status => SortValue::Int(i64::from(self.is_published)),
            // Cents keep the ordering total.
            SortField::Price => SortValue::Int((self.price * 100.0).round() as i64),
            SortField::StartDate => self
                .start_date
                .map(SortValue::Date)
                .unwrap_or(SortValue::Missing),
        }
    }
}

impl<T: Listable> Listable for UpdateRequest<T> {
    fn search_text(&self) -> String {
        format!("{} {}", self.requested.search_text(), self.current.search_text())
    }

    fn list_status(&self) -> Option<ApprovalStatus> {
        Some(self.status)
    }

    fn sort_value(&self, field: SortField) -> SortValue {
        match field {
            SortField::CreatedAt => time(self.created_at),
            other => self.requested.sort_value(other),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListQuery {
    pub search: String,
    pub status: Option<ApprovalStatus>,
    pub sort: SortField,
    pub direction: SortDirection,
    /// 1-based.
    pub page: usize,
    pub page_size: usize,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            search: String::new(),
            status: None,
            sort: SortField::default(),
            direction: SortDirection::default(),
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// One page of a filtered and sorted collection.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<'a, T> {
    pub items: Vec<&'a T>,
    /// Number of rows matching the filter, across all pages.
    pub total: usize,
    pub page: usize,
    pub page_count: usize,
}

impl ListQuery {
    pub fn matches<T: Listable>(&self, item: &T) -> bool {
        if let Some(status) = self.status {
            if item.list_status() != Some(status) {
                return false;
            }
        }
        let needle = self.search.trim().to_lowercase();
        needle.is_empty() || item.search_text().to_lowercase().contains(&needle)
    }

    fn compare<T: Listable>(&self, a: &T, b: &T) -> Ordering {
        let (va, vb) = (a.sort_value(self.sort), b.sort_value(self.sort));
        match (&va, &vb) {
            (SortValue::Missing, SortValue::Missing) => Ordering::Equal,
            (SortValue::Missing, _) => Ordering::Greater,
            (_, SortValue::Missing) => Ordering::Less,
            _ => match self.direction {
                SortDirection::Asc => va.cmp(&vb),
                SortDirection::Desc => vb.cmp(&va),
            },
        }
    }

    /// Filter, stable-sort and slice `items`. Out-of-range pages clamp to the
    /// last page.
    pub fn apply<'a, T: Listable>(&self, items: &'a [T]) -> Page<'a, T> {
        let mut rows: Vec<&T> = items.iter().filter(|i| self.matches(*i)).collect();
        rows.sort_by(|a, b| self.compare(*a, *b));

        let total = rows.len();
        let size = self.page_size.max(1);
        let page_count = total.div_ceil(size).max(1);
        let page = self.page.clamp(1, page_count);
        let items = rows.into_iter().skip((page - 1) * size).take(size).collect();

        Page {
            items,
            total,
            page,
            page_count,
        }
    }
}
