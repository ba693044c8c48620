//! List screen view-model and the search-box debouncer.

use std::time::Duration;

use eduhub_core::listing::{ListQuery, Listable, Page, SortDirection, SortField};
use eduhub_core::status::ApprovalStatus;
use tokio::sync::mpsc;
use tokio::time::Instant;

/// Forward only the last value of each burst of search input, once `delay`
/// has passed without a newer value.
///
/// The returned receiver closes after the input closes and any pending value
/// has been flushed.
pub fn spawn_debounced(
    delay: Duration,
    mut input: mpsc::Receiver<String>,
) -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel(16);
    tokio::spawn(async move {
        let mut pending: Option<(String, Instant)> = None;
        loop {
            let deadline = pending.as_ref().map(|(_, at)| *at);
            tokio::select! {
                next = input.recv() => match next {
                    Some(value) => pending = Some((value, Instant::now() + delay)),
                    None => break,
                },
                _ = sleep_until(deadline), if deadline.is_some() => {
                    if let Some((value, _)) = pending.take() {
                        if tx.send(value).await.is_err() {
                            return;
                        }
                    }
                }
            }
        }
        if let Some((value, _)) = pending {
            let _ = tx.send(value).await;
        }
    });
    rx
}

async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(at) => tokio::time::sleep_until(at).await,
        None => std::future::pending().await,
    }
}

/// Filter, sort and page state of one table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListScreen {
    query: ListQuery,
}

impl ListScreen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(&self) -> &ListQuery {
        &self.query
    }

    /// Changing any filter returns to the first page.
    pub fn set_search(&mut self, search: impl Into<String>) {
        self.query.search = search.into();
        self.query.page = 1;
    }

    pub fn set_status(&mut self, status: Option<ApprovalStatus>) {
        self.query.status = status;
        self.query.page = 1;
    }

    /// Sorting by the current column again flips the direction.
    pub fn sort_by(&mut self, field: SortField) {
        if self.query.sort == field {
            self.query.direction = match self.query.direction {
                SortDirection::Asc => SortDirection::Desc,
                SortDirection::Desc => SortDirection::Asc,
            };
        } else {
            self.query.sort = field;
            self.query.direction = SortDirection::Asc;
        }
    }

    pub fn set_page(&mut self, page: usize) {
        self.query.page = page.max(1);
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        self.query.page_size = page_size.max(1);
        self.query.page = 1;
    }

    pub fn view<'a, T: Listable>(&self, items: &'a [T]) -> Page<'a, T> {
        self.query.apply(items)
    }
}
