//! Table view - orchestrates the store, the page view and the filter input
//!
//! Confirmed dialogs are applied to the collection here, followed by a
//! direct refresh of the page view.

use super::debounce::Debouncer;
use super::dialog::CONFIRMED;
use super::record::{Record, SortDirection, SortKey, SortState};
use super::store::DataStore;
use super::view::{DataSourceView, DEFAULT_PAGE_SIZE_OPTIONS};
use crate::services::{DataSource, FetchError};
use chrono::{DateTime, Local};
use std::time::{Duration, Instant};

pub struct TableView {
    store: DataStore,
    view: DataSourceView,
    debouncer: Debouncer,
    page_size_options: Vec<usize>,

    /// Last fetch error, shown in the status bar
    pub last_error: Option<String>,

    /// When the collection was last loaded
    pub loaded_at: Option<DateTime<Local>>,
}

impl Default for TableView {
    fn default() -> Self {
        Self::new(
            DEFAULT_PAGE_SIZE_OPTIONS[1],
            DEFAULT_PAGE_SIZE_OPTIONS.to_vec(),
            super::debounce::DEFAULT_FILTER_DEBOUNCE,
        )
    }
}

impl TableView {
    pub fn new(page_size: usize, page_size_options: Vec<usize>, debounce: Duration) -> Self {
        let mut store = DataStore::new();
        let view = DataSourceView::connect(&mut store, page_size);
        Self {
            store,
            view,
            debouncer: Debouncer::new(debounce),
            page_size_options,
            last_error: None,
            loaded_at: None,
        }
    }

    pub fn store(&self) -> &DataStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut DataStore {
        &mut self.store
    }

    pub fn view(&self) -> &DataSourceView {
        &self.view
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Loading
    // ─────────────────────────────────────────────────────────────────────────

    /// Fetch synchronously from `source`
    pub fn init(&mut self, source: &dyn DataSource) {
        let error = self.store.fetch_all(source);
        self.record_fetch(error);
    }

    /// Publish a fetch result; failures are swallowed after logging
    pub fn apply_fetch(&mut self, result: Result<Vec<Record>, FetchError>) {
        let error = self.store.apply_fetch(result);
        self.record_fetch(error);
    }

    fn record_fetch(&mut self, error: Option<FetchError>) {
        match error {
            None => {
                if self.store.is_empty() {
                    tracing::warn!("author collection is empty");
                }
                self.last_error = None;
                self.loaded_at = Some(Local::now());
            }
            Some(err) => self.last_error = Some(err.to_string()),
        }
        self.view.sync(&self.store);
    }

    /// Refresh the page after a confirmed dialog changed the collection
    fn after_mutation(&mut self) {
        tracing::debug!(version = self.store.version(), len = self.store.len(), "collection changed");
        self.view.refresh(&self.store);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Dialog results
    // ─────────────────────────────────────────────────────────────────────────

    /// Append the staged record after a confirmed add
    pub fn on_add_closed(&mut self, result: Option<u8>) -> bool {
        if result != Some(CONFIRMED) {
            return false;
        }
        let Some(record) = self.store.dialog_data().cloned() else {
            return false;
        };
        self.store.append(record);
        self.after_mutation();
        true
    }

    /// Replace the record with `id` by the staged one after a confirmed edit
    pub fn on_edit_closed(&mut self, id: i64, result: Option<u8>) -> bool {
        if result != Some(CONFIRMED) {
            return false;
        }
        let (Some(index), Some(record)) =
            (self.store.position_of(id), self.store.dialog_data().cloned())
        else {
            tracing::warn!(id, "edited author not found");
            return false;
        };
        self.store.replace_at(index, record);
        self.after_mutation();
        true
    }

    /// Remove the record with `id` after a confirmed delete
    pub fn on_delete_closed(&mut self, id: i64, result: Option<u8>) -> bool {
        if result != Some(CONFIRMED) {
            return false;
        }
        let Some(index) = self.store.position_of(id) else {
            tracing::warn!(id, "deleted author not found");
            return false;
        };
        self.store.remove_at(index);
        self.after_mutation();
        true
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Filter
    // ─────────────────────────────────────────────────────────────────────────

    /// Feed the current filter text; applied once it settles
    pub fn filter_input(&mut self, text: &str, now: Instant) {
        self.debouncer.input(text, now);
    }

    /// Filter text typed but not applied yet
    pub fn filter_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// Apply a settled filter and pick up store changes.
    /// Returns true if the page was recomputed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let mut changed = self.view.sync(&self.store);
        if let Some(filter) = self.debouncer.poll(now) {
            tracing::debug!(filter = %filter, "filter applied");
            self.view.set_filter(&filter, &self.store);
            changed = true;
        }
        changed
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Sort & pagination
    // ─────────────────────────────────────────────────────────────────────────

    pub fn set_sort(&mut self, sort: SortState) {
        self.view.set_sort(sort, &self.store);
    }

    /// Move the sort to the next column, ascending; past the last column
    /// sorting is switched off
    pub fn cycle_sort_key(&mut self) {
        let active = SortKey::next(self.view.sort().active);
        let direction = if active.is_some() {
            SortDirection::Asc
        } else {
            SortDirection::None
        };
        self.set_sort(SortState::new(active, direction));
    }

    pub fn cycle_sort_direction(&mut self) {
        let sort = self.view.sort();
        let active = sort.active.or(Some(SortKey::Id));
        self.set_sort(SortState::new(active, sort.direction.cycle()));
    }

    pub fn next_page(&mut self) -> bool {
        self.view.next_page(&self.store)
    }

    pub fn previous_page(&mut self) -> bool {
        self.view.previous_page(&self.store)
    }

    pub fn first_page(&mut self) {
        self.view.first_page(&self.store);
    }

    pub fn last_page(&mut self) {
        self.view.last_page(&self.store);
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        self.view.set_page_size(page_size, &self.store);
    }

    /// Step through the configured page sizes
    pub fn cycle_page_size(&mut self, forward: bool) {
        if self.page_size_options.is_empty() {
            return;
        }
        let current = self.view.paginator().page_size;
        let len = self.page_size_options.len();
        let idx = self
            .page_size_options
            .iter()
            .position(|s| *s == current)
            .unwrap_or(0);
        let next = if forward {
            (idx + 1) % len
        } else {
            (idx + len - 1) % len
        };
        self.set_page_size(self.page_size_options[next]);
    }
}
