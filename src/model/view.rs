//! Data source view - filter, sort and paginate the author collection
//!
//! The rendered page is recomputed whenever the store data, the sort, the
//! filter, or the page changes. The page itself is a pure function of those
//! inputs, see [`render_page`].

use super::record::{Record, SortState};
use super::store::{DataStore, StoreEvent};
use std::sync::mpsc::Receiver;

pub const DEFAULT_PAGE_SIZE: usize = 10;
pub const DEFAULT_PAGE_SIZE_OPTIONS: [usize; 3] = [5, 10, 20];

/// Page position and size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    pub page_index: usize,
    pub page_size: usize,
}

impl Default for Paginator {
    fn default() -> Self {
        Self {
            page_index: 0,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Paginator {
    pub fn new(page_index: usize, page_size: usize) -> Self {
        Self {
            page_index,
            page_size,
        }
    }

    /// Number of pages needed for `len` items
    pub fn page_count(&self, len: usize) -> usize {
        if self.page_size == 0 {
            return 0;
        }
        len.div_ceil(self.page_size)
    }

    /// Index of the first item on the current page
    pub fn start_index(&self) -> usize {
        self.page_index.saturating_mul(self.page_size)
    }

    /// "1 – 10 of 25" style label
    pub fn range_label(&self, len: usize) -> String {
        if len == 0 || self.page_size == 0 {
            return format!("0 of {}", len);
        }
        let start = self.start_index();
        let end = if start < len {
            (start + self.page_size).min(len)
        } else {
            start + self.page_size
        };
        format!("{} – {} of {}", start + 1, end, len)
    }
}

/// Which input of the view changed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewChange {
    Data,
    Sort,
    Filter,
    Page,
}

/// Result of one recomputation
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Page {
    pub rows: Vec<Record>,
    /// Number of records that passed the filter
    pub filtered_len: usize,
}

// ═══════════════════════════════════════════════════════════════════════════════
// Pipeline
// ═══════════════════════════════════════════════════════════════════════════════

/// Keep records whose concatenated fields contain `filter`, ignoring case
pub fn filter_records(records: &[Record], filter: &str) -> Vec<Record> {
    let needle = filter.to_lowercase();
    records
        .iter()
        .filter(|r| r.search_text().contains(&needle))
        .cloned()
        .collect()
}

/// Stable sort; an inactive sort keeps the input order
pub fn sort_records(mut records: Vec<Record>, sort: &SortState) -> Vec<Record> {
    if sort.is_active() {
        records.sort_by(|a, b| sort.compare(a, b));
    }
    records
}

/// Slice out the current page
pub fn paginate(records: &[Record], paginator: &Paginator) -> Vec<Record> {
    let start = paginator.start_index().min(records.len());
    let end = start.saturating_add(paginator.page_size).min(records.len());
    records[start..end].to_vec()
}

/// filter -> sort -> slice
pub fn render_page(
    records: &[Record],
    filter: &str,
    sort: &SortState,
    paginator: &Paginator,
) -> Page {
    let filtered = filter_records(records, filter);
    let filtered_len = filtered.len();
    let sorted = sort_records(filtered, sort);
    Page {
        rows: paginate(&sorted, paginator),
        filtered_len,
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// View
// ═══════════════════════════════════════════════════════════════════════════════

/// Reactive page view over a [`DataStore`]
#[derive(Debug)]
pub struct DataSourceView {
    filter: String,
    sort: SortState,
    paginator: Paginator,
    page: Page,
    changes: Receiver<StoreEvent>,
    recomputations: u64,
}

impl DataSourceView {
    /// Subscribe to `store` and compute the first page
    pub fn connect(store: &mut DataStore, page_size: usize) -> Self {
        let changes = store.subscribe();
        let mut view = Self {
            filter: String::new(),
            sort: SortState::default(),
            paginator: Paginator::new(0, page_size.max(1)),
            page: Page::default(),
            changes,
            recomputations: 0,
        };
        view.recompute(store, ViewChange::Data);
        view
    }

    pub fn rows(&self) -> &[Record] {
        &self.page.rows
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub fn sort(&self) -> SortState {
        self.sort
    }

    pub fn paginator(&self) -> Paginator {
        self.paginator
    }

    pub fn filtered_len(&self) -> usize {
        self.page.filtered_len
    }

    pub fn page_count(&self) -> usize {
        self.paginator.page_count(self.page.filtered_len)
    }

    pub fn has_next_page(&self) -> bool {
        self.paginator.page_index + 1 < self.page_count()
    }

    pub fn has_previous_page(&self) -> bool {
        self.paginator.page_index > 0
    }

    pub fn range_label(&self) -> String {
        self.paginator.range_label(self.page.filtered_len)
    }

    /// How many times the page has been recomputed
    #[cfg(test)]
    pub fn recomputations(&self) -> u64 {
        self.recomputations
    }

    /// Drain pending store notifications, recomputing if there were any
    ///
    /// Like [`refresh`](Self::refresh), a page that fell off the end moves
    /// to the last page.
    pub fn sync(&mut self, store: &DataStore) -> bool {
        let changed = self.changes.try_iter().count() > 0;
        if changed {
            self.recompute(store, ViewChange::Data);
            self.clamp_page(store);
        }
        changed
    }

    pub fn set_filter(&mut self, filter: &str, store: &DataStore) {
        self.filter = filter.to_string();
        self.recompute(store, ViewChange::Filter);
    }

    pub fn set_sort(&mut self, sort: SortState, store: &DataStore) {
        self.sort = sort;
        self.recompute(store, ViewChange::Sort);
    }

    pub fn set_page(&mut self, page_index: usize, store: &DataStore) {
        self.paginator.page_index = page_index;
        self.recompute(store, ViewChange::Page);
    }

    /// Change the page size and go back to the first page
    pub fn set_page_size(&mut self, page_size: usize, store: &DataStore) {
        self.paginator = Paginator::new(0, page_size.max(1));
        self.recompute(store, ViewChange::Page);
    }

    pub fn next_page(&mut self, store: &DataStore) -> bool {
        if !self.has_next_page() {
            return false;
        }
        self.set_page(self.paginator.page_index + 1, store);
        true
    }

    pub fn previous_page(&mut self, store: &DataStore) -> bool {
        if !self.has_previous_page() {
            return false;
        }
        self.set_page(self.paginator.page_index - 1, store);
        true
    }

    pub fn first_page(&mut self, store: &DataStore) {
        self.set_page(0, store);
    }

    pub fn last_page(&mut self, store: &DataStore) {
        self.set_page(self.page_count().saturating_sub(1), store);
    }

    /// Recompute now, e.g. after the collection was mutated
    ///
    /// If the current page fell off the end it moves to the last page.
    pub fn refresh(&mut self, store: &DataStore) {
        // Pending notifications are covered by this recomputation
        self.changes.try_iter().for_each(drop);
        self.recompute(store, ViewChange::Data);
        self.clamp_page(store);
    }

    fn clamp_page(&mut self, store: &DataStore) {
        let last = self.page_count().saturating_sub(1);
        if self.paginator.page_index > last {
            self.paginator.page_index = last;
            self.recompute(store, ViewChange::Page);
        }
    }

    fn recompute(&mut self, store: &DataStore, change: ViewChange) {
        if change == ViewChange::Filter {
            self.paginator.page_index = 0;
        }
        self.page = render_page(store.data(), &self.filter, &self.sort, &self.paginator);
        self.recomputations += 1;
        tracing::trace!(
            ?change,
            count = self.recomputations,
            rows = self.page.rows.len(),
            filtered = self.page.filtered_len,
            "page recomputed"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::record::{SortDirection, SortKey};

    fn three() -> Vec<Record> {
        vec![
            Record::new(1, "Ann", "Signed", "2018-01-01"),
            Record::new(2, "Bob", "Pending", "2018-02-01"),
            Record::new(3, "Cy", "Signed", "2018-03-01"),
        ]
    }

    fn ids(rows: &[Record]) -> Vec<i64> {
        rows.iter().map(|r| r.id).collect()
    }

    fn store_with(records: Vec<Record>) -> DataStore {
        let mut store = DataStore::new();
        store.set_data(records);
        store
    }

    #[test]
    fn test_no_filter_no_sort_returns_all_in_order() {
        let page = render_page(&three(), "", &SortState::default(), &Paginator::new(0, 10));
        assert_eq!(ids(&page.rows), vec![1, 2, 3]);
        assert_eq!(page.filtered_len, 3);
    }

    #[test]
    fn test_filter_matches_any_field() {
        let page = render_page(&three(), "2", &SortState::default(), &Paginator::new(0, 10));
        // every record has "2018" in its date, so narrow on the id+author join
        assert_eq!(page.filtered_len, 3);

        let page = render_page(&three(), "2bob", &SortState::default(), &Paginator::new(0, 10));
        assert_eq!(ids(&page.rows), vec![2]);

        let page = render_page(&three(), "PENDING", &SortState::default(), &Paginator::new(0, 10));
        assert_eq!(ids(&page.rows), vec![2]);
    }

    #[test]
    fn test_filter_single_digit_scenario() {
        let records = vec![
            Record::new(1, "Ann", "Signed", "Jan"),
            Record::new(2, "Bob", "Pending", "Feb"),
            Record::new(3, "Cy", "Signed", "Mar"),
        ];
        let page = render_page(&records, "2", &SortState::default(), &Paginator::new(0, 10));
        assert_eq!(ids(&page.rows), vec![2]);
    }

    #[test]
    fn test_sort_by_id_descending() {
        let sort = SortState::new(Some(SortKey::Id), SortDirection::Desc);
        let page = render_page(&three(), "", &sort, &Paginator::new(0, 10));
        assert_eq!(ids(&page.rows), vec![3, 2, 1]);
    }

    #[test]
    fn test_sort_ids_numerically() {
        let records = vec![
            Record::new(10, "a", "", ""),
            Record::new(9, "b", "", ""),
            Record::new(100, "c", "", ""),
        ];
        let sort = SortState::new(Some(SortKey::Id), SortDirection::Asc);
        assert_eq!(ids(&sort_records(records, &sort)), vec![9, 10, 100]);
    }

    #[test]
    fn test_sort_is_stable_for_equal_keys() {
        let sort = SortState::new(Some(SortKey::SignatureStatus), SortDirection::Asc);
        let sorted = sort_records(three(), &sort);
        // Pending first, then the two Signed records in original order
        assert_eq!(ids(&sorted), vec![2, 1, 3]);
    }

    #[test]
    fn test_inactive_sort_keeps_order() {
        let sort = SortState::new(Some(SortKey::Author), SortDirection::None);
        assert_eq!(ids(&sort_records(three(), &sort)), vec![1, 2, 3]);
    }

    #[test]
    fn test_paginate_clips_to_len() {
        let records = three();
        assert_eq!(ids(&paginate(&records, &Paginator::new(0, 2))), vec![1, 2]);
        assert_eq!(ids(&paginate(&records, &Paginator::new(1, 2))), vec![3]);
        assert!(paginate(&records, &Paginator::new(5, 2)).is_empty());
        assert!(paginate(&records, &Paginator::new(0, 0)).is_empty());
    }

    #[test]
    fn test_range_label() {
        assert_eq!(Paginator::new(0, 10).range_label(0), "0 of 0");
        assert_eq!(Paginator::new(0, 10).range_label(25), "1 – 10 of 25");
        assert_eq!(Paginator::new(2, 10).range_label(25), "21 – 25 of 25");
    }

    #[test]
    fn test_view_recomputes_on_store_change() {
        let mut store = DataStore::new();
        let mut view = DataSourceView::connect(&mut store, 10);
        assert!(view.rows().is_empty());

        store.set_data(three());
        assert!(view.sync(&store));
        assert_eq!(ids(view.rows()), vec![1, 2, 3]);
        assert!(!view.sync(&store));
    }

    #[test]
    fn test_filter_change_resets_page_index() {
        let mut store = store_with(three());
        let mut view = DataSourceView::connect(&mut store, 2);

        assert!(view.next_page(&store));
        assert_eq!(view.paginator().page_index, 1);
        assert_eq!(ids(view.rows()), vec![3]);

        view.set_filter("signed", &store);
        assert_eq!(view.paginator().page_index, 0);
        assert_eq!(ids(view.rows()), vec![1, 3]);
    }

    #[test]
    fn test_page_navigation_bounds() {
        let mut store = store_with(three());
        let mut view = DataSourceView::connect(&mut store, 2);

        assert!(!view.previous_page(&store));
        assert!(view.has_next_page());
        view.last_page(&store);
        assert_eq!(view.paginator().page_index, 1);
        assert!(!view.next_page(&store));
        view.first_page(&store);
        assert_eq!(ids(view.rows()), vec![1, 2]);
    }

    #[test]
    fn test_set_page_size_returns_to_first_page() {
        let mut store = store_with(three());
        let mut view = DataSourceView::connect(&mut store, 1);
        view.last_page(&store);
        assert_eq!(ids(view.rows()), vec![3]);

        view.set_page_size(5, &store);
        assert_eq!(view.paginator(), Paginator::new(0, 5));
        assert_eq!(view.page_count(), 1);
    }

    #[test]
    fn test_refresh_clamps_page_after_removal() {
        let mut store = store_with(three());
        let mut view = DataSourceView::connect(&mut store, 2);
        view.last_page(&store);

        store.remove_at(2);
        view.refresh(&store);

        assert_eq!(view.paginator().page_index, 0);
        assert_eq!(ids(view.rows()), vec![1, 2]);
    }

    #[test]
    fn test_recompute_is_idempotent() {
        let mut store = store_with(three());
        let mut view = DataSourceView::connect(&mut store, 2);
        view.set_sort(SortState::new(Some(SortKey::Author), SortDirection::Desc), &store);

        let before = view.rows().to_vec();
        let count = view.recomputations();
        view.refresh(&store);
        assert_eq!(view.rows(), before.as_slice());
        assert_eq!(view.recomputations(), count + 1);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;
        use std::collections::HashMap;

        fn arb_records() -> impl Strategy<Value = Vec<Record>> {
            prop::collection::vec(
                ("[a-cA-C0-9 ]{0,4}", "[a-c0-9]{0,3}", "[0-9]{0,3}"),
                0..30,
            )
            .prop_map(|fields| {
                fields
                    .into_iter()
                    .enumerate()
                    .map(|(i, (author, status, date))| Record::new(i as i64, author, status, date))
                    .collect()
            })
        }

        fn arb_key() -> impl Strategy<Value = SortKey> {
            prop::sample::select(SortKey::all().to_vec())
        }

        fn positions(rows: &[Record]) -> HashMap<i64, usize> {
            rows.iter().enumerate().map(|(i, r)| (r.id, i)).collect()
        }

        proptest! {
            #[test]
            fn filter_is_matching_subsequence(records in arb_records(), filter in "[a-cA-C0-9]{0,2}") {
                let filtered = filter_records(&records, &filter);
                let expected: Vec<Record> = records
                    .iter()
                    .filter(|r| r.search_text().contains(&filter.to_lowercase()))
                    .cloned()
                    .collect();
                prop_assert_eq!(filtered, expected);
            }

            #[test]
            fn reversing_direction_reverses_distinct_pairs(records in arb_records(), key in arb_key()) {
                let asc = sort_records(records.clone(), &SortState::new(Some(key), SortDirection::Asc));
                let desc = sort_records(records.clone(), &SortState::new(Some(key), SortDirection::Desc));
                let pos_asc = positions(&asc);
                let pos_desc = positions(&desc);

                for a in &records {
                    for b in &records {
                        if compare_values_for(key, a, b) == std::cmp::Ordering::Less {
                            prop_assert!(pos_asc[&a.id] < pos_asc[&b.id]);
                            prop_assert!(pos_desc[&a.id] > pos_desc[&b.id]);
                        }
                    }
                }
            }

            #[test]
            fn pages_concatenate_to_full_sequence(
                records in arb_records(),
                key in arb_key(),
                page_size in 1usize..7,
            ) {
                let sort = SortState::new(Some(key), SortDirection::Asc);
                let full = sort_records(records.clone(), &sort);
                let pages = Paginator::new(0, page_size).page_count(full.len());

                let mut joined = Vec::new();
                for index in 0..pages {
                    let page = render_page(&records, "", &sort, &Paginator::new(index, page_size));
                    prop_assert!(page.rows.len() <= page_size);
                    joined.extend(page.rows);
                }
                prop_assert_eq!(joined, full);
            }

            #[test]
            fn render_is_idempotent(records in arb_records(), filter in "[a-c0-9]{0,1}", key in arb_key()) {
                let sort = SortState::new(Some(key), SortDirection::Desc);
                let paginator = Paginator::new(0, 5);
                prop_assert_eq!(
                    render_page(&records, &filter, &sort, &paginator),
                    render_page(&records, &filter, &sort, &paginator)
                );
            }
        }

        fn compare_values_for(key: SortKey, a: &Record, b: &Record) -> std::cmp::Ordering {
            crate::model::record::compare_values(&key.value(a), &key.value(b))
        }
    }
}
