//! Action enum - All possible application actions
//!
//! Components emit Actions in response to events, and the App processes
//! them to update state.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    // ─────────────────────────────────────────────────────────────────────────
    // App Lifecycle
    // ─────────────────────────────────────────────────────────────────────────
    /// Regular tick for loader polling and filter debounce
    Tick,
    /// Terminal was resized
    Resize(u16, u16),
    /// Quit without confirmation
    ForceQuit,
    /// Fetch the collection again
    Reload,

    // ─────────────────────────────────────────────────────────────────────────
    // Row selection
    // ─────────────────────────────────────────────────────────────────────────
    NextRow,
    PrevRow,

    // ─────────────────────────────────────────────────────────────────────────
    // Pagination
    // ─────────────────────────────────────────────────────────────────────────
    NextPage,
    PrevPage,
    FirstPage,
    LastPage,
    /// Step to the next (true) or previous (false) page size option
    CyclePageSize(bool),

    // ─────────────────────────────────────────────────────────────────────────
    // Sort
    // ─────────────────────────────────────────────────────────────────────────
    CycleSortKey,
    CycleSortDirection,

    // ─────────────────────────────────────────────────────────────────────────
    // Filter
    // ─────────────────────────────────────────────────────────────────────────
    EnterFilterMode,
    ExitFilterMode,
    FilterInput(char),
    FilterBackspace,
    ClearFilter,

    // ─────────────────────────────────────────────────────────────────────────
    // Modals
    // ─────────────────────────────────────────────────────────────────────────
    OpenQuitDialog,
    OpenHelp,
    OpenAddDialog,
    OpenEditDialog,
    OpenDeleteDialog,
    /// Close the top modal without a result
    CloseModal,
    /// Confirm the top modal
    ConfirmModal,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Resize(w, h) => write!(f, "Resize({}, {})", w, h),
            Action::CyclePageSize(forward) => write!(f, "CyclePageSize({})", forward),
            Action::FilterInput(c) => write!(f, "FilterInput('{}')", c),
            other => write!(f, "{:?}", other),
        }
    }
}
