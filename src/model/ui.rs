//! UI state - presentation state separate from the table data

/// What keystrokes on the main screen are routed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    /// Typing into the filter box
    Filter,
}
