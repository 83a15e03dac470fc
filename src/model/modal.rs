//! Modal stack for managing overlays
//!
//! Only the top modal receives input; modals are drawn bottom to top.

/// A modal overlay displayed on top of the author table
#[derive(Debug, Clone, PartialEq)]
pub enum Modal {
    /// Quit confirmation dialog
    QuitConfirm,
    /// New author form
    AddAuthor,
    /// Edit form for the author with this id
    EditAuthor { id: i64 },
    /// Delete confirmation for the author with this id
    DeleteAuthor { id: i64 },
    /// Keyboard shortcut overview
    Help,
}

/// A stack of modal overlays
#[derive(Debug, Default)]
pub struct ModalStack {
    stack: Vec<Modal>,
}

impl ModalStack {
    pub fn new() -> Self {
        Self { stack: Vec::new() }
    }

    pub fn push(&mut self, modal: Modal) {
        self.stack.push(modal);
    }

    pub fn pop(&mut self) -> Option<Modal> {
        self.stack.pop()
    }

    pub fn top(&self) -> Option<&Modal> {
        self.stack.last()
    }
}
