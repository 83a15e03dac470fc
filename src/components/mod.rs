//! UI Components
//!
//! Each component encapsulates its own state, event handling, and rendering logic.
//! Components communicate through Actions rather than direct state mutation.

pub mod author_dialog;
pub mod delete_dialog;
pub mod help_dialog;
pub mod home;
pub mod layout;
pub mod quit_dialog;
pub mod table;

pub use author_dialog::AuthorDialog;
pub use delete_dialog::DeleteDialog;
pub use help_dialog::HelpDialog;
pub use home::{draw_home_screen, HomeComponent, HomeRenderContext};
pub use layout::{calculate_main_layout, centered_popup};
pub use quit_dialog::QuitDialog;
pub use table::{draw_author_table, draw_paginator};
