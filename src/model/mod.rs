//! Model layer - table data and state machines
//!
//! - `DataStore` - the in-memory author collection
//! - `DataSourceView` - filtered, sorted, paginated page of the collection
//! - `TableView` - ties store, view and filter input together
//! - `AuthorForm` / `DeleteConfirm` - dialog state machines
//! - `ModalStack` - modal overlay management

pub mod debounce;
pub mod dialog;
pub mod modal;
pub mod record;
pub mod store;
pub mod table;
pub mod ui;
pub mod view;

pub use dialog::{AuthorForm, DeleteConfirm, FormField, FormMode};
pub use record::{Record, SortKey, SortState};
pub use table::TableView;
pub use view::DataSourceView;
