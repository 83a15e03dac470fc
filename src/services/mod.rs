//! External service interactions
//!
//! - Reading the author collection from its static JSON resource
//! - Running that read on a background thread

pub mod loader;
pub mod source;

pub use loader::Loader;
pub use source::{DataSource, FetchError, JsonFileSource};
