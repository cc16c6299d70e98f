// crates/types/src/lib.rs
//! Catalog record types shared by the store, the sync engine and the
//! presentation layer.

pub mod editor;
pub mod project;

pub use editor::*;
pub use project::*;
