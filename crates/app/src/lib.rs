// crates/app/src/lib.rs
//! Services behind the proman user interface: the project and editor
//! catalogs and the state that owns them.

pub mod catalog;
pub mod error;
pub mod state;

pub use catalog::{EditorCatalog, ProjectCatalog};
pub use error::{AppError, AppResult};
pub use state::AppState;
