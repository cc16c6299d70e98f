// crates/core/src/lib.rs
pub mod config;
pub mod discovery;
pub mod error;
pub mod paths;
pub mod repo_url;
pub mod resolve;
pub mod vcs;

pub use config::*;
pub use discovery::*;
pub use error::*;
pub use repo_url::*;
pub use resolve::*;
pub use vcs::*;
