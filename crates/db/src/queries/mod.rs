// crates/db/src/queries/mod.rs
// Typed record access for each bucket.

mod editors;
mod projects;
