//! Domain types for the annotation store.
//!
//! Nothing in this crate performs I/O. The persistence and HTTP crates build
//! on the types and the merge rules defined here.

pub mod annotation;
pub mod error;
pub mod types;
