//! Row models and response shapes.
//!
//! Each submodule contains a `FromRow` + `Serialize` entity struct matching
//! the database row, plus any aggregate shapes built from it.

pub mod annotation;
