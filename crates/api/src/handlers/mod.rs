//! Request handlers.
//!
//! Handlers delegate to the repositories in `annostore_db` and map errors
//! via [`AppError`](crate::error::AppError).

pub mod annotation;
