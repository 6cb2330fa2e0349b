//! Application services: backend port, cached reads, prefetch and the note form.

pub mod error;
pub mod form;
pub mod notes_api;
pub mod prefetch;
pub mod query;

#[cfg(test)]
pub(crate) mod fake_api;
