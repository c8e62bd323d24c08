//! Core types and traits for the shortloop URL shortener.
//!
//! This crate provides the error taxonomy and the two capability traits
//! shared by the storage backends, the shortening engine and the
//! protocol front-ends.

pub mod error;
pub mod repository;
pub mod shortener;

pub use error::{GenerateError, ShortenError, StorageError};
pub use repository::Repository;
pub use shortener::Shortener;
