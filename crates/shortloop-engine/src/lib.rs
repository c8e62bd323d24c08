//! The shortening engine.
//!
//! This crate provides the code generator trait with its random
//! implementation, and [`ShortenerService`], the concrete
//! [`Shortener`](shortloop_core::Shortener) orchestrating a generator and
//! a repository.

pub mod generator;
pub mod service;

pub use generator::{Generator, RandomGenerator};
pub use service::ShortenerService;
