//! The shortloop server binary crate.
//!
//! Wires the shortening engine to its two protocol front-ends (HTTP/JSON
//! and gRPC) and owns the serving lifecycle that starts and stops both
//! listeners as one unit.

pub mod cli;
pub mod grpc;
pub mod http;
pub mod lifecycle;
mod validate;
