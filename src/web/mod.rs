//! HTTP interface for the exploration engine.

mod server;

pub use server::*;
