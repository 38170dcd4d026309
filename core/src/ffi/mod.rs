//! FFI boundary (Python bindings)
//!
//! Minimal and safe: one wrapper class over the in-memory portal plus the
//! dict conversion helpers. All domain logic stays on the Rust side.

pub mod portal;
pub mod types;
