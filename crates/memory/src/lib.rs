//! Conversation memory implementations for the SAIA chain.
//!
//! The host normally supplies its own memory; these cover the CLI host and
//! tests.

pub mod buffer;
pub mod noop;

pub use buffer::BufferMemory;
pub use noop::NoopMemory;
