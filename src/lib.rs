//! Document question answering over an in-memory vector index.
//!
//! Uploaded text is split into fixed-size chunks, embedded and indexed; questions
//! are answered by an LLM grounded on the nearest chunks.

pub mod api;
pub mod application;
pub mod domain;
pub mod infrastructure;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;
