//! HTML Reader Module
//!
//! Pull-style event layer between the tokenizer and the tree builder:
//! - SliceReader: zero-copy reader over a byte slice
//! - Events: HTML event types for pull parsing

pub mod events;
pub mod slice;
