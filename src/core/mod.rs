//! Core HTML parsing primitives
//!
//! This module contains the fundamental building blocks for reading markup:
//! - Scanner: SIMD-accelerated delimiter detection using memchr
//! - Tokenizer: lenient state machine for HTML token extraction
//! - Entities: HTML entity decoding with Cow (zero-copy when possible)
//! - Attributes: start-tag attribute parsing (quoted, unquoted, boolean)

pub mod attributes;
pub mod entities;
pub mod scanner;
pub mod tokenizer;
