//! Core XML parsing primitives
//!
//! This module contains the single-pass parser:
//! - Scanner: SIMD-accelerated delimiter search and in-place termination
//! - Parser: position machine that builds the arena tree

pub mod parser;
pub mod scanner;

pub use parser::{parse, parse_read_only};
