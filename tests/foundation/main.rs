//! Integration tests for Layer 0: Foundation
//!
//! Tests for names, tags, with-terms, and error diagnostics.

mod errors;
mod names;
