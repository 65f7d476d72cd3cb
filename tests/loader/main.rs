//! Integration tests for Layer 2: Loader
//!
//! Tests for manifest inclusion and full world loading from disk.

mod worlds;
