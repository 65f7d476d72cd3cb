//! Integration tests for Layer 1: World
//!
//! Tests for room topology, entity placement, and conversations.

mod conversations;
