//! Integration tests for Layer 2: Engine
//!
//! Tests for pathfinding, NPC movement, and use-action resolution.

mod actions;
mod paths;
