//! Step definitions for dependency resolution scenarios.

pub mod given;
pub mod then;
pub mod when;
pub mod world;
