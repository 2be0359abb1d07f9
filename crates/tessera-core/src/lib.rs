//! Tessera Core
//!
//! Shared building blocks for the Tessera crates: logging setup, profiling
//! scopes, math re-exports and the generational arena used to store entities
//! and drawables.

pub mod alloc;
pub mod logging;
pub mod math;
pub mod profiling;
