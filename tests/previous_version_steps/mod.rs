//! Step definitions for previous-release comparison scenarios.

mod given;
mod then;
mod when;
pub mod world;
