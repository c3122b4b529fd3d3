//! # kindred-shared
//!
//! Domain types and pure logic shared by every Kindred crate: user and
//! interest models, the compatibility scorer, and the constants that govern
//! recommendation rotation and search debouncing.

pub mod compat;
pub mod constants;
pub mod types;

pub use types::*;
