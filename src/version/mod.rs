//! Version resolution and arithmetic
//!
//! - [`catalog`]: remote release catalog fetch and latest-supported selection
//! - [`semver`]: next-minor arithmetic and lenient parsing for comparison
//! - [`error`]: error types for catalog and version operations

pub mod catalog;
pub mod error;
pub mod semver;
