//! The two release-engineering flows
//!
//! - [`bump_versions`]: align the chart with the latest supported upstream release
//! - [`sync_crds`]: refresh bundled CRDs from the declared upstream release

pub mod bump_versions;
pub mod sync_crds;
