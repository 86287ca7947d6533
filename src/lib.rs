//! Release automation for the Contour Helm chart
//!
//! Two single-shot flows keep the chart aligned with upstream releases:
//! bumping the chart's declared versions when a newer supported release is
//! published, and regenerating the bundled CRD templates from the release's
//! source tarball.

pub mod archive;
pub mod chart;
pub mod commands;
pub mod config;
pub mod document;
pub mod version;
