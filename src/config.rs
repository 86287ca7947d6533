//! Run context and release-engineering constants
//!
//! Everything a flow needs is carried explicitly: the shared HTTP client with
//! its process-wide timeout, the document paths under the chart root, and the
//! upstream endpoints. No ambient global state.

use anyhow::Context;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Timeout applied to every outbound HTTP request.
pub const HTTP_TIMEOUT: Duration = Duration::from_secs(120);

/// Catalog of published Contour releases.
pub const DEFAULT_VERSIONS_URL: &str =
    "https://raw.githubusercontent.com/projectcontour/contour/refs/heads/main/versions.yaml";

/// Source tarball URL template; `{version}` is replaced with the release version.
pub const DEFAULT_SOURCE_URL: &str =
    "https://github.com/projectcontour/contour/archive/refs/tags/v{version}.tar.gz";

/// Archive member carrying the Contour CRDs, relative to the versioned root.
pub const CONTOUR_CRD_MEMBER: &str = "examples/contour/01-crds.yaml";

/// Archive member carrying the Gateway API CRDs, relative to the versioned root.
pub const GATEWAY_CRD_MEMBER: &str = "examples/gateway/00-crds.yaml";

pub const CONTOUR_CRD_GUARD: &str = ".Values.contour.manageCRDs";
pub const GATEWAY_CRD_GUARD: &str = ".Values.gatewayAPI.manageCRDs";

/// Explicit context passed to both flows.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub client: reqwest::Client,
    pub chart_path: PathBuf,
    pub values_path: PathBuf,
    pub crds_dir: PathBuf,
    pub versions_url: String,
    pub source_url: String,
}

impl RunContext {
    pub fn new(
        chart_dir: &Path,
        versions_url: String,
        source_url: String,
    ) -> anyhow::Result<Self> {
        if !source_url.contains("{version}") {
            anyhow::bail!(
                "source URL template {source_url:?} is missing the {{version}} placeholder"
            );
        }

        let client = reqwest::Client::builder()
            .user_agent("chart-sync")
            .timeout(HTTP_TIMEOUT)
            .build()
            .context("failed to create HTTP client")?;

        Ok(Self {
            client,
            chart_path: chart_dir.join("Chart.yaml"),
            values_path: chart_dir.join("values.yaml"),
            crds_dir: chart_dir.join("templates").join("crds"),
            versions_url,
            source_url,
        })
    }

    /// Expands the source tarball URL for a concrete release version.
    pub fn source_url_for(&self, version: &str) -> String {
        self.source_url.replace("{version}", version)
    }
}
