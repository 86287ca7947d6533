//! Upstream release catalog resolution
//!
//! Fetches the published `versions.yaml` catalog and selects the latest
//! supported release together with its paired Envoy version.

use crate::version::error::CatalogError;
use crate::version::semver::parse_lenient;
use semver::Version;
use serde::Deserialize;
use tracing::warn;

/// Catalog entry designating the in-development branch, never selectable.
const SENTINEL_VERSION: &str = "main";

#[derive(Debug, Deserialize)]
struct Catalog {
    versions: Vec<VersionEntry>,
}

#[derive(Debug, Deserialize)]
struct VersionEntry {
    version: String,
    #[serde(default)]
    supported: Supported,
    #[serde(default)]
    dependencies: Dependencies,
}

#[derive(Debug, Default, Deserialize)]
struct Dependencies {
    #[serde(default)]
    envoy: String,
}

/// The catalog publishes `supported` as the string "true"; accept a plain
/// YAML bool as well.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Supported {
    Flag(bool),
    Text(String),
}

impl Default for Supported {
    fn default() -> Self {
        Supported::Flag(false)
    }
}

impl Supported {
    fn is_true(&self) -> bool {
        match self {
            Supported::Flag(flag) => *flag,
            Supported::Text(text) => text == "true",
        }
    }
}

/// The newest supported upstream release, with any leading `v` stripped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupportedRelease {
    pub version: String,
    pub envoy_version: String,
}

/// Resolves the latest supported release from the remote catalog.
///
/// Skips the in-development sentinel entry and anything not marked supported,
/// then takes the maximum of the remaining versions rather than trusting the
/// catalog's newest-first ordering.
pub async fn latest_supported(
    client: &reqwest::Client,
    url: &str,
) -> Result<SupportedRelease, CatalogError> {
    let response = client.get(url).send().await?;

    let status = response.status();
    if !status.is_success() {
        return Err(CatalogError::Status {
            url: url.to_string(),
            status,
        });
    }

    let body = response.text().await?;
    let catalog: Catalog = serde_yaml_ng::from_str(&body)?;

    select_latest(catalog)
}

fn select_latest(catalog: Catalog) -> Result<SupportedRelease, CatalogError> {
    let mut best: Option<(Version, SupportedRelease)> = None;

    for entry in catalog.versions {
        if entry.version == SENTINEL_VERSION || !entry.supported.is_true() {
            continue;
        }

        let bare = entry.version.strip_prefix('v').unwrap_or(&entry.version);
        let Some(parsed) = parse_lenient(bare) else {
            warn!("Skipping supported entry with unparseable version {:?}", entry.version);
            continue;
        };

        if best.as_ref().is_none_or(|(current, _)| parsed > *current) {
            best = Some((
                parsed,
                SupportedRelease {
                    version: bare.to_string(),
                    envoy_version: entry.dependencies.envoy,
                },
            ));
        }
    }

    best.map(|(_, release)| release)
        .ok_or(CatalogError::NoSupportedVersion)
}
