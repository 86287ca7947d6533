//! Typed read of the chart manifest's version fields

use crate::document::DocumentError;
use serde::Deserialize;
use std::path::Path;

/// The two version fields of `Chart.yaml`: the chart's own version and the
/// upstream release it currently bundles.
#[derive(Debug, Clone, Deserialize)]
pub struct ChartVersions {
    pub version: String,
    #[serde(rename = "appVersion")]
    pub app_version: String,
}

impl ChartVersions {
    pub fn load(path: &Path) -> Result<Self, DocumentError> {
        let text = std::fs::read_to_string(path).map_err(|source| DocumentError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_yaml_ng::from_str(&text)?)
    }
}
