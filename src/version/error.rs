use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum VersionError {
    #[error("invalid version {0:?}: expected major.minor.patch")]
    InvalidVersion(String),
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("failed to fetch {url}: status code {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("invalid catalog: {0}")]
    Decode(#[from] serde_yaml_ng::Error),

    #[error("no supported versions found")]
    NoSupportedVersion,
}
