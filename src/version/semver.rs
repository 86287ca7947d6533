use crate::version::error::VersionError;
use semver::Version;

/// Computes the next minor release of a `major.minor.patch` version.
///
/// The input must be exactly three numeric components; partial versions and
/// pre-release or build suffixes are rejected rather than coerced.
///
/// Examples:
/// - "1.5.3" -> "1.6.0"
/// - "2.0.9" -> "2.1.0"
pub fn next_minor(version: &str) -> Result<String, VersionError> {
    let parsed =
        Version::parse(version).map_err(|_| VersionError::InvalidVersion(version.to_string()))?;
    if !parsed.pre.is_empty() || !parsed.build.is_empty() {
        return Err(VersionError::InvalidVersion(version.to_string()));
    }
    Ok(format!("{}.{}.0", parsed.major, parsed.minor + 1))
}

/// Parse a version string into a semver::Version, normalizing partial versions.
///
/// Pads "1" and "1.2" with zeros so catalog entries can be compared even when
/// the producer publishes two-component release branches. Used for ordering
/// only, never for arithmetic.
pub fn parse_lenient(version: &str) -> Option<Version> {
    let parts: Vec<&str> = version.split('.').collect();
    let normalized = match parts.len() {
        1 => format!("{}.0.0", parts[0]),
        2 => format!("{}.{}.0", parts[0], parts[1]),
        _ => version.to_string(),
    };
    Version::parse(&normalized).ok()
}
