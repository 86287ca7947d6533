//! Upstream source archive access and CRD extraction
//!
//! Downloads a release tarball and exposes it as a read-only file view keyed
//! by member path, so the extraction logic stays independent of the concrete
//! archive format and can be mocked in tests.

use flate2::read::GzDecoder;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[cfg(test)]
use mockall::automock;

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("failed to download {url}: status code {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("member {0:?} not found in archive")]
    MemberNotFound(String),

    #[error("archive I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Downloads the archive at `url` to `dest`.
///
/// The caller owns the destination's lifetime; the sync flow places it inside
/// a temp directory that is removed on every exit path.
pub async fn download(
    client: &reqwest::Client,
    url: &str,
    dest: &Path,
) -> Result<(), ArchiveError> {
    let response = client.get(url).send().await?;

    let status = response.status();
    if !status.is_success() {
        return Err(ArchiveError::Status {
            url: url.to_string(),
            status,
        });
    }

    let bytes = response.bytes().await?;
    std::fs::write(dest, &bytes)?;
    Ok(())
}

/// Read-only view of an archive's members, addressed by path.
#[cfg_attr(test, automock)]
pub trait FileView {
    /// Reads a member's full content, failing if the path is absent.
    fn read(&self, member: &str) -> Result<Vec<u8>, ArchiveError>;
}

/// [`FileView`] over a gzip-compressed tarball on disk.
///
/// Members are looked up by streaming the archive; each read re-opens the
/// file, which is fine for the handful of members a sync touches.
pub struct TarGzView {
    path: PathBuf,
}

impl TarGzView {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl FileView for TarGzView {
    fn read(&self, member: &str) -> Result<Vec<u8>, ArchiveError> {
        let file = File::open(&self.path)?;
        let mut archive = tar::Archive::new(GzDecoder::new(file));

        for entry in archive.entries()? {
            let mut entry = entry?;
            if entry.path()?.as_ref() == Path::new(member) {
                let mut data = Vec::new();
                entry.read_to_end(&mut data)?;
                return Ok(data);
            }
        }

        Err(ArchiveError::MemberNotFound(member.to_string()))
    }
}

/// Wraps raw manifest bytes in a Helm conditional guard.
///
/// The body is carried verbatim between the directives; only the comment
/// line and the two directive lines are added.
pub fn wrap_with_guard(guard: &str, data: &[u8]) -> Vec<u8> {
    let mut wrapped = format!("# Conditional: {guard}\n{{{{- if {guard} }}}}\n").into_bytes();
    wrapped.extend_from_slice(data);
    wrapped.extend_from_slice(b"{{- end }}\n");
    wrapped
}

/// Reads one archive member, wraps it in a conditional guard, and writes it
/// to `dest`, replacing any prior content.
pub fn sync_member(
    view: &dyn FileView,
    member: &str,
    dest: &Path,
    guard: &str,
) -> Result<(), ArchiveError> {
    let data = view.read(member)?;
    std::fs::write(dest, wrap_with_guard(guard, &data))?;
    Ok(())
}
