//! Archive download, verification, and extraction.

use std::io::Read;
use std::path::Path;

use anyhow::{bail, Context, Result};
use url::Url;

use crate::util::hash::sha256_bytes;

/// Downloads source archives.
pub trait Fetcher {
    /// Fetch the full body at `url`.
    fn fetch(&self, url: &Url) -> Result<Vec<u8>>;
}

/// Fetcher backed by a blocking HTTP client.
#[derive(Debug, Clone, Default)]
pub struct HttpFetcher {
    offline: bool,
}

impl HttpFetcher {
    pub fn new() -> Self {
        HttpFetcher::default()
    }

    /// Refuse every download (config `[net] offline = true`).
    pub fn offline(mut self, offline: bool) -> Self {
        self.offline = offline;
        self
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &Url) -> Result<Vec<u8>> {
        if self.offline {
            bail!("network access is disabled (offline mode)");
        }

        if url.scheme() == "file" {
            let path = url
                .to_file_path()
                .map_err(|_| anyhow::anyhow!("invalid file url: {}", url))?;
            return std::fs::read(&path)
                .with_context(|| format!("failed to read {}", path.display()));
        }

        tracing::info!("Fetching tarball from {}", url);

        let response = reqwest::blocking::get(url.as_str())
            .with_context(|| format!("failed to download tarball from {}", url))?;

        if !response.status().is_success() {
            bail!("HTTP {}", response.status());
        }

        let body = response
            .bytes()
            .context("failed to read tarball response body")?;

        Ok(body.to_vec())
    }
}

/// Check `data` against an expected hex SHA256 digest.
pub fn verify_sha256(data: &[u8], expected: &str) -> Result<()> {
    let actual = sha256_bytes(data);
    if !actual.eq_ignore_ascii_case(expected) {
        bail!(
            "checksum mismatch:\n  expected: {}\n  actual:   {}",
            expected,
            actual
        );
    }
    tracing::debug!("Tarball hash verified: {}", &actual[..16]);
    Ok(())
}

/// Extract a gzip-compressed tarball into `dest`.
///
/// Entries that would land outside `dest` are rejected.
pub fn extract_tarball(data: &[u8], dest: &Path) -> Result<()> {
    use flate2::read::GzDecoder;
    use tar::Archive;

    std::fs::create_dir_all(dest)
        .with_context(|| format!("failed to create destination directory: {}", dest.display()))?;

    let mut archive = Archive::new(GzDecoder::new(data));

    for entry in archive.entries().context("failed to read tarball entries")? {
        let mut entry = entry.context("failed to read tarball entry")?;
        let entry_path = entry.path().context("failed to get entry path")?.into_owned();

        if entry_path.is_absolute()
            || entry_path
                .components()
                .any(|c| matches!(c, std::path::Component::ParentDir))
        {
            bail!(
                "tarball entry escapes destination directory: {}",
                entry_path.display()
            );
        }

        // GitHub archives carry a pax global header; it is metadata, not a file
        if entry.header().entry_type() == tar::EntryType::XGlobalHeader {
            let mut sink = Vec::new();
            entry.read_to_end(&mut sink)?;
            continue;
        }

        let unpacked = entry
            .unpack_in(dest)
            .with_context(|| format!("failed to extract {}", entry_path.display()))?;
        if !unpacked {
            bail!(
                "tarball entry escapes destination directory: {}",
                entry_path.display()
            );
        }
    }

    Ok(())
}
