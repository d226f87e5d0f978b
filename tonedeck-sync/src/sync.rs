//! Download pipeline
//!
//! Fetches every link whose key is not yet on disk. Files already present
//! are never fetched again, overwritten or deleted, so re-running a sync only
//! fills the gaps.
//!
//! A not-found response usually means the whole tone family is missing at
//! that source, so with `skip_tone_siblings` the remaining tones of the same
//! spelling are skipped without a request. The skip-set lives only for the
//! duration of one call.

use crate::error::{SyncError, SyncResult};
use crate::inventory::AudioDir;
use crate::source::{AudioSource, FetchOutcome};
use crate::validate::{detected_type, looks_like_audio};
use std::collections::HashSet;
use std::fmt;
use std::io::Write;
use std::path::Path;
use tonedeck_common::{RemoteLink, SiteProfile};
use tracing::{info, warn};

/// Per-site switches for the download loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncOptions {
    /// Skip other tones of a spelling after a miss
    pub skip_tone_siblings: bool,
    /// Reject bodies that do not look like audio
    pub validate_audio: bool,
}

impl SyncOptions {
    pub fn for_site(site: &SiteProfile) -> Self {
        Self {
            skip_tone_siblings: site.skip_tone_siblings,
            validate_audio: site.validate_audio,
        }
    }
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            skip_tone_siblings: true,
            validate_audio: false,
        }
    }
}

/// Counts for one sync pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Links considered
    pub total: usize,
    /// Links whose file was already on disk
    pub already_present: usize,
    /// Files downloaded and written
    pub fetched: usize,
    /// Links skipped because a tone sibling was missing
    pub skipped: usize,
    /// 404/403 responses
    pub not_found: usize,
    /// Bodies rejected by the audio check
    pub rejected: usize,
}

impl SyncReport {
    /// Requests actually sent
    pub fn requests(&self) -> usize {
        self.fetched + self.not_found + self.rejected
    }
}

impl fmt::Display for SyncReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} fetched, {} already present, {} skipped, {} not found, {} rejected ({} total)",
            self.fetched,
            self.already_present,
            self.skipped,
            self.not_found,
            self.rejected,
            self.total
        )
    }
}

/// Download every link missing from `dir`.
///
/// Creates the directory if needed.
///
/// # Errors
/// Any fetch error other than not-found/forbidden aborts the pass. Files
/// written before the failure stay on disk.
pub async fn download_files(
    source: &dyn AudioSource,
    dir: &AudioDir,
    links: &[RemoteLink],
    options: SyncOptions,
) -> SyncResult<SyncReport> {
    std::fs::create_dir_all(&dir.datadir)?;

    let inventory = dir.inventory()?;
    let pending: Vec<&RemoteLink> = links
        .iter()
        .filter(|link| !inventory.contains(&link.key))
        .collect();

    let mut report = SyncReport {
        total: links.len(),
        already_present: links.len() - pending.len(),
        ..Default::default()
    };

    info!(
        "Downloading {} sound files ({} total files, {} already downloaded in {})",
        pending.len(),
        links.len(),
        inventory.len(),
        dir.datadir.display()
    );

    let mut skip_spellings: HashSet<String> = HashSet::new();
    let count = pending.len();

    for (i, link) in pending.into_iter().enumerate() {
        let path = dir.path_for(&link.key);

        if skip_spellings.contains(link.spelling()) {
            info!(
                "{}/{} Skipping {}: failure on {}",
                i + 1,
                count,
                path.display(),
                link.spelling()
            );
            report.skipped += 1;
            continue;
        }

        info!(
            "{}/{} Downloading {} into {}",
            i + 1,
            count,
            link.url,
            path.display()
        );

        match source.fetch(&link.url).await? {
            FetchOutcome::Found(bytes) => {
                if options.validate_audio && !looks_like_audio(&bytes) {
                    warn!(
                        url = %link.url,
                        "Not a sound file ({}), discarding",
                        detected_type(&bytes)
                    );
                    report.rejected += 1;
                    if options.skip_tone_siblings {
                        skip_spellings.insert(link.spelling().to_string());
                    }
                    continue;
                }

                write_new_file(&dir.datadir, &path, &bytes)?;
                report.fetched += 1;
            }
            FetchOutcome::Missing { status } => {
                report.not_found += 1;
                if options.skip_tone_siblings {
                    info!(
                        "Not found ({}), skipping other tones of {}",
                        status,
                        link.spelling()
                    );
                    skip_spellings.insert(link.spelling().to_string());
                } else {
                    info!("Not found ({})", status);
                }
            }
        }
    }

    info!("Sync complete: {}", report);

    Ok(report)
}

/// Write through a temp file in `dir`, then move into place without
/// replacing an existing file.
fn write_new_file(dir: &Path, path: &Path, bytes: &[u8]) -> SyncResult<()> {
    let mut temp = tempfile::NamedTempFile::new_in(dir)?;
    temp.write_all(bytes)?;
    temp.flush()?;
    temp.persist_noclobber(path)
        .map_err(|e| SyncError::Io(e.error))?;
    Ok(())
}
