//! Test Helper Utilities
//!
//! In-memory audio source and fixtures shared by the tonedeck-sync tests

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;
use std::sync::Mutex;
use tonedeck_common::{RemoteLink, SiteProfile, Syllable, TONES};
use tonedeck_sync::{AudioSource, FetchOutcome, SyncError, SyncResult};

/// Minimal MP3 body (ID3 header)
pub const MP3_BYTES: &[u8] = b"ID3\x04\x00\x00\x00\x00\x00\x00fake-frame-data";

/// What looks like a soft 404 from a web server
pub const HTML_BYTES: &[u8] = b"<!DOCTYPE html><html><body>Page not found</body></html>";

#[derive(Debug, Clone)]
enum Canned {
    Missing(u16),
    Body(Vec<u8>),
    Status(u16),
}

/// Audio source answering from memory and recording every request
#[derive(Default)]
pub struct MockAudioSource {
    canned: HashMap<String, Canned>,
    requests: Mutex<Vec<String>>,
}

impl MockAudioSource {
    /// Serves [`MP3_BYTES`] for every URL not configured otherwise
    pub fn serving_all() -> Self {
        Self::default()
    }

    pub fn with_missing(mut self, url: &str, status: u16) -> Self {
        self.canned.insert(url.to_string(), Canned::Missing(status));
        self
    }

    pub fn with_body(mut self, url: &str, body: &[u8]) -> Self {
        self.canned.insert(url.to_string(), Canned::Body(body.to_vec()));
        self
    }

    pub fn with_status(mut self, url: &str, status: u16) -> Self {
        self.canned.insert(url.to_string(), Canned::Status(status));
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl AudioSource for MockAudioSource {
    async fn fetch(&self, url: &str) -> SyncResult<FetchOutcome> {
        self.requests.lock().unwrap().push(url.to_string());

        match self.canned.get(url) {
            None => Ok(FetchOutcome::Found(MP3_BYTES.to_vec())),
            Some(Canned::Missing(status)) => Ok(FetchOutcome::Missing { status: *status }),
            Some(Canned::Body(body)) => Ok(FetchOutcome::Found(body.clone())),
            Some(Canned::Status(status)) => Err(SyncError::HttpStatus {
                url: url.to_string(),
                status: *status,
            }),
        }
    }
}

/// Links for every tone of each `(initial, final)` pair
pub fn links_for(site: &SiteProfile, pairs: &[(&str, &str)]) -> Vec<RemoteLink> {
    let mut links = Vec::new();
    for (initial, final_) in pairs {
        for tone in TONES {
            links.push(site.resolve(&Syllable::new(*initial, *final_, tone)).unwrap());
        }
    }
    links
}

/// Sorted file names in a directory
pub fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

/// Create empty audio files for the given keys
pub fn seed_files(dir: &Path, prefix: &str, format: &str, keys: &[&str]) {
    fs::create_dir_all(dir).unwrap();
    for key in keys {
        fs::write(dir.join(format!("{}{}{}", prefix, key, format)), MP3_BYTES).unwrap();
    }
}

/// Distinct spellings among links
pub fn spellings(links: &[RemoteLink]) -> HashSet<String> {
    links.iter().map(|l| l.spelling().to_string()).collect()
}
