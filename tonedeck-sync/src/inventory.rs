//! Local audio inventory
//!
//! Lists the pinyin-tone keys already present as `{prefix}{key}{format}`
//! files in a directory. Both sync and export read it fresh on every pass.

use crate::error::{SyncError, SyncResult};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tonedeck_common::site::audio_file_name;
use tonedeck_common::PinyinKey;
use walkdir::WalkDir;

/// Directory plus the file naming scheme of its audio files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioDir {
    pub datadir: PathBuf,
    pub prefix: String,
    pub format: String,
}

impl AudioDir {
    pub fn new(datadir: impl Into<PathBuf>, prefix: impl Into<String>, format: impl Into<String>) -> Self {
        Self {
            datadir: datadir.into(),
            prefix: prefix.into(),
            format: format.into(),
        }
    }

    /// `{prefix}{key}{format}`
    pub fn file_name(&self, key: &PinyinKey) -> String {
        audio_file_name(&self.prefix, key, &self.format)
    }

    pub fn path_for(&self, key: &PinyinKey) -> PathBuf {
        self.datadir.join(self.file_name(key))
    }

    /// Fresh inventory of this directory
    pub fn inventory(&self) -> SyncResult<LocalInventory> {
        LocalInventory::scan(&self.datadir, &self.prefix, &self.format)
    }
}

/// Keys of the audio files found in one directory
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocalInventory {
    keys: HashSet<PinyinKey>,
}

impl LocalInventory {
    /// Scan `datadir` (non-recursive) for files named `{prefix}{key}{format}`.
    ///
    /// Files matching prefix and format whose middle part is not a key are
    /// logged and ignored.
    pub fn scan(datadir: &Path, prefix: &str, format: &str) -> SyncResult<Self> {
        if !datadir.exists() {
            return Err(SyncError::PathNotFound(datadir.to_path_buf()));
        }
        if !datadir.is_dir() {
            return Err(SyncError::NotADirectory(datadir.to_path_buf()));
        }

        let mut keys = HashSet::new();

        for entry in WalkDir::new(datadir).min_depth(1).max_depth(1) {
            let entry = entry.map_err(std::io::Error::from)?;
            if !entry.file_type().is_file() {
                continue;
            }

            let file_name = entry.file_name().to_string_lossy();
            let Some(stem) = file_name
                .strip_prefix(prefix)
                .and_then(|rest| rest.strip_suffix(format))
            else {
                continue;
            };

            match stem.parse::<PinyinKey>() {
                Ok(key) => {
                    keys.insert(key);
                }
                Err(e) => {
                    tracing::warn!("Ignoring {}: {}", entry.path().display(), e);
                }
            }
        }

        tracing::debug!(
            "Found {} audio files in {}",
            keys.len(),
            datadir.display()
        );

        Ok(Self { keys })
    }

    pub fn contains(&self, key: &PinyinKey) -> bool {
        self.keys.contains(key)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PinyinKey> {
        self.keys.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn key(s: &str) -> PinyinKey {
        s.parse().unwrap()
    }

    #[test]
    fn test_scan_nonexistent_path() {
        let result = LocalInventory::scan(Path::new("/nonexistent/tonedeck"), "yabla-", ".mp3");
        match result {
            Err(SyncError::PathNotFound(_)) => {}
            other => panic!("Expected PathNotFound error, got {:?}", other),
        }
    }

    #[test]
    fn test_scan_file_as_directory() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("plain.txt");
        fs::write(&file, b"x").unwrap();

        match LocalInventory::scan(&file, "yabla-", ".mp3") {
            Err(SyncError::NotADirectory(_)) => {}
            other => panic!("Expected NotADirectory error, got {:?}", other),
        }
    }

    #[test]
    fn test_scan_empty_directory() {
        let temp = TempDir::new().unwrap();
        let inventory = LocalInventory::scan(temp.path(), "yabla-", ".mp3").unwrap();
        assert!(inventory.is_empty());
    }

    #[test]
    fn test_scan_filters_prefix_and_format() {
        let temp = TempDir::new().unwrap();
        for name in [
            "yabla-qu4.mp3",
            "yabla-yi1.mp3",
            "yabla-qu4.ogg",
            "digmandarin-qu3.mp3",
            "notes.txt",
            "yabla-broken.mp3",
        ] {
            fs::write(temp.path().join(name), b"ID3").unwrap();
        }
        fs::create_dir(temp.path().join("yabla-wo2.mp3")).unwrap();

        let inventory = LocalInventory::scan(temp.path(), "yabla-", ".mp3").unwrap();
        assert_eq!(inventory.len(), 2);
        assert!(inventory.contains(&key("qu4")));
        assert!(inventory.contains(&key("yi1")));
        assert!(!inventory.contains(&key("qu3")));
        assert!(!inventory.contains(&key("wo2")));
    }

    #[test]
    fn test_audio_dir_naming() {
        let dir = AudioDir::new("/data/sounds", "yabla-", ".mp3");
        assert_eq!(dir.file_name(&key("qu4")), "yabla-qu4.mp3");
        assert_eq!(dir.path_for(&key("wen2")), PathBuf::from("/data/sounds/yabla-wen2.mp3"));
    }

    #[test]
    fn test_scan_does_not_recurse() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("nested")).unwrap();
        fs::write(temp.path().join("nested").join("yabla-ma1.mp3"), b"ID3").unwrap();

        let inventory = LocalInventory::scan(temp.path(), "yabla-", ".mp3").unwrap();
        assert!(inventory.is_empty());
    }
}
