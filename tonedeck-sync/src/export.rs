//! Flashcard deck export
//!
//! Groups the local inventory by bare spelling and writes one tab-separated
//! record per spelling that has all four tones on disk:
//!
//! ```text
//! qu  [sound:yabla-qu1.mp3]  [sound:yabla-qu2.mp3]  [sound:yabla-qu3.mp3]  [sound:yabla-qu4.mp3]  <empty>  yabla
//! ```
//!
//! Spellings with fewer tones are reported and left out. Export depends only
//! on the files in the directory, never on the state of a previous sync.

use crate::error::SyncResult;
use crate::inventory::{AudioDir, LocalInventory};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use tonedeck_common::site::render_sound_ref;
use tonedeck_common::{PinyinKey, Tone, TONES};
use tracing::{info, warn};

/// Tones present locally, keyed by bare spelling
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToneGroups {
    groups: BTreeMap<String, BTreeSet<Tone>>,
}

impl ToneGroups {
    pub fn from_keys<'a, I>(keys: I) -> Self
    where
        I: IntoIterator<Item = &'a PinyinKey>,
    {
        let mut groups: BTreeMap<String, BTreeSet<Tone>> = BTreeMap::new();
        for key in keys {
            groups
                .entry(key.spelling().to_string())
                .or_default()
                .insert(key.tone());
        }
        Self { groups }
    }

    pub fn from_inventory(inventory: &LocalInventory) -> Self {
        Self::from_keys(inventory.iter())
    }

    pub fn tones(&self, spelling: &str) -> Option<&BTreeSet<Tone>> {
        self.groups.get(spelling)
    }

    /// All four tones present
    pub fn is_complete(&self, spelling: &str) -> bool {
        self.tones(spelling)
            .map_or(false, |tones| tones.len() == TONES.len())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeSet<Tone>)> {
        self.groups.iter().map(|(s, t)| (s.as_str(), t))
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// One deck line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeckRecord {
    pub spelling: String,
    /// Sound references for tones 1-4
    pub sounds: [String; 4],
    pub tag: String,
}

impl DeckRecord {
    /// Fields in deck order: spelling, four sounds, empty field, tag
    pub fn fields(&self) -> Vec<&str> {
        let mut fields = Vec::with_capacity(7);
        fields.push(self.spelling.as_str());
        fields.extend(self.sounds.iter().map(String::as_str));
        fields.push("");
        fields.push(self.tag.as_str());
        fields
    }

    /// Tab-joined line without the trailing newline
    pub fn to_line(&self) -> String {
        self.fields().join("\t")
    }
}

/// Spelling left out of the deck
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncompleteSet {
    pub spelling: String,
    pub tones: Vec<Tone>,
}

/// Outcome of an export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReport {
    pub deck_path: PathBuf,
    pub records: usize,
    pub incomplete: Vec<IncompleteSet>,
}

/// Turn tone groups into deck records, splitting off incomplete sets
pub fn build_records(
    groups: &ToneGroups,
    dir: &AudioDir,
    tag: &str,
    sound_ref: &str,
) -> (Vec<DeckRecord>, Vec<IncompleteSet>) {
    let mut records = Vec::new();
    let mut incomplete = Vec::new();

    for (spelling, tones) in groups.iter() {
        if !groups.is_complete(spelling) {
            incomplete.push(IncompleteSet {
                spelling: spelling.to_string(),
                tones: tones.iter().copied().collect(),
            });
            continue;
        }

        let sounds = TONES.map(|tone| {
            let key = PinyinKey::new(spelling, tone);
            render_sound_ref(sound_ref, &dir.file_name(&key))
        });

        records.push(DeckRecord {
            spelling: spelling.to_string(),
            sounds,
            tag: tag.to_string(),
        });
    }

    (records, incomplete)
}

/// Deck file contents, one newline-terminated line per record
pub fn render_deck(records: &[DeckRecord]) -> String {
    records
        .iter()
        .map(|record| format!("{}\n", record.to_line()))
        .collect()
}

/// Scan `dir` and (over)write the deck file at `deck_path`
pub fn export_deck(
    dir: &AudioDir,
    tag: &str,
    sound_ref: &str,
    deck_path: &Path,
) -> SyncResult<ExportReport> {
    let inventory = dir.inventory()?;
    let groups = ToneGroups::from_inventory(&inventory);
    let (records, incomplete) = build_records(&groups, dir, tag, sound_ref);

    for set in &incomplete {
        warn!("Found {} tones for {}", set.tones.len(), set.spelling);
    }

    info!("Writing to: {}", deck_path.display());
    std::fs::write(deck_path, render_deck(&records))?;

    info!(
        "Wrote {} deck records ({} spellings incomplete)",
        records.len(),
        incomplete.len()
    );

    Ok(ExportReport {
        deck_path: deck_path.to_path_buf(),
        records: records.len(),
        incomplete,
    })
}
