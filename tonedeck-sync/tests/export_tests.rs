//! Deck export from files on disk

mod helpers;

use helpers::seed_files;
use std::fs;
use tempfile::TempDir;
use tonedeck_sync::{export_deck, AudioDir, SyncError};

const SOUND_REF: &str = "[sound:{file}]";

fn deck_lines(path: &std::path::Path) -> Vec<String> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

#[test]
fn test_complete_tone_set_yields_one_record() {
    let temp = TempDir::new().unwrap();
    let dir = AudioDir::new(temp.path().join("sounds"), "yabla-", ".mp3");
    seed_files(&dir.datadir, "yabla-", ".mp3", &["qu1", "qu2", "qu3", "qu4"]);
    let deck = temp.path().join("anki.txt");

    let report = export_deck(&dir, "yabla", SOUND_REF, &deck).unwrap();

    assert_eq!(report.records, 1);
    assert!(report.incomplete.is_empty());
    let lines = deck_lines(&deck);
    assert_eq!(lines.len(), 1);
    let fields: Vec<&str> = lines[0].split('\t').collect();
    assert_eq!(
        fields,
        vec![
            "qu",
            "[sound:yabla-qu1.mp3]",
            "[sound:yabla-qu2.mp3]",
            "[sound:yabla-qu3.mp3]",
            "[sound:yabla-qu4.mp3]",
            "",
            "yabla",
        ]
    );
    assert!(fs::read_to_string(&deck).unwrap().ends_with('\n'));
}

#[test]
fn test_partial_tone_set_is_excluded() {
    let temp = TempDir::new().unwrap();
    let dir = AudioDir::new(temp.path().join("sounds"), "yabla-", ".mp3");
    seed_files(&dir.datadir, "yabla-", ".mp3", &["qu1", "qu2", "qu3"]);
    let deck = temp.path().join("anki.txt");

    let report = export_deck(&dir, "yabla", SOUND_REF, &deck).unwrap();

    assert_eq!(report.records, 0);
    assert_eq!(report.incomplete.len(), 1);
    assert_eq!(report.incomplete[0].spelling, "qu");
    assert_eq!(fs::read_to_string(&deck).unwrap(), "");
}

#[test]
fn test_mixed_spellings() {
    let temp = TempDir::new().unwrap();
    let dir = AudioDir::new(temp.path().join("sounds"), "dm-", ".mp3");
    seed_files(
        &dir.datadir,
        "dm-",
        ".mp3",
        &["ma1", "ma2", "ma3", "ma4", "wen1", "wen2", "wen3", "wen4", "cui4"],
    );
    // Other sites' files and unrelated files are ignored
    seed_files(&dir.datadir, "yabla-", ".mp3", &["cui1", "cui2", "cui3"]);
    fs::write(dir.datadir.join("README.txt"), "notes").unwrap();
    let deck = temp.path().join("anki.txt");

    let report = export_deck(&dir, "digmandarin", SOUND_REF, &deck).unwrap();

    assert_eq!(report.records, 2);
    assert_eq!(report.incomplete.len(), 1);
    let mut spellings: Vec<String> = deck_lines(&deck)
        .iter()
        .map(|l| l.split('\t').next().unwrap().to_string())
        .collect();
    spellings.sort();
    assert_eq!(spellings, vec!["ma", "wen"]);
    assert!(deck_lines(&deck).iter().all(|l| l.ends_with("\t\tdigmandarin")));
}

#[test]
fn test_deck_file_is_overwritten() {
    let temp = TempDir::new().unwrap();
    let dir = AudioDir::new(temp.path().join("sounds"), "yabla-", ".mp3");
    seed_files(&dir.datadir, "yabla-", ".mp3", &["a1", "a2", "a3", "a4"]);
    let deck = temp.path().join("anki.txt");
    fs::write(&deck, "stale line 1\nstale line 2\nstale line 3\n").unwrap();

    export_deck(&dir, "yabla", SOUND_REF, &deck).unwrap();
    export_deck(&dir, "yabla", SOUND_REF, &deck).unwrap();

    let lines = deck_lines(&deck);
    assert_eq!(lines.len(), 1);
    assert!(lines[0].starts_with("a\t"));
}

#[test]
fn test_missing_directory_is_error() {
    let temp = TempDir::new().unwrap();
    let dir = AudioDir::new(temp.path().join("absent"), "yabla-", ".mp3");
    let deck = temp.path().join("anki.txt");

    match export_deck(&dir, "yabla", SOUND_REF, &deck) {
        Err(SyncError::PathNotFound(_)) => {}
        other => panic!("Expected PathNotFound error, got {:?}", other),
    }
    assert!(!deck.exists());
}
