//! Full runs: sync into a fresh directory, then export the deck

mod helpers;

use helpers::{file_names, MockAudioSource};
use std::collections::HashSet;
use std::fs;
use tempfile::TempDir;
use tonedeck_common::SiteProfile;
use tonedeck_sync::RunPlan;

fn plan_in(temp: &TempDir, site: SiteProfile) -> RunPlan {
    let mut plan = RunPlan::for_site(site);
    plan.paths.datadir = temp.path().join("sounds");
    plan.paths.ankifile = temp.path().join("deck.txt");
    plan
}

#[tokio::test]
async fn test_yabla_full_space() {
    let temp = TempDir::new().unwrap();
    let mut plan = plan_in(&temp, SiteProfile::yabla());
    plan.download = true;
    plan.anki = true;
    let links = plan.site.links(&plan.tables, plan.order).unwrap();
    let source = MockAudioSource::serving_all();

    let summary = plan.execute(&source).await.unwrap();

    let sync = summary.sync.unwrap();
    assert_eq!(sync.fetched, links.len());
    assert_eq!(file_names(&plan.paths.datadir).len(), 22 * 36 * 4);

    let export = summary.export.unwrap();
    let spellings: HashSet<&str> = links.iter().map(|l| l.spelling()).collect();
    assert_eq!(export.records, spellings.len());
    assert!(export.incomplete.is_empty());

    let deck = fs::read_to_string(&plan.paths.ankifile).unwrap();
    assert_eq!(deck.lines().count(), spellings.len());
    assert!(deck
        .lines()
        .any(|l| l == "yue\t[sound:yabla-yue1.mp3]\t[sound:yabla-yue2.mp3]\t[sound:yabla-yue3.mp3]\t[sound:yabla-yue4.mp3]\t\tyabla"));
}

#[tokio::test]
async fn test_digmandarin_valid_space_then_rerun() {
    let temp = TempDir::new().unwrap();
    let mut plan = plan_in(&temp, SiteProfile::digmandarin());
    plan.download = true;
    plan.anki = true;
    plan.order = tonedeck_common::syllables::AccessOrder::Shuffled;

    let first = MockAudioSource::serving_all();
    let summary = plan.execute(&first).await.unwrap();
    let fetched = summary.sync.unwrap().fetched;
    assert_eq!(fetched, first.request_count());
    assert!(first.requests().iter().all(|u| u.ends_with("/Audio.mp3")));

    let second = MockAudioSource::serving_all();
    let summary = plan.execute(&second).await.unwrap();
    assert_eq!(second.request_count(), 0);
    assert_eq!(summary.sync.unwrap().already_present, fetched);
    assert_eq!(summary.export.unwrap().records, fetched / 4);
}

#[tokio::test]
async fn test_export_only_run_makes_no_requests() {
    let temp = TempDir::new().unwrap();
    let mut plan = plan_in(&temp, SiteProfile::yabla());
    plan.anki = true;
    helpers::seed_files(&plan.paths.datadir, "yabla-", ".mp3", &["ni1", "ni2", "ni3", "ni4"]);
    let source = MockAudioSource::serving_all();

    let summary = plan.execute(&source).await.unwrap();

    assert!(summary.sync.is_none());
    assert_eq!(summary.export.unwrap().records, 1);
    assert_eq!(source.request_count(), 0);
}

#[tokio::test]
async fn test_no_flags_does_nothing() {
    let temp = TempDir::new().unwrap();
    let plan = plan_in(&temp, SiteProfile::yabla());
    let source = MockAudioSource::serving_all();

    let summary = plan.execute(&source).await.unwrap();

    assert!(summary.sync.is_none());
    assert!(summary.export.is_none());
    assert_eq!(source.request_count(), 0);
    assert!(!plan.paths.datadir.exists());
    assert!(!plan.paths.ankifile.exists());
}
