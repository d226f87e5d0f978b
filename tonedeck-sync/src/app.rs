//! Run orchestration
//!
//! A [`RunPlan`] bundles everything one invocation needs: the site, where
//! files live, and which passes to run. Sync runs before export when both
//! are requested; export always rescans the directory.

use crate::error::SyncResult;
use crate::export::{export_deck, ExportReport};
use crate::inventory::AudioDir;
use crate::source::AudioSource;
use crate::sync::{download_files, SyncOptions, SyncReport};
use tonedeck_common::config::OutputPaths;
use tonedeck_common::syllables::AccessOrder;
use tonedeck_common::{PhoneticTables, SiteProfile};
use tracing::info;

/// Everything one run needs
#[derive(Debug, Clone)]
pub struct RunPlan {
    pub site: SiteProfile,
    pub paths: OutputPaths,
    pub tables: PhoneticTables,
    pub order: AccessOrder,
    /// Run the download pass
    pub download: bool,
    /// Run the deck export pass
    pub anki: bool,
}

/// Reports of the passes that ran
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub sync: Option<SyncReport>,
    pub export: Option<ExportReport>,
}

impl RunPlan {
    /// Plan with standard tables and default paths for `site`; no passes enabled
    pub fn for_site(site: SiteProfile) -> Self {
        let paths = OutputPaths::defaults_for(&site.name);
        Self {
            site,
            paths,
            tables: PhoneticTables::standard(),
            order: AccessOrder::Sequential,
            download: false,
            anki: false,
        }
    }

    pub fn audio_dir(&self) -> AudioDir {
        AudioDir::new(
            self.paths.datadir.clone(),
            self.paths.prefix.clone(),
            self.site.format.clone(),
        )
    }

    pub fn has_work(&self) -> bool {
        self.download || self.anki
    }

    pub async fn execute(&self, source: &dyn AudioSource) -> SyncResult<RunSummary> {
        let mut summary = RunSummary::default();

        if !self.has_work() {
            info!("Nothing to do: pass --download and/or --anki");
            return Ok(summary);
        }

        let dir = self.audio_dir();

        if self.download {
            info!("Syncing {} audio into {}", self.site.name, dir.datadir.display());
            let links = self.site.links(&self.tables, self.order)?;
            let report =
                download_files(source, &dir, &links, SyncOptions::for_site(&self.site)).await?;
            summary.sync = Some(report);
        }

        if self.anki {
            let report = export_deck(
                &dir,
                &self.paths.tag,
                &self.site.sound_ref,
                &self.paths.ankifile,
            )?;
            summary.export = Some(report);
        }

        Ok(summary)
    }
}
