//! tonedeck - Mandarin syllable audio downloader and Anki deck builder
//!
//! `--download` fetches every syllable sound the selected site serves into
//! a local directory; `--anki` writes a deck with one card per syllable that
//! has all four tones on disk.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tonedeck_common::config::{load_config, OutputPaths, SiteRegistry, DEFAULT_SITE};
use tonedeck_common::syllables::AccessOrder;
use tonedeck_sync::{HttpAudioSource, RunPlan};

const DEFAULT_LOG_FILTER: &str = "tonedeck=info,tonedeck_sync=info,tonedeck_common=info";

/// Command-line arguments for tonedeck
#[derive(Parser, Debug)]
#[command(name = "tonedeck")]
#[command(about = "Download Mandarin syllable sounds and build Anki decks")]
#[command(version)]
struct Args {
    /// Download missing sound files
    #[arg(long, overrides_with = "no_download")]
    download: bool,

    /// Do not download (default)
    #[arg(long = "no-download", overrides_with = "download")]
    no_download: bool,

    /// Write the Anki deck file
    #[arg(long, overrides_with = "no_anki")]
    anki: bool,

    /// Do not write the Anki deck file (default)
    #[arg(long = "no-anki", overrides_with = "anki")]
    no_anki: bool,

    /// Audio source profile
    #[arg(long, default_value = DEFAULT_SITE, env = "TONEDECK_SITE")]
    site: String,

    /// Sound files path [default: ./sounds-<site>]
    #[arg(long, env = "TONEDECK_DATADIR")]
    datadir: Option<PathBuf>,

    /// Prefix added to all sound files [default: <site>-]
    #[arg(long, env = "TONEDECK_PREFIX")]
    prefix: Option<String>,

    /// Anki file path [default: ./anki-<site>.txt]
    #[arg(long, env = "TONEDECK_ANKIFILE")]
    ankifile: Option<PathBuf>,

    /// Deck tag label [default: <site>]
    #[arg(long)]
    tag: Option<String>,

    /// Request syllables in random order
    #[arg(long)]
    shuffle: bool,

    /// Config file [default: $TONEDECK_CONFIG, then <config dir>/tonedeck/config.toml]
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the available sites and exit
    #[arg(long)]
    list_sites: bool,
}

impl Args {
    fn download_enabled(&self) -> bool {
        self.download && !self.no_download
    }

    fn anki_enabled(&self) -> bool {
        self.anki && !self.no_anki
    }

    /// Neither downloading, exporting nor listing sites
    fn nothing_to_do(&self) -> bool {
        !self.list_sites && !self.download_enabled() && !self.anki_enabled()
    }
}

fn init_tracing(log_level: Option<&str>) {
    let fallback = log_level.unwrap_or(DEFAULT_LOG_FILTER).to_string();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| fallback.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse();

    // No config, site or client needed for an empty run
    if args.nothing_to_do() {
        init_tracing(None);
        info!("Neither --download nor --anki given, nothing to do");
        return Ok(());
    }

    let config = load_config(args.config.as_deref()).context("Failed to load configuration")?;
    init_tracing(config.log_level.as_deref());

    let registry = SiteRegistry::from_config(&config).context("Invalid site configuration")?;

    if args.list_sites {
        for site in registry.iter() {
            println!("{}\t{}", site.name, site.url_template);
        }
        return Ok(());
    }

    let site = registry.get(&args.site)?.clone();
    let paths = OutputPaths::defaults_for(&site.name).with_overrides(
        args.datadir.clone(),
        args.prefix.clone(),
        args.ankifile.clone(),
        args.tag.clone(),
    );

    let mut plan = RunPlan::for_site(site);
    plan.paths = paths;
    plan.download = args.download_enabled();
    plan.anki = args.anki_enabled();
    if args.shuffle {
        plan.order = AccessOrder::Shuffled;
    }

    info!("tonedeck {} (site: {})", env!("CARGO_PKG_VERSION"), plan.site.name);

    let source = HttpAudioSource::for_site(&plan.site).context("Failed to build HTTP client")?;
    let summary = plan.execute(&source).await.context("Run aborted")?;

    if let Some(report) = &summary.sync {
        info!("Download: {}", report);
    }
    if let Some(report) = &summary.export {
        info!(
            "Deck: {} records written to {}",
            report.records,
            report.deck_path.display()
        );
    }

    Ok(())
}
