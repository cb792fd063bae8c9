use crate::{
    bing::{
        BingError, BingHomepageImages, DownloadOutcome, Downloader, FeedEntry, FeedQuery,
        HpImageArchive, MAX_COUNT, Writer,
    },
    settings::Settings,
};
use anyhow::{Context, bail};
use clap::Parser;
use futures::TryStreamExt;
use std::{io::Write, path::PathBuf};
use tracing::info;

#[derive(Parser, Debug, Clone)]
#[command(
    version,
    about = "Capture and download Microsoft's Bing Image of the Day",
    long_about = None
)]
pub struct Args {
    /// Download the specified number of images available, starting with the most recent image
    /// available.
    #[arg(
        short,
        long,
        default_value_t = 1,
        value_name = "COUNT",
        value_parser = clap::value_parser!(u8).range(1..=15)
    )]
    pub num_entries: u8,

    /// Index of the first image to fetch, in days before today.
    #[arg(
        short = 'x',
        long,
        default_value_t = 0,
        value_name = "INDEX",
        value_parser = clap::value_parser!(u8).range(0..=14)
    )]
    pub index: u8,

    /// Save a JSON metadata file next to each downloaded image.
    #[arg(short, long, default_value_t = false)]
    pub metadata: bool,

    /// List the available images instead of downloading them.
    #[arg(short, long, default_value_t = false)]
    pub list: bool,

    /// The directory images are downloaded to. It is created if it does not exist.
    /// Defaults to the configured output directory, then the current directory.
    #[arg(short, long, value_name = "DIR", value_parser = parse_output_dir)]
    pub path: Option<PathBuf>,

    /// Walk the archive in segments, reaching back up to 15 days, instead of issuing a
    /// single feed request.
    #[arg(short, long, default_value_t = false)]
    pub archive: bool,

    /// Market (language and region) of the feed, e.g. `en-US`.
    #[arg(long, value_name = "MARKET")]
    pub market: Option<String>,

    /// Configuration file to read instead of the default location.
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print the effective configuration as TOML and exit.
    #[arg(long, default_value_t = false)]
    pub show_config: bool,
}

impl Args {
    /// Apply command line overrides on top of loaded settings
    pub fn apply(&self, settings: &mut Settings) {
        if let Some(market) = &self.market {
            settings.market.clone_from(market);
        }
        if let Some(path) = &self.path {
            settings.output_dir = Some(path.clone());
        }
    }
}

fn parse_output_dir(value: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(value);
    if path.exists() && !path.is_dir() {
        return Err(format!("`{value}` must be a directory"));
    }
    Ok(path)
}

/// Run one invocation with `settings` that already carry the command line
/// overrides. Listing lines and saved paths go to `out`.
pub async fn run<W: Write>(args: Args, settings: Settings, out: &mut W) -> anyhow::Result<()> {
    let output_dir = settings.output_dir();
    if output_dir.exists() && !output_dir.is_dir() {
        bail!("`{}` must be a directory", output_dir.display());
    }

    let client = settings
        .http_client()
        .context("failed to build HTTP client")?;
    let archive = HpImageArchive::new(client).with_market(settings.market.clone());

    if args.list {
        writeln!(out, "Date       | Title")?;
        writeln!(out, "{}", "=".repeat(80))?;
    }

    tokio::fs::create_dir_all(&output_dir)
        .await
        .with_context(|| format!("failed to create {}", output_dir.display()))?;
    let downloader = Downloader::new(output_dir);

    if args.archive {
        run_archive(&args, archive, &downloader, out).await
    } else {
        run_feed(&args, &archive, &downloader, out).await
    }
}

/// Single feed request of `num_entries` images starting at `index`
async fn run_feed<W: Write>(
    args: &Args,
    archive: &HpImageArchive,
    downloader: &Downloader,
    out: &mut W,
) -> anyhow::Result<()> {
    let query = FeedQuery::new(args.num_entries).with_index(args.index);

    let response = match archive.get_feed(&query).await {
        Err(BingError::InvalidArgument(message)) => {
            bail!("{message}; use --archive to fetch more than {MAX_COUNT} images")
        }
        other => other.context("failed to fetch feed")?,
    };

    if !response.is_success() {
        bail!(
            "Unable to retrieve feed, server responded: {}",
            response.status_code
        );
    }

    let entries = response.entries().context("failed to parse feed")?;
    info!("Feed listed {} image(s)", entries.len());

    for entry in entries.iter().take(usize::from(args.num_entries)) {
        if args.list {
            writeln!(out, "{}", entry.listing_line())?;
            continue;
        }

        let outcome = downloader
            .download_from(archive, entry)
            .await
            .with_context(|| format!("failed to download {}", entry.url))?;
        report(args, &outcome, entry, out).await?;
    }

    Ok(())
}

/// Segmented walk of the archive, skipping images below `index`
async fn run_archive<W: Write>(
    args: &Args,
    archive: HpImageArchive,
    downloader: &Downloader,
    out: &mut W,
) -> anyhow::Result<()> {
    let mut images = BingHomepageImages::from_archive(archive).get_images();
    let mut seen = 0usize;
    let mut handled = 0usize;

    // errors end the run, so only images count towards the index
    while handled < usize::from(args.num_entries) {
        let Some(image) = images.try_next().await.context("failed to fetch archive")? else {
            break;
        };
        seen += 1;
        if seen <= usize::from(args.index) {
            continue;
        }
        handled += 1;

        if args.list {
            writeln!(out, "{}", image.listing_line())?;
            continue;
        }

        let outcome = downloader
            .download(&image)
            .await
            .with_context(|| format!("failed to download {}", image.url))?;
        report(args, &outcome, image.entry(), out).await?;
    }

    Ok(())
}

async fn report<W: Write>(
    args: &Args,
    outcome: &DownloadOutcome,
    entry: &FeedEntry,
    out: &mut W,
) -> anyhow::Result<()> {
    if let DownloadOutcome::Downloaded { path, .. } = outcome {
        writeln!(out, "{}", path.display())?;
    }

    if args.metadata {
        Writer::write_sidecar(outcome.path(), entry)
            .await
            .context("failed to write metadata")?;
    }

    Ok(())
}
