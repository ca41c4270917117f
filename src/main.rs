use castfeed::gateway::YtDlpGateway;
use castfeed::{config, imaging, output, pipeline};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "castfeed")]
#[command(about = "Podcast feed from a directory of downloaded channel media")]
#[command(long_about = "\
Podcast feed from a directory of downloaded channel media

The artifact directory is the data source. yt-dlp downloads audio next to
its metadata and thumbnail; every run rebuilds the feed from what is there.

Directory layout:

  poddir/
  ├── castfeed.toml                          # Config (optional)
  ├── dl-list.txt                            # yt-dlp download archive
  ├── podthumb.jpg                           # Channel artwork
  ├── cast.rss                               # Published feed
  ├── 2024-05-01 My Talk [abc123].mp3        # Episode audio
  ├── 2024-05-01 My Talk [abc123].info.json  # Episode metadata (required)
  └── 2024-05-01 My Talk [abc123].webp       # Thumbnail, converted to .jpg

Episodes without a metadata file, with an unparsable name or with a
thumbnail that cannot be converted are left out of the feed and logged.

Set RUST_LOG (e.g. RUST_LOG=castfeed=debug) for more detail.
Run 'castfeed gen-config' to generate a documented castfeed.toml.")]
#[command(version)]
struct Cli {
    /// Artifact directory
    #[arg(long, default_value = ".", global = true)]
    dir: PathBuf,

    /// Config file (default: <dir>/castfeed.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Download new episodes with yt-dlp, then rebuild the feed
    Sync,
    /// Rebuild the feed from the directory without downloading
    Feed,
    /// Validate the directory without converting or writing anything
    Check {
        /// Print feed items as JSON instead of the listing
        #[arg(long)]
        json: bool,
    },
    /// Print a stock castfeed.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "castfeed=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let load_config = || config::load_config(&cli.dir, cli.config.as_deref());

    match cli.command {
        Command::Sync => {
            let feed_config = load_config()?;
            let gateway = YtDlpGateway::new(&cli.dir, &feed_config.acquisition);
            let transcoder = imaging::transcoder_from_config(&feed_config.thumbnails);
            let report = pipeline::sync(&cli.dir, &feed_config, &gateway, transcoder.as_ref())?;
            output::print_sync_output(&report);
        }
        Command::Feed => {
            let feed_config = load_config()?;
            let transcoder = imaging::transcoder_from_config(&feed_config.thumbnails);
            let report = pipeline::build_feed(&cli.dir, &feed_config, transcoder.as_ref())?;
            output::print_run_output(&report);
        }
        Command::Check { json } => {
            let feed_config = load_config()?;
            let report = pipeline::check(&cli.dir, &feed_config)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report.items)?);
            } else {
                output::print_check_output(&report);
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}
