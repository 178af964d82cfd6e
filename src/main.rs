//! CLI entry point for covid19_charts.
//!
//! Provides subcommands for downloading the raw feeds, printing the chart
//! series of a single region, and generating chart documents for the
//! nationwide page and every prefecture.

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use covid19_charts::{
    feeds::Feed,
    fetch::{BasicClient, fetch_bytes},
    output::{ChartDocument, OutputFormat, print_json, print_pretty, write_document},
    regions::{AREAS, Region},
    store::{RecordStore, commit_staged, discard_staged, stage_feed},
};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::Instrument;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

/// Fallback for `--data-dir` when the flag is omitted.
const DATA_DIR_ENV: &str = "COVID19_CHARTS_DATA_DIR";

#[derive(Parser)]
#[command(name = "covid19_charts")]
#[command(about = "Derive chart series from Japan's COVID-19 open data", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Download all raw feeds into the data directory
    Update {
        /// Directory holding raw feed files and update.json
        #[arg(short, long)]
        data_dir: Option<PathBuf>,
    },
    /// Log the chart series of one region as JSON
    Series {
        /// Directory holding raw feed files and update.json
        #[arg(short, long)]
        data_dir: Option<PathBuf>,

        /// Prefecture name (e.g. "Tokyo"), or "ALL" for nationwide
        #[arg(short, long, default_value = "ALL")]
        region: String,

        /// Pretty-print the JSON
        #[arg(long, default_value_t = false)]
        pretty: bool,
    },
    /// Write chart documents for the nationwide page and every prefecture
    Generate {
        /// Directory holding raw feed files and update.json
        #[arg(short, long)]
        data_dir: Option<PathBuf>,

        /// Directory to write one document per region into
        #[arg(short, long, default_value = "out")]
        output_dir: PathBuf,

        /// Document format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,

        /// Gzip compress each document
        #[arg(long, default_value_t = false)]
        gzip: bool,
    },
    /// List the regions charts can be generated for
    ListRegions,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/covid19_charts.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("covid19_charts.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Update { data_dir } => {
            update_feeds(&resolve_data_dir(data_dir)).await?;
        }
        Commands::Series {
            data_dir,
            region,
            pretty,
        } => {
            let region = Region::resolve(&region)?;
            let store = RecordStore::load(&resolve_data_dir(data_dir))?;
            let document = ChartDocument::build(&store, region);

            print_pretty(&document);
            print_json(&document, pretty)?;
        }
        Commands::Generate {
            data_dir,
            output_dir,
            format,
            gzip,
        } => {
            generate(&resolve_data_dir(data_dir), &output_dir, format, gzip).await?;
        }
        Commands::ListRegions => {
            for area in AREAS {
                for pref in area.prefectures {
                    info!(
                        area = area.name,
                        id = pref.id,
                        name = pref.name,
                        title = pref.title,
                        "Region"
                    );
                }
            }
        }
    }

    Ok(())
}

fn resolve_data_dir(arg: Option<PathBuf>) -> PathBuf {
    arg.or_else(|| std::env::var_os(DATA_DIR_ENV).map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("data"))
}

/// Downloads every feed concurrently and checks that it decodes. Feeds are
/// staged next to the live files and only moved into place, together with a
/// fresh `update.json`, when all of them succeeded.
#[tracing::instrument(skip_all, fields(data_dir = %data_dir.display()))]
async fn update_feeds(data_dir: &Path) -> Result<()> {
    tokio::fs::create_dir_all(data_dir)
        .await
        .with_context(|| format!("failed to create {}", data_dir.display()))?;

    let client = Arc::new(BasicClient::new()?);
    let mut tasks = vec![];

    for feed in Feed::ALL {
        let client = client.clone();
        let data_dir = data_dir.to_path_buf();
        let feed_span = tracing::info_span!("update_feed", feed = %feed, url = feed.url());

        let task = tokio::spawn(
            async move {
                let fetch_start = std::time::Instant::now();
                let bytes = fetch_bytes(&client, feed.url()).await?;

                let elapsed = fetch_start.elapsed();
                if elapsed.as_secs() > 30 {
                    warn!(elapsed_secs = elapsed.as_secs(), "Feed fetch was slow");
                }
                debug!(bytes = bytes.len(), "Feed bytes received, parsing");

                let path = stage_feed(&data_dir, feed, &bytes).await?;
                info!(bytes = bytes.len(), path = %path.display(), "Feed staged");
                anyhow::Ok(())
            }
            .instrument(feed_span),
        );

        tasks.push((feed, task));
    }

    let mut failed = 0;
    for (feed, task) in tasks {
        match task.await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                error!(feed = %feed, error = %e, "Feed update failed");
                failed += 1;
            }
            Err(e) => {
                error!(feed = %feed, error = %e, "Feed update task aborted");
                failed += 1;
            }
        }
    }

    if failed > 0 {
        discard_staged(data_dir).await;
        anyhow::bail!("{failed} of {} feeds failed to update", Feed::ALL.len());
    }

    commit_staged(data_dir, Utc::now()).await?;
    info!("Finished updating all feeds");
    Ok(())
}

/// Builds and writes one chart document per region, each on a blocking task
/// sharing the loaded store.
#[tracing::instrument(
    skip_all,
    fields(data_dir = %data_dir.display(), output_dir = %output_dir.display(), gzip = gzip)
)]
async fn generate(
    data_dir: &Path,
    output_dir: &Path,
    format: OutputFormat,
    gzip: bool,
) -> Result<()> {
    let store = Arc::new(RecordStore::load(data_dir)?);

    tokio::fs::create_dir_all(output_dir)
        .await
        .with_context(|| format!("failed to create {}", output_dir.display()))?;

    let mut tasks = vec![];

    for region in Region::all() {
        let store = store.clone();
        let output_dir = output_dir.to_path_buf();
        let region_span = tracing::info_span!("generate_region", region = region.case_key());

        let task = tokio::task::spawn_blocking(move || {
            let _entered = region_span.enter();
            let document = ChartDocument::build(&store, region);
            write_document(&output_dir, region, &document, format, gzip)
        });

        tasks.push(task);
    }

    let mut written = 0;
    for task in tasks {
        let path = task.await??;
        debug!(path = %path.display(), "Chart document written");
        written += 1;
    }

    info!(written, ?format, "Finished generating chart documents");
    Ok(())
}
