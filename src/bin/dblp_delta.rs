//! Recently-modified extraction binary.
//!
//! Loads a catalog, scans it for records modified on or after a cutoff date
//! and writes the snapshot (and optionally its manifest).
//!
//! ## Configuration
//!
//! Environment variables:
//! - `RUST_LOG`: Log level filter (default: dblp_delta=info)
//! - `LOG_FORMAT`: "json" for structured logs, "pretty" for terminals (default: pretty)
//!
//! ## Usage
//!
//! ```bash
//! cargo run --bin dblp_delta -- catalog.json dblp.dtd 2024-01-01 --output data/recentlyModified.json
//! ```

use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use dblp_delta::{
    load_catalog_from_path, DeltaConfig, KeyOrder, ModDate, ModificationScanner, ScanError,
    SnapshotManifest, SnapshotWriter, DEFAULT_OUTPUT_PATH,
};

#[derive(Parser, Debug)]
#[command(name = "dblp_delta", version, about = "Extract publications modified since a cutoff date")]
struct Cli {
    /// Catalog document (JSON interchange form)
    catalog: PathBuf,
    /// Schema file accompanying the catalog; must be readable
    schema: PathBuf,
    /// Cutoff date, YYYY-MM-DD (inclusive)
    cutoff: String,
    #[arg(long, default_value = DEFAULT_OUTPUT_PATH, help = "Snapshot output path")]
    output: PathBuf,
    #[arg(long, default_value_t = false, help = "Sort snapshot keys by author id")]
    sort_keys: bool,
    #[arg(long, default_value_t = false, help = "Indent the snapshot")]
    pretty: bool,
    #[arg(long, default_value_t = false, help = "Scan authors in parallel")]
    parallel: bool,
    #[arg(long, default_value_t = false, help = "Write <output>.manifest.json next to the snapshot")]
    manifest: bool,
}

impl Cli {
    fn config(&self) -> DeltaConfig {
        DeltaConfig {
            output_path: self.output.clone(),
            key_order: if self.sort_keys { KeyOrder::AuthorId } else { KeyOrder::ScanOrder },
            pretty: self.pretty,
            parallel: self.parallel,
            write_manifest: self.manifest,
            ..DeltaConfig::default()
        }
    }
}

/// Initialize the tracing subscriber with JSON or pretty format
fn init_tracing() {
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "dblp_delta=info".into());

    if log_format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .flatten_event(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .init();
    }
}

/// The schema must be a regular file this process can open.
fn check_schema(path: &Path) -> Result<(), String> {
    let describe = |e: std::io::Error| format!("cannot read schema {}: {e}", path.display());
    let file = File::open(path).map_err(describe)?;
    if !file.metadata().map_err(describe)?.is_file() {
        return Err(format!("cannot read schema {}: not a regular file", path.display()));
    }
    Ok(())
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = cli.config();
    let config_fingerprint = config.fingerprint()?;
    info!(
        version = env!("CARGO_PKG_VERSION"),
        config_fingerprint = %config_fingerprint,
        "starting extraction"
    );

    // Validate the inputs before paying for the catalog load.
    let cutoff = ModDate::parse(&cli.cutoff).map_err(ScanError::from)?;
    check_schema(&cli.schema)?;

    let load_start = Instant::now();
    let catalog = load_catalog_from_path(&cli.catalog)?;
    info!(
        latency_ms = load_start.elapsed().as_millis() as u64,
        "catalog ready"
    );

    let result = ModificationScanner::new(config.scan_config()).scan(&catalog, cutoff)?;

    let writer = SnapshotWriter::new(config.writer_config());
    let stats = writer.write_to_path(&result, &config.output_path)?;

    if config.write_manifest {
        let manifest = SnapshotManifest::new(&result, &stats, writer.config().key_order);
        let manifest_path = SnapshotManifest::path_for(&config.output_path);
        if let Err(e) = manifest.write_to_path(&manifest_path) {
            // No artifact without its manifest.
            let _ = std::fs::remove_file(&config.output_path);
            return Err(e.into());
        }
        info!(path = %manifest_path.display(), "manifest written");
    }

    info!(
        path = %config.output_path.display(),
        authors = stats.author_count,
        publications = stats.publication_count,
        "done"
    );
    Ok(())
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        error!(error = %e, "extraction failed");
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
