//! Command-line partition run.
//!
//! Reads a facility list and boundary documents, builds the zone territories
//! and writes them out as a GeoJSON feature collection.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use zonemap::{
    BoundaryDocument, EngineConfig, Facility, PartitionEngine, SubRegionIndex, ZoneFilter,
};

#[derive(Parser, Debug)]
#[command(name = "partition")]
#[command(about = "Partition a department into support-zone territories")]
struct Args {
    /// JSON array of facilities
    #[arg(short, long)]
    facilities: PathBuf,

    /// Department boundary (GeoJSON)
    #[arg(short, long, required_unless_present = "sub_regions")]
    boundaries: Option<PathBuf>,

    /// Sub-region boundaries (GeoJSON); switches to per-sub-region clipping
    #[arg(long)]
    sub_regions: Option<PathBuf>,

    /// Engine configuration (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Zones to render, comma separated; all when omitted
    #[arg(long, value_delimiter = ',')]
    zones: Vec<String>,

    /// Output file; stdout when omitted
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn read_document(path: &Path) -> Result<BoundaryDocument> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    BoundaryDocument::from_json(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => EngineConfig::load_from_file(path)?,
        None => EngineConfig::default(),
    };

    let facilities = {
        let content = fs::read_to_string(&args.facilities).context("Failed to read facilities")?;
        Facility::list_from_json(&content).context("Failed to parse facilities")?
    };
    info!("Loaded {} facilities", facilities.len());

    let filter = if args.zones.is_empty() {
        ZoneFilter::All
    } else {
        ZoneFilter::only(args.zones.iter().map(|z| z.trim().to_string()))
    };

    let engine = PartitionEngine::new(config);

    let result = match &args.sub_regions {
        Some(path) => {
            let document = read_document(path)?;
            let index = SubRegionIndex::from_document(&document, &engine.config().boundary);
            engine.partition_by_sub_region(&facilities, &index, &filter)
        }
        None => {
            let path = args
                .boundaries
                .as_deref()
                .context("A department boundary is required")?;
            let document = read_document(path)?;
            engine.partition_department(&facilities, &document, &filter)
        }
    };

    let json = result.to_feature_collection().to_json()?;
    match &args.output {
        Some(path) => {
            fs::write(path, json).context("Failed to write output")?;
            info!("Wrote {} zones to {}", result.zones.len(), path.display());
        }
        None => println!("{}", json),
    }

    Ok(())
}
