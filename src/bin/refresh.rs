//! GADM reference table refresh.
//!
//! Maintainer-only batch job: rebuilds `data/gadm_database.csv` by
//! harvesting the ID/name properties of every per-country, per-level
//! boundary file on the GADM server. Run it when GADM publishes a new
//! release; request-time code only depends on the produced file.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use gadm::continent;
use gadm::database::{LEVELS, MAX_LEVEL};
use gadm::fetch::{boundary_url, BoundaryClient};
use gadm::geojson::{unit_from_properties, RawCollection};

#[derive(Parser, Debug)]
#[command(name = "refresh")]
#[command(about = "Rebuild the bundled GADM reference table")]
struct Args {
    /// Output CSV path
    #[arg(short, long, default_value = "data/gadm_database.csv")]
    out: PathBuf,

    /// Cache directory for downloaded boundary files
    #[arg(long)]
    cache_dir: Option<PathBuf>,
}

fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();
    let client = match args.cache_dir {
        Some(dir) => BoundaryClient::with_cache_dir(dir),
        None => BoundaryClient::new(),
    };

    let countries: Vec<&str> = continent::continents()
        .flat_map(|(_, codes)| codes.iter().map(String::as_str))
        .collect();
    info!("Refreshing {} countries", countries.len());

    let bar = ProgressBar::new((countries.len() * LEVELS) as u64);
    bar.set_style(ProgressStyle::with_template(
        "{bar:40} {pos}/{len} {msg}",
    )?);

    let mut units = Vec::new();
    for country in &countries {
        for level in 0..=MAX_LEVEL {
            bar.set_message(format!("{country} level {level}"));
            bar.inc(1);

            let url = boundary_url(country, level);
            // Countries stop at different depths; a missing file just means
            // the level does not exist for this country.
            let body = match client.get(&url) {
                Ok(body) => body,
                Err(e) => {
                    warn!("skipping {country} level {level}: {e}");
                    continue;
                }
            };
            let collection: RawCollection = serde_json::from_str(&body)
                .with_context(|| format!("Failed to parse {url}"))?;

            for feature in &collection.features {
                let mut unit = unit_from_properties(&feature.properties);
                unit.uid = units.len() as u32 + 1;
                units.push(unit);
            }
        }
    }
    bar.finish_and_clear();

    // The previous table stays in place unless the harvest produced
    // something.
    if units.is_empty() {
        bail!("no unit harvested");
    }

    let mut writer = csv::Writer::from_path(&args.out)
        .with_context(|| format!("Failed to open {}", args.out.display()))?;
    for unit in &units {
        writer.serialize(unit)?;
    }
    writer.flush()?;

    info!("Wrote {} units to {}", units.len(), args.out.display());
    Ok(())
}
