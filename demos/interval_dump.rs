//! Dump the contents of an interval file
//!
//! ```text
//! cargo run --example interval_dump -- genes.bb --region chr2:1000-2000 --assembly hg38.chrom.sizes
//! ```

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use genomics_io::{formats, Assembly, IntervalFormat};
use std::path::PathBuf;

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    /// Detect from the file signature
    Auto,
    #[value(name = "bigbed")]
    BigBed,
    Bed,
}

#[derive(Parser)]
#[command(name = "interval_dump")]
#[command(about = "Print the records of a BigBed or BED file")]
struct Cli {
    /// Input interval file
    input: PathBuf,

    /// Input format
    #[arg(short, long, value_enum, default_value = "auto")]
    format: FormatArg,

    /// Restrict output to a region, as chrom:start-stop
    #[arg(short, long)]
    region: Option<String>,

    /// Chromosome sizes file used to validate each record
    #[arg(short, long)]
    assembly: Option<PathBuf>,

    /// Print only the record count and chromosome list
    #[arg(long)]
    summary: bool,
}

fn parse_region(region: &str) -> Result<(String, u64, u64)> {
    let (chrom, range) = region
        .rsplit_once(':')
        .with_context(|| format!("Region '{}' is not chrom:start-stop", region))?;
    let (start, stop) = range
        .split_once('-')
        .with_context(|| format!("Region '{}' is not chrom:start-stop", region))?;
    let start = start.replace(',', "").parse().context("Invalid region start")?;
    let stop = stop.replace(',', "").parse().context("Invalid region stop")?;
    if start >= stop {
        bail!("Region '{}' is empty", region);
    }
    Ok((chrom.to_string(), start, stop))
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut reader = match cli.format {
        FormatArg::Auto => formats::open(&cli.input),
        FormatArg::BigBed => formats::open_as(&cli.input, IntervalFormat::BigBed),
        FormatArg::Bed => formats::open_as(&cli.input, IntervalFormat::Bed),
    }
    .with_context(|| format!("Failed to open {}", cli.input.display()))?;

    let assembly = cli
        .assembly
        .as_ref()
        .map(Assembly::from_path)
        .transpose()
        .context("Failed to load assembly")?;

    if cli.summary {
        println!("format\t{}", reader.format());
        println!("records\t{}", reader.count()?);
        println!("chromosomes\t{}", reader.chromosomes()?.join(","));
        reader.close()?;
        return Ok(());
    }

    let entries = match &cli.region {
        Some(region) => {
            let (chrom, start, stop) = parse_region(region)?;
            reader.query(&chrom, start, stop)?
        }
        None => reader.iter()?,
    };

    let mut skipped = 0u64;
    for entry in entries {
        let entry = entry?;
        if let Some(assembly) = &assembly {
            if let Err(e) = assembly.validate(&entry) {
                log::warn!("Skipping {}:{}-{}: {}", entry.chrom, entry.low(), entry.high(), e);
                skipped += 1;
                continue;
            }
        }
        println!("{}", entry);
    }
    if skipped > 0 {
        log::info!("{} records failed assembly validation", skipped);
    }

    reader.close()?;
    Ok(())
}
