use clap::Parser;
use grana::{analyze, ingest, report, Granularity};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Time-bucketed statistics over network measurement logs.
///
/// Parses the *.tsv files of the input location and prints one row of
/// summary statistics per time bucket.
#[derive(Parser)]
#[command(name = "grana", version, about)]
struct Cli {
    /// Input file, or directory containing *.tsv files.
    input: PathBuf,

    /// Bucket width: Day, Hour, Minute or Second (case-insensitive).
    granularity: String,
}

fn main() -> ExitCode {
    env_logger::builder()
        .filter_module("grana", log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let cli = Cli::parse();

    // reject a bad granularity before any file is opened
    let granularity: Granularity = match cli.granularity.parse() {
        Ok(granularity) => granularity,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    match run(&cli.input, granularity) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

/// Analyzes and reports every dataset; returns whether all of them made it.
fn run(input: &Path, granularity: Granularity) -> grana::Result<bool> {
    let files = ingest::discover(input)?;

    if files.is_empty() {
        log::warn!("no *.tsv files in {}", input.display());
    }

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    report::write_header(&mut out)?;

    let mut all_ok = true;

    for file in files {
        let name = ingest::dataset_name(&file);

        // NOTE: one dataset failing must not silence the others
        if let Err(e) = run_dataset(&mut out, &name, &file, granularity) {
            log::error!("{}: {e}", file.display());
            all_ok = false;
        }
    }

    Ok(all_ok)
}

fn run_dataset<W: Write>(
    out: &mut W,
    name: &str,
    file: &Path,
    granularity: Granularity,
) -> grana::Result<()> {
    let records = ingest::load(file)?;
    let buckets = analyze(&records, granularity)?;
    report::write_dataset(out, name, &buckets)?;

    Ok(())
}
