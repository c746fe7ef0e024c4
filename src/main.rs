use statement_import::{
    report::dump_records,
    session::{run_import, ImportSession},
    stream_rows,
    transaction::RawRow,
    SourceOptions,
};

use anyhow::{bail, Context, Result};
use clap::Parser;
use log::info;
use std::io::stdout;
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;

#[derive(Debug, Parser)]
#[command(version, about = "Reads a bank statement CSV export and prints its transactions")]
struct Args {
    /// Statement export to read.
    #[arg(default_value = "transactions.csv")]
    input: PathBuf,

    /// Field separator. Guessed from the first line when omitted.
    #[arg(long, short)]
    delimiter: Option<char>,

    /// Treat the first line as data instead of a header.
    #[arg(long)]
    no_headers: bool,

    /// Progress label shown while importing.
    #[arg(long)]
    label: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    validate_csv_file(&args.input)?;
    process_rows(args).await
}

fn validate_csv_file(path: &Path) -> Result<()> {
    if !path.exists() {
        bail!("File '{}' does not exist", path.display());
    }

    let is_csv = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("csv"))
        .unwrap_or(false);
    if !is_csv {
        bail!("File '{}' is not a CSV file", path.display());
    }

    Ok(())
}

async fn process_rows(args: Args) -> Result<()> {
    let delimiter = match args.delimiter {
        Some(c) if c.is_ascii() => Some(c as u8),
        Some(c) => bail!("Delimiter '{}' must be a single ASCII character", c),
        None => None,
    };
    let options = SourceOptions {
        delimiter,
        has_headers: !args.no_headers,
    };
    let label = args
        .label
        .unwrap_or_else(|| format!("Importing {}", args.input.display()));

    info!("Processing rows from: {}", args.input.display());
    let rows = stream_rows(&args.input, &options)
        .with_context(|| format!("Failed to open '{}'", args.input.display()))?;

    // Rows go to the import task over a channel, in file order
    let (row_channel, rx) = mpsc::channel::<RawRow>(100);
    let import = tokio::spawn(run_import(ImportSession::new(), label, rx));

    for row in rows {
        row_channel
            .send(row)
            .await
            .context("Import task stopped before the end of the file")?;
    }
    drop(row_channel);

    let (session, _summary) = import.await.context("Import task panicked")?;
    dump_records(session.records(), stdout())?;

    Ok(())
}
