use std::path::PathBuf;
use std::process::ExitCode;

use chrono::NaiveDate;
use clap::{Parser, ValueEnum};

use members_report_pdf::{ReportConfig, generate_report, load_records};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Preset {
    Members,
    Collectors,
}

/// Render member records into a collector-grouped PDF report.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// JSON file holding an array of member records
    records: PathBuf,

    #[arg(long, value_enum, default_value = "members")]
    preset: Preset,

    /// JSON report configuration; overrides --preset
    #[arg(long)]
    config: Option<PathBuf>,

    /// Report title
    #[arg(long)]
    title: Option<String>,

    /// Directory the PDF is written to
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Generation date (YYYY-MM-DD), defaults to today
    #[arg(long)]
    date: Option<NaiveDate>,
}

fn run(args: Args) -> members_report_pdf::Result<PathBuf> {
    let mut config = match &args.config {
        Some(path) => ReportConfig::from_json_file(path)?,
        None => match args.preset {
            Preset::Members => ReportConfig::members(),
            Preset::Collectors => ReportConfig::collectors(),
        },
    };
    if let Some(title) = args.title {
        config.title = title;
    }
    let date = args.date.unwrap_or_else(|| chrono::Local::now().date_naive());

    let records = load_records(&args.records)?;
    log::info!("Loaded {} records from {}", records.len(), args.records.display());

    generate_report(&records, &config, date, &args.out_dir)
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    match run(args) {
        Ok(path) => {
            println!("{}", path.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Failed to generate report");
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
