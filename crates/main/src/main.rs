use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use liver_report::config::{self, ReportConfig};
use liver_report::export::ReportExporter;
use liver_report::loader::ReportPage;
use liver_report::render::render_screen;
use liver_report::session::{PatientId, Session};
use liver_report::source::{FilePatientSource, HttpPatientSource, PatientSource};
use tracing_subscriber::EnvFilter;

/// Loads a patient's liver health report, prints it and optionally saves it as a PDF.
///
/// The patient comes from `--patient-id` or the `LIVER_REPORT_PATIENT_ID` environment
/// variable. Fonts for the PDF are looked up under `assets/fonts` or in
/// `LIVER_REPORT_FONTS_DIR`.
#[derive(Parser)]
#[command(author, version, about = "Liver health report viewer and exporter")]
struct Cli {
    /// Patient to load; overrides LIVER_REPORT_PATIENT_ID.
    #[arg(long, global = true)]
    patient_id: Option<String>,

    /// Patient data endpoint; overrides LIVER_REPORT_ENDPOINT.
    #[arg(long, global = true, conflicts_with = "record_file")]
    endpoint: Option<String>,

    /// Read records from a local JSON array instead of the endpoint.
    #[arg(long, global = true)]
    record_file: Option<PathBuf>,

    /// HTTP timeout in seconds; overrides LIVER_REPORT_TIMEOUT_SECS.
    #[arg(long, global = true, value_parser = clap::value_parser!(u64).range(1..))]
    timeout_secs: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the report screen.
    Show,

    /// Save the report as `liver-health-report-<patient>.pdf`.
    Export {
        /// Output directory; overrides LIVER_REPORT_OUTPUT_DIR.
        #[arg(long)]
        out_dir: Option<PathBuf>,

        /// Directory holding the Roboto font files.
        #[arg(long)]
        fonts_dir: Option<PathBuf>,
    },
}

const EXIT_LOGIN_REQUIRED: i32 = 2;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("Error: {}", err);
            print_error_sources(err.as_ref());
            std::process::exit(1);
        }
    }
}

fn run(cli: Cli) -> Result<i32, Box<dyn Error>> {
    let mut config = ReportConfig::from_env()?;
    if let Some(endpoint) = cli.endpoint {
        config.endpoint = config::validate_endpoint("--endpoint", endpoint)?;
    }
    if let Some(secs) = cli.timeout_secs {
        config.timeout_secs = secs;
    }

    let session = match cli.patient_id.as_deref() {
        Some(raw) => PatientId::parse(raw).map_or_else(Session::anonymous, Session::for_patient),
        None => Session::from_env(),
    };

    let source: Box<dyn PatientSource> = match cli.record_file {
        Some(path) => Box::new(FilePatientSource::new(path)),
        None => Box::new(HttpPatientSource::new(&config)?),
    };

    let mut page = ReportPage::new(source, session);
    if let Err(navigation) = page.load() {
        eprintln!(
            "No patient selected for this session; sign in at {}",
            navigation.route()
        );
        return Ok(EXIT_LOGIN_REQUIRED);
    }

    print!("{}", render_screen(page.state(), page.record()));

    if let Commands::Export { out_dir, fonts_dir } = cli.command {
        if let Some(dir) = out_dir {
            config.output_dir = dir;
        }
        let exporter = ReportExporter::from_config(&config).with_fonts_dir(fonts_dir);
        match exporter.export_page(&page)? {
            Some(exported) => println!(
                "Generated {} ({} bytes, {} page(s))",
                exported.path.display(),
                exported.bytes_written,
                exported.pages
            ),
            None => println!("No report loaded; nothing exported."),
        }
    }

    Ok(0)
}

fn print_error_sources(mut error: &(dyn Error + 'static)) {
    while let Some(source) = error.source() {
        eprintln!("  caused by: {}", source);
        error = source;
    }
}
