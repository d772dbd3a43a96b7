use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::Parser;
use rr_templates::template::ConversionManifest;
use rr_templates::{ConverterConfig, TemplateConverter};

/// Exit status for inputs that are not SDSS template files.
const EXIT_REJECTED: u8 = 2;

/// Convert an SDSS spectral template file into redrock templates
#[derive(Parser, Debug)]
#[command(name = "rr-convert-sdss", version, about, long_about = None)]
struct Cli {
    /// SDSS template FITS file
    #[arg(short = 'i', long, value_name = "FILE")]
    infile: PathBuf,

    /// Existing folder for the rrtemplate-*.fits files
    #[arg(short = 'o', long, value_name = "DIR")]
    outfolder: PathBuf,

    /// Value written to RRVER (defaults to this program's version)
    #[arg(long, env = "RR_VERSION")]
    rrver: Option<String>,

    /// Also write a JSON manifest of the converted templates
    #[arg(long, value_name = "FILE")]
    manifest: Option<PathBuf>,
}

fn main() -> Result<ExitCode> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    if !cli.outfolder.is_dir() {
        bail!("output folder {} does not exist", cli.outfolder.display());
    }

    let mut config = ConverterConfig::default();
    if let Some(rrver) = cli.rrver {
        config.rr_version = rrver;
    }
    let converter = TemplateConverter::new(config);

    let report = converter
        .convert(&cli.infile, &cli.outfolder)
        .with_context(|| format!("converting {}", cli.infile.display()))?;

    // The converter has already logged the rejection with its reason.
    if !report.is_converted() {
        return Ok(ExitCode::from(EXIT_REJECTED));
    }
    for written in report.written() {
        println!("Wrote {}", written.path.display());
    }
    log::info!("{report}");

    if let Some(path) = &cli.manifest {
        if let Some(manifest) = ConversionManifest::from_report(&report, converter.config()) {
            let json = manifest.to_json().context("serializing manifest")?;
            std::fs::write(path, json)
                .with_context(|| format!("writing manifest {}", path.display()))?;
            println!("Wrote manifest {}", path.display());
        }
    }

    Ok(ExitCode::SUCCESS)
}
