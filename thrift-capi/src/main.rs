use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use std::path::PathBuf;
use std::process::ExitCode;
use thrift_capi::{GeneratorOptions, generate_from_file};
use tracing_subscriber::EnvFilter;

/// Generate a C API, C++ bridge and C# wrapper from a Thrift schema document
#[derive(Parser, Debug)]
#[command(name = "thrift-capi", version, about)]
struct Cli {
    /// Schema document produced by `thrift --gen xml`
    schema: PathBuf,

    /// Output directory for the generated files
    #[arg(short, long, default_value = ".")]
    out: PathBuf,

    /// Omit documentation comments
    #[arg(long)]
    no_docs: bool,

    /// Library name used by every DllImport (default: <Service>.dll)
    #[arg(long)]
    dll_name: Option<String>,

    /// Generate without writing; fail if any file is out of date
    #[arg(long)]
    check: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn options(&self) -> GeneratorOptions {
        let options = GeneratorOptions::default().with_docs(!self.no_docs);
        match &self.dll_name {
            Some(name) => options.with_dll_name(name.clone()),
            None => options,
        }
    }
}

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Returns false when `--check` finds out-of-date files.
fn run(cli: &Cli) -> Result<bool> {
    let files = generate_from_file(&cli.schema, cli.options())
        .with_context(|| format!("failed to generate from {}", cli.schema.display()))?;

    if cli.check {
        let stale = files
            .stale_files(&cli.out)
            .with_context(|| format!("failed to inspect {}", cli.out.display()))?;
        if stale.is_empty() {
            tracing::info!(dir = %cli.out.display(), "generated files are up to date");
            return Ok(true);
        }
        for file in stale {
            tracing::warn!(file = %file.name, "generated file is out of date");
        }
        return Ok(false);
    }

    files
        .write_to(&cli.out)
        .with_context(|| format!("failed to write to {}", cli.out.display()))?;
    Ok(true)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}
