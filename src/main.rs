//! `docmerge` command line.
//!
//! ```bash
//! # Merge files in argument order into downloads/<millis>-converted.pdf
//! docmerge merge notes.txt photo.jpg sheet.xlsx
//!
//! # Explicit output, staging through the uploads directory, JSON summary
//! docmerge merge -o out.pdf --stage --json a.pdf b.docx
//!
//! # Remove stale staged and merged files once, or keep sweeping on an interval
//! docmerge sweep --once
//! ```

use clap::{Parser, Subcommand};
use docmerge::settings::{CONFIG_PATH_VAR, Settings};
use docmerge::{ConverterBuilder, ItemOutcome, PipelineError};
use log::{error, info};
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::thread;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Parser)]
#[command(name = "docmerge")]
#[command(about = "Convert and merge documents into a single PDF")]
struct Cli {
    /// TOML settings file
    #[arg(long, global = true, env = CONFIG_PATH_VAR)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert files and merge them, in the given order, into one PDF
    Merge {
        /// Input files; their order is the page order of the output
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Output path (defaults to <output.dir>/<unix-millis>-converted.pdf)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Write each item to the staging directory before converting it
        #[arg(long)]
        stage: bool,

        /// Print a JSON summary instead of a text one
        #[arg(long)]
        json: bool,
    },

    /// Delete stale files from the staging and output directories
    Sweep {
        /// Sweep once and exit instead of repeating on the configured interval
        #[arg(long)]
        once: bool,
    },
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let outcome = Settings::load(cli.config.as_deref()).and_then(|settings| match cli.command {
        Commands::Merge { files, output, stage, json } => {
            merge(&settings, &files, output, stage, json)
        }
        Commands::Sweep { once } => sweep(&settings, once),
    });

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn merge(
    settings: &Settings,
    files: &[PathBuf],
    output: Option<PathBuf>,
    stage: bool,
    as_json: bool,
) -> Result<(), PipelineError> {
    let mut inputs = Vec::with_capacity(files.len());
    for path in files {
        inputs.push((display_name(path), fs::read(path)?));
    }

    let mut builder = ConverterBuilder::new().with_settings(settings);
    if stage {
        builder = builder.with_staging_dir(&settings.staging.dir)?;
    }
    let converter = builder.build();

    let result = match converter.convert(inputs) {
        Ok(result) => result,
        Err(e) => {
            if as_json {
                println!("{}", json!({ "success": false, "error": e.to_string() }));
            }
            return Err(e);
        }
    };

    let output = match output {
        Some(path) => path,
        None => {
            fs::create_dir_all(&settings.output.dir)?;
            let millis = chrono::Utc::now().timestamp_millis();
            settings.output.dir.join(format!("{}-converted.pdf", millis))
        }
    };
    fs::write(&output, result.pdf())?;
    info!("Wrote {}", output.display());

    if as_json {
        let file_name = display_name(&output);
        let summary = serde_json::to_string_pretty(&result.summary(&file_name))
            .map_err(|e| PipelineError::Io(e.into()))?;
        println!("{}", summary);
    } else {
        println!("{} -> {}", result, output.display());
        for item in result.items() {
            match &item.outcome {
                ItemOutcome::Failed { reason } => println!("  failed: {} ({})", item.name, reason),
                ItemOutcome::Skipped => println!("  skipped: {}", item.name),
                ItemOutcome::Converted => {}
            }
        }
    }
    Ok(())
}

fn sweep(settings: &Settings, once: bool) -> Result<(), PipelineError> {
    loop {
        let removed = settings.sweep_stale_files()?;
        if once {
            println!("Removed {} stale file(s)", removed);
            return Ok(());
        }
        thread::sleep(settings.staging.sweep_interval());
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
