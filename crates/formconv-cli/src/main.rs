//! formconv CLI - xlsform to AJF conversion tool

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use formconv::prelude::*;
use formconv::translation::build_translation;
use tracing::{error, info, Level};

#[derive(Parser)]
#[command(name = "formconv")]
#[command(author, version, about = "Convert xlsform spreadsheets into AJF forms")]
struct Cli {
    /// More log output (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert spreadsheets to AJF JSON, one output per input
    Convert {
        /// Input spreadsheets (xlsx, xlsm)
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Directory of the JSON files (default: next to each input)
        #[arg(short, long, conflicts_with = "stdout")]
        out_dir: Option<PathBuf>,

        /// Print the JSON documents to stdout instead of writing files
        #[arg(long)]
        stdout: bool,

        /// Write JSON on a single line
        #[arg(long, conflicts_with = "indent")]
        compact: bool,

        /// Indent with this many spaces instead of tabs
        #[arg(long)]
        indent: Option<usize>,
    },

    /// List the translation languages of a spreadsheet
    Languages {
        /// Input spreadsheet
        input: PathBuf,
    },

    /// Print the translation map of one language as JSON
    Translate {
        /// Input spreadsheet
        input: PathBuf,

        /// Language name, as in the `label::<language>` columns
        #[arg(short, long)]
        lang: String,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let result = match cli.command {
        Commands::Convert {
            inputs,
            out_dir,
            stdout,
            compact,
            indent,
        } => {
            let indent = match (compact, indent) {
                (true, _) => Indent::Compact,
                (false, Some(n)) => Indent::Spaces(n),
                (false, None) => Indent::Tab,
            };
            convert_all(&inputs, out_dir.as_deref(), stdout, &WriteOptions { indent })
        }
        Commands::Languages { input } => list_languages(&input),
        Commands::Translate { input, lang } => translate(&input, &lang),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => Level::ERROR,
        (false, 0) => Level::WARN,
        (false, 1) => Level::INFO,
        (false, _) => Level::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

/// Convert every input, going on after a failure
fn convert_all(
    inputs: &[PathBuf],
    out_dir: Option<&Path>,
    stdout: bool,
    options: &WriteOptions,
) -> Result<()> {
    let mut failed = 0;
    for input in inputs {
        if let Err(e) = convert_one(input, out_dir, stdout, options) {
            error!("{e:#}");
            failed += 1;
        }
    }
    if failed > 0 {
        anyhow::bail!("{failed} of {} conversions failed", inputs.len());
    }
    Ok(())
}

fn convert_one(
    input: &Path,
    out_dir: Option<&Path>,
    stdout: bool,
    options: &WriteOptions,
) -> Result<()> {
    let doc = convert_file(input).with_context(|| format!("{}", input.display()))?;

    if stdout {
        let mut out = io::stdout().lock();
        JsonWriter::write(&doc, &mut out, options).context("Failed to write to stdout")?;
        out.flush().context("Failed to write to stdout")?;
        return Ok(());
    }

    let output = output_path(input, out_dir);
    JsonWriter::write_file(&doc, &output, options)
        .with_context(|| format!("Failed to write '{}'", output.display()))?;
    info!(input = %input.display(), output = %output.display(), "converted");
    Ok(())
}

/// `<dir>/<stem>.json`, where `<dir>` defaults to the input's directory
fn output_path(input: &Path, out_dir: Option<&Path>) -> PathBuf {
    let file_name = input.with_extension("json");
    match (out_dir, file_name.file_name()) {
        (Some(dir), Some(name)) => dir.join(name),
        _ => file_name,
    }
}

fn list_languages(input: &Path) -> Result<()> {
    let form = open_form(input).with_context(|| format!("Failed to open '{}'", input.display()))?;
    let mut out = io::stdout().lock();
    for lang in &form.languages {
        writeln!(out, "{lang}")?;
    }
    Ok(())
}

fn translate(input: &Path, lang: &str) -> Result<()> {
    let form = open_form(input).with_context(|| format!("Failed to open '{}'", input.display()))?;
    if !form.languages.contains(lang) {
        anyhow::bail!("Language {lang:?} not found in '{}'", input.display());
    }
    let map = build_translation(&form, lang)
        .with_context(|| format!("{}", input.display()))?;
    let mut out = io::stdout().lock();
    serde_json::to_writer_pretty(&mut out, &map)?;
    writeln!(out)?;
    Ok(())
}
