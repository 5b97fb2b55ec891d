use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use aero_dxasm::{ListingTranslator, ScalarType, TranslateOptions, Translator};
use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "aero-dxasm",
    about = "Translate an SM4/SM5 disassembly listing (`<index>: <instruction>` lines) into HLSL-style statements."
)]
struct Args {
    /// Listing to translate (`-` reads stdin)
    input: PathBuf,

    /// Write statements here instead of stdout
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Scalar base type for declared destinations (float, half, min16float)
    #[arg(long, value_name = "TYPE", default_value_t = ScalarType::Float)]
    scalar: ScalarType,

    /// Emit `dst = src;` without a type declaration
    #[arg(long, action = clap::ArgAction::SetTrue)]
    no_declare: bool,

    /// Exit with status 1 if any line could not be translated
    #[arg(long, action = clap::ArgAction::SetTrue)]
    strict: bool,

    /// Do not print per-line diagnostics to stderr
    #[arg(long, action = clap::ArgAction::SetTrue)]
    quiet: bool,
}

fn main() -> anyhow::Result<ExitCode> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("error"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    run(args)
}

fn run(args: Args) -> anyhow::Result<ExitCode> {
    let source = read_input(&args.input)?;

    let translator = Translator::new(TranslateOptions {
        scalar: args.scalar,
        declare_types: !args.no_declare,
    });
    let output = ListingTranslator::new(translator).translate_listing(&source);
    tracing::info!(
        statements = output.statements.len(),
        diagnostics = output.diagnostics.len(),
        "listing translated"
    );

    match &args.output {
        Some(path) => {
            let mut buf = Vec::new();
            output.write_statements(&mut buf)?;
            fs::write(path, buf).with_context(|| format!("write {}", path.display()))?;
        }
        None => {
            let stdout = io::stdout();
            let mut lock = stdout.lock();
            output.write_statements(&mut lock).context("write stdout")?;
            lock.flush().context("flush stdout")?;
        }
    }

    if !args.quiet {
        output
            .write_diagnostics(io::stderr().lock())
            .context("write diagnostics")?;
    }

    if args.strict && !output.diagnostics.is_empty() {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

fn read_input(path: &Path) -> anyhow::Result<String> {
    if path.as_os_str() == "-" {
        let mut source = String::new();
        io::stdin()
            .read_to_string(&mut source)
            .context("read stdin")?;
        return Ok(source);
    }
    fs::read_to_string(path).with_context(|| format!("read {}", path.display()))
}
