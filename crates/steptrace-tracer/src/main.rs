//! CLI entrypoint for steptrace.

mod cli;

use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::Parser;
use steptrace_tracer::{extract_trace, write_trace, Driver, TraceConfig, TraceRequest};
use tracing::info;

use cli::{Cli, Command};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .with_writer(io::stderr)
        .init();

    match cli.command {
        Command::Run {
            file,
            entry,
            args,
            input,
            prelude,
            config,
        } => run(RunArgs {
            file,
            entry,
            args,
            input,
            prelude,
            config,
        }),
        Command::Extract { file } => extract(file.as_deref()),
    }
}

struct RunArgs {
    file: PathBuf,
    entry: Option<String>,
    args: Option<String>,
    input: Option<PathBuf>,
    prelude: Option<PathBuf>,
    config: Option<PathBuf>,
}

fn run(args: RunArgs) -> anyhow::Result<()> {
    let config = match &args.config {
        Some(path) => TraceConfig::load(path)?,
        None => TraceConfig::default(),
    };
    let source = read_file(&args.file)?;
    let entry_args = match &args.args {
        Some(text) => match serde_json::from_str::<serde_json::Value>(text)
            .context("--args is not valid JSON")?
        {
            serde_json::Value::Array(items) => items,
            _ => bail!("--args must be a JSON array"),
        },
        None => Vec::new(),
    };
    let input: Vec<String> = match &args.input {
        Some(path) => read_file(path)?.lines().map(str::to_string).collect(),
        None => Vec::new(),
    };
    let mut request = TraceRequest::new(source).with_input(input);
    if let Some(entry) = args.entry {
        request = request.with_entry(entry, entry_args);
    }
    if let Some(prelude) = args.prelude.as_deref().map(read_file).transpose()? {
        request = request.with_prelude(prelude);
    }

    info!(file = %args.file.display(), "tracing");
    let outcome = Driver::new(config).run(request)?;

    let stdout = io::stdout();
    write_trace(&mut stdout.lock(), &outcome.steps).context("failed to write trace")?;
    Ok(())
}

fn extract(file: Option<&Path>) -> anyhow::Result<()> {
    let text = match file {
        Some(path) => read_file(path)?,
        None => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .context("failed to read stdin")?;
            text
        }
    };
    let steps = extract_trace(&text)?;
    println!("{}", serde_json::to_string_pretty(&steps)?);
    Ok(())
}

fn read_file(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}
