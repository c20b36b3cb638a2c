mod cli;

use std::fs;

use anyhow::{Context, Result};
use clap::Parser;
use jcss_core::{loader, CompileOptions, Compiler, Storage};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::cli::{BuildArgs, Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match &cli.command {
        Commands::Build(args) => {
            let output = run_build(args)?;
            match &args.output {
                Some(path) => fs::write(path, &output)
                    .with_context(|| format!("failed to write {}", path.display()))?,
                None => print!("{output}"),
            }
        }
    }
    Ok(())
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn build_options(args: &BuildArgs) -> Result<CompileOptions> {
    let mut options = match &args.config {
        Some(path) => CompileOptions::load(path)
            .with_context(|| format!("failed to load options from {}", path.display()))?,
        None => CompileOptions::default(),
    };
    if args.minify {
        options.minify = true;
    }
    if args.keep_camel_case {
        options.keep_camel_case = true;
    }
    if args.no_combine {
        options.combine_selectors = false;
    }
    Ok(options)
}

/// Compile every input and return the text to write.
fn run_build(args: &BuildArgs) -> Result<String> {
    let options = build_options(args)?;
    let storage = match &args.storage {
        Some(path) => Storage::load(path)
            .with_context(|| format!("failed to load storage from {}", path.display()))?,
        None => Storage::new(),
    };

    let mut compiler = Compiler::with_options(options);
    for input in &args.inputs {
        let documents = loader::load_with_imports(input)
            .with_context(|| format!("failed to load {}", input.display()))?;
        debug!(input = %input.display(), documents = documents.len(), "loaded input");
        for document in documents {
            let document = storage.substitute(&document)?;
            compiler.add(document)?;
        }
    }

    if args.json {
        let snapshot = compiler.to_json()?;
        let mut text = serde_json::to_string_pretty(&snapshot)?;
        text.push('\n');
        return Ok(text);
    }
    Ok(compiler.compile()?)
}
