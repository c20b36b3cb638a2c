use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "jcss")]
#[command(about = "Compiles nested JSON style trees into CSS")]
pub struct Cli {
    /// More log output on stderr (-v debug, -vv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compile one or more JSON documents into a stylesheet.
    Build(BuildArgs),
}

#[derive(Args, Debug, Clone, Default)]
pub struct BuildArgs {
    /// Input documents, added in order. Each may import others via "@import".
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    #[arg(short, long)]
    pub output: Option<PathBuf>,

    #[arg(long)]
    pub minify: bool,

    #[arg(long)]
    pub keep_camel_case: bool,

    /// Emit every selector on its own, without grouping.
    #[arg(long)]
    pub no_combine: bool,

    /// Compile options as JSON. Flags given on the command line win.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Named values substituted for "$name" strings in the inputs.
    #[arg(long)]
    pub storage: Option<PathBuf>,

    /// Print the rule snapshot as JSON instead of CSS.
    #[arg(long)]
    pub json: bool,
}
