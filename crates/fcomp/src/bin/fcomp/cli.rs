//! fcomp cli interface

use clap::{Parser, Subcommand, ValueEnum};
use std::fmt::Formatter;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Change the work directory
    ///
    /// Can be specified multiple times. Note that all
    /// paths on the way to the final path must exist.
    ///
    /// This is equivalent to running { cd <directory>; fcomp ... }
    #[clap(short = 'C', long = "directory", global(true))]
    pub directory: Vec<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Render a feature file with all scenario directives resolved
    ///
    /// Writes to stdout unless an output file is given (via --output or --lock)
    Render(RenderCommand),

    /// List the template variables a feature file requires
    #[command(alias = "vars")]
    Variables(VariablesCommand),

    /// Print debug information for development
    Dev(DevCommand),
}

#[derive(Parser, Debug)]
pub struct InputArgs {
    /// Feature file
    pub file: PathBuf,

    /// Do not resolve scenario directives
    #[clap(long = "no-resolve")]
    pub no_resolve: bool,
}

#[derive(Parser, Debug)]
pub struct RenderCommand {
    #[clap(flatten)]
    pub input: InputArgs,

    /// Write the rendered feature to a file (overwrites)
    #[clap(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Write the rendered feature next to the input as <name>.lock.feature
    #[clap(long = "lock", conflicts_with("output"))]
    pub lock: bool,

    /// Number of spaces per indentation level
    #[arg(long = "indent", default_value_t = 2)]
    pub indent: usize,
}

#[derive(Parser, Debug)]
pub struct VariablesCommand {
    #[clap(flatten)]
    pub input: InputArgs,

    #[arg(short = 'F', long = "output-format", default_value_t)]
    pub format: OutputFormat,
}

#[derive(ValueEnum, Clone, Default, Debug)]
pub enum OutputFormat {
    Json,
    #[default]
    Yaml,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Json => f.write_str("json"),
            OutputFormat::Yaml => f.write_str("yaml"),
        }
    }
}

#[derive(Parser, Debug)]
pub struct DevCommand {
    #[command(subcommand)]
    pub command: DevSubCommand,
}

#[derive(Subcommand, Debug)]
pub enum DevSubCommand {
    /// The scanned document
    Document { file: PathBuf },
    /// The document with all directives resolved
    Resolved { file: PathBuf },
}
