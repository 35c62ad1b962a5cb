mod cli;

use fcomp::composition::Composition;
use fcomp::emitter::EmitOptions;
use fcomp::feature_document::FeatureDocument;
use std::io::Write;
use std::path::{Path, PathBuf};

fn main() {
    use clap::Parser;
    let cli = cli::Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_env("FCOMP_LOG"))
        .with_writer(std::io::stderr)
        .init();

    for new_path in cli.directory.iter() {
        match new_path.canonicalize() {
            Err(e) => {
                eprintln!(
                    "Failed to resolve path for -C/--directory {}\n{}",
                    new_path.display(),
                    e
                );
                std::process::exit(1);
            }
            Ok(cwd) => {
                if let Err(err) = std::env::set_current_dir(&cwd) {
                    eprintln!("Failed to set work directory to {}\n{}", cwd.display(), err,);
                    std::process::exit(1);
                }

                tracing::info!(directory=%cwd.display(), "Changed working directory");
            }
        }
    }

    let command_result = match cli.command {
        cli::Command::Render(render_cli) => render(render_cli),
        cli::Command::Variables(variables_cli) => variables(variables_cli),
        cli::Command::Dev(dev_cli) => dev(dev_cli),
    };

    if let Err(e) = command_result {
        for error in e.chain() {
            eprintln!("{error}")
        }
        std::process::exit(1);
    }
}

pub fn render(cli: cli::RenderCommand) -> anyhow::Result<()> {
    let options = EmitOptions {
        indent_width: cli.indent,
    };
    let composition = compose(&cli.input, &options)?;

    let destination = match (cli.output, cli.lock) {
        (Some(output), _) => Some(output),
        (None, true) => Some(cli.input.file.with_extension("lock.feature")),
        (None, false) => None,
    };

    match destination {
        Some(destination) => {
            anyhow::ensure!(
                !same_file(&destination, &cli.input.file)?,
                "Refusing to overwrite the input file {}",
                destination.display()
            );
            fcomp::emitter::emit_to_file(&composition.document, &options, &destination)?;
        }
        None => std::io::stdout().write_all(composition.text.as_bytes())?,
    }

    Ok(())
}

pub fn variables(cli: cli::VariablesCommand) -> anyhow::Result<()> {
    let composition = compose(&cli.input, &EmitOptions::default())?;
    tracing::info!(
        count = composition.variables.len(),
        "feature file requires values for variables"
    );

    match cli.format {
        cli::OutputFormat::Yaml => {
            serde_yaml::to_writer(std::io::stdout(), &composition.variables)?
        }
        cli::OutputFormat::Json => {
            serde_json::to_writer_pretty(std::io::stdout(), &composition.variables)?;
            println!();
        }
    };

    Ok(())
}

/// Whether `destination` points to the existing file `input`
///
/// `destination` does not need to exist.
fn same_file(destination: &Path, input: &Path) -> anyhow::Result<bool> {
    use anyhow::Context;

    let input = input
        .canonicalize()
        .with_context(|| format!("Failed to resolve {}", input.display()))?;
    Ok(resolve_destination(destination)? == input)
}

fn resolve_destination(destination: &Path) -> anyhow::Result<PathBuf> {
    use anyhow::Context;

    if let Ok(path) = destination.canonicalize() {
        return Ok(path);
    }

    let file_name = destination
        .file_name()
        .with_context(|| format!("Not a file path: {}", destination.display()))?;
    let parent = match destination.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let parent = parent
        .canonicalize()
        .with_context(|| format!("Failed to resolve {}", parent.display()))?;

    Ok(parent.join(file_name))
}

fn compose(input: &cli::InputArgs, options: &EmitOptions) -> anyhow::Result<Composition> {
    use anyhow::Context;

    if input.no_resolve {
        let document = FeatureDocument::load_file(&input.file)
            .with_context(|| format!("Failed to load {}", input.file.display()))?;
        return Ok(Composition::from_document(document, options));
    }

    Ok(Composition::new(&input.file, options)?)
}

/// (fcomp-)developer utilities
///
/// A quick way to expose internal structures for debugging purposes
pub fn dev(cli: cli::DevCommand) -> anyhow::Result<()> {
    use cli::DevSubCommand::*;

    match cli.command {
        Document { file } => println!("{:#?}", FeatureDocument::load_file(&file)?),
        Resolved { file } => println!("{:#?}", fcomp::resolver::resolve(&file)?),
    }

    Ok(())
}
