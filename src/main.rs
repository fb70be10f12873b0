use std::path::PathBuf;

use anyhow::{Context as _, Result};
use clap::{Args, Parser, Subcommand};
use mathconf::{EmitForm, Engine, config, emit, macros::builtins};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Validate math rendering configuration and emit it for MathJax or KaTeX",
    propagate_version = true
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate a JSON or YAML settings file.
    Check {
        /// Settings file (`.json`, `.yaml` or `.yml`).
        file: PathBuf,
    },
    /// Validate a settings file and print the engine configuration.
    Emit {
        /// Settings file (`.json`, `.yaml` or `.yml`).
        file: PathBuf,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Print the configuration of the built-in notation macros.
    Builtin {
        #[command(flatten)]
        output: OutputArgs,
    },
}

#[derive(Args)]
struct OutputArgs {
    /// Target engine: `mathjax` or `katex`.
    #[arg(long, default_value = "mathjax")]
    engine: Engine,
    /// Wrap the object in the script that registers it with the engine.
    #[arg(long)]
    script: bool,
}

impl OutputArgs {
    const fn form(&self) -> EmitForm {
        if self.script {
            EmitForm::Script
        } else {
            EmitForm::Object
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Check { file } => {
            let settings = config::load_path(&file)
                .with_context(|| format!("invalid configuration in {}", file.display()))?;
            println!(
                "{}: ok ({} macros, {} inline and {} display delimiters)",
                file.display(),
                settings.macros.len(),
                settings.inline_math.len(),
                settings.display_math.len(),
            );
        }
        Command::Emit { file, output } => {
            let rendered = mathconf::render_file(&file, output.engine, output.form())
                .with_context(|| format!("invalid configuration in {}", file.display()))?;
            print!("{rendered}");
            if output.form() == EmitForm::Object {
                println!();
            }
        }
        Command::Builtin { output } => {
            let settings = builtins::notation_settings().context("built-in notation macros")?;
            let rendered = emit::render(&settings, output.engine, output.form())?;
            print!("{rendered}");
            if output.form() == EmitForm::Object {
                println!();
            }
        }
    }

    Ok(())
}
