//! slx-ir: build and inspect the binding IR of an exported model

use std::path::PathBuf;
use std::process;

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use model_binding_ir::cli::CliError;
use model_binding_ir::cli::commands::{frontend, init, inspect};
use model_binding_ir::workspace::RunOptions;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum InspectFormat {
    Compact,
    Pretty,
    Json,
}

impl InspectFormat {
    fn as_str(self) -> &'static str {
        match self {
            InspectFormat::Compact => "compact",
            InspectFormat::Pretty => "pretty",
            InspectFormat::Json => "json",
        }
    }
}

/// Binding IR toolchain for exported models.
#[derive(Parser)]
#[command(name = "slx-ir", version, about = "Binding IR toolchain for exported models")]
struct Cli {
    /// Project working directory
    #[arg(short = 'C', long, global = true, default_value = ".")]
    workdir: PathBuf,

    /// Also write the debug IR and print error details
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create model.toml and env.toml in an empty directory
    Init {
        /// Model name, defaults to the directory name
        #[arg(long)]
        model: Option<String>,
        /// Generated C++ class name, defaults to <model>ModelClass
        #[arg(long)]
        class_name: Option<String>,
        /// Generated C++ namespace
        #[arg(long)]
        namespace: Option<String>,
    },

    /// Build the IR from the project documents and write project.json
    Frontend,

    /// Summarize the IR of the last frontend run
    Inspect {
        #[arg(long, default_value = "pretty", value_enum)]
        format: InspectFormat,
    },
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let options = RunOptions { debug: cli.debug };
    let workdir = cli.workdir;
    match cli.command {
        Commands::Init {
            model,
            class_name,
            namespace,
        } => init::handle_init(&workdir, model, class_name, namespace)
            .context("init failed")?,
        Commands::Frontend => {
            frontend::handle_frontend(&workdir, options).context("frontend failed")?
        }
        Commands::Inspect { format } => {
            inspect::handle_inspect(&workdir, format.as_str()).context("inspect failed")?
        }
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    let debug = cli.debug;

    if let Err(err) = run(cli) {
        match err.downcast_ref::<CliError>() {
            Some(cli_err) => eprintln!("Error: {}", cli_err.user_message()),
            None => eprintln!("Error: {:#}", err),
        }
        if debug {
            eprintln!("\n{:?}", err);
        }
        process::exit(1);
    }
}
