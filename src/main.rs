//! UI code exported for LVGL 9 does not build against the LVGL 8 library
//! the firmware links. This tool rewrites the handful of renamed
//! identifiers in `src/ui` right before compilation, from the build
//! system's extra script, so the export can be dropped in untouched.
use anyhow::Result;
use clap::{Parser, Subcommand};
use lvgl_compat_fix::utils::{self, Options, Stage};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "lvgl-compat-fix")]
#[command(about = "Rewrite LVGL 9 identifiers in UI sources for LVGL 8 builds")]
struct Cli {
    /// Project root (defaults to the nearest directory with platformio.ini)
    #[arg(long, global = true)]
    project: Option<PathBuf>,

    /// Directory to scan instead of the configured root (relative to the project root)
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply the fixes as the given build stage
    Run {
        #[arg(long, value_enum, default_value_t = Stage::Load)]
        stage: Stage,
    },
    /// List files that need fixes without changing them
    Check,
    /// Print the built-in rule set
    Rules {
        #[arg(long, default_value = "toml")]
        format: String,
    },
    /// Check the configuration and rule set
    Validate,
    /// Write a default lvgl-compat.toml
    Init,
    /// Install the PlatformIO extra script
    InstallHook,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let opts = Options {
        project: cli.project,
        root: cli.root,
    };

    match cli.command {
        Commands::Run { stage } => utils::run_stage(&opts, stage).map(|_| ()),
        Commands::Check => utils::check(&opts),
        Commands::Rules { format } => {
            print!("{}", utils::export_rules(&format)?);
            Ok(())
        }
        Commands::Validate => utils::validate(&opts),
        Commands::Init => utils::initialize_project(&opts),
        Commands::InstallHook => utils::install_hook(&opts),
    }
}
