mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use cmd::{catalog::CatalogSubcommand, project::ProjectSubcommand, tool::ToolSubcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "dmaic",
    about = "Track DMAIC improvement projects and get recommendations for the next tools to apply",
    version,
    propagate_version = true
)]
struct Cli {
    /// Project root (default: auto-detect from .dmaic/ or .git/)
    #[arg(long, global = true, env = "DMAIC_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize dmaic in the current directory
    Init,

    /// Manage projects
    Project {
        #[command(subcommand)]
        subcommand: ProjectSubcommand,
    },

    /// List catalog tools and record tool progress on a project
    Tool {
        #[command(subcommand)]
        subcommand: ToolSubcommand,
    },

    /// Recommend the next tools to work on for a project
    Recommend {
        /// Project slug
        slug: String,
    },

    /// Inspect the active tool catalog
    Catalog {
        #[command(subcommand)]
        subcommand: CatalogSubcommand,
    },
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let root = root::resolve_root(cli.root.as_deref());

    let result = match cli.command {
        Commands::Init => cmd::init::run(&root),
        Commands::Project { subcommand } => cmd::project::run(&root, subcommand, cli.json),
        Commands::Tool { subcommand } => cmd::tool::run(&root, subcommand, cli.json),
        Commands::Recommend { slug } => cmd::recommend::run(&root, &slug, cli.json),
        Commands::Catalog { subcommand } => cmd::catalog::run(&root, subcommand, cli.json),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
