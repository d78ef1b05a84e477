mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use cmd::{
    coding::CodingSubcommand, config::ConfigSubcommand, deployment::DeploymentSubcommand,
    design::DesignSubcommand, execution::ExecutionSubcommand, gates::GatesSubcommand,
    intake::IntakeSubcommand, stakeholder::StakeholderSubcommand, suite::SuiteSubcommand,
    training::TrainingSubcommand,
};
use std::path::PathBuf;
use tracker_core::types::Stage;

#[derive(Parser)]
#[command(
    name = "tracker",
    about = "SDLC approval-gate tracker: move a requirement from intake to go-live",
    version,
    propagate_version = true
)]
struct Cli {
    /// Project root (default: auto-detect from .tracker/ or .git/)
    #[arg(long, global = true, env = "TRACKER_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the tracker in the current project
    Init {
        /// Project name (defaults to the directory name)
        #[arg(long)]
        name: Option<String>,
    },

    /// Create a new requirement and start its pipeline
    Create {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        business_area: String,
        #[arg(long, default_value = "")]
        process: String,
        #[arg(long, default_value = "")]
        kpis: String,
    },

    /// Open an existing requirement by id (REQ-XXXXXX)
    Open { id: String },

    /// Show the requirement and every stage status
    Status,

    /// Show the navigation panel, or switch the viewed stage
    Nav { stage: Option<Stage> },

    /// Show one stage screen's state
    View { stage: Stage },

    /// Landing dashboard: pending approvals and recent projects
    Dashboard {
        #[arg(long)]
        search: Option<String>,
    },

    /// Manage requirement stakeholders
    Stakeholder {
        #[command(subcommand)]
        subcommand: StakeholderSubcommand,
    },

    /// Intake & BRD screen
    Intake {
        #[command(subcommand)]
        subcommand: IntakeSubcommand,
    },

    /// Design screen
    Design {
        #[command(subcommand)]
        subcommand: DesignSubcommand,
    },

    /// Coding tracker screen
    Coding {
        #[command(subcommand)]
        subcommand: CodingSubcommand,
    },

    /// Build gates screen
    Gates {
        #[command(subcommand)]
        subcommand: GatesSubcommand,
    },

    /// Test suite screen
    Suite {
        #[command(subcommand)]
        subcommand: SuiteSubcommand,
    },

    /// Test execution screen
    Execution {
        #[command(subcommand)]
        subcommand: ExecutionSubcommand,
    },

    /// Training screen
    Training {
        #[command(subcommand)]
        subcommand: TrainingSubcommand,
    },

    /// Deployment screen
    Deployment {
        #[command(subcommand)]
        subcommand: DeploymentSubcommand,
    },

    /// Inspect and validate the project configuration
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },

    /// Serve the JSON API
    Serve {
        /// Port to listen on (0 = OS-assigned)
        #[arg(long, default_value = "3141")]
        port: u16,

        /// Open the API root in a browser
        #[arg(long)]
        open: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Serve { .. } => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let root = root::resolve_root(cli.root.as_deref());

    let result = match cli.command {
        Commands::Init { name } => cmd::init::run(&root, name.as_deref()),
        Commands::Create {
            name,
            business_area,
            process,
            kpis,
        } => cmd::requirement::create(&root, name, business_area, process, kpis, cli.json),
        Commands::Open { id } => cmd::requirement::open(&root, &id, cli.json),
        Commands::Status => cmd::requirement::status(&root, cli.json),
        Commands::Nav { stage } => cmd::nav::run(&root, stage, cli.json),
        Commands::View { stage } => cmd::view::run(&root, stage, cli.json),
        Commands::Dashboard { search } => cmd::dashboard::run(search.as_deref(), cli.json),
        Commands::Stakeholder { subcommand } => cmd::stakeholder::run(&root, subcommand, cli.json),
        Commands::Intake { subcommand } => cmd::intake::run(&root, subcommand, cli.json),
        Commands::Design { subcommand } => cmd::design::run(&root, subcommand, cli.json),
        Commands::Coding { subcommand } => cmd::coding::run(&root, subcommand, cli.json),
        Commands::Gates { subcommand } => cmd::gates::run(&root, subcommand, cli.json),
        Commands::Suite { subcommand } => cmd::suite::run(&root, subcommand, cli.json),
        Commands::Execution { subcommand } => cmd::execution::run(&root, subcommand, cli.json),
        Commands::Training { subcommand } => cmd::training::run(&root, subcommand, cli.json),
        Commands::Deployment { subcommand } => cmd::deployment::run(&root, subcommand, cli.json),
        Commands::Config { subcommand } => cmd::config::run(&root, subcommand, cli.json),
        Commands::Serve { port, open } => cmd::serve::run(&root, port, open),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
