//! blueprint - scaffold projects from the A3 template registry

mod list;
mod logging;

use anyhow::{Context, Result};
use blueprint_core::tui::CreateArgs;
use blueprint_core::{ScaffoldError, SourceConfig};
use clap::{Args as ClapArgs, Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "blueprint")]
#[command(about = "CLI for scaffolding projects from Nix, Cookiecutter and Git templates")]
#[command(version)]
pub struct Args {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(ClapArgs, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Owner of the registry repository
    #[arg(long, global = true)]
    pub owner: Option<String>,

    /// Registry repository name
    #[arg(long, global = true)]
    pub repo: Option<String>,

    /// Registry branch
    #[arg(long, global = true)]
    pub branch: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a new project from a template
    Create(CliCreateArgs),
    /// List the templates in the registry
    List(ListArgs),
}

#[derive(Parser, Debug)]
pub struct CliCreateArgs {
    /// Index of the template to use, as shown by `blueprint list`
    #[arg(short, long)]
    pub template: Option<usize>,

    /// Project directory to create
    #[arg(short, long)]
    pub directory: Option<PathBuf>,

    /// Build without asking for confirmation
    #[arg(short, long)]
    pub yes: bool,
}

impl From<CliCreateArgs> for CreateArgs {
    fn from(args: CliCreateArgs) -> Self {
        CreateArgs {
            template: args.template,
            directory: args.directory,
            yes: args.yes,
        }
    }
}

#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Print the descriptors as a JSON array
    #[arg(long)]
    pub json: bool,
}

#[tokio::main]
async fn main() {
    // Ensure terminal cursor is restored on panic
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = console::Term::stderr().show_cursor();
        default_panic(info);
    }));

    // Handle Ctrl+C gracefully
    ctrlc::set_handler(move || {
        let _ = console::Term::stderr().show_cursor();
        std::process::exit(130);
    })
    .ok();

    let args = Args::parse();
    let result = run(args).await;

    // Ensure cursor is visible on normal exit
    let _ = console::Term::stderr().show_cursor();

    if let Err(e) = result {
        eprintln!("{} {:#}", "error:".red().bold(), e);
        if let Some(hint) = e.downcast_ref::<ScaffoldError>().and_then(ScaffoldError::hint) {
            eprintln!("{} {}", "hint:".cyan().bold(), hint);
        }
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<()> {
    logging::init_logging(&args.global)?;

    let global = args.global;
    let config = SourceConfig::from_env()
        .context("invalid registry configuration")?
        .with_registry(global.owner, global.repo, global.branch);
    tracing::debug!(
        owner = %config.owner,
        repo = %config.repo,
        branch = %config.branch,
        authenticated = config.token.is_some(),
        "registry configured"
    );

    match args.command {
        Some(Command::Create(create_args)) => blueprint_core::run(config, create_args.into()).await,
        Some(Command::List(list_args)) => list::run(config, list_args.json).await,
        // No subcommand provided, default to create behavior (interactive mode)
        None => blueprint_core::run(config, CreateArgs::default()).await,
    }
}
