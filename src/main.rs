use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use pythia::commands::{archive, graph, init, links, list, registry, show, update};
use pythia::validation::{clap_id_validator, clap_reason_validator};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "pythia")]
#[command(about = "Work item status tracking for markdown documentation trees", long_about = None)]
#[command(version)]
struct Cli {
    /// Project root containing the docs tree (defaults to the current directory)
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the docs tree with an empty registry and report
    Init,

    /// Change the status of a work item
    ///
    /// Updates the item document, the registry, the dependency graph and the
    /// status log, in that order.
    Update {
        /// Work item ID (alphanumeric, dash, underscore only; max 128 characters)
        #[arg(value_parser = clap_id_validator)]
        item_id: String,

        /// New status, e.g. "In Progress" or in-progress
        status: String,

        /// Reason for the change (required when moving to Blocked)
        #[arg(short, long, value_parser = clap_reason_validator)]
        reason: Option<String>,

        /// Approve the change (required when moving to Completed)
        #[arg(long)]
        approve: bool,
    },

    /// Show a work item and its status history
    Show {
        #[arg(value_parser = clap_id_validator)]
        item_id: String,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// List work items
    List {
        /// Only items of this type (task, proposal, exploration, idea)
        #[arg(short = 't', long = "type")]
        item_type: Option<String>,

        /// Only items with this status
        #[arg(short, long)]
        status: Option<String>,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the dependency graph, or rewrite it in the report
    Graph {
        /// Write the graph into the report instead of printing it
        #[arg(long)]
        write: bool,
    },

    /// Manage the work items registry
    Registry {
        #[command(subcommand)]
        command: RegistryCommands,
    },

    /// Archive completed work items
    Archive {
        /// Show what would be archived without changing anything
        #[arg(long)]
        dry_run: bool,

        /// Only archive items last updated at least this many days ago
        #[arg(long)]
        min_age_days: Option<i64>,
    },

    /// Check cross-document links for broken targets and missing back-links
    Links {
        /// Print as JSON
        #[arg(long)]
        json: bool,

        /// Add missing back-links under a References section
        #[arg(long)]
        fix: bool,

        /// Also write the JSON report to this file
        #[arg(long)]
        report: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum RegistryCommands {
    /// Upsert every work item on disk into the registry
    Sync,
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn run(cli: Cli) -> Result<()> {
    let root = match cli.root {
        Some(root) => root,
        None => std::env::current_dir()?,
    };

    match cli.command {
        Commands::Init => init::execute(&root),
        Commands::Update {
            item_id,
            status,
            reason,
            approve,
        } => update::execute(&root, item_id, status, reason, approve),
        Commands::Show { item_id, json } => show::execute(&root, item_id, json),
        Commands::List {
            item_type,
            status,
            json,
        } => list::execute(&root, item_type, status, json),
        Commands::Graph { write } => {
            if write {
                graph::write(&root)
            } else {
                graph::show(&root)
            }
        }
        Commands::Registry { command } => match command {
            RegistryCommands::Sync => registry::sync(&root),
        },
        Commands::Archive {
            dry_run,
            min_age_days,
        } => archive::execute(&root, dry_run, min_age_days),
        Commands::Links { json, fix, report } => links::execute(&root, json, fix, report),
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("{} {e:#}", "✗".red());
        std::process::exit(1);
    }
}
