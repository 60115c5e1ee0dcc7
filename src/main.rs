//! cardsync
//!
//! Main entry point for the cardsync CLI.

use anyhow::{Context, Result};
use cardsync::bus::{DryRunResponder, InMemoryBus, InboundEvent};
use cardsync::config::{validate_config_result, SyncConfig};
use cardsync::identity;
use cardsync::sync::{metrics, Synchronizer};
use clap::{Parser, Subcommand};
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;

/// cardsync - Trello, GitHub and Jenkins kept in step
#[derive(Parser, Debug)]
#[command(name = "cardsync")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to config file (default: ~/.config/cardsync/config.yaml)
    #[arg(short, long, global = true, env = "CARDSYNC_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Write an example configuration
    Init {
        /// Overwrite an existing configuration
        #[arg(long)]
        force: bool,
    },

    /// Load and validate the configuration
    Validate,

    /// Show how a card title is decoded and routed
    Decode {
        /// Card title (e.g., "#SHOP-42 Fix login bug")
        title: String,
    },

    /// Run JSON-lines events through the synchronizer against a dry-run bus
    Replay {
        /// Events file, one JSON event per line (default: stdin)
        file: Option<PathBuf>,

        /// Issue number handed out to the first created issue
        #[arg(long, default_value_t = 1)]
        first_issue: u64,

        /// Print Prometheus metrics to stderr when done
        #[arg(long)]
        metrics: bool,
    },
}

fn main() {
    if let Err(e) = cardsync::logging::init() {
        eprintln!("Failed to initialize logging: {}", e);
    }

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config.unwrap_or_else(SyncConfig::default_path);

    match cli.command {
        Commands::Init { force } => handle_init_command(&config_path, force),
        Commands::Validate => handle_validate_command(&config_path),
        Commands::Decode { title } => handle_decode_command(&config_path, &title),
        Commands::Replay {
            file,
            first_issue,
            metrics,
        } => handle_replay_command(&config_path, file.as_deref(), first_issue, metrics),
    }
}

fn load_config(path: &Path) -> Result<SyncConfig> {
    let config = SyncConfig::load(path).with_context(|| {
        format!(
            "No usable configuration at {}. Run 'cardsync init' to create one",
            path.display()
        )
    })?;
    validate_config_result(&config)?;
    Ok(config)
}

fn handle_init_command(config_path: &Path, force: bool) -> Result<()> {
    if config_path.exists() && !force {
        println!("Configuration already exists at {}", config_path.display());
        println!();
        println!("To overwrite it, run:");
        println!("  cardsync init --force");
        return Ok(());
    }

    SyncConfig::example()
        .save(config_path)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;

    println!("Created configuration at {}", config_path.display());
    println!();
    println!("Edit the projects, ignored usernames and Jenkins jobs, then run:");
    println!("  cardsync validate");
    Ok(())
}

fn handle_validate_command(config_path: &Path) -> Result<()> {
    let config = load_config(config_path)?;

    println!("Configuration OK: {}", config_path.display());
    println!();
    for project in &config.projects {
        let mut roles = Vec::new();
        if project.name == config.default_project {
            roles.push("default");
        }
        if project.name == config.primary_project {
            roles.push("primary");
        }

        let roles = if roles.is_empty() {
            String::new()
        } else {
            format!(" ({})", roles.join(", "))
        };
        println!(
            "  #{:<8} {} -> {}/{}{}",
            project.code(),
            project.name,
            project.github.owner,
            project.github.repo,
            roles
        );
    }
    println!();
    println!(
        "Ignoring GitHub user '{}' and Trello user '{}'",
        config.ignore_user.github, config.ignore_user.trello
    );
    Ok(())
}

fn handle_decode_command(config_path: &Path, title: &str) -> Result<()> {
    let config = load_config(config_path)?;
    let resolver = cardsync::routing::ProjectResolver::from_config(&config)?;

    match identity::decode(title) {
        Some(key) => {
            println!("Tracked:   yes ({})", key);
            println!("Issue:     {}", key.issue_number());
            println!("Summary:   {}", identity::strip(title));
        }
        None => {
            println!("Tracked:   no");
            println!("Summary:   {}", identity::strip_project_code(title));
        }
    }

    let project = resolver.resolve_by_title(title);
    println!(
        "Project:   {} ({}/{})",
        project.name, project.github.owner, project.github.repo
    );
    Ok(())
}

fn handle_replay_command(
    config_path: &Path,
    file: Option<&Path>,
    first_issue: u64,
    print_metrics: bool,
) -> Result<()> {
    let config = load_config(config_path)?;

    let input: Box<dyn BufRead> = match file {
        Some(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("Failed to open {}", path.display()))?,
        )),
        None => Box::new(BufReader::new(io::stdin())),
    };

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start tokio runtime")?;

    runtime.block_on(replay(&config, input, first_issue))?;

    if print_metrics {
        eprint!("{}", metrics::encode_metrics());
    }
    Ok(())
}

async fn replay(config: &SyncConfig, input: Box<dyn BufRead>, first_issue: u64) -> Result<()> {
    let bus = Arc::new(InMemoryBus::with_responder(DryRunResponder::new(first_issue)));
    let synchronizer = Synchronizer::start(config, bus.clone())?;
    let mut stdout = io::stdout().lock();
    let mut rejected = 0usize;

    for (index, line) in input.lines().enumerate() {
        let line = line.context("Failed to read events")?;
        if line.trim().is_empty() {
            continue;
        }

        let event: InboundEvent = match serde_json::from_str(&line) {
            Ok(event) => event,
            Err(e) => {
                rejected += 1;
                tracing::warn!(line = index + 1, error = %e, "Skipping malformed event");
                continue;
            }
        };

        bus.publish(event).await;
        synchronizer.drain().await;

        for action in bus.take_emitted() {
            writeln!(stdout, "{}", serde_json::to_string(&action)?)?;
        }
    }

    if rejected > 0 {
        tracing::warn!(rejected, "Some events could not be parsed");
    }
    Ok(())
}
