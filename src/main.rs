use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use cachewipe::config::DEFAULT_LISTEN;
use cachewipe::format::format_size;
use cachewipe::{cleaner, scanner, server, Config, ScanResult, Targets};
use clap::{Parser, Subcommand};
use colored::Colorize;
use console::Term;
use dialoguer::Confirm;
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "cachewipe")]
#[command(about = "Scan and empty the cache directories of a web application deployment")]
#[command(version)]
struct Cli {
    /// Deployment root the cache directories are relative to
    #[arg(short = 'C', long, default_value = ".")]
    base_dir: PathBuf,

    /// Directory to operate on instead of the default cache pair (repeatable)
    #[arg(long = "root", value_name = "PATH")]
    roots: Vec<PathBuf>,

    /// Do not pause periodically during large walks
    #[arg(long)]
    no_throttle: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Count files, directories and bytes in the cache directories
    Scan,

    /// Delete everything inside the cache directories
    Clean {
        /// Show what would be deleted without deleting
        #[arg(short = 'n', long)]
        dry_run: bool,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Serve the scan/clean actions over HTTP
    Serve {
        /// Address to listen on
        #[arg(long, default_value = DEFAULT_LISTEN)]
        listen: SocketAddr,
    },
}

fn init_logging(verbose: bool, default_level: &str) {
    let level = if verbose { "debug" } else { default_level };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn build_config(cli: &Cli) -> Result<Config> {
    let base = cli
        .base_dir
        .canonicalize()
        .with_context(|| format!("Invalid base directory: {}", cli.base_dir.display()))?;

    let targets = if cli.roots.is_empty() {
        Targets::defaults(&base)
    } else {
        Targets::resolve(&base, &cli.roots)
    };

    let config = Config::new(targets);
    Ok(if cli.no_throttle {
        config.without_throttle()
    } else {
        config
    })
}

fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

fn print_targets(config: &Config) {
    for root in &config.targets {
        let marker = if root.is_dir() {
            "✓".green()
        } else {
            "missing".dimmed()
        };
        println!("  {}  {}", root.display(), marker);
    }
    println!();
}

fn print_scan(result: &ScanResult) {
    println!(
        "Found {} files in {} directories ({})",
        result.file_count.to_string().green().bold(),
        result.dir_count.to_string().green().bold(),
        format_size(result.total_size).green().bold()
    );
}

fn run_scan(config: &Config) -> ScanResult {
    println!("{}\n", "Scanning".cyan().bold());
    print_targets(config);

    let pb = spinner("Walking cache directories...");
    let result = scanner::scan(&config.targets, config.scan_throttle);
    pb.finish_and_clear();
    result
}

fn cmd_scan(config: &Config) {
    let result = run_scan(config);
    if result.is_empty() {
        println!("{}", "Cache directories are empty.".yellow());
        return;
    }
    print_scan(&result);
}

fn cmd_clean(config: &Config, dry_run: bool, yes: bool) -> Result<()> {
    let found = run_scan(config);
    if found.is_empty() {
        println!("{}", "Nothing to clean.".yellow());
        return Ok(());
    }
    print_scan(&found);

    if dry_run {
        println!("\n{}", "Dry run - nothing will be deleted.".yellow());
        return Ok(());
    }

    if !yes {
        if !Term::stdout().is_term() {
            anyhow::bail!("refusing to delete without a terminal; pass --yes to confirm");
        }

        let confirmed = Confirm::new()
            .with_prompt(format!(
                "Delete {} entries ({})?",
                found.entries(),
                found.size_human()
            ))
            .default(false)
            .interact()
            .unwrap_or(false);

        if !confirmed {
            println!("\n{}", "Cancelled.".yellow());
            return Ok(());
        }
    }

    println!("\n{}", "Deleting".red().bold());
    let pb = spinner("Removing cache entries...");
    let result = cleaner::clean(&config.targets, config.clean_throttle);
    pb.finish_and_clear();

    let skipped = found.entries().saturating_sub(result.total_deleted());
    if skipped > 0 {
        println!(
            "{} {} entries could not be removed",
            "warning:".yellow().bold(),
            skipped
        );
    }

    println!(
        "{} Deleted {} files and {} directories",
        "Done!".green().bold(),
        result.deleted_files.to_string().green(),
        result.deleted_dirs.to_string().green()
    );
    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    let config = build_config(&cli)?;

    match cli.command {
        Command::Scan => cmd_scan(&config),
        Command::Clean { dry_run, yes } => cmd_clean(&config, dry_run, yes)?,
        Command::Serve { listen } => {
            let runtime = tokio::runtime::Runtime::new().context("failed to start tokio runtime")?;
            runtime.block_on(server::serve(config.with_listen(listen)))?;
        }
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    // Terminal commands report through stdout; only the server logs at info.
    let default_level = match cli.command {
        Command::Serve { .. } => "info",
        _ => "warn",
    };
    init_logging(cli.verbose, default_level);

    if let Err(err) = run(cli) {
        eprintln!("{} {:#}", "error:".red().bold(), err);
        std::process::exit(1);
    }
}
