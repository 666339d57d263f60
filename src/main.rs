use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use oblivion_wipe::io::PassProgress;
use oblivion_wipe::ui::{format_bytes, pass_label};
use oblivion_wipe::*;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "oblivion")]
#[command(about = "Medium-aware secure file destruction with an audit trail")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,

    /// Configuration file (TOML)
    #[arg(long, global = true, env = "OBLIVION_CONFIG")]
    config: Option<PathBuf>,

    /// Override the audit log location
    #[arg(long, global = true)]
    audit_log: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Securely destroy a file or every file under a directory
    Wipe {
        /// File or directory to destroy
        target: PathBuf,

        /// Sanitization standard (clear, purge, dod)
        #[arg(short, long, default_value = "dod")]
        standard: SanitizationStandard,

        /// Sample the result and check the last pass reached the disk
        #[arg(long)]
        verify: bool,

        /// Show the pass plan without touching anything
        #[arg(long)]
        dry_run: bool,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Show the storage medium backing a path
    Classify {
        path: PathBuf,
    },

    /// Print the audit trail
    Audit {
        /// Only show the most recent N records
        #[arg(short, long)]
        limit: Option<usize>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.debug, cli.log_json);
    setup_signal_handlers();

    let mut config = EngineConfig::load(cli.config.as_deref())?;
    if let Some(path) = cli.audit_log {
        config.audit_log_path = path;
    }

    match cli.command {
        Commands::Wipe {
            target,
            standard,
            verify,
            dry_run,
            yes,
        } => {
            if dry_run {
                preview(config, &target, standard)
            } else {
                wipe(config, target, standard, verify, yes).await
            }
        }
        Commands::Classify { path } => {
            let orchestrator = WipeOrchestrator::new(config);
            let profile = orchestrator.classify(&path);
            println!("{}: {}", path.display(), profile.to_string().bold());
            Ok(())
        }
        Commands::Audit { limit } => show_audit(&config, limit),
    }
}

fn init_logging(debug: bool, json: bool) {
    let default_level = if debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(debug);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

// Ctrl+C sets the shared flag; the executor stops at its next chunk
fn setup_signal_handlers() {
    tokio::spawn(async {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("\n\n{} Interrupt received, stopping after the current chunk...", "!".red().bold());
            set_interrupted();
        }
    });
}

fn preview(config: EngineConfig, target: &Path, standard: SanitizationStandard) -> Result<()> {
    let orchestrator = WipeOrchestrator::new(config);
    let files = collect_files(target);
    if files.is_empty() {
        bail!("Target not found: {}", target.display());
    }

    println!("{} ({})", "Dry run".yellow().bold(), standard.description());
    let mut total = 0u64;
    for file in &files {
        match orchestrator.plan(file, standard) {
            Ok(preview) => {
                total += preview.bytes_to_write();
                println!(
                    "  {}  {}  {} {}",
                    preview.path.display(),
                    format_bytes(preview.size).dimmed(),
                    preview.strategy_label.cyan(),
                    preview.plan
                );
            }
            Err(e) => println!("  {}  {}", file.display(), e.to_string().red()),
        }
    }
    println!("{} files, {} would be written", files.len(), format_bytes(total));
    Ok(())
}

async fn wipe(
    config: EngineConfig,
    target: PathBuf,
    standard: SanitizationStandard,
    verify: bool,
    yes: bool,
) -> Result<()> {
    let orchestrator = WipeOrchestrator::new(config);

    // A missing target still goes through the engine so it lands in the audit trail
    if std::fs::symlink_metadata(&target).is_err() {
        let result = orchestrator.wipe(&target, standard, verify, &mut |_| {});
        bail!(result.error.unwrap_or_else(|| format!("Target not found: {}", target.display())));
    }

    let files = collect_files(&target);
    let total_size: u64 = files
        .iter()
        .filter_map(|f| std::fs::metadata(f).ok())
        .map(|m| m.len())
        .sum();

    println!(
        "{} {} file(s), {} using {}",
        "About to destroy".red().bold(),
        files.len(),
        format_bytes(total_size),
        standard.description()
    );

    if !yes && !confirm()? {
        println!("Aborted.");
        return Ok(());
    }

    let summary = tokio::task::spawn_blocking(move || {
        let bar = ProgressBar::new(100);
        bar.set_style(
            ProgressStyle::with_template("{spinner} [{bar:40}] {percent:>3}% {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=> "),
        );
        bar.enable_steady_tick(Duration::from_millis(120));

        let summary = orchestrator.wipe_target(&target, standard, verify, &mut |file: &Path, progress: &PassProgress| {
            update_bar(&bar, file, progress);
        });

        bar.finish_and_clear();
        summary
    })
    .await
    .context("Wipe task panicked")?;

    print_summary(&summary);

    if summary.files_failed > 0 {
        bail!("{} file(s) could not be destroyed", summary.files_failed);
    }
    Ok(())
}

fn update_bar(bar: &ProgressBar, file: &Path, progress: &PassProgress) {
    let pass_fraction = if progress.file_size == 0 {
        1.0
    } else {
        progress.bytes_done as f64 / progress.file_size as f64
    };
    let overall = ((progress.pass_index - 1) as f64 + pass_fraction) / progress.pass_count.max(1) as f64;

    bar.set_position((overall * 100.0).round() as u64);
    let name = file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    bar.set_message(format!("{} {}", name, pass_label(progress)));
}

fn confirm() -> Result<bool> {
    print!("Type 'DESTROY' to confirm: ");
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim() == "DESTROY")
}

fn print_summary(summary: &WipeSummary) {
    println!();
    println!("{}", "=== Wipe Summary ===".bold());
    println!("  Files:       {}", summary.total_files);
    println!("  Destroyed:   {}", summary.files_wiped.to_string().green());
    if summary.files_failed > 0 {
        println!("  Failed:      {}", summary.files_failed.to_string().red());
    }
    println!("  Overwritten: {}", format_bytes(summary.total_bytes_overwritten));
    println!(
        "  Duration:    {}",
        humantime::format_duration(Duration::from_millis(summary.total_duration.as_millis() as u64))
    );

    for error in &summary.errors {
        println!("  {} {}", "x".red(), error);
    }
    if summary.errors_omitted > 0 {
        println!("  ... and {} more", summary.errors_omitted);
    }
}

fn show_audit(config: &EngineConfig, limit: Option<usize>) -> Result<()> {
    let logger = AuditLogger::new(config.audit_log_path.clone());
    let records = logger
        .read_records()
        .with_context(|| format!("Failed to read {}", logger.path().display()))?;

    let skip = limit.map_or(0, |n| records.len().saturating_sub(n));
    for record in records.iter().skip(skip) {
        let status = if record.success {
            "OK".green()
        } else {
            "FAIL".red()
        };
        println!(
            "{} {} {} {} passes={} verified={} {}",
            record.timestamp.format("%Y-%m-%d %H:%M:%S"),
            status,
            record.file,
            format_bytes(record.size_bytes),
            record.passes,
            record.verified,
            record.strategy
        );
        if let Some(error) = &record.error {
            println!("    {}", error.dimmed());
        }
    }

    if records.is_empty() {
        println!("No audit records in {}", logger.path().display());
    }
    Ok(())
}
