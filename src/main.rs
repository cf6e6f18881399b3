//! CLI entry point for `classfetch`.

use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::{CommandFactory, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};

use classfetch::config::{self, Config};
use classfetch::pipeline::{download, extract};

#[derive(Parser)]
#[command(
    name = "classfetch",
    version,
    about = "Extract student assignment submissions from exported class reports"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Verbose logging (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Write one submissions CSV per report, plus summary CSVs
    Extract {
        /// Folder containing exported *.json reports
        #[arg(value_name = "INPUT")]
        input: Option<PathBuf>,
        /// Output folder for the CSVs
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Skip summary.csv and detailed_summary.csv
        #[arg(long)]
        no_summary: bool,
    },
    /// Download every submitted attachment into a per-class/per-student tree
    Download {
        /// Folder containing exported *.json reports
        #[arg(value_name = "INPUT")]
        input: Option<PathBuf>,
        /// Root folder for downloaded files
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Inspect or create the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
    /// Generate a man page
    Manpage,
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Write the default configuration to the standard location
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
    /// Print the configuration file path
    Path,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let (config, config_source) = config::load_config();

    let log_level = match cli.verbose {
        0 => config.general.log_level.as_str(),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    setup_logging(log_level, &config);

    // Emitted only now that the subscriber is installed.
    match &config_source {
        config::ConfigSource::File(path) => {
            tracing::info!(path = %path.display(), "Loaded config");
        }
        config::ConfigSource::Fallback { path, reason } => {
            tracing::warn!(path = %path.display(), reason = %reason, "Failed to load config, using defaults");
        }
        config::ConfigSource::Default => {}
    }

    match cli.command {
        Some(Commands::Extract {
            input,
            output,
            no_summary,
        }) => cmd_extract(&config, input.as_deref(), output.as_deref(), !no_summary),
        Some(Commands::Download { input, output }) => {
            cmd_download(&config, input.as_deref(), output.as_deref())
        }
        // Bare invocation behaves like `extract` with configured folders.
        None => cmd_extract(&config, None, None, true),
        Some(Commands::Config { action }) => cmd_config(action),
        Some(Commands::Completions { shell }) => cmd_completions(shell),
        Some(Commands::Manpage) => cmd_manpage(),
    }
}

/// Set up tracing with stderr output and optional file logging.
fn setup_logging(level: &str, config: &Config) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    let log_dir = config::cache_dir(config);
    if std::fs::create_dir_all(&log_dir).is_ok() {
        let file_appender = tracing_appender::rolling::never(&log_dir, "classfetch.log");
        let file_layer = tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .with_writer(file_appender);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(stderr_layer)
            .with(file_layer)
            .init();
    } else {
        // Fall back to stderr only
        tracing_subscriber::registry()
            .with(env_filter)
            .with(stderr_layer)
            .init();
    }
}

/// Inspect or create the configuration file.
fn cmd_config(action: ConfigAction) -> anyhow::Result<()> {
    let path = config::config_file_path()
        .ok_or_else(|| anyhow::anyhow!("Could not determine config file path"))?;

    match action {
        ConfigAction::Init { force } => {
            if path.exists() && !force {
                anyhow::bail!(
                    "Config file already exists: {} (use --force to overwrite)",
                    path.display()
                );
            }
            config::save_config(&Config::default(), &path)?;
            println!("Wrote {}", path.display());
        }
        ConfigAction::Path => println!("{}", path.display()),
    }
    Ok(())
}

/// Generate shell completions and print to stdout.
fn cmd_completions(shell: clap_complete::Shell) -> anyhow::Result<()> {
    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, "classfetch", &mut std::io::stdout());
    Ok(())
}

/// Generate a man page and print to stdout.
fn cmd_manpage() -> anyhow::Result<()> {
    let cmd = Cli::command();
    let man = clap_mangen::Man::new(cmd);
    let mut buf = Vec::new();
    man.render(&mut buf)?;
    std::io::Write::write_all(&mut std::io::stdout(), &buf)?;
    Ok(())
}

fn batch_progress_bar(label: &str) -> ProgressBar {
    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(&format!(
                "{{spinner:.green}} {label} [{{bar:40.cyan/blue}}] {{pos}}/{{len}} {{msg}}"
            ))
            .expect("valid template")
            .progress_chars("#>-"),
    );
    pb
}

/// Run the extract pipeline and print the result table.
fn cmd_extract(
    config: &Config,
    input: Option<&Path>,
    output: Option<&Path>,
    write_summaries: bool,
) -> anyhow::Result<()> {
    let input = input.unwrap_or(&config.folders.rawdata);
    let output = output.unwrap_or(&config.folders.results);

    if !input.exists() {
        anyhow::bail!("Input folder not found: {}", input.display());
    }

    let pb = batch_progress_bar("Extracting");
    let start = Instant::now();

    let run = extract::run_extract(input, output, write_summaries, &|current, total, name| {
        pb.set_length(total as u64);
        pb.set_position(current as u64);
        pb.set_message(name.to_string());
    })?;

    pb.finish_and_clear();
    let elapsed = start.elapsed();

    println!();
    println!("  Extraction complete:");
    println!("  {:<25} {}", "Report files", run.outcomes.len());
    println!("  {:<25} {}", "Files with data", run.successful_files());
    println!("  {:<25} {}", "Students", run.total_students());
    println!("  {:<25} {}", "Submissions", run.total_submissions());
    println!("  {:<25} {:.2?}", "Elapsed", elapsed);
    println!("  {:<25} {}", "Output folder", output.display());
    if write_summaries {
        println!(
            "  {:<25} {}",
            "Summary files",
            "summary.csv, detailed_summary.csv"
        );
    }
    println!();

    Ok(())
}

/// Run the download pipeline and print the result table.
fn cmd_download(
    config: &Config,
    input: Option<&Path>,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    use humansize::{format_size, BINARY};

    let input = input.unwrap_or(&config.folders.rawdata);
    let output = output.unwrap_or(&config.folders.downloads);

    if !input.exists() {
        anyhow::bail!("Input folder not found: {}", input.display());
    }

    let pb = batch_progress_bar("Downloading");
    let start = Instant::now();

    let stats = download::run_download(config, input, output, &|current, total, name| {
        pb.set_length(total as u64);
        pb.set_position(current as u64);
        pb.set_message(name.to_string());
    })?;

    pb.finish_and_clear();
    let elapsed = start.elapsed();

    println!();
    println!("  Download complete:");
    println!("  {:<25} {}", "Students with files", stats.students_processed);
    println!("  {:<25} {}", "Download attempts", stats.total_files);
    println!("  {:<25} {}", "Successful", stats.successful_downloads);
    println!("  {:<25} {}", "Failed", stats.failed_downloads);
    println!("  {:<25} {}", "Invalid URLs skipped", stats.invalid_urls);
    if stats.total_files > 0 {
        println!("  {:<25} {:.1}%", "Success rate", stats.success_rate());
    }
    println!(
        "  {:<25} {}",
        "Bytes written",
        format_size(stats.bytes_written, BINARY)
    );
    println!("  {:<25} {:.2?}", "Elapsed", elapsed);
    println!("  {:<25} {}", "Output folder", output.display());
    println!();

    // Partial failures are reported in the table above but never change the
    // exit status; the batch itself completed.
    Ok(())
}
