use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use continuous_testing::prelude::*;
use regex::Regex;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "continuous-testing")]
#[command(about = "Classify continuous test runs against earlier runs", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarize a single run report
    Summary {
        /// Path to the report file (.json, .yaml or .yml)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Print the run as JSON
        #[arg(long)]
        json: bool,
    },

    /// Replay every report in a directory as consecutive runs
    Replay {
        /// Path to the reports directory
        #[arg(value_name = "DIR")]
        dir: PathBuf,

        /// Path to tracker.yaml config file (default: <DIR>/tracker.yaml)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Only list classes whose name matches this regex
        #[arg(short = 'F', long)]
        filter: Option<String>,

        /// Print the last run as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the dashboard status of the last run as JSON
    Status {
        /// Path to a report file or a reports directory
        #[arg(value_name = "PATH")]
        path: PathBuf,
    },

    /// Validate report files without recording them
    Validate {
        /// Path to a report file or a reports directory
        #[arg(value_name = "PATH")]
        path: PathBuf,
    },
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        "continuous_testing=debug"
    } else {
        "continuous_testing=info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    match run(cli) {
        Ok(success) => {
            if success {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(1)
            }
        }
        Err(e) => {
            tracing::error!(error = %e, "Command failed");
            ExitCode::from(2)
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<bool> {
    match cli.command {
        Commands::Summary { file, json } => summarize(file, json),
        Commands::Replay {
            dir,
            config,
            filter,
            json,
        } => replay(dir, config, filter, json),
        Commands::Status { path } => status(path),
        Commands::Validate { path } => validate(path),
    }
}

fn summarize(file: PathBuf, json: bool) -> anyhow::Result<bool> {
    if !file.exists() {
        anyhow::bail!("Report file not found: {}", file.display());
    }

    let report = ReportLoader::load_file(&file)?;
    let mut tracker = RunTracker::default();
    let results = tracker.record(report)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&RunSnapshot::from(results.as_ref()))?);
    } else {
        print_run_results(&results, None);
    }
    Ok(!results.has_failures())
}

#[tracing::instrument(skip_all, fields(reports_dir = %dir.display()))]
fn replay(
    dir: PathBuf,
    config_path: Option<PathBuf>,
    filter: Option<String>,
    json: bool,
) -> anyhow::Result<bool> {
    if !dir.is_dir() {
        tracing::error!(path = %dir.display(), "Directory not found");
        anyhow::bail!("Directory not found: {}", dir.display());
    }

    let filter = filter.as_deref().map(Regex::new).transpose()?;
    let config = load_config(&dir, config_path)?;
    let reports = ReportLoader::load_directory(&dir)?;
    if reports.is_empty() {
        anyhow::bail!("No reports found in {}", dir.display());
    }

    let mut tracker = RunTracker::new(config);
    if !json {
        println!("Replaying {} reports from: {}\n", reports.len(), dir.display());
    }

    let mut last = None;
    for (path, report) in reports {
        let results = tracker.record(report)?;
        if !json {
            let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
            println!(
                "  Run {:>3} {:<8} {:<30} {} passed, {} failed, {} skipped",
                results.id(),
                if results.is_full() { "full" } else { "partial" },
                name,
                results.current_passed_count(),
                results.current_failed_count(),
                results.current_skipped_count(),
            );
        }
        last = Some(results);
    }

    let Some(results) = last else {
        return Ok(true);
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&RunSnapshot::from(results.as_ref()))?);
    } else {
        print_run_results(&results, filter.as_ref());
    }
    Ok(!results.has_failures())
}

fn status(path: PathBuf) -> anyhow::Result<bool> {
    let reports = load_reports(&path)?;
    let config = if path.is_dir() {
        load_config(&path, None)?
    } else {
        TrackerConfig::default()
    };

    let mut tracker = RunTracker::new(config);
    for (_, report) in reports {
        tracker.record(report)?;
    }

    println!("{}", serde_json::to_string_pretty(&tracker.status())?);
    Ok(!tracker.latest().is_some_and(|run| run.has_failures()))
}

fn validate(path: PathBuf) -> anyhow::Result<bool> {
    let files = if path.is_dir() {
        ReportLoader::report_files(&path)?
    } else if path.exists() {
        vec![path]
    } else {
        anyhow::bail!("Path not found: {}", path.display());
    };

    let mut valid = 0;
    for file in &files {
        match ReportLoader::load_file(file) {
            Ok(report) => {
                let tests: usize = report.classes.iter().map(|c| c.tests.len()).sum();
                println!(
                    "✓ {} ({} classes, {} tests)",
                    file.display(),
                    report.classes.len(),
                    tests
                );
                valid += 1;
            }
            Err(e) => println!("✗ {}: {}", file.display(), e),
        }
    }

    println!("\n{} of {} reports valid", valid, files.len());
    Ok(valid == files.len())
}

fn load_reports(path: &Path) -> anyhow::Result<Vec<(PathBuf, RunReport)>> {
    if path.is_dir() {
        Ok(ReportLoader::load_directory(path)?)
    } else if path.exists() {
        Ok(vec![(path.to_path_buf(), ReportLoader::load_file(path)?)])
    } else {
        anyhow::bail!("Path not found: {}", path.display())
    }
}

fn load_config(dir: &Path, config_path: Option<PathBuf>) -> anyhow::Result<TrackerConfig> {
    let config_file = config_path.unwrap_or_else(|| dir.join("tracker.yaml"));
    if config_file.exists() {
        tracing::debug!(path = %config_file.display(), "Using tracker config");
        Ok(TrackerConfig::load(&config_file)?)
    } else {
        Ok(TrackerConfig::default())
    }
}

fn matches_filter(filter: Option<&Regex>, class: &TestClassResult) -> bool {
    filter.map_or(true, |re| re.is_match(class.class_name()))
}

fn print_run_results(results: &TestRunResults, filter: Option<&Regex>) {
    println!("\n=== Run {} Results ===\n", results.id());
    println!("Mode: {}", if results.is_full() { "full" } else { "partial" });
    if let Some(trigger) = results.trigger() {
        let touched: Vec<_> = trigger.touched_class_names().into_iter().collect();
        if !touched.is_empty() {
            println!("Triggered by: {}", touched.join(", "));
        }
    }
    println!("Time: {}ms", results.total_time().num_milliseconds());
    println!(
        "This run: {} passed, {} failed, {} skipped",
        results.current_passed_count(),
        results.current_failed_count(),
        results.current_skipped_count()
    );
    println!(
        "Overall:  {} passed, {} failed, {} skipped\n",
        results.passed_count(),
        results.failed_count(),
        results.skipped_count()
    );

    for class in results.failing().iter().filter(|c| matches_filter(filter, c)) {
        println!("✗ {}{}", class.class_name(), historic_marker(results, class));
        for outcome in class.failing().iter().filter(|o| o.is_test()) {
            println!("    ✗ {}", outcome.display_name);
            if let Some(problem) = outcome.problems.first() {
                println!("        {}", problem.lines().next().unwrap_or(""));
            }
        }
    }
    for class in results.passing().iter().filter(|c| matches_filter(filter, c)) {
        println!("✓ {}{}", class.class_name(), historic_marker(results, class));
    }
    for class in results.skipped().iter().filter(|c| matches_filter(filter, c)) {
        println!("- {} (skipped)", class.class_name());
    }
}

fn historic_marker(results: &TestRunResults, class: &TestClassResult) -> String {
    if class.latest_run_id() == results.id() {
        String::new()
    } else {
        format!(" (from run {})", class.latest_run_id())
    }
}
