//! # Harden CLI
//!
//! Runs a CIS hardening profile against the host in preview or apply mode.

use clap::Parser;
use harden_base::config::HardeningConfig;
use harden_base::execution::{RootPrivilege, RunContext, RunMode};
use harden_base::config::LoggingPreferences;
use harden_base::logging::{codes, LogCrateLogger, LogLevel, Logger, LoggingService};
use harden_base::results::Report;
use harden_base::{log_error, log_info, log_success, log_warning};
use harden_sdk::commands::create_oel9_command_runner;
use harden_sdk::{create_module_registry, create_orchestrator, create_profile_catalog, profiles};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

const EXIT_FAILED: u8 = 1;
const EXIT_CONFIG: u8 = 3;

#[derive(Debug, Parser)]
#[command(
    name = "harden",
    version,
    about = "CIS Oracle Linux 9 hardening tool",
    after_help = "Examples:\n  sudo harden --profile l2-server --dry-run --report /tmp/report.json\n  sudo harden --profile l2-server --apply --report /tmp/report.json"
)]
struct Cli {
    /// Hardening profile
    #[arg(long, default_value = profiles::L1_SERVER)]
    profile: String,

    /// Configuration file
    #[arg(long, default_value = "harden.toml")]
    config: PathBuf,

    /// Report intended changes without applying them (default)
    #[arg(long, conflicts_with_all = ["apply", "verify"])]
    dry_run: bool,

    /// Apply hardening
    #[arg(long, conflicts_with = "verify")]
    apply: bool,

    /// Verify compliance without applying changes
    #[arg(long)]
    verify: bool,

    /// Save the JSON report to this path (printed to stdout when omitted)
    #[arg(long)]
    report: Option<PathBuf>,

    /// Filesystem root the modules operate under
    #[arg(long, default_value = "/")]
    root: PathBuf,

    /// Logging level (error, warn, info, debug)
    #[arg(long, value_parser = parse_log_level)]
    log_level: Option<LogLevel>,

    /// Emit log events as JSON lines
    #[arg(long)]
    structured_logs: bool,

    /// Persistent log file; pass an empty string to disable
    #[arg(long)]
    log_file: Option<String>,

    /// List registered modules and exit
    #[arg(long)]
    list_modules: bool,

    /// List profiles and exit
    #[arg(long)]
    list_profiles: bool,
}

impl Cli {
    fn mode(&self) -> RunMode {
        if self.apply {
            RunMode::Apply
        } else {
            RunMode::Preview
        }
    }
}

fn parse_log_level(value: &str) -> Result<LogLevel, String> {
    LogLevel::parse(value).ok_or_else(|| format!("unknown log level '{}'", value))
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let registry = match create_module_registry() {
        Ok(registry) => registry,
        Err(e) => {
            eprintln!("ERROR: failed to build module registry: {}", e);
            return ExitCode::from(EXIT_FAILED);
        }
    };
    let catalog = match create_profile_catalog() {
        Ok(catalog) => catalog,
        Err(e) => {
            eprintln!("ERROR: failed to build profile catalog: {}", e);
            return ExitCode::from(EXIT_FAILED);
        }
    };

    if cli.list_modules {
        for name in registry.list_modules() {
            let description = registry.get(name).map(|m| m.description()).unwrap_or_default();
            println!("{:14} {}", name, description);
        }
        return ExitCode::SUCCESS;
    }
    if cli.list_profiles {
        for profile in catalog.iter() {
            println!("{:12} {}", profile.name(), profile.description());
            println!("             {}", profile.modules().join(", "));
        }
        return ExitCode::SUCCESS;
    }

    // Configuration: file over environment defaults, CLI flags over both
    let (config, config_found) = match HardeningConfig::load(&cli.config) {
        Ok(Some(config)) => (config, true),
        Ok(None) => (HardeningConfig::default(), false),
        Err(e) => {
            eprintln!("ERROR: {}", e);
            return ExitCode::from(EXIT_CONFIG);
        }
    };
    let mut logging = match config.logging_preferences() {
        Ok(preferences) => preferences,
        Err(e) => {
            eprintln!("ERROR: {}", e);
            return ExitCode::from(EXIT_CONFIG);
        }
    };
    if let Some(level) = cli.log_level {
        logging.min_level = level;
    }
    logging.structured |= cli.structured_logs;
    if let Some(file) = &cli.log_file {
        logging.file = Some(PathBuf::from(file)).filter(|p| !p.as_os_str().is_empty());
    }

    let (service, file_error) = init_logging(&logging);
    let logger = Arc::new(service);
    if let (Some(path), Some(e)) = (&logging.file, file_error) {
        log_warning!(logger, code = codes::system::LOG_FILE_UNAVAILABLE,
            "Log file unavailable, logging to console only", "path" => path.display(), "error" => e);
    }

    if config_found {
        log_info!(logger, "Loaded configuration", "path" => cli.config.display());
    } else {
        log_warning!(logger, code = codes::config::CONFIG_NOT_FOUND,
            "Config file not found, using defaults", "path" => cli.config.display());
    }

    let profile = match catalog.get(&cli.profile) {
        Ok(profile) => profile,
        Err(e) => {
            log_error!(logger, codes::config::CONFIG_INVALID, "Unknown profile",
                "profile" => cli.profile, "available" => catalog.names().join(", "));
            eprintln!("ERROR: {}", e);
            return ExitCode::from(EXIT_CONFIG);
        }
    };

    let runner_preferences = match config.runner_preferences() {
        Ok(preferences) => preferences,
        Err(e) => {
            log_error!(logger, codes::config::CONFIG_INVALID, "Invalid runner configuration", "error" => e);
            eprintln!("ERROR: {}", e);
            return ExitCode::from(EXIT_CONFIG);
        }
    };

    let mut runner = create_oel9_command_runner(runner_preferences.timeout);
    runner.allow_command(runner_preferences.package_manager.clone());

    if !cli.dry_run && !cli.apply && !cli.verify {
        log_info!(logger, "No mode specified; defaulting to --dry-run");
    }

    let ctx = RunContext::new(cli.mode(), profile.name(), Arc::new(runner), logger.clone())
        .with_root(&cli.root)
        .with_package_manager(runner_preferences.package_manager);

    let orchestrator = create_orchestrator(&registry).with_precondition(Box::new(RootPrivilege));
    let outcome = match orchestrator.run(profile, &config, &ctx) {
        Ok(outcome) => outcome,
        Err(e) => {
            eprintln!("ERROR: {}", e.user_message());
            return ExitCode::from(e.exit_code() as u8);
        }
    };
    let report = outcome.report;

    print_summary(&report);
    print_results(&report);

    match &cli.report {
        Some(path) => write_report(&logger, &report, path),
        None => match report.to_json() {
            Ok(json) => println!("{}", json),
            Err(e) => {
                log_error!(logger, codes::system::REPORT_WRITE_FAILED, "Failed to render report", "error" => e);
            }
        },
    }

    if report.ok() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(EXIT_FAILED)
    }
}

/// Structured events go straight to stdout/stderr; plain events go through
/// `log` once env_logger is installed
fn init_logging(preferences: &LoggingPreferences) -> (LoggingService, Option<std::io::Error>) {
    let console: Option<Arc<dyn Logger>> = if !preferences.structured && init_env_logger(preferences.min_level) {
        Some(Arc::new(LogCrateLogger))
    } else {
        None
    };
    LoggingService::from_preferences(preferences, console)
}

fn init_env_logger(level: LogLevel) -> bool {
    let filter = match level {
        LogLevel::Error => log::LevelFilter::Error,
        LogLevel::Warning => log::LevelFilter::Warn,
        LogLevel::Info => log::LevelFilter::Info,
        LogLevel::Debug => log::LevelFilter::Debug,
    };
    env_logger::Builder::new()
        .filter_level(filter)
        .format_target(false)
        .parse_default_env()
        .try_init()
        .is_ok()
}

fn write_report(logger: &LoggingService, report: &Report, path: &Path) {
    let written = report
        .to_json()
        .map_err(|e| e.to_string())
        .and_then(|json| {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent).map_err(|e| e.to_string())?;
            }
            std::fs::write(path, json).map_err(|e| e.to_string())
        });

    match written {
        Ok(()) => {
            log_success!(logger, codes::success::REPORT_WRITTEN, "Report saved", "path" => path.display());
        }
        Err(e) => {
            log_error!(logger, codes::system::REPORT_WRITE_FAILED, "Failed to save report",
                "path" => path.display(), "error" => e);
        }
    }
}

fn print_summary(report: &Report) {
    let summary = report.summary();
    let rule = "=".repeat(60);

    println!("\n{}", rule);
    println!("CIS {} Hardening Report", report.profile().to_uppercase());
    println!("{}", rule);
    println!("Total Controls:        {}", summary.total);
    println!("Passed:                {}", summary.passed);
    println!("Failed:                {}", summary.failed);
    println!("Compliance:            {:.1}%", summary.compliance);
    println!(
        "Overall Status:        {}",
        if report.ok() { "✅ PASS" } else { "❌ FAIL" }
    );
    println!("{}\n", rule);

    if !report.is_preview() {
        let remediation = report.remediation();
        println!("Remediation Summary:");
        println!("  Remediated:          {}", remediation.remediated);
        println!("  Already Compliant:   {}", remediation.already_compliant);
        println!("  Failed:              {}", remediation.failed);
        println!("{}\n", rule);
    }

    if !report.module_failures().is_empty() {
        println!("Module Failures:");
        for failure in report.module_failures() {
            println!("  ❌ {:20} {}", failure.module, failure.error);
        }
        println!();
    }
}

fn print_results(report: &Report) {
    println!("Control Results:");
    for record in report.results() {
        let status = if record.ok() { "✅" } else { "❌" };
        let changed = if record.changed() { "*" } else { " " };
        println!("  {} {} {:20} {}", status, changed, record.id(), record.title());
    }
}
