// roleaudit - EPGA role / Active Directory outlier audit

mod exit_codes;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};

use roleaudit_analysis::config::AuditConfig;
use roleaudit_analysis::model::{AuditInput, AuditResult};
use roleaudit_analysis::table::{load_directory_records, load_role_records, Table};

use exit_codes::{EXIT_CONFIG, EXIT_INPUT, EXIT_REPORT, EXIT_SUCCESS, EXIT_USAGE};

#[derive(Parser)]
#[command(name = "roleaudit")]
#[command(about = "Reconcile EPGA role exports against Active Directory and flag outlier responsibilities")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the audit and write the Excel report
    #[command(after_help = "\
Examples:
  roleaudit run --epga roles.xlsx --directory ad_export.csv
  roleaudit run --epga roles.xlsx --directory ad_export.csv --threshold 5
  roleaudit run --epga roles.xlsx --directory ad.csv -o q3_audit --json
  roleaudit run --epga roles.xlsx --directory ad.csv --config audit.toml --no-report")]
    Run(RunArgs),

    /// Check a config file and print the resolved settings
    #[command(after_help = "\
Examples:
  roleaudit validate audit.toml")]
    Validate {
        /// Config file (TOML)
        config: PathBuf,
    },
}

#[derive(Args)]
struct RunArgs {
    /// EPGA role export (.xlsx assumed when the extension is missing)
    #[arg(long)]
    epga: PathBuf,

    /// Active Directory export (.csv assumed when the extension is missing)
    #[arg(long)]
    directory: PathBuf,

    /// Outlier threshold as a percentage (e.g. 7 means 7%).
    /// Empty or unparsable values fall back to the configured default.
    #[arg(long)]
    threshold: Option<String>,

    /// Config file (TOML). Every key is optional.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Sheet name within the EPGA workbook (first sheet if omitted)
    #[arg(long)]
    sheet: Option<String>,

    /// Report output path (.xlsx appended if missing)
    #[arg(long, short = 'o', default_value = "analysis")]
    output: PathBuf,

    /// Print the full result as JSON on stdout
    #[arg(long)]
    json: bool,

    /// Also write the full result as JSON to a file
    #[arg(long, value_name = "PATH")]
    output_json: Option<PathBuf>,

    /// Skip the Excel report (useful with --json)
    #[arg(long)]
    no_report: bool,

    /// Suppress the run summary on stderr
    #[arg(long, short = 'q')]
    quiet: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        None => {
            eprintln!("Usage: roleaudit <command> [options]");
            eprintln!("       roleaudit --help for more information");
            Ok(())
        }
        Some(Commands::Run(args)) => cmd_run(&args),
        Some(Commands::Validate { config }) => cmd_validate(&config),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn args(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn input(msg: impl Into<String>) -> Self {
        Self { code: EXIT_INPUT, message: msg.into(), hint: None }
    }

    pub fn report(msg: impl Into<String>) -> Self {
        Self { code: EXIT_REPORT, message: msg.into(), hint: None }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self { code: EXIT_CONFIG, message: msg.into(), hint: None }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

// ============================================================================
// run
// ============================================================================

fn cmd_run(args: &RunArgs) -> Result<(), CliError> {
    let config = load_config(args.config.as_deref())?;

    let epga_path = ensure_extension(&args.epga, "xlsx");
    let directory_path = ensure_extension(&args.directory, "csv");
    let roles_table = load_table(&epga_path, args.sheet.as_deref())?;
    let directory_table = load_table(&directory_path, None)?;

    let input = AuditInput {
        roles: load_role_records(&roles_table, &config.role_columns)
            .map_err(|e| CliError::input(e.to_string()))?,
        directory: load_directory_records(&directory_table, &config.directory_columns)
            .map_err(|e| CliError::input(e.to_string()))?,
    };

    // An absent --threshold means "use the config default" without the
    // defaulting warning an unparsable value would produce.
    let raw_threshold = match &args.threshold {
        Some(value) => value.clone(),
        None => format!("{}", config.default_threshold_percent),
    };

    let result = roleaudit_analysis::run(&config, &input, &raw_threshold);

    for diagnostic in &result.diagnostics {
        eprintln!("warning: {diagnostic}");
    }

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .map_err(|e| CliError::report(format!("cannot serialize result: {e}")))?;
        println!("{json}");
    }
    if let Some(path) = &args.output_json {
        let json = serde_json::to_string_pretty(&result)
            .map_err(|e| CliError::report(format!("cannot serialize result: {e}")))?;
        std::fs::write(path, json)
            .map_err(|e| CliError::report(format!("cannot write {}: {e}", path.display())))?;
    }

    let report_path = if args.no_report {
        None
    } else {
        let path = ensure_extension(&args.output, "xlsx");
        roleaudit_report::write_report(&path, &result).map_err(CliError::report)?;
        Some(path)
    };

    if !args.quiet {
        print_summary(&result, report_path.as_deref());
    }
    Ok(())
}

fn print_summary(result: &AuditResult, report_path: Option<&Path>) {
    let s = &result.summary;
    eprintln!(
        "{} matched records ({} role rows and {} directory rows unmatched)",
        s.canonical_records, s.role_rows_dropped, s.directory_rows_dropped
    );
    eprintln!(
        "{} groups at threshold {:.2}%: {} outlier ({} users), {} non-outlier",
        s.groups,
        result.meta.threshold * 100.0,
        s.outlier_groups,
        s.outlier_users,
        s.non_outlier_groups
    );

    if !result.outliers.is_empty() {
        eprintln!("outliers:");
        for row in &result.outliers {
            eprintln!(
                "  {:<12} {:<20} {:<24} {:<32} {:>6.2}%",
                row.user_name, row.department, row.job_title, row.responsibility_name, row.percentage
            );
        }
    }
    if !result.non_outliers.is_empty() {
        eprintln!("non-outliers:");
        for row in &result.non_outliers {
            eprintln!(
                "  {:<20} {:<24} {:<32} {:>6.2}%",
                row.department, row.job_title, row.responsibility_name, row.percentage
            );
        }
    }

    if let Some(path) = report_path {
        eprintln!("report: {}", path.display());
    }
}

// ============================================================================
// validate
// ============================================================================

fn cmd_validate(path: &Path) -> Result<(), CliError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| CliError::args(format!("cannot read {}: {e}", path.display())))?;
    let config = AuditConfig::from_toml(&content).map_err(|e| CliError::config(e.to_string()))?;

    println!("{}: ok", path.display());
    println!("  name: {}", config.name);
    println!("  default threshold: {}%", config.default_threshold_percent);
    println!(
        "  display-name key office: {}",
        config.normalizer.display_name_key_office
    );
    Ok(())
}

// ============================================================================
// helpers
// ============================================================================

fn load_config(path: Option<&Path>) -> Result<AuditConfig, CliError> {
    match path {
        None => Ok(AuditConfig::default()),
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .map_err(|e| CliError::args(format!("cannot read {}: {e}", path.display())))?;
            AuditConfig::from_toml(&content).map_err(|e| {
                CliError::config(e.to_string())
                    .with_hint(format!("check {} against `roleaudit validate`", path.display()))
            })
        }
    }
}

/// Load an input table, choosing the reader by file extension.
fn load_table(path: &Path, sheet: Option<&str>) -> Result<Table, CliError> {
    let result = if is_spreadsheet(path) {
        match sheet {
            Some(name) => roleaudit_io::xlsx::read_table_from_sheet(path, name),
            None => roleaudit_io::xlsx::read_table(path),
        }
    } else {
        if sheet.is_some() {
            return Err(
                CliError::args(format!("--sheet does not apply to {}", path.display()))
                    .with_hint("sheet selection is only meaningful for spreadsheet files"),
            );
        }
        roleaudit_io::csv::read_table(path)
    };
    result.map_err(CliError::input)
}

fn is_spreadsheet(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some(ext) if matches!(
            ext.to_ascii_lowercase().as_str(),
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods"
        )
    )
}

/// Append the extension when the user gave a bare name like `q3_audit`.
fn ensure_extension(path: &Path, extension: &str) -> PathBuf {
    if path.extension().is_some() {
        path.to_path_buf()
    } else {
        path.with_extension(extension)
    }
}
