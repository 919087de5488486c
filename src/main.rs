// SPDX-License-Identifier: PMPL-1.0-or-later
//! a11y-lens CLI - scan documents for WCAG issues and export highlight overlays

use a11y_lens::config::{self, Config};
use a11y_lens::issue::WcagLevel;
use a11y_lens::report::{generate_report, OutputFormat, ScanReport};
use a11y_lens::rules::RuleRegistry;
use a11y_lens::scanner::{self, Scanner};
use a11y_lens::session::Session;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// WCAG scan-and-highlight pipeline
#[derive(Parser)]
#[command(name = "a11y-lens")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Configuration file (YAML or TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan every HTML document and JSON snapshot in a directory
    Check {
        /// Directory to scan
        dir: PathBuf,

        /// WCAG conformance level (overrides the configuration)
        #[arg(long)]
        level: Option<WcagLevelArg>,

        /// Output format
        #[arg(long, default_value = "text")]
        format: FormatArg,

        /// Output file (stdout if not specified)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Scan a single document
    Analyze {
        /// HTML file or JSON snapshot
        file: PathBuf,

        /// WCAG conformance level (overrides the configuration)
        #[arg(long)]
        level: Option<WcagLevelArg>,

        /// Output format
        #[arg(long, default_value = "text")]
        format: FormatArg,
    },

    /// Generate a SARIF report for a directory
    Report {
        /// Directory to scan
        dir: PathBuf,

        /// WCAG conformance level (overrides the configuration)
        #[arg(long)]
        level: Option<WcagLevelArg>,

        /// Output file (stdout if not specified)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// List the registered rules
    Rules {
        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Scan a document and print the overlay layer as JSON
    Highlight {
        /// HTML file or JSON snapshot
        file: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Write a default configuration file
    InitConfig {
        /// Destination (defaults to .a11y-lens.yml)
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// WCAG conformance level CLI argument
#[derive(Debug, Clone, Copy, ValueEnum)]
enum WcagLevelArg {
    /// Level A - minimum
    A,
    /// Level AA - standard
    Aa,
    /// Level AAA - enhanced
    Aaa,
}

impl From<WcagLevelArg> for WcagLevel {
    fn from(arg: WcagLevelArg) -> Self {
        match arg {
            WcagLevelArg::A => WcagLevel::A,
            WcagLevelArg::Aa => WcagLevel::AA,
            WcagLevelArg::Aaa => WcagLevel::AAA,
        }
    }
}

/// Output format CLI argument
#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    /// Human-readable text
    Text,
    /// Structured JSON
    Json,
    /// SARIF for IDE/CI
    Sarif,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Text => OutputFormat::Text,
            FormatArg::Json => OutputFormat::Json,
            FormatArg::Sarif => OutputFormat::Sarif,
        }
    }
}

fn init_logging(verbose: bool, level: &str) {
    let filter = if verbose {
        EnvFilter::new("a11y_lens=debug")
    } else {
        EnvFilter::new(format!("a11y_lens={}", level))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(config::default_config_path);
    let mut config = config::load_config(&config_path)?;
    init_logging(cli.verbose, &config.log.level);

    match cli.command {
        Commands::Check { dir, level, format, output } => {
            apply_level(&mut config, level);
            let reports = Scanner::new(config)?.scan_directory(&dir)?;
            write_output(&generate_report(&reports, format.into()), output.as_deref())?;
            exit_on_critical(&reports);
        }

        Commands::Analyze { file, level, format } => {
            apply_level(&mut config, level);
            let report = Scanner::new(config)?.scan_file(&file)?;
            let reports = [report];
            println!("{}", generate_report(&reports, format.into()));
            exit_on_critical(&reports);
        }

        Commands::Report { dir, level, output } => {
            apply_level(&mut config, level);
            let reports = Scanner::new(config)?.scan_directory(&dir)?;
            write_output(&generate_report(&reports, OutputFormat::Sarif), output.as_deref())?;
        }

        Commands::Rules { json } => {
            let registry = RuleRegistry::builtin()?;
            if json {
                let metas: Vec<_> = registry.rules().iter().map(|r| &r.meta).collect();
                println!("{}", serde_json::to_string_pretty(&metas)?);
            } else {
                print_rules(&registry);
            }
        }

        Commands::Highlight { file, output } => {
            let tree = scanner::load_document(&file)?;
            let mut session = Session::new(config)?;
            let layer = session.scan_and_highlight(&tree);
            write_output(&serde_json::to_string_pretty(layer)?, output.as_deref())?;
        }

        Commands::InitConfig { path, force } => {
            let path = path.unwrap_or_else(config::default_config_path);
            if path.exists() && !force {
                anyhow::bail!("{} already exists (use --force to overwrite)", path.display());
            }
            config::write_default_config(&path)?;
            eprintln!("Configuration written to {}", path.display());
        }
    }

    Ok(())
}

fn apply_level(config: &mut Config, level: Option<WcagLevelArg>) {
    if let Some(level) = level {
        config.level = level.into();
    }
}

fn exit_on_critical(reports: &[ScanReport]) {
    if reports.iter().any(ScanReport::blocks_release) {
        std::process::exit(1);
    }
}

fn print_rules(registry: &RuleRegistry) {
    println!("{:<20} {:<10} {:<10} {:<8} NAME", "ID", "SEVERITY", "WCAG", "LEVEL");
    for rule in registry.rules() {
        let meta = &rule.meta;
        println!(
            "{:<20} {:<10} {:<10} {:<8} {}",
            meta.id,
            meta.severity.as_str(),
            meta.wcag_criteria.join(","),
            meta.wcag_level.to_string(),
            meta.name
        );
    }
}

/// Write output to file or stdout
fn write_output(content: &str, path: Option<&Path>) -> anyhow::Result<()> {
    match path {
        Some(p) => {
            std::fs::write(p, content)?;
            eprintln!("Report written to {}", p.display());
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
