//! CLI entry point for cmd-risk-inspector
//!
//! Provides command-line interface for checking single commands,
//! scanning command lists, an interactive prompt and listing the
//! loaded risk patterns.

use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use colored::*;
use serde::Serialize;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use cmd_risk_inspector::config::{AppConfig, ExplainerSettings};
use cmd_risk_inspector::core::{CommandParser, ParseError, ParsedCommand};
use cmd_risk_inspector::explain::{enrich, Explanation, ExplanationRequest, LocalExplainer};
use cmd_risk_inspector::logging;
use cmd_risk_inspector::risk::{RiskAssessment, RiskDimension, RiskEngine, RiskLevel};

#[derive(Parser)]
#[command(name = "cmd-risk-inspector")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to config file [default: ~/.config/cmd-risk-inspector/config.toml]
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Assess a single command (options go before the command words)
    Check {
        /// Print the report as JSON
        #[arg(long)]
        json: bool,

        /// Command to assess; words are joined with spaces
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        command: Vec<String>,
    },

    /// Assess commands read from stdin, one per line
    Scan {
        /// Print one JSON object per line
        #[arg(long)]
        json: bool,

        /// Only report commands at or above this level
        #[arg(long, default_value = "low")]
        min_level: RiskLevel,
    },

    /// Prompt for commands until quit
    Interactive,

    /// List the loaded risk patterns
    Patterns {
        /// Only show patterns of this dimension
        #[arg(short, long)]
        dimension: Option<RiskDimension>,
    },
}

/// Parser, engine and explanation settings built from the config
struct Inspector {
    parser: CommandParser,
    engine: RiskEngine,
    explainer: LocalExplainer,
    settings: ExplainerSettings,
}

/// Everything known about one command
struct Report {
    parsed: ParsedCommand,
    assessment: RiskAssessment,
    explanation: Option<Explanation>,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    #[serde(flatten)]
    request: ExplanationRequest<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    explanation: Option<&'a Explanation>,
}

impl Inspector {
    fn load(config_path: Option<&PathBuf>) -> anyhow::Result<Self> {
        let config = AppConfig::load(config_path.map(PathBuf::as_path))
            .context("Failed to load configuration")?;
        let engine = config.engine().context("Invalid pattern in configuration")?;

        Ok(Self {
            parser: config.parser(),
            engine,
            explainer: LocalExplainer,
            settings: config.explainer,
        })
    }

    fn inspect(&self, raw: &str) -> Result<Report, ParseError> {
        let parsed = self.parser.parse(raw)?;
        let assessment = self.engine.assess(&parsed);
        let request = ExplanationRequest::new(&parsed, &assessment);
        let explanation = enrich(&self.explainer, &request, &self.settings);

        Ok(Report {
            parsed,
            assessment,
            explanation,
        })
    }
}

impl Report {
    fn to_json(&self) -> anyhow::Result<String> {
        let report = JsonReport {
            request: ExplanationRequest::new(&self.parsed, &self.assessment),
            explanation: self.explanation.as_ref(),
        };
        Ok(serde_json::to_string_pretty(&report)?)
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let inspector = Inspector::load(cli.config.as_ref())?;

    match cli.command {
        Commands::Check { json, command } => check_command(&inspector, &command.join(" "), json)?,
        Commands::Scan { json, min_level } => scan_stdin(&inspector, min_level, json)?,
        Commands::Interactive => run_interactive(&inspector)?,
        Commands::Patterns { dimension } => list_patterns(&inspector, dimension),
    }

    Ok(())
}

/// Assess one command and print the full report
fn check_command(inspector: &Inspector, raw: &str, json: bool) -> anyhow::Result<()> {
    match inspector.inspect(raw) {
        Ok(report) if json => println!("{}", report.to_json()?),
        Ok(report) => print_report(&report),
        Err(e) => {
            eprintln!("{} {}", "✗".red().bold(), e);
            std::process::exit(2);
        }
    }

    Ok(())
}

/// Assess every non-blank stdin line
fn scan_stdin(inspector: &Inspector, min_level: RiskLevel, json: bool) -> anyhow::Result<()> {
    let stdin = io::stdin();
    let mut scanned = 0;
    let mut flagged = 0;

    for line in stdin.lock().lines() {
        let line = line.context("Failed to read stdin")?;
        if line.trim().is_empty() {
            continue;
        }
        scanned += 1;

        let report = match inspector.inspect(&line) {
            Ok(report) => report,
            Err(e) => {
                eprintln!("{} {}: {}", "⚠".yellow(), e, line);
                continue;
            }
        };
        if report.assessment.level < min_level {
            continue;
        }
        flagged += 1;

        if json {
            let request = ExplanationRequest::new(&report.parsed, &report.assessment);
            println!("{}", request.to_json()?);
        } else {
            println!(
                "{} {:>3}  {}",
                level_label(report.assessment.level),
                report.assessment.score,
                report.parsed.raw
            );
        }
    }

    if !json {
        eprintln!(
            "\n{} Scanned {} command{}, {} at or above {}",
            "✓".green(),
            scanned,
            if scanned == 1 { "" } else { "s" },
            flagged,
            min_level
        );
    }

    Ok(())
}

/// Prompt loop; `quit`, `exit`, `q` or end of input leaves
fn run_interactive(inspector: &Inspector) -> anyhow::Result<()> {
    println!("{}", "Command Risk Inspector".bold());
    println!("Type a command to assess it, or 'quit' to leave.\n");

    let stdin = io::stdin();
    let mut input = String::new();

    loop {
        print!("{} ", "cmd>".cyan().bold());
        io::stdout().flush()?;

        input.clear();
        if stdin.lock().read_line(&mut input)? == 0 {
            println!();
            break;
        }

        let line = input.trim();
        match line {
            "" => continue,
            "quit" | "exit" | "q" => break,
            _ => match inspector.inspect(line) {
                Ok(report) => print_report(&report),
                Err(e) => println!("{} {}", "✗".red(), e),
            },
        }
        println!();
    }

    println!("Goodbye!");
    Ok(())
}

/// List all patterns in the loaded library
fn list_patterns(inspector: &Inspector, dimension: Option<RiskDimension>) {
    let patterns: Vec<_> = inspector
        .engine
        .library()
        .iter()
        .filter(|p| dimension.is_none_or(|d| p.dimension == d))
        .collect();

    for pattern in &patterns {
        println!(
            "{:>3}  {}  {}  {}",
            pattern.weight,
            format!("{:<22}", pattern.dimension).magenta(),
            pattern.id.cyan(),
            pattern.description.dimmed()
        );
    }

    println!("\n{} {} patterns", "✓".green(), patterns.len());
}

fn level_label(level: RiskLevel) -> ColoredString {
    let label = format!("{:<8}", level);
    match level {
        RiskLevel::Low => label.green(),
        RiskLevel::Medium => label.yellow(),
        RiskLevel::High => label.red(),
        RiskLevel::Critical => label.white().on_red().bold(),
    }
}

fn print_report(report: &Report) {
    let parsed = &report.parsed;
    let assessment = &report.assessment;

    println!("{} {}", "→".cyan(), parsed.raw.bold());
    println!(
        "  {} {}   {} {}/100   {} {}",
        "Level:".dimmed(),
        level_label(assessment.level),
        "Score:".dimmed(),
        assessment.score,
        "Category:".dimmed(),
        parsed.category
    );

    if let Some(inner) = &parsed.wrapped {
        println!("  {} {}", "Runs:".dimmed(), inner.effective().full_command());
    }
    for next in &parsed.chained {
        println!("  {} {}", "Then:".dimmed(), next.effective().full_command());
    }

    if assessment.is_clean() {
        println!("\n{} {}", "✓".green().bold(), assessment.summary);
    } else {
        println!();
        for factor in &assessment.factors {
            println!(
                "  {} {} {}",
                format!("+{:<3}", factor.weight).yellow(),
                format!("[{}]", factor.dimension).magenta(),
                factor.description
            );
        }
        println!("\n{} {}", "⚠".yellow().bold(), assessment.summary.bold());
    }

    println!("{}", assessment.recommendation().italic());

    if let Some(explanation) = &report.explanation {
        println!("\n{}", "Explanation".bold());
        println!("  {}", explanation.description);
        for warning in &explanation.warnings {
            println!("  {} {}", "•".dimmed(), warning);
        }
    }
}
