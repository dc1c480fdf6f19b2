//! oaa-eval
//!
//! Evaluate an HTML file against an accessibility ruleset and print the
//! result as JSON.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use oaa_engine::EvaluatorFactory;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "oaa-eval")]
#[command(version, about, long_about = None)]
struct Cli {
    /// HTML file to evaluate
    file: PathBuf,

    /// URL the document is treated as loaded from
    #[arg(long, default_value = "about:blank")]
    url: String,

    /// Ruleset id (defaults to the first loaded ruleset)
    #[arg(long)]
    ruleset: Option<String>,

    /// Rule group mask, 1 to 7
    #[arg(long)]
    groups: Option<String>,

    /// fae-util, firefox or none
    #[arg(long)]
    event_processing: Option<String>,

    #[arg(long)]
    broken_link_testing: bool,

    /// Include per-element results
    #[arg(long, short = 'e')]
    element_results: bool,

    #[arg(long)]
    pretty: bool,

    /// Enable debug logging
    #[arg(long, short)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let html = std::fs::read_to_string(&cli.file)
        .with_context(|| format!("reading {}", cli.file.display()))?;

    let mut factory = EvaluatorFactory::new()?;
    if let Some(ruleset) = &cli.ruleset {
        factory.set_parameter("ruleset", ruleset)?;
    }
    if let Some(groups) = &cli.groups {
        factory.set_feature("groups", groups)?;
    }
    if let Some(mode) = &cli.event_processing {
        factory.set_feature("eventprocessing", mode)?;
    }
    if cli.broken_link_testing {
        factory.set_feature("brokenlinktesting", "true")?;
    }

    let evaluator = factory.new_evaluator()?;
    let result = evaluator
        .evaluate_html(&html, &cli.url)
        .with_context(|| format!("parsing {}", cli.file.display()))?;

    let summary = result.all_rules().summary().to_owned();
    tracing::info!(
        rules = result.rule_results().len(),
        violations = summary.violations,
        warnings = summary.warnings,
        score = summary.implementation_score,
        "evaluated {}",
        result.url()
    );

    let json = if cli.pretty {
        result.to_json_pretty(cli.element_results)?
    } else {
        result.to_json(cli.element_results)?
    };
    println!("{json}");
    Ok(())
}
