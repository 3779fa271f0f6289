//! cardiorisk - heart disease risk estimate from thirteen clinical fields
//!
//! ## Commands
//!
//! - `fields`: list the input fields in payload order
//! - `predict`: score values given as `--set key=value` and/or `--input file.json`
//! - `prompt`: fill the form interactively from stdin
//!
//! Without `--backend-url` (or `CARDIORISK_BACKEND_URL`) the score comes from
//! a fixed placeholder formula, not a model.

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{warn, Level};

use cardiorisk_core::{
    build_scorer, render_bar, schema, FormValues, PredictionResult, RiskScorer, RiskView,
    ScoringConfig, SubmissionController, DISCLAIMERS,
};

#[derive(Parser)]
#[command(name = "cardiorisk")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Heart disease risk estimate from clinical measurements", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    /// Scoring backend base URL, overriding CARDIORISK_BACKEND_URL
    /// (empty selects the placeholder score)
    #[arg(long, global = true)]
    backend_url: Option<String>,

    /// Ignore HTTP_PROXY/HTTPS_PROXY when calling the backend
    #[arg(long, global = true)]
    no_proxy: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List input fields in payload order
    Fields {
        /// Print the schema as JSON
        #[arg(long)]
        json_output: bool,
    },

    /// Score one record
    Predict {
        /// Field value as key=value (repeatable)
        #[arg(short, long = "set", value_parser = parse_key_value)]
        set: Vec<(String, String)>,

        /// JSON object of field values; --set entries override it
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Print the result as JSON
        #[arg(long)]
        json_output: bool,
    },

    /// Enter each field interactively
    Prompt {
        /// Print the result as JSON
        #[arg(long)]
        json_output: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    cardiorisk_core::init_tracing(cli.json, level);

    let config = scoring_config(
        ScoringConfig::from_env(),
        cli.backend_url.as_deref(),
        cli.no_proxy,
    );

    match cli.command {
        Commands::Fields { json_output } => cmd_fields(json_output),
        Commands::Predict {
            set,
            input,
            json_output,
        } => {
            let values = collect_values(input.as_deref(), &set)?;
            cmd_predict(&config, values, json_output).await
        }
        Commands::Prompt { json_output } => {
            let stdin = std::io::stdin();
            let mut stderr = std::io::stderr();
            let values = prompt_values(stdin.lock(), &mut stderr)?;
            cmd_predict(&config, values, json_output).await
        }
    }
}

/// Apply command-line overrides to the environment config.
fn scoring_config(base: ScoringConfig, backend_url: Option<&str>, no_proxy: bool) -> ScoringConfig {
    let config = match backend_url {
        Some(url) => base.with_backend_url(Some(url)),
        None => base,
    };
    config.with_system_proxy(!no_proxy)
}

/// Parse a `key=value` argument.
fn parse_key_value(arg: &str) -> std::result::Result<(String, String), String> {
    let (key, value) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{arg}'"))?;
    let key = key.trim();
    if schema::field(key).is_none() {
        let known: Vec<_> = schema::fields().iter().map(|f| f.key).collect();
        return Err(format!("unknown field '{key}' (known: {})", known.join(", ")));
    }
    Ok((key.to_string(), value.to_string()))
}

/// Merge an optional JSON file with `--set` overrides.
fn collect_values(input: Option<&Path>, overrides: &[(String, String)]) -> Result<FormValues> {
    let mut values = match input {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .context(format!("Failed to read input file: {:?}", path))?;
            let json: serde_json::Value =
                serde_json::from_str(&content).context("Failed to parse input as JSON")?;
            match FormValues::from_json(&json) {
                Ok(values) => values,
                Err(e) => bail!("Invalid input file {:?}: {}", path, e),
            }
        }
        None => FormValues::new(),
    };

    for (key, value) in overrides {
        values.set(key, value.as_str());
    }
    Ok(values)
}

/// Ask for each field on `out` and read one line per field from `input`.
fn prompt_values<R: BufRead, W: Write>(mut input: R, out: &mut W) -> Result<FormValues> {
    let mut values = FormValues::new();
    for field in schema::fields() {
        write!(
            out,
            "{} [{}-{}]: ",
            field.label, field.min_value, field.max_value
        )?;
        out.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            break;
        }
        values.set(field.key, line.trim_end_matches(['\r', '\n']));
    }
    Ok(values)
}

/// Print the field schema
fn cmd_fields(json_output: bool) -> Result<()> {
    if json_output {
        println!("{}", serde_json::to_string_pretty(schema::fields())?);
        return Ok(());
    }

    println!("{:<3} {:<10} {:>5} {:>5} {:>5}  LABEL", "#", "KEY", "MIN", "MAX", "STEP");
    for (i, field) in schema::fields().iter().enumerate() {
        println!(
            "{:<3} {:<10} {:>5} {:>5} {:>5}  {}",
            i, field.key, field.min_value, field.max_value, field.step, field.label
        );
    }
    Ok(())
}

#[derive(Serialize)]
struct PredictOutput<'a> {
    #[serde(flatten)]
    result: &'a PredictionResult,
    tier: &'static str,
    bar_percent: u8,
    scorer: String,
    placeholder: bool,
}

/// Score `values` and print the result card
async fn cmd_predict(config: &ScoringConfig, values: FormValues, json_output: bool) -> Result<()> {
    for violation in values.out_of_range() {
        warn!("{}", violation);
    }

    let scorer = build_scorer(config).context("Invalid scoring configuration")?;
    let mut controller = SubmissionController::new(scorer).with_values(values);

    let result = controller.submit().await.context("Prediction failed")?;
    let view = controller.view();
    let scorer = controller.scorer();

    if json_output {
        let output = PredictOutput {
            result: &result,
            tier: view.tier.label(),
            bar_percent: view.bar_percent,
            scorer: scorer.describe(),
            placeholder: scorer.is_placeholder(),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print!("{}", render_result_card(&view, &**scorer));
    }
    Ok(())
}

/// Human-readable result card.
fn render_result_card(view: &RiskView, scorer: &dyn RiskScorer) -> String {
    let mut card = String::new();
    card.push_str("Result\n");
    card.push_str(&format!("  {}\n", render_bar(view, 30)));
    card.push_str(&format!(
        "  Estimated probability: {}\n",
        view.probability_label()
    ));
    card.push_str(&format!("  Risk: {}\n", view.tier.label()));
    if scorer.is_placeholder() {
        card.push_str("  Source: placeholder formula, not a model\n");
    } else {
        card.push_str(&format!("  Source: {}\n", scorer.describe()));
    }
    card.push('\n');
    for note in DISCLAIMERS {
        card.push_str(&format!("  - {note}\n"));
    }
    card
}
