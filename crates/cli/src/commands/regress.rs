use std::path::Path;
use std::process;

use rulebook_engine::{Engine, EngineError, RegressionRunRequest, RegressionRunResult};
use rulebook_storage::NewRuleVersion;
use serde::Deserialize;

use super::{print_json, read_json};
use crate::{report_error, OutputFormat};

/// One entry of a catalog file: a rule version payload, optionally
/// published once created.
#[derive(Debug, Deserialize)]
struct SeedRule {
    #[serde(flatten)]
    rule: NewRuleVersion,
    #[serde(default)]
    publish: bool,
}

/// Which rules and versions to run.
pub(crate) struct Selection<'a> {
    pub(crate) rule: Option<&'a str>,
    pub(crate) version: Option<u32>,
    pub(crate) prefer_latest: bool,
}

pub(crate) fn cmd_regress(
    catalog_path: &Path,
    selection: Selection<'_>,
    output: OutputFormat,
    quiet: bool,
) {
    let seeds: Vec<SeedRule> = read_json(catalog_path, "catalog", output, quiet);
    let engine = Engine::new();
    if let Err(e) = load_catalog(&engine, seeds) {
        report_error(&format!("error loading catalog: {}", e), output, quiet);
        process::exit(1);
    }

    let targets: Vec<String> = match selection.rule {
        Some(id) => vec![id.to_string()],
        None => engine
            .catalog()
            .list_rules()
            .rules
            .into_iter()
            .map(|summary| summary.stable_id)
            .collect(),
    };

    let mut runs = Vec::new();
    for stable_id in targets {
        let request = RegressionRunRequest {
            version: selection.version,
            prefer_latest: selection.prefer_latest,
            ..RegressionRunRequest::new(stable_id)
        };
        match engine.run_regressions(&request) {
            Ok(run) => runs.push(run),
            // Rules without cases are skipped unless asked for by name.
            Err(EngineError::NoRegressionCases { .. }) if selection.rule.is_none() => {
                tracing::info!(stable_id = %request.stable_id, "no regression cases, skipped");
            }
            Err(e) => {
                report_error(&format!("regression error: {}", e), output, quiet);
                process::exit(1);
            }
        }
    }

    if !quiet {
        match output {
            OutputFormat::Json => print_json(&runs),
            OutputFormat::Text => print_runs(&runs),
        }
    }

    if runs.iter().any(|run| !run.all_passed()) {
        process::exit(1);
    }
}

fn load_catalog(engine: &Engine, seeds: Vec<SeedRule>) -> Result<(), EngineError> {
    for seed in seeds {
        let created = engine.create_rule(seed.rule)?;
        if seed.publish {
            engine
                .catalog()
                .publish_version(&created.stable_id, created.version, None)?;
        }
    }
    Ok(())
}

fn print_runs(runs: &[RegressionRunResult]) {
    if runs.is_empty() {
        println!("No regression cases to run");
        return;
    }
    for run in runs {
        println!(
            "{} v{}: {} passed, {} failed",
            run.stable_id, run.version, run.passed, run.failed
        );
        for case in run.failures() {
            println!(
                "  FAIL {}: expected {}, got {}",
                case.name, case.expected, case.actual
            );
        }
    }
    let total: usize = runs.iter().map(|run| run.total).sum();
    let failed: usize = runs.iter().map(|run| run.failed).sum();
    println!("{} case(s), {} failed", total, failed);
}
