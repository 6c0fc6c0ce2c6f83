use std::path::Path;
use std::process;

use rulebook_engine::{Engine, EvaluationRequest};
use rulebook_eval::{TraceStep, Value};

use super::{print_json, read_json};
use crate::{report_error, OutputFormat};

pub(crate) fn cmd_eval(
    expr_path: &Path,
    context_path: Option<&Path>,
    output: OutputFormat,
    quiet: bool,
) {
    let logic: Value = read_json(expr_path, "expression", output, quiet);
    let context = match context_path {
        Some(path) => read_json(path, "context", output, quiet),
        None => Value::empty_object(),
    };

    let engine = Engine::new();
    let response = match engine.evaluate(&EvaluationRequest::inline(logic, context)) {
        Ok(r) => r,
        Err(e) => {
            report_error(&format!("evaluation error: {}", e), output, quiet);
            process::exit(1);
        }
    };

    if quiet {
        return;
    }
    match output {
        OutputFormat::Json => print_json(&response),
        OutputFormat::Text => {
            println!("Result: {}", response.result);
            println!("Proof: {}", response.proof.id);
            if !response.trace.is_empty() {
                println!("Trace:");
                print_steps(&response.trace, 1);
            }
        }
    }
}

fn print_steps(steps: &[TraceStep], depth: usize) {
    for step in steps {
        println!(
            "{:indent$}{} {} -> {}",
            "",
            step.path,
            step.operator,
            step.result,
            indent = depth * 2
        );
        print_steps(&step.children, depth + 1);
    }
}
