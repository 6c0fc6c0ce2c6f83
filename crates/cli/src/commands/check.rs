use std::path::Path;
use std::process;

use rulebook_eval::{validate, Value};

use super::read_json;
use crate::OutputFormat;

pub(crate) fn cmd_check(expr_path: &Path, output: OutputFormat, quiet: bool) {
    let expression: Value = read_json(expr_path, "expression", output, quiet);

    match validate(&expression) {
        Ok(()) => {
            if !quiet {
                match output {
                    OutputFormat::Text => println!("valid"),
                    OutputFormat::Json => println!("{}", serde_json::json!({ "valid": true })),
                }
            }
        }
        Err(e) => {
            match output {
                OutputFormat::Text => {
                    if !quiet {
                        eprintln!("invalid expression: {}", e);
                    }
                }
                OutputFormat::Json => {
                    if !quiet {
                        eprintln!(
                            "{}",
                            serde_json::json!({ "valid": false, "error": e.to_string() })
                        );
                    }
                }
            }
            process::exit(1);
        }
    }
}
