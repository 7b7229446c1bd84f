use anyhow::{Context, Result};
use checks_compiler::CheckCompiler;
use checks_parser::parse_file;
use serde_json::json;
use std::path::Path;
use tracing::info;

use crate::output;

pub async fn execute(contract_path: &Path, format: &str) -> Result<()> {
    info!("Inspecting contract: {}", contract_path.display());

    let contract = parse_file(contract_path).with_context(|| {
        format!(
            "Failed to parse contract file: {}",
            contract_path.display()
        )
    })?;
    let compiler = CheckCompiler::new();

    if format == "json" {
        let models: Vec<_> = contract
            .models
            .iter()
            .map(|model| {
                let skipped: Vec<_> = compiler
                    .skipped_tests(model)
                    .into_iter()
                    .map(|s| json!({"column": s.column, "kind": s.kind}))
                    .collect();
                json!({
                    "name": model.name,
                    "description": model.description,
                    "columns": model.columns,
                    "test_count": model.test_count(),
                    "check_count": compiler.compile(model, &model.name).len(),
                    "skipped_tests": skipped,
                })
            })
            .collect();

        let rejected: Vec<_> = contract
            .rejected
            .iter()
            .map(|err| json!({"model": err.model(), "error": err.to_string()}))
            .collect();

        let report = json!({
            "contract": contract_path.display().to_string(),
            "models": models,
            "rejected": rejected,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    output::print_info(&format!(
        "Contract loaded: {} ({} models)",
        contract_path.display(),
        contract.models.len()
    ));

    for err in &contract.rejected {
        output::print_error(&err.to_string());
    }

    for model in &contract.models {
        output::print_header(&model.name);
        if let Some(description) = &model.description {
            println!("  {}", description);
        }
        println!("  Columns: {}", model.columns.len());
        println!("  Tests:   {}", model.test_count());
        println!(
            "  Checks:  {}",
            compiler.compile(model, &model.name).len()
        );

        for column in &model.columns {
            let kinds: Vec<&str> = column.tests.iter().map(|t| t.kind()).collect();
            if kinds.is_empty() {
                println!("    - {}", column.name);
            } else {
                println!("    - {} [{}]", column.name, kinds.join(", "));
            }
        }

        for skipped in compiler.skipped_tests(model) {
            output::print_warning(&format!(
                "Unsupported test '{}' on column '{}' will be skipped",
                skipped.kind, skipped.column
            ));
        }
    }

    Ok(())
}
