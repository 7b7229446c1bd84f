use anyhow::{Context, Result};
use checks_compiler::CompileJob;
use tracing::info;

use crate::output;

pub async fn execute(job: &CompileJob) -> Result<()> {
    info!("Generating checks for model: {}", job.model);
    info!("Contract: {}", job.contract.display());
    info!("Target table: {}", job.table);

    let outcome = match job.run() {
        Ok(outcome) => outcome,
        Err(err) if err.is_model_not_found() => {
            output::print_error(&format!(
                "Model {} not found in {}",
                job.model,
                job.contract.display()
            ));
            std::process::exit(1);
        }
        Err(err) => {
            return Err(err).with_context(|| {
                format!(
                    "Failed to generate checks for model {} from {}",
                    job.model,
                    job.contract.display()
                )
            });
        }
    };

    output::print_success(&format!(
        "Generated {} with {} checks for model {}",
        outcome.output.display(),
        outcome.checks,
        outcome.model
    ));

    Ok(())
}
