use anyhow::{Context, Result, bail};
use checks_compiler::{CompileJob, JobManifest, default_jobs};
use std::path::Path;
use tokio::task::JoinSet;
use tracing::info;

use crate::output;

pub async fn execute(manifest_path: Option<&Path>) -> Result<()> {
    let jobs = match manifest_path {
        Some(path) => {
            info!("Loading job manifest: {}", path.display());
            JobManifest::from_file(path)
                .and_then(JobManifest::into_jobs)
                .with_context(|| format!("Failed to load job manifest: {}", path.display()))?
        }
        None => {
            output::print_info("No job manifest given, running the default jobs");
            default_jobs()
        }
    };

    let total = jobs.len();
    info!("Running {} jobs", total);

    // Outputs are distinct, so jobs can run in parallel without racing on a sink
    let mut tasks = JoinSet::new();
    for (index, job) in jobs.into_iter().enumerate() {
        tasks.spawn_blocking(move || {
            let result = job.run();
            (index, job, result)
        });
    }

    let (mut results, mut failed) = collect_finished(tasks).await;
    results.sort_by_key(|(index, _, _)| *index);

    for (_, job, result) in results {
        match result {
            Ok(outcome) => output::print_success(&format!(
                "Generated {} with {} checks for model {}",
                outcome.output.display(),
                outcome.checks,
                outcome.model
            )),
            Err(err) => {
                failed += 1;
                output::print_error(&describe_failure(&job, &err));
            }
        }
    }

    if failed > 0 {
        bail!("{} of {} jobs failed", failed, total);
    }

    Ok(())
}

/// Drains the task set, returning every finished result and the number of
/// tasks that panicked or were cancelled.
async fn collect_finished<T: 'static>(mut tasks: JoinSet<T>) -> (Vec<T>, usize) {
    let mut results = Vec::with_capacity(tasks.len());
    let mut lost = 0;
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(result) => results.push(result),
            Err(err) => {
                lost += 1;
                output::print_error(&format!("Compilation task panicked: {}", err));
            }
        }
    }
    (results, lost)
}

fn describe_failure(job: &CompileJob, err: &checks_compiler::CompileError) -> String {
    if err.is_model_not_found() {
        format!(
            "Model {} not found in {}",
            job.model,
            job.contract.display()
        )
    } else {
        format!("Model {}: {}", job.model, err)
    }
}
