//! Compilation jobs.
//!
//! A job bundles the four independent invocation parameters: contract path,
//! model name, target table and output path. Jobs can be listed in a TOML
//! manifest:
//!
//! ```toml
//! contract = "models/ddi/schema.yml"
//!
//! [[job]]
//! model = "rolling_30_day_orders"
//! table = "dbt_ddi.rolling_30_day_orders"
//!
//! [[job]]
//! model = "at_risk_customers"
//! table = "dbt_ddi.at_risk_customers"
//! output = "checks/at_risk_customers.yml"
//! ```

use crate::{CheckCompiler, CompileError, Result, write_group};
use checks_core::ContractError;
use checks_parser::parse_file;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};
use tracing::info;

/// Default contract source.
pub const DEFAULT_CONTRACT: &str = "models/ddi/schema.yml";
/// Default model to compile.
pub const DEFAULT_MODEL: &str = "rolling_30_day_orders";
/// Default sink path.
pub const DEFAULT_OUTPUT: &str = "soda_checks_rolling_30_day_orders.yml";
/// Default target table.
pub const DEFAULT_TABLE: &str = "dbt_ddi.rolling_30_day_orders";

/// One model → one check group → one sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileJob {
    /// Contract source path
    pub contract: PathBuf,
    /// Model to compile
    pub model: String,
    /// Table identifier embedded in the output key
    pub table: String,
    /// Sink path
    pub output: PathBuf,
}

impl Default for CompileJob {
    fn default() -> Self {
        Self {
            contract: PathBuf::from(DEFAULT_CONTRACT),
            model: DEFAULT_MODEL.to_string(),
            table: DEFAULT_TABLE.to_string(),
            output: PathBuf::from(DEFAULT_OUTPUT),
        }
    }
}

/// Result of a successful job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobOutcome {
    /// Model that was compiled
    pub model: String,
    /// Sink that was written
    pub output: PathBuf,
    /// Number of checks written
    pub checks: usize,
}

impl CompileJob {
    /// Creates a job for `model` with the conventional output name
    /// `soda_checks_<model>.yml`.
    pub fn for_model(
        contract: impl Into<PathBuf>,
        model: impl Into<String>,
        table: impl Into<String>,
    ) -> Self {
        let model = model.into();
        Self {
            contract: contract.into(),
            output: default_output(&model),
            model,
            table: table.into(),
        }
    }

    /// Loads the contract, compiles the model and writes the sink.
    ///
    /// # Errors
    ///
    /// Fails when the contract cannot be loaded, the model is missing, or the
    /// sink cannot be written. Nothing is written on failure.
    pub fn run(&self) -> Result<JobOutcome> {
        info!(
            contract = %self.contract.display(),
            model = %self.model,
            "compiling model"
        );
        let contract = parse_file(&self.contract)?;
        let group = CheckCompiler::new().compile_model(&contract, &self.model, &self.table)?;
        let checks = write_group(&group, &self.output)?;

        Ok(JobOutcome {
            model: self.model.clone(),
            output: self.output.clone(),
            checks,
        })
    }
}

/// Conventional sink name for a model.
pub fn default_output(model: &str) -> PathBuf {
    PathBuf::from(format!("soda_checks_{model}.yml"))
}

/// The jobs run by `batch` when no manifest is given.
pub fn default_jobs() -> Vec<CompileJob> {
    vec![
        CompileJob::for_model(
            DEFAULT_CONTRACT,
            "rolling_30_day_orders",
            "dbt_ddi.rolling_30_day_orders",
        ),
        CompileJob::for_model(
            DEFAULT_CONTRACT,
            "at_risk_customers",
            "dbt_ddi.at_risk_customers",
        ),
    ]
}

/// Rejects job lists in which two jobs write the same sink.
///
/// Outputs are compared after [`sink_key`] normalisation, so `same.yml`,
/// `./same.yml` and `out/../same.yml` count as one sink.
pub fn ensure_distinct_outputs(jobs: &[CompileJob]) -> std::result::Result<(), ContractError> {
    let mut seen = HashSet::new();
    for job in jobs {
        if !seen.insert(sink_key(&job.output)) {
            return Err(ContractError::DuplicateOutput(
                job.output.display().to_string(),
            ));
        }
    }
    Ok(())
}

/// Absolute, lexically normalised form of a sink path.
///
/// Relative paths are joined onto the working directory; `.` components are
/// dropped and `..` removes the preceding normal component. Symlinks are not
/// resolved.
pub fn sink_key(path: &Path) -> PathBuf {
    let absolute = if path.is_relative() {
        std::env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    } else {
        path.to_path_buf()
    };

    let mut normalised = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir
                if matches!(normalised.components().next_back(), Some(Component::Normal(_))) =>
            {
                normalised.pop();
            }
            other => normalised.push(other),
        }
    }
    normalised
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ManifestEntry {
    model: String,
    table: Option<String>,
    output: Option<PathBuf>,
    contract: Option<PathBuf>,
}

/// A TOML job manifest.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JobManifest {
    /// Contract used by jobs that do not name their own
    #[serde(default)]
    contract: Option<PathBuf>,

    #[serde(default, rename = "job")]
    jobs: Vec<ManifestEntry>,
}

impl JobManifest {
    /// Parses a manifest from TOML text.
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| CompileError::manifest(e.to_string()))
    }

    /// Reads and parses a manifest file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| CompileError::manifest(format!("{}: {e}", path.display())))?;
        Self::parse(&content)
    }

    /// Expands the manifest into jobs, filling in defaults.
    ///
    /// Paths are taken as written; relative paths resolve against the
    /// working directory.
    pub fn into_jobs(self) -> Result<Vec<CompileJob>> {
        if self.jobs.is_empty() {
            return Err(CompileError::manifest("no [[job]] entries"));
        }

        let shared = self
            .contract
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONTRACT));
        let jobs: Vec<CompileJob> = self
            .jobs
            .into_iter()
            .map(|entry| CompileJob {
                contract: entry.contract.unwrap_or_else(|| shared.clone()),
                output: entry.output.unwrap_or_else(|| default_output(&entry.model)),
                table: entry.table.unwrap_or_else(|| entry.model.clone()),
                model: entry.model,
            })
            .collect();

        ensure_distinct_outputs(&jobs)?;
        Ok(jobs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_job() {
        let job = CompileJob::default();
        assert_eq!(job.contract, PathBuf::from("models/ddi/schema.yml"));
        assert_eq!(job.model, "rolling_30_day_orders");
        assert_eq!(job.table, "dbt_ddi.rolling_30_day_orders");
        assert_eq!(
            job.output,
            PathBuf::from("soda_checks_rolling_30_day_orders.yml")
        );
    }

    #[test]
    fn test_default_jobs_target_distinct_outputs() {
        let jobs = default_jobs();
        assert_eq!(jobs.len(), 2);
        assert_eq!(
            jobs[1].output,
            PathBuf::from("soda_checks_at_risk_customers.yml")
        );
        assert!(ensure_distinct_outputs(&jobs).is_ok());
    }

    #[test]
    fn test_manifest_defaults() {
        let manifest = JobManifest::parse(
            r#"
contract = "contracts/schema.yml"

[[job]]
model = "orders"

[[job]]
model = "customers"
table = "analytics.customers"
output = "out/customers.json"
contract = "other/schema.yml"
"#,
        )
        .unwrap();

        let jobs = manifest.into_jobs().unwrap();
        assert_eq!(
            jobs[0],
            CompileJob {
                contract: PathBuf::from("contracts/schema.yml"),
                model: "orders".to_string(),
                table: "orders".to_string(),
                output: PathBuf::from("soda_checks_orders.yml"),
            }
        );
        assert_eq!(jobs[1].contract, PathBuf::from("other/schema.yml"));
        assert_eq!(jobs[1].table, "analytics.customers");
        assert_eq!(jobs[1].output, PathBuf::from("out/customers.json"));
    }

    #[test]
    fn test_manifest_duplicate_output() {
        let manifest = JobManifest::parse(
            r#"
[[job]]
model = "a"
output = "same.yml"

[[job]]
model = "b"
output = "same.yml"
"#,
        )
        .unwrap();

        let err = manifest.into_jobs().unwrap_err();
        assert!(matches!(
            err,
            CompileError::Contract(ContractError::DuplicateOutput(_))
        ));
    }

    #[test]
    fn test_duplicate_output_spelled_differently() {
        let jobs = vec![
            CompileJob::for_model("schema.yml", "a", "t"),
            CompileJob {
                output: PathBuf::from("./soda_checks_a.yml"),
                ..CompileJob::for_model("schema.yml", "b", "t")
            },
        ];
        assert_eq!(
            ensure_distinct_outputs(&jobs).unwrap_err(),
            ContractError::DuplicateOutput("./soda_checks_a.yml".to_string())
        );

        let manifest = JobManifest::parse(
            r#"
[[job]]
model = "a"
output = "same.yml"

[[job]]
model = "b"
output = "out/../same.yml"
"#,
        )
        .unwrap();
        assert!(matches!(
            manifest.into_jobs().unwrap_err(),
            CompileError::Contract(ContractError::DuplicateOutput(_))
        ));
    }

    #[test]
    fn test_sink_key_normalises_relative_and_absolute_paths() {
        let cwd = std::env::current_dir().unwrap();
        assert_eq!(sink_key(Path::new("same.yml")), cwd.join("same.yml"));
        assert_eq!(sink_key(Path::new("./same.yml")), cwd.join("same.yml"));
        assert_eq!(
            sink_key(&cwd.join("a/./b/../same.yml")),
            cwd.join("a/same.yml")
        );
        assert_ne!(
            sink_key(Path::new("a/same.yml")),
            sink_key(Path::new("b/same.yml"))
        );
    }

    #[test]
    fn test_manifest_without_jobs() {
        let manifest = JobManifest::parse("contract = \"x.yml\"").unwrap();
        assert!(matches!(
            manifest.into_jobs().unwrap_err(),
            CompileError::Manifest(_)
        ));
    }

    #[test]
    fn test_manifest_rejects_unknown_keys() {
        let result = JobManifest::parse("[[job]]\nmodel = \"a\"\ntabel = \"typo\"\n");
        assert!(matches!(result.unwrap_err(), CompileError::Manifest(_)));
    }
}
