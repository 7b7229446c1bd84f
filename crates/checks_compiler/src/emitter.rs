//! Check group serialization and sink writing.
//!
//! The sink is a file that is fully overwritten on every write. Its format
//! follows the extension: `.yml`/`.yaml` for SodaCL YAML, `.json` for JSON.
//! Key and check order are kept exactly as compiled.

use crate::EmitError;
use checks_core::CheckGroup;
use std::fs;
use std::path::Path;
use tracing::info;

/// Supported sink formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkFormat {
    /// SodaCL YAML (.yml, .yaml)
    Yaml,
    /// Pretty-printed JSON (.json)
    Json,
}

impl SinkFormat {
    /// Detects the sink format from an output path.
    ///
    /// # Errors
    ///
    /// Returns `EmitError::InvalidExtension` if the path has no extension and
    /// `EmitError::UnsupportedFormat` if the extension is not recognized.
    pub fn detect(path: &Path) -> Result<Self, EmitError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .ok_or(EmitError::InvalidExtension)?;

        match extension.to_lowercase().as_str() {
            "yaml" | "yml" => Ok(Self::Yaml),
            "json" => Ok(Self::Json),
            other => Err(EmitError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// Serializes a check group in the given format.
pub fn render(group: &CheckGroup, format: SinkFormat) -> Result<String, EmitError> {
    let mut rendered = match format {
        SinkFormat::Yaml => serde_yaml_ng::to_string(group)?,
        SinkFormat::Json => serde_json::to_string_pretty(group)?,
    };
    if !rendered.ends_with('\n') {
        rendered.push('\n');
    }
    Ok(rendered)
}

/// Writes a check group to `path`, replacing any previous content.
///
/// Missing parent directories are created. Returns the number of checks
/// written.
pub fn write_group(group: &CheckGroup, path: &Path) -> Result<usize, EmitError> {
    let format = SinkFormat::detect(path)?;
    let rendered = render(group, format)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| EmitError::io(path, e))?;
    }
    fs::write(path, rendered).map_err(|e| EmitError::io(path, e))?;

    info!(
        path = %path.display(),
        table = %group.table,
        checks = group.len(),
        "wrote check group"
    );
    Ok(group.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use checks_core::CheckExpression;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn sample_group() -> CheckGroup {
        CheckGroup::new(
            "dbt_ddi.orders",
            vec![
                CheckExpression::new("row_count > 0", "Has some rows"),
                CheckExpression::new("invalid_percent(status) = 0", "status values are accepted")
                    .with_valid_values(vec![json!("placed"), json!("shipped")]),
            ],
        )
    }

    #[test]
    fn test_detect_sink_format() {
        assert_eq!(
            SinkFormat::detect(Path::new("checks.yml")).unwrap(),
            SinkFormat::Yaml
        );
        assert_eq!(
            SinkFormat::detect(Path::new("checks.json")).unwrap(),
            SinkFormat::Json
        );
        assert!(matches!(
            SinkFormat::detect(Path::new("checks.txt")).unwrap_err(),
            EmitError::UnsupportedFormat(_)
        ));
        assert!(matches!(
            SinkFormat::detect(Path::new("checks")).unwrap_err(),
            EmitError::InvalidExtension
        ));
    }

    #[test]
    fn test_render_json_keeps_order() {
        let rendered = render(&sample_group(), SinkFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();

        let checks = value["checks for dbt_ddi.orders"].as_array().unwrap();
        assert_eq!(checks.len(), 2);
        assert_eq!(checks[0]["row_count > 0"]["name"], json!("Has some rows"));
        assert_eq!(
            checks[1]["invalid_percent(status) = 0"]["valid values"],
            json!(["placed", "shipped"])
        );
    }

    #[test]
    fn test_render_yaml_name_before_valid_values() {
        let rendered = render(&sample_group(), SinkFormat::Yaml).unwrap();
        let name = rendered.find("name: status values are accepted").unwrap();
        let values = rendered.find("valid values:").unwrap();
        assert!(name < values);
    }

    #[test]
    fn test_write_group_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("checks.yml");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "stale content that is much longer than the new output ".repeat(50))
            .unwrap();

        let count = write_group(&sample_group(), &path).unwrap();
        assert_eq!(count, 2);

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("checks for dbt_ddi.orders:"));
        assert!(!written.contains("stale content"));
    }

    #[test]
    fn test_write_group_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a").join("b").join("checks.json");

        write_group(&sample_group(), &path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_write_group_reports_unwritable_sink() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not_a_directory");
        std::fs::write(&blocker, "plain file").unwrap();
        let path = blocker.join("checks.yml");

        let err = write_group(&sample_group(), &path).unwrap_err();
        match &err {
            EmitError::Io { path: reported, .. } => assert_eq!(reported, &path),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.to_string().contains(&path.display().to_string()));
        assert!(!path.exists());
    }
}
