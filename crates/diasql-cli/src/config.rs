use std::path::{Path, PathBuf};

use diasql_core::{BuildOptions, EmitOptions};
use serde::{Deserialize, Serialize};

use crate::CliError;

/// Settings file looked up in the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "diasql.toml";

/// Options loaded from `diasql.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub build: BuildOptions,
    pub emit: EmitOptions,
}

/// Load settings from an explicit path, or from `diasql.toml` when present.
pub fn load_settings(explicit: Option<&Path>) -> Result<Settings, CliError> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let fallback = PathBuf::from(DEFAULT_CONFIG_FILE);
            if !fallback.exists() {
                return Ok(Settings::default());
            }
            fallback
        }
    };

    let content = std::fs::read_to_string(&path)?;
    let settings = parse_settings(&content)?;
    tracing::debug!(path = %path.display(), "settings loaded");
    Ok(settings)
}

pub fn parse_settings(content: &str) -> Result<Settings, CliError> {
    Ok(toml::from_str(content)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use diasql_core::{ConstraintNaming, DIA_NAMESPACE, OrderingStrategy};

    #[test]
    fn empty_file_yields_defaults() {
        let settings = parse_settings("").expect("parse settings");
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.build.namespace, DIA_NAMESPACE);
    }

    #[test]
    fn reads_partial_sections() {
        let settings = parse_settings(
            r#"
[build]
ordering = "topological"

[emit]
constraint_naming = "owner_qualified"
inline_primary_key = true
"#,
        )
        .expect("parse settings");

        assert_eq!(settings.build.ordering, OrderingStrategy::Topological);
        assert_eq!(settings.build.table_kind, "Database - Table");
        assert_eq!(settings.emit.constraint_naming, ConstraintNaming::OwnerQualified);
        assert!(settings.emit.inline_primary_key);
    }

    #[test]
    fn rejects_unknown_ordering() {
        let err = parse_settings("[build]\nordering = \"random\"\n").unwrap_err();
        assert!(matches!(err, CliError::ConfigDecode(_)));
    }
}
