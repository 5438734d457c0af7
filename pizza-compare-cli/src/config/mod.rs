//! Configuration management for pizza-compare.
//!
//! Settings come from, in increasing priority:
//! 1. Default values
//! 2. Config file (`~/.pizza-compare/config.toml`)
//! 3. Environment variables (`OPENAI_API_KEY`, optionally from `.env`)
//! 4. Command-line flags

mod schema;

pub use schema::{
    CompareConfig, ConfigIssue, GenerationSettings, IssueLevel, ModelConfig, ProviderConfig,
    SettingsOverrides,
};

use std::path::{Path, PathBuf};

use pizza_compare::criteria::Criteria;
use serde::Deserialize;
use tracing::{debug, info};

/// Error type for configuration operations.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
    /// TOML serialization error.
    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
    /// Missing required value.
    #[error("missing required config: {0}")]
    MissingField(String),
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Get the default config directory path.
#[must_use]
pub fn default_config_dir() -> PathBuf {
    dirs_next::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".pizza-compare")
}

/// Get the default config file path.
#[must_use]
pub fn config_path() -> PathBuf {
    default_config_dir().join("config.toml")
}

/// Load configuration from a specific path.
///
/// A missing file yields the defaults.
pub async fn load_config_from(path: impl AsRef<Path>) -> ConfigResult<CompareConfig> {
    let path = path.as_ref();
    if !path.exists() {
        info!(path = %path.display(), "config file not found, using defaults");
        return Ok(CompareConfig::default());
    }

    let content = tokio::fs::read_to_string(path).await?;
    let config: CompareConfig = toml::from_str(&content)?;
    debug!(path = %path.display(), criteria = config.criteria.len(), "loaded config file");

    Ok(config)
}

/// Save configuration to a specific path.
pub async fn save_config_to(config: &CompareConfig, path: impl AsRef<Path>) -> ConfigResult<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    let content = toml::to_string_pretty(config)?;
    tokio::fs::write(path, content).await?;
    info!(path = %path.display(), "saved config file");

    Ok(())
}

/// Write a default configuration to `path`.
///
/// An existing file is kept unless `force` is set. Returns whether a file
/// was written.
pub async fn init_config(path: impl AsRef<Path>, force: bool) -> ConfigResult<bool> {
    let path = path.as_ref();
    if path.exists() && !force {
        debug!(path = %path.display(), "config file exists, not overwriting");
        return Ok(false);
    }

    save_config_to(&CompareConfig::default(), path).await?;
    Ok(true)
}

/// Standalone criteria file: a list of `[[criteria]]` tables.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CriteriaFile {
    criteria: Criteria,
}

/// Load a checklist from a TOML file of `[[criteria]]` tables.
pub async fn load_criteria_from(path: impl AsRef<Path>) -> ConfigResult<Criteria> {
    let path = path.as_ref();
    let content = tokio::fs::read_to_string(path).await?;
    let file: CriteriaFile = toml::from_str(&content)?;
    debug!(path = %path.display(), criteria = file.criteria.len(), "loaded criteria file");

    if file.criteria.is_empty() {
        return Err(ConfigError::MissingField(format!(
            "criteria (no usable entries in {})",
            path.display()
        )));
    }
    Ok(file.criteria)
}

/// Resolve the checklist for a comparison.
///
/// A criteria file or `NAME=DESC[;DESC...]` specs replace the configured
/// checklist. Specs are applied on top of the file, replacing criteria of the
/// same name in place.
///
/// # Errors
///
/// Fails when the file cannot be loaded, a spec is malformed, or the result
/// is empty.
pub async fn resolve_criteria(
    file: Option<&Path>,
    specs: &[String],
    configured: &Criteria,
) -> crate::error::Result<Criteria> {
    let mut criteria = match file {
        Some(path) => load_criteria_from(path).await?,
        None if specs.is_empty() => configured.clone(),
        None => Criteria::new(),
    };

    for spec in specs {
        criteria.insert_spec(spec)?;
    }

    criteria.validate()?;
    Ok(criteria)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::CliError;
    use pizza_compare::CriteriaError;
    use pizza_compare::prompt::PromptTemplate;

    fn specs(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_owned()).collect()
    }

    fn names(criteria: &Criteria) -> Vec<&str> {
        criteria.iter().map(|c| c.name.as_str()).collect()
    }

    async fn write_criteria_file(dir: &Path) -> PathBuf {
        let path = dir.join("criteria.toml");
        tokio::fs::write(
            &path,
            r#"
            [[criteria]]
            name = "Crust"
            descriptions = ["thin"]

            [[criteria]]
            name = "Sauce"
            descriptions = ["red"]
            "#,
        )
        .await
        .unwrap();
        path
    }

    #[test]
    fn test_default_paths() {
        let cfg_dir = default_config_dir();
        assert!(cfg_dir.ends_with(".pizza-compare"));

        let cfg_path = config_path();
        assert!(cfg_path.ends_with("config.toml"));
    }

    #[tokio::test]
    async fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config_from(dir.path().join("absent.toml")).await.unwrap();
        assert_eq!(config, CompareConfig::default());
    }

    #[tokio::test]
    async fn init_respects_force() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        assert!(init_config(&path, false).await.unwrap());
        assert!(!init_config(&path, false).await.unwrap());

        let mut config = load_config_from(&path).await.unwrap();
        assert_eq!(config, CompareConfig::default());

        config.model.template = PromptTemplate::Detailed;
        save_config_to(&config, &path).await.unwrap();
        assert!(init_config(&path, true).await.unwrap());
        assert_eq!(load_config_from(&path).await.unwrap().model.template, PromptTemplate::Concise);
    }

    #[tokio::test]
    async fn invalid_toml_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        tokio::fs::write(&path, "[model\nname = ").await.unwrap();

        let err = load_config_from(&path).await.unwrap_err();
        assert!(matches!(err, ConfigError::TomlParse(_)));
    }

    #[tokio::test]
    async fn criteria_file_keeps_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("criteria.toml");
        tokio::fs::write(
            &path,
            r#"
            [[criteria]]
            name = "Sauce Layer"
            descriptions = ["red sauce visible"]

            [[criteria]]
            name = "Cheese"
            descriptions = ["melted", "  "]
            "#,
        )
        .await
        .unwrap();

        let criteria = load_criteria_from(&path).await.unwrap();
        let names: Vec<&str> = criteria.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["Sauce Layer", "Cheese"]);
        assert_eq!(criteria.get("Cheese"), Some(&["melted".to_owned()][..]));
    }

    #[tokio::test]
    async fn empty_criteria_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("criteria.toml");
        tokio::fs::write(&path, "criteria = []\n").await.unwrap();

        let err = load_criteria_from(&path).await.unwrap_err();
        assert!(matches!(err, ConfigError::MissingField(_)));
    }

    mod criteria_resolution {
        use super::*;

        #[tokio::test]
        async fn configured_checklist_without_flags() {
            let configured = Criteria::default_checklist();
            let criteria = resolve_criteria(None, &[], &configured).await.unwrap();
            assert_eq!(criteria, configured);
        }

        #[tokio::test]
        async fn flags_replace_configured_checklist() {
            let criteria = resolve_criteria(
                None,
                &specs(&["Cheese=melted;bubbly", "Basil=fresh leaves"]),
                &Criteria::default_checklist(),
            )
            .await
            .unwrap();

            assert_eq!(names(&criteria), ["Cheese", "Basil"]);
            assert_eq!(
                criteria.get("Cheese"),
                Some(&["melted".to_owned(), "bubbly".to_owned()][..])
            );
        }

        #[tokio::test]
        async fn flags_layer_on_top_of_file() {
            let dir = tempfile::tempdir().unwrap();
            let path = write_criteria_file(dir.path()).await;

            let criteria = resolve_criteria(
                Some(path.as_path()),
                &specs(&["Crust=golden edge", "Cheese=melted"]),
                &Criteria::default_checklist(),
            )
            .await
            .unwrap();

            assert_eq!(names(&criteria), ["Crust", "Sauce", "Cheese"]);
            assert_eq!(criteria.get("Crust"), Some(&["golden edge".to_owned()][..]));
        }

        #[tokio::test]
        async fn malformed_flag_is_rejected() {
            let err = resolve_criteria(None, &specs(&["Crust golden"]), &Criteria::new())
                .await
                .unwrap_err();
            assert!(matches!(err, CliError::Criteria(CriteriaError::Malformed(_))));
        }

        #[tokio::test]
        async fn empty_configured_checklist_is_rejected() {
            let err = resolve_criteria(None, &[], &Criteria::new()).await.unwrap_err();
            assert!(matches!(err, CliError::Criteria(CriteriaError::Empty)));
        }

        #[tokio::test]
        async fn missing_file_is_config_error() {
            let dir = tempfile::tempdir().unwrap();
            let missing = dir.path().join("absent.toml");
            let err = resolve_criteria(Some(missing.as_path()), &[], &Criteria::default_checklist())
                .await
                .unwrap_err();
            assert!(matches!(err, CliError::Config(ConfigError::Io(_))));
        }
    }
}
