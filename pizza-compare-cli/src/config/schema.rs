//! Configuration schema definitions.

use pizza_compare::criteria::Criteria;
use pizza_compare::llms::OpenAIConfig;
use pizza_compare::prompt::PromptTemplate;
use serde::{Deserialize, Serialize};

/// Root configuration structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CompareConfig {
    /// Model endpoint configuration.
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Model and prompt settings.
    #[serde(default)]
    pub model: ModelConfig,

    /// Default checklist used when none is given on the command line.
    #[serde(default = "Criteria::default_checklist")]
    pub criteria: Criteria,
}

impl Default for CompareConfig {
    fn default() -> Self {
        Self {
            provider: ProviderConfig::default(),
            model: ModelConfig::default(),
            criteria: Criteria::default_checklist(),
        }
    }
}

/// OpenAI-compatible endpoint configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// API key. When absent, `OPENAI_API_KEY` / `openai_api_key` is used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Base URL of the chat-completions API.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Optional organization ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    OpenAIConfig::DEFAULT_BASE_URL.to_owned()
}

const fn default_timeout_secs() -> u64 {
    OpenAIConfig::DEFAULT_TIMEOUT_SECS
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            organization: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Model and prompt settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Model identifier.
    #[serde(default = "default_model")]
    pub name: String,
    /// Prompt template.
    #[serde(default)]
    pub template: PromptTemplate,
    /// Output token budget. Defaults to the template's recommendation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    /// Sampling temperature. Defaults to the template's recommendation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

fn default_model() -> String {
    OpenAIConfig::DEFAULT_MODEL.to_owned()
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            name: default_model(),
            template: PromptTemplate::default(),
            max_tokens: None,
            temperature: None,
        }
    }
}

/// Command-line overrides for generation settings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingsOverrides {
    /// Model identifier.
    pub model: Option<String>,
    /// Prompt template.
    pub template: Option<PromptTemplate>,
    /// Output token budget.
    pub max_tokens: Option<u32>,
    /// Sampling temperature.
    pub temperature: Option<f32>,
}

/// Settings for one comparison request.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationSettings {
    /// Model identifier.
    pub model: String,
    /// Prompt template.
    pub template: PromptTemplate,
    /// Output token budget.
    pub max_tokens: u32,
    /// Sampling temperature.
    pub temperature: f32,
}

impl ModelConfig {
    /// Effective output token budget.
    #[must_use]
    pub fn effective_max_tokens(&self) -> u32 {
        self.max_tokens.unwrap_or_else(|| self.template.max_tokens())
    }

    /// Effective sampling temperature.
    #[must_use]
    pub fn effective_temperature(&self) -> f32 {
        self.temperature.unwrap_or_else(|| self.template.temperature())
    }

    /// Resolve request settings.
    ///
    /// Each value is taken from the override, then this config, then the
    /// chosen template's recommendation.
    #[must_use]
    pub fn resolve(&self, overrides: SettingsOverrides) -> GenerationSettings {
        let template = overrides.template.unwrap_or(self.template);
        GenerationSettings {
            model: overrides.model.unwrap_or_else(|| self.name.clone()),
            template,
            max_tokens: overrides
                .max_tokens
                .or(self.max_tokens)
                .unwrap_or_else(|| template.max_tokens()),
            temperature: overrides
                .temperature
                .or(self.temperature)
                .unwrap_or_else(|| template.temperature()),
        }
    }
}

/// Severity of a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueLevel {
    /// The configuration works but is probably not what was intended.
    Warning,
    /// A comparison cannot run with this configuration.
    Error,
}

/// A problem found while validating the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigIssue {
    /// Severity.
    pub level: IssueLevel,
    /// Dotted path of the offending field.
    pub field: &'static str,
    /// Human-readable explanation.
    pub message: String,
}

impl ConfigIssue {
    /// Create an error-level issue.
    #[must_use]
    pub fn error(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            level: IssueLevel::Error,
            field,
            message: message.into(),
        }
    }

    /// Create a warning-level issue.
    #[must_use]
    pub fn warning(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            level: IssueLevel::Warning,
            field,
            message: message.into(),
        }
    }
}

impl CompareConfig {
    /// Check the configuration for problems.
    #[must_use]
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        if self.criteria.is_empty() {
            issues.push(ConfigIssue::error(
                "criteria",
                "no criterion with descriptions configured",
            ));
        }

        if !self.provider.base_url.starts_with("http://")
            && !self.provider.base_url.starts_with("https://")
        {
            issues.push(ConfigIssue::error(
                "provider.base_url",
                format!("'{}' is not an http(s) URL", self.provider.base_url),
            ));
        }

        if self.model.name.trim().is_empty() {
            issues.push(ConfigIssue::error("model.name", "model name is empty"));
        }

        if let Some(t) = self.model.temperature {
            if !(0.0..=2.0).contains(&t) {
                issues.push(ConfigIssue::warning(
                    "model.temperature",
                    format!("temperature {t} is outside 0.0..=2.0"),
                ));
            }
        }

        if self.model.max_tokens == Some(0) {
            issues.push(ConfigIssue::error(
                "model.max_tokens",
                "max_tokens must be positive",
            ));
        }

        issues
    }

    /// Build the client configuration, resolving the API key.
    ///
    /// Returns `None` when no key is configured or present in the
    /// environment.
    #[must_use]
    pub fn openai_config(&self) -> Option<OpenAIConfig> {
        let api_key = self
            .provider
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .or_else(OpenAIConfig::api_key_from_env)?;

        let mut config = OpenAIConfig::new(api_key)
            .with_base_url(&self.provider.base_url)
            .with_model(&self.model.name)
            .with_timeout(self.provider.timeout_secs);
        if let Some(org) = &self.provider.organization {
            config = config.with_organization(org);
        }
        Some(config)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let config: CompareConfig = toml::from_str("").unwrap();
        assert_eq!(config, CompareConfig::default());
        assert_eq!(config.criteria.len(), 3);
        assert_eq!(config.model.effective_max_tokens(), 400);
    }

    #[test]
    fn parses_ordered_criteria() {
        let config: CompareConfig = toml::from_str(
            r#"
            [model]
            template = "detailed"

            [[criteria]]
            name = "Toppings"
            descriptions = ["pepperoni slices", "evenly spread"]

            [[criteria]]
            name = "Crust"
            descriptions = ["golden edge"]
            "#,
        )
        .unwrap();

        let names: Vec<&str> = config.criteria.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["Toppings", "Crust"]);
        assert_eq!(config.model.template, PromptTemplate::Detailed);
        assert_eq!(config.model.effective_max_tokens(), 450);
        assert!((config.model.effective_temperature() - 0.3).abs() < f32::EPSILON);
    }

    #[test]
    fn rejects_unknown_sections() {
        assert!(toml::from_str::<CompareConfig>("[channels]\nenabled = true\n").is_err());
    }

    #[test]
    fn validate_reports_problems() {
        let mut config = CompareConfig::default();
        assert!(config.validate().is_empty());

        config.provider.base_url = "ftp://example.com".to_owned();
        config.model.temperature = Some(3.5);
        let issues = config.validate();
        assert_eq!(issues.len(), 2);
        assert!(issues.iter().any(|i| i.field == "provider.base_url" && i.level == IssueLevel::Error));
        assert!(issues.iter().any(|i| i.field == "model.temperature" && i.level == IssueLevel::Warning));
        assert!(issues.contains(&ConfigIssue::error(
            "provider.base_url",
            "'ftp://example.com' is not an http(s) URL"
        )));
        assert!(issues.contains(&ConfigIssue::warning(
            "model.temperature",
            "temperature 3.5 is outside 0.0..=2.0"
        )));
    }

    mod resolve {
        use super::*;

        #[test]
        fn template_recommendation_without_overrides() {
            let settings = ModelConfig::default().resolve(SettingsOverrides::default());
            assert_eq!(settings.model, "gpt-4o-mini");
            assert_eq!(settings.template, PromptTemplate::Concise);
            assert_eq!(settings.max_tokens, 400);
            assert!((settings.temperature - 0.7).abs() < f32::EPSILON);
        }

        #[test]
        fn template_flag_changes_recommendation() {
            let settings = ModelConfig::default().resolve(SettingsOverrides {
                template: Some(PromptTemplate::Detailed),
                ..SettingsOverrides::default()
            });
            assert_eq!(settings.template, PromptTemplate::Detailed);
            assert_eq!(settings.max_tokens, 450);
            assert!((settings.temperature - 0.3).abs() < f32::EPSILON);
        }

        #[test]
        fn config_value_beats_template() {
            let model = ModelConfig {
                max_tokens: Some(600),
                temperature: Some(0.2),
                ..ModelConfig::default()
            };
            let settings = model.resolve(SettingsOverrides {
                template: Some(PromptTemplate::Detailed),
                ..SettingsOverrides::default()
            });
            assert_eq!(settings.max_tokens, 600);
            assert!((settings.temperature - 0.2).abs() < f32::EPSILON);
        }

        #[test]
        fn flag_beats_config() {
            let model = ModelConfig {
                name: "gpt-4o".to_owned(),
                max_tokens: Some(600),
                temperature: Some(0.2),
                ..ModelConfig::default()
            };
            let settings = model.resolve(SettingsOverrides {
                model: Some("gpt-4.1-mini".to_owned()),
                template: None,
                max_tokens: Some(300),
                temperature: Some(1.0),
            });
            assert_eq!(settings.model, "gpt-4.1-mini");
            assert_eq!(settings.max_tokens, 300);
            assert!((settings.temperature - 1.0).abs() < f32::EPSILON);
        }
    }

    #[test]
    fn configured_key_is_used() {
        let mut config = CompareConfig::default();
        config.provider.api_key = Some("sk-from-file".to_owned());
        config.provider.organization = Some("org-1".to_owned());

        let openai = config.openai_config().unwrap();
        assert_eq!(openai.api_key, "sk-from-file");
        assert_eq!(openai.model, "gpt-4o-mini");
        assert_eq!(openai.organization.as_deref(), Some("org-1"));
    }

    #[test]
    fn round_trips_through_toml() {
        let config = CompareConfig::default();
        let text = toml::to_string_pretty(&config).unwrap();
        let back: CompareConfig = toml::from_str(&text).unwrap();
        assert_eq!(back, config);
    }
}
