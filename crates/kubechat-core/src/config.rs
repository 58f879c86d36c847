use crate::error::{KubechatError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub cluster_name: String,
    /// Deadline for rendering a single interaction, including all discovery calls.
    #[serde(default = "default_interaction_timeout")]
    pub interaction_timeout_seconds: u64,
    #[serde(default = "default_kubectl_binary")]
    pub kubectl_binary: String,
}

fn default_interaction_timeout() -> u64 {
    10
}

fn default_kubectl_binary() -> String {
    "kubectl".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            cluster_name: String::new(),
            interaction_timeout_seconds: default_interaction_timeout(),
            kubectl_binary: default_kubectl_binary(),
        }
    }
}

// ---------------------------------------------------------------------------
// Namespaces
// ---------------------------------------------------------------------------

/// Namespace allow-list. Entries are regular expressions matched against the
/// whole namespace name; `exclude` wins over `include`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Namespaces {
    #[serde(default)]
    pub include: Vec<String>,
    #[serde(default)]
    pub exclude: Vec<String>,
}

impl Namespaces {
    pub fn is_allowed(&self, namespace: &str) -> Result<bool> {
        for pattern in &self.exclude {
            if full_match(pattern, namespace)? {
                return Ok(false);
            }
        }
        for pattern in &self.include {
            if full_match(pattern, namespace)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    pub fn extend(&mut self, other: &Namespaces) {
        self.include.extend(other.include.iter().cloned());
        self.exclude.extend(other.exclude.iter().cloned());
    }

    fn patterns(&self) -> impl Iterator<Item = &String> {
        self.include.iter().chain(self.exclude.iter())
    }
}

fn full_match(pattern: &str, value: &str) -> Result<bool> {
    let re = compile(pattern)?;
    Ok(re.is_match(value))
}

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(&format!("^(?:{pattern})$")).map_err(|source| KubechatError::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })
}

// ---------------------------------------------------------------------------
// Kubectl executor
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Commands {
    #[serde(default)]
    pub verbs: Vec<String>,
    #[serde(default)]
    pub resources: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Kubectl {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub namespaces: Namespaces,
    #[serde(default)]
    pub commands: Commands,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub default_namespace: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Executor {
    #[serde(default)]
    pub kubectl: Kubectl,
}

// ---------------------------------------------------------------------------
// Config (top-level)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub settings: Settings,
    /// Executor bindings by name. Channels reference these names.
    #[serde(default)]
    pub executors: BTreeMap<String, Executor>,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(KubechatError::ConfigNotFound(path.to_path_buf()));
        }
        let data = std::fs::read_to_string(path)?;
        Self::from_yaml(&data)
    }

    pub fn from_yaml(data: &str) -> Result<Self> {
        let cfg: Config = serde_yaml::from_str(data)?;
        Ok(cfg)
    }

    pub fn executor(&self, name: &str) -> Option<&Executor> {
        self.executors.get(name)
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        for (name, executor) in &self.executors {
            let kc = &executor.kubectl;

            for pattern in kc.namespaces.patterns() {
                if let Err(e) = compile(pattern) {
                    warnings.push(ConfigWarning {
                        level: WarnLevel::Error,
                        message: format!("executor '{name}': {e}"),
                    });
                }
            }

            if !kc.enabled {
                continue;
            }

            if kc.commands.verbs.is_empty() {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Warning,
                    message: format!("executor '{name}' is enabled but allows no kubectl verbs"),
                });
            }

            if kc.namespaces.include.is_empty() && !kc.commands.resources.is_empty() {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Warning,
                    message: format!(
                        "executor '{name}' has no namespaces.include entries; \
                         namespace-scoped resources will offer no namespaces"
                    ),
                });
            }
        }

        if self.settings.interaction_timeout_seconds == 0 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: "settings.interaction_timeout_seconds=0 cancels every interaction"
                    .to_string(),
            });
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
