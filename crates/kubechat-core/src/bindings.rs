//! Merging of kubectl executor bindings into one effective permission set.

use crate::config::{Config, Namespaces};
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

/// Namespace used when no binding configures one.
pub const DEFAULT_NAMESPACE: &str = "default";

/// Effective kubectl permissions for a set of bindings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnabledKubectl {
    pub allowed_verbs: BTreeSet<String>,
    pub allowed_resources: BTreeSet<String>,
    pub default_namespace: String,
    pub allowed_namespaces_per_resource: HashMap<String, Namespaces>,
}

impl EnabledKubectl {
    /// Sorted verb list.
    pub fn verbs(&self) -> Vec<String> {
        self.allowed_verbs.iter().cloned().collect()
    }

    /// Sorted resource type list.
    pub fn resources(&self) -> Vec<String> {
        self.allowed_resources.iter().cloned().collect()
    }

    /// Default namespace, falling back to [`DEFAULT_NAMESPACE`].
    pub fn default_namespace_or_fallback(&self) -> &str {
        if self.default_namespace.is_empty() {
            DEFAULT_NAMESPACE
        } else {
            &self.default_namespace
        }
    }

    pub fn namespaces_for(&self, resource: &str) -> Namespaces {
        self.allowed_namespaces_per_resource
            .get(resource)
            .cloned()
            .unwrap_or_default()
    }
}

pub trait KubectlMerger: Send + Sync {
    fn merge_all_enabled(&self, bindings: &[String]) -> EnabledKubectl;
}

/// Merges kubectl executors from the loaded configuration.
#[derive(Debug, Clone)]
pub struct ConfigMerger {
    config: Arc<Config>,
}

impl ConfigMerger {
    pub fn new(config: Arc<Config>) -> Self {
        Self { config }
    }
}

impl KubectlMerger for ConfigMerger {
    /// Bindings are applied in order: verbs and resources are unioned, each
    /// executor's namespace rules are appended to every resource it enables,
    /// and the last non-empty default namespace wins. Unknown and disabled
    /// executors are skipped.
    fn merge_all_enabled(&self, bindings: &[String]) -> EnabledKubectl {
        let mut out = EnabledKubectl::default();

        for name in bindings {
            let Some(executor) = self.config.executor(name) else {
                tracing::debug!(binding = %name, "unknown executor binding, skipping");
                continue;
            };
            let kc = &executor.kubectl;
            if !kc.enabled {
                continue;
            }

            out.allowed_verbs.extend(kc.commands.verbs.iter().cloned());
            for resource in &kc.commands.resources {
                out.allowed_resources.insert(resource.clone());
                out.allowed_namespaces_per_resource
                    .entry(resource.clone())
                    .or_default()
                    .extend(&kc.namespaces);
            }
            if !kc.default_namespace.is_empty() {
                out.default_namespace = kc.default_namespace.clone();
            }
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn merger() -> ConfigMerger {
        let yaml = r#"
executors:
  read-pods:
    kubectl:
      enabled: true
      namespaces:
        include: ["team-.*"]
      commands:
        verbs: [get, logs]
        resources: [pods]
      default_namespace: team-a
  read-deploy:
    kubectl:
      enabled: true
      namespaces:
        include: ["default"]
        exclude: ["team-secret"]
      commands:
        verbs: [describe, get]
        resources: [deployments, pods]
  disabled:
    kubectl:
      enabled: false
      commands:
        verbs: [delete]
        resources: [secrets]
"#;
        ConfigMerger::new(Arc::new(Config::from_yaml(yaml).unwrap()))
    }

    fn bindings(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn merge_unions_verbs_and_resources_sorted() {
        let kc = merger().merge_all_enabled(&bindings(&["read-pods", "read-deploy"]));
        assert_eq!(kc.verbs(), vec!["describe", "get", "logs"]);
        assert_eq!(kc.resources(), vec!["deployments", "pods"]);
    }

    #[test]
    fn merge_skips_disabled_and_unknown() {
        let kc = merger().merge_all_enabled(&bindings(&["disabled", "nope"]));
        assert!(kc.allowed_verbs.is_empty());
        assert!(kc.allowed_resources.is_empty());
        assert_eq!(kc.default_namespace_or_fallback(), "default");
    }

    #[test]
    fn merge_appends_namespace_rules_per_resource() {
        let kc = merger().merge_all_enabled(&bindings(&["read-pods", "read-deploy"]));
        let pods = kc.namespaces_for("pods");
        assert!(pods.is_allowed("team-a").unwrap());
        assert!(pods.is_allowed("default").unwrap());
        assert!(!pods.is_allowed("team-secret").unwrap());

        let deploys = kc.namespaces_for("deployments");
        assert!(!deploys.is_allowed("team-a").unwrap());
        assert!(deploys.is_allowed("default").unwrap());
    }

    #[test]
    fn merge_keeps_last_non_empty_default_namespace() {
        let kc = merger().merge_all_enabled(&bindings(&["read-pods", "read-deploy"]));
        assert_eq!(kc.default_namespace, "team-a");
    }

    #[test]
    fn unknown_resource_has_empty_allow_list() {
        let kc = merger().merge_all_enabled(&bindings(&["read-pods"]));
        assert!(!kc.namespaces_for("secrets").is_allowed("default").unwrap());
    }
}
