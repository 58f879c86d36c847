//! Policy gate: which kubectl verbs and resource types the builder may offer.

use crate::error::{KubechatError, Result};
use async_trait::async_trait;
use std::collections::HashMap;

/// Verbs that need an interactive terminal or mutate arbitrary state.
const UNSUPPORTED_VERBS: &[&str] = &[
    "attach",
    "cp",
    "debug",
    "edit",
    "exec",
    "port-forward",
    "proxy",
];

/// Verbs that take no resource argument.
const RESOURCELESS_VERBS: &[&str] = &["api-resources", "api-versions", "cluster-info", "version"];

const LOGS_RESOURCES: &[&str] = &[
    "pods",
    "deployments",
    "statefulsets",
    "daemonsets",
    "jobs",
    "replicasets",
];
const TOP_RESOURCES: &[&str] = &["pods", "nodes"];
const NODE_RESOURCES: &[&str] = &["nodes"];

fn restricted_resources(verb: &str) -> Option<&'static [&'static str]> {
    match verb {
        "logs" => Some(LOGS_RESOURCES),
        "top" => Some(TOP_RESOURCES),
        "cordon" | "uncordon" | "drain" => Some(NODE_RESOURCES),
        _ => None,
    }
}

/// The Kubernetes API verb a kubectl verb needs on the resource.
fn api_verb(verb: &str) -> &str {
    match verb {
        "get" | "describe" | "logs" | "top" | "explain" => "get",
        "cordon" | "uncordon" | "drain" => "patch",
        other => other,
    }
}

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResourceDetails {
    pub namespaced: bool,
    /// The resource name joins the type with `/` (e.g. `kubectl logs deployments/api`).
    pub slash_separated: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    pub name: String,
    pub details: ResourceDetails,
}

/// One API resource as reported by cluster discovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResourceInfo {
    /// Plural name, e.g. `pods`.
    pub name: String,
    pub namespaced: bool,
    pub verbs: Vec<String>,
}

// ---------------------------------------------------------------------------
// Traits
// ---------------------------------------------------------------------------

#[async_trait]
pub trait PolicyGate: Send + Sync {
    /// Drop verbs the builder cannot offer interactively.
    fn filter_supported_verbs(&self, verbs: Vec<String>) -> Vec<String>;

    /// Resource types from `candidates` usable with `verb`, in candidate order.
    /// Empty when the verb takes no resource.
    async fn allowed_resources_for_verb(
        &self,
        verb: &str,
        candidates: &[String],
    ) -> Result<Vec<Resource>>;

    async fn resource_details(&self, verb: &str, resource_type: &str) -> Result<ResourceDetails>;
}

#[async_trait]
pub trait ResourceCatalog: Send + Sync {
    async fn list_resources(&self) -> Result<Vec<ApiResourceInfo>>;
}

// ---------------------------------------------------------------------------
// CommandGuard
// ---------------------------------------------------------------------------

/// [`PolicyGate`] backed by cluster API discovery.
pub struct CommandGuard<C> {
    catalog: C,
}

impl<C: ResourceCatalog> CommandGuard<C> {
    pub fn new(catalog: C) -> Self {
        Self { catalog }
    }

    async fn resource_map(&self) -> Result<HashMap<String, ApiResourceInfo>> {
        let mut map = HashMap::new();
        for res in self.catalog.list_resources().await? {
            map.entry(res.name.clone()).or_insert(res);
        }
        Ok(map)
    }
}

fn details_from_map(
    verb: &str,
    resource_type: &str,
    resources: &HashMap<String, ApiResourceInfo>,
) -> Result<ResourceDetails> {
    if resource_type.is_empty() {
        return Ok(ResourceDetails::default());
    }

    let not_supported = || KubechatError::VerbNotSupported {
        verb: verb.to_string(),
        resource: resource_type.to_string(),
    };

    if let Some(allowed) = restricted_resources(verb) {
        if !allowed.contains(&resource_type) {
            return Err(not_supported());
        }
    }

    let info = resources
        .get(resource_type)
        .ok_or_else(|| KubechatError::ResourceNotFound(resource_type.to_string()))?;

    let needed = api_verb(verb);
    if !info.verbs.iter().any(|v| v == needed) {
        return Err(not_supported());
    }

    Ok(ResourceDetails {
        namespaced: info.namespaced,
        slash_separated: verb == "logs",
    })
}

#[async_trait]
impl<C: ResourceCatalog> PolicyGate for CommandGuard<C> {
    fn filter_supported_verbs(&self, verbs: Vec<String>) -> Vec<String> {
        verbs
            .into_iter()
            .filter(|v| !UNSUPPORTED_VERBS.contains(&v.as_str()))
            .collect()
    }

    async fn allowed_resources_for_verb(
        &self,
        verb: &str,
        candidates: &[String],
    ) -> Result<Vec<Resource>> {
        if verb.is_empty() || RESOURCELESS_VERBS.contains(&verb) {
            return Ok(Vec::new());
        }

        let resources = self.resource_map().await?;
        let mut out = Vec::new();
        for candidate in candidates {
            match details_from_map(verb, candidate, &resources) {
                Ok(details) => out.push(Resource {
                    name: candidate.clone(),
                    details,
                }),
                Err(
                    e @ (KubechatError::ResourceNotFound(_)
                    | KubechatError::VerbNotSupported { .. }),
                ) => {
                    tracing::debug!(verb = %verb, resource = %candidate, reason = %e, "resource not offered");
                }
                Err(e) => return Err(e),
            }
        }
        Ok(out)
    }

    async fn resource_details(&self, verb: &str, resource_type: &str) -> Result<ResourceDetails> {
        if resource_type.is_empty() {
            return Ok(ResourceDetails::default());
        }
        let resources = self.resource_map().await?;
        details_from_map(verb, resource_type, &resources)
    }
}

/// Fixed in-memory catalog; useful for tests and offline rendering.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    resources: Vec<ApiResourceInfo>,
}

impl StaticCatalog {
    pub fn new(resources: Vec<ApiResourceInfo>) -> Self {
        Self { resources }
    }
}

#[async_trait]
impl ResourceCatalog for StaticCatalog {
    async fn list_resources(&self) -> Result<Vec<ApiResourceInfo>> {
        Ok(self.resources.clone())
    }
}
