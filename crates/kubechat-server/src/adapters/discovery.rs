use async_trait::async_trait;
use kube::discovery::{ApiCapabilities, ApiResource, Discovery, Scope};
use kube::Client;
use kubechat_core::guard::{ApiResourceInfo, ResourceCatalog};
use kubechat_core::{KubechatError, Result};

/// Snapshot of the cluster's API resources, taken once at startup.
#[derive(Debug, Clone)]
pub struct KubeResourceCatalog {
    resources: Vec<ApiResourceInfo>,
}

impl KubeResourceCatalog {
    /// Run API discovery and keep the preferred version of every resource.
    pub async fn discover(client: Client) -> Result<Self> {
        let discovery = Discovery::new(client)
            .run()
            .await
            .map_err(|e| KubechatError::Kube(e.to_string()))?;

        let resources: Vec<ApiResourceInfo> = discovery
            .groups()
            .flat_map(|group| group.recommended_resources())
            .map(|(ar, caps)| resource_info(&ar, &caps))
            .collect();
        tracing::info!(count = resources.len(), "discovered cluster API resources");
        Ok(Self { resources })
    }
}

#[async_trait]
impl ResourceCatalog for KubeResourceCatalog {
    async fn list_resources(&self) -> Result<Vec<ApiResourceInfo>> {
        Ok(self.resources.clone())
    }
}

fn resource_info(ar: &ApiResource, caps: &ApiCapabilities) -> ApiResourceInfo {
    ApiResourceInfo {
        name: ar.plural.clone(),
        namespaced: matches!(caps.scope, Scope::Namespaced),
        verbs: caps.operations.clone(),
    }
}
