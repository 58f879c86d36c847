use async_trait::async_trait;
use k8s_openapi::api::core::v1::Namespace;
use kube::api::{Api, ListParams};
use kube::Client;
use kubechat_core::builder::NamespaceLister;
use kubechat_core::{KubechatError, Result};

/// Lists namespaces through the Kubernetes API.
#[derive(Clone)]
pub struct KubeNamespaceLister {
    api: Api<Namespace>,
}

impl KubeNamespaceLister {
    pub fn new(client: Client) -> Self {
        Self {
            api: Api::all(client),
        }
    }
}

#[async_trait]
impl NamespaceLister for KubeNamespaceLister {
    async fn list(&self, limit: u32) -> Result<Vec<String>> {
        let page = self
            .api
            .list(&ListParams::default().limit(limit))
            .await
            .map_err(|e| KubechatError::Kube(e.to_string()))?;
        if page.metadata.continue_.as_deref().is_some_and(|c| !c.is_empty()) {
            tracing::debug!(limit, "namespace list truncated to first page");
        }
        Ok(page
            .items
            .into_iter()
            .filter_map(|ns| ns.metadata.name)
            .collect())
    }
}
