use kubechat_core::builder::KubectlCmdBuilder;
use std::sync::Arc;
use std::time::Duration;

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub builder: Arc<KubectlCmdBuilder>,
    /// Deadline for one interaction, discovery calls included.
    pub interaction_timeout: Duration,
    pub cluster_name: String,
}

impl AppState {
    pub fn new(builder: KubectlCmdBuilder, interaction_timeout: Duration, cluster_name: impl Into<String>) -> Self {
        Self {
            builder: Arc::new(builder),
            interaction_timeout,
            cluster_name: cluster_name.into(),
        }
    }
}
