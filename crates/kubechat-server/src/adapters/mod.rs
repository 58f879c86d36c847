//! Cluster-facing implementations of the builder's collaborators.

pub mod discovery;
pub mod kubectl;
pub mod namespaces;

pub use discovery::KubeResourceCatalog;
pub use kubectl::KubectlRunner;
pub use namespaces::KubeNamespaceLister;
