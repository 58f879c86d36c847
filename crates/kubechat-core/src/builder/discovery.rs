//! Fail-soft lookups that populate the resource name and namespace dropdowns.
//!
//! Collaborator errors never escape these functions, except cancellation.

use super::prefix::KUBECTL_COMMAND_NAME;
use super::render::{
    empty_resource_names_select, namespace_select, resource_names_select, DropdownItem,
};
use super::state::BuilderState;
use super::{KubectlExecutor, NamespaceLister};
use crate::bindings::EnabledKubectl;
use crate::context::{cancellable, CommandContext};
use crate::error::{KubechatError, Result};
use crate::guard::PolicyGate;
use crate::message::Select;
use tokio_util::sync::CancellationToken;

/// Page size for namespace listing. Only the first page is read.
pub const NAMESPACE_PAGE_LIMIT: u32 = 100;

const NAME_LIST_TEMPLATE: &str = r#"go-template='{{range .items}}{{.metadata.name}}{{"\n"}}{{end}}'"#;

/// Command that prints one resource name per line.
pub fn resource_names_command(resource_type: &str, namespace: &str) -> String {
    let mut cmd = format!(
        "{KUBECTL_COMMAND_NAME} get {resource_type} --ignore-not-found=true -o {NAME_LIST_TEMPLATE}"
    );
    if !namespace.is_empty() {
        cmd.push_str(" -n ");
        cmd.push_str(namespace);
    }
    cmd
}

/// Resource name dropdown for the selected type. Execution failures and
/// empty output both produce an empty dropdown.
///
/// Names are only listed from a namespace the bindings allow for the type.
/// Cluster-scoped types are listed without a namespace.
pub async fn resource_names(
    executor: &dyn KubectlExecutor,
    gate: &dyn PolicyGate,
    cancel: &CancellationToken,
    state: &BuilderState,
    kc: &EnabledKubectl,
    bindings: &[String],
    cmd_ctx: &CommandContext,
) -> Result<Select> {
    if state.resource_type.is_empty() {
        return Ok(empty_resource_names_select());
    }

    let namespace = match listing_namespace(gate, cancel, state, kc, bindings).await? {
        Some(ns) => ns,
        None => return Ok(empty_resource_names_select()),
    };

    let cmd = resource_names_command(&state.resource_type, namespace);
    let out = match cancellable(cancel, executor.execute(bindings, &cmd, true, cmd_ctx)).await {
        Ok(out) => out,
        Err(KubechatError::Cancelled) => return Err(KubechatError::Cancelled),
        Err(e) => {
            tracing::warn!(state = ?state, bindings = ?bindings, error = %e, "cannot fetch resource names, rendering empty dropdown");
            return Ok(empty_resource_names_select());
        }
    };

    let names: Vec<String> = out
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect();
    if names.is_empty() {
        return Ok(empty_resource_names_select());
    }
    Ok(resource_names_select(&names, &state.resource_name))
}

/// Namespace to list names in: the selected one when the allow-list admits
/// it, empty for cluster-scoped types, `None` when nothing may be listed.
async fn listing_namespace<'a>(
    gate: &dyn PolicyGate,
    cancel: &CancellationToken,
    state: &'a BuilderState,
    kc: &EnabledKubectl,
    bindings: &[String],
) -> Result<Option<&'a str>> {
    match kc.namespaces_for(&state.resource_type).is_allowed(&state.namespace) {
        Ok(true) => return Ok(Some(state.namespace.as_str())),
        Ok(false) => {}
        Err(e) => {
            tracing::warn!(namespace = %state.namespace, error = %e, "cannot check namespace, rendering empty name dropdown");
            return Ok(None);
        }
    }

    match cancellable(cancel, gate.resource_details(&state.verb, &state.resource_type)).await {
        Ok(details) if !details.namespaced => Ok(Some("")),
        Ok(_) => {
            tracing::debug!(namespace = %state.namespace, resource = %state.resource_type, "namespace not allowed, rendering empty name dropdown");
            Ok(None)
        }
        Err(KubechatError::Cancelled) => Err(KubechatError::Cancelled),
        Err(e) => {
            tracing::warn!(state = ?state, bindings = ?bindings, error = %e, "cannot fetch resource details, rendering empty name dropdown");
            Ok(None)
        }
    }
}

/// Namespace dropdown for the selected type, or `None` when the resource is
/// cluster-scoped or the lookup fails.
pub async fn namespaces(
    gate: &dyn PolicyGate,
    lister: &dyn NamespaceLister,
    cancel: &CancellationToken,
    state: &BuilderState,
    kc: &EnabledKubectl,
    bindings: &[String],
) -> Result<Option<Select>> {
    let details = match cancellable(cancel, gate.resource_details(&state.verb, &state.resource_type)).await {
        Ok(details) => details,
        Err(KubechatError::Cancelled) => return Err(KubechatError::Cancelled),
        Err(e) => {
            tracing::warn!(state = ?state, bindings = ?bindings, error = %e, "cannot fetch resource details, omitting namespace dropdown");
            return Ok(None);
        }
    };
    if !details.namespaced {
        tracing::debug!(resource = %state.resource_type, "resource is cluster-scoped, omitting namespace dropdown");
        return Ok(None);
    }

    let all = match cancellable(cancel, lister.list(NAMESPACE_PAGE_LIMIT)).await {
        Ok(all) => all,
        Err(KubechatError::Cancelled) => return Err(KubechatError::Cancelled),
        Err(e) => {
            tracing::warn!(state = ?state, bindings = ?bindings, error = %e, "cannot list namespaces, omitting namespace dropdown");
            return Ok(None);
        }
    };

    let allowed = kc.namespaces_for(&state.resource_type);
    let mut items = Vec::new();
    for ns in &all {
        match allowed.is_allowed(ns) {
            Ok(true) => items.push(DropdownItem::namespace(ns)),
            Ok(false) => tracing::debug!(namespace = %ns, "namespace not allowed, skipping"),
            Err(e) => {
                tracing::warn!(namespace = %ns, error = %e, "cannot check namespace, skipping");
            }
        }
    }

    Ok(namespace_select(items, &state.namespace))
}
