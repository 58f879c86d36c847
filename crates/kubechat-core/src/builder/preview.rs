use super::prefix::KUBECTL_COMMAND_NAME;
use super::state::BuilderState;
use crate::guard::ResourceDetails;

/// Literal kubectl command for `state`, or `None` when the resource needs a
/// name that has not been picked yet.
pub fn assemble_command(state: &BuilderState, details: &ResourceDetails) -> Option<String> {
    if details.slash_separated && state.resource_name.is_empty() {
        return None;
    }

    let resource = match (state.resource_type.as_str(), state.resource_name.as_str()) {
        (ty, "") => ty.to_string(),
        (ty, name) if details.slash_separated => format!("{ty}/{name}"),
        (ty, name) => format!("{ty} {name}"),
    };

    let mut tokens = vec![
        KUBECTL_COMMAND_NAME.to_string(),
        state.verb.clone(),
        resource,
    ];
    if details.namespaced && !state.namespace.is_empty() {
        tokens.push(format!("-n {}", state.namespace));
    }
    if !state.filter.is_empty() {
        // Shell-quoted so the runner's word split recovers the exact text.
        // Text with a NUL byte cannot be quoted and is left out.
        match shlex::try_quote(&state.filter) {
            Ok(quoted) => tokens.push(format!("--filter={quoted}")),
            Err(e) => tracing::warn!(error = %e, "cannot quote filter, leaving it out of the preview"),
        }
    }

    tokens.retain(|t| !t.is_empty());
    Some(tokens.join(" "))
}
