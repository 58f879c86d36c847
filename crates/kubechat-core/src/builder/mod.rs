//! Interactive kubectl command builder.
//!
//! Every interaction re-derives the builder state from the platform snapshot,
//! decides how many dropdowns to disclose and re-renders the whole message.
//! Nothing is kept between calls.

pub mod discovery;
pub mod prefix;
pub mod preview;
pub mod render;
pub mod rules;
pub mod state;

use crate::bindings::{EnabledKubectl, KubectlMerger};
use crate::context::{cancellable, CommandContext, Platform};
use crate::error::{KubechatError, Result};
use crate::guard::PolicyGate;
use crate::message::{CoreMessage, Section, Select};
use async_trait::async_trait;
use prefix::{
    FILTER_PLAINTEXT_INPUT_COMMAND, RESOURCE_NAMESPACE_DROPDOWN_COMMAND,
    RESOURCE_NAMES_DROPDOWN_COMMAND, RESOURCE_TYPES_DROPDOWN_COMMAND, VERBS_DROPDOWN_COMMAND,
};
use render::{
    builder_message, internal_error_section, plaintext_message, preview_sections,
    resource_type_select, verb_select,
};
use rules::{Disclosure, Pipeline};
use state::{BuilderState, InteractionState};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

pub const NO_KUBECTL_COMMANDS_MSG: &str = "No `kubectl` commands are enabled in this channel. \
     Enable them by binding a kubectl executor to the channel in the configuration.";
pub const KUBECTL_MISSING_COMMAND_MSG: &str = "Please specify the kubectl command";

// ---------------------------------------------------------------------------
// Collaborators
// ---------------------------------------------------------------------------

/// Cluster namespace inventory.
#[async_trait]
pub trait NamespaceLister: Send + Sync {
    /// Namespace names from the first page of at most `limit` entries.
    async fn list(&self, limit: u32) -> Result<Vec<String>>;
}

/// Runs a complete kubectl command line on behalf of the caller.
#[async_trait]
pub trait KubectlExecutor: Send + Sync {
    /// `auth_exempt` skips the per-binding verb check; the builder uses it
    /// for its own read-only discovery commands.
    async fn execute(
        &self,
        bindings: &[String],
        command: &str,
        auth_exempt: bool,
        cmd_ctx: &CommandContext,
    ) -> Result<String>;
}

// ---------------------------------------------------------------------------
// KubectlCmdBuilder
// ---------------------------------------------------------------------------

pub struct KubectlCmdBuilder {
    merger: Arc<dyn KubectlMerger>,
    executor: Arc<dyn KubectlExecutor>,
    namespaces: Arc<dyn NamespaceLister>,
    gate: Arc<dyn PolicyGate>,
    pipeline: Pipeline,
}

impl KubectlCmdBuilder {
    pub fn new(
        merger: Arc<dyn KubectlMerger>,
        executor: Arc<dyn KubectlExecutor>,
        namespaces: Arc<dyn NamespaceLister>,
        gate: Arc<dyn PolicyGate>,
    ) -> Self {
        Self {
            merger,
            executor,
            namespaces,
            gate,
            pipeline: Pipeline::default(),
        }
    }

    pub fn can_handle(&self, args: &[String]) -> bool {
        self.command_prefix(args).is_some()
    }

    pub fn command_prefix(&self, args: &[String]) -> Option<String> {
        prefix::command_prefix(args)
    }

    /// Handle one builder interaction and return the message to display.
    #[allow(clippy::too_many_arguments)]
    pub async fn handle(
        &self,
        cancel: &CancellationToken,
        args: &[String],
        platform: Platform,
        bindings: &[String],
        state: Option<&InteractionState>,
        header: &str,
        cmd_ctx: &CommandContext,
    ) -> Result<CoreMessage> {
        if !platform.is_interactive() {
            tracing::debug!(%platform, "interactive kubectl builder not supported on platform");
            return Ok(plaintext_message(header, KUBECTL_MISSING_COMMAND_MSG));
        }

        let kc = self.merger.merge_all_enabled(bindings);
        if kc.allowed_verbs.is_empty() {
            return Ok(plaintext_message(header, NO_KUBECTL_COMMANDS_MSG));
        }
        let verbs = self.gate.filter_supported_verbs(kc.verbs());

        if args.len() == 1 {
            return initial_message(&verbs);
        }

        let mut details = BuilderState::extract(state);
        if details.namespace.is_empty() {
            details.namespace = kc.default_namespace_or_fallback().to_string();
        }

        let result = match args {
            [name, verb, ..] => {
                let cmd = format!("{name} {verb}");
                match adjust_for_prefix(&cmd, details) {
                    Ok(details) => {
                        self.render(cancel, details, &kc, bindings, &verbs, cmd_ctx)
                            .await
                    }
                    Err(e) => Err(e),
                }
            }
            _ => Err(KubechatError::UnknownCommand(args.join(" "))),
        };

        match result {
            Err(KubechatError::Cancelled) => {
                tracing::debug!("kubectl builder interaction cancelled");
                Err(KubechatError::Cancelled)
            }
            Err(e) => {
                tracing::error!(error = %e, "cannot render the kubectl command builder");
                Err(e)
            }
            ok => ok,
        }
    }

    async fn render(
        &self,
        cancel: &CancellationToken,
        state: BuilderState,
        kc: &EnabledKubectl,
        bindings: &[String],
        verbs: &[String],
        cmd_ctx: &CommandContext,
    ) -> Result<CoreMessage> {
        let verbs_select = verb_select(verbs, &state.verb).ok_or(KubechatError::VerbDropdownEmpty)?;
        if !verbs.contains(&state.verb) {
            // Nothing downstream may run on a verb the dropdown no longer offers.
            if !state.verb.is_empty() {
                tracing::debug!(verb = %state.verb, "selected verb is no longer permitted, resetting");
            }
            return Ok(builder_message(
                &state.session_block_id,
                verbs_select,
                Vec::new(),
                Vec::new(),
            ));
        }

        let types: Vec<String> = cancellable(
            cancel,
            self.gate
                .allowed_resources_for_verb(&state.verb, &kc.resources()),
        )
        .await?
        .into_iter()
        .map(|r| r.name)
        .collect();

        let (disclosure, state) = self.pipeline.classify(state, &types);
        let block_id = state.session_block_id.clone();

        match disclosure {
            Disclosure::VerbOnly => {
                let sections = self.preview(cancel, &state).await?;
                Ok(builder_message(&block_id, verbs_select, Vec::new(), sections))
            }
            Disclosure::TypeSelection => Ok(builder_message(
                &block_id,
                verbs_select,
                vec![Some(resource_type_select(&types, &state.resource_type))],
                Vec::new(),
            )),
            Disclosure::Full => {
                let (names, namespaces) = tokio::join!(
                    discovery::resource_names(
                        self.executor.as_ref(),
                        self.gate.as_ref(),
                        cancel,
                        &state,
                        kc,
                        bindings,
                        cmd_ctx
                    ),
                    discovery::namespaces(
                        self.gate.as_ref(),
                        self.namespaces.as_ref(),
                        cancel,
                        &state,
                        kc,
                        bindings
                    ),
                );
                let (names, namespaces) = (names?, namespaces?);

                let state = reconcile(state, &names, namespaces.as_ref());
                let sections = self.preview(cancel, &state).await?;
                Ok(builder_message(
                    &block_id,
                    verbs_select,
                    vec![
                        Some(resource_type_select(&types, &state.resource_type)),
                        Some(names),
                        namespaces,
                    ],
                    sections,
                ))
            }
        }
    }

    /// Preview sections for `state`. A failed metadata lookup renders an
    /// internal-error section, still carrying the filter input.
    async fn preview(&self, cancel: &CancellationToken, state: &BuilderState) -> Result<Vec<Section>> {
        let details = cancellable(
            cancel,
            self.gate.resource_details(&state.verb, &state.resource_type),
        )
        .await;
        match details {
            Ok(details) => Ok(preview::assemble_command(state, &details)
                .map(|cmd| preview_sections(&cmd))
                .unwrap_or_default()),
            Err(KubechatError::Cancelled) => Err(KubechatError::Cancelled),
            Err(e) => {
                tracing::error!(state = ?state, error = %e, "cannot get resource details");
                Ok(vec![internal_error_section()])
            }
        }
    }
}

/// First message of a new session: a fresh block id and only the verb dropdown.
fn initial_message(verbs: &[String]) -> Result<CoreMessage> {
    let verbs_select = verb_select(verbs, "").ok_or(KubechatError::VerbDropdownEmpty)?;
    let block_id = uuid::Uuid::new_v4().to_string();

    let mut msg = builder_message(&block_id, verbs_select, Vec::new(), Vec::new());
    // A new message visible to the caller only; never replace a public one.
    msg.message.replace_original = false;
    Ok(msg)
}

/// Apply what the triggering dropdown implies about the rest of the snapshot.
fn adjust_for_prefix(cmd: &str, state: BuilderState) -> Result<BuilderState> {
    match cmd {
        RESOURCE_TYPES_DROPDOWN_COMMAND | RESOURCE_NAMESPACE_DROPDOWN_COMMAND => {
            Ok(BuilderState {
                resource_name: String::new(),
                ..state
            })
        }
        VERBS_DROPDOWN_COMMAND | RESOURCE_NAMES_DROPDOWN_COMMAND | FILTER_PLAINTEXT_INPUT_COMMAND => {
            Ok(state)
        }
        other => Err(KubechatError::UnknownCommand(other.to_string())),
    }
}

/// Clear selections that the freshly discovered dropdowns no longer offer.
fn reconcile(mut state: BuilderState, names: &Select, namespaces: Option<&Select>) -> BuilderState {
    if !names.has_initial_value(&state.resource_name) {
        state.resource_name.clear();
    }
    if !namespaces.is_some_and(|s| s.has_initial_value(&state.namespace)) {
        state.namespace.clear();
    }
    state
}
