use axum::extract::State;
use axum::Json;
use kubechat_core::builder::state::InteractionState;
use kubechat_core::context::{CommandContext, Conversation, Platform};
use kubechat_core::message::CoreMessage;
use serde::Deserialize;
use tokio_util::sync::CancellationToken;

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct InteractionRequest {
    /// Command tokens, e.g. `["kc-cmd-builder", "--verbs"]`.
    pub args: Vec<String>,
    pub platform: Platform,
    /// Executor bindings of the channel the interaction came from.
    #[serde(default)]
    pub bindings: Vec<String>,
    #[serde(default)]
    pub state: Option<InteractionState>,
    #[serde(default)]
    pub header: String,
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    pub conversation: Conversation,
}

/// POST /api/interactions: render the builder message for one chat action.
///
/// The render is cancelled when the interaction deadline passes or the
/// client goes away.
pub async fn handle_interaction(
    State(app): State<AppState>,
    Json(body): Json<InteractionRequest>,
) -> Result<Json<CoreMessage>, AppError> {
    if !app.builder.can_handle(&body.args) {
        return Err(AppError::bad_request(format!(
            "not a command builder invocation: '{}'",
            body.args.join(" ")
        )));
    }

    let cancel = CancellationToken::new();
    let _on_drop = cancel.clone().drop_guard();
    let deadline = {
        let cancel = cancel.clone();
        let timeout = app.interaction_timeout;
        tokio::spawn(async move {
            tokio::time::sleep(timeout).await;
            cancel.cancel();
        })
    };

    let cmd_ctx = CommandContext {
        user: body.user,
        conversation: body.conversation,
    };
    let result = app
        .builder
        .handle(
            &cancel,
            &body.args,
            body.platform,
            &body.bindings,
            body.state.as_ref(),
            &body.header,
            &cmd_ctx,
        )
        .await;
    deadline.abort();

    Ok(Json(result?))
}
