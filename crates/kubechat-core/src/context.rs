use crate::error::{KubechatError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;
use tokio_util::sync::CancellationToken;

// ---------------------------------------------------------------------------
// Platform
// ---------------------------------------------------------------------------

/// Chat platform an interaction came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    Slack,
    SocketSlack,
    Teams,
    Discord,
    Mattermost,
    Webhook,
}

impl Platform {
    /// Whether the platform can render dropdowns and inputs.
    pub fn is_interactive(self) -> bool {
        matches!(self, Platform::Slack | Platform::SocketSlack | Platform::Teams)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Platform::Slack => "slack",
            Platform::SocketSlack => "socket_slack",
            Platform::Teams => "teams",
            Platform::Discord => "discord",
            Platform::Mattermost => "mattermost",
            Platform::Webhook => "webhook",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// CommandContext
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub display_name: String,
    /// Whether the channel is allowed to run commands beyond read-only discovery.
    #[serde(default)]
    pub is_authenticated: bool,
}

/// Caller details forwarded to the execution gateway.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandContext {
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    pub conversation: Conversation,
}

/// Race `fut` against `cancel`. Cancellation wins ties.
pub async fn cancellable<T, F>(cancel: &CancellationToken, fut: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(KubechatError::Cancelled),
        res = fut => res,
    }
}
