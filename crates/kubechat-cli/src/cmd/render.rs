use crate::output::print_json;
use anyhow::{anyhow, Context};
use kubechat_core::builder::prefix::command_prefix;
use kubechat_core::config::Config;
use kubechat_core::context::CommandContext;
use kubechat_server::routes::interactions::InteractionRequest;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Render one interaction against the live cluster and print the message.
/// `request` is a JSON file in the `POST /api/interactions` shape, or `-`
/// for stdin.
pub fn run(config_path: &Path, request: &Path) -> anyhow::Result<()> {
    let config = Config::load(config_path).context("failed to load config")?;

    let raw = if request == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(request)
            .with_context(|| format!("cannot read {}", request.display()))?
    };
    let req: InteractionRequest =
        serde_json::from_str(&raw).context("invalid interaction request")?;

    if command_prefix(&req.args).is_none() {
        return Err(anyhow!(
            "not a command builder invocation: '{}'",
            req.args.join(" ")
        ));
    }

    let timeout = Duration::from_secs(config.settings.interaction_timeout_seconds);
    let rt = tokio::runtime::Runtime::new()?;
    let msg = rt.block_on(async move {
        let builder = kubechat_server::build_engine(Arc::new(config)).await?;

        let cancel = CancellationToken::new();
        let deadline = {
            let cancel = cancel.clone();
            tokio::spawn(async move {
                tokio::time::sleep(timeout).await;
                cancel.cancel();
            })
        };
        let cmd_ctx = CommandContext {
            user: req.user,
            conversation: req.conversation,
        };
        let result = builder
            .handle(
                &cancel,
                &req.args,
                req.platform,
                &req.bindings,
                req.state.as_ref(),
                &req.header,
                &cmd_ctx,
            )
            .await;
        deadline.abort();
        anyhow::Ok(result?)
    })?;

    print_json(&msg)
}
