use anyhow::Context;
use kubechat_core::config::Config;
use std::path::Path;

pub fn run(config_path: &Path, port: u16) -> anyhow::Result<()> {
    let config = Config::load(config_path).context("failed to load config")?;
    for w in config.validate() {
        tracing::warn!(level = ?w.level, "{}", w.message);
    }

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async move {
        let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}")).await?;
        tracing::info!(port = listener.local_addr()?.port(), "connecting to cluster");

        tokio::select! {
            res = kubechat_server::serve_on(config, listener) => res,
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("shutting down");
                Ok(())
            }
        }
    })
}
