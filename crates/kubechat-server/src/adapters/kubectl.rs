use async_trait::async_trait;
use kubechat_core::bindings::KubectlMerger;
use kubechat_core::builder::prefix::KUBECTL_COMMAND_NAME;
use kubechat_core::builder::KubectlExecutor;
use kubechat_core::context::CommandContext;
use kubechat_core::{KubechatError, Result};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::process::Command;

const FILTER_FLAG: &str = "--filter";

/// Runs kubectl commands as a subprocess on behalf of chat channels.
pub struct KubectlRunner {
    binary: PathBuf,
    merger: Arc<dyn KubectlMerger>,
}

impl KubectlRunner {
    pub fn new(binary: impl Into<PathBuf>, merger: Arc<dyn KubectlMerger>) -> Self {
        Self {
            binary: binary.into(),
            merger,
        }
    }

    /// Resolve `binary` on `PATH`.
    pub fn locate(binary: &str, merger: Arc<dyn KubectlMerger>) -> Result<Self> {
        let path = which::which(binary).map_err(|e| KubechatError::Execution {
            command: binary.to_string(),
            message: format!("binary not found: {e}"),
        })?;
        Ok(Self::new(path, merger))
    }

    /// Validate `command` and turn it into the argument list passed to the
    /// binary, plus the output filter if one was given.
    fn prepare(&self, bindings: &[String], command: &str, auth_exempt: bool) -> Result<Invocation> {
        let tokens = tokenize(command)?;
        let (tokens, filter) = extract_filter(tokens)?;

        let mut tokens = tokens.into_iter();
        match tokens.next() {
            Some(name) if name == KUBECTL_COMMAND_NAME => {}
            _ => {
                return Err(KubechatError::Forbidden(format!(
                    "'{command}' is not a {KUBECTL_COMMAND_NAME} command"
                )))
            }
        }
        let args: Vec<String> = tokens.collect();
        let Some(verb) = args.first() else {
            return Err(KubechatError::Forbidden(format!(
                "'{command}' is missing a verb"
            )));
        };

        let kc = self.merger.merge_all_enabled(bindings);
        if !auth_exempt && !kc.allowed_verbs.contains(verb) {
            return Err(KubechatError::Forbidden(format!(
                "verb '{verb}' is not enabled in this channel"
            )));
        }

        let mut full = Vec::with_capacity(args.len() + 2);
        if !has_namespace_flag(&args) {
            full.push("-n".to_string());
            full.push(kc.default_namespace_or_fallback().to_string());
        }
        full.extend(args);

        Ok(Invocation { args: full, filter })
    }
}

struct Invocation {
    args: Vec<String>,
    filter: Option<String>,
}

#[async_trait]
impl KubectlExecutor for KubectlRunner {
    async fn execute(
        &self,
        bindings: &[String],
        command: &str,
        auth_exempt: bool,
        cmd_ctx: &CommandContext,
    ) -> Result<String> {
        let inv = self.prepare(bindings, command, auth_exempt)?;
        tracing::debug!(
            command = %command,
            user = %cmd_ctx.user,
            conversation = %cmd_ctx.conversation.id,
            auth_exempt,
            "running kubectl"
        );

        let output = Command::new(&self.binary)
            .args(&inv.args)
            .stdin(std::process::Stdio::null())
            .kill_on_drop(true)
            .output()
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(KubechatError::Execution {
                command: command.to_string(),
                message: if stderr.is_empty() {
                    format!("exited with {}", output.status)
                } else {
                    stderr
                },
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        Ok(match inv.filter {
            Some(f) => filter_lines(&stdout, &f),
            None => stdout,
        })
    }
}

// ---------------------------------------------------------------------------
// Parsing helpers
// ---------------------------------------------------------------------------

/// Split a command line into shell words.
pub fn tokenize(command: &str) -> Result<Vec<String>> {
    shlex::split(command)
        .ok_or_else(|| KubechatError::Forbidden(format!("malformed quoting in '{command}'")))
}

/// Remove `--filter=<text>` or `--filter <text>` from the arguments.
fn extract_filter(tokens: Vec<String>) -> Result<(Vec<String>, Option<String>)> {
    let mut out = Vec::with_capacity(tokens.len());
    let mut filter = None;
    let mut iter = tokens.into_iter();
    while let Some(tok) = iter.next() {
        if let Some(value) = tok.strip_prefix("--filter=") {
            filter = Some(value.to_string());
        } else if tok == FILTER_FLAG {
            let value = iter.next().ok_or_else(|| {
                KubechatError::Forbidden(format!("{FILTER_FLAG} requires a value"))
            })?;
            filter = Some(value);
        } else {
            out.push(tok);
        }
    }
    Ok((out, filter.filter(|f| !f.is_empty())))
}

pub fn has_namespace_flag(args: &[String]) -> bool {
    args.iter().any(|a| {
        matches!(
            a.as_str(),
            "-n" | "--namespace" | "-A" | "--all-namespaces"
        ) || a.starts_with("--namespace=")
            || a.starts_with("--all-namespaces=")
            || (a.starts_with("-n") && a.len() > 2 && !a.starts_with("--"))
    })
}

fn filter_lines(output: &str, needle: &str) -> String {
    output
        .lines()
        .filter(|l| l.contains(needle))
        .map(|l| format!("{l}\n"))
        .collect()
}
