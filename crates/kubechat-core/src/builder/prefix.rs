pub const KUBECTL_COMMAND_NAME: &str = "kubectl";

pub const VERBS_DROPDOWN_COMMAND: &str = "kc-cmd-builder --verbs";
pub const RESOURCE_TYPES_DROPDOWN_COMMAND: &str = "kc-cmd-builder --resource-type";
pub const RESOURCE_NAMES_DROPDOWN_COMMAND: &str = "kc-cmd-builder --resource-name";
pub const RESOURCE_NAMESPACE_DROPDOWN_COMMAND: &str = "kc-cmd-builder --namespace";
pub const FILTER_PLAINTEXT_INPUT_COMMAND: &str = "kc-cmd-builder --filter-query";

const KNOWN_CMD_PREFIXES: &[&str] = &[
    VERBS_DROPDOWN_COMMAND,
    RESOURCE_TYPES_DROPDOWN_COMMAND,
    RESOURCE_NAMES_DROPDOWN_COMMAND,
    RESOURCE_NAMESPACE_DROPDOWN_COMMAND,
    FILTER_PLAINTEXT_INPUT_COMMAND,
];

/// Returns the canonical command prefix if the builder handles `args`.
///
/// A bare `kubectl` starts a new session; two or more tokens are matched on
/// their first two tokens against the dropdown commands.
pub fn command_prefix(args: &[String]) -> Option<String> {
    match args {
        [] => None,
        [single] if single == KUBECTL_COMMAND_NAME => Some(single.clone()),
        [_] => None,
        [first, second, ..] => {
            let got = format!("{first} {second}");
            KNOWN_CMD_PREFIXES.contains(&got.as_str()).then_some(got)
        }
    }
}
