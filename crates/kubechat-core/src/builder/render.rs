//! Dropdown and section constructors for the command builder message.

use super::prefix::{
    FILTER_PLAINTEXT_INPUT_COMMAND, RESOURCE_NAMESPACE_DROPDOWN_COMMAND,
    RESOURCE_NAMES_DROPDOWN_COMMAND, RESOURCE_TYPES_DROPDOWN_COMMAND, VERBS_DROPDOWN_COMMAND,
};
use crate::message::{
    Base, Body, Button, ButtonStyle, CoreMessage, DispatchedInputAction, LabelInput, Message,
    OptionGroup, OptionItem, Section, Select, SelectType, Selects, BOT_NAME_PLACEHOLDER,
};

/// Dropdown option labels longer than this are truncated.
pub const MAX_OPTION_LABEL_LEN: usize = 75;
const TRUNCATED_LABEL_LEN: usize = 72;
const ELLIPSIS: &str = "...";

const DEFAULT_NAMESPACE_NAME: &str = "default";
const NAMESPACE_LABEL_SUFFIX: &str = " (namespace)";

// ---------------------------------------------------------------------------
// Dropdown items
// ---------------------------------------------------------------------------

/// A dropdown option before it is placed in a [`Select`]: the label may be
/// decorated or truncated, the value is what ends up in the command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropdownItem {
    pub label: String,
    pub value: String,
}

impl DropdownItem {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }

    /// Item whose label is the value, truncated to fit the platform limit.
    pub fn truncated(value: &str) -> Self {
        let label = if value.chars().count() > MAX_OPTION_LABEL_LEN {
            let head: String = value.chars().take(TRUNCATED_LABEL_LEN).collect();
            format!("{head}{ELLIPSIS}")
        } else {
            value.to_string()
        };
        Self::new(label, value)
    }

    /// Namespace item; `default` gets a suffix so it is not mistaken for a
    /// resource called `default`.
    pub fn namespace(name: &str) -> Self {
        if name == DEFAULT_NAMESPACE_NAME {
            Self::new(format!("{name}{NAMESPACE_LABEL_SUFFIX}"), name)
        } else {
            Self::new(name, name)
        }
    }

    fn into_option(self) -> OptionItem {
        OptionItem::new(self.label, self.value)
    }
}

// ---------------------------------------------------------------------------
// Selects
// ---------------------------------------------------------------------------

fn builder_command(cmd: &str) -> String {
    format!("{BOT_NAME_PLACEHOLDER} {cmd}")
}

/// Build a static dropdown; `initial` is kept only if it is one of the options.
fn select(name: &str, cmd: &str, items: Vec<DropdownItem>, initial: &str) -> Select {
    let options: Vec<OptionItem> = items.into_iter().map(DropdownItem::into_option).collect();
    let initial_option = if initial.is_empty() {
        None
    } else {
        options.iter().find(|o| o.value == initial).cloned()
    };
    Select {
        kind: SelectType::Static,
        name: name.to_string(),
        command: builder_command(cmd),
        option_groups: vec![OptionGroup {
            name: name.to_string(),
            options,
        }],
        initial_option,
    }
}

fn plain_items(values: &[String]) -> Vec<DropdownItem> {
    values.iter().map(|v| DropdownItem::new(v, v)).collect()
}

/// Verb dropdown, or `None` when there are no verbs to offer.
pub fn verb_select(verbs: &[String], initial: &str) -> Option<Select> {
    if verbs.is_empty() {
        return None;
    }
    Some(select(
        "Select command",
        VERBS_DROPDOWN_COMMAND,
        plain_items(verbs),
        initial,
    ))
}

pub fn resource_type_select(types: &[String], initial: &str) -> Select {
    select(
        "Select resource",
        RESOURCE_TYPES_DROPDOWN_COMMAND,
        plain_items(types),
        initial,
    )
}

pub fn resource_names_select(names: &[String], initial: &str) -> Select {
    let items = names.iter().map(|n| DropdownItem::truncated(n)).collect();
    select(
        "Select resource name",
        RESOURCE_NAMES_DROPDOWN_COMMAND,
        items,
        initial,
    )
}

/// Resource name dropdown with no options. Distinct from omitting the dropdown.
pub fn empty_resource_names_select() -> Select {
    select(
        "Select resource name",
        RESOURCE_NAMES_DROPDOWN_COMMAND,
        Vec::new(),
        "",
    )
}

/// Namespace dropdown, or `None` when no namespace is allowed.
pub fn namespace_select(items: Vec<DropdownItem>, initial: &str) -> Option<Select> {
    if items.is_empty() {
        return None;
    }
    Some(select(
        "Select namespace",
        RESOURCE_NAMESPACE_DROPDOWN_COMMAND,
        items,
        initial,
    ))
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

pub fn filter_input() -> LabelInput {
    LabelInput {
        command: format!("{} ", builder_command(FILTER_PLAINTEXT_INPUT_COMMAND)),
        text: "Filter output".to_string(),
        placeholder: "Filter output by string (optional)".to_string(),
        dispatched_action: DispatchedInputAction::OnCharacterEntered,
    }
}

/// Command code block with the filter input, followed by the run button.
pub fn preview_sections(cmd: &str) -> Vec<Section> {
    vec![
        Section {
            base: Base {
                body: Body {
                    code_block: cmd.to_string(),
                    ..Default::default()
                },
                ..Default::default()
            },
            plaintext_inputs: vec![filter_input()],
            ..Default::default()
        },
        Section {
            buttons: vec![Button::for_command_without_desc(
                "Run command",
                cmd,
                ButtonStyle::Primary,
            )],
            ..Default::default()
        },
    ]
}

/// Shown in place of the preview when the command cannot be assembled. The
/// filter input stays so the user can keep refining the selection.
pub fn internal_error_section() -> Section {
    Section {
        base: Base {
            body: Body {
                plaintext: "⚠️ Command cannot be constructed. Ask your admin to check the logs."
                    .to_string(),
                ..Default::default()
            },
            ..Default::default()
        },
        plaintext_inputs: vec![filter_input()],
        ..Default::default()
    }
}

// ---------------------------------------------------------------------------
// Messages
// ---------------------------------------------------------------------------

/// The command builder message: one dropdown block keyed by `block_id`,
/// followed by `sections`. Re-renders replace the original message.
pub fn builder_message(
    block_id: &str,
    verbs: Select,
    selects: Vec<Option<Select>>,
    sections: Vec<Section>,
) -> CoreMessage {
    let mut items = vec![verbs];
    items.extend(selects.into_iter().flatten());

    let mut all_sections = vec![Section {
        selects: Selects {
            id: block_id.to_string(),
            items,
        },
        ..Default::default()
    }];
    all_sections.extend(sections);

    CoreMessage {
        message: Message {
            sections: all_sections,
            only_visible_for_you: true,
            replace_original: true,
            ..Default::default()
        },
        ..Default::default()
    }
}

pub fn plaintext_message(header: &str, text: &str) -> CoreMessage {
    CoreMessage {
        description: header.to_string(),
        message: Message {
            base_body: Body {
                plaintext: text.to_string(),
                ..Default::default()
            },
            ..Default::default()
        },
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn verb_select_none_when_empty() {
        assert!(verb_select(&[], "get").is_none());
    }

    #[test]
    fn verb_select_keeps_valid_initial_only() {
        let verbs = strings(&["describe", "get"]);
        let s = verb_select(&verbs, "get").unwrap();
        assert!(s.has_initial_value("get"));
        assert_eq!(s.command, "{{BotName}} kc-cmd-builder --verbs");

        let s = verb_select(&verbs, "delete").unwrap();
        assert!(s.initial_option.is_none());
    }

    #[test]
    fn long_names_are_truncated_in_label_only() {
        let long = "a".repeat(80);
        let item = DropdownItem::truncated(&long);
        assert_eq!(item.label.chars().count(), 75);
        assert!(item.label.ends_with("..."));
        assert_eq!(&item.label[..72], &long[..72]);
        assert_eq!(item.value, long);
    }

    #[test]
    fn label_at_limit_is_not_truncated() {
        let exact = "b".repeat(75);
        assert_eq!(DropdownItem::truncated(&exact).label, exact);
        let over = "b".repeat(76);
        assert!(DropdownItem::truncated(&over).label.ends_with("..."));
    }

    #[test]
    fn truncated_name_stays_selectable_by_value() {
        let long = "x".repeat(90);
        let s = resource_names_select(&[long.clone()], &long);
        assert!(s.has_initial_value(&long));
    }

    #[test]
    fn default_namespace_gets_suffix() {
        let item = DropdownItem::namespace("default");
        assert_eq!(item.label, "default (namespace)");
        assert_eq!(item.value, "default");
        assert_eq!(DropdownItem::namespace("team-a").label, "team-a");
    }

    #[test]
    fn empty_resource_names_select_has_no_options() {
        let s = empty_resource_names_select();
        assert!(!s.has_options());
        assert_eq!(s.option_groups.len(), 1);
    }

    #[test]
    fn builder_message_skips_missing_selects() {
        let verbs = verb_select(&strings(&["get"]), "").unwrap();
        let msg = builder_message("block-1", verbs, vec![None, Some(empty_resource_names_select())], vec![]);
        assert!(msg.message.replace_original);
        assert!(msg.message.only_visible_for_you);
        assert_eq!(msg.message.sections[0].selects.id, "block-1");
        assert_eq!(msg.message.selects().count(), 2);
    }

    #[test]
    fn preview_sections_carry_filter_and_run_button() {
        let sections = preview_sections("kubectl get pods");
        assert_eq!(sections[0].base.body.code_block, "kubectl get pods");
        assert_eq!(sections[0].plaintext_inputs[0], filter_input());
        assert_eq!(sections[1].buttons[0].command, "{{BotName}} kubectl get pods");
    }

    #[test]
    fn internal_error_section_keeps_filter_input() {
        let section = internal_error_section();
        assert!(section.base.body.code_block.is_empty());
        assert_eq!(section.plaintext_inputs, vec![filter_input()]);
    }
}
