//! Platform-neutral interactive message model.
//!
//! Chat backends translate these structures into their native block formats.
//! The builder only ever produces them; it never talks to a chat API.

use serde::{Deserialize, Serialize};

/// Placeholder the chat backend replaces with the bot mention (e.g. `@kubechat`).
pub const BOT_NAME_PLACEHOLDER: &str = "{{BotName}}";

// ---------------------------------------------------------------------------
// Select
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectType {
    #[default]
    Static,
    External,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionItem {
    pub name: String,
    pub value: String,
}

impl OptionItem {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionGroup {
    pub name: String,
    #[serde(default)]
    pub options: Vec<OptionItem>,
}

/// A single dropdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Select {
    #[serde(default, rename = "type")]
    pub kind: SelectType,
    pub name: String,
    pub command: String,
    #[serde(default)]
    pub option_groups: Vec<OptionGroup>,
    /// Pre-selected option. MUST be one of the options in `option_groups`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_option: Option<OptionItem>,
}

impl Select {
    /// Reports whether `value` is the pre-selected option of this dropdown.
    pub fn has_initial_value(&self, value: &str) -> bool {
        self.initial_option
            .as_ref()
            .is_some_and(|opt| opt.value == value)
    }

    pub fn options(&self) -> impl Iterator<Item = &OptionItem> {
        self.option_groups.iter().flat_map(|g| g.options.iter())
    }

    pub fn has_options(&self) -> bool {
        self.options().next().is_some()
    }
}

/// A group of dropdowns rendered in one block. `id` keeps the platform-side
/// selection state attached to the block across message updates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selects {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub items: Vec<Select>,
}

impl Selects {
    pub fn are_options_defined(&self) -> bool {
        !self.items.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Inputs, buttons, sections
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchedInputAction {
    #[default]
    None,
    OnEnterPressed,
    OnCharacterEntered,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelInput {
    pub command: String,
    pub text: String,
    #[serde(default)]
    pub placeholder: String,
    #[serde(default)]
    pub dispatched_action: DispatchedInputAction,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ButtonStyle {
    #[default]
    Default,
    Primary,
    Danger,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Button {
    pub name: String,
    pub command: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default)]
    pub style: ButtonStyle,
}

impl Button {
    /// Button that sends `cmd` addressed to the bot, without a description line.
    pub fn for_command_without_desc(name: impl Into<String>, cmd: &str, style: ButtonStyle) -> Self {
        Self {
            name: name.into(),
            command: format!("{BOT_NAME_PLACEHOLDER} {cmd}"),
            description: String::new(),
            style,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Body {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub code_block: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub plaintext: String,
}

impl Body {
    pub fn is_empty(&self) -> bool {
        self.code_block.is_empty() && self.plaintext.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Base {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub header: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "Body::is_empty")]
    pub body: Body,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextItem {
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    #[serde(default)]
    pub base: Base,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub buttons: Vec<Button>,
    #[serde(default, skip_serializing_if = "is_empty_selects")]
    pub selects: Selects,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub plaintext_inputs: Vec<LabelInput>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub context: Vec<ContextItem>,
}

fn is_empty_selects(s: &Selects) -> bool {
    !s.are_options_defined()
}

// ---------------------------------------------------------------------------
// Message
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageType {
    #[default]
    Default,
    BaseBodyWithFilter,
    Popup,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    #[serde(default, rename = "type")]
    pub kind: MessageType,
    #[serde(default, skip_serializing_if = "Body::is_empty")]
    pub base_body: Body,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sections: Vec<Section>,
    #[serde(default)]
    pub only_visible_for_you: bool,
    #[serde(default)]
    pub replace_original: bool,
}

impl Message {
    pub fn is_empty(&self) -> bool {
        self.base_body.is_empty() && self.sections.is_empty()
    }

    /// All dropdowns across all sections, in render order.
    pub fn selects(&self) -> impl Iterator<Item = &Select> {
        self.sections.iter().flat_map(|s| s.selects.items.iter())
    }

    pub fn plaintext_inputs(&self) -> impl Iterator<Item = &LabelInput> {
        self.sections.iter().flat_map(|s| s.plaintext_inputs.iter())
    }
}

/// A message plus the header/description the dispatcher decorates it with.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoreMessage {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub header: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(flatten)]
    pub message: Message,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn select_initial_value_matches_by_value_only() {
        let select = Select {
            kind: SelectType::Static,
            name: "Select namespace".to_string(),
            command: "cmd".to_string(),
            option_groups: vec![OptionGroup {
                name: "Select namespace".to_string(),
                options: vec![OptionItem::new("default (namespace)", "default")],
            }],
            initial_option: Some(OptionItem::new("default (namespace)", "default")),
        };
        assert!(select.has_initial_value("default"));
        assert!(!select.has_initial_value("default (namespace)"));
        assert!(select.has_options());
    }

    #[test]
    fn core_message_json_is_flattened() {
        let msg = CoreMessage {
            description: "header".to_string(),
            message: Message {
                base_body: Body {
                    plaintext: "hello".to_string(),
                    ..Default::default()
                },
                ..Default::default()
            },
            ..Default::default()
        };
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["description"], "header");
        assert_eq!(json["base_body"]["plaintext"], "hello");
        assert_eq!(json["replace_original"], false);
        assert!(json.get("sections").is_none());
    }

    #[test]
    fn button_command_is_addressed_to_bot() {
        let btn = Button::for_command_without_desc("Run command", "kubectl get pods", ButtonStyle::Primary);
        assert_eq!(btn.command, "{{BotName}} kubectl get pods");
    }
}
