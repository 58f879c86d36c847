use super::prefix::{
    FILTER_PLAINTEXT_INPUT_COMMAND, RESOURCE_NAMESPACE_DROPDOWN_COMMAND,
    RESOURCE_NAMES_DROPDOWN_COMMAND, RESOURCE_TYPES_DROPDOWN_COMMAND, VERBS_DROPDOWN_COMMAND,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ---------------------------------------------------------------------------
// Platform payload
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedOption {
    #[serde(default)]
    pub value: String,
}

/// Current value of one interactive element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_option: Option<SelectedOption>,
    /// Free-text value for plaintext inputs.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub value: String,
}

impl ElementState {
    pub fn selected(value: impl Into<String>) -> Self {
        Self {
            selected_option: Some(SelectedOption {
                value: value.into(),
            }),
            value: String::new(),
        }
    }

    pub fn text(value: impl Into<String>) -> Self {
        Self {
            selected_option: None,
            value: value.into(),
        }
    }

    fn selected_value(&self) -> String {
        self.selected_option
            .as_ref()
            .map(|o| o.value.clone())
            .unwrap_or_default()
    }
}

/// Snapshot of every element the platform knows for one message:
/// block id → element id → state. The platform re-sends it in full on
/// every interaction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionState {
    #[serde(default)]
    pub values: BTreeMap<String, BTreeMap<String, ElementState>>,
}

// ---------------------------------------------------------------------------
// BuilderState
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuilderState {
    /// Identifier of the dropdown block; stable across re-renders of one message.
    pub session_block_id: String,
    pub verb: String,
    pub resource_type: String,
    pub resource_name: String,
    pub namespace: String,
    pub filter: String,
}

impl BuilderState {
    /// Rebuild the builder state from a platform snapshot.
    ///
    /// The dropdowns block is the one whose id does not carry the filter
    /// input command, since the filter lives in its own input block.
    pub fn extract(state: Option<&InteractionState>) -> Self {
        let Some(state) = state else {
            return Self::default();
        };

        let mut details = Self::default();
        for (block_id, elements) in &state.values {
            if !block_id.contains(FILTER_PLAINTEXT_INPUT_COMMAND) {
                details.session_block_id = block_id.clone();
            }
            for (id, element) in elements {
                match id.trim() {
                    VERBS_DROPDOWN_COMMAND => details.verb = element.selected_value(),
                    RESOURCE_TYPES_DROPDOWN_COMMAND => {
                        details.resource_type = element.selected_value()
                    }
                    RESOURCE_NAMES_DROPDOWN_COMMAND => {
                        details.resource_name = element.selected_value()
                    }
                    RESOURCE_NAMESPACE_DROPDOWN_COMMAND => {
                        details.namespace = element.selected_value()
                    }
                    FILTER_PLAINTEXT_INPUT_COMMAND => details.filter = element.value.clone(),
                    _ => {}
                }
            }
        }
        details
    }

    /// Drop everything that only exists once a resource type is known.
    pub fn without_resource(self) -> Self {
        Self {
            resource_type: String::new(),
            resource_name: String::new(),
            namespace: String::new(),
            ..self
        }
    }
}
