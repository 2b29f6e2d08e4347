use serde::{Deserialize, Serialize};

use crate::prompt::PromptSignature;

/// The kernel's "give me a line" message, as carried on its stdin channel.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputRequest {
    pub content: InputRequestContent,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputRequestContent {
    pub prompt: String,
    #[serde(default)]
    pub password: bool,
}

impl InputRequest {
    pub fn new(prompt: impl Into<String>, password: bool) -> Self {
        Self {
            content: InputRequestContent {
                prompt: prompt.into(),
                password,
            },
        }
    }

    pub fn signature(&self) -> PromptSignature {
        PromptSignature::new(self.content.prompt.clone(), self.content.password)
    }
}

/// Notifications published by the mediator for the rest of the application
/// (editor, variable explorer, status bar).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum MediatorEvent {
    #[serde(rename = "debug_loop_changed")]
    DebugLoopChanged { active: bool, discarded: usize },

    /// The debugger stopped at a new location.
    #[serde(rename = "pdb_step")]
    PdbStep { fname: String, lineno: u64 },

    #[serde(rename = "namespace_view")]
    NamespaceView { view: serde_json::Value },

    #[serde(rename = "var_properties")]
    VarProperties { properties: serde_json::Value },
}

impl MediatorEvent {
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::DebugLoopChanged { .. } => "debug_loop_changed",
            Self::PdbStep { .. } => "pdb_step",
            Self::NamespaceView { .. } => "namespace_view",
            Self::VarProperties { .. } => "var_properties",
        }
    }
}
