use std::fmt;

use serde::{Deserialize, Serialize};

/// Prompt printed by the IPython debugger when it wants the next command.
pub const DEBUGGER_PROMPT: &str = "ipdb> ";

/// Prompt printed by the stock `pdb` debugger.
pub const PLAIN_PDB_PROMPT: &str = "(Pdb) ";

/// The `(text, is_password)` pair identifying what kind of input is requested.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PromptSignature {
    pub text: String,
    pub password: bool,
}

impl PromptSignature {
    pub fn new(text: impl Into<String>, password: bool) -> Self {
        Self {
            text: text.into(),
            password,
        }
    }

    /// True when the prompt text is exactly `marker`.
    pub fn matches(&self, marker: &str) -> bool {
        self.text == marker
    }

    /// True for either debugger prompt flavour. Only used for display decisions;
    /// readiness checks compare against the configured marker.
    pub fn is_debugger_prompt(&self) -> bool {
        self.text == DEBUGGER_PROMPT || self.text == PLAIN_PDB_PROMPT
    }
}

impl fmt::Display for PromptSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.password {
            write!(f, "{:?} (password)", self.text)
        } else {
            write!(f, "{:?}", self.text)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_marker_exactly() {
        let prompt = PromptSignature::new("ipdb> ", false);
        assert!(prompt.matches(DEBUGGER_PROMPT));
        assert!(!PromptSignature::new("ipdb>", false).matches(DEBUGGER_PROMPT));
    }

    #[test]
    fn password_flag_is_part_of_identity() {
        assert_ne!(
            PromptSignature::new("Password: ", true),
            PromptSignature::new("Password: ", false)
        );
    }

    #[test]
    fn debugger_prompt_flavours() {
        assert!(PromptSignature::new(PLAIN_PDB_PROMPT, false).is_debugger_prompt());
        assert!(PromptSignature::new(DEBUGGER_PROMPT, false).is_debugger_prompt());
        assert!(!PromptSignature::new("In [3]: ", false).is_debugger_prompt());
    }

    #[test]
    fn display_marks_password() {
        let shown = PromptSignature::new("key: ", true).to_string();
        assert!(shown.contains("password"));
    }
}
