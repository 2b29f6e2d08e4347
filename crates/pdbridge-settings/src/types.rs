//! Settings type definitions.
//!
//! All types use camelCase JSON field names and `#[serde(default)]`, so a
//! settings file only needs the values it changes.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use pdbridge_core::breakpoints::BreakpointMap;
use pdbridge_core::prompt::DEBUGGER_PROMPT;

use crate::loader::config_dir;

/// Root settings type.
///
/// ```json
/// {
///   "history": { "maxEntries": 1000 },
///   "logging": { "level": "debug" },
///   "breakpoints": { "/src/app.py": [{ "line": 12 }] }
/// }
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PdbridgeSettings {
    pub history: HistorySettings,
    pub debugger: DebuggerSettings,
    pub logging: LoggingSettings,
    /// Breakpoints pushed to the kernel whenever a debugging session is set up.
    pub breakpoints: BreakpointMap,
}

impl Default for PdbridgeSettings {
    fn default() -> Self {
        Self {
            history: HistorySettings::default(),
            debugger: DebuggerSettings::default(),
            logging: LoggingSettings::default(),
            breakpoints: BreakpointMap::new(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HistorySettings {
    /// SQLite file holding debugger command history.
    pub db_path: PathBuf,
    /// Entries loaded at startup and kept for Up/Down recall.
    pub max_entries: usize,
}

impl Default for HistorySettings {
    fn default() -> Self {
        Self {
            db_path: config_dir().join("pdb_history.sqlite"),
            max_entries: 400,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DebuggerSettings {
    /// Prompt text that marks the debugger as waiting for a command.
    pub prompt: String,
    /// Lines starting with this prefix are run as a cell so plots are captured.
    pub plot_magic_prefix: String,
}

impl Default for DebuggerSettings {
    fn default() -> Self {
        Self {
            prompt: DEBUGGER_PROMPT.to_string(),
            plot_magic_prefix: "%plot ".to_string(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoggingSettings {
    pub level: String,
    pub json: bool,
    /// Per-module overrides, e.g. `{"pdbridge_engine": "debug"}`.
    pub modules: std::collections::BTreeMap<String, String>,
    /// Persist diagnostic counters here on shutdown.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metrics_db_path: Option<PathBuf>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            modules: std::collections::BTreeMap::new(),
            metrics_db_path: None,
        }
    }
}
