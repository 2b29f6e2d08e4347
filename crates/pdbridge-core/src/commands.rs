use serde::{Deserialize, Serialize};

/// Commands understood natively by the debugger (every `do_*` handler on `pdb.Pdb`).
/// Typing one of these without arguments is not worth keeping in history.
pub const DEBUGGER_PRIMITIVES: &[&str] = &[
    "EOF", "a", "alias", "args", "b", "break", "bt", "c", "cl", "clear", "commands",
    "condition", "cont", "continue", "d", "debug", "disable", "display", "down", "enable",
    "exit", "h", "help", "ignore", "interact", "j", "jump", "l", "list", "ll", "longlist",
    "n", "next", "p", "pp", "q", "quit", "r", "restart", "return", "retval", "run", "rv",
    "s", "source", "step", "tbreak", "u", "unalias", "undisplay", "unt", "until", "up", "w",
    "whatis", "where",
];

pub fn is_debugger_primitive(cmd: &str) -> bool {
    DEBUGGER_PRIMITIVES.contains(&cmd)
}

/// A command line waiting for the debugger to become ready.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueuedCommand {
    pub line: String,
    /// Hidden commands are delivered without echoing them into the transcript.
    pub hidden: bool,
}

impl QueuedCommand {
    pub fn new(line: impl Into<String>, hidden: bool) -> Self {
        Self {
            line: line.into(),
            hidden,
        }
    }
}

/// Split a line the way the history filter does: the command token is the text
/// before the first space, every other space-separated piece is an argument.
pub fn split_command(line: &str) -> (&str, Vec<&str>) {
    let mut parts = line.split(' ');
    let cmd = parts.next().unwrap_or_default();
    (cmd, parts.collect())
}
