//! Counter and gauge names reported to the [`MetricsRecorder`](pdbridge_telemetry::MetricsRecorder).

pub const COMMANDS_QUEUED: &str = "pdbridge.commands.queued";
pub const COMMANDS_DELIVERED: &str = "pdbridge.commands.delivered";
/// Labelled with the channel error `kind`.
pub const COMMANDS_FAILED: &str = "pdbridge.commands.failed";
pub const READLINE_DROPPED: &str = "pdbridge.readline.dropped";
pub const HISTORY_RECORDED: &str = "pdbridge.history.recorded";
/// Labelled with `op` = `append` | `read`.
pub const HISTORY_STORE_FAILURES: &str = "pdbridge.history.store_failures";
pub const PROMPT_REDISPLAY_SUPPRESSED: &str = "pdbridge.prompt.redisplay_suppressed";
pub const QUEUE_DEPTH: &str = "pdbridge.queue.depth";
