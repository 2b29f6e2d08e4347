use crate::prompt::PromptSignature;

/// What the mediator needs from the console widget. The widget owns its text,
/// cursor and reading state; the mediator only drives it through these calls.
///
/// `begin_read` starts an interactive read. When the user completes the line,
/// the console's owner hands it to the mediator's readline callback.
pub trait ConsoleSurface {
    /// Insert text into the transcript as if the user had typed it.
    fn append_echo(&mut self, text: &str);

    /// Whether an interactive read is currently in progress.
    fn is_reading(&self) -> bool;

    fn set_reading(&mut self, reading: bool);

    /// Position at which the current prompt was displayed.
    fn prompt_position(&self) -> usize;

    /// Position of the end of the transcript.
    fn end_position(&self) -> usize;

    /// Move the "append before prompt" anchor; output arriving later is
    /// inserted before this point.
    fn anchor_before_prompt(&mut self, position: usize);

    fn set_highlighting(&mut self, on: bool);

    /// Text typed from `position` up to the cursor.
    fn text_from(&self, position: usize) -> String;

    /// Replace everything from `position` to the end of the input line.
    fn replace_from(&mut self, position: usize, text: &str);

    /// True while the console runs code whose I/O is suppressed.
    fn is_hidden(&self) -> bool;

    /// Show `prompt` and start reading a line (masked for password prompts).
    fn begin_read(&mut self, prompt: &PromptSignature);
}
