//! Textual rewrites applied to debugger lines before they are sent.

/// Turn `%plot <expr>` into a cell run so figures are captured while
/// debugging. Only the last whitespace-separated token is kept as the code.
pub fn rewrite_plot_magic(line: &str, prefix: &str) -> Option<String> {
    if prefix.is_empty() || !line.starts_with(prefix) {
        return None;
    }
    let code = line.split_whitespace().last().unwrap_or_default();
    Some(format!("__spy_code__ = get_ipython().run_cell('{code}')"))
}

/// Debugger command that runs an IPython line magic in the kernel's shell.
pub fn line_magic_command(name: &str, args: &str) -> String {
    format!("!get_ipython().kernel.shell.run_line_magic('{name}', '{args}')")
}
