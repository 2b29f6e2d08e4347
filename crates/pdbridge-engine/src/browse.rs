/// Up/Down navigation over the in-memory command history.
///
/// With nothing typed, each step walks one entry and replaces the whole line.
/// With a prefix typed, steps cycle through entries starting with that prefix.
/// Whole-line mode sticks until some other key is pressed.
#[derive(Clone, Debug, Default)]
pub struct HistoryBrowser {
    index: Option<usize>,
    whole_line: bool,
}

impl HistoryBrowser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move one step and return the text the input line should now hold.
    /// `None` means nothing matched and the line stays as it is.
    pub fn browse(&mut self, entries: &[String], typed: &str, backward: bool) -> Option<String> {
        let len = entries.len();
        let start = self.index.unwrap_or(len);

        if typed.is_empty() || self.whole_line {
            let next = if backward {
                start.saturating_sub(1)
            } else {
                start + 1
            };
            if len == 0 || next >= len {
                self.index = Some(len);
                return Some(String::new());
            }
            self.whole_line = true;
            self.index = Some(next);
            return Some(entries[next].clone());
        }

        let step: isize = if backward { -1 } else { 1 };
        for offset in 1..=len as isize {
            let idx = (start as isize + step * offset).rem_euclid(len as isize) as usize;
            if entries[idx].starts_with(typed) {
                self.index = Some(idx);
                return Some(entries[idx].clone());
            }
        }
        self.index = Some(start);
        None
    }

    /// Forget the position; the next step starts from the newest entry.
    pub fn reset(&mut self) {
        self.index = None;
    }

    pub fn end_whole_line(&mut self) {
        self.whole_line = false;
    }

    pub fn position(&self) -> Option<usize> {
        self.index
    }
}
