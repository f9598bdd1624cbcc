/// Lines entered so far, walked with up/down keys.
///
/// The cursor rests one past the newest entry after every [`InputHistory::add`];
/// stepping forward from the newest entry yields an empty line.
#[derive(Debug, Default, Clone)]
pub struct InputHistory {
    entries: Vec<String>,
    cursor: usize,
}

impl InputHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an executed line. Blank lines are ignored.
    pub fn add(&mut self, line: impl Into<String>) {
        let line = line.into();
        if line.trim().is_empty() {
            return;
        }
        self.entries.push(line);
        self.cursor = self.entries.len();
    }

    /// One entry earlier, stopping at the oldest.
    pub fn previous(&mut self) -> &str {
        if self.entries.is_empty() {
            return "";
        }
        self.cursor = self.cursor.saturating_sub(1);
        &self.entries[self.cursor]
    }

    /// One entry later; past the newest this is the empty line.
    pub fn next(&mut self) -> &str {
        if self.entries.is_empty() {
            return "";
        }
        if self.cursor < self.entries.len() {
            self.cursor += 1;
        }
        self.entries.get(self.cursor).map_or("", String::as_str)
    }

    /// Newest entry extending `prefix`, used for inline hints.
    pub fn latest_with_prefix(&self, prefix: &str) -> Option<&str> {
        if prefix.trim().is_empty() {
            return None;
        }
        self.entries
            .iter()
            .rev()
            .find(|entry| entry.len() > prefix.len() && entry.starts_with(prefix))
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history() -> InputHistory {
        let mut history = InputHistory::new();
        history.add("addExpense 5");
        history.add("   ");
        history.add("sortExpense amount");
        history
    }

    #[test]
    fn blank_lines_are_not_recorded() {
        assert_eq!(history().len(), 2);
    }

    #[test]
    fn walks_back_and_stops_at_oldest() {
        let mut history = history();
        assert_eq!(history.previous(), "sortExpense amount");
        assert_eq!(history.previous(), "addExpense 5");
        assert_eq!(history.previous(), "addExpense 5");
    }

    #[test]
    fn forward_past_newest_is_empty() {
        let mut history = history();
        history.previous();
        history.previous();
        assert_eq!(history.next(), "sortExpense amount");
        assert_eq!(history.next(), "");
        assert_eq!(history.next(), "");
    }

    #[test]
    fn empty_history_yields_empty_lines() {
        let mut history = InputHistory::new();
        assert_eq!(history.previous(), "");
        assert_eq!(history.next(), "");
    }

    #[test]
    fn hint_prefers_newest_match() {
        let mut history = history();
        history.add("addExpense 7 /tag food");
        assert_eq!(history.latest_with_prefix("addE"), Some("addExpense 7 /tag food"));
        assert_eq!(history.latest_with_prefix("sortExpense amount"), None);
        assert_eq!(history.latest_with_prefix(""), None);
    }
}
