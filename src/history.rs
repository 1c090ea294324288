//! Logical navigation history.
//!
//! [`HistoryStack`] is separate from the browser's own history: it only
//! answers "is there a view to go back to" when an overlay is dismissed.
//! The router records every transition; overlay dismissal pops.

/// Stack of previously visited paths, most recent last.
///
/// The currently active path is never on the stack: it is pushed only when
/// the router leaves it, and an entry equal to the new path is dropped when
/// the router arrives there again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryStack {
    entries: Vec<String>,
    current: String,
}

impl HistoryStack {
    /// Start a history seeded with the location the page was loaded at.
    pub fn new(current: impl Into<String>) -> Self {
        Self {
            entries: Vec::new(),
            current: current.into(),
        }
    }

    /// Record a transition to `new_path`, pushing the path being left.
    pub fn record_transition(&mut self, new_path: impl Into<String>) {
        let new_path = new_path.into();
        if new_path == self.current {
            return;
        }
        let left = std::mem::replace(&mut self.current, new_path);
        self.entries.push(left);
        let current = &self.current;
        self.entries.retain(|entry| entry != current);
    }

    /// Pop the most recent previous path and make it current.
    pub fn pop_previous(&mut self) -> Option<String> {
        let previous = self.entries.pop()?;
        self.current = previous.clone();
        Some(previous)
    }

    /// Peek at the path [`pop_previous`](Self::pop_previous) would return.
    pub fn peek_previous(&self) -> Option<&str> {
        self.entries.last().map(String::as_str)
    }

    /// Check if there is a logical previous view
    pub fn has_previous(&self) -> bool {
        !self.entries.is_empty()
    }

    /// The path the router considers active.
    pub fn current_path(&self) -> &str {
        &self.current
    }

    /// Number of entries behind the current path.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Return `true` if there is nothing to go back to.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Forget everything and restart at `current`.
    pub fn reset(&mut self, current: impl Into<String>) {
        self.entries.clear();
        self.current = current.into();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_pop() {
        let mut history = HistoryStack::new("/events");
        assert!(!history.has_previous());

        history.record_transition("/event/7");
        assert_eq!(history.current_path(), "/event/7");
        assert!(history.has_previous());
        assert_eq!(history.peek_previous(), Some("/events"));

        assert_eq!(history.pop_previous(), Some("/events".to_string()));
        assert_eq!(history.current_path(), "/events");
        assert_eq!(history.pop_previous(), None);
    }

    #[test]
    fn test_same_path_is_not_recorded() {
        let mut history = HistoryStack::new("/events");
        history.record_transition("/events");
        assert!(history.is_empty());
    }

    #[test]
    fn test_current_path_never_on_stack() {
        let mut history = HistoryStack::new("/a");
        history.record_transition("/b");
        history.record_transition("/a");

        assert_eq!(history.current_path(), "/a");
        assert_eq!(history.len(), 1);
        assert_eq!(history.peek_previous(), Some("/b"));
    }

    #[test]
    fn test_reset() {
        let mut history = HistoryStack::new("/a");
        history.record_transition("/b");
        history.reset("/c");
        assert!(history.is_empty());
        assert_eq!(history.current_path(), "/c");
    }
}
