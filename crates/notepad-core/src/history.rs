//! Snapshot-based undo/redo.
//!
//! Every history entry is a full copy of the document text. Commits are coarse-grained: the
//! host (or [`CommandExecutor`](crate::CommandExecutor)) debounces them, so rapid typing is
//! recorded as a single step once input settles.

/// Maximum number of undo snapshots kept by default.
pub const DEFAULT_UNDO_LIMIT: usize = 100;

/// Undo/redo stacks of document snapshots.
///
/// The undo stack always holds at least one entry: its top is the active document content.
#[derive(Debug, Clone)]
pub struct EditHistory {
    undo_stack: Vec<String>,
    redo_stack: Vec<String>,
    limit: usize,
    generation: u64,
}

impl Default for EditHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl EditHistory {
    /// Create a history holding a single empty-document snapshot.
    pub fn new() -> Self {
        Self::with_limit(DEFAULT_UNDO_LIMIT)
    }

    /// Create a history with a custom snapshot limit (at least 1).
    pub fn with_limit(limit: usize) -> Self {
        Self {
            undo_stack: vec![String::new()],
            redo_stack: Vec::new(),
            limit: limit.max(1),
            generation: 0,
        }
    }

    /// Record `content` as a new snapshot unless it equals the current one.
    ///
    /// A recorded snapshot clears the redo stack and evicts the oldest snapshots beyond the
    /// limit. Returns `true` if a snapshot was recorded.
    pub fn commit(&mut self, content: &str) -> bool {
        if self.current() == content {
            return false;
        }

        self.undo_stack.push(content.to_string());
        self.redo_stack.clear();
        self.generation += 1;

        if self.undo_stack.len() > self.limit {
            let evicted = self.undo_stack.len() - self.limit;
            self.undo_stack.drain(..evicted);
            tracing::debug!(evicted, limit = self.limit, "evicted oldest undo snapshots");
        }

        tracing::debug!(depth = self.undo_stack.len(), "committed undo snapshot");
        true
    }

    /// Step back one snapshot and return the content to display.
    ///
    /// Returns `None` (and changes nothing) when there is no prior snapshot.
    pub fn undo(&mut self) -> Option<&str> {
        if self.undo_stack.len() <= 1 {
            return None;
        }

        let top = self.undo_stack.pop()?;
        self.redo_stack.push(top);
        self.generation += 1;
        Some(self.current())
    }

    /// Re-apply the most recently undone snapshot and return it.
    ///
    /// Returns `None` when there is nothing to redo.
    pub fn redo(&mut self) -> Option<&str> {
        let snapshot = self.redo_stack.pop()?;
        self.undo_stack.push(snapshot);
        self.generation += 1;
        Some(self.current())
    }

    /// Discard all history and start over from an empty document.
    pub fn reset(&mut self) {
        self.reset_to("");
    }

    /// Discard all history and start over from `content` (e.g. a freshly loaded file).
    pub fn reset_to(&mut self, content: &str) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.undo_stack.push(content.to_string());
        self.generation += 1;
    }

    /// The snapshot that matches the active document.
    pub fn current(&self) -> &str {
        self.undo_stack.last().map(String::as_str).unwrap_or_default()
    }

    /// Can undo (more than the current snapshot is recorded).
    pub fn can_undo(&self) -> bool {
        self.undo_stack.len() > 1
    }

    /// Can redo.
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Number of snapshots on the undo stack, including the current one.
    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    /// Number of snapshots on the redo stack.
    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    /// Maximum number of undo snapshots.
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Counter bumped by every commit, undo, redo and reset.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}
