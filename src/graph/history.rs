use super::store::Graph;
use std::collections::VecDeque;

pub const DEFAULT_HISTORY_CAPACITY: usize = 100;

/// Snapshot-based undo/redo for a graph.
///
/// Callers `record` the graph before each edit. Snapshots are whole graphs, so
/// every restored state is one that already satisfied referential integrity.
#[derive(Debug, Clone)]
pub struct History {
    undo: VecDeque<Graph>,
    redo: Vec<Graph>,
    capacity: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }
}

impl History {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            undo: VecDeque::new(),
            redo: Vec::new(),
            capacity: capacity.max(1),
        }
    }

    /// Remembers `graph` as the state to return to. Clears the redo stack.
    pub fn record(&mut self, graph: &Graph) {
        if self.undo.len() == self.capacity {
            self.undo.pop_front();
        }
        self.undo.push_back(graph.clone());
        self.redo.clear();
    }

    /// Restores the last recorded state. Returns `false` if there is none.
    pub fn undo(&mut self, graph: &mut Graph) -> bool {
        match self.undo.pop_back() {
            Some(previous) => {
                self.redo.push(std::mem::replace(graph, previous));
                true
            }
            None => false,
        }
    }

    /// Re-applies the last undone state. Returns `false` if there is none.
    pub fn redo(&mut self, graph: &mut Graph) -> bool {
        match self.redo.pop() {
            Some(next) => {
                let current = std::mem::replace(graph, next);
                if self.undo.len() == self.capacity {
                    self.undo.pop_front();
                }
                self.undo.push_back(current);
                true
            }
            None => false,
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }
}
