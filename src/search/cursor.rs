//! Depth-first resume state of a traversal

use super::filter::FilterSet;
use crate::fs::FileObject;
use std::fmt;
use std::vec;

/// One entered folder: the siblings still to visit and the filters that apply to them
struct Level {
    pending: vec::IntoIter<FileObject>,
    filters: FilterSet,
}

impl fmt::Debug for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.filters.iter().map(|filter| filter.name()).collect();
        f.debug_struct("Level")
            .field("pending", &self.pending.len())
            .field("filters", &names)
            .finish()
    }
}

/// Stack of entered folders
///
/// Siblings and filter sets live in the same stack frame, so the two can
/// never get out of step: entering a folder pushes both, finishing it pops both.
#[derive(Debug, Default)]
pub struct Cursor {
    levels: Vec<Level>,
}

impl Cursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter a folder. Children are visited in name order
    /// (case-sensitive, byte-wise), whatever order they were listed in.
    pub fn push(&mut self, mut children: Vec<FileObject>, filters: FilterSet) {
        children.sort_by(|a, b| a.name().cmp(b.name()));
        self.levels.push(Level {
            pending: children.into_iter(),
            filters,
        });
    }

    /// Next sibling of the innermost folder, with the filters active for it.
    /// `None` when the innermost folder is exhausted or nothing was entered.
    pub fn next_sibling(&mut self) -> Option<(FileObject, FilterSet)> {
        let level = self.levels.last_mut()?;
        let entry = level.pending.next()?;
        Some((entry, level.filters.clone()))
    }

    /// Discard the innermost folder together with its filter set.
    /// Returns false if nothing was left to discard.
    pub fn pop_stack(&mut self) -> bool {
        self.levels.pop().is_some()
    }

    /// Number of entered folders still being visited
    pub fn depth(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Drop all resume state
    pub fn clear(&mut self) {
        self.levels.clear();
    }
}
