//! Recursive, lazy enumeration of the files under one search root

use super::cancel::CancelFlag;
use super::cursor::Cursor;
use super::filter::{FilterRef, FilterSet};
use super::helper::FilterHelper;
use super::listener::SearchListener;
use super::matcher::FileNameMatcher;
use crate::fs::{FileObject, FileSystem};
use std::iter::FusedIterator;
use std::sync::Arc;

/// Depth-first, pre-order walk over a search root yielding matching data files
///
/// Nothing happens until the first pull: [`has_next`](Self::has_next) does the
/// folder listing needed to find the next match and caches it, so it can be
/// called any number of times before [`Iterator::next`] without side effects.
/// The iterator is single-pass; it performs blocking I/O and is meant to be
/// driven from one worker thread.
///
/// - children of every folder are visited in name order
/// - with archive search on, archive files are entered like folders instead of being yielded
/// - unreadable folders are reported to the listener and treated as empty
/// - once the cancel flag is set no further folder is entered and the
///   iteration ends: siblings not yet visited, data files included, are
///   dropped. A match already found by `has_next` is still returned
pub struct SimpleSearchIterator {
    fs: Arc<dyn FileSystem>,
    root: Option<FileObject>,
    cursor: Cursor,
    helper: FilterHelper,
    matcher: FileNameMatcher,
    search_in_archives: bool,
    listener: Arc<dyn SearchListener>,
    cancel: CancelFlag,
    next: Option<FileObject>,
    done: bool,
}

impl SimpleSearchIterator {
    pub fn new(
        fs: Arc<dyn FileSystem>,
        root: FileObject,
        matcher: FileNameMatcher,
        filters: Vec<FilterRef>,
        search_in_archives: bool,
        listener: Arc<dyn SearchListener>,
        cancel: CancelFlag,
    ) -> Self {
        Self {
            fs,
            root: Some(root),
            cursor: Cursor::new(),
            helper: FilterHelper::new(filters, listener.clone()),
            matcher,
            search_in_archives,
            listener,
            cancel,
            next: None,
            done: false,
        }
    }

    /// Whether another file is available. Finds and caches it if needed.
    pub fn has_next(&mut self) -> bool {
        if self.next.is_none() && !self.done {
            self.advance();
        }
        self.next.is_some()
    }

    /// Current nesting depth of the walk (entered folders not yet finished)
    pub fn depth(&self) -> usize {
        self.cursor.depth()
    }

    fn advance(&mut self) {
        if let Some(root) = self.root.take() {
            let filters = self.helper.root_filters().clone();
            self.visit(root, filters);
        }

        while self.next.is_none() && !self.done {
            if self.cancel.is_cancelled() {
                self.terminate();
                return;
            }

            match self.cursor.next_sibling() {
                Some((entry, filters)) => self.visit(entry, filters),
                None => {
                    if !self.cursor.pop_stack() {
                        self.done = true;
                    }
                }
            }
        }
    }

    /// Handle one entry found at a level whose active filters are `filters`
    fn visit(&mut self, entry: FileObject, filters: FilterSet) {
        if entry.is_folder() {
            self.enter_folder(&entry, &filters);
            return;
        }

        if self.search_in_archives {
            if let Some(archive_root) = self.fs.archive_root(&entry) {
                self.enter_folder(&archive_root, &filters);
                return;
            }
        }

        if self.matcher.matches(&entry) && self.helper.file_allowed(&filters, &entry) {
            self.next = Some(entry);
        }
    }

    fn enter_folder(&mut self, folder: &FileObject, filters: &FilterSet) {
        if self.cancel.is_cancelled() {
            self.terminate();
            return;
        }

        let Some(sub_filters) = self.helper.directory_allowed(filters, folder) else {
            return;
        };

        self.listener.directory_entered(folder.path());
        let children = match self.fs.children(folder) {
            Ok(children) => children,
            Err(e) => {
                self.listener.general_error(&e);
                Vec::new()
            }
        };
        self.cursor.push(children, sub_filters);
    }

    fn terminate(&mut self) {
        tracing::debug!("Search cancelled at depth {}", self.cursor.depth());
        self.cursor.clear();
        self.done = true;
    }
}

impl Iterator for SimpleSearchIterator {
    type Item = FileObject;

    fn next(&mut self) -> Option<FileObject> {
        if self.has_next() {
            self.next.take()
        } else {
            None
        }
    }
}

impl FusedIterator for SimpleSearchIterator {}
