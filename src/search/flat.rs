use super::cancel::CancelFlag;
use super::filter::{FilterRef, FilterSet};
use super::helper::FilterHelper;
use super::listener::SearchListener;
use super::matcher::FileNameMatcher;
use crate::fs::{FileObject, FileSystem};
use std::iter::FusedIterator;
use std::sync::Arc;
use std::vec;

/// Non-recursive variant of [`super::SimpleSearchIterator`]
///
/// Yields matching data files directly inside the root folder, in name order.
/// Subfolders are neither produced nor entered and archives are plain files.
/// The root folder itself is still checked against the filters. Cancellation
/// drops the remaining children; a match already found is still returned.
pub struct FlatSearchIterator {
    fs: Arc<dyn FileSystem>,
    root: Option<FileObject>,
    pending: vec::IntoIter<FileObject>,
    filters: FilterSet,
    helper: FilterHelper,
    matcher: FileNameMatcher,
    listener: Arc<dyn SearchListener>,
    cancel: CancelFlag,
    next: Option<FileObject>,
}

impl FlatSearchIterator {
    pub fn new(
        fs: Arc<dyn FileSystem>,
        root: FileObject,
        matcher: FileNameMatcher,
        filters: Vec<FilterRef>,
        listener: Arc<dyn SearchListener>,
        cancel: CancelFlag,
    ) -> Self {
        let helper = FilterHelper::new(filters, listener.clone());
        Self {
            fs,
            root: Some(root),
            pending: Vec::new().into_iter(),
            filters: helper.root_filters().clone(),
            helper,
            matcher,
            listener,
            cancel,
            next: None,
        }
    }

    /// Whether another file is available. Finds and caches it if needed.
    pub fn has_next(&mut self) -> bool {
        if self.next.is_none() {
            self.advance();
        }
        self.next.is_some()
    }

    fn advance(&mut self) {
        if let Some(root) = self.root.take() {
            if root.is_folder() {
                self.list_root(&root);
            } else {
                self.pending = vec![root].into_iter();
            }
        }

        while self.next.is_none() {
            if self.cancel.is_cancelled() {
                self.pending = Vec::new().into_iter();
                return;
            }
            let Some(entry) = self.pending.next() else {
                return;
            };
            if entry.is_data()
                && self.matcher.matches(&entry)
                && self.helper.file_allowed(&self.filters, &entry)
            {
                self.next = Some(entry);
            }
        }
    }

    fn list_root(&mut self, root: &FileObject) {
        if self.cancel.is_cancelled() {
            return;
        }
        let Some(filters) = self.helper.directory_allowed(&self.filters, root) else {
            return;
        };
        self.filters = filters;

        self.listener.directory_entered(root.path());
        let mut children = match self.fs.children(root) {
            Ok(children) => children,
            Err(e) => {
                self.listener.general_error(&e);
                return;
            }
        };
        children.sort_by(|a, b| a.name().cmp(b.name()));
        self.pending = children.into_iter();
    }
}

impl Iterator for FlatSearchIterator {
    type Item = FileObject;

    fn next(&mut self) -> Option<FileObject> {
        if self.has_next() {
            self.next.take()
        } else {
            None
        }
    }
}

impl FusedIterator for FlatSearchIterator {}
