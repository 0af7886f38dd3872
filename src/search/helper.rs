//! Ordered application of the filters active at the current traversal depth

use super::filter::{FilterDecision, FilterRef, FilterSet, FolderResult};
use super::listener::SearchListener;
use crate::fs::FileObject;
use std::sync::Arc;

/// Applies filter sets to files and folders, reporting rejections
///
/// The helper itself holds no depth state: the traversal cursor keeps one
/// [`FilterSet`] per level and hands the active one in. The helper only
/// owns the root set, i.e. the filters in force before any folder is entered.
pub struct FilterHelper {
    root: FilterSet,
    listener: Arc<dyn SearchListener>,
}

impl FilterHelper {
    pub fn new(filters: Vec<FilterRef>, listener: Arc<dyn SearchListener>) -> Self {
        Self {
            root: filters.into(),
            listener,
        }
    }

    /// Filters in force at the search root
    pub fn root_filters(&self) -> &FilterSet {
        &self.root
    }

    /// With no filters at all every check passes without work
    pub fn is_inert(&self) -> bool {
        self.root.is_empty()
    }

    /// True iff every active filter lets the file through.
    /// The first rejecting filter is reported and stops evaluation.
    pub fn file_allowed(&self, active: &FilterSet, file: &FileObject) -> bool {
        for filter in active.iter() {
            if let FilterDecision::Skip(reason) = filter.search_file(file) {
                self.listener.file_skipped(file, Some(filter.as_ref()), Some(reason));
                return false;
            }
        }
        true
    }

    /// Decide whether to descend into `folder`.
    ///
    /// Returns the filter set for the folder's subtree, or `None` when some
    /// filter answered [`FolderResult::DoNotTraverse`]. Filters answering
    /// [`FolderResult::TraverseAllSubfolders`] are left out of the returned
    /// set; when none are, the active set is shared rather than copied.
    pub fn directory_allowed(&self, active: &FilterSet, folder: &FileObject) -> Option<FilterSet> {
        let mut dropped: Vec<usize> = Vec::new();

        for (i, filter) in active.iter().enumerate() {
            match filter.traverse_folder(folder) {
                FolderResult::Traverse => {}
                FolderResult::DoNotTraverse => {
                    self.listener.file_skipped(folder, Some(filter.as_ref()), None);
                    return None;
                }
                FolderResult::TraverseAllSubfolders => dropped.push(i),
            }
        }

        if dropped.is_empty() {
            return Some(active.clone());
        }

        tracing::trace!(
            "{} filter(s) settled for the subtree of {}",
            dropped.len(),
            folder.path()
        );
        let reduced: Vec<FilterRef> = active
            .iter()
            .enumerate()
            .filter(|(i, _)| !dropped.contains(i))
            .map(|(_, f)| f.clone())
            .collect();
        Some(reduced.into())
    }
}
