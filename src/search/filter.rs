//! Search filter definition
//!
//! A filter answers two questions during a traversal: may this data file be
//! searched, and should the traversal descend into this folder. The folder
//! answer is three-valued so a filter can declare that nothing below a folder
//! needs its opinion any more.

use crate::fs::FileObject;
use std::sync::Arc;

/// Decision for whether to search or skip a data file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterDecision {
    /// Search this file
    Process,
    /// Skip this file with a reason
    Skip(&'static str),
}

/// Decision for a folder met during traversal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FolderResult {
    /// Descend, and keep asking this filter below
    Traverse,
    /// Skip the folder and its whole subtree
    DoNotTraverse,
    /// Descend, and do not ask this filter again anywhere in the subtree
    TraverseAllSubfolders,
}

/// A rule applied to every file and folder of a search scope
pub trait SearchFilter: Send + Sync {
    /// Name of this filter for logging and skip reports
    fn name(&self) -> &'static str;

    /// Decide whether a data file may be searched
    fn search_file(&self, file: &FileObject) -> FilterDecision;

    /// Decide whether a folder should be traversed
    fn traverse_folder(&self, folder: &FileObject) -> FolderResult;
}

/// Shared handle to a filter
pub type FilterRef = Arc<dyn SearchFilter>;

/// Immutable list of filters active at one traversal depth
pub type FilterSet = Arc<[FilterRef]>;

/// Filter built from two closures, mostly useful for tests and one-off rules
pub struct FnFilter<F, D>
where
    F: Fn(&FileObject) -> FilterDecision + Send + Sync,
    D: Fn(&FileObject) -> FolderResult + Send + Sync,
{
    name: &'static str,
    file: F,
    folder: D,
}

impl<F, D> FnFilter<F, D>
where
    F: Fn(&FileObject) -> FilterDecision + Send + Sync,
    D: Fn(&FileObject) -> FolderResult + Send + Sync,
{
    pub fn new(name: &'static str, file: F, folder: D) -> Self {
        Self { name, file, folder }
    }
}

impl<F, D> SearchFilter for FnFilter<F, D>
where
    F: Fn(&FileObject) -> FilterDecision + Send + Sync,
    D: Fn(&FileObject) -> FolderResult + Send + Sync,
{
    fn name(&self) -> &'static str {
        self.name
    }

    fn search_file(&self, file: &FileObject) -> FilterDecision {
        (self.file)(file)
    }

    fn traverse_folder(&self, folder: &FileObject) -> FolderResult {
        (self.folder)(folder)
    }
}
