use crate::fs::FileObject;
use crate::search::filter::{FilterDecision, FolderResult, SearchFilter};

/// Leaves out hidden files and does not descend into hidden folders
#[derive(Debug, Default, Clone, Copy)]
pub struct VisibilityFilter;

impl SearchFilter for VisibilityFilter {
    fn name(&self) -> &'static str {
        "VisibilityFilter"
    }

    fn search_file(&self, file: &FileObject) -> FilterDecision {
        if file.is_hidden() {
            FilterDecision::Skip("hidden file")
        } else {
            FilterDecision::Process
        }
    }

    fn traverse_folder(&self, folder: &FileObject) -> FolderResult {
        if folder.is_hidden() {
            FolderResult::DoNotTraverse
        } else {
            FolderResult::Traverse
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::FileKind;
    use std::path::Path;

    #[test]
    fn test_hidden_entries() {
        let filter = VisibilityFilter;
        let git = FileObject::disk(Path::new("/p/.git"), FileKind::Folder);
        let src = FileObject::disk(Path::new("/p/src"), FileKind::Folder);
        let env = FileObject::disk(Path::new("/p/.env"), FileKind::Data);

        assert_eq!(filter.traverse_folder(&git), FolderResult::DoNotTraverse);
        assert_eq!(filter.traverse_folder(&src), FolderResult::Traverse);
        assert_eq!(filter.search_file(&env), FilterDecision::Skip("hidden file"));
    }
}
