//! File size filtering

use crate::fs::FileObject;
use crate::search::filter::{FilterDecision, FolderResult, SearchFilter};

/// Skip data files larger than a limit. Files of unknown size are searched.
#[derive(Debug, Clone, Copy)]
pub struct SizeFilter {
    max_size_bytes: u64,
}

impl SizeFilter {
    pub fn new(max_size_mb: usize) -> Self {
        Self {
            max_size_bytes: (max_size_mb as u64) * 1024 * 1024,
        }
    }

    pub fn from_bytes(max_size_bytes: u64) -> Self {
        Self { max_size_bytes }
    }
}

impl SearchFilter for SizeFilter {
    fn name(&self) -> &'static str {
        "SizeFilter"
    }

    fn search_file(&self, file: &FileObject) -> FilterDecision {
        match file.size() {
            Some(size) if size > self.max_size_bytes => FilterDecision::Skip("file too large"),
            _ => FilterDecision::Process,
        }
    }

    fn traverse_folder(&self, _folder: &FileObject) -> FolderResult {
        FolderResult::Traverse
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::FileKind;
    use std::path::Path;

    #[test]
    fn test_size_limit() {
        let filter = SizeFilter::from_bytes(10);
        let small = FileObject::disk(Path::new("/a"), FileKind::Data).with_size(10);
        let large = FileObject::disk(Path::new("/b"), FileKind::Data).with_size(11);
        let unknown = FileObject::disk(Path::new("/c"), FileKind::Data);

        assert_eq!(filter.search_file(&small), FilterDecision::Process);
        assert_eq!(filter.search_file(&large), FilterDecision::Skip("file too large"));
        assert_eq!(filter.search_file(&unknown), FilterDecision::Process);
        assert_eq!(SizeFilter::new(1).max_size_bytes, 1024 * 1024);
    }
}
