use crate::fs::FileObject;
use crate::search::filter::{FilterDecision, FolderResult, SearchFilter};
use anyhow::Result;
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Path Filter - user-supplied glob exclusions
///
/// Each pattern is tried against the entry's path relative to the search
/// root and against its bare name, so both `docs/**` and `*.min.js` work.
/// A folder that matches is not traversed at all.
#[derive(Clone)]
pub struct PathFilter {
    root: PathBuf,
    patterns: Arc<GlobSet>,
}

impl PathFilter {
    pub fn new(root: &Path, patterns: &[String]) -> Result<Self> {
        let patterns: Vec<&str> = patterns.iter().map(String::as_str).collect();
        Ok(Self {
            root: root.to_path_buf(),
            patterns: Arc::new(compile_glob_patterns(&patterns)?),
        })
    }

    /// Number of compiled patterns
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Check if an entry should be excluded
    pub fn should_ignore(&self, entry: &FileObject) -> bool {
        let path = entry.match_path();
        let relative = path.strip_prefix(&self.root).unwrap_or(&path);

        if self.patterns.is_match(relative) || self.patterns.is_match(entry.name()) {
            tracing::trace!("Path excluded by pattern: {}", entry.path());
            return true;
        }
        false
    }
}

impl SearchFilter for PathFilter {
    fn name(&self) -> &'static str {
        "PathFilter"
    }

    fn search_file(&self, file: &FileObject) -> FilterDecision {
        if self.should_ignore(file) {
            FilterDecision::Skip("excluded by path pattern")
        } else {
            FilterDecision::Process
        }
    }

    fn traverse_folder(&self, folder: &FileObject) -> FolderResult {
        if self.should_ignore(folder) {
            FolderResult::DoNotTraverse
        } else {
            FolderResult::Traverse
        }
    }
}

/// Compile a list of glob patterns into a GlobSet
pub(crate) fn compile_glob_patterns(patterns: &[&str]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();

    for pattern in patterns {
        let glob = Glob::new(pattern)
            .map_err(|e| anyhow::anyhow!("Invalid glob pattern '{}': {}", pattern, e))?;
        builder.add(glob);
    }

    let globset = builder
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to build GlobSet: {}", e))?;

    tracing::debug!("Compiled {} glob patterns into GlobSet", patterns.len());
    Ok(globset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::FileKind;

    fn filter(patterns: &[&str]) -> PathFilter {
        let patterns: Vec<String> = patterns.iter().map(|p| p.to_string()).collect();
        PathFilter::new(Path::new("/repo"), &patterns).unwrap()
    }

    #[test]
    fn test_relative_and_name_matching() {
        let filter = filter(&["docs/**", "*.min.js"]);

        let bundle = FileObject::disk(Path::new("/repo/web/app.min.js"), FileKind::Data);
        let guide = FileObject::disk(Path::new("/repo/docs/guide.md"), FileKind::Data);
        let main = FileObject::disk(Path::new("/repo/src/main.rs"), FileKind::Data);

        assert!(filter.should_ignore(&bundle));
        assert!(filter.should_ignore(&guide));
        assert!(!filter.should_ignore(&main));
    }

    #[test]
    fn test_folder_exclusion() {
        let filter = filter(&["fixtures"]);
        let fixtures = FileObject::disk(Path::new("/repo/tests/fixtures"), FileKind::Folder);
        let tests = FileObject::disk(Path::new("/repo/tests"), FileKind::Folder);

        assert_eq!(filter.traverse_folder(&fixtures), FolderResult::DoNotTraverse);
        assert_eq!(filter.traverse_folder(&tests), FolderResult::Traverse);
    }

    #[test]
    fn test_invalid_pattern() {
        let result = PathFilter::new(Path::new("/repo"), &["a[".to_string()]);
        assert!(result.is_err());
    }

    #[test]
    fn test_pattern_compilation() {
        let patterns = ["*.txt", "dir/**/*", "**/test_*.rs"];
        let globset = compile_glob_patterns(&patterns).unwrap();
        assert_eq!(globset.len(), patterns.len());
        assert!(globset.is_match("file.txt"));
        assert!(globset.is_match("dir/sub/file.rs"));
        assert!(globset.is_match("src/test_utils.rs"));
    }
}
