//! Search roots and the objects that turn them into file enumerations

use super::cancel::CancelFlag;
use super::filter::FilterRef;
use super::filters::sharability::DEFAULT_GENERATED_DIRS;
use super::filters::{SharabilityFilter, VisibilityFilter};
use super::flat::FlatSearchIterator;
use super::listener::SearchListener;
use super::options::SearchScopeOptions;
use super::simple::SimpleSearchIterator;
use crate::fs::{FileObject, FileSystem};
use anyhow::Result;
use std::fmt;
use std::sync::Arc;

/// Lazy sequence of files to search
pub type SearchIter = Box<dyn Iterator<Item = FileObject> + Send>;

/// A folder (or single file) to search, with filters that apply to it only
#[derive(Clone)]
pub struct SearchRoot {
    file: FileObject,
    filters: Vec<FilterRef>,
}

impl SearchRoot {
    pub fn new(file: FileObject) -> Self {
        Self {
            file,
            filters: Vec::new(),
        }
    }

    pub fn with_filter(mut self, filter: FilterRef) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn file(&self) -> &FileObject {
        &self.file
    }

    pub fn filters(&self) -> &[FilterRef] {
        &self.filters
    }
}

impl fmt::Debug for SearchRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchRoot")
            .field("file", &self.file.path())
            .field("filters", &self.filters.iter().map(|f| f.name()).collect::<Vec<_>>())
            .finish()
    }
}

/// Something that can be searched: one root, or several
pub trait SearchInfo: Send + Sync {
    /// Whether there is anything to search right now
    fn can_search(&self) -> bool;

    /// Roots covered by this search info
    fn search_roots(&self) -> Vec<SearchRoot>;

    /// Create the lazy enumeration of files to search.
    ///
    /// Fails only on bad construction input such as an invalid name pattern;
    /// problems met while walking go to `listener`.
    fn files_to_search(
        &self,
        options: &SearchScopeOptions,
        listener: Arc<dyn SearchListener>,
        cancel: &CancelFlag,
    ) -> Result<SearchIter>;
}

/// Filters every root gets before its own and the options' filters
#[derive(Debug, Clone)]
pub struct DefaultFilters {
    skip_hidden: bool,
    generated_dirs: Vec<String>,
}

impl Default for DefaultFilters {
    fn default() -> Self {
        Self {
            skip_hidden: true,
            generated_dirs: DEFAULT_GENERATED_DIRS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl DefaultFilters {
    /// No default filters at all
    pub fn none() -> Self {
        Self {
            skip_hidden: false,
            generated_dirs: Vec::new(),
        }
    }

    pub fn skip_hidden(mut self, skip: bool) -> Self {
        self.skip_hidden = skip;
        self
    }

    /// Folder names treated as generated in addition to `.gitignore` rules
    pub fn generated_dirs(mut self, dirs: Vec<String>) -> Self {
        self.generated_dirs = dirs;
        self
    }

    /// Default filters for one root; sharability only unless generated files are wanted
    fn build(
        &self,
        fs: &dyn FileSystem,
        root: &FileObject,
        options: &SearchScopeOptions,
    ) -> Result<Vec<FilterRef>> {
        let mut filters: Vec<FilterRef> = Vec::new();
        if self.skip_hidden {
            filters.push(Arc::new(VisibilityFilter));
        }
        if !options.is_search_in_generated() {
            filters.push(Arc::new(SharabilityFilter::for_root(fs, root, &self.generated_dirs)?));
        }
        Ok(filters)
    }
}

/// Shared state of the single-root search infos
struct RootScope {
    fs: Arc<dyn FileSystem>,
    root: SearchRoot,
    defaults: DefaultFilters,
}

impl RootScope {
    fn can_search(&self) -> bool {
        self.fs.is_valid(self.root.file())
    }

    /// Default filters, then root filters, then option filters
    fn effective_filters(&self, options: &SearchScopeOptions) -> Result<Vec<FilterRef>> {
        let mut filters = self.defaults.build(self.fs.as_ref(), self.root.file(), options)?;
        filters.extend(self.root.filters().iter().cloned());
        filters.extend(options.filters().iter().cloned());
        tracing::debug!(
            "Searching {} with filters: {:?}",
            self.root.file().path(),
            filters.iter().map(|f| f.name()).collect::<Vec<_>>()
        );
        Ok(filters)
    }
}

/// Recursive search of one root
pub struct SimpleSearchInfo {
    scope: RootScope,
}

impl SimpleSearchInfo {
    pub fn new(fs: Arc<dyn FileSystem>, root: SearchRoot) -> Self {
        Self {
            scope: RootScope {
                fs,
                root,
                defaults: DefaultFilters::default(),
            },
        }
    }

    pub fn with_defaults(mut self, defaults: DefaultFilters) -> Self {
        self.scope.defaults = defaults;
        self
    }
}

impl SearchInfo for SimpleSearchInfo {
    fn can_search(&self) -> bool {
        self.scope.can_search()
    }

    fn search_roots(&self) -> Vec<SearchRoot> {
        vec![self.scope.root.clone()]
    }

    fn files_to_search(
        &self,
        options: &SearchScopeOptions,
        listener: Arc<dyn SearchListener>,
        cancel: &CancelFlag,
    ) -> Result<SearchIter> {
        let matcher = options.file_name_matcher()?;
        let filters = self.scope.effective_filters(options)?;
        Ok(Box::new(SimpleSearchIterator::new(
            self.scope.fs.clone(),
            self.scope.root.file().clone(),
            matcher,
            filters,
            options.is_search_in_archives(),
            listener,
            cancel.clone(),
        )))
    }
}

/// Search of the files directly inside one root folder
pub struct FlatSearchInfo {
    scope: RootScope,
}

impl FlatSearchInfo {
    pub fn new(fs: Arc<dyn FileSystem>, root: SearchRoot) -> Self {
        Self {
            scope: RootScope {
                fs,
                root,
                defaults: DefaultFilters::default(),
            },
        }
    }

    pub fn with_defaults(mut self, defaults: DefaultFilters) -> Self {
        self.scope.defaults = defaults;
        self
    }
}

impl SearchInfo for FlatSearchInfo {
    fn can_search(&self) -> bool {
        self.scope.can_search()
    }

    fn search_roots(&self) -> Vec<SearchRoot> {
        vec![self.scope.root.clone()]
    }

    fn files_to_search(
        &self,
        options: &SearchScopeOptions,
        listener: Arc<dyn SearchListener>,
        cancel: &CancelFlag,
    ) -> Result<SearchIter> {
        let matcher = options.file_name_matcher()?;
        let filters = self.scope.effective_filters(options)?;
        Ok(Box::new(FlatSearchIterator::new(
            self.scope.fs.clone(),
            self.scope.root.file().clone(),
            matcher,
            filters,
            listener,
            cancel.clone(),
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::MemoryFileSystem;
    use crate::search::listener::NoopListener;
    use std::path::Path;

    fn project() -> Arc<MemoryFileSystem> {
        Arc::new(
            MemoryFileSystem::new()
                .with_file("/proj/.gitignore", "*.log\n")
                .with_file("/proj/.env", "SECRET=1")
                .with_file("/proj/app.log", "")
                .with_file("/proj/src/main.rs", "")
                .with_file("/proj/target/debug/app", ""),
        )
    }

    fn collect(info: &dyn SearchInfo, options: &SearchScopeOptions) -> Vec<String> {
        info.files_to_search(options, Arc::new(NoopListener), &CancelFlag::new())
            .unwrap()
            .map(|f| f.path().to_string())
            .collect()
    }

    fn root(fs: &MemoryFileSystem, path: &str) -> SearchRoot {
        SearchRoot::new(fs.resolve(Path::new(path)).unwrap())
    }

    #[test]
    fn test_default_filters() {
        let fs = project();
        let info = SimpleSearchInfo::new(fs.clone(), root(&fs, "/proj"));
        assert_eq!(collect(&info, &SearchScopeOptions::new()), vec!["/proj/src/main.rs"]);
    }

    #[test]
    fn test_generated_and_hidden_included_on_request() {
        let fs = project();
        let info = SimpleSearchInfo::new(fs.clone(), root(&fs, "/proj"))
            .with_defaults(DefaultFilters::default().skip_hidden(false));
        let options = SearchScopeOptions::new().search_in_generated(true);
        assert_eq!(
            collect(&info, &options),
            vec![
                "/proj/.env",
                "/proj/.gitignore",
                "/proj/app.log",
                "/proj/src/main.rs",
                "/proj/target/debug/app",
            ]
        );
    }

    #[test]
    fn test_flat_info() {
        let fs = project();
        let info = FlatSearchInfo::new(fs.clone(), root(&fs, "/proj"))
            .with_defaults(DefaultFilters::none());
        assert_eq!(
            collect(&info, &SearchScopeOptions::new().search_in_generated(true)),
            vec!["/proj/.env", "/proj/.gitignore", "/proj/app.log"]
        );
    }

    #[test]
    fn test_can_search_follows_root() {
        let fs = project();
        let info = SimpleSearchInfo::new(fs.clone(), root(&fs, "/proj/src"));
        assert!(info.can_search());
        assert_eq!(info.search_roots()[0].file().path(), "/proj/src");

        let gone = FileObject::new(
            "gone",
            "/gone",
            crate::fs::FileKind::Folder,
            crate::fs::Location::Virtual("/gone".into()),
        );
        let info = SimpleSearchInfo::new(fs, SearchRoot::new(gone));
        assert!(!info.can_search());
    }

    #[test]
    fn test_invalid_pattern_fails_up_front() {
        let fs = project();
        let info = SimpleSearchInfo::new(fs.clone(), root(&fs, "/proj"));
        let options = SearchScopeOptions::new().with_pattern("[").with_regexp(true);
        assert!(info
            .files_to_search(&options, Arc::new(NoopListener), &CancelFlag::new())
            .is_err());
    }
}
