use super::filter::FilterRef;
use super::matcher::FileNameMatcher;
use anyhow::Result;
use std::fmt;

/// What a search scope should cover
///
/// Built once per search and passed to every [`super::SearchInfo`].
#[derive(Clone, Default)]
pub struct SearchScopeOptions {
    pattern: String,
    regexp: bool,
    search_in_archives: bool,
    search_in_generated: bool,
    filters: Vec<FilterRef>,
}

impl SearchScopeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// File-name pattern, see [`FileNameMatcher`]
    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = pattern.into();
        self
    }

    /// Treat the pattern as a regular expression instead of globs
    pub fn with_regexp(mut self, regexp: bool) -> Self {
        self.regexp = regexp;
        self
    }

    /// Browse zip-format archives as folders
    pub fn search_in_archives(mut self, enabled: bool) -> Self {
        self.search_in_archives = enabled;
        self
    }

    /// Include generated files (ignored by `.gitignore`, build output)
    pub fn search_in_generated(mut self, enabled: bool) -> Self {
        self.search_in_generated = enabled;
        self
    }

    /// Add a filter applied to every root
    pub fn with_filter(mut self, filter: FilterRef) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn is_regexp(&self) -> bool {
        self.regexp
    }

    pub fn is_search_in_archives(&self) -> bool {
        self.search_in_archives
    }

    pub fn is_search_in_generated(&self) -> bool {
        self.search_in_generated
    }

    pub fn filters(&self) -> &[FilterRef] {
        &self.filters
    }

    /// Compile the file-name matcher for these options
    pub fn file_name_matcher(&self) -> Result<FileNameMatcher> {
        FileNameMatcher::create(self)
    }
}

impl fmt::Debug for SearchScopeOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchScopeOptions")
            .field("pattern", &self.pattern)
            .field("regexp", &self.regexp)
            .field("search_in_archives", &self.search_in_archives)
            .field("search_in_generated", &self.search_in_generated)
            .field("filters", &self.filters.iter().map(|f| f.name()).collect::<Vec<_>>())
            .finish()
    }
}
