//! File-name matching for search scopes

use super::filters::path::compile_glob_patterns;
use super::options::SearchScopeOptions;
use crate::fs::FileObject;
use anyhow::{Context, Result};
use globset::GlobSet;
use regex::Regex;

/// Decides whether a data file's name fits the requested file-name pattern
#[derive(Debug, Clone)]
pub enum FileNameMatcher {
    /// Empty pattern: every file fits
    TakeAll,
    /// Regular expression searched for in the name
    Regex(Regex),
    /// Comma or whitespace separated globs; `!glob` excludes
    Globs(GlobPatterns),
}

#[derive(Debug, Clone)]
pub struct GlobPatterns {
    include_names: GlobSet,
    include_paths: GlobSet,
    exclude_names: GlobSet,
    exclude_paths: GlobSet,
}

impl FileNameMatcher {
    /// Build the matcher described by the options
    pub fn create(options: &SearchScopeOptions) -> Result<Self> {
        let pattern = options.pattern().trim();
        if pattern.is_empty() {
            return Ok(Self::TakeAll);
        }
        if options.is_regexp() {
            let regex = Regex::new(pattern)
                .with_context(|| format!("Invalid file name pattern: {}", pattern))?;
            return Ok(Self::Regex(regex));
        }
        Ok(Self::Globs(GlobPatterns::parse(pattern)?))
    }

    pub fn matches(&self, file: &FileObject) -> bool {
        match self {
            Self::TakeAll => true,
            Self::Regex(regex) => regex.is_match(file.name()),
            Self::Globs(globs) => globs.matches(file),
        }
    }
}

impl GlobPatterns {
    fn parse(pattern: &str) -> Result<Self> {
        let mut include_names = Vec::new();
        let mut include_paths = Vec::new();
        let mut exclude_names = Vec::new();
        let mut exclude_paths = Vec::new();

        for token in pattern
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|t| !t.is_empty())
        {
            let (negated, glob) = match token.strip_prefix('!') {
                Some(rest) => (true, rest),
                None => (false, token),
            };
            if glob.is_empty() {
                continue;
            }
            let is_path = glob.contains('/');
            let glob = if is_path && !glob.starts_with('/') && !glob.starts_with("**") {
                format!("**/{}", glob)
            } else {
                glob.to_string()
            };
            match (negated, is_path) {
                (false, false) => include_names.push(glob),
                (false, true) => include_paths.push(glob),
                (true, false) => exclude_names.push(glob),
                (true, true) => exclude_paths.push(glob),
            }
        }

        let compile = |globs: &[String]| -> Result<GlobSet> {
            let globs: Vec<&str> = globs.iter().map(String::as_str).collect();
            compile_glob_patterns(&globs)
        };

        Ok(Self {
            include_names: compile(&include_names)?,
            include_paths: compile(&include_paths)?,
            exclude_names: compile(&exclude_names)?,
            exclude_paths: compile(&exclude_paths)?,
        })
    }

    fn matches(&self, file: &FileObject) -> bool {
        if self.exclude_names.is_match(file.name()) || self.exclude_paths.is_match(file.path()) {
            return false;
        }
        if self.include_names.is_empty() && self.include_paths.is_empty() {
            return true;
        }
        self.include_names.is_match(file.name()) || self.include_paths.is_match(file.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::FileKind;
    use std::path::Path;

    fn file(path: &str) -> FileObject {
        FileObject::disk(Path::new(path), FileKind::Data)
    }

    fn matcher(pattern: &str, regexp: bool) -> FileNameMatcher {
        let options = SearchScopeOptions::new().with_pattern(pattern).with_regexp(regexp);
        FileNameMatcher::create(&options).unwrap()
    }

    #[test]
    fn test_empty_pattern_takes_all() {
        let m = matcher("  ", false);
        assert!(matches!(m, FileNameMatcher::TakeAll));
        assert!(m.matches(&file("/a/anything.bin")));
    }

    #[test]
    fn test_glob_list() {
        let m = matcher("*.rs, *.toml", false);
        assert!(m.matches(&file("/p/src/lib.rs")));
        assert!(m.matches(&file("/p/Cargo.toml")));
        assert!(!m.matches(&file("/p/README.md")));
    }

    #[test]
    fn test_exclusions() {
        let m = matcher("*.java !*Test.java", false);
        assert!(m.matches(&file("/p/Main.java")));
        assert!(!m.matches(&file("/p/MainTest.java")));

        let only_excludes = matcher("!*.class", false);
        assert!(only_excludes.matches(&file("/p/Main.java")));
        assert!(!only_excludes.matches(&file("/p/Main.class")));
    }

    #[test]
    fn test_path_globs() {
        let m = matcher("src/**/*.rs", false);
        assert!(m.matches(&file("/p/src/search/mod.rs")));
        assert!(!m.matches(&file("/p/tests/mod.rs")));
    }

    #[test]
    fn test_regexp() {
        let m = matcher(r"^Main\.(java|kt)$", true);
        assert!(m.matches(&file("/p/Main.java")));
        assert!(m.matches(&file("/p/Main.kt")));
        assert!(!m.matches(&file("/p/MainTest.java")));
    }

    #[test]
    fn test_invalid_regexp() {
        let options = SearchScopeOptions::new().with_pattern("(").with_regexp(true);
        assert!(FileNameMatcher::create(&options).is_err());
    }
}
