//! Text search inside the files produced by a search scope

use crate::fs::{FileObject, FileSystem};
use anyhow::{Context, Result};
use grep::matcher::Matcher;
use grep_regex::{RegexMatcher, RegexMatcherBuilder};
use grep_searcher::sinks::Lossy;
use grep_searcher::{BinaryDetection, SearcherBuilder};
use serde::Serialize;

/// What to look for inside files
#[derive(Debug, Clone, Default)]
pub struct ContentQuery {
    pub text: String,
    pub regexp: bool,
    pub case_insensitive: bool,
    pub whole_words: bool,
    /// Stop reading a file after this many matching lines; 0 means no limit
    pub max_matches_per_file: usize,
}

impl ContentQuery {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }
}

/// A matching line
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineMatch {
    pub line_number: u64,
    /// 1-based byte column of the first match on the line
    pub column: usize,
    pub line: String,
}

/// All matching lines of one file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileMatches {
    pub path: String,
    pub matches: Vec<LineMatch>,
}

impl FileMatches {
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }
}

/// Compiled [`ContentQuery`], shareable between worker threads
#[derive(Debug, Clone)]
pub struct ContentMatcher {
    matcher: RegexMatcher,
    max_matches: usize,
}

impl ContentMatcher {
    pub fn new(query: &ContentQuery) -> Result<Self> {
        if query.text.is_empty() {
            anyhow::bail!("Search text must not be empty");
        }
        let matcher = RegexMatcherBuilder::new()
            .fixed_strings(!query.regexp)
            .case_insensitive(query.case_insensitive)
            .word(query.whole_words)
            .build(&query.text)
            .with_context(|| format!("Invalid search pattern: {}", query.text))?;
        Ok(Self {
            matcher,
            max_matches: query.max_matches_per_file,
        })
    }

    /// Search one file. Binary files (containing NUL) yield no matches.
    pub fn search(&self, fs: &dyn FileSystem, file: &FileObject) -> Result<FileMatches> {
        let reader = fs.open(file)?;
        let mut searcher = SearcherBuilder::new()
            .binary_detection(BinaryDetection::quit(b'\x00'))
            .line_number(true)
            .build();

        let mut matches = Vec::new();
        searcher
            .search_reader(
                &self.matcher,
                reader,
                Lossy(|line_number, line| {
                    let column = self
                        .matcher
                        .find(line.as_bytes())
                        .ok()
                        .flatten()
                        .map(|m| m.start() + 1)
                        .unwrap_or(1);
                    matches.push(LineMatch {
                        line_number,
                        column,
                        line: line.trim_end_matches(['\r', '\n']).to_string(),
                    });
                    Ok(self.max_matches == 0 || matches.len() < self.max_matches)
                }),
            )
            .with_context(|| format!("Failed to search {}", file.path()))?;

        Ok(FileMatches {
            path: file.path().to_string(),
            matches,
        })
    }
}
