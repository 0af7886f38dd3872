//! # scopewalk - filtered, lazy file enumeration for find-in-files searches
//!
//! A search scope is one or more roots plus options. The engine walks each
//! root depth-first in name order, asking a set of filters about every file
//! and folder. Folder answers are three-valued: traverse, skip the subtree,
//! or traverse without asking that filter again below.
//!
//! ```
//! use scopewalk::fs::{FileSystem, MemoryFileSystem};
//! use scopewalk::search::{
//!     CancelFlag, NoopListener, SearchInfo, SearchRoot, SearchScopeOptions, SimpleSearchInfo,
//! };
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! let fs = Arc::new(
//!     MemoryFileSystem::new()
//!         .with_file("/proj/src/Main.java", "class Main {}")
//!         .with_file("/proj/.git/config", "")
//!         .with_file("/proj/README.md", ""),
//! );
//! let root = SearchRoot::new(fs.resolve(Path::new("/proj")).unwrap());
//! let info = SimpleSearchInfo::new(fs, root);
//!
//! let options = SearchScopeOptions::new().with_pattern("*.java");
//! let files: Vec<String> = info
//!     .files_to_search(&options, Arc::new(NoopListener), &CancelFlag::new())
//!     .unwrap()
//!     .map(|f| f.path().to_string())
//!     .collect();
//! assert_eq!(files, vec!["/proj/src/Main.java"]);
//! ```

pub mod cli;
pub mod config;
pub mod fs;
pub mod parallel;
pub mod search;

pub use cli::{Cli, Output};
pub use config::ScopeConfig;

/// Result type alias for scopewalk operations
pub type Result<T> = anyhow::Result<T>;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");
pub const PKG_DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
