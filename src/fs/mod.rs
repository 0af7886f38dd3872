//! File-object abstraction consumed by the search engine
//!
//! The iterators never touch `std::fs` directly. They go through a
//! [`FileSystem`], which answers four questions: what does this path resolve
//! to, does this object still exist, what are the children of this folder,
//! and is this data file an archive that can be browsed as a folder.
//!
//! Two implementations are provided:
//! - [`DiskFileSystem`] - the real file system, with zip/jar archives
//! - [`MemoryFileSystem`] - an in-memory tree, handy for embedding and tests

mod archive;
mod disk;
mod memory;
mod object;

pub use archive::{is_archive_name, ArchiveIndex};
pub use disk::{DiskFileSystem, DEFAULT_MAX_ENTRY_BYTES};
pub use memory::MemoryFileSystem;
pub use object::{FileKind, FileObject, Location};

use anyhow::Result;
use std::io::Read;
use std::path::Path;

/// Hierarchical file system the search iterators walk over
///
/// Implementations must be shareable across threads: content matching opens
/// files from worker threads while the iterator lists folders on another.
pub trait FileSystem: Send + Sync {
    /// Resolve a path to a file object
    fn resolve(&self, path: &Path) -> Result<FileObject>;

    /// Whether the object can still be reached
    fn is_valid(&self, file: &FileObject) -> bool;

    /// Children of a folder, in no particular order
    fn children(&self, folder: &FileObject) -> Result<Vec<FileObject>>;

    /// Archive root pseudo-folder for an archive data file, if it is one
    fn archive_root(&self, file: &FileObject) -> Option<FileObject>;

    /// Open a data file for reading
    fn open(&self, file: &FileObject) -> Result<Box<dyn Read + Send>>;
}
