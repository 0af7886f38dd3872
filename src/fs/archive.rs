//! Zip-format archives browsed as folders

use super::{FileKind, FileObject, Location};
use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

/// Extensions treated as zip-format archives
const ARCHIVE_EXTENSIONS: &[&str] = &["zip", "jar", "war", "ear"];

/// Whether a file name looks like a browsable archive
pub fn is_archive_name(name: &str) -> bool {
    name.rsplit_once('.')
        .map(|(_, ext)| ARCHIVE_EXTENSIONS.iter().any(|a| a.eq_ignore_ascii_case(ext)))
        .unwrap_or(false)
}

#[derive(Debug, Clone, Copy)]
struct Node {
    kind: FileKind,
    size: u64,
}

/// Folder structure of one archive, built once from its central directory
///
/// Zip files do not have to list intermediate folders, so every ancestor of
/// an entry is synthesized as a folder. Folder keys have no trailing slash;
/// the archive root is the empty string.
#[derive(Debug)]
pub struct ArchiveIndex {
    archive: PathBuf,
    folders: BTreeMap<String, BTreeMap<String, Node>>,
}

impl ArchiveIndex {
    /// Read the central directory of an archive on disk
    pub fn open(archive: &Path) -> Result<Self> {
        let file = File::open(archive)
            .with_context(|| format!("Failed to open archive: {}", archive.display()))?;
        let mut zip = zip::ZipArchive::new(BufReader::new(file))
            .with_context(|| format!("Not a readable zip archive: {}", archive.display()))?;

        let mut index = Self::empty(archive);
        for i in 0..zip.len() {
            let entry = zip
                .by_index_raw(i)
                .with_context(|| format!("Corrupt entry #{} in {}", i, archive.display()))?;
            index.insert(entry.name(), entry.is_dir(), entry.size());
        }

        tracing::debug!(
            "Indexed archive {} ({} folders)",
            archive.display(),
            index.folders.len()
        );
        Ok(index)
    }

    /// Build an index from `(name, is_dir, size)` triples
    pub fn from_entries<'a, I>(archive: &Path, entries: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, bool, u64)>,
    {
        let mut index = Self::empty(archive);
        for (name, is_dir, size) in entries {
            index.insert(name, is_dir, size);
        }
        index
    }

    fn empty(archive: &Path) -> Self {
        let mut folders = BTreeMap::new();
        folders.insert(String::new(), BTreeMap::new());
        Self {
            archive: archive.to_path_buf(),
            folders,
        }
    }

    fn insert(&mut self, name: &str, is_dir: bool, size: u64) {
        let parts: Vec<&str> = name.split('/').filter(|p| !p.is_empty()).collect();
        let mut parent = String::new();

        for (i, part) in parts.iter().enumerate() {
            let is_leaf_file = i + 1 == parts.len() && !is_dir;
            let node = if is_leaf_file {
                Node { kind: FileKind::Data, size }
            } else {
                Node { kind: FileKind::Folder, size: 0 }
            };

            self.folders
                .entry(parent.clone())
                .or_default()
                .entry(part.to_string())
                .or_insert(node);

            if is_leaf_file {
                break;
            }
            let folder = join_entry(&parent, part);
            self.folders.entry(folder.clone()).or_default();
            parent = folder;
        }
    }

    /// The archive root pseudo-folder
    pub fn root(&self) -> FileObject {
        archive_root_object(&self.archive)
    }

    /// Children of a folder entry, or `None` if the entry is not a folder
    pub fn children(&self, entry: &str) -> Option<Vec<FileObject>> {
        let key = entry.trim_matches('/');
        let children = self.folders.get(key)?;
        Some(
            children
                .iter()
                .map(|(name, node)| {
                    let child_entry = join_entry(key, name);
                    let object = FileObject::new(
                        name.clone(),
                        format!("{}!/{}", self.archive.display(), child_entry),
                        node.kind,
                        Location::Archive {
                            archive: self.archive.clone(),
                            entry: child_entry,
                        },
                    );
                    if node.kind == FileKind::Data {
                        object.with_size(node.size)
                    } else {
                        object
                    }
                })
                .collect(),
        )
    }

    /// Read a whole entry into memory, refusing entries that inflate past `limit` bytes
    ///
    /// The declared size in the central directory is not trusted.
    pub fn read_entry(archive: &Path, entry: &str, limit: u64) -> Result<Vec<u8>> {
        let file = File::open(archive)
            .with_context(|| format!("Failed to open archive: {}", archive.display()))?;
        let mut zip = zip::ZipArchive::new(BufReader::new(file))
            .with_context(|| format!("Not a readable zip archive: {}", archive.display()))?;
        let zipped = zip
            .by_name(entry)
            .with_context(|| format!("No entry '{}' in {}", entry, archive.display()))?;

        let mut bytes = Vec::new();
        zipped
            .take(limit.saturating_add(1))
            .read_to_end(&mut bytes)
            .with_context(|| format!("Failed to inflate '{}' in {}", entry, archive.display()))?;
        if bytes.len() as u64 > limit {
            anyhow::bail!(
                "Entry '{}' in {} is larger than {} bytes",
                entry,
                archive.display(),
                limit
            );
        }
        Ok(bytes)
    }
}

/// Pseudo-folder standing for the inside of an archive
pub(crate) fn archive_root_object(archive: &Path) -> FileObject {
    let name = archive
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    FileObject::new(
        name,
        format!("{}!/", archive.display()),
        FileKind::Folder,
        Location::Archive {
            archive: archive.to_path_buf(),
            entry: String::new(),
        },
    )
}

fn join_entry(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{}/{}", parent, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_archive_names() {
        assert!(is_archive_name("lib.jar"));
        assert!(is_archive_name("bundle.ZIP"));
        assert!(is_archive_name("app.war"));
        assert!(!is_archive_name("notes.txt"));
        assert!(!is_archive_name("jar"));
    }

    #[test]
    fn test_index_synthesizes_intermediate_folders() {
        let index = ArchiveIndex::from_entries(
            Path::new("/lib/a.jar"),
            [
                ("META-INF/MANIFEST.MF", false, 20),
                ("com/example/App.class", false, 512),
            ],
        );

        let root: Vec<String> = index
            .children("")
            .unwrap()
            .iter()
            .map(|f| f.name().to_string())
            .collect();
        assert_eq!(root, vec!["META-INF", "com"]);

        let example = index.children("com/example").unwrap();
        assert_eq!(example.len(), 1);
        assert_eq!(example[0].path(), "/lib/a.jar!/com/example/App.class");
        assert_eq!(example[0].size(), Some(512));
        assert!(example[0].is_data());

        assert!(index.children("com/example/App.class").is_none());
    }

    #[test]
    fn test_explicit_directory_entries() {
        let index = ArchiveIndex::from_entries(
            Path::new("/a.zip"),
            [("empty/", true, 0), ("docs/readme.txt", false, 3)],
        );
        assert!(index.children("empty").unwrap().is_empty());
        assert!(index.children("empty/").unwrap().is_empty());
        assert_eq!(index.root().path(), "/a.zip!/");
    }
}
