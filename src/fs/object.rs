use std::fmt;
use std::path::{Path, PathBuf};

/// Kind of a file object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileKind {
    /// Can be listed
    Folder,
    /// Can be opened and read
    Data,
}

/// Where the bytes of a file object live
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Location {
    /// A plain file or directory on disk
    Disk(PathBuf),
    /// An entry inside a zip-format archive on disk. The archive root has an empty entry.
    Archive { archive: PathBuf, entry: String },
    /// A node of an in-memory tree, keyed by its absolute virtual path
    Virtual(String),
}

/// A node of a hierarchical file system, as seen by the search engine
///
/// File objects are plain immutable values: they carry what the iterators
/// and filters need (name, display path, kind, size) and a [`Location`]
/// that lets the owning [`super::FileSystem`] find the node again.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileObject {
    name: String,
    path: String,
    kind: FileKind,
    size: Option<u64>,
    location: Location,
}

impl FileObject {
    pub fn new(
        name: impl Into<String>,
        path: impl Into<String>,
        kind: FileKind,
        location: Location,
    ) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            kind,
            size: None,
            location,
        }
    }

    /// Attach a size in bytes
    pub fn with_size(mut self, size: u64) -> Self {
        self.size = Some(size);
        self
    }

    /// Build a file object for a disk path
    pub fn disk(path: &Path, kind: FileKind) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
        Self::new(name, path.to_string_lossy(), kind, Location::Disk(path.to_path_buf()))
    }

    /// Last path component
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Full display path. Archive entries use `<archive>!/<entry>`.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn kind(&self) -> FileKind {
        self.kind
    }

    pub fn is_folder(&self) -> bool {
        self.kind == FileKind::Folder
    }

    pub fn is_data(&self) -> bool {
        self.kind == FileKind::Data
    }

    /// Size in bytes, when the file system reported one
    pub fn size(&self) -> Option<u64> {
        self.size
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    /// Extension of the name, without the dot
    pub fn extension(&self) -> Option<&str> {
        let (stem, ext) = self.name.rsplit_once('.')?;
        if stem.is_empty() || ext.is_empty() {
            None
        } else {
            Some(ext)
        }
    }

    /// Dot-prefixed names are hidden
    pub fn is_hidden(&self) -> bool {
        self.name.starts_with('.') && self.name != "." && self.name != ".."
    }

    /// Path used when matching ignore rules: the disk path, the entry path
    /// inside an archive, or the virtual path
    pub fn match_path(&self) -> PathBuf {
        match &self.location {
            Location::Disk(path) => path.clone(),
            Location::Archive { entry, .. } => PathBuf::from(entry),
            Location::Virtual(path) => PathBuf::from(path),
        }
    }
}

impl fmt::Display for FileObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension() {
        let file = FileObject::disk(Path::new("/tmp/Main.java"), FileKind::Data);
        assert_eq!(file.extension(), Some("java"));
        assert_eq!(file.name(), "Main.java");

        let dotfile = FileObject::disk(Path::new("/tmp/.gitignore"), FileKind::Data);
        assert_eq!(dotfile.extension(), None);
        assert!(dotfile.is_hidden());

        let plain = FileObject::disk(Path::new("/tmp/Makefile"), FileKind::Data);
        assert_eq!(plain.extension(), None);
        assert!(!plain.is_hidden());
    }

    #[test]
    fn test_match_path_for_archive_entry() {
        let entry = FileObject::new(
            "A.class",
            "/lib/a.jar!/com/A.class",
            FileKind::Data,
            Location::Archive {
                archive: PathBuf::from("/lib/a.jar"),
                entry: "com/A.class".to_string(),
            },
        );
        assert_eq!(entry.match_path(), PathBuf::from("com/A.class"));
        assert_eq!(entry.to_string(), "/lib/a.jar!/com/A.class");
    }
}
