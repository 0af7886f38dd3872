use super::archive::{is_archive_name, ArchiveIndex};
use super::{FileKind, FileObject, FileSystem, Location};
use anyhow::{Context, Result};
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufReader, Cursor, Read};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Inflation limit for archive entries unless configured otherwise
pub const DEFAULT_MAX_ENTRY_BYTES: u64 = 256 * 1024 * 1024;

/// The real file system
///
/// Zip-format archives (`.zip`, `.jar`, `.war`, `.ear`) can be browsed as
/// folders; their central directory is read once and cached per archive.
pub struct DiskFileSystem {
    follow_symlinks: bool,
    max_entry_bytes: u64,
    archives: Mutex<HashMap<PathBuf, Arc<ArchiveIndex>>>,
}

impl DiskFileSystem {
    pub fn new() -> Self {
        Self {
            follow_symlinks: false,
            max_entry_bytes: DEFAULT_MAX_ENTRY_BYTES,
            archives: Mutex::new(HashMap::new()),
        }
    }

    /// Whether symbolic links are resolved while listing folders.
    /// When off, links are left out of listings entirely.
    pub fn follow_symlinks(mut self, follow: bool) -> Self {
        self.follow_symlinks = follow;
        self
    }

    /// Largest archive entry [`FileSystem::open`] will inflate into memory
    pub fn max_entry_bytes(mut self, bytes: u64) -> Self {
        self.max_entry_bytes = bytes;
        self
    }

    fn archive_index(&self, archive: &Path) -> Result<Arc<ArchiveIndex>> {
        let mut cache = self.archives.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(index) = cache.get(archive) {
            return Ok(index.clone());
        }
        let index = Arc::new(ArchiveIndex::open(archive)?);
        cache.insert(archive.to_path_buf(), index.clone());
        Ok(index)
    }

    fn list_directory(&self, dir: &Path) -> Result<Vec<FileObject>> {
        let entries = fs::read_dir(dir)
            .with_context(|| format!("Failed to list directory: {}", dir.display()))?;

        let mut children = Vec::new();
        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("Unreadable entry in {}: {}", dir.display(), e);
                    continue;
                }
            };
            let path = entry.path();

            let file_type = match entry.file_type() {
                Ok(ft) => ft,
                Err(e) => {
                    tracing::warn!("Cannot stat {}: {}", path.display(), e);
                    continue;
                }
            };

            let metadata = if file_type.is_symlink() {
                if !self.follow_symlinks {
                    tracing::trace!("Leaving out symbolic link: {}", path.display());
                    continue;
                }
                match fs::metadata(&path) {
                    Ok(md) => md,
                    Err(e) => {
                        tracing::debug!("Dangling symbolic link {}: {}", path.display(), e);
                        continue;
                    }
                }
            } else {
                match entry.metadata() {
                    Ok(md) => md,
                    Err(e) => {
                        tracing::warn!("Cannot stat {}: {}", path.display(), e);
                        continue;
                    }
                }
            };

            children.push(if metadata.is_dir() {
                FileObject::disk(&path, FileKind::Folder)
            } else {
                FileObject::disk(&path, FileKind::Data).with_size(metadata.len())
            });
        }
        Ok(children)
    }
}

impl Default for DiskFileSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl FileSystem for DiskFileSystem {
    fn resolve(&self, path: &Path) -> Result<FileObject> {
        let metadata = fs::metadata(path)
            .with_context(|| format!("Path does not exist: {}", path.display()))?;
        Ok(if metadata.is_dir() {
            FileObject::disk(path, FileKind::Folder)
        } else {
            FileObject::disk(path, FileKind::Data).with_size(metadata.len())
        })
    }

    fn is_valid(&self, file: &FileObject) -> bool {
        match file.location() {
            Location::Disk(path) => path.exists(),
            Location::Archive { archive, .. } => archive.is_file(),
            Location::Virtual(_) => false,
        }
    }

    fn children(&self, folder: &FileObject) -> Result<Vec<FileObject>> {
        match folder.location() {
            Location::Disk(path) => self.list_directory(path),
            Location::Archive { archive, entry } => {
                let index = self.archive_index(archive)?;
                index
                    .children(entry)
                    .with_context(|| format!("Not a folder: {}", folder.path()))
            }
            Location::Virtual(path) => {
                anyhow::bail!("Virtual path on disk file system: {}", path)
            }
        }
    }

    fn archive_root(&self, file: &FileObject) -> Option<FileObject> {
        let Location::Disk(path) = file.location() else {
            return None;
        };
        if !file.is_data() || !is_archive_name(file.name()) {
            return None;
        }
        match self.archive_index(path) {
            Ok(index) => Some(index.root()),
            Err(e) => {
                tracing::debug!("Not browsing {} as an archive: {:#}", path.display(), e);
                None
            }
        }
    }

    fn open(&self, file: &FileObject) -> Result<Box<dyn Read + Send>> {
        match file.location() {
            Location::Disk(path) => {
                let handle = File::open(path)
                    .with_context(|| format!("Failed to open file: {}", path.display()))?;
                Ok(Box::new(BufReader::new(handle)))
            }
            Location::Archive { archive, entry } => {
                let bytes = ArchiveIndex::read_entry(archive, entry, self.max_entry_bytes)?;
                Ok(Box::new(Cursor::new(bytes)))
            }
            Location::Virtual(path) => {
                anyhow::bail!("Virtual path on disk file system: {}", path)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_jar(path: &Path) {
        let file = File::create(path).unwrap();
        let mut zip = zip::ZipWriter::new(file);
        let options = zip::write::SimpleFileOptions::default();
        zip.start_file("com/example/App.java", options).unwrap();
        zip.write_all(b"class App {}\n").unwrap();
        zip.finish().unwrap();
    }

    #[test]
    fn test_resolve_and_list() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("src")).unwrap();
        fs::write(temp.path().join("README.md"), "hello").unwrap();

        let disk = DiskFileSystem::new();
        let root = disk.resolve(temp.path()).unwrap();
        assert!(root.is_folder());

        let mut children = disk.children(&root).unwrap();
        children.sort_by(|a, b| a.name().cmp(b.name()));
        assert_eq!(children.len(), 2);
        assert_eq!(children[0].name(), "README.md");
        assert_eq!(children[0].size(), Some(5));
        assert!(children[1].is_folder());
    }

    #[test]
    fn test_resolve_missing_path() {
        let disk = DiskFileSystem::new();
        assert!(disk.resolve(Path::new("/definitely/not/here")).is_err());
    }

    #[test]
    fn test_archive_browsing() {
        let temp = TempDir::new().unwrap();
        let jar = temp.path().join("lib.jar");
        write_jar(&jar);

        let disk = DiskFileSystem::new();
        let file = disk.resolve(&jar).unwrap();
        let root = disk.archive_root(&file).expect("jar should browse as archive");
        assert!(root.is_folder());

        let com = disk.children(&root).unwrap();
        assert_eq!(com.len(), 1);
        let example = disk.children(&com[0]).unwrap();
        let app = &disk.children(&example[0]).unwrap()[0];
        assert_eq!(app.name(), "App.java");

        let mut content = String::new();
        disk.open(app).unwrap().read_to_string(&mut content).unwrap();
        assert_eq!(content, "class App {}\n");
    }

    #[test]
    fn test_oversized_archive_entry_is_refused() {
        let temp = TempDir::new().unwrap();
        let jar = temp.path().join("lib.jar");
        write_jar(&jar);

        let disk = DiskFileSystem::new().max_entry_bytes(4);
        let root = disk.archive_root(&disk.resolve(&jar).unwrap()).unwrap();
        let com = disk.children(&root).unwrap();
        let example = disk.children(&com[0]).unwrap();
        let app = &disk.children(&example[0]).unwrap()[0];

        let err = disk.open(app).err().unwrap();
        assert!(format!("{:#}", err).contains("larger than 4 bytes"));
        assert_eq!(
            ArchiveIndex::read_entry(&jar, "com/example/App.java", 13).unwrap(),
            b"class App {}\n"
        );
    }

    #[test]
    fn test_broken_archive_is_plain_file() {
        let temp = TempDir::new().unwrap();
        let fake = temp.path().join("fake.zip");
        fs::write(&fake, "not a zip").unwrap();

        let disk = DiskFileSystem::new();
        let file = disk.resolve(&fake).unwrap();
        assert!(disk.archive_root(&file).is_none());
    }
}
