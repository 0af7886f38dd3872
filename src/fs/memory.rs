use super::{FileKind, FileObject, FileSystem, Location};
use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::io::{Cursor, Read};
use std::path::Path;

#[derive(Debug, Clone)]
enum Node {
    Folder { unreadable: bool },
    Data(Vec<u8>),
    /// Inside of an archive file, keyed `<archive>!`; never listed by its parent
    ArchiveRoot,
}

/// In-memory tree of folders, files and archives
///
/// Paths are absolute and `/`-separated. Parents are created on demand.
///
/// ```
/// use scopewalk::fs::{FileSystem, MemoryFileSystem};
/// use std::path::Path;
///
/// let fs = MemoryFileSystem::new()
///     .with_file("/proj/src/Main.java", "class Main {}")
///     .with_archive("/proj/lib/util.jar", &[("util/Strings.java", "class Strings {}")]);
///
/// let root = fs.resolve(Path::new("/proj")).unwrap();
/// assert_eq!(fs.children(&root).unwrap().len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct MemoryFileSystem {
    nodes: BTreeMap<String, Node>,
}

impl MemoryFileSystem {
    pub fn new() -> Self {
        let mut nodes = BTreeMap::new();
        nodes.insert("/".to_string(), Node::Folder { unreadable: false });
        Self { nodes }
    }

    pub fn with_folder(mut self, path: &str) -> Self {
        self.add(path, Node::Folder { unreadable: false });
        self
    }

    pub fn with_file(mut self, path: &str, content: impl AsRef<[u8]>) -> Self {
        self.add(path, Node::Data(content.as_ref().to_vec()));
        self
    }

    /// A folder whose listing always fails
    pub fn with_unreadable_folder(mut self, path: &str) -> Self {
        self.add(path, Node::Folder { unreadable: true });
        self
    }

    /// An archive file at `path` whose inside holds the given `(entry, content)` pairs
    pub fn with_archive(mut self, path: &str, entries: &[(&str, &str)]) -> Self {
        let key = normalize(path);
        self.add(&key, Node::Data(b"PK\x03\x04".to_vec()));
        let root = format!("{}!", key);
        self.nodes.insert(root.clone(), Node::ArchiveRoot);
        for (entry, content) in entries {
            let entry_key = format!("{}/{}", root, entry.trim_matches('/'));
            self.add(&entry_key, Node::Data(content.as_bytes().to_vec()));
        }
        self
    }

    fn add(&mut self, path: &str, node: Node) {
        let key = normalize(path);
        let mut parent = parent_of(&key);
        while let Some(dir) = parent {
            if self.nodes.contains_key(&dir) {
                break;
            }
            self.nodes.insert(dir.clone(), Node::Folder { unreadable: false });
            parent = parent_of(&dir);
        }
        self.nodes.insert(key, node);
    }

    fn object(key: &str, node: &Node) -> FileObject {
        let name = key.rsplit('/').next().unwrap_or(key).to_string();
        let location = Location::Virtual(key.to_string());
        match node {
            Node::Folder { .. } => FileObject::new(name, key, FileKind::Folder, location),
            Node::Data(content) => FileObject::new(name, key, FileKind::Data, location)
                .with_size(content.len() as u64),
            Node::ArchiveRoot => {
                let name = name.trim_end_matches('!').to_string();
                FileObject::new(name, format!("{}/", key), FileKind::Folder, location)
            }
        }
    }

    fn key_of<'a>(&self, file: &'a FileObject) -> Result<&'a str> {
        match file.location() {
            Location::Virtual(key) => Ok(key),
            _ => anyhow::bail!("Not an in-memory file: {}", file.path()),
        }
    }
}

impl Default for MemoryFileSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl FileSystem for MemoryFileSystem {
    fn resolve(&self, path: &Path) -> Result<FileObject> {
        let key = normalize(&path.to_string_lossy());
        let node = self
            .nodes
            .get(&key)
            .with_context(|| format!("Path does not exist: {}", key))?;
        Ok(Self::object(&key, node))
    }

    fn is_valid(&self, file: &FileObject) -> bool {
        self.key_of(file).map(|key| self.nodes.contains_key(key)).unwrap_or(false)
    }

    fn children(&self, folder: &FileObject) -> Result<Vec<FileObject>> {
        let key = self.key_of(folder)?;
        match self.nodes.get(key) {
            Some(Node::Folder { unreadable: true }) => anyhow::bail!("Permission denied: {}", key),
            Some(Node::Folder { .. }) | Some(Node::ArchiveRoot) => {}
            Some(Node::Data(_)) => anyhow::bail!("Not a folder: {}", key),
            None => anyhow::bail!("Path does not exist: {}", key),
        }

        let prefix = if key == "/" { "/".to_string() } else { format!("{}/", key) };
        Ok(self
            .nodes
            .range(prefix.clone()..)
            .take_while(|(k, _)| k.starts_with(&prefix))
            .filter(|(k, node)| {
                let rest = &k[prefix.len()..];
                !rest.is_empty() && !rest.contains('/') && !matches!(node, Node::ArchiveRoot)
            })
            .map(|(k, node)| Self::object(k, node))
            .collect())
    }

    fn archive_root(&self, file: &FileObject) -> Option<FileObject> {
        let key = self.key_of(file).ok()?;
        let root = format!("{}!", key);
        match self.nodes.get(&root) {
            Some(node @ Node::ArchiveRoot) if file.is_data() => Some(Self::object(&root, node)),
            _ => None,
        }
    }

    fn open(&self, file: &FileObject) -> Result<Box<dyn Read + Send>> {
        let key = self.key_of(file)?;
        match self.nodes.get(key) {
            Some(Node::Data(content)) => Ok(Box::new(Cursor::new(content.clone()))),
            Some(_) => anyhow::bail!("Not a data file: {}", key),
            None => anyhow::bail!("Path does not exist: {}", key),
        }
    }
}

fn normalize(path: &str) -> String {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    }
}

fn parent_of(key: &str) -> Option<String> {
    if key == "/" {
        return None;
    }
    match key.rsplit_once('/') {
        Some(("", _)) => Some("/".to_string()),
        Some((parent, _)) => Some(parent.to_string()),
        None => None,
    }
}
