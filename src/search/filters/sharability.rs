use crate::fs::{FileObject, FileSystem, Location};
use crate::search::filter::{FilterDecision, FolderResult, SearchFilter};
use anyhow::{Context, Result};
use ignore::gitignore::{Gitignore, GitignoreBuilder};
use std::io::Read;
use std::path::{Path, PathBuf};

/// Build and cache folders that are treated as generated in every project
pub const DEFAULT_GENERATED_DIRS: &[&str] = &[
    // Rust
    "target",
    // Node.js
    "node_modules", "dist", ".next", ".nuxt",
    // Python
    "__pycache__", ".pytest_cache", ".venv",
    // JVM
    "build", "out",
    // Coverage
    "coverage", ".nyc_output",
];

/// Leaves out generated files
///
/// An entry is generated when the search root's `.gitignore` (or, on disk,
/// `.git/info/exclude`) ignores it, or when it is a folder with one of the
/// configured generated names. Answers per folder:
/// - ignored: [`FolderResult::DoNotTraverse`]
/// - explicitly re-included (`!pattern`): [`FolderResult::TraverseAllSubfolders`],
///   everything below is shared source and needs no further checks
/// - otherwise: [`FolderResult::Traverse`]
///
/// Entries are matched by their path relative to the root, so a root named
/// like a generated folder (`build`, `./out`) is still walked. Archive
/// entries below a disk root are never judged: the archive file itself
/// already passed the filter.
pub struct SharabilityFilter {
    matcher: Gitignore,
    base: PathBuf,
    archive_root: bool,
}

enum Sharability {
    Sharable,
    NotSharable,
    Unknown,
}

impl SharabilityFilter {
    /// Build the filter for one search root
    pub fn for_root(
        fs: &dyn FileSystem,
        root: &FileObject,
        generated_dirs: &[String],
    ) -> Result<Self> {
        let archive_root = matches!(root.location(), Location::Archive { .. });
        let base = root.match_path();
        // Paths handed to the matcher are already relative
        let mut builder = GitignoreBuilder::new("");

        if root.is_folder() && !archive_root {
            for rules in [".gitignore", ".git/info/exclude"] {
                let path = base.join(rules);
                let Ok(file) = fs.resolve(&path) else {
                    continue;
                };
                let mut content = String::new();
                if let Err(e) = fs.open(&file).and_then(|mut r| {
                    r.read_to_string(&mut content)
                        .with_context(|| format!("Failed to read {}", path.display()))
                }) {
                    tracing::warn!("Ignoring unreadable rules file: {:#}", e);
                    continue;
                }
                for line in content.lines() {
                    if let Err(e) = builder.add_line(Some(path.clone()), line) {
                        tracing::warn!(
                            "Invalid ignore rule '{}' in {}: {}",
                            line,
                            path.display(),
                            e
                        );
                    }
                }
                tracing::debug!("Loaded generated-file rules from {}", path.display());
            }
        }

        for dir in generated_dirs {
            let rule = format!("{}/", dir.trim_end_matches('/'));
            builder
                .add_line(None, &rule)
                .with_context(|| format!("Invalid generated folder name: {}", dir))?;
        }

        let matcher = builder
            .build()
            .context("Failed to build generated-file matcher")?;
        Ok(Self {
            matcher,
            base,
            archive_root,
        })
    }

    /// Path below the root, `None` for the root itself and for entries the
    /// rules do not cover
    fn relative_path(&self, entry: &FileObject) -> Option<PathBuf> {
        let in_archive = matches!(entry.location(), Location::Archive { .. });
        if in_archive != self.archive_root {
            return None;
        }
        let path = entry.match_path();
        let relative = path.strip_prefix(&self.base).ok()?;
        if relative.as_os_str().is_empty() {
            None
        } else {
            Some(relative.to_path_buf())
        }
    }

    fn sharability(&self, entry: &FileObject) -> Sharability {
        let Some(relative) = self.relative_path(entry) else {
            return Sharability::Unknown;
        };
        let matched = self.matcher.matched(Path::new(&relative), entry.is_folder());
        if matched.is_ignore() {
            Sharability::NotSharable
        } else if matched.is_whitelist() {
            Sharability::Sharable
        } else {
            Sharability::Unknown
        }
    }
}

impl SearchFilter for SharabilityFilter {
    fn name(&self) -> &'static str {
        "SharabilityFilter"
    }

    fn search_file(&self, file: &FileObject) -> FilterDecision {
        match self.sharability(file) {
            Sharability::NotSharable => FilterDecision::Skip("generated file"),
            _ => FilterDecision::Process,
        }
    }

    fn traverse_folder(&self, folder: &FileObject) -> FolderResult {
        match self.sharability(folder) {
            Sharability::NotSharable => FolderResult::DoNotTraverse,
            Sharability::Sharable => FolderResult::TraverseAllSubfolders,
            Sharability::Unknown => FolderResult::Traverse,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::{FileKind, MemoryFileSystem};

    fn generated() -> Vec<String> {
        DEFAULT_GENERATED_DIRS.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_generated_folder_names() {
        let fs = MemoryFileSystem::new()
            .with_file("/proj/src/main.rs", "")
            .with_file("/proj/target/debug/app", "");
        let root = fs.resolve(Path::new("/proj")).unwrap();
        let filter = SharabilityFilter::for_root(&fs, &root, &generated()).unwrap();

        let target = fs.resolve(Path::new("/proj/target")).unwrap();
        let src = fs.resolve(Path::new("/proj/src")).unwrap();
        assert_eq!(filter.traverse_folder(&target), FolderResult::DoNotTraverse);
        assert_eq!(filter.traverse_folder(&src), FolderResult::Traverse);
    }

    #[test]
    fn test_relative_root_named_like_generated_folder() {
        let fs = MemoryFileSystem::new();
        for root in ["build", "./out", "target"] {
            let root = FileObject::disk(Path::new(root), FileKind::Folder);
            let filter = SharabilityFilter::for_root(&fs, &root, &generated()).unwrap();
            assert_eq!(filter.traverse_folder(&root), FolderResult::Traverse, "{}", root.path());

            let below = |name: &str| {
                FileObject::disk(&Path::new(root.path()).join(name), FileKind::Folder)
            };
            let nested = below("gen");
            let generated = below("target");
            let same_name = below("build");
            assert_eq!(filter.traverse_folder(&nested), FolderResult::Traverse);
            assert_eq!(filter.traverse_folder(&generated), FolderResult::DoNotTraverse);
            assert_eq!(filter.traverse_folder(&same_name), FolderResult::DoNotTraverse);
        }
    }

    #[test]
    fn test_archive_entries_not_matched_against_root_rules() {
        let fs = MemoryFileSystem::new().with_file("/proj/.gitignore", "/docs/\n");
        let root = fs.resolve(Path::new("/proj")).unwrap();
        let filter = SharabilityFilter::for_root(&fs, &root, &generated()).unwrap();

        let local_docs = FileObject::new(
            "docs",
            "/proj/docs",
            FileKind::Folder,
            Location::Virtual("/proj/docs".to_string()),
        );
        assert_eq!(filter.traverse_folder(&local_docs), FolderResult::DoNotTraverse);

        let archived_docs = FileObject::new(
            "docs",
            "/proj/lib.jar!/docs",
            FileKind::Folder,
            Location::Archive {
                archive: PathBuf::from("/proj/lib.jar"),
                entry: "docs".to_string(),
            },
        );
        assert_eq!(filter.traverse_folder(&archived_docs), FolderResult::Traverse);
    }

    #[test]
    fn test_gitignore_rules() {
        let fs = MemoryFileSystem::new()
            .with_file("/proj/.gitignore", "*.log\ngen/\n!gen/keep/\n")
            .with_file("/proj/app.log", "")
            .with_file("/proj/app.rs", "")
            .with_folder("/proj/gen/keep")
            .with_folder("/proj/vendored");
        let root = fs.resolve(Path::new("/proj")).unwrap();
        let filter = SharabilityFilter::for_root(&fs, &root, &[]).unwrap();

        let log = fs.resolve(Path::new("/proj/app.log")).unwrap();
        let rs = fs.resolve(Path::new("/proj/app.rs")).unwrap();
        assert_eq!(filter.search_file(&log), FilterDecision::Skip("generated file"));
        assert_eq!(filter.search_file(&rs), FilterDecision::Process);

        let gen_dir = fs.resolve(Path::new("/proj/gen")).unwrap();
        let keep = fs.resolve(Path::new("/proj/gen/keep")).unwrap();
        let vendored = fs.resolve(Path::new("/proj/vendored")).unwrap();
        assert_eq!(filter.traverse_folder(&gen_dir), FolderResult::DoNotTraverse);
        assert_eq!(filter.traverse_folder(&keep), FolderResult::TraverseAllSubfolders);
        assert_eq!(filter.traverse_folder(&vendored), FolderResult::Traverse);
    }
}
