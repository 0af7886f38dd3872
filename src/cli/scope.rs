//! Search scope flags shared by `list` and `find`

use crate::cli::Output;
use crate::config::ScopeConfig;
use crate::fs::{DiskFileSystem, FileSystem};
use crate::search::filters::{PathFilter, SizeFilter};
use crate::search::{
    CancelFlag, CompoundSearchInfo, DefaultFilters, FlatSearchInfo, SearchInfo, SearchRoot,
    SearchScopeOptions, SimpleSearchInfo,
};
use anyhow::Result;
use clap::Args;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Args, Debug, Default, Clone)]
pub struct ScopeArgs {
    /// Folders or files to search (default: current directory)
    #[arg(value_name = "ROOT")]
    pub roots: Vec<PathBuf>,

    /// File-name pattern: comma separated globs, `!glob` excludes
    #[arg(short = 'n', long = "name", value_name = "PATTERN")]
    pub name: Option<String>,

    /// Treat --name as a regular expression
    #[arg(long)]
    pub regexp: bool,

    /// Search inside zip/jar/war/ear archives
    #[arg(long)]
    pub archives: bool,

    /// Include generated files (.gitignore'd, build output)
    #[arg(long)]
    pub generated: bool,

    /// Include hidden files and folders
    #[arg(long)]
    pub hidden: bool,

    /// Do not descend into subfolders
    #[arg(long)]
    pub flat: bool,

    /// Exclude paths matching these globs (comma-separated or repeated)
    #[arg(short = 'e', long = "exclude", value_delimiter = ',', value_name = "GLOB")]
    pub exclude: Vec<String>,

    /// Skip files larger than this many megabytes
    #[arg(long = "max-size", value_name = "MB")]
    pub max_size: Option<usize>,

    /// Follow symbolic links
    #[arg(long)]
    pub follow_symlinks: bool,
}

impl ScopeArgs {
    /// Override configured values with the flags that were given
    pub fn apply(&self, config: &mut ScopeConfig) {
        let search = &mut config.search;
        if let Some(name) = &self.name {
            search.name_pattern = name.clone();
        }
        search.regexp |= self.regexp;
        search.search_in_archives |= self.archives;
        search.search_in_generated |= self.generated;
        search.include_hidden |= self.hidden;
        search.follow_symlinks |= self.follow_symlinks;
        search.exclude_patterns.extend(self.exclude.iter().cloned());
        if let Some(max_size) = self.max_size {
            search.max_file_size_mb = max_size;
        }
    }

    fn root_paths(&self) -> Vec<PathBuf> {
        if self.roots.is_empty() {
            vec![PathBuf::from(".")]
        } else {
            self.roots.clone()
        }
    }
}

/// Everything needed to run one search
pub struct Scope {
    pub fs: Arc<dyn FileSystem>,
    pub info: CompoundSearchInfo,
    pub options: SearchScopeOptions,
}

impl Scope {
    /// Resolve the roots and assemble filters from the effective configuration.
    /// Missing roots are warned about and skipped.
    pub fn build(args: &ScopeArgs, config: &ScopeConfig, output: &Output) -> Result<Self> {
        config.validate()?;
        let search = &config.search;
        let fs: Arc<dyn FileSystem> = Arc::new(
            DiskFileSystem::new()
                .follow_symlinks(search.follow_symlinks)
                .max_entry_bytes(search.max_file_size_mb as u64 * 1024 * 1024),
        );

        let defaults = DefaultFilters::default()
            .skip_hidden(!search.include_hidden)
            .generated_dirs(search.generated_dirs.clone());

        let mut info = CompoundSearchInfo::default();
        for path in args.root_paths() {
            let file = match fs.resolve(&path) {
                Ok(file) => file,
                Err(e) => {
                    output.warning(&format!("Skipping root: {:#}", e));
                    continue;
                }
            };

            let mut root = SearchRoot::new(file.clone());
            if !search.exclude_patterns.is_empty() {
                let excludes = PathFilter::new(Path::new(file.path()), &search.exclude_patterns)?;
                root = root.with_filter(Arc::new(excludes));
            }

            let element: Arc<dyn SearchInfo> = if args.flat {
                Arc::new(FlatSearchInfo::new(fs.clone(), root).with_defaults(defaults.clone()))
            } else {
                Arc::new(SimpleSearchInfo::new(fs.clone(), root).with_defaults(defaults.clone()))
            };
            info.push(element);
        }

        if !info.can_search() {
            anyhow::bail!("No searchable root");
        }

        let options = config
            .scope_options()
            .with_filter(Arc::new(SizeFilter::new(search.max_file_size_mb)));
        tracing::debug!("Search scope: {:?}", options);

        Ok(Self { fs, info, options })
    }
}

/// Set the flag when Ctrl-C is pressed
pub fn cancel_on_ctrl_c(cancel: CancelFlag) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, stopping search");
            cancel.cancel();
        }
    });
}
