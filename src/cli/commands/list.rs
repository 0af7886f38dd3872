use crate::cli::scope::{cancel_on_ctrl_c, Scope, ScopeArgs};
use crate::cli::Output;
use crate::config::ScopeConfig;
use crate::search::{
    CancelFlag, ListenerChain, SearchInfo, SearchListener, SearchStats, TracingListener,
};
use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use serde::Serialize;
use std::sync::Arc;

#[derive(Args)]
pub struct ListArgs {
    #[command(flatten)]
    pub scope: ScopeArgs,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub format: ListFormat,

    /// Print traversal statistics
    #[arg(long)]
    pub stats: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ListFormat {
    Text,
    Json,
}

#[derive(Debug, Serialize)]
struct ListedFile {
    path: String,
    size: Option<u64>,
}

pub async fn execute(args: ListArgs, mut config: ScopeConfig, output: Output) -> Result<()> {
    args.scope.apply(&mut config);
    let scope = Scope::build(&args.scope, &config, &output)?;

    let cancel = CancelFlag::new();
    cancel_on_ctrl_c(cancel.clone());

    let stats = Arc::new(SearchStats::new());
    let listener: Arc<dyn SearchListener> = Arc::new(
        ListenerChain::new()
            .with(Arc::new(TracingListener))
            .with(stats.clone()),
    );

    let format = args.format;
    let search_cancel = cancel.clone();
    let files = tokio::task::spawn_blocking(move || -> Result<Vec<ListedFile>> {
        let files = scope.info.files_to_search(&scope.options, listener, &search_cancel)?;
        let mut listed = Vec::new();
        for file in files {
            if format == ListFormat::Text {
                println!("{}", file.path());
            }
            listed.push(ListedFile {
                path: file.path().to_string(),
                size: file.size(),
            });
        }
        Ok(listed)
    })
    .await
    .context("Search task failed")??;

    if format == ListFormat::Json {
        println!("{}", serde_json::to_string_pretty(&files)?);
    }

    if cancel.is_cancelled() {
        output.warning("Search cancelled, results are incomplete");
    }
    if args.stats {
        let snapshot = stats.snapshot();
        output.count("Files found", files.len());
        output.summary_stats("Folders entered", snapshot.directories_entered);
        output.summary_stats("Files skipped", snapshot.files_skipped);
        output.summary_stats("Folders skipped", snapshot.folders_skipped);
        output.summary_stats("Errors", snapshot.errors);
    }
    Ok(())
}
