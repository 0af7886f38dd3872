use crate::cli::scope::{cancel_on_ctrl_c, Scope, ScopeArgs};
use crate::cli::Output;
use crate::config::ScopeConfig;
use crate::fs::FileObject;
use crate::parallel::{ParallelConfig, ParallelProcessor};
use crate::search::{
    CancelFlag, ContentMatcher, ContentQuery, FileMatches, ListenerChain, SearchInfo,
    SearchListener, SearchStats, TracingListener,
};
use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use std::sync::Arc;

#[derive(Args)]
pub struct FindArgs {
    /// Text or regular expression to look for
    pub text: String,

    #[command(flatten)]
    pub scope: ScopeArgs,

    /// Treat TEXT as a literal string
    #[arg(short = 'F', long)]
    pub fixed_strings: bool,

    /// Case insensitive matching
    #[arg(short = 'i', long)]
    pub ignore_case: bool,

    /// Only match whole words
    #[arg(short = 'w', long)]
    pub word: bool,

    /// Worker threads (default: derived from CPU count and config)
    #[arg(short = 'j', long, value_name = "N")]
    pub threads: Option<usize>,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub format: FindFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FindFormat {
    Text,
    Json,
    /// Only the paths of matching files
    Files,
}

pub async fn execute(args: FindArgs, mut config: ScopeConfig, output: Output) -> Result<()> {
    args.scope.apply(&mut config);
    config.content.case_insensitive |= args.ignore_case;
    config.content.whole_words |= args.word;
    if let Some(threads) = args.threads {
        config.content.max_threads = threads;
    }

    let query = ContentQuery {
        text: args.text.clone(),
        regexp: !args.fixed_strings,
        case_insensitive: config.content.case_insensitive,
        whole_words: config.content.whole_words,
        max_matches_per_file: config.content.max_matches_per_file,
    };
    let matcher = ContentMatcher::new(&query)?;
    let scope = Scope::build(&args.scope, &config, &output)?;

    let processor = ParallelProcessor::new(ParallelConfig {
        max_threads: config.content.max_threads,
        thread_percentage: config.content.thread_percentage,
        ..ParallelConfig::default()
    });
    output.verbose(&format!("Content search with {} worker(s)", processor.strategy().workers()));

    let cancel = CancelFlag::new();
    cancel_on_ctrl_c(cancel.clone());

    let stats = Arc::new(SearchStats::new());
    let listener: Arc<dyn SearchListener> = Arc::new(
        ListenerChain::new()
            .with(Arc::new(TracingListener))
            .with(stats.clone()),
    );

    let spinner = output.spinner(&format!("Searching for '{}'", args.text));
    let search_cancel = cancel.clone();
    let results = tokio::task::spawn_blocking(move || -> Result<Vec<FileMatches>> {
        let files = scope
            .info
            .files_to_search(&scope.options, listener.clone(), &search_cancel)?;
        let fs = scope.fs.clone();
        processor.process(
            files,
            |file: FileObject| {
                let found = matcher.search(fs.as_ref(), &file)?;
                Ok((!found.is_empty()).then_some(found))
            },
            listener.as_ref(),
            &search_cancel,
        )
    })
    .await
    .context("Search task failed")??;
    spinner.finish_and_clear();

    match args.format {
        FindFormat::Json => println!("{}", serde_json::to_string_pretty(&results)?),
        FindFormat::Files => {
            for file in &results {
                println!("{}", file.path);
            }
        }
        FindFormat::Text => {
            for (i, file) in results.iter().enumerate() {
                if i > 0 {
                    println!();
                }
                output.file_header(&file.path);
                for m in &file.matches {
                    output.match_line(m.line_number, m.column, &m.line);
                }
            }
        }
    }

    if cancel.is_cancelled() {
        output.warning("Search cancelled, results are incomplete");
    }
    let snapshot = stats.snapshot();
    if snapshot.errors > 0 {
        output.warning(&format!("{} file(s) or folder(s) could not be read", snapshot.errors));
    }
    output.verbose(&format!(
        "{} matching file(s), {} folder(s) entered",
        results.len(),
        snapshot.directories_entered
    ));
    Ok(())
}
