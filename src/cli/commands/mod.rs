use crate::cli::Output;
use crate::config::ConfigLoader;
use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;

pub mod config;
pub mod find;
pub mod list;
pub mod version;

#[derive(Parser)]
#[command(
    name = "scopewalk",
    version = env!("CARGO_PKG_VERSION"),
    about = "Filtered, lazy file enumeration for find-in-files searches",
    long_about = "scopewalk lists the files of one or more search roots, honouring .gitignore, \
                  hidden files, generated folders and archives, and can search their contents."
)]
pub struct Cli {
    /// Run as if started in <DIR> instead of current working directory
    #[arg(short = 'C', long = "directory", global = true)]
    pub directory: Option<PathBuf>,

    /// Increase verbosity (can be repeated)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Use custom configuration file
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the files of the search scope
    List(list::ListArgs),
    /// Search file contents within the search scope
    Find(find::FindArgs),
    /// Configuration management
    Config(config::ConfigArgs),
    /// Show version information
    Version(version::VersionArgs),
}

impl Cli {
    pub async fn run(mut self) -> Result<()> {
        if let Some(dir) = &self.directory {
            std::env::set_current_dir(dir)
                .with_context(|| format!("Cannot change to directory {}", dir.display()))?;
        }

        setup_logging(self.verbose, self.quiet);
        let output = Output::new(self.verbose > 0, self.quiet);

        match self.command.take() {
            Some(Commands::List(args)) => list::execute(args, self.load_config()?, output).await,
            Some(Commands::Find(args)) => find::execute(args, self.load_config()?, output).await,
            Some(Commands::Config(args)) => {
                config::execute(args, self.config.as_deref(), output).await
            }
            Some(Commands::Version(args)) => version::execute(args, output).await,
            None => {
                Cli::command().print_help()?;
                Ok(())
            }
        }
    }

    fn load_config(&self) -> Result<crate::config::ScopeConfig> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;
        ConfigLoader::load_with_custom_config(&cwd, self.config.as_deref())?.extract()
    }
}

fn setup_logging(verbose: u8, quiet: bool) {
    if quiet {
        return;
    }

    // ignore/globset are noisy below -vvv
    let filter =
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| match verbose {
            0 => tracing_subscriber::EnvFilter::new("warn"),
            1 => tracing_subscriber::EnvFilter::new("info,ignore=warn,globset=warn"),
            2 => tracing_subscriber::EnvFilter::new("debug,ignore=warn,globset=warn"),
            _ => tracing_subscriber::EnvFilter::new("trace"),
        });

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
