use crate::cli::Output;
use crate::config::{ConfigFormat, ConfigLoader, DEFAULT_CONFIG};
use anyhow::{Context, Result};
use clap::{Args, Subcommand, ValueEnum};
use std::path::Path;

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show the merged configuration
    Show {
        /// Output format
        #[arg(long, value_enum, default_value = "toml")]
        format: ShowFormat,
    },
    /// Check that the merged configuration is valid
    Validate,
    /// Write scopewalk.toml with the default settings
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ShowFormat {
    Toml,
    Json,
    Yaml,
}

impl From<ShowFormat> for ConfigFormat {
    fn from(format: ShowFormat) -> Self {
        match format {
            ShowFormat::Toml => ConfigFormat::Toml,
            ShowFormat::Json => ConfigFormat::Json,
            ShowFormat::Yaml => ConfigFormat::Yaml,
        }
    }
}

pub async fn execute(args: ConfigArgs, custom_config: Option<&Path>, output: Output) -> Result<()> {
    match args.command {
        ConfigCommand::Show { format } => {
            let config = load(custom_config)?.extract()?;
            print!("{}", config.render(format.into())?);
            Ok(())
        }
        ConfigCommand::Validate => {
            let loader = load(custom_config)?;
            loader.extract()?;
            for source in loader.sources() {
                output.verbose(&format!("Loaded {}", source));
            }
            output.success("Configuration is valid");
            Ok(())
        }
        ConfigCommand::Init { force } => {
            let path = Path::new("scopewalk.toml");
            if path.exists() && !force {
                anyhow::bail!("{} already exists (use --force to overwrite)", path.display());
            }
            std::fs::write(path, DEFAULT_CONFIG)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            output.success(&format!("Created {}", path.display()));
            Ok(())
        }
    }
}

fn load(custom_config: Option<&Path>) -> Result<ConfigLoader> {
    let cwd = std::env::current_dir().context("Failed to get current directory")?;
    ConfigLoader::load_with_custom_config(&cwd, custom_config)
}
