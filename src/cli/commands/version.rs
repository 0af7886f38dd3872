use crate::cli::Output;
use anyhow::Result;
use clap::Args;

#[derive(Args)]
pub struct VersionArgs {}

pub async fn execute(_args: VersionArgs, output: Output) -> Result<()> {
    output.header(&format!("{} v{}", crate::PKG_NAME, crate::VERSION));
    output.key_value("Description:", crate::PKG_DESCRIPTION, false);

    output.category("Build");
    output.key_value("Rust edition:", "2024", false);
    output.key_value("Target:", std::env::consts::ARCH, false);
    output.key_value("OS:", std::env::consts::OS, false);
    output.key_value("Profile:", if cfg!(debug_assertions) { "debug" } else { "release" }, false);
    Ok(())
}
