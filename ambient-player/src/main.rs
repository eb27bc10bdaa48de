pub mod app;
pub mod backend;
pub mod cli;
pub mod init;
pub mod settings;
pub mod shell;
pub mod utils;

use clap::Parser;
use color_eyre::eyre::Result;

use crate::{cli::AppArgs, settings::Settings};

#[tokio::main]
async fn main() -> Result<()> {
    init::init()?;

    let args = AppArgs::parse();
    let settings = Settings::new(args.config.as_deref())?.with_args(&args);
    app::run(args.command, settings).await?;

    Ok(())
}
