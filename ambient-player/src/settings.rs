use std::path::{Path, PathBuf};

use color_eyre::eyre::Result;
use config::{builder::DefaultState, Config, ConfigBuilder, Environment, File, FileFormat};
use serde::Deserialize;

use crate::{cli::AppArgs, init::project_directory};

const DEFAULT_ASSET_ROOT: &str = "./public";

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Settings {
    /// Directory that asset locators such as `/sounds/ambients/rain.mp3` resolve under.
    pub asset_root: PathBuf,
    /// JSON file holding the remembered volume.
    pub preferences: PathBuf,
}

impl Settings {
    /// Layers defaults, the config files in the project config directory, an
    /// optional extra file and `AMBIENT_*` environment variables.
    pub fn new(extra: Option<&Path>) -> Result<Self> {
        let dirs = project_directory()?;
        let preferences = dirs.data_local_dir().join("preferences.json");

        let settings = layered(dirs.config_dir(), &preferences, extra)?
            .add_source(Environment::with_prefix("AMBIENT"))
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }

    /// Command line flags win over every config layer.
    pub fn with_args(mut self, args: &AppArgs) -> Self {
        if let Some(assets) = &args.assets {
            self.asset_root = assets.clone();
        }
        self
    }
}

/// Every file based layer, lowest priority first.
fn layered(
    config_dir: &Path,
    preferences: &Path,
    extra: Option<&Path>,
) -> Result<ConfigBuilder<DefaultState>> {
    let mut builder = Config::builder()
        .set_default("asset_root", DEFAULT_ASSET_ROOT)?
        .set_default("preferences", preferences.to_string_lossy().to_string())?;

    for (name, format) in [
        ("config.toml", FileFormat::Toml),
        ("config.json", FileFormat::Json),
    ] {
        builder = builder.add_source(
            File::from(config_dir.join(name))
                .format(format)
                .required(false),
        );
    }
    if let Some(path) = extra {
        builder = builder.add_source(File::from(path).required(true));
    }
    Ok(builder)
}
