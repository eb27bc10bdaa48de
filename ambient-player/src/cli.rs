use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::utils::version;

#[derive(Parser, Debug)]
#[command(author, version = version(), about)]
pub struct AppArgs {
    #[arg(
        short,
        long,
        value_name = "PATH",
        help = "Path to an extra configuration file"
    )]
    pub config: Option<PathBuf>,

    #[arg(
        short,
        long,
        value_name = "PATH",
        help = "Directory the sound assets are served from"
    )]
    pub assets: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// List the available sounds by category
    List {
        #[arg(long, help = "Print the catalog as JSON", default_value_t = false)]
        json: bool,
    },

    /// Play one sound until interrupted
    Play {
        #[arg(value_name = "ID", help = "Id of the sound to play")]
        id: String,

        #[arg(
            short,
            long,
            value_name = "LEVEL",
            help = "Set and remember the volume (0.0 - 1.0) before playing"
        )]
        volume: Option<f64>,
    },

    /// Show or change the remembered volume
    Volume {
        #[arg(value_name = "LEVEL", help = "New volume (0.0 - 1.0)")]
        level: Option<f64>,
    },

    /// Pick sounds interactively
    Shell,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parse_play() {
        let args = AppArgs::try_parse_from(["ambient", "-a", "./web", "play", "rain", "-v", "0.3"])
            .unwrap();
        assert_eq!(args.assets, Some(PathBuf::from("./web")));
        assert_eq!(
            args.command,
            Command::Play {
                id: "rain".to_owned(),
                volume: Some(0.3)
            }
        );
    }

    #[test]
    fn parse_list_and_volume() {
        let args = AppArgs::try_parse_from(["ambient", "list", "--json"]).unwrap();
        assert_eq!(args.command, Command::List { json: true });

        let args = AppArgs::try_parse_from(["ambient", "volume"]).unwrap();
        assert_eq!(args.command, Command::Volume { level: None });
    }

    #[test]
    fn subcommand_is_required() {
        assert!(AppArgs::try_parse_from(["ambient"]).is_err());
    }
}
