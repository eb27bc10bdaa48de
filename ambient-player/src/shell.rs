use std::str::FromStr;

use ambient_core::{PlaybackPhase, PlaybackSnapshot};
use color_eyre::eyre::Result;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

use crate::{app::Controller, utils::percent};

const HELP: &str = "\
commands:
  toggle <id>     play <id>, or stop it if it is already playing
  play <id>       (re)start <id> from the beginning
  stop            stop the current sound
  volume <level>  set the volume (0.0 - 1.0)
  status          show what is playing
  list            list the available sounds
  quit            leave";

#[derive(Debug, Clone, PartialEq)]
pub enum ShellCommand {
    Toggle(String),
    Play(String),
    Stop,
    Volume(f64),
    Status,
    List,
    Help,
    Quit,
}

impl FromStr for ShellCommand {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let command = words.next().unwrap_or("help");
        let arg = words.next();

        let command = match (command, arg) {
            ("toggle" | "t", Some(id)) => Self::Toggle(id.to_owned()),
            ("play" | "p", Some(id)) => Self::Play(id.to_owned()),
            ("stop" | "s", None) => Self::Stop,
            ("volume" | "v", Some(level)) => {
                let level: f64 = level
                    .parse()
                    .map_err(|_| format!("not a number: {level}"))?;
                if !(0.0..=1.0).contains(&level) {
                    return Err(format!("volume must be between 0.0 and 1.0, got {level}"));
                }
                Self::Volume(level)
            }
            ("status", None) => Self::Status,
            ("list" | "ls", None) => Self::List,
            ("help" | "?", None) => Self::Help,
            ("quit" | "exit" | "q", None) => Self::Quit,
            _ => return Err(format!("unrecognized command: {}", line.trim())),
        };

        if words.next().is_some() {
            return Err(format!("too many arguments: {}", line.trim()));
        }
        Ok(command)
    }
}

fn describe(snapshot: &PlaybackSnapshot) -> String {
    let phase = match snapshot.phase() {
        PlaybackPhase::Idle => "idle".to_owned(),
        PlaybackPhase::Loading(id) => format!("loading {id}"),
        PlaybackPhase::Playing(id) => format!("playing {id}"),
    };
    format!("[{phase}, volume {}]", percent(snapshot.volume))
}

pub async fn run(controller: Controller) -> Result<()> {
    let mut updates = controller.subscribe();
    let printer = tokio::spawn(async move {
        let mut last = updates.borrow_and_update().phase();
        while updates.changed().await.is_ok() {
            let phase = updates.borrow_and_update().phase();
            if phase != last {
                debug!("{last:?} -> {phase:?}");
                last = phase;
                if let PlaybackPhase::Loading(id) = phase {
                    println!("loading {id}...");
                }
            }
        }
    });

    println!("{HELP}");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let command = match line.parse::<ShellCommand>() {
            Ok(command) => command,
            Err(e) => {
                println!("{e}");
                continue;
            }
        };

        match command {
            ShellCommand::Toggle(id) => {
                if let Err(e) = controller.toggle_id(&id).await {
                    println!("{e}");
                }
            }
            ShellCommand::Play(id) => {
                if let Err(e) = controller.play_id(&id).await {
                    println!("{e}");
                }
            }
            ShellCommand::Stop => controller.stop(),
            ShellCommand::Volume(level) => controller.set_volume(level),
            ShellCommand::Status => {}
            ShellCommand::List => {
                for sound in controller.list_sounds() {
                    let marker = if controller.is_loaded(sound.id) { "*" } else { " " };
                    println!("{marker} {:<22} {} {}", sound.id, sound.icon, sound.name);
                }
            }
            ShellCommand::Help => println!("{HELP}"),
            ShellCommand::Quit => break,
        }
        println!("{}", describe(&controller.snapshot()));
    }

    printer.abort();
    controller.teardown();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parse_commands() {
        assert_eq!(
            "toggle rain".parse(),
            Ok(ShellCommand::Toggle("rain".to_owned()))
        );
        assert_eq!(" p  lake-water ".parse(), Ok(ShellCommand::Play("lake-water".to_owned())));
        assert_eq!("stop".parse(), Ok(ShellCommand::Stop));
        assert_eq!("v 0.25".parse(), Ok(ShellCommand::Volume(0.25)));
        assert_eq!("quit".parse(), Ok(ShellCommand::Quit));
        assert_eq!("".parse(), Ok(ShellCommand::Help));
    }

    #[test]
    fn reject_bad_input() {
        assert!("toggle".parse::<ShellCommand>().is_err());
        assert!("stop now".parse::<ShellCommand>().is_err());
        assert!("volume loud".parse::<ShellCommand>().is_err());
        assert!("volume 3".parse::<ShellCommand>().is_err());
        assert!("dance".parse::<ShellCommand>().is_err());
    }

    #[test]
    fn describe_snapshot() {
        let mut snapshot = PlaybackSnapshot::idle(0.5);
        assert_eq!(describe(&snapshot), "[idle, volume 50%]");

        snapshot.is_playing = true;
        snapshot.current_sound_id = Some("rain");
        assert_eq!(describe(&snapshot), "[playing rain, volume 50%]");
    }
}
