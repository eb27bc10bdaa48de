use ambient_core::{
    load_volume, AmbientSoundController, Catalog, JsonFileStore, PreferenceStore, VOLUME_KEY,
};
use color_eyre::eyre::{bail, eyre, Result};
use serde_json::json;
use tracing::info;

use crate::{
    backend::KiraEngine, cli::Command, init::log_path, settings::Settings, shell, utils::percent,
};

pub type Controller = AmbientSoundController<KiraEngine, JsonFileStore>;

pub async fn run(command: Command, settings: Settings) -> Result<()> {
    info!("{command:?} with {settings:?}");
    match command {
        Command::List { json } => list(json),
        Command::Volume { level } => volume(&settings, level),
        Command::Play { id, volume } => {
            let controller = controller(&settings)?;
            if let Some(level) = volume {
                check_level(level)?;
                controller.set_volume(level);
            }
            play(&controller, &id).await
        }
        Command::Shell => shell::run(controller(&settings)?).await,
    }
}

fn controller(settings: &Settings) -> Result<Controller> {
    let engine = KiraEngine::new(&settings.asset_root)?;
    let store = JsonFileStore::new(&settings.preferences);
    Ok(AmbientSoundController::new(engine, store))
}

fn check_level(level: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&level) {
        bail!("volume must be between 0.0 and 1.0, got {level}");
    }
    Ok(())
}

fn list(as_json: bool) -> Result<()> {
    let catalog = Catalog::default();
    if as_json {
        let value = json!({
            "categories": catalog.categories(),
            "sounds": catalog.sounds(),
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    for category in catalog.categories() {
        println!("{} {}", category.icon, category.name);
        for sound in catalog.sounds_in(category.id) {
            println!(
                "  {:<22} {} {:<18} {}",
                sound.id, sound.icon, sound.name, sound.description
            );
        }
    }
    Ok(())
}

fn volume(settings: &Settings, level: Option<f64>) -> Result<()> {
    let store = JsonFileStore::new(&settings.preferences);
    match level {
        Some(level) => {
            check_level(level)?;
            store
                .set(VOLUME_KEY, &level.to_string())
                .map_err(|e| eyre!(e))?;
            println!("Volume set to {}", percent(level));
        }
        None => println!("Volume: {}", percent(load_volume(&store))),
    }
    Ok(())
}

async fn play(controller: &Controller, id: &str) -> Result<()> {
    controller.play_id(id).await?;

    let Some(sound) = controller.current_sound() else {
        bail!(
            "could not play {id}, see the log at {:?}",
            log_path().unwrap_or_default()
        );
    };
    println!(
        "{} {} at {} (Ctrl-C to stop)",
        sound.icon,
        sound.name,
        percent(controller.volume())
    );

    tokio::signal::ctrl_c().await?;
    controller.teardown();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_outside_unit_range_are_rejected() {
        assert!(check_level(0.0).is_ok());
        assert!(check_level(1.0).is_ok());
        assert!(check_level(1.01).is_err());
        assert!(check_level(f64::NAN).is_err());
    }

    #[test]
    fn volume_command_persists() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings {
            asset_root: dir.path().to_path_buf(),
            preferences: dir.path().join("preferences.json"),
        };

        volume(&settings, Some(0.73)).unwrap();
        let store = JsonFileStore::new(&settings.preferences);
        assert_eq!(load_volume(&store), 0.73);

        assert!(volume(&settings, Some(2.0)).is_err());
        assert_eq!(load_volume(&store), 0.73);
    }
}
