#[cfg(feature = "serde")]
use serde::Serialize;

/// A grouping label for sounds. Carries no behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct SoundCategory {
    pub id: &'static str,
    pub name: &'static str,
    pub icon: &'static str,
}

/// A playable ambient sound known at build time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct SoundDescriptor {
    /// Unique key across the catalog.
    pub id: &'static str,
    pub name: &'static str,
    pub icon: &'static str,
    /// Asset locator, resolved by the audio engine.
    pub source: &'static str,
    pub description: &'static str,
    /// Id of the owning [`SoundCategory`].
    pub category_id: &'static str,
}

macro_rules! sound {
    ($id:literal, $name:literal, $icon:literal, $file:literal, $desc:literal, $cat:literal) => {
        SoundDescriptor {
            id: $id,
            name: $name,
            icon: $icon,
            source: concat!("/sounds/ambients/", $file),
            description: $desc,
            category_id: $cat,
        }
    };
}

pub static SOUND_CATEGORIES: [SoundCategory; 3] = [
    SoundCategory {
        id: "nature",
        name: "Nature",
        icon: "🌿",
    },
    SoundCategory {
        id: "water",
        name: "Water",
        icon: "💧",
    },
    SoundCategory {
        id: "weather",
        name: "Weather",
        icon: "🌤️",
    },
];

pub static AMBIENT_SOUNDS: [SoundDescriptor; 15] = [
    // nature
    sound!("bird-sound-4", "Tropical Aviary", "🐦", "bird_sound4.mp3", "Exotic tropical bird calls", "nature"),
    sound!("bird-sound-exclusive", "Meadow Songbirds", "🦜", "bird_sound_exclusive.mp3", "Unique meadow bird recordings", "nature"),
    sound!("bird-sound-1", "Garden Birds", "🐤", "bird_sound.mp3", "Peaceful garden bird songs", "nature"),
    sound!("bird-sound-2", "Forest Symphony", "🌲", "bird_sound2.mp3", "Deep forest bird ambience", "nature"),
    sound!("bird-sound-3", "Dawn Chorus", "🌅", "bird_sound3.mp3", "Early morning bird chorus", "nature"),
    sound!("cricket-sounds", "Evening Crickets", "🦗", "crisket_sounds.mp3", "Peaceful cricket symphony", "nature"),
    // water
    sound!("lake-water", "Calm Lake", "💧", "lake_water_sound.mp3", "Gentle lapping lake waters", "water"),
    sound!("lake-with-bird-ultra", "Mountain Lake", "🪿", "lake_with_bird_ultra_good.mp3", "Crystal clear mountain lake", "water"),
    sound!("lake-with-bird", "Lakeside Retreat", "🦆", "lake_with_bird.mp3", "Serene lake with distant birds", "water"),
    sound!("waterfall-droplet", "Cascade Drops", "💦", "waterfall_droplet.mp3", "Rhythmic water droplets", "water"),
    sound!("waterfall-sound", "Mountain Falls", "🌊", "waterfall_sound.mp3", "Majestic waterfall ambience", "water"),
    sound!("waterfall-with-birds", "Forest Cascade", "🦜", "waterfall_with_birds.mp3", "Waterfall with bird songs", "water"),
    sound!("waterfall", "Alpine Waterfall", "🏞️", "waterfall.mp3", "Powerful alpine waterfall", "water"),
    sound!("waterfall-2", "Tropical Falls", "🏞️", "waterfall2.mp3", "Lush tropical waterfall", "water"),
    // weather
    sound!("rain", "Gentle Rain", "🌧️", "rain.mp3", "Soft rainfall for concentration", "weather"),
];

/// An ordered set of sounds grouped under ordered categories.
///
/// The default catalog is the compiled-in one; tests and embedders can build
/// their own from any `'static` slices.
#[derive(Debug, Clone, Copy)]
pub struct Catalog {
    categories: &'static [SoundCategory],
    sounds: &'static [SoundDescriptor],
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new(&SOUND_CATEGORIES, &AMBIENT_SOUNDS)
    }
}

impl Catalog {
    pub const fn new(
        categories: &'static [SoundCategory],
        sounds: &'static [SoundDescriptor],
    ) -> Self {
        Self { categories, sounds }
    }

    pub fn sounds(&self) -> &'static [SoundDescriptor] {
        self.sounds
    }

    pub fn categories(&self) -> &'static [SoundCategory] {
        self.categories
    }

    pub fn find(&self, id: &str) -> Option<&'static SoundDescriptor> {
        self.sounds.iter().find(|sound| sound.id == id)
    }

    pub fn category(&self, id: &str) -> Option<&'static SoundCategory> {
        self.categories.iter().find(|category| category.id == id)
    }

    /// Sounds belonging to `category_id`, in catalog order.
    pub fn sounds_in<'a>(
        &self,
        category_id: &'a str,
    ) -> impl Iterator<Item = &'static SoundDescriptor> + 'a {
        self.sounds
            .iter()
            .filter(move |sound| sound.category_id == category_id)
    }
}
