use egui::ahash::HashMap;
use quad_snd::{AudioContext, PlaySoundParams, Sound as SndSound};
use std::fs;

macro_rules! define_sounds {
    ($($variant:ident => $file:literal),+ $(,)?) => {
        #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
        pub enum Sound {
            $($variant),+
        }

        impl Sound {
            pub const ALL: &'static [Sound] = &[
                $(Sound::$variant),+
            ];

            pub const fn file_name(self) -> &'static str {
                match self {
                    $(Sound::$variant => $file),+
                }
            }
        }
    };
}

define_sounds! {
    Collect => "collect.wav",
    Bounce  => "bounce.wav",
    Buy     => "buy.wav",
    Reject  => "reject.wav",
}

fn load_sound(path: &str) -> std::io::Result<Vec<u8>> {
    fs::read(path)
}

pub struct SoundHandler {
    sounds: HashMap<Sound, SndSound>,
    audio_context: AudioContext,
}

impl SoundHandler {
    pub fn new() -> Self {
        let mut sounds: HashMap<Sound, SndSound> = HashMap::default();

        let audio_context = AudioContext::new();

        // Missing sound files just mean silence
        for sound in Sound::ALL {
            let file_name = sound.file_name();
            let full_path = format!("assets/sounds/{}", file_name);
            if let Ok(bytes) = load_sound(&full_path) {
                let loaded = SndSound::load(&audio_context, &bytes);
                sounds.insert(*sound, loaded);
            }
        }

        SoundHandler {
            sounds,
            audio_context,
        }
    }

    pub fn play(&self, sound: Sound) {
        let sound = self.sounds.get(&sound);
        if let Some(sound) = sound {
            sound.play(&self.audio_context, PlaySoundParams::default());
        }
    }
}
