use serde::{Deserialize, Serialize};
use std::{fs, io, path::Path};

use crate::state::game_state::GameState;
use crate::state::tuning::TICKS_PER_SECOND;
use crate::state::upgrades::{BumperUpgrade, UpgradeTrack};

pub const SAVE_FILE: &str = "cashfall_save.json";
pub const AUTOSAVE_PERIOD_TICKS: u64 = 30 * TICKS_PER_SECOND as u64;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct SavedBumper {
    pub level: u32,
    pub effect: String,
    pub slot: Option<usize>,
}

/// The durable game state blob. A missing file on startup simply means a
/// fresh game; everything in here has defaults.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct SaveData {
    pub money: f64,
    pub base_income: UpgradeTrack,
    pub speed: UpgradeTrack,
    pub bumper: BumperUpgrade,
    #[serde(default)]
    pub bumpers: Vec<SavedBumper>,
}

impl SaveData {
    pub fn from_state(state: &GameState) -> SaveData {
        SaveData {
            money: state.money,
            base_income: state.upgrades.base_income,
            speed: state.upgrades.speed,
            bumper: state.upgrades.bumper,
            bumpers: state
                .field
                .all()
                .map(|b| SavedBumper {
                    level: b.level,
                    effect: b.effect.clone(),
                    slot: b.slot,
                })
                .collect(),
        }
    }

    pub fn save_json(&self, path: impl AsRef<Path>) -> io::Result<()> {
        let s = serde_json::to_string_pretty(self)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        fs::write(path, s)
    }

    pub fn load_json(path: impl AsRef<Path>) -> io::Result<SaveData> {
        let s = fs::read_to_string(path)?;
        let save =
            serde_json::from_str(&s).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        Ok(save)
    }
}
