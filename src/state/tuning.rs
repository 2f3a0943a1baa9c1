use serde::{Deserialize, Serialize};
use std::{fs, io, path::Path};

// One GameState::update() call is one simulation tick at this reference
// rate. Millisecond-denominated tuning values convert through it.
pub const TICKS_PER_SECOND: u32 = 60;

/// Recognized simulation tuning knobs. Defaults match the shipped game;
/// an optional `assets/tuning.json` can override any subset of them.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
#[serde(default)]
pub struct Tuning {
    pub gravity: f32,
    pub friction_factor: f32,
    pub bounce_factor: f32,
    pub bounce_boost: f32,
    pub min_bounce_velocity: f32,
    pub fast_motion_threshold: f32,
    pub collision_cooldown_ms: u32,
    pub collection_band_height: f32,
    pub max_bumpers: usize,
    pub base_spawn_period_ms: u32,
}

impl Default for Tuning {
    fn default() -> Tuning {
        Tuning {
            gravity: 0.5,
            friction_factor: 0.99,
            bounce_factor: 0.85,
            bounce_boost: 1.2,
            min_bounce_velocity: 3.0,
            fast_motion_threshold: 5.0,
            collision_cooldown_ms: 500,
            collection_band_height: 30.0,
            max_bumpers: 8,
            base_spawn_period_ms: 3000,
        }
    }
}

impl Tuning {
    pub fn load_json(path: impl AsRef<Path>) -> io::Result<Tuning> {
        let s = fs::read_to_string(path)?;
        let tuning =
            serde_json::from_str(&s).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        Ok(tuning)
    }

    pub fn load_or_default(path: impl AsRef<Path>) -> Tuning {
        if !path.as_ref().exists() {
            return Tuning::default();
        }
        match Tuning::load_json(&path) {
            Ok(tuning) => tuning,
            Err(err) => {
                eprintln!(
                    "Failed to read tuning file '{}': {}",
                    path.as_ref().display(),
                    err
                );
                Tuning::default()
            }
        }
    }

    pub fn cooldown_ticks(&self) -> u64 {
        (self.collision_cooldown_ms as u64 * TICKS_PER_SECOND as u64).div_ceil(1000)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let tuning = Tuning::load_or_default("no/such/tuning.json");
        assert_eq!(tuning, Tuning::default());
    }

    #[test]
    fn test_cooldown_converts_to_ticks() {
        let tuning = Tuning::default();
        assert_eq!(tuning.cooldown_ticks(), 30);

        let fast = Tuning {
            collision_cooldown_ms: 100,
            ..Tuning::default()
        };
        assert_eq!(fast.cooldown_ticks(), 6);
    }

    #[test]
    fn test_partial_override_keeps_other_defaults() {
        let tuning: Tuning = serde_json::from_str(r#"{ "gravity": 1.25 }"#).unwrap();
        assert_eq!(tuning.gravity, 1.25);
        assert_eq!(tuning.max_bumpers, Tuning::default().max_bumpers);
    }
}
