use serde::{Deserialize, Serialize};

use crate::state::spawner::spawn_period_ms;
use crate::state::tuning::Tuning;

const COST_GROWTH: f64 = 1.5;
const MULTIPLIER_GROWTH: f64 = 1.5;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct UpgradeTrack {
    pub level: u32,
    pub value: f64,
    pub upgrade_cost: f64,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct BumperUpgrade {
    pub level: u32,
    /// Base effect a newly bought bumper starts with.
    pub value: f64,
    /// Global scale applied to every placed bumper's effect.
    pub multiplier: f64,
    pub upgrade_cost: f64,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct Upgrades {
    pub base_income: UpgradeTrack,
    pub speed: UpgradeTrack,
    pub bumper: BumperUpgrade,
}

impl Default for Upgrades {
    fn default() -> Upgrades {
        Upgrades {
            base_income: UpgradeTrack {
                level: 1,
                value: 1.0,
                upgrade_cost: 50.0,
            },
            // value mirrors the current spawn period in ms; kept up to date
            // whenever the level changes
            speed: UpgradeTrack {
                level: 1,
                value: 3000.0,
                upgrade_cost: 250.0,
            },
            bumper: BumperUpgrade {
                level: 1,
                value: 10.0,
                multiplier: 1.0,
                upgrade_cost: 100.0,
            },
        }
    }
}

impl Upgrades {
    pub fn raise_base_income(&mut self) {
        self.base_income.level += 1;
        self.base_income.value *= 1.5;
        self.base_income.upgrade_cost *= COST_GROWTH;
    }

    pub fn raise_speed(&mut self, tuning: &Tuning) {
        self.speed.level += 1;
        self.speed.value = spawn_period_ms(tuning, self.speed.level);
        self.speed.upgrade_cost *= COST_GROWTH;
    }

    pub fn raise_bumper(&mut self) {
        self.bumper.level += 1;
        self.bumper.multiplier *= MULTIPLIER_GROWTH;
        self.bumper.upgrade_cost *= COST_GROWTH;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_costs_grow_on_every_purchase() {
        let mut upgrades = Upgrades::default();
        let first = upgrades.base_income.upgrade_cost;
        upgrades.raise_base_income();
        let second = upgrades.base_income.upgrade_cost;
        upgrades.raise_base_income();
        assert!(second > first);
        assert!(upgrades.base_income.upgrade_cost > second);
        assert_eq!(upgrades.base_income.level, 3);
    }

    #[test]
    fn test_speed_track_tracks_the_period() {
        let tuning = Tuning::default();
        let mut upgrades = Upgrades::default();
        upgrades.raise_speed(&tuning);
        assert_eq!(upgrades.speed.level, 2);
        assert_eq!(upgrades.speed.value, spawn_period_ms(&tuning, 2));
    }

    #[test]
    fn test_bumper_multiplier_compounds() {
        let mut upgrades = Upgrades::default();
        upgrades.raise_bumper();
        upgrades.raise_bumper();
        assert_eq!(upgrades.bumper.multiplier, 2.25);
    }
}
