use crate::state::tuning::{TICKS_PER_SECOND, Tuning};

const RATE_INCREMENT_PER_LEVEL: f64 = 0.25;
const MIN_SPAWN_PERIOD_MS: f64 = 250.0;

/// Current drop period in milliseconds for a speed upgrade level.
pub fn spawn_period_ms(tuning: &Tuning, speed_level: u32) -> f64 {
    let level = speed_level.max(1);
    let period =
        tuning.base_spawn_period_ms as f64 / (1.0 + (level - 1) as f64 * RATE_INCREMENT_PER_LEVEL);
    period.max(MIN_SPAWN_PERIOD_MS)
}

fn compute_period_ticks(tuning: &Tuning, speed_level: u32) -> u64 {
    let ticks = spawn_period_ms(tuning, speed_level) * TICKS_PER_SECOND as f64 / 1000.0;
    ticks.round().max(1.0) as u64
}

/// Countdown that decides when the next body drops. There is exactly one
/// countdown: changing the rate replaces it outright, so a speed purchase
/// can never leave two overlapping spawn schedules running.
pub struct Spawner {
    period_ticks: u64,
    ticks_until_spawn: u64,
}

impl Spawner {
    pub fn new(tuning: &Tuning, speed_level: u32) -> Spawner {
        let period = compute_period_ticks(tuning, speed_level);
        Spawner {
            period_ticks: period,
            ticks_until_spawn: period,
        }
    }

    pub fn set_rate(&mut self, tuning: &Tuning, speed_level: u32) {
        self.period_ticks = compute_period_ticks(tuning, speed_level);
        self.ticks_until_spawn = self.period_ticks;
    }

    pub fn period_ticks(&self) -> u64 {
        self.period_ticks
    }

    /// Advance one tick; true means a body is due now.
    pub fn tick(&mut self) -> bool {
        if self.ticks_until_spawn > 1 {
            self.ticks_until_spawn -= 1;
            return false;
        }
        self.ticks_until_spawn = self.period_ticks;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ticks_to_next_spawn(spawner: &mut Spawner) -> u64 {
        let mut count = 0;
        loop {
            count += 1;
            if spawner.tick() {
                return count;
            }
            assert!(count < 100_000, "spawner never fired");
        }
    }

    #[test]
    fn test_spawns_once_per_period() {
        let tuning = Tuning::default();
        let mut spawner = Spawner::new(&tuning, 1);
        // 3000 ms at 60 Hz
        assert_eq!(spawner.period_ticks(), 180);
        assert_eq!(ticks_to_next_spawn(&mut spawner), 180);
        assert_eq!(ticks_to_next_spawn(&mut spawner), 180);
    }

    #[test]
    fn test_higher_level_spawns_faster() {
        let tuning = Tuning::default();
        assert!(spawn_period_ms(&tuning, 5) < spawn_period_ms(&tuning, 1));
        // And the period bottoms out instead of hitting zero
        assert_eq!(spawn_period_ms(&tuning, 10_000), MIN_SPAWN_PERIOD_MS);
    }

    #[test]
    fn test_rate_change_replaces_the_schedule() {
        let tuning = Tuning::default();
        let mut spawner = Spawner::new(&tuning, 1);
        for _ in 0..50 {
            spawner.tick();
        }

        spawner.set_rate(&tuning, 3);
        let period = spawner.period_ticks();
        assert!(period < 180);
        // Full fresh countdown after the change, and only one schedule
        assert_eq!(ticks_to_next_spawn(&mut spawner), period);
        assert_eq!(ticks_to_next_spawn(&mut spawner), period);
    }
}
