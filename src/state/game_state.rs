use rand::Rng;

use crate::state::body::{BODY_RADIUS, Body, BodyUpdateResult};
use crate::state::bumper::{BumperField, BumperId};
use crate::state::common::AREA_W;
use crate::state::floating_text::FloatingText;
use crate::state::save::SaveData;
use crate::state::spawner::{Spawner, spawn_period_ms};
use crate::state::tuning::{TICKS_PER_SECOND, Tuning};
use crate::state::upgrades::Upgrades;

const SPAWN_VY: f32 = 2.0;
const SPAWN_VX_RANGE: f32 = 0.5;
// Horizontal spawn jitter as a fraction of the field width, around center
const SPAWN_CENTER_SPREAD: f32 = 0.05;

const NOTICE_TICKS: u32 = 4 * TICKS_PER_SECOND;
const MAX_NOTICES: usize = 4;

pub const BUMPER_BASE_COST: f64 = 100.0;
const BUMPER_COST_GROWTH: f64 = 2.0;

const NOT_ENOUGH_MONEY: &str = "Not enough money!";

pub struct Notice {
    pub text: String,
    pub ticks_left: u32,
}

/// Plain events handed back to the caller each tick so sound and other
/// outer-layer effects stay outside the simulation.
pub enum TickEvent {
    Collected { value: f64 },
    BumperHit { bumper: BumperId },
}

pub struct GameState {
    pub money: f64,
    pub bodies: Vec<Body>,
    pub field: BumperField,
    pub upgrades: Upgrades,
    pub spawner: Spawner,
    pub floating_texts: Vec<FloatingText>,
    pub notices: Vec<Notice>,
    pub tuning: Tuning,
    pub tick: u64,
    pub next_bumper_cost: f64,
}

impl GameState {
    pub fn new(tuning: Tuning) -> GameState {
        let mut upgrades = Upgrades::default();
        upgrades.speed.value = spawn_period_ms(&tuning, upgrades.speed.level);
        let spawner = Spawner::new(&tuning, upgrades.speed.level);

        GameState {
            money: 0.0,
            bodies: Vec::new(),
            field: BumperField::new(tuning.max_bumpers),
            upgrades,
            spawner,
            floating_texts: Vec::new(),
            notices: Vec::new(),
            tuning,
            tick: 0,
            next_bumper_cost: BUMPER_BASE_COST,
        }
    }

    /// One fixed simulation tick: spawn if due, step every body against the
    /// bumper snapshot, apply collections, age the cosmetic state.
    pub fn update(&mut self) -> Vec<TickEvent> {
        self.tick += 1;
        let mut events = Vec::new();

        if self.spawner.tick() {
            self.spawn_body();
        }

        // The snapshot is read once up front; placement mutations only ever
        // happen between ticks
        let bumpers = self.field.active();
        let mut collected: Vec<(f32, f32, f64)> = Vec::new();
        for body in &mut self.bodies {
            for result in body.update(self.tick, bumpers, &self.tuning) {
                match result {
                    BodyUpdateResult::BumperHit { bumper, .. } => {
                        events.push(TickEvent::BumperHit { bumper });
                    }
                    BodyUpdateResult::Collected { value } => {
                        collected.push((body.x, body.y, value));
                    }
                }
            }
        }
        self.bodies.retain(|b| b.active);

        for (x, y, value) in collected {
            self.credit(value);
            self.floating_texts
                .push(FloatingText::new(x, y, format!("+${:.2}", value)));
            events.push(TickEvent::Collected { value });
        }

        for text in &mut self.floating_texts {
            text.update();
        }
        self.floating_texts.retain(|t| !t.expired());

        for notice in &mut self.notices {
            notice.ticks_left = notice.ticks_left.saturating_sub(1);
        }
        self.notices.retain(|n| n.ticks_left > 0);

        events
    }

    fn spawn_body(&mut self) {
        let mut rng = rand::rng();
        let spread = AREA_W * SPAWN_CENTER_SPREAD;
        let x = (AREA_W * 0.5 + rng.random_range(-spread..spread))
            .clamp(BODY_RADIUS, AREA_W - BODY_RADIUS);
        let vx = rng.random_range(-SPAWN_VX_RANGE..SPAWN_VX_RANGE);
        self.bodies
            .push(Body::new(x, vx, SPAWN_VY, self.upgrades.base_income.value));
    }

    /// The only way money enters or leaves through the simulation. The
    /// balance never goes negative.
    pub fn credit(&mut self, amount: f64) {
        self.money = (self.money + amount).max(0.0);
    }

    /// Clicking the empty play area earns base income, scaled by the bumper
    /// multiplier.
    pub fn click_income(&mut self, x: f32, y: f32) {
        let earned = self.upgrades.base_income.value * self.upgrades.bumper.multiplier;
        self.credit(earned);
        self.floating_texts
            .push(FloatingText::new(x, y, format!("+${:.2}", earned)));
    }

    pub fn push_notice(&mut self, text: &str) {
        if self.notices.len() >= MAX_NOTICES {
            self.notices.remove(0);
        }
        self.notices.push(Notice {
            text: text.to_string(),
            ticks_left: NOTICE_TICKS,
        });
    }

    fn try_spend(&mut self, cost: f64) -> bool {
        if self.money < cost {
            self.push_notice(NOT_ENOUGH_MONEY);
            return false;
        }
        self.money -= cost;
        true
    }

    pub fn try_upgrade_base_income(&mut self) -> bool {
        if !self.try_spend(self.upgrades.base_income.upgrade_cost) {
            return false;
        }
        self.upgrades.raise_base_income();
        true
    }

    pub fn try_upgrade_speed(&mut self) -> bool {
        if !self.try_spend(self.upgrades.speed.upgrade_cost) {
            return false;
        }
        self.upgrades.raise_speed(&self.tuning);
        self.spawner.set_rate(&self.tuning, self.upgrades.speed.level);
        true
    }

    pub fn try_upgrade_bumper(&mut self) -> bool {
        if !self.try_spend(self.upgrades.bumper.upgrade_cost) {
            return false;
        }
        self.upgrades.raise_bumper();
        self.field.set_multiplier(self.upgrades.bumper.multiplier);
        true
    }

    /// Buy a new level-1 bumper; it goes straight to the field when a slot
    /// is free, otherwise to the inventory.
    pub fn try_buy_bumper(&mut self) -> bool {
        if !self.try_spend(self.next_bumper_cost) {
            return false;
        }
        self.next_bumper_cost *= BUMPER_COST_GROWTH;
        let id = self.field.add_bumper(1, self.upgrades.bumper.value);
        if let Some(slot) = self.field.first_free_slot() {
            // A fresh bumper cannot fail to place into a free slot
            let _ = self.field.place(id, slot);
        }
        true
    }

    pub fn apply_save(&mut self, save: SaveData) {
        self.money = save.money.max(0.0);
        self.upgrades.base_income = save.base_income;
        self.upgrades.speed = save.speed;
        self.upgrades.bumper = save.bumper;
        self.spawner.set_rate(&self.tuning, self.upgrades.speed.level);
        self.field.set_multiplier(self.upgrades.bumper.multiplier);

        for saved in save.bumpers {
            self.field.restore(saved.level, saved.effect, saved.slot);
        }
        let owned = self.field.all().count() as i32;
        self.next_bumper_cost = BUMPER_BASE_COST * BUMPER_COST_GROWTH.powi(owned);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::common::AREA_H;

    fn state() -> GameState {
        GameState::new(Tuning::default())
    }

    fn body_about_to_collect(state: &GameState, value: f64) -> Body {
        let mut body = Body::new(50.0, 0.0, 5.0, value);
        body.y = AREA_H - state.tuning.collection_band_height - body.radius + 1.0;
        body
    }

    #[test]
    fn test_collection_credits_exactly_once() {
        let mut state = state();
        state.money = 100.0;
        state.bodies.push(body_about_to_collect(&state, 15.0));

        let events = state.update();
        assert_eq!(state.money, 115.0);
        assert!(state.bodies.is_empty());
        assert_eq!(
            events
                .iter()
                .filter(|e| matches!(e, TickEvent::Collected { .. }))
                .count(),
            1
        );

        // No double credit on later ticks
        state.update();
        assert_eq!(state.money, 115.0);
    }

    #[test]
    fn test_collection_raises_floating_text() {
        let mut state = state();
        state.bodies.push(body_about_to_collect(&state, 3.0));
        state.update();
        assert_eq!(state.floating_texts.len(), 1);
        assert!(state.floating_texts[0].text.contains("3.00"));
    }

    #[test]
    fn test_credit_clamps_at_zero() {
        let mut state = state();
        state.money = 10.0;
        state.credit(-50.0);
        assert_eq!(state.money, 0.0);
    }

    #[test]
    fn test_spawner_drops_bodies_at_base_income_value() {
        let mut state = state();
        let period = state.spawner.period_ticks();
        for _ in 0..period {
            state.update();
        }
        assert_eq!(state.bodies.len(), 1);
        assert_eq!(state.bodies[0].value, state.upgrades.base_income.value);
    }

    #[test]
    fn test_upgrade_refused_when_poor() {
        let mut state = state();
        let before = state.upgrades;
        assert!(!state.try_upgrade_base_income());
        assert_eq!(state.upgrades, before);
        assert_eq!(state.money, 0.0);
        assert!(!state.notices.is_empty());
    }

    #[test]
    fn test_upgrade_purchase_deducts_and_levels() {
        let mut state = state();
        state.money = 1000.0;
        let cost = state.upgrades.base_income.upgrade_cost;
        assert!(state.try_upgrade_base_income());
        assert_eq!(state.money, 1000.0 - cost);
        assert_eq!(state.upgrades.base_income.level, 2);
        assert!(state.upgrades.base_income.upgrade_cost > cost);
    }

    #[test]
    fn test_speed_upgrade_retunes_the_spawner() {
        let mut state = state();
        state.money = 10_000.0;
        let before = state.spawner.period_ticks();
        assert!(state.try_upgrade_speed());
        assert!(state.spawner.period_ticks() < before);
    }

    #[test]
    fn test_bumper_upgrade_rescales_placed_effects() {
        let mut state = state();
        state.money = 10_000.0;
        assert!(state.try_buy_bumper());
        let base_effect = state.field.active()[0].effect_value;
        assert!(state.try_upgrade_bumper());
        assert_eq!(
            state.field.active()[0].effect_value,
            base_effect * state.upgrades.bumper.multiplier
        );
    }

    #[test]
    fn test_buying_bumpers_fills_slots_then_inventory() {
        let mut state = state();
        state.money = f64::MAX;
        for _ in 0..state.tuning.max_bumpers + 1 {
            assert!(state.try_buy_bumper());
        }
        assert_eq!(state.field.active().len(), state.tuning.max_bumpers);
        assert_eq!(state.field.inventory().count(), 1);
    }

    #[test]
    fn test_click_income_scales_with_multiplier() {
        let mut state = state();
        state.upgrades.bumper.multiplier = 2.0;
        state.click_income(100.0, 100.0);
        assert_eq!(state.money, state.upgrades.base_income.value * 2.0);
    }
}
