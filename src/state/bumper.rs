use crate::state::common::{AREA_H, AREA_W, Pos};

pub type BumperId = u32;

pub const BUMPER_RADIUS: f32 = 22.0;
const SLOT_ROWS: usize = 2;

pub fn radius_for_level(level: u32) -> f32 {
    BUMPER_RADIUS + 2.0 * level.saturating_sub(1) as f32
}

/// Numeric part of an effect string like "+20" or "+12.5". Returns None for
/// anything that does not parse; callers decide what zero effect means.
pub fn parse_effect(effect: &str) -> Option<f64> {
    let trimmed = effect.trim();
    let digits = trimmed.strip_prefix('+').unwrap_or(trimmed);
    digits.parse::<f64>().ok().filter(|v| v.is_finite())
}

pub struct Bumper {
    pub id: BumperId,
    pub level: u32,
    pub effect: String,
    /// None while the bumper sits in the inventory; stored bumpers have no
    /// geometry and never appear in the active snapshot.
    pub slot: Option<usize>,
}

/// One entry of the cached snapshot the simulation collides against.
#[derive(Clone, Copy, Debug)]
pub struct ActiveBumper {
    pub id: BumperId,
    pub center: Pos,
    pub radius: f32,
    pub effect_value: f64,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum PlacementError {
    NoSuchBumper,
    SlotOutOfRange,
    SlotOccupied,
    NotInInventory,
    LevelMismatch,
}

impl PlacementError {
    pub fn message(&self) -> &'static str {
        match self {
            PlacementError::NoSuchBumper => "That bumper no longer exists",
            PlacementError::SlotOutOfRange => "No such slot",
            PlacementError::SlotOccupied => "That slot is already taken",
            PlacementError::NotInInventory => "That bumper is not in the inventory",
            PlacementError::LevelMismatch => "Only equal-level bumpers can be combined",
        }
    }
}

pub struct BumperField {
    bumpers: Vec<Bumper>,
    active: Vec<ActiveBumper>,
    next_id: BumperId,
    multiplier: f64,
    slot_count: usize,
}

impl BumperField {
    pub fn new(slot_count: usize) -> BumperField {
        BumperField {
            bumpers: Vec::new(),
            active: Vec::new(),
            next_id: 1,
            multiplier: 1.0,
            slot_count,
        }
    }

    pub fn slot_count(&self) -> usize {
        self.slot_count
    }

    /// Slot positions form two rows across the upper half of the play area.
    pub fn slot_center(&self, slot: usize) -> Pos {
        let cols = self.slot_count.div_ceil(SLOT_ROWS).max(1);
        let col = slot % cols;
        let row = slot / cols;
        Pos::new(
            AREA_W * (col as f32 + 1.0) / (cols as f32 + 1.0),
            AREA_H * (0.30 + 0.20 * row as f32),
        )
    }

    pub fn is_slot_free(&self, slot: usize) -> bool {
        !self.bumpers.iter().any(|b| b.slot == Some(slot))
    }

    pub fn first_free_slot(&self) -> Option<usize> {
        (0..self.slot_count).find(|&slot| self.is_slot_free(slot))
    }

    pub fn bumper(&self, id: BumperId) -> Option<&Bumper> {
        self.bumpers.iter().find(|b| b.id == id)
    }

    fn bumper_mut(&mut self, id: BumperId) -> Result<&mut Bumper, PlacementError> {
        self.bumpers
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or(PlacementError::NoSuchBumper)
    }

    pub fn all(&self) -> impl Iterator<Item = &Bumper> {
        self.bumpers.iter()
    }

    pub fn placed(&self) -> impl Iterator<Item = &Bumper> {
        self.bumpers.iter().filter(|b| b.slot.is_some())
    }

    pub fn inventory(&self) -> impl Iterator<Item = &Bumper> {
        self.bumpers.iter().filter(|b| b.slot.is_none())
    }

    /// A freshly bought bumper lands in the inventory. Its effect string is
    /// derived from the base effect at purchase time.
    pub fn add_bumper(&mut self, level: u32, base_effect: f64) -> BumperId {
        let level = level.max(1);
        let id = self.next_id;
        self.next_id += 1;
        self.bumpers.push(Bumper {
            id,
            level,
            effect: format!("+{}", base_effect * level as f64),
            slot: None,
        });
        self.rebuild_active();
        id
    }

    /// Re-create a bumper from save data. Slots that are gone or already
    /// taken (stale saves) fall back to the inventory.
    pub fn restore(&mut self, level: u32, effect: String, slot: Option<usize>) -> BumperId {
        let slot = slot.filter(|&s| s < self.slot_count && self.is_slot_free(s));
        let id = self.next_id;
        self.next_id += 1;
        self.bumpers.push(Bumper {
            id,
            level: level.max(1),
            effect,
            slot,
        });
        self.rebuild_active();
        id
    }

    pub fn place(&mut self, id: BumperId, slot: usize) -> Result<(), PlacementError> {
        if slot >= self.slot_count {
            return Err(PlacementError::SlotOutOfRange);
        }
        if !self.is_slot_free(slot) {
            return Err(PlacementError::SlotOccupied);
        }
        let bumper = self.bumper_mut(id)?;
        if bumper.slot.is_some() {
            return Err(PlacementError::NotInInventory);
        }
        bumper.slot = Some(slot);
        self.rebuild_active();
        Ok(())
    }

    pub fn store(&mut self, id: BumperId) -> Result<(), PlacementError> {
        let bumper = self.bumper_mut(id)?;
        bumper.slot = None;
        self.rebuild_active();
        Ok(())
    }

    pub fn move_bumper(&mut self, id: BumperId, new_slot: usize) -> Result<(), PlacementError> {
        if new_slot >= self.slot_count {
            return Err(PlacementError::SlotOutOfRange);
        }
        let current = self.bumper(id).ok_or(PlacementError::NoSuchBumper)?.slot;
        if current == Some(new_slot) {
            return Ok(());
        }
        if !self.is_slot_free(new_slot) {
            return Err(PlacementError::SlotOccupied);
        }
        let bumper = self.bumper_mut(id)?;
        bumper.slot = Some(new_slot);
        self.rebuild_active();
        Ok(())
    }

    /// Merge two equal-level inventory bumpers into one of the next level.
    /// The new effect is the sum of the inputs' effects.
    pub fn combine(&mut self, a: BumperId, b: BumperId) -> Result<BumperId, PlacementError> {
        if a == b {
            return Err(PlacementError::NoSuchBumper);
        }
        let (level_a, effect_a) = self.combine_input(a)?;
        let (level_b, effect_b) = self.combine_input(b)?;
        if level_a != level_b {
            return Err(PlacementError::LevelMismatch);
        }

        self.bumpers.retain(|x| x.id != a && x.id != b);
        let id = self.next_id;
        self.next_id += 1;
        self.bumpers.push(Bumper {
            id,
            level: level_a + 1,
            effect: format!("+{}", effect_a + effect_b),
            slot: None,
        });
        self.rebuild_active();
        Ok(id)
    }

    fn combine_input(&self, id: BumperId) -> Result<(u32, f64), PlacementError> {
        let bumper = self.bumper(id).ok_or(PlacementError::NoSuchBumper)?;
        if bumper.slot.is_some() {
            return Err(PlacementError::NotInInventory);
        }
        Ok((bumper.level, parse_effect(&bumper.effect).unwrap_or(0.0)))
    }

    /// Global effect multiplier from the bumper upgrade track.
    pub fn set_multiplier(&mut self, multiplier: f64) {
        self.multiplier = multiplier;
        self.rebuild_active();
    }

    /// The snapshot the simulation reads each tick.
    pub fn active(&self) -> &[ActiveBumper] {
        &self.active
    }

    /// Placed bumper whose circle contains `pos`, for drag picking.
    pub fn placed_at(&self, pos: Pos) -> Option<(BumperId, usize)> {
        for bumper in &self.bumpers {
            let Some(slot) = bumper.slot else { continue };
            if self.slot_center(slot).distance_to(&pos) <= radius_for_level(bumper.level) {
                return Some((bumper.id, slot));
            }
        }
        None
    }

    /// Slot whose center is nearest to `pos`, if within snapping distance.
    pub fn nearest_slot(&self, pos: Pos) -> Option<usize> {
        const SNAP_DISTANCE: f32 = 48.0;
        (0..self.slot_count)
            .map(|slot| (slot, self.slot_center(slot).distance_to(&pos)))
            .filter(|&(_, dist)| dist <= SNAP_DISTANCE)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(slot, _)| slot)
    }

    // Every mutation rebuilds the whole snapshot. Incremental patching is
    // deliberately not offered: stale cached geometry causes missed or
    // phantom collisions.
    fn rebuild_active(&mut self) {
        let mut active = Vec::new();
        for bumper in &self.bumpers {
            let Some(slot) = bumper.slot else { continue };
            let effect = match parse_effect(&bumper.effect) {
                Some(value) => value,
                None => {
                    eprintln!(
                        "Unparsable effect '{}' on bumper {}; treating as zero",
                        bumper.effect, bumper.id
                    );
                    0.0
                }
            };
            active.push(ActiveBumper {
                id: bumper.id,
                center: self.slot_center(slot),
                radius: radius_for_level(bumper.level),
                effect_value: effect * self.multiplier,
            });
        }
        self.active = active;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field_with_inventory(levels: &[u32]) -> (BumperField, Vec<BumperId>) {
        let mut field = BumperField::new(8);
        let ids = levels
            .iter()
            .map(|&level| field.add_bumper(level, 10.0))
            .collect();
        (field, ids)
    }

    #[test]
    fn test_combine_equal_levels() {
        let (mut field, ids) = field_with_inventory(&[2, 2]);
        let merged = field.combine(ids[0], ids[1]).unwrap();

        assert_eq!(field.all().count(), 1);
        let bumper = field.bumper(merged).unwrap();
        assert_eq!(bumper.level, 3);
        // "+20" + "+20"
        assert_eq!(parse_effect(&bumper.effect), Some(40.0));
        assert!(field.bumper(ids[0]).is_none());
        assert!(field.bumper(ids[1]).is_none());
    }

    #[test]
    fn test_combine_mismatched_levels_rejected() {
        let (mut field, ids) = field_with_inventory(&[1, 2]);
        assert_eq!(
            field.combine(ids[0], ids[1]),
            Err(PlacementError::LevelMismatch)
        );
        // Both inputs untouched
        assert_eq!(field.all().count(), 2);
        assert_eq!(field.bumper(ids[0]).unwrap().level, 1);
        assert_eq!(field.bumper(ids[1]).unwrap().level, 2);
    }

    #[test]
    fn test_combine_requires_inventory() {
        let (mut field, ids) = field_with_inventory(&[1, 1]);
        field.place(ids[0], 0).unwrap();
        assert_eq!(
            field.combine(ids[0], ids[1]),
            Err(PlacementError::NotInInventory)
        );
        assert_eq!(field.all().count(), 2);
    }

    #[test]
    fn test_place_occupied_slot_rejected() {
        let (mut field, ids) = field_with_inventory(&[1, 1]);
        field.place(ids[0], 0).unwrap();
        assert_eq!(field.place(ids[1], 0), Err(PlacementError::SlotOccupied));
        assert!(field.bumper(ids[1]).unwrap().slot.is_none());
    }

    #[test]
    fn test_place_out_of_range_rejected() {
        let (mut field, ids) = field_with_inventory(&[1]);
        assert_eq!(field.place(ids[0], 8), Err(PlacementError::SlotOutOfRange));
    }

    #[test]
    fn test_mutations_rebuild_snapshot() {
        let (mut field, ids) = field_with_inventory(&[1]);
        assert!(field.active().is_empty());

        field.place(ids[0], 0).unwrap();
        assert_eq!(field.active().len(), 1);
        let before = field.active()[0].center;

        field.move_bumper(ids[0], 3).unwrap();
        let after = field.active()[0].center;
        assert_ne!(before, after);
        assert_eq!(after, field.slot_center(3));

        field.store(ids[0]).unwrap();
        assert!(field.active().is_empty());
    }

    #[test]
    fn test_field_is_bounded_by_slot_count() {
        let mut field = BumperField::new(8);
        for slot in 0..8 {
            let id = field.add_bumper(1, 10.0);
            field.place(id, slot).unwrap();
        }
        assert_eq!(field.first_free_slot(), None);
        assert_eq!(field.active().len(), 8);
    }

    #[test]
    fn test_malformed_effect_counts_as_zero() {
        let mut field = BumperField::new(8);
        field.restore(1, "banana".to_string(), Some(0));
        assert_eq!(field.active().len(), 1);
        assert_eq!(field.active()[0].effect_value, 0.0);
    }

    #[test]
    fn test_multiplier_scales_snapshot_effects() {
        let (mut field, ids) = field_with_inventory(&[1]);
        field.place(ids[0], 0).unwrap();
        assert_eq!(field.active()[0].effect_value, 10.0);

        field.set_multiplier(2.5);
        assert_eq!(field.active()[0].effect_value, 25.0);
    }

    #[test]
    fn test_restore_falls_back_to_inventory_on_taken_slot() {
        let mut field = BumperField::new(8);
        field.restore(1, "+10".to_string(), Some(2));
        let second = field.restore(1, "+10".to_string(), Some(2));
        assert!(field.bumper(second).unwrap().slot.is_none());
    }
}
