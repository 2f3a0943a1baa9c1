use crate::physics::{
    CONTACT_TOLERANCE, bounce_direction, circles_intersect, swept_segment_hits_circle,
};
use crate::state::bumper::{ActiveBumper, BumperId};
use crate::state::common::{AREA_H, AREA_W, Pos};
use crate::state::tuning::Tuning;

pub const BODY_RADIUS: f32 = 8.0;

pub enum BodyUpdateResult {
    BumperHit { bumper: BumperId, value: f64 },
    Collected { value: f64 },
}

/// One falling money sign. Position is the circle center.
pub struct Body {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub radius: f32,
    pub value: f64,
    pub hit_count: u32,
    pub active: bool,
    // Bumpers this body may not hit again until the tick stored with them
    recent_collisions: Vec<(BumperId, u64)>,
}

impl Body {
    pub fn new(x: f32, vx: f32, vy: f32, value: f64) -> Body {
        Body {
            x,
            y: BODY_RADIUS,
            vx,
            vy,
            radius: BODY_RADIUS,
            value,
            hit_count: 0,
            active: true,
            recent_collisions: Vec::new(),
        }
    }

    pub fn center(&self) -> Pos {
        Pos::new(self.x, self.y)
    }

    fn on_cooldown(&self, bumper: BumperId) -> bool {
        self.recent_collisions.iter().any(|&(id, _)| id == bumper)
    }

    /// Advance this body one tick: integrate, bounce off bumpers and walls,
    /// collect at the bottom band. `now` is the current simulation tick.
    pub fn update(
        &mut self,
        now: u64,
        bumpers: &[ActiveBumper],
        tuning: &Tuning,
    ) -> Vec<BodyUpdateResult> {
        if !self.active {
            return vec![];
        }
        let mut results = vec![];

        let prev = self.center();

        self.vy += tuning.gravity;
        self.vx *= tuning.friction_factor;
        self.x += self.vx;
        self.y += self.vy;

        self.recent_collisions.retain(|&(_, until)| until > now);

        let speed = (self.vx * self.vx + self.vy * self.vy).sqrt();
        for bumper in bumpers {
            if self.on_cooldown(bumper.id) {
                continue;
            }

            let mut hit = circles_intersect(self.center(), self.radius, bumper.center, bumper.radius);
            if !hit && speed > tuning.fast_motion_threshold {
                // Fast movers can cross a whole bumper in one tick; test the
                // path instead of just the endpoint
                let combined = self.radius + bumper.radius + CONTACT_TOLERANCE;
                hit = swept_segment_hits_circle(prev, self.center(), bumper.center, combined);
            }
            if !hit {
                continue;
            }

            // Hits only ever add value
            let gained = bumper.effect_value.max(0.0);
            self.value += gained;
            self.hit_count += 1;

            let (dir_x, dir_y) = bounce_direction(bumper.center, self.center());
            let current_speed = (self.vx * self.vx + self.vy * self.vy).sqrt();
            let new_speed = (current_speed * tuning.bounce_factor * tuning.bounce_boost)
                .max(tuning.min_bounce_velocity);
            self.vx = dir_x * new_speed;
            self.vy = dir_y * new_speed;

            self.recent_collisions
                .push((bumper.id, now + tuning.cooldown_ticks()));
            results.push(BodyUpdateResult::BumperHit {
                bumper: bumper.id,
                value: gained,
            });
        }

        // Left/right/top walls bounce; only the bottom collects
        if self.x - self.radius < 0.0 {
            self.x = self.radius;
            self.vx = -self.vx * tuning.bounce_factor;
        } else if self.x + self.radius > AREA_W {
            self.x = AREA_W - self.radius;
            self.vx = -self.vx * tuning.bounce_factor;
        }
        if self.y - self.radius < 0.0 {
            self.y = self.radius;
            self.vy = -self.vy * tuning.bounce_factor;
        }

        if self.y + self.radius > AREA_H - tuning.collection_band_height {
            self.active = false;
            results.push(BodyUpdateResult::Collected { value: self.value });
        }

        results
    }
}
