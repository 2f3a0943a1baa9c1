use crate::state::{AREA_H, AREA_W, Pos};

// Keep this in sync with the panel width used in shop_menu.
pub const SHOP_PANEL_W: f32 = 260.0;
const AREA_MARGIN: f32 = 16.0;

/// Letterboxes the fixed-size play area into the window, left of the shop
/// panel, and maps between screen and world coordinates.
pub struct Viewport {
    pub screen_w: f32,
    pub screen_h: f32,
    pub zoom: f32,
    pub offset_x: f32,
    pub offset_y: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Viewport {
        let mut viewport = Viewport {
            screen_w: width,
            screen_h: height,
            zoom: 1.0,
            offset_x: 0.0,
            offset_y: 0.0,
        };
        viewport.refit();
        viewport
    }

    pub fn on_resize(&mut self, w: f32, h: f32) {
        self.screen_w = w;
        self.screen_h = h;
        self.refit();
    }

    fn refit(&mut self) {
        let avail_w = (self.screen_w - SHOP_PANEL_W - AREA_MARGIN * 2.0).max(1.0);
        let avail_h = (self.screen_h - AREA_MARGIN * 2.0).max(1.0);
        self.zoom = (avail_w / AREA_W).min(avail_h / AREA_H);
        self.offset_x = AREA_MARGIN + (avail_w - AREA_W * self.zoom) * 0.5;
        self.offset_y = AREA_MARGIN + (avail_h - AREA_H * self.zoom) * 0.5;
    }

    pub fn world_to_screen(&self, pos: Pos) -> (f32, f32) {
        (
            self.offset_x + pos.x * self.zoom,
            self.offset_y + pos.y * self.zoom,
        )
    }

    pub fn screen_to_world(&self, mx: f32, my: f32) -> Pos {
        // Invert the transform used in rendering:
        // screen = offset + world * zoom  =>  world = (screen - offset) / zoom
        Pos::new(
            (mx - self.offset_x) / self.zoom,
            (my - self.offset_y) / self.zoom,
        )
    }

    pub fn in_play_area(&self, pos: Pos) -> bool {
        pos.x >= 0.0 && pos.x <= AREA_W && pos.y >= 0.0 && pos.y <= AREA_H
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_screen_world_mapping_round_trips() {
        let viewport = Viewport::new(900.0, 700.0);
        let world = Pos::new(123.0, 456.0);
        let (sx, sy) = viewport.world_to_screen(world);
        let back = viewport.screen_to_world(sx, sy);
        assert!((back.x - world.x).abs() < 1e-3);
        assert!((back.y - world.y).abs() < 1e-3);
    }

    #[test]
    fn test_whole_area_fits_on_screen() {
        let viewport = Viewport::new(900.0, 700.0);
        let (x0, y0) = viewport.world_to_screen(Pos::new(0.0, 0.0));
        let (x1, y1) = viewport.world_to_screen(Pos::new(AREA_W, AREA_H));
        assert!(x0 >= 0.0 && y0 >= 0.0);
        assert!(x1 <= 900.0 - SHOP_PANEL_W && y1 <= 700.0);
    }
}
