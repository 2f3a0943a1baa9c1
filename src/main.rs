use miniquad::*;
use std::io;

mod camera;
mod physics;
mod render;
mod shop_menu;
mod sound_handler;
mod state;

use crate::camera::Viewport;
use crate::render::Renderer;
use crate::shop_menu::ShopMenu;
use crate::sound_handler::{Sound, SoundHandler};
use crate::state::bumper::radius_for_level;
use crate::state::save::{AUTOSAVE_PERIOD_TICKS, SAVE_FILE};
use crate::state::{BumperId, GameState, SaveData, TickEvent, Tuning};

struct DragState {
    bumper_id: BumperId,
    from_slot: usize,
}

struct Stage {
    state: GameState,
    renderer: Renderer,
    egui_mq: egui_miniquad::EguiMq,
    viewport: Viewport,
    shop: ShopMenu,
    sound_handler: SoundHandler,
    drag: Option<DragState>,
    mouse_x: f32,
    mouse_y: f32,
}

impl Stage {
    fn new(width: f32, height: f32) -> Stage {
        let mut renderer = Renderer::new();
        let egui_mq = egui_miniquad::EguiMq::new(&mut *renderer.ctx);

        let tuning = Tuning::load_or_default("assets/tuning.json");
        let mut state = GameState::new(tuning);
        match SaveData::load_json(SAVE_FILE) {
            Ok(save) => state.apply_save(save),
            // A fresh game simply has no save yet
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => {
                eprintln!("Failed to load save '{}': {}", SAVE_FILE, err);
                state.push_notice("Could not load the previous save");
            }
        }

        Stage {
            state,
            renderer,
            egui_mq,
            viewport: Viewport::new(width, height),
            shop: ShopMenu::new(),
            sound_handler: SoundHandler::new(),
            drag: None,
            mouse_x: 0.0,
            mouse_y: 0.0,
        }
    }

    fn save(&mut self) {
        if let Err(err) = SaveData::from_state(&self.state).save_json(SAVE_FILE) {
            eprintln!("Failed to write save '{}': {}", SAVE_FILE, err);
            self.state.push_notice("Saving failed");
        }
    }

    fn finish_drag(&mut self, drag: DragState, x: f32, y: f32) {
        let world = self.viewport.screen_to_world(x, y);
        let result = if self.viewport.in_play_area(world) {
            match self.state.field.nearest_slot(world) {
                Some(slot) if slot == drag.from_slot => Ok(()),
                Some(slot) => self.state.field.move_bumper(drag.bumper_id, slot),
                // Dropped on open field space: snap back, nothing changes
                None => Ok(()),
            }
        } else {
            self.state.field.store(drag.bumper_id)
        };

        if let Err(err) = result {
            self.state.push_notice(err.message());
            self.sound_handler.play(Sound::Reject);
        }
    }
}

impl EventHandler for Stage {
    fn update(&mut self) {
        for event in self.state.update() {
            match event {
                TickEvent::Collected { .. } => self.sound_handler.play(Sound::Collect),
                TickEvent::BumperHit { .. } => self.sound_handler.play(Sound::Bounce),
            }
        }

        if self.state.tick % AUTOSAVE_PERIOD_TICKS == 0 {
            self.save();
        }
    }

    fn draw(&mut self) {
        let drag_ghost = self.drag.as_ref().map(|drag| {
            let level = self
                .state
                .field
                .bumper(drag.bumper_id)
                .map_or(1, |b| b.level);
            (
                self.viewport.screen_to_world(self.mouse_x, self.mouse_y),
                radius_for_level(level),
            )
        });
        self.renderer.draw(&self.state, &self.viewport, drag_ghost);

        let Stage {
            state,
            renderer,
            egui_mq,
            viewport,
            shop,
            sound_handler,
            ..
        } = self;
        egui_mq.run(&mut *renderer.ctx, |_mq_ctx, egui_ctx| {
            egui::SidePanel::right("shop")
                .exact_width(camera::SHOP_PANEL_W)
                .show(egui_ctx, |ui| {
                    shop.render_ui(ui, state, sound_handler);
                });
            shop_menu::paint_floating_texts(egui_ctx, state, viewport);
        });
        self.egui_mq.draw(&mut *self.renderer.ctx);

        self.renderer.ctx.commit_frame();
    }

    fn resize_event(&mut self, width: f32, height: f32) {
        self.viewport.on_resize(width, height);
    }

    fn mouse_motion_event(&mut self, x: f32, y: f32) {
        self.egui_mq.mouse_motion_event(x, y);
        self.mouse_x = x;
        self.mouse_y = y;
    }

    fn mouse_wheel_event(&mut self, dx: f32, dy: f32) {
        self.egui_mq.mouse_wheel_event(dx, dy);
    }

    fn mouse_button_down_event(&mut self, button: MouseButton, x: f32, y: f32) {
        self.egui_mq.mouse_button_down_event(button, x, y);
        if self.egui_mq.egui_ctx().wants_pointer_input() || button != MouseButton::Left {
            return;
        }

        let world = self.viewport.screen_to_world(x, y);
        if let Some((bumper_id, from_slot)) = self.state.field.placed_at(world) {
            self.drag = Some(DragState {
                bumper_id,
                from_slot,
            });
        } else if self.viewport.in_play_area(world) {
            self.state.click_income(world.x, world.y);
        }
    }

    fn mouse_button_up_event(&mut self, button: MouseButton, x: f32, y: f32) {
        self.egui_mq.mouse_button_up_event(button, x, y);
        if let Some(drag) = self.drag.take() {
            self.finish_drag(drag, x, y);
        }
    }

    fn char_event(&mut self, character: char, _keymods: KeyMods, _repeat: bool) {
        self.egui_mq.char_event(character);
    }

    fn key_down_event(&mut self, keycode: KeyCode, keymods: KeyMods, _repeat: bool) {
        self.egui_mq.key_down_event(keycode, keymods);
    }

    fn key_up_event(&mut self, keycode: KeyCode, keymods: KeyMods) {
        self.egui_mq.key_up_event(keycode, keymods);
    }

    fn quit_requested_event(&mut self) {
        self.save();
    }
}

fn main() {
    miniquad::start(
        conf::Conf {
            window_title: String::from("Cashfall"),
            high_dpi: false,
            window_width: 900,
            window_height: 700,
            ..Default::default()
        },
        || {
            let (w, h) = window::screen_size();
            Box::new(Stage::new(w, h))
        },
    );
}
