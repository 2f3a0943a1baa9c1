use egui::Ui;

use crate::camera::Viewport;
use crate::sound_handler::{Sound, SoundHandler};
use crate::state::{BumperId, GameState, Pos};

enum PendingAction {
    Place(BumperId),
    Store(BumperId),
    Combine(BumperId, BumperId),
}

pub struct ShopMenu {
    combine_selection: Vec<BumperId>,
}

impl ShopMenu {
    pub fn new() -> ShopMenu {
        ShopMenu {
            combine_selection: Vec::new(),
        }
    }

    pub fn render_ui(&mut self, ui: &mut Ui, state: &mut GameState, sound_handler: &SoundHandler) {
        ui.heading(format!("${:.2}", state.money));
        ui.label("Click the field to earn. Drag bumpers between slots; drop one outside the field to store it.");
        ui.separator();

        ui.label("Upgrades:");
        if ui
            .button(format!(
                "Base income lv{} (${:.0})",
                state.upgrades.base_income.level, state.upgrades.base_income.upgrade_cost
            ))
            .clicked()
        {
            play_result(sound_handler, state.try_upgrade_base_income());
        }
        if ui
            .button(format!(
                "Drop rate lv{} (${:.0})",
                state.upgrades.speed.level, state.upgrades.speed.upgrade_cost
            ))
            .clicked()
        {
            play_result(sound_handler, state.try_upgrade_speed());
        }
        ui.label(format!(
            "One drop every {:.2} s",
            state.upgrades.speed.value / 1000.0
        ));
        if ui
            .button(format!(
                "Bumper multiplier x{:.2} (${:.0})",
                state.upgrades.bumper.multiplier, state.upgrades.bumper.upgrade_cost
            ))
            .clicked()
        {
            play_result(sound_handler, state.try_upgrade_bumper());
        }

        ui.separator();
        if ui
            .button(format!("Buy bumper (${:.0})", state.next_bumper_cost))
            .clicked()
        {
            play_result(sound_handler, state.try_buy_bumper());
        }

        // Snapshot the lists before mutating anything below
        let inventory: Vec<(BumperId, u32, String)> = state
            .field
            .inventory()
            .map(|b| (b.id, b.level, b.effect.clone()))
            .collect();
        let placed: Vec<(BumperId, u32, String)> = state
            .field
            .placed()
            .map(|b| (b.id, b.level, b.effect.clone()))
            .collect();

        let mut pending: Option<PendingAction> = None;

        ui.separator();
        ui.label(format!("Inventory ({}):", inventory.len()));
        self.combine_selection
            .retain(|id| inventory.iter().any(|(inv_id, _, _)| inv_id == id));
        for (id, level, effect) in &inventory {
            ui.horizontal(|ui| {
                let mut selected = self.combine_selection.contains(id);
                if ui
                    .checkbox(&mut selected, format!("lv{} {}", level, effect))
                    .changed()
                {
                    if selected {
                        self.combine_selection.push(*id);
                    } else {
                        self.combine_selection.retain(|x| x != id);
                    }
                }
                if ui.button("Place").clicked() {
                    pending = Some(PendingAction::Place(*id));
                }
            });
        }
        if self.combine_selection.len() == 2 {
            if ui.button("Combine selected").clicked() {
                pending = Some(PendingAction::Combine(
                    self.combine_selection[0],
                    self.combine_selection[1],
                ));
            }
        } else if !inventory.is_empty() {
            ui.small("Select two equal-level bumpers to combine them.");
        }

        ui.separator();
        ui.label(format!("On the field ({}):", placed.len()));
        for (id, level, effect) in &placed {
            ui.horizontal(|ui| {
                ui.label(format!("lv{} {}", level, effect));
                if ui.button("Store").clicked() {
                    pending = Some(PendingAction::Store(*id));
                }
            });
        }

        match pending {
            Some(PendingAction::Place(id)) => match state.field.first_free_slot() {
                Some(slot) => match state.field.place(id, slot) {
                    Ok(()) => sound_handler.play(Sound::Buy),
                    Err(err) => {
                        state.push_notice(err.message());
                        sound_handler.play(Sound::Reject);
                    }
                },
                None => {
                    state.push_notice("The field is full");
                    sound_handler.play(Sound::Reject);
                }
            },
            Some(PendingAction::Store(id)) => {
                if let Err(err) = state.field.store(id) {
                    state.push_notice(err.message());
                    sound_handler.play(Sound::Reject);
                }
            }
            Some(PendingAction::Combine(a, b)) => {
                match state.field.combine(a, b) {
                    Ok(_) => sound_handler.play(Sound::Buy),
                    Err(err) => {
                        state.push_notice(err.message());
                        sound_handler.play(Sound::Reject);
                    }
                }
                self.combine_selection.clear();
            }
            None => {}
        }

        ui.separator();
        for notice in &state.notices {
            ui.colored_label(egui::Color32::YELLOW, notice.text.as_str());
        }
    }
}

fn play_result(sound_handler: &SoundHandler, purchased: bool) {
    if purchased {
        sound_handler.play(Sound::Buy);
    } else {
        sound_handler.play(Sound::Reject);
    }
}

/// Floating "+$value" markers over the play field, drawn in the egui
/// foreground layer so they sit above the world but below nothing else.
pub fn paint_floating_texts(ctx: &egui::Context, state: &GameState, viewport: &Viewport) {
    let painter = ctx.layer_painter(egui::LayerId::new(
        egui::Order::Foreground,
        egui::Id::new("floating_texts"),
    ));
    for text in &state.floating_texts {
        let (sx, sy) = viewport.world_to_screen(Pos::new(text.x, text.y));
        let alpha = (text.alpha() * 255.0) as u8;
        painter.text(
            egui::pos2(sx, sy),
            egui::Align2::CENTER_CENTER,
            &text.text,
            egui::FontId::proportional(14.0),
            egui::Color32::from_rgba_unmultiplied(130, 230, 130, alpha),
        );
    }
}
