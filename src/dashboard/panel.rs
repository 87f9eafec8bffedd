//! "Customize Widgets" popover listing the active module's catalog with a
//! visibility toggle per widget.

use crate::dashboard::config::ModuleConfig;
use crate::dashboard::registry::registry_for;
use eframe::egui;

pub const PANEL_WIDTH: f32 = 320.0;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelRow {
    pub id: &'static str,
    pub label: &'static str,
    pub description: &'static str,
    pub visible: bool,
}

/// One row per registered widget, in catalog order.
pub fn panel_rows(config: &ModuleConfig) -> Vec<PanelRow> {
    registry_for(config.module())
        .iter()
        .map(|w| PanelRow {
            id: w.id,
            label: w.label,
            description: w.description,
            visible: config.is_visible(w.id),
        })
        .collect()
}

pub fn footer_text(config: &ModuleConfig) -> String {
    format!(
        "{} of {} widgets visible",
        config.visible_count(),
        registry_for(config.module()).len()
    )
}

pub fn button_label(config: &ModuleConfig) -> String {
    format!(
        "Customize Widgets {}/{}",
        config.visible_count(),
        registry_for(config.module()).len()
    )
}

/// Open state and last drawn geometry of the popover.
#[derive(Debug, Clone, Default)]
pub struct ConfigPanel {
    open: bool,
    panel_rect: Option<egui::Rect>,
    button_rect: Option<egui::Rect>,
}

impl ConfigPanel {
    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
        self.panel_rect = None;
    }

    pub fn toggle_open(&mut self) {
        if self.open {
            self.close();
        } else {
            self.open();
        }
    }

    /// Close on a press outside the panel. Presses on the toggle button are
    /// left to the button itself. Returns whether the panel closed.
    pub fn handle_pointer_press(&mut self, pos: egui::Pos2) -> bool {
        if !self.open {
            return false;
        }
        let inside_panel = self.panel_rect.is_some_and(|r| r.contains(pos));
        let on_button = self.button_rect.is_some_and(|r| r.contains(pos));
        if inside_panel || on_button {
            return false;
        }
        self.close();
        true
    }

    /// Toggle button carrying the visible/total badge.
    pub fn button_ui(&mut self, ui: &mut egui::Ui, config: &ModuleConfig) -> egui::Response {
        let response = ui
            .selectable_label(self.open, button_label(config))
            .on_hover_text("Choose which widgets are shown");
        if response.clicked() {
            self.toggle_open();
        }
        self.button_rect = Some(response.rect);
        response
    }

    /// Draw the popover when open and return the ids the user toggled this
    /// frame, in click order.
    pub fn ui(&mut self, ctx: &egui::Context, config: &ModuleConfig) -> Vec<&'static str> {
        let mut toggled = Vec::new();
        if !self.open {
            return toggled;
        }
        let press = ctx.input(|i| {
            if i.pointer.any_pressed() {
                i.pointer.interact_pos()
            } else {
                None
            }
        });
        if let Some(pos) = press {
            if self.handle_pointer_press(pos) {
                return toggled;
            }
        }

        let anchor = self
            .button_rect
            .map(|r| egui::pos2(r.right() - PANEL_WIDTH, r.bottom() + 6.0))
            .unwrap_or_else(|| egui::pos2(16.0, 48.0));
        let mut close_clicked = false;
        let area = egui::Area::new(egui::Id::new("customize_widgets_panel"))
            .order(egui::Order::Foreground)
            .fixed_pos(anchor)
            .show(ctx, |ui| {
                egui::Frame::popup(ui.style()).show(ui, |ui| {
                    ui.set_width(PANEL_WIDTH);
                    ui.horizontal(|ui| {
                        ui.strong("Customize Widgets");
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            if ui.small_button("✕").on_hover_text("Close").clicked() {
                                close_clicked = true;
                            }
                        });
                    });
                    ui.separator();
                    egui::ScrollArea::vertical()
                        .max_height(360.0)
                        .show(ui, |ui| {
                            for row in panel_rows(config) {
                                ui.horizontal(|ui| {
                                    let mut checked = row.visible;
                                    if ui.checkbox(&mut checked, row.label).clicked() {
                                        toggled.push(row.id);
                                    }
                                    ui.weak("ⓘ").on_hover_text(row.description);
                                });
                            }
                        });
                    ui.separator();
                    ui.small(footer_text(config));
                });
            });
        self.panel_rect = Some(area.response.rect);
        if close_clicked {
            self.close();
        }
        toggled
    }
}
