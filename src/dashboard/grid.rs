//! Draggable grid that places the visible widgets of one module.
//!
//! The surface owns only transient state: the drag in progress and the widget
//! instances it mounted. Switching modules builds a new surface, so nothing
//! here survives a switch.

use crate::dashboard::config::ModuleConfig;
use crate::dashboard::layout::{compact, merge_positions, move_item, Breakpoint, LayoutItem};
use crate::dashboard::metrics::{DataState, ModuleMetrics};
use crate::dashboard::module::DashboardModule;
use crate::dashboard::registry::{find_widget, is_registered};
use crate::dashboard::widgets::{Widget, WidgetRenderers};
use eframe::egui;
use std::collections::HashMap;
use std::sync::Arc;

pub const ROW_HEIGHT: f32 = 30.0;
pub const MARGIN: f32 = 16.0;
const HANDLE_SIZE: f32 = 18.0;
const SLOT_PADDING: f32 = 8.0;

/// Layout items that should be placed: visible, in the catalog and with a
/// renderer. Everything else is skipped without notice.
pub fn visible_items(config: &ModuleConfig, renderers: &WidgetRenderers) -> Vec<LayoutItem> {
    let module = config.module();
    config
        .layout()
        .iter()
        .filter(|item| config.is_visible(&item.i))
        .filter(|item| is_registered(module, &item.i) && renderers.contains(module, &item.i))
        .cloned()
        .collect()
}

/// Pixel mapping for one frame of the grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridGeometry {
    pub origin: egui::Pos2,
    pub cols: u32,
    pub col_width: f32,
}

impl GridGeometry {
    pub fn new(origin: egui::Pos2, width: f32, cols: u32) -> Self {
        let cols = cols.max(1);
        let gaps = MARGIN * (cols - 1) as f32;
        let col_width = ((width - gaps) / cols as f32).max(1.0);
        Self {
            origin,
            cols,
            col_width,
        }
    }

    pub fn rect_for(&self, item: &LayoutItem) -> egui::Rect {
        let min = egui::pos2(
            self.origin.x + item.x as f32 * (self.col_width + MARGIN),
            self.origin.y + item.y as f32 * (ROW_HEIGHT + MARGIN),
        );
        let size = egui::vec2(
            item.w as f32 * self.col_width + item.w.saturating_sub(1) as f32 * MARGIN,
            item.h as f32 * ROW_HEIGHT + item.h.saturating_sub(1) as f32 * MARGIN,
        );
        egui::Rect::from_min_size(min, size)
    }

    /// Nearest cell for an item of width `w` whose top-left corner sits at
    /// `top_left`, clamped to the grid.
    pub fn cell_for(&self, top_left: egui::Pos2, w: u32) -> (u32, u32) {
        let col = ((top_left.x - self.origin.x) / (self.col_width + MARGIN)).round();
        let row = ((top_left.y - self.origin.y) / (ROW_HEIGHT + MARGIN)).round();
        let max_col = self.cols.saturating_sub(w.min(self.cols));
        let x = (col.max(0.0) as u32).min(max_col);
        let y = row.max(0.0) as u32;
        (x, y)
    }

    pub fn height_for(&self, items: &[LayoutItem]) -> f32 {
        let rows = items.iter().map(LayoutItem::bottom).max().unwrap_or(0);
        if rows == 0 {
            0.0
        } else {
            rows as f32 * ROW_HEIGHT + (rows - 1) as f32 * MARGIN
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    pub id: String,
    pub cols: u32,
    /// Pointer offset from the item's top-left corner at grab time.
    pub grab_offset: egui::Vec2,
    base: Vec<LayoutItem>,
    preview: Vec<LayoutItem>,
}

impl DragSession {
    pub fn preview(&self) -> &[LayoutItem] {
        &self.preview
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging(DragSession),
}

/// What a frame of the grid produced.
#[derive(Debug, Default)]
pub struct GridResponse {
    /// Full layout sequence to persist after a drop.
    pub committed: Option<Vec<LayoutItem>>,
    pub rendered: usize,
}

pub struct GridSurface {
    module: DashboardModule,
    drag: DragState,
    widgets: HashMap<String, Box<dyn Widget>>,
}

impl GridSurface {
    pub fn new(module: DashboardModule) -> Self {
        Self {
            module,
            drag: DragState::Idle,
            widgets: HashMap::new(),
        }
    }

    pub fn module(&self) -> DashboardModule {
        self.module
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.drag, DragState::Dragging(_))
    }

    pub fn mounted_widgets(&self) -> usize {
        self.widgets.len()
    }

    /// Positions to draw at `cols`: the drag preview while one is running at
    /// that width, otherwise the compacted committed layout.
    pub fn arranged(&self, visible: &[LayoutItem], cols: u32) -> Vec<LayoutItem> {
        match &self.drag {
            DragState::Dragging(session) if session.cols == cols => session.preview.clone(),
            _ => compact(visible, cols),
        }
    }

    /// Start dragging `id`. Returns false when the item is not on the grid.
    pub fn begin_drag(&mut self, id: &str, visible: &[LayoutItem], cols: u32, grab_offset: egui::Vec2) -> bool {
        let base = compact(visible, cols);
        if !base.iter().any(|item| item.i == id) {
            return false;
        }
        tracing::trace!(module = %self.module, widget = id, "drag started");
        self.drag = DragState::Dragging(DragSession {
            id: id.to_string(),
            cols,
            grab_offset,
            preview: base.clone(),
            base,
        });
        true
    }

    /// Move the dragged item to cell `(x, y)` and recompute the preview.
    pub fn drag_to(&mut self, x: u32, y: u32) {
        if let DragState::Dragging(session) = &mut self.drag {
            session.preview = move_item(&session.base, &session.id, x, y, session.cols);
        }
    }

    /// Finish the drag. The previewed positions of the visible items are
    /// merged into `stored` and the full sequence is returned for commit;
    /// hidden and stale items keep their stored positions.
    pub fn end_drag(&mut self, stored: &[LayoutItem]) -> Option<Vec<LayoutItem>> {
        match std::mem::take(&mut self.drag) {
            DragState::Dragging(session) => {
                tracing::debug!(module = %self.module, widget = %session.id, "widget dropped");
                Some(merge_positions(stored, &session.preview))
            }
            DragState::Idle => None,
        }
    }

    fn surface_id(&self) -> egui::Id {
        egui::Id::new(("dashboard_grid", self.module.as_str()))
    }

    pub fn ui(
        &mut self,
        ui: &mut egui::Ui,
        config: &ModuleConfig,
        renderers: &WidgetRenderers,
        data: &DataState<Arc<ModuleMetrics>>,
    ) -> GridResponse {
        let mut out = GridResponse::default();
        let visible = visible_items(config, renderers);
        let width = ui.available_width();
        let cols = Breakpoint::for_width(width).cols();
        let arranged = self.arranged(&visible, cols);

        let sizing = GridGeometry::new(egui::Pos2::ZERO, width, cols);
        let (rect, _) = ui.allocate_exact_size(
            egui::vec2(width, sizing.height_for(&arranged)),
            egui::Sense::hover(),
        );
        let geometry = GridGeometry::new(rect.min, width, cols);
        let surface_id = self.surface_id();
        let dragging_id = match &self.drag {
            DragState::Dragging(session) => Some(session.id.clone()),
            DragState::Idle => None,
        };

        for item in &arranged {
            let Some(def) = find_widget(self.module, &item.i) else {
                continue;
            };
            if !self.widgets.contains_key(&item.i) {
                let Some(widget) = renderers.create(self.module, &item.i) else {
                    continue;
                };
                self.widgets.insert(item.i.clone(), widget);
            }
            let Some(widget) = self.widgets.get_mut(&item.i) else {
                continue;
            };

            let slot_rect = geometry.rect_for(item);
            let mut slot_ui = ui.child_ui(slot_rect, egui::Layout::top_down(egui::Align::Min));
            slot_ui.set_clip_rect(slot_rect.intersect(ui.clip_rect()));
            slot_ui.push_id(surface_id.with(&item.i), |ui| {
                egui::Frame::group(ui.style()).show(ui, |ui| {
                    ui.set_min_size(slot_rect.size() - egui::vec2(2.0 * SLOT_PADDING, 2.0 * SLOT_PADDING));
                    ui.horizontal(|ui| {
                        ui.strong(def.label).on_hover_text(def.description);
                        ui.add_space(HANDLE_SIZE);
                    });
                    ui.separator();
                    match data {
                        DataState::Loading => {
                            ui.horizontal(|ui| {
                                ui.spinner();
                                ui.weak("Loading…");
                            });
                        }
                        DataState::Failed(_) => {
                            ui.weak("Data unavailable");
                        }
                        DataState::Ready(metrics) => match metrics.section(&item.i) {
                            Some(section) => widget.render(ui, section),
                            None => {
                                ui.weak("No data");
                            }
                        },
                    }
                });
            });
            out.rendered += 1;

            if dragging_id.as_deref() == Some(item.i.as_str()) {
                ui.painter().rect_stroke(
                    slot_rect,
                    4.0,
                    egui::Stroke::new(2.0, ui.visuals().selection.stroke.color),
                );
            }

            let handle_rect = egui::Rect::from_min_size(
                egui::pos2(
                    slot_rect.max.x - HANDLE_SIZE - SLOT_PADDING,
                    slot_rect.min.y + SLOT_PADDING,
                ),
                egui::vec2(HANDLE_SIZE, HANDLE_SIZE),
            );
            let handle = ui
                .interact(handle_rect, surface_id.with(("handle", &item.i)), egui::Sense::drag())
                .on_hover_text("Drag to reposition widget");
            let grip_color = if handle.hovered() || handle.dragged() {
                ui.visuals().strong_text_color()
            } else {
                ui.visuals().weak_text_color()
            };
            ui.painter().text(
                handle_rect.center(),
                egui::Align2::CENTER_CENTER,
                "⠿",
                egui::FontId::proportional(14.0),
                grip_color,
            );
            if handle.hovered() || handle.dragged() {
                ui.ctx().set_cursor_icon(egui::CursorIcon::Grab);
            }

            if handle.drag_started() {
                let offset = handle
                    .interact_pointer_pos()
                    .map(|p| p - slot_rect.min)
                    .unwrap_or_default();
                self.begin_drag(&item.i, &visible, cols, offset);
            }
            if handle.dragged() {
                let grab = match &self.drag {
                    DragState::Dragging(session) => Some(session.grab_offset),
                    DragState::Idle => None,
                };
                if let (Some(pointer), Some(grab)) = (handle.interact_pointer_pos(), grab) {
                    let (x, y) = geometry.cell_for(pointer - grab, item.w);
                    self.drag_to(x, y);
                    ui.ctx().request_repaint();
                }
            }
            if handle.drag_stopped() {
                out.committed = self.end_drag(config.layout());
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::config::WidgetConfigStore;

    fn crm_visible() -> Vec<LayoutItem> {
        let config = ModuleConfig::defaults(DashboardModule::Crm);
        visible_items(&config, &WidgetRenderers::with_defaults())
    }

    #[test]
    fn hidden_and_unrenderable_items_are_filtered() {
        let mut store = WidgetConfigStore::in_memory();
        store.toggle_visibility(DashboardModule::Crm, "salesMetrics");
        let mut renderers = WidgetRenderers::with_defaults();
        renderers.unregister(DashboardModule::Crm, "revenueTrend");
        let config = store.module(DashboardModule::Crm).clone();
        let ids: Vec<_> = visible_items(&config, &renderers)
            .into_iter()
            .map(|i| i.i)
            .collect();
        assert_eq!(ids.len(), 10);
        assert!(!ids.iter().any(|i| i == "salesMetrics" || i == "revenueTrend"));
    }

    #[test]
    fn geometry_maps_cells_both_ways() {
        let geometry = GridGeometry::new(egui::pos2(10.0, 20.0), 12.0 * 50.0 + 11.0 * MARGIN, 12);
        assert!((geometry.col_width - 50.0).abs() < 1e-3);
        let item = LayoutItem::new("a", 2, 3, 4, 2);
        let rect = geometry.rect_for(&item);
        assert_eq!(geometry.cell_for(rect.min, item.w), (2, 3));
        assert_eq!(geometry.cell_for(egui::pos2(-500.0, -40.0), 4), (0, 0));
        assert_eq!(geometry.cell_for(egui::pos2(5000.0, rect.min.y), 4), (8, 3));
    }

    #[test]
    fn drag_previews_then_commits_full_sequence() {
        let mut store = WidgetConfigStore::in_memory();
        store.toggle_visibility(DashboardModule::Crm, "lostDealAnalysis");
        let config = store.module(DashboardModule::Crm).clone();
        let visible = visible_items(&config, &WidgetRenderers::with_defaults());

        let mut surface = GridSurface::new(DashboardModule::Crm);
        assert!(surface.begin_drag("topRevenueContributors", &visible, 12, egui::Vec2::ZERO));
        surface.drag_to(0, 0);
        let preview = surface.arranged(&visible, 12);
        let moved = preview.iter().find(|i| i.i == "topRevenueContributors").unwrap();
        assert_eq!((moved.x, moved.y), (0, 0));

        let committed = surface.end_drag(config.layout()).unwrap();
        assert!(!surface.is_dragging());
        assert_eq!(committed.len(), config.layout().len());
        let hidden = committed.iter().find(|i| i.i == "lostDealAnalysis").unwrap();
        let stored = config.layout().iter().find(|i| i.i == "lostDealAnalysis").unwrap();
        assert_eq!(hidden, stored);
    }

    #[test]
    fn end_drag_without_session_is_none() {
        let mut surface = GridSurface::new(DashboardModule::Crm);
        assert!(!surface.begin_drag("unknownWidget", &crm_visible(), 12, egui::Vec2::ZERO));
        assert_eq!(surface.end_drag(&[]), None);
    }

    #[test]
    fn preview_is_ignored_at_another_width() {
        let visible = crm_visible();
        let mut surface = GridSurface::new(DashboardModule::Crm);
        surface.begin_drag("revenueTrend", &visible, 12, egui::Vec2::ZERO);
        surface.drag_to(0, 40);
        assert_eq!(surface.arranged(&visible, 6), compact(&visible, 6));
    }

    #[test]
    fn renders_one_slot_per_visible_item() {
        let config = ModuleConfig::defaults(DashboardModule::Recruitment);
        let renderers = WidgetRenderers::with_defaults();
        let mut surface = GridSurface::new(DashboardModule::Recruitment);
        let mut rendered = 0;
        egui::__run_test_ui(|ui| {
            rendered = surface.ui(ui, &config, &renderers, &DataState::Loading).rendered;
        });
        assert_eq!(rendered, 5);
        assert_eq!(surface.mounted_widgets(), 5);
    }
}
