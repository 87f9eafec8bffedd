use crate::dashboard::config::{ModuleConfig, WidgetConfigStore};
use crate::dashboard::grid::{GridResponse, GridSurface};
use crate::dashboard::layout::LayoutItem;
use crate::dashboard::metrics::{DataState, ModuleMetrics};
use crate::dashboard::module::DashboardModule;
use crate::dashboard::panel::ConfigPanel;
use crate::dashboard::widgets::WidgetRenderers;
use eframe::egui;
use std::sync::Arc;

/// Per-session dashboard state: the config store, the active module, and the
/// grid and panel showing it.
pub struct Dashboard {
    store: WidgetConfigStore,
    renderers: WidgetRenderers,
    active: DashboardModule,
    surface: GridSurface,
    panel: ConfigPanel,
}

impl Dashboard {
    pub fn new(store: WidgetConfigStore, renderers: WidgetRenderers, initial: DashboardModule) -> Self {
        let mut dashboard = Self {
            store,
            renderers,
            active: initial,
            surface: GridSurface::new(initial),
            panel: ConfigPanel::default(),
        };
        let _ = dashboard.store.module(initial);
        dashboard
    }

    pub fn active_module(&self) -> DashboardModule {
        self.active
    }

    /// Make `module` active. The grid is rebuilt from scratch so no drag or
    /// mounted widget carries over from the previous module.
    pub fn set_active_module(&mut self, module: DashboardModule) {
        if module == self.active {
            return;
        }
        tracing::debug!(from = %self.active, to = %module, "switching dashboard module");
        self.active = module;
        self.surface = GridSurface::new(module);
        let _ = self.store.module(module);
    }

    pub fn active_config(&mut self) -> &ModuleConfig {
        self.store.module(self.active)
    }

    pub fn surface(&self) -> &GridSurface {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut GridSurface {
        &mut self.surface
    }

    pub fn renderers(&self) -> &WidgetRenderers {
        &self.renderers
    }

    pub fn toggle_visibility(&mut self, widget_id: &str) {
        self.store.toggle_visibility(self.active, widget_id);
    }

    pub fn commit_layout(&mut self, layout: Vec<LayoutItem>) {
        self.store.update_layout(self.active, layout);
    }

    /// Restore the active module's defaults and remount its grid.
    pub fn reset_active_module(&mut self) {
        self.store.reset_to_defaults(self.active);
        self.surface = GridSurface::new(self.active);
    }

    pub fn panel_button_ui(&mut self, ui: &mut egui::Ui) -> egui::Response {
        let config = self.store.module(self.active);
        self.panel.button_ui(ui, config)
    }

    pub fn panel_ui(&mut self, ctx: &egui::Context) {
        let config = self.store.module(self.active);
        let toggled = self.panel.ui(ctx, config);
        for id in toggled {
            self.toggle_visibility(id);
        }
    }

    pub fn grid_ui(&mut self, ui: &mut egui::Ui, data: &DataState<Arc<ModuleMetrics>>) -> GridResponse {
        let config = self.store.module(self.active);
        let mut response = self.surface.ui(ui, config, &self.renderers, data);
        if let Some(layout) = response.committed.take() {
            self.commit_layout(layout.clone());
            response.committed = Some(layout);
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dashboard() -> Dashboard {
        Dashboard::new(
            WidgetConfigStore::in_memory(),
            WidgetRenderers::with_defaults(),
            DashboardModule::Crm,
        )
    }

    #[test]
    fn switching_module_remounts_grid() {
        let mut dash = dashboard();
        let visible = crate::dashboard::grid::visible_items(
            &dash.active_config().clone(),
            &WidgetRenderers::with_defaults(),
        );
        assert!(dash
            .surface_mut()
            .begin_drag("revenueTrend", &visible, 12, egui::Vec2::ZERO));
        dash.set_active_module(DashboardModule::People);
        assert_eq!(dash.surface().module(), DashboardModule::People);
        assert!(!dash.surface().is_dragging());
        dash.set_active_module(DashboardModule::Crm);
        assert!(!dash.surface().is_dragging());
    }

    #[test]
    fn toggles_apply_to_active_module_only() {
        let mut dash = dashboard();
        dash.toggle_visibility("revenueTrend");
        assert_eq!(dash.active_config().visible_count(), 11);
        dash.set_active_module(DashboardModule::People);
        assert_eq!(dash.active_config().visible_count(), 7);
    }

    #[test]
    fn grid_ui_renders_active_module() {
        let mut dash = dashboard();
        let mut rendered = 0;
        egui::__run_test_ui(|ui| {
            rendered = dash.grid_ui(ui, &DataState::Failed("offline".into())).rendered;
        });
        assert_eq!(rendered, 12);
    }
}
