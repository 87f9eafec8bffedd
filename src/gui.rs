use crate::dashboard::{
    BusinessUnit, Dashboard, DashboardModule, DataState, DateRange, MetricsFeed, MetricsFilter,
    MetricsProvider, WidgetConfigStore, WidgetRenderers,
};
use crate::settings::Settings;
use eframe::egui;
use egui_toast::{Toast, ToastKind, ToastOptions, Toasts};
use std::sync::Arc;
use std::time::Duration;

pub struct DashboardApp {
    dashboard: Dashboard,
    feed: MetricsFeed,
    filter: MetricsFilter,
    toasts: Toasts,
    pub enable_toasts: bool,
    pub toast_duration: f32,
    settings_path: String,
}

impl DashboardApp {
    pub fn new(
        settings: &Settings,
        settings_path: String,
        store: WidgetConfigStore,
        provider: Arc<dyn MetricsProvider>,
    ) -> Self {
        let dashboard = Dashboard::new(
            store,
            WidgetRenderers::with_defaults(),
            settings.default_module,
        );
        Self {
            dashboard,
            feed: MetricsFeed::new(provider),
            filter: settings.filter(),
            toasts: Toasts::new().anchor(egui::Align2::RIGHT_TOP, [10.0, 10.0]),
            enable_toasts: settings.enable_toasts,
            toast_duration: settings.toast_duration,
            settings_path,
        }
    }

    pub fn dashboard(&self) -> &Dashboard {
        &self.dashboard
    }

    pub fn dashboard_mut(&mut self) -> &mut Dashboard {
        &mut self.dashboard
    }

    pub fn filter(&self) -> MetricsFilter {
        self.filter
    }

    pub fn add_toast(&mut self, text: impl Into<String>, kind: ToastKind) {
        if !self.enable_toasts {
            return;
        }
        let text: String = text.into();
        self.toasts.add(Toast {
            text: text.into(),
            kind,
            options: ToastOptions::default().duration_in_seconds(self.toast_duration as f64),
        });
    }

    fn reset_layout(&mut self) {
        let module = self.dashboard.active_module();
        self.dashboard.reset_active_module();
        self.add_toast(format!("{} layout reset", module.label()), ToastKind::Info);
    }

    fn controls_ui(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            let active = self.dashboard.active_module();
            for module in DashboardModule::ALL {
                if ui.selectable_label(active == module, module.label()).clicked() {
                    self.dashboard.set_active_module(module);
                }
            }
            ui.separator();
            egui::ComboBox::from_id_source("date_range")
                .selected_text(self.filter.date_range.label())
                .show_ui(ui, |ui| {
                    for range in DateRange::ALL {
                        ui.selectable_value(&mut self.filter.date_range, range, range.label());
                    }
                });
            egui::ComboBox::from_id_source("business_unit")
                .selected_text(self.filter.business_unit.label())
                .show_ui(ui, |ui| {
                    for unit in BusinessUnit::ALL {
                        ui.selectable_value(&mut self.filter.business_unit, unit, unit.label());
                    }
                });
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui
                    .button("Reset layout")
                    .on_hover_text("Restore the default widgets and positions")
                    .clicked()
                {
                    self.reset_layout();
                }
                self.dashboard.panel_button_ui(ui);
            });
        });
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("dashboard_controls").show(ctx, |ui| {
            ui.add_space(4.0);
            self.controls_ui(ui);
            ui.add_space(4.0);
        });

        let module = self.dashboard.active_module();
        let data = self.feed.poll(module, self.filter);
        if data.is_loading() {
            ctx.request_repaint_after(Duration::from_millis(100));
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading(module.label());
                if let DataState::Ready(metrics) = &data {
                    let (start, end) = metrics.period;
                    ui.weak(format!("{} to {}", start.format("%b %d, %Y"), end.format("%b %d, %Y")));
                }
                if let Some(e) = data.error() {
                    ui.colored_label(ui.visuals().error_fg_color, "Data unavailable")
                        .on_hover_text(e);
                }
            });
            ui.separator();
            egui::ScrollArea::vertical()
                .drag_to_scroll(false)
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    self.dashboard.grid_ui(ui, &data);
                });
        });

        self.dashboard.panel_ui(ctx);

        if self.enable_toasts {
            self.toasts.show(ctx);
        }
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        match Settings::load(&self.settings_path) {
            Ok(mut settings) => {
                settings.default_module = self.dashboard.active_module();
                settings.date_range = self.filter.date_range;
                settings.business_unit = self.filter.business_unit;
                if let Err(e) = settings.save(&self.settings_path) {
                    tracing::warn!(error = %e, "failed to save settings");
                }
            }
            Err(e) => tracing::warn!(error = %e, "settings unreadable; not saving session state"),
        }
    }
}
