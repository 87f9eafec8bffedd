use anyhow::anyhow;
use eframe::egui;
use exec_dashboard::common::kv_store::JsonFileStore;
use exec_dashboard::dashboard::{SampleMetricsProvider, WidgetConfigStore};
use exec_dashboard::gui::DashboardApp;
use exec_dashboard::logging;
use exec_dashboard::settings::{default_settings_path, Settings};
use std::path::{Path, PathBuf};
use std::sync::Arc;

fn main() -> anyhow::Result<()> {
    let settings_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(default_settings_path);
    let settings_path_str = settings_path.to_string_lossy().into_owned();
    let settings = Settings::load(&settings_path_str)?;
    logging::init(settings.debug_logging, settings.log_file.as_ref().map(PathBuf::from));

    let state_file = settings.state_file(Path::new(&settings_path));
    tracing::info!(
        settings = %settings_path.display(),
        state = %state_file.display(),
        "starting dashboard"
    );
    let store = WidgetConfigStore::new(JsonFileStore::new(state_file));
    let app = DashboardApp::new(
        &settings,
        settings_path_str,
        store,
        Arc::new(SampleMetricsProvider),
    );

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([480.0, 360.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Executive Dashboard",
        native_options,
        Box::new(move |_cc| Box::new(app)),
    )
    .map_err(|e| anyhow!("failed to run dashboard window: {e}"))
}
