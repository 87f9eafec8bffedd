use eframe::egui;
use exec_dashboard::common::kv_store::{KvStore, MemoryStore};
use exec_dashboard::dashboard::config::layout_key;
use exec_dashboard::dashboard::grid::visible_items;
use exec_dashboard::dashboard::layout::{compact, LayoutItem};
use exec_dashboard::dashboard::{
    Dashboard, DashboardModule, DataState, WidgetConfigStore, WidgetRenderers,
    LAYOUT_SCHEMA_VERSION,
};

fn dashboard(module: DashboardModule) -> Dashboard {
    Dashboard::new(
        WidgetConfigStore::in_memory(),
        WidgetRenderers::with_defaults(),
        module,
    )
}

#[test]
fn switching_away_discards_uncommitted_drag() {
    let mut dash = dashboard(DashboardModule::Crm);
    let config = dash.active_config().clone();
    let visible = visible_items(&config, dash.renderers());
    let committed = compact(&visible, 12);

    let surface = dash.surface_mut();
    assert!(surface.begin_drag("topRevenueContributors", &visible, 12, egui::Vec2::ZERO));
    surface.drag_to(0, 0);
    assert_ne!(surface.arranged(&visible, 12), committed);

    dash.set_active_module(DashboardModule::People);
    dash.set_active_module(DashboardModule::Crm);

    assert!(!dash.surface().is_dragging());
    assert_eq!(dash.surface().arranged(&visible, 12), committed);
    assert_eq!(dash.active_config().layout(), config.layout());
}

#[test]
fn unknown_ids_render_no_slot() {
    let mut dash = dashboard(DashboardModule::Recruitment);
    let mut layout = dash.active_config().layout().to_vec();
    layout.push(LayoutItem::new("revenueTrend", 0, 0, 4, 4));
    layout.push(LayoutItem::new("legacyWidget", 0, 0, 4, 4));
    dash.commit_layout(layout);

    let mut rendered = 0;
    egui::__run_test_ui(|ui| {
        rendered = dash.grid_ui(ui, &DataState::Loading).rendered;
    });
    assert_eq!(rendered, 5);
}

#[test]
fn hidden_widgets_are_not_rendered() {
    let mut dash = dashboard(DashboardModule::Crm);
    dash.toggle_visibility("revenueTrend");
    let mut rendered = 0;
    egui::__run_test_ui(|ui| {
        rendered = dash.grid_ui(ui, &DataState::Loading).rendered;
    });
    assert_eq!(rendered, 11);
}

#[test]
fn reset_remounts_and_restores_defaults() {
    let mut dash = dashboard(DashboardModule::People);
    dash.toggle_visibility("skillsGap");
    dash.reset_active_module();
    assert_eq!(dash.active_config().visible_count(), 7);
    assert!(!dash.surface().is_dragging());
}

#[test]
fn extreme_stored_geometry_still_renders() {
    let stored = [
        r#"[{"i":"jobStatus","x":4294967295,"y":0,"w":4,"h":5,"minW":1,"minH":1}]"#,
        r#"[{"i":"jobStatus","x":0,"y":4294967295,"w":4294967295,"h":4294967295}]"#,
    ];
    for json in stored {
        let mut storage = MemoryStore::new();
        storage
            .set(&layout_key(DashboardModule::Recruitment, LAYOUT_SCHEMA_VERSION), json)
            .unwrap();
        let mut dash = Dashboard::new(
            WidgetConfigStore::new(storage),
            WidgetRenderers::with_defaults(),
            DashboardModule::Recruitment,
        );
        let job = dash.active_config().layout()[0].clone();
        assert!(job.x + job.w <= 12, "{json}");

        let mut rendered = 0;
        egui::__run_test_ui(|ui| {
            rendered = dash.grid_ui(ui, &DataState::Loading).rendered;
        });
        assert_eq!(rendered, 5, "{json}");
    }
}
