pub mod config;
pub mod dashboard;
pub mod grid;
pub mod layout;
pub mod metrics;
pub mod module;
pub mod panel;
pub mod registry;
pub mod sample_data;
pub mod widgets;

pub use config::{ModuleConfig, WidgetConfigStore, LAYOUT_SCHEMA_VERSION};
pub use dashboard::Dashboard;
pub use grid::GridSurface;
pub use layout::{Breakpoint, LayoutItem};
pub use metrics::{DataState, MetricsFeed, MetricsFilter, MetricsProvider, ModuleMetrics};
pub use module::{BusinessUnit, DashboardModule, DateRange};
pub use panel::ConfigPanel;
pub use registry::{registry_for, WidgetDefinition};
pub use sample_data::SampleMetricsProvider;
pub use widgets::{Widget, WidgetFactory, WidgetRenderers};
