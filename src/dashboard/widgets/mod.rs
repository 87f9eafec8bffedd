use crate::dashboard::module::DashboardModule;
use crate::dashboard::registry::registry_for;
use eframe::egui;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

mod kpi_cards;
mod section_table;

pub use kpi_cards::KpiCardsWidget;
pub use section_table::{flatten_section, SectionTableWidget};

/// Widget trait implemented by all dashboard widgets.
pub trait Widget: Send {
    /// Draw the widget body for its slice of the module aggregate.
    fn render(&mut self, ui: &mut egui::Ui, section: &Value);
}

/// Builds fresh widget instances. Instances live as long as the grid that
/// mounted them.
#[derive(Clone)]
pub struct WidgetFactory {
    ctor: Arc<dyn Fn() -> Box<dyn Widget> + Send + Sync>,
}

impl WidgetFactory {
    pub fn new<T: Widget + 'static>(build: fn() -> T) -> Self {
        Self {
            ctor: Arc::new(move || Box::new(build())),
        }
    }

    pub fn create(&self) -> Box<dyn Widget> {
        (self.ctor)()
    }
}

/// Renderer lookup keyed by module and widget id.
#[derive(Clone, Default)]
pub struct WidgetRenderers {
    factories: HashMap<(DashboardModule, String), WidgetFactory>,
}

impl WidgetRenderers {
    pub fn with_defaults() -> Self {
        let mut renderers = Self::default();
        for module in DashboardModule::ALL {
            for def in registry_for(module) {
                let factory = if def.id.ends_with("SummaryCards") {
                    WidgetFactory::new(KpiCardsWidget::new)
                } else {
                    WidgetFactory::new(SectionTableWidget::new)
                };
                renderers.register(module, def.id, factory);
            }
        }
        renderers
    }

    pub fn register(&mut self, module: DashboardModule, id: &str, factory: WidgetFactory) {
        self.factories.insert((module, id.to_string()), factory);
    }

    pub fn unregister(&mut self, module: DashboardModule, id: &str) {
        self.factories.remove(&(module, id.to_string()));
    }

    pub fn contains(&self, module: DashboardModule, id: &str) -> bool {
        self.factories.contains_key(&(module, id.to_string()))
    }

    pub fn create(&self, module: DashboardModule, id: &str) -> Option<Box<dyn Widget>> {
        self.factories
            .get(&(module, id.to_string()))
            .map(|f| f.create())
    }
}

/// Display text for a scalar JSON value. Whole numbers get thousands
/// separators, fractions keep two decimals.
pub fn format_scalar(value: &Value) -> String {
    match value {
        Value::Null => "-".into(),
        Value::Bool(b) => b.to_string(),
        Value::String(s) => s.clone(),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                group_thousands(i)
            } else if let Some(f) = n.as_f64() {
                if f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
                    group_thousands(f as i64)
                } else {
                    format!("{f:.2}")
                }
            } else {
                n.to_string()
            }
        }
        Value::Array(items) => format!("{} items", items.len()),
        Value::Object(map) => format!("{} fields", map.len()),
    }
}

fn group_thousands(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if n < 0 {
        out.insert(0, '-');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn defaults_cover_every_registered_widget() {
        let renderers = WidgetRenderers::with_defaults();
        for module in DashboardModule::ALL {
            for def in registry_for(module) {
                assert!(renderers.contains(module, def.id), "{module}/{}", def.id);
            }
        }
        assert!(!renderers.contains(DashboardModule::People, "revenueTrend"));
    }

    #[test]
    fn unregistered_renderer_yields_none() {
        let mut renderers = WidgetRenderers::with_defaults();
        renderers.unregister(DashboardModule::Crm, "avgDaysToPay");
        assert!(renderers.create(DashboardModule::Crm, "avgDaysToPay").is_none());
        assert!(renderers.create(DashboardModule::Crm, "revenueTrend").is_some());
    }

    #[test]
    fn scalars_are_formatted_for_display() {
        assert_eq!(format_scalar(&json!(4850000)), "4,850,000");
        assert_eq!(format_scalar(&json!(-1200)), "-1,200");
        assert_eq!(format_scalar(&json!(920000.0)), "920,000");
        assert_eq!(format_scalar(&json!(0.36)), "0.36");
        assert_eq!(format_scalar(&json!("down")), "down");
        assert_eq!(format_scalar(&json!([1, 2])), "2 items");
    }
}
