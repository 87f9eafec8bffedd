use super::{format_scalar, Widget};
use eframe::egui;
use serde_json::{Map, Value};

/// Generic renderer: a striped key/value grid of the widget's section.
#[derive(Default)]
pub struct SectionTableWidget;

impl SectionTableWidget {
    pub fn new() -> Self {
        Self
    }
}

/// Rows shown for a section. Nested objects are flattened one level, arrays
/// of records become one row per record labelled by its first text field.
pub fn flatten_section(section: &Value) -> Vec<(String, String)> {
    match section {
        Value::Object(map) => {
            let mut rows = Vec::new();
            for (key, value) in map {
                match value {
                    Value::Object(inner) => {
                        for (sub, v) in inner {
                            rows.push((format!("{key} / {sub}"), format_scalar(v)));
                        }
                    }
                    other => rows.push((key.clone(), format_scalar(other))),
                }
            }
            rows
        }
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(idx, item)| match item {
                Value::Object(record) => record_row(idx, record),
                other => (format!("#{}", idx + 1), format_scalar(other)),
            })
            .collect(),
        scalar => vec![("value".into(), format_scalar(scalar))],
    }
}

fn record_row(idx: usize, record: &Map<String, Value>) -> (String, String) {
    let title = record.iter().find_map(|(k, v)| v.as_str().map(|s| (k, s)));
    let label = title
        .map(|(_, s)| s.to_string())
        .unwrap_or_else(|| format!("#{}", idx + 1));
    let details = record
        .iter()
        .filter(|(k, _)| Some(*k) != title.map(|(key, _)| key))
        .map(|(k, v)| format!("{k}: {}", format_scalar(v)))
        .collect::<Vec<_>>()
        .join(", ");
    (label, details)
}

impl Widget for SectionTableWidget {
    fn render(&mut self, ui: &mut egui::Ui, section: &Value) {
        let rows = flatten_section(section);
        if rows.is_empty() {
            ui.weak("No data");
            return;
        }
        egui::Grid::new("section_table")
            .striped(true)
            .num_columns(2)
            .show(ui, |ui| {
                for (key, value) in rows {
                    ui.label(key);
                    ui.strong(value);
                    ui.end_row();
                }
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn nested_objects_flatten_one_level() {
        let rows = flatten_section(&json!({
            "won": 31,
            "leads": {"new": 420, "qualified": 260}
        }));
        assert!(rows.contains(&("won".into(), "31".into())));
        assert!(rows.contains(&("leads / new".into(), "420".into())));
        assert!(rows.contains(&("leads / qualified".into(), "260".into())));
    }

    #[test]
    fn record_arrays_use_first_text_field_as_label() {
        let rows = flatten_section(&json!([
            {"client": "Fabrikam", "revenue": 540000},
            {"revenue": 12}
        ]));
        assert_eq!(rows[0], ("Fabrikam".into(), "revenue: 540,000".into()));
        assert_eq!(rows[1], ("#2".into(), "revenue: 12".into()));
    }

    #[test]
    fn renders_empty_object_without_panicking() {
        let mut widget = SectionTableWidget::new();
        egui::__run_test_ui(|ui| {
            widget.render(ui, &json!({}));
            widget.render(ui, &json!({"a": 1}));
        });
    }
}
