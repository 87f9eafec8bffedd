use super::{format_scalar, Widget};
use eframe::egui;
use serde_json::Value;

/// Row of headline figures, one card per top-level field.
#[derive(Default)]
pub struct KpiCardsWidget;

impl KpiCardsWidget {
    pub fn new() -> Self {
        Self
    }
}

fn title_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for (i, ch) in key.chars().enumerate() {
        if i == 0 {
            out.extend(ch.to_uppercase());
        } else if ch.is_uppercase() {
            out.push(' ');
            out.push(ch);
        } else {
            out.push(ch);
        }
    }
    out
}

impl Widget for KpiCardsWidget {
    fn render(&mut self, ui: &mut egui::Ui, section: &Value) {
        let Some(fields) = section.as_object() else {
            ui.weak("No data");
            return;
        };
        ui.horizontal_wrapped(|ui| {
            for (key, value) in fields {
                egui::Frame::group(ui.style()).show(ui, |ui| {
                    ui.vertical(|ui| {
                        ui.small(title_case(key));
                        ui.heading(format_scalar(value));
                    });
                });
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn camel_case_keys_become_titles() {
        assert_eq!(title_case("totalCandidates"), "Total Candidates");
        assert_eq!(title_case("won"), "Won");
    }
}
