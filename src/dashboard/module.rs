use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Business domain shown by the dashboard. Each module owns an independent
/// widget catalog, layout and visibility map.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum DashboardModule {
    People,
    Crm,
    Recruitment,
    ProjectManagement,
}

impl Default for DashboardModule {
    fn default() -> Self {
        Self::Crm
    }
}

impl DashboardModule {
    pub const ALL: [DashboardModule; 4] = [
        DashboardModule::People,
        DashboardModule::Crm,
        DashboardModule::Recruitment,
        DashboardModule::ProjectManagement,
    ];

    /// Identifier used in storage keys.
    pub fn as_str(&self) -> &'static str {
        match self {
            DashboardModule::People => "people",
            DashboardModule::Crm => "crm",
            DashboardModule::Recruitment => "recruitment",
            DashboardModule::ProjectManagement => "project_management",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DashboardModule::People => "People",
            DashboardModule::Crm => "CRM & Invoice",
            DashboardModule::Recruitment => "Recruitment",
            DashboardModule::ProjectManagement => "Project Management",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.as_str() == key)
    }
}

impl std::fmt::Display for DashboardModule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum DateRange {
    ThisQuarter,
    LastQuarter,
    Ytd,
    ThisYear,
    LastYear,
}

impl Default for DateRange {
    fn default() -> Self {
        Self::LastYear
    }
}

impl DateRange {
    pub const ALL: [DateRange; 5] = [
        DateRange::ThisQuarter,
        DateRange::LastQuarter,
        DateRange::Ytd,
        DateRange::ThisYear,
        DateRange::LastYear,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            DateRange::ThisQuarter => "This Quarter",
            DateRange::LastQuarter => "Last Quarter",
            DateRange::Ytd => "Year to Date",
            DateRange::ThisYear => "This Year",
            DateRange::LastYear => "Last Year",
        }
    }

    /// Inclusive `(start, end)` dates covered by the range relative to `today`.
    ///
    /// Open-ended ranges (`this_quarter`, `ytd`) end on `today`. The quarter
    /// before Q1 is the previous year's Q4.
    pub fn bounds(&self, today: NaiveDate) -> (NaiveDate, NaiveDate) {
        let year = today.year();
        let quarter_start_month = (today.month0() / 3) * 3 + 1;
        match self {
            DateRange::ThisQuarter => (ymd(year, quarter_start_month, 1), today),
            DateRange::LastQuarter => {
                let (start_year, start_month) = if quarter_start_month == 1 {
                    (year - 1, 10)
                } else {
                    (year, quarter_start_month - 3)
                };
                let start = ymd(start_year, start_month, 1);
                let end = ymd(year, quarter_start_month, 1)
                    .pred_opt()
                    .unwrap_or(start);
                (start, end)
            }
            DateRange::Ytd => (ymd(year, 1, 1), today),
            DateRange::ThisYear => (ymd(year, 1, 1), ymd(year, 12, 31)),
            DateRange::LastYear => (ymd(year - 1, 1, 1), ymd(year - 1, 12, 31)),
        }
    }
}

fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or(NaiveDate::MIN)
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum BusinessUnit {
    All,
    BuA,
    BuB,
    BuC,
    BuD,
}

impl Default for BusinessUnit {
    fn default() -> Self {
        Self::All
    }
}

impl BusinessUnit {
    pub const ALL: [BusinessUnit; 5] = [
        BusinessUnit::All,
        BusinessUnit::BuA,
        BusinessUnit::BuB,
        BusinessUnit::BuC,
        BusinessUnit::BuD,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            BusinessUnit::All => "All Business Units",
            BusinessUnit::BuA => "Engineering",
            BusinessUnit::BuB => "Sales & Marketing",
            BusinessUnit::BuC => "Finance & Admin",
            BusinessUnit::BuD => "Legal & HR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn module_keys_round_trip() {
        for module in DashboardModule::ALL {
            assert_eq!(DashboardModule::from_key(module.as_str()), Some(module));
        }
        assert_eq!(DashboardModule::from_key("finance"), None);
    }

    #[test]
    fn module_serializes_as_storage_key() {
        let json = serde_json::to_string(&DashboardModule::ProjectManagement).unwrap();
        assert_eq!(json, "\"project_management\"");
    }

    #[test]
    fn last_quarter_in_first_quarter_wraps_to_previous_year() {
        let (start, end) = DateRange::LastQuarter.bounds(date(2026, 2, 14));
        assert_eq!(start, date(2025, 10, 1));
        assert_eq!(end, date(2025, 12, 31));
    }

    #[test]
    fn last_quarter_mid_year() {
        let (start, end) = DateRange::LastQuarter.bounds(date(2026, 8, 3));
        assert_eq!(start, date(2026, 4, 1));
        assert_eq!(end, date(2026, 6, 30));
    }

    #[test]
    fn open_ended_ranges_end_today() {
        let today = date(2026, 10, 18);
        assert_eq!(DateRange::Ytd.bounds(today), (date(2026, 1, 1), today));
        assert_eq!(DateRange::ThisQuarter.bounds(today), (date(2026, 10, 1), today));
        assert_eq!(
            DateRange::LastYear.bounds(today),
            (date(2025, 1, 1), date(2025, 12, 31))
        );
    }
}
