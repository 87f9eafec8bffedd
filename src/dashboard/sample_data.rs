//! Static aggregates so the dashboard runs without a backend.

use crate::dashboard::metrics::{MetricsFilter, MetricsProvider, ModuleMetrics};
use crate::dashboard::module::{BusinessUnit, DashboardModule};
use serde_json::{json, Value};

#[derive(Debug, Clone, Copy, Default)]
pub struct SampleMetricsProvider;

/// Share of the company-wide totals attributed to a business unit.
fn unit_share(unit: BusinessUnit) -> f64 {
    match unit {
        BusinessUnit::All => 1.0,
        BusinessUnit::BuA => 0.42,
        BusinessUnit::BuB => 0.27,
        BusinessUnit::BuC => 0.18,
        BusinessUnit::BuD => 0.13,
    }
}

fn scaled(value: f64, share: f64) -> f64 {
    (value * share).round()
}

impl MetricsProvider for SampleMetricsProvider {
    fn fetch(&self, module: DashboardModule, filter: &MetricsFilter) -> anyhow::Result<ModuleMetrics> {
        let today = chrono::Local::now().date_naive();
        let period = filter.date_range.bounds(today);
        let share = unit_share(filter.business_unit);
        let metrics = ModuleMetrics::new(module, period);
        let sections = match module {
            DashboardModule::People => people(share),
            DashboardModule::Crm => crm(share),
            DashboardModule::Recruitment => recruitment(share),
            DashboardModule::ProjectManagement => project_management(share),
        };
        Ok(sections
            .into_iter()
            .fold(metrics, |m, (id, value)| m.with_section(id, value)))
    }
}

fn people(s: f64) -> Vec<(&'static str, Value)> {
    vec![
        (
            "talentRiskScore",
            json!({"earlyExits": scaled(14.0, s), "earlyAttritionRate": 6.8, "trend": "down"}),
        ),
        (
            "exitByTypeAndReason",
            json!({
                "resignation": scaled(38.0, s),
                "termination": scaled(11.0, s),
                "reasons": {"Compensation": scaled(16.0, s), "Career growth": scaled(12.0, s), "Relocation": scaled(6.0, s)}
            }),
        ),
        (
            "attritionAnalysis",
            json!({"regrettable": scaled(21.0, s), "nonRegrettable": scaled(28.0, s), "peakMonth": "Mar"}),
        ),
        (
            "skillsGap",
            json!({"Cloud": 62, "Data engineering": 55, "Security": 48, "Product design": 71}),
        ),
        (
            "attritionMetrics",
            json!({"totalExits": scaled(49.0, s), "avgMonthlyExitRate": 1.4}),
        ),
        (
            "managerWatchlist",
            json!([
                {"manager": "R. Iyer", "exits": 5, "teamSize": 18},
                {"manager": "M. Chen", "exits": 4, "teamSize": 22},
                {"manager": "A. Okafor", "exits": 3, "teamSize": 9}
            ]),
        ),
        (
            "topEmployees",
            json!([
                {"name": "Priya Nair", "badges": 14},
                {"name": "Tom Becker", "badges": 11},
                {"name": "Lucia Gomez", "badges": 9}
            ]),
        ),
    ]
}

fn crm(s: f64) -> Vec<(&'static str, Value)> {
    vec![
        (
            "crmSummaryCards",
            json!({
                "won": scaled(4_850_000.0, s),
                "invoiced": scaled(4_120_000.0, s),
                "collected": scaled(3_560_000.0, s),
                "outstanding": scaled(560_000.0, s),
                "unbilled": scaled(730_000.0, s)
            }),
        ),
        (
            "revenueTrend",
            json!({"Q1": scaled(1_040_000.0, s), "Q2": scaled(1_180_000.0, s), "Q3": scaled(1_260_000.0, s), "Q4": scaled(1_370_000.0, s)}),
        ),
        (
            "avgDaysToPay",
            json!({"avgDays": 38, "previousAvgDays": 44, "onTimeRate": 0.81}),
        ),
        (
            "crmFunnelSwitcher",
            json!({
                "leads": {"new": scaled(420.0, s), "qualified": scaled(260.0, s), "converted": scaled(118.0, s)},
                "deals": {"proposal": scaled(96.0, s), "negotiation": scaled(54.0, s), "won": scaled(31.0, s)}
            }),
        ),
        (
            "salesMetrics",
            json!({"avgDealSize": 156_000, "avgSalesCycleDays": 47}),
        ),
        (
            "receivablesAging",
            json!({"0-30": scaled(310_000.0, s), "31-60": scaled(140_000.0, s), "61-90": scaled(70_000.0, s), "90+": scaled(40_000.0, s)}),
        ),
        (
            "crmPipelineSummaries",
            json!({"openLeads": scaled(302.0, s), "openDeals": scaled(150.0, s), "winRate": 0.36, "lossRate": 0.22}),
        ),
        (
            "collectionEfficiency",
            json!({"score": 86, "previousScore": 82}),
        ),
        (
            "collectionGoalCard",
            json!({"target": scaled(4_000_000.0, s), "collected": scaled(3_560_000.0, s), "progress": 0.89}),
        ),
        (
            "revenueSourceMix",
            json!({"newClients": 0.34, "existingClients": 0.66}),
        ),
        (
            "lostDealAnalysis",
            json!({"Price": scaled(12.0, s), "Timing": scaled(8.0, s), "Competitor": scaled(7.0, s), "No decision": scaled(5.0, s)}),
        ),
        (
            "topRevenueContributors",
            json!([
                {"client": "Northwind Traders", "revenue": scaled(920_000.0, s)},
                {"client": "Contoso Ltd", "revenue": scaled(780_000.0, s)},
                {"client": "Fabrikam", "revenue": scaled(540_000.0, s)}
            ]),
        ),
    ]
}

fn recruitment(s: f64) -> Vec<(&'static str, Value)> {
    vec![
        (
            "recruitmentSummaryCards",
            json!({
                "totalCandidates": scaled(1_240.0, s),
                "hires": scaled(64.0, s),
                "hiringEfficiency": 0.72,
                "openRoles": scaled(23.0, s)
            }),
        ),
        (
            "stageConversion",
            json!({
                "applied": scaled(1_240.0, s),
                "screened": scaled(610.0, s),
                "interviewed": scaled(240.0, s),
                "offered": scaled(82.0, s),
                "joined": scaled(64.0, s)
            }),
        ),
        (
            "recruitmentVelocity",
            json!({"avgTimeToHireDays": 29, "avgTimeToFillDays": 41}),
        ),
        (
            "jobStatus",
            json!({"open": scaled(23.0, s), "onHold": scaled(5.0, s), "closed": scaled(48.0, s)}),
        ),
        (
            "offerAcceptance",
            json!({"accepted": scaled(64.0, s), "declined": scaled(11.0, s), "pending": scaled(7.0, s)}),
        ),
    ]
}

fn project_management(s: f64) -> Vec<(&'static str, Value)> {
    vec![
        (
            "resourceAllocationCentral",
            json!({
                "allocated": scaled(412.0, s),
                "available": scaled(57.0, s),
                "utilization": 0.84,
                "bench": scaled(18.0, s)
            }),
        ),
        (
            "pmHealthBreakdown",
            json!({
                "fixedCost": {"onTrack": 18, "atRisk": 4},
                "hourly": {"onTrack": 26, "atRisk": 3},
                "hirebase": {"onTrack": 31, "atRisk": 2}
            }),
        ),
        (
            "revenueLeakage",
            json!([
                {"project": "Atlas Migration", "leakage": scaled(84_000.0, s)},
                {"project": "Helios Portal", "leakage": scaled(51_000.0, s)}
            ]),
        ),
        (
            "topEffortConsumers",
            json!([
                {"project": "Atlas Migration", "hours": scaled(3_420.0, s)},
                {"project": "Orion Analytics", "hours": scaled(2_870.0, s)},
                {"project": "Helios Portal", "hours": scaled(2_150.0, s)}
            ]),
        ),
        (
            "upcomingExpirations",
            json!({"contracts": scaled(6.0, s), "hirebaseAssignments": scaled(9.0, s), "withinDays": 30}),
        ),
        (
            "timesheetCompliance",
            json!({"Engineering": 0.93, "Design": 0.88, "QA": 0.79}),
        ),
        (
            "missingAllocations",
            json!({"unloggedToday": scaled(17.0, s), "benchResources": scaled(18.0, s)}),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::registry::registry_for;

    #[test]
    fn every_registered_widget_has_a_section() {
        let provider = SampleMetricsProvider;
        for module in DashboardModule::ALL {
            let metrics = provider.fetch(module, &MetricsFilter::default()).unwrap();
            for w in registry_for(module) {
                assert!(metrics.section(w.id).is_some(), "{module}/{}", w.id);
            }
        }
    }

    #[test]
    fn business_unit_scales_totals() {
        let provider = SampleMetricsProvider;
        let all = provider
            .fetch(DashboardModule::Crm, &MetricsFilter::default())
            .unwrap();
        let unit = provider
            .fetch(
                DashboardModule::Crm,
                &MetricsFilter::new(Default::default(), BusinessUnit::BuD),
            )
            .unwrap();
        let won = |m: &ModuleMetrics| m.section("crmSummaryCards").unwrap()["won"].as_f64().unwrap();
        assert!(won(&unit) < won(&all));
    }
}
