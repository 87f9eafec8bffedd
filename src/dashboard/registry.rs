//! Static catalog of the widgets each dashboard module offers.

use crate::dashboard::module::DashboardModule;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WidgetDefinition {
    pub id: &'static str,
    pub label: &'static str,
    pub description: &'static str,
}

const fn def(id: &'static str, label: &'static str, description: &'static str) -> WidgetDefinition {
    WidgetDefinition {
        id,
        label,
        description,
    }
}

const PEOPLE: &[WidgetDefinition] = &[
    def(
        "talentRiskScore",
        "Early Attrition",
        "Tracks early attrition rate of employees who left within 90 days.",
    ),
    def(
        "exitByTypeAndReason",
        "Exit by Type & Reason",
        "Breakdown of exits by resignation vs termination and root cause.",
    ),
    def(
        "attritionAnalysis",
        "Exit Trend",
        "Monthly trend of employee exits categorized by regrettable/non-regrettable.",
    ),
    def(
        "skillsGap",
        "Critical Skills Gap",
        "Heatmap of skill proficiency levels across domains.",
    ),
    def(
        "attritionMetrics",
        "Exit Metrics",
        "KPIs for total exits and average monthly exit rate.",
    ),
    def(
        "managerWatchlist",
        "Manager Watchlist",
        "Managers with the highest turnover in their teams.",
    ),
    def(
        "topEmployees",
        "Top Recognized",
        "Top performing employees ranked by peer recognition badges.",
    ),
];

const CRM: &[WidgetDefinition] = &[
    def(
        "crmSummaryCards",
        "CRM Summary Cards",
        "Top-line KPIs: Won, Invoiced, Collected, Outstanding, Unbilled.",
    ),
    def("revenueTrend", "Revenue Trend", "Monthly revenue trend line chart."),
    def(
        "avgDaysToPay",
        "Avg. Days to Pay",
        "Average collection cycle time and payment efficiency.",
    ),
    def(
        "crmFunnelSwitcher",
        "Pipeline Funnel",
        "Lead and deal funnel stage conversion visualization.",
    ),
    def(
        "salesMetrics",
        "Sales Metrics",
        "Average deal size and sales cycle length.",
    ),
    def(
        "receivablesAging",
        "Receivables Aging",
        "Outstanding receivables bucketed by aging period.",
    ),
    def(
        "crmPipelineSummaries",
        "Pipeline Summaries",
        "Aggregated lead and deal counts with win/loss ratios.",
    ),
    def(
        "collectionEfficiency",
        "Collection Efficiency",
        "Score and trend for cash collection efficiency.",
    ),
    def(
        "collectionGoalCard",
        "Collection Goal",
        "Progress towards the annual collection target.",
    ),
    def(
        "revenueSourceMix",
        "Revenue Source Mix",
        "Split between new vs existing client revenue.",
    ),
    def(
        "lostDealAnalysis",
        "Lost Deal Analysis",
        "Root causes for deals that were lost in the pipeline.",
    ),
    def(
        "topRevenueContributors",
        "Top Revenue Contributors",
        "Client-wise breakdown of revenue contributions.",
    ),
];

const RECRUITMENT: &[WidgetDefinition] = &[
    def(
        "recruitmentSummaryCards",
        "Recruitment KPIs",
        "Top-line cards: Total Candidates, Hires, Efficiency, Open Roles.",
    ),
    def(
        "stageConversion",
        "Stage Conversion",
        "Candidate funnel from application to joining.",
    ),
    def(
        "recruitmentVelocity",
        "Recruitment Velocity",
        "Speed and efficiency of the hiring pipeline.",
    ),
    def(
        "jobStatus",
        "Job Status",
        "Current status of all open and closed job positions.",
    ),
    def(
        "offerAcceptance",
        "Offer Acceptance",
        "Ratio of accepted vs declined/pending offers.",
    ),
];

const PROJECT_MANAGEMENT: &[WidgetDefinition] = &[
    def(
        "resourceAllocationCentral",
        "Resource Availability",
        "Bird's-eye view of team allocation, availability, and utilization.",
    ),
    def(
        "pmHealthBreakdown",
        "Project Delivery Health",
        "Health scores across Fixed Cost, Hourly, and Hirebase projects.",
    ),
    def(
        "revenueLeakage",
        "Revenue Leakage Risk",
        "Projects exceeding budget targets, flagged by leakage amount.",
    ),
    def(
        "topEffortConsumers",
        "Top Effort Consumers",
        "Projects consuming the most team hours this period.",
    ),
    def(
        "upcomingExpirations",
        "Upcoming Expirations",
        "Contracts and hirebase assignments expiring soon.",
    ),
    def(
        "timesheetCompliance",
        "Timesheet Compliance",
        "Departments with unapproved or missing timesheet logs.",
    ),
    def(
        "missingAllocations",
        "Missing Logs",
        "Daily unlogged allocations and bench resources by department.",
    ),
];

/// Widgets offered by `module`, in display order.
pub fn registry_for(module: DashboardModule) -> &'static [WidgetDefinition] {
    match module {
        DashboardModule::People => PEOPLE,
        DashboardModule::Crm => CRM,
        DashboardModule::Recruitment => RECRUITMENT,
        DashboardModule::ProjectManagement => PROJECT_MANAGEMENT,
    }
}

/// Same as [`registry_for`] but keyed by the raw module identifier. Unknown
/// identifiers yield an empty catalog.
pub fn registry_for_key(key: &str) -> &'static [WidgetDefinition] {
    DashboardModule::from_key(key)
        .map(registry_for)
        .unwrap_or(&[])
}

pub fn find_widget(module: DashboardModule, id: &str) -> Option<&'static WidgetDefinition> {
    registry_for(module).iter().find(|w| w.id == id)
}

pub fn is_registered(module: DashboardModule, id: &str) -> bool {
    find_widget(module, id).is_some()
}
