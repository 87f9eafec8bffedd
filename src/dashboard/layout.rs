use crate::dashboard::module::DashboardModule;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

fn default_min() -> u32 {
    1
}

/// Grid placement of one widget. Serialised with the field names used by the
/// persisted layout documents (`i`, `minW`, `minH`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct LayoutItem {
    pub i: String,
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
    #[serde(default = "default_min")]
    pub min_w: u32,
    #[serde(default = "default_min")]
    pub min_h: u32,
}

impl LayoutItem {
    pub fn new(id: &str, x: u32, y: u32, w: u32, h: u32) -> Self {
        Self {
            i: id.to_string(),
            x,
            y,
            w,
            h,
            min_w: default_min(),
            min_h: default_min(),
        }
    }

    pub fn with_min(mut self, min_w: u32, min_h: u32) -> Self {
        self.min_w = min_w;
        self.min_h = min_h;
        self
    }

    pub fn bottom(&self) -> u32 {
        self.y.saturating_add(self.h)
    }

    /// True when the two footprints share at least one grid cell.
    pub fn overlaps(&self, other: &LayoutItem) -> bool {
        self.x < other.x.saturating_add(other.w)
            && other.x < self.x.saturating_add(self.w)
            && self.y < other.bottom()
            && other.y < self.bottom()
    }
}

/// Named viewport width thresholds. Every breakpoint reuses the same layout
/// sequence, only the column count changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Breakpoint {
    Lg,
    Md,
    Sm,
    Xs,
    Xxs,
}

impl Breakpoint {
    pub const ALL: [Breakpoint; 5] = [
        Breakpoint::Lg,
        Breakpoint::Md,
        Breakpoint::Sm,
        Breakpoint::Xs,
        Breakpoint::Xxs,
    ];

    pub fn min_width(&self) -> f32 {
        match self {
            Breakpoint::Lg => 1200.0,
            Breakpoint::Md => 996.0,
            Breakpoint::Sm => 768.0,
            Breakpoint::Xs => 480.0,
            Breakpoint::Xxs => 0.0,
        }
    }

    pub fn cols(&self) -> u32 {
        match self {
            Breakpoint::Lg => 12,
            Breakpoint::Md => 10,
            Breakpoint::Sm => 6,
            Breakpoint::Xs => 4,
            Breakpoint::Xxs => 2,
        }
    }

    pub fn for_width(width: f32) -> Self {
        Self::ALL
            .into_iter()
            .find(|bp| width >= bp.min_width())
            .unwrap_or(Breakpoint::Xxs)
    }
}

// (id, x, y, w, h, min_w, min_h)
type Placement = (&'static str, u32, u32, u32, u32, u32, u32);

const PEOPLE_LAYOUT: &[Placement] = &[
    ("talentRiskScore", 0, 0, 3, 8, 3, 6),
    ("exitByTypeAndReason", 0, 8, 3, 10, 3, 8),
    ("attritionAnalysis", 3, 0, 6, 10, 4, 8),
    ("skillsGap", 3, 10, 6, 10, 4, 8),
    ("attritionMetrics", 9, 0, 3, 6, 3, 5),
    ("managerWatchlist", 9, 6, 3, 7, 3, 6),
    ("topEmployees", 9, 13, 3, 8, 3, 6),
];

const CRM_LAYOUT: &[Placement] = &[
    ("crmSummaryCards", 0, 0, 12, 4, 6, 4),
    ("revenueTrend", 0, 4, 12, 9, 6, 8),
    ("crmFunnelSwitcher", 0, 13, 8, 14, 6, 12),
    ("crmPipelineSummaries", 8, 13, 4, 7, 3, 6),
    ("salesMetrics", 8, 20, 4, 7, 3, 6),
    ("receivablesAging", 0, 27, 4, 10, 3, 8),
    ("avgDaysToPay", 4, 27, 4, 10, 3, 8),
    ("collectionEfficiency", 8, 27, 2, 10, 2, 8),
    ("collectionGoalCard", 10, 27, 2, 10, 2, 8),
    ("revenueSourceMix", 0, 37, 6, 10, 4, 8),
    ("lostDealAnalysis", 6, 37, 6, 10, 4, 8),
    ("topRevenueContributors", 0, 47, 12, 11, 6, 9),
];

const RECRUITMENT_LAYOUT: &[Placement] = &[
    ("recruitmentSummaryCards", 0, 0, 12, 4, 6, 4),
    ("stageConversion", 0, 4, 4, 10, 3, 8),
    ("recruitmentVelocity", 4, 4, 4, 10, 3, 8),
    ("jobStatus", 8, 4, 4, 5, 3, 5),
    ("offerAcceptance", 8, 9, 4, 5, 3, 5),
];

const PROJECT_MANAGEMENT_LAYOUT: &[Placement] = &[
    ("resourceAllocationCentral", 0, 0, 8, 10, 6, 8),
    ("missingAllocations", 8, 0, 4, 10, 3, 8),
    ("pmHealthBreakdown", 0, 10, 4, 8, 3, 6),
    ("topEffortConsumers", 4, 10, 4, 8, 3, 6),
    ("upcomingExpirations", 8, 10, 4, 8, 3, 6),
    ("revenueLeakage", 0, 18, 6, 9, 4, 7),
    ("timesheetCompliance", 6, 18, 6, 9, 4, 7),
];

/// Default placement of every widget of `module`.
pub fn default_layout_for(module: DashboardModule) -> Vec<LayoutItem> {
    let table = match module {
        DashboardModule::People => PEOPLE_LAYOUT,
        DashboardModule::Crm => CRM_LAYOUT,
        DashboardModule::Recruitment => RECRUITMENT_LAYOUT,
        DashboardModule::ProjectManagement => PROJECT_MANAGEMENT_LAYOUT,
    };
    table
        .iter()
        .map(|&(id, x, y, w, h, min_w, min_h)| LayoutItem::new(id, x, y, w, h).with_min(min_w, min_h))
        .collect()
}

/// Unknown module identifiers resolve to an empty layout.
pub fn default_layout_for_key(key: &str) -> Vec<LayoutItem> {
    DashboardModule::from_key(key)
        .map(default_layout_for)
        .unwrap_or_default()
}

/// Widest grid any breakpoint uses.
pub const MAX_COLS: u32 = 12;
/// Tallest a single item may be, in rows.
pub const MAX_ITEM_ROWS: u32 = 100;

/// Pull a stored item back inside the widest grid. Items already in range
/// are returned unchanged.
pub fn clamp_persisted(mut item: LayoutItem) -> LayoutItem {
    item.w = item.w.clamp(1, MAX_COLS);
    item.x = item.x.min(MAX_COLS - item.w);
    item.h = item.h.clamp(1, MAX_ITEM_ROWS);
    item.min_w = item.min_w.clamp(1, MAX_COLS);
    item.min_h = item.min_h.clamp(1, MAX_ITEM_ROWS);
    item
}

/// Additive union of a persisted layout with the current defaults.
///
/// Persisted entries keep their positions, clamped into the grid; default
/// entries whose id is not persisted are appended. Repeated ids keep their
/// first occurrence.
pub fn reconcile(persisted: Vec<LayoutItem>, defaults: &[LayoutItem]) -> Vec<LayoutItem> {
    let mut seen = HashSet::new();
    let mut merged: Vec<LayoutItem> = persisted
        .into_iter()
        .filter(|item| seen.insert(item.i.clone()))
        .map(clamp_persisted)
        .collect();
    for item in defaults {
        if seen.insert(item.i.clone()) {
            merged.push(item.clone());
        }
    }
    merged
}

/// Overlay the positions in `updated` onto `stored`, keeping the order of
/// `stored` and leaving entries absent from `updated` untouched.
pub fn merge_positions(stored: &[LayoutItem], updated: &[LayoutItem]) -> Vec<LayoutItem> {
    let by_id: HashMap<&str, &LayoutItem> = updated.iter().map(|it| (it.i.as_str(), it)).collect();
    let mut merged: Vec<LayoutItem> = stored
        .iter()
        .map(|item| {
            by_id
                .get(item.i.as_str())
                .map(|&it| it.clone())
                .unwrap_or_else(|| item.clone())
        })
        .collect();
    for item in updated {
        if !stored.iter().any(|s| s.i == item.i) {
            merged.push(item.clone());
        }
    }
    merged
}

fn bound(item: &mut LayoutItem, cols: u32) {
    item.w = item.w.clamp(1, cols);
    item.h = item.h.max(1);
    if item.x.saturating_add(item.w) > cols {
        item.x = cols - item.w;
    }
}

fn bottom(items: &[LayoutItem]) -> u32 {
    items.iter().map(LayoutItem::bottom).max().unwrap_or(0)
}

fn first_collision<'a>(placed: &'a [LayoutItem], item: &LayoutItem) -> Option<&'a LayoutItem> {
    placed.iter().find(|p| p.overlaps(item))
}

/// Vertical compaction onto `cols` columns.
///
/// Items are bounded into the grid, floated up as far as possible and pushed
/// below anything they still overlap. The returned sequence keeps the input
/// order.
pub fn compact(items: &[LayoutItem], cols: u32) -> Vec<LayoutItem> {
    compact_with_priority(items, cols, None)
}

fn compact_with_priority(items: &[LayoutItem], cols: u32, priority: Option<&str>) -> Vec<LayoutItem> {
    let cols = cols.max(1);
    let mut order: Vec<usize> = (0..items.len()).collect();
    order.sort_by_key(|&idx| {
        let item = &items[idx];
        let rank = if priority == Some(item.i.as_str()) { 0 } else { 1 };
        (item.y, rank, item.x)
    });

    let mut out = items.to_vec();
    let mut placed: Vec<LayoutItem> = Vec::with_capacity(items.len());
    for idx in order {
        let mut item = items[idx].clone();
        bound(&mut item, cols);
        item.y = item.y.min(bottom(&placed));
        while item.y > 0 {
            let mut above = item.clone();
            above.y -= 1;
            if first_collision(&placed, &above).is_some() {
                break;
            }
            item.y = above.y;
        }
        while let Some(hit) = first_collision(&placed, &item) {
            item.y = hit.bottom();
        }
        out[idx] = item.clone();
        placed.push(item);
    }
    out
}

/// Move `id` to cell `(x, y)` and reflow the rest of the layout around it.
pub fn move_item(items: &[LayoutItem], id: &str, x: u32, y: u32, cols: u32) -> Vec<LayoutItem> {
    let cols = cols.max(1);
    let mut next = items.to_vec();
    let Some(idx) = next.iter().position(|it| it.i == id) else {
        return compact(&next, cols);
    };
    next[idx].x = x;
    next[idx].y = y;
    bound(&mut next[idx], cols);
    let moved = next[idx].clone();
    for (other_idx, other) in next.iter_mut().enumerate() {
        if other_idx != idx && other.overlaps(&moved) {
            other.y = moved.bottom();
        }
    }
    compact_with_priority(&next, cols, Some(id))
}
