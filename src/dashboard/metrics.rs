//! Boundary to the aggregation layer that feeds widget data.
//!
//! Fetches run on a worker thread; the UI polls [`MetricsFeed`] every frame
//! and never blocks on a provider.

use crate::dashboard::module::{BusinessUnit, DashboardModule, DateRange};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct MetricsFilter {
    #[serde(default)]
    pub date_range: DateRange,
    #[serde(default)]
    pub business_unit: BusinessUnit,
}

impl MetricsFilter {
    pub fn new(date_range: DateRange, business_unit: BusinessUnit) -> Self {
        Self {
            date_range,
            business_unit,
        }
    }
}

/// Aggregated data for one module, split into one JSON section per widget id.
#[derive(Debug, Clone, PartialEq)]
pub struct ModuleMetrics {
    pub module: DashboardModule,
    pub period: (NaiveDate, NaiveDate),
    pub sections: Map<String, Value>,
}

impl ModuleMetrics {
    pub fn new(module: DashboardModule, period: (NaiveDate, NaiveDate)) -> Self {
        Self {
            module,
            period,
            sections: Map::new(),
        }
    }

    pub fn with_section(mut self, widget_id: &str, value: Value) -> Self {
        self.sections.insert(widget_id.to_string(), value);
        self
    }

    pub fn section(&self, widget_id: &str) -> Option<&Value> {
        self.sections.get(widget_id)
    }
}

pub trait MetricsProvider: Send + Sync {
    fn fetch(&self, module: DashboardModule, filter: &MetricsFilter) -> anyhow::Result<ModuleMetrics>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum DataState<T> {
    Loading,
    Failed(String),
    Ready(T),
}

impl<T> DataState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, DataState::Loading)
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            DataState::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            DataState::Failed(e) => Some(e),
            _ => None,
        }
    }
}

type FetchResult = Result<ModuleMetrics, String>;

enum Slot {
    Pending(Receiver<FetchResult>),
    Done(DataState<Arc<ModuleMetrics>>),
}

/// Caches one fetch per `(module, filter)` pair. Results, including failures,
/// are kept for the session and never refetched unless invalidated.
pub struct MetricsFeed {
    provider: Arc<dyn MetricsProvider>,
    slots: HashMap<(DashboardModule, MetricsFilter), Slot>,
}

impl MetricsFeed {
    pub fn new(provider: Arc<dyn MetricsProvider>) -> Self {
        Self {
            provider,
            slots: HashMap::new(),
        }
    }

    pub fn with_provider(provider: impl MetricsProvider + 'static) -> Self {
        Self::new(Arc::new(provider))
    }

    fn spawn_fetch(&self, module: DashboardModule, filter: MetricsFilter) -> Slot {
        let (tx, rx) = mpsc::channel();
        let provider = Arc::clone(&self.provider);
        let spawned = std::thread::Builder::new()
            .name(format!("metrics-{module}"))
            .spawn(move || {
                let result = provider.fetch(module, &filter).map_err(|e| format!("{e:#}"));
                let _ = tx.send(result);
            });
        match spawned {
            Ok(_) => {
                tracing::debug!(%module, ?filter, "metrics fetch started");
                Slot::Pending(rx)
            }
            Err(e) => {
                tracing::error!(%module, error = %e, "failed to spawn metrics fetch");
                Slot::Done(DataState::Failed(e.to_string()))
            }
        }
    }

    /// Current state of the data for `module` under `filter`, starting a
    /// fetch the first time the pair is seen.
    pub fn poll(&mut self, module: DashboardModule, filter: MetricsFilter) -> DataState<Arc<ModuleMetrics>> {
        let key = (module, filter);
        if !self.slots.contains_key(&key) {
            let slot = self.spawn_fetch(module, filter);
            self.slots.insert(key, slot);
        }
        let Some(slot) = self.slots.get_mut(&key) else {
            return DataState::Loading;
        };
        let received = match slot {
            Slot::Pending(rx) => rx.try_recv(),
            Slot::Done(state) => return state.clone(),
        };
        let state = match received {
            Ok(Ok(metrics)) => DataState::Ready(Arc::new(metrics)),
            Ok(Err(e)) => {
                tracing::warn!(%module, error = %e, "metrics fetch failed");
                DataState::Failed(e)
            }
            Err(TryRecvError::Empty) => return DataState::Loading,
            Err(TryRecvError::Disconnected) => {
                tracing::warn!(%module, "metrics worker exited without a result");
                DataState::Failed("metrics worker exited without a result".into())
            }
        };
        *slot = Slot::Done(state.clone());
        state
    }

    /// Forget every cached result so the next poll fetches again.
    pub fn invalidate(&mut self) {
        self.slots.clear();
    }
}
