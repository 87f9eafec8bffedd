use crate::common::kv_store::{KvStore, MemoryStore};
use crate::dashboard::layout::{default_layout_for, reconcile, LayoutItem};
use crate::dashboard::module::DashboardModule;
use crate::dashboard::registry::registry_for;
use serde::{de::DeserializeOwned, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Bumped whenever the default layout shape changes. Layouts saved under an
/// older version are ignored and fall back to the defaults.
pub const LAYOUT_SCHEMA_VERSION: u32 = 3;

/// Widget id to shown/hidden. Ids without an entry are visible.
pub type VisibilityMap = BTreeMap<String, bool>;

pub fn visibility_key(module: DashboardModule) -> String {
    format!("widgetConfig_{}", module.as_str())
}

pub fn layout_key(module: DashboardModule, version: u32) -> String {
    format!("widgetLayout_v{version}_{}", module.as_str())
}

/// Every layout key this build knows about for `module`, oldest first.
pub fn all_layout_keys(module: DashboardModule) -> Vec<String> {
    (1..=LAYOUT_SCHEMA_VERSION)
        .map(|version| layout_key(module, version))
        .collect()
}

fn read_json<T: DeserializeOwned>(storage: &dyn KvStore, key: &str) -> Option<T> {
    match storage.get(key) {
        Ok(Some(raw)) => match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(key, error = %e, "ignoring unreadable dashboard state");
                None
            }
        },
        Ok(None) => None,
        Err(e) => {
            tracing::warn!(key, error = %e, "failed to read dashboard state");
            None
        }
    }
}

fn write_json<T: Serialize>(storage: &mut dyn KvStore, key: &str, value: &T) {
    let result = serde_json::to_string(value)
        .map_err(anyhow::Error::from)
        .and_then(|json| storage.set(key, &json));
    if let Err(e) = result {
        tracing::warn!(key, error = %e, "failed to persist dashboard state");
    }
}

/// Visibility and layout of one module.
#[derive(Debug, Clone, PartialEq)]
pub struct ModuleConfig {
    module: DashboardModule,
    visibility: VisibilityMap,
    layout: Vec<LayoutItem>,
}

impl ModuleConfig {
    /// First-run state: every registered widget visible at its default place.
    pub fn defaults(module: DashboardModule) -> Self {
        let visibility = registry_for(module)
            .iter()
            .map(|w| (w.id.to_string(), true))
            .collect();
        Self {
            module,
            visibility,
            layout: default_layout_for(module),
        }
    }

    /// Read the persisted state of `module` and reconcile it with the current
    /// catalog. Missing or unreadable values fall back to the defaults.
    pub fn load(storage: &dyn KvStore, module: DashboardModule) -> Self {
        let defaults = Self::defaults(module);
        let layout = match read_json::<Vec<LayoutItem>>(
            storage,
            &layout_key(module, LAYOUT_SCHEMA_VERSION),
        ) {
            Some(persisted) => reconcile(persisted, &defaults.layout),
            None => defaults.layout,
        };
        let visibility =
            read_json::<VisibilityMap>(storage, &visibility_key(module)).unwrap_or(defaults.visibility);
        Self {
            module,
            visibility,
            layout,
        }
    }

    pub fn module(&self) -> DashboardModule {
        self.module
    }

    pub fn visibility(&self) -> &VisibilityMap {
        &self.visibility
    }

    pub fn layout(&self) -> &[LayoutItem] {
        &self.layout
    }

    pub fn is_visible(&self, widget_id: &str) -> bool {
        self.visibility.get(widget_id) != Some(&false)
    }

    /// Number of registered widgets currently visible.
    pub fn visible_count(&self) -> usize {
        registry_for(self.module)
            .iter()
            .filter(|w| self.is_visible(w.id))
            .count()
    }

    fn toggle(&mut self, widget_id: &str) -> bool {
        let next = !self.is_visible(widget_id);
        self.visibility.insert(widget_id.to_string(), next);
        next
    }
}

/// Owns the visibility and layout state of every module for the session and
/// writes each change through to storage.
pub struct WidgetConfigStore {
    storage: Box<dyn KvStore>,
    modules: HashMap<DashboardModule, ModuleConfig>,
}

impl WidgetConfigStore {
    pub fn new(storage: impl KvStore + 'static) -> Self {
        Self {
            storage: Box::new(storage),
            modules: HashMap::new(),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(MemoryStore::new())
    }

    fn slice_mut(&mut self, module: DashboardModule) -> &mut ModuleConfig {
        let storage = &self.storage;
        self.modules.entry(module).or_insert_with(|| {
            tracing::debug!(%module, "loading widget configuration");
            ModuleConfig::load(&**storage, module)
        })
    }

    /// Current state of `module`, loading it on first use in the session.
    pub fn module(&mut self, module: DashboardModule) -> &ModuleConfig {
        self.slice_mut(module)
    }

    pub fn is_loaded(&self, module: DashboardModule) -> bool {
        self.modules.contains_key(&module)
    }

    pub fn config(&mut self, module: DashboardModule) -> &VisibilityMap {
        self.slice_mut(module).visibility()
    }

    pub fn is_visible(&mut self, module: DashboardModule, widget_id: &str) -> bool {
        self.slice_mut(module).is_visible(widget_id)
    }

    pub fn visible_count(&mut self, module: DashboardModule) -> usize {
        self.slice_mut(module).visible_count()
    }

    pub fn layout(&mut self, module: DashboardModule) -> &[LayoutItem] {
        self.slice_mut(module).layout()
    }

    /// Flip a widget between shown and hidden and persist the whole map.
    /// Ids outside the catalog are stored like any other and stay inert.
    pub fn toggle_visibility(&mut self, module: DashboardModule, widget_id: &str) {
        let slice = self.slice_mut(module);
        let visible = slice.toggle(widget_id);
        let map = slice.visibility.clone();
        tracing::debug!(%module, widget = widget_id, visible, "widget visibility toggled");
        write_json(self.storage.as_mut(), &visibility_key(module), &map);
    }

    /// Replace the stored layout wholesale and persist it.
    pub fn update_layout(&mut self, module: DashboardModule, layout: Vec<LayoutItem>) {
        tracing::debug!(%module, items = layout.len(), "layout updated");
        write_json(
            self.storage.as_mut(),
            &layout_key(module, LAYOUT_SCHEMA_VERSION),
            &layout,
        );
        self.slice_mut(module).layout = layout;
    }

    /// Drop every persisted key of `module`, including older layout schema
    /// versions, and return to the static defaults.
    pub fn reset_to_defaults(&mut self, module: DashboardModule) {
        let mut keys = all_layout_keys(module);
        keys.push(visibility_key(module));
        for key in &keys {
            if let Err(e) = self.storage.remove(key) {
                tracing::warn!(key = %key, error = %e, "failed to clear dashboard state");
            }
        }
        tracing::info!(%module, "widget configuration reset to defaults");
        self.modules.insert(module, ModuleConfig::defaults(module));
    }

    /// Discard the in-memory state of `module` and run the load algorithm
    /// against storage again.
    pub fn reload(&mut self, module: DashboardModule) -> &ModuleConfig {
        self.modules.remove(&module);
        self.slice_mut(module)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_keys_follow_naming_scheme() {
        assert_eq!(visibility_key(DashboardModule::Crm), "widgetConfig_crm");
        assert_eq!(
            layout_key(DashboardModule::ProjectManagement, LAYOUT_SCHEMA_VERSION),
            "widgetLayout_v3_project_management"
        );
        assert_eq!(
            all_layout_keys(DashboardModule::People),
            vec![
                "widgetLayout_v1_people".to_string(),
                "widgetLayout_v2_people".to_string(),
                "widgetLayout_v3_people".to_string(),
            ]
        );
    }

    #[test]
    fn absent_entry_is_visible_but_explicit_false_is_not() {
        let mut cfg = ModuleConfig::defaults(DashboardModule::Crm);
        cfg.visibility.clear();
        assert!(cfg.is_visible("revenueTrend"));
        cfg.visibility.insert("revenueTrend".into(), false);
        assert!(!cfg.is_visible("revenueTrend"));
        assert_eq!(cfg.visible_count(), 11);
    }

    #[test]
    fn toggle_of_absent_id_hides_it() {
        let mut cfg = ModuleConfig::defaults(DashboardModule::People);
        assert!(!cfg.toggle("notInCatalog"));
        assert_eq!(cfg.visibility.get("notInCatalog"), Some(&false));
        assert!(cfg.toggle("notInCatalog"));
    }

    #[test]
    fn older_schema_layouts_are_ignored_on_load() {
        let mut storage = MemoryStore::new();
        storage
            .set(
                &layout_key(DashboardModule::Crm, 2),
                r#"[{"i":"revenueTrend","x":0,"y":0,"w":1,"h":1,"minW":1,"minH":1}]"#,
            )
            .unwrap();
        let cfg = ModuleConfig::load(&storage, DashboardModule::Crm);
        assert_eq!(cfg.layout(), default_layout_for(DashboardModule::Crm).as_slice());
    }

    #[test]
    fn store_loads_each_module_lazily() {
        let mut store = WidgetConfigStore::in_memory();
        assert!(!store.is_loaded(DashboardModule::Recruitment));
        let _ = store.layout(DashboardModule::Recruitment);
        assert!(store.is_loaded(DashboardModule::Recruitment));
        assert!(!store.is_loaded(DashboardModule::People));
    }
}
