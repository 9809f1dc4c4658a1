use super::kv::KeyValueStore;
use super::keys;
use crate::clock::Clock;
use crate::types::{Analytics, AnalyticsCounter, HistoryItem, NameCategory, Settings};
use crate::Result;
use serde::{de::DeserializeOwned, Serialize};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

pub const DEFAULT_MAX_HISTORY: usize = 50;

/// Settings, favorites, history and usage counters over a [`KeyValueStore`].
///
/// Every read-mutate-write sequence runs under one mutation lock, so concurrent callers
/// cannot lose each other's updates. Plain reads do not take the lock; a blob is always
/// replaced whole, so they see either the old or the new value.
pub struct LocalStore {
    backend: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    max_history: usize,
    mutation: Mutex<()>,
}

impl LocalStore {
    /// Open the store and seed the analytics blob if it does not exist yet.
    pub fn new(backend: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Result<Self> {
        Self::with_max_history(backend, clock, DEFAULT_MAX_HISTORY)
    }

    pub fn with_max_history(
        backend: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
        max_history: usize,
    ) -> Result<Self> {
        let store = Self {
            backend,
            clock,
            max_history: max_history.max(1),
            mutation: Mutex::new(()),
        };
        store.initialize_analytics()?;
        Ok(store)
    }

    pub fn backend(&self) -> &Arc<dyn KeyValueStore> {
        &self.backend
    }

    fn lock(&self) -> MutexGuard<'_, ()> {
        self.mutation.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn get_item<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.backend.get(key)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    fn set_item<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let raw = serde_json::to_string(value)?;
        self.backend.set(key, &raw)
    }

    // ---- settings ----

    /// Stored settings, normalized so `names_per_page <= num_names`.
    pub fn get_settings(&self) -> Result<Option<Settings>> {
        Ok(self
            .get_item::<Settings>(keys::SETTINGS)?
            .map(Settings::normalized))
    }

    pub fn set_settings(&self, settings: &Settings) -> Result<()> {
        let _guard = self.lock();
        self.set_item(keys::SETTINGS, &settings.clone().normalized())
    }

    // ---- favorites ----

    pub fn get_favorites(&self) -> Result<Vec<String>> {
        Ok(self.get_item(keys::FAVORITES)?.unwrap_or_default())
    }

    /// Replace the favorites list; duplicates are dropped, first occurrence wins.
    pub fn set_favorites(&self, favorites: &[String]) -> Result<()> {
        let _guard = self.lock();
        self.write_favorites(favorites)
    }

    fn write_favorites(&self, favorites: &[String]) -> Result<()> {
        let mut unique: Vec<&String> = Vec::with_capacity(favorites.len());
        for name in favorites {
            if !unique.contains(&name) {
                unique.push(name);
            }
        }
        self.set_item(keys::FAVORITES, &unique)
    }

    pub fn is_favorite(&self, name: &str) -> Result<bool> {
        Ok(self.get_favorites()?.iter().any(|n| n == name))
    }

    /// Returns `true` if the name was added, `false` if it was already present.
    pub fn add_favorite(&self, name: &str) -> Result<bool> {
        let _guard = self.lock();
        self.add_favorite_locked(name)
    }

    fn add_favorite_locked(&self, name: &str) -> Result<bool> {
        let mut favorites = self.get_favorites()?;
        if favorites.iter().any(|n| n == name) {
            return Ok(false);
        }
        favorites.push(name.to_string());
        self.write_favorites(&favorites)?;
        self.adjust_locked(AnalyticsCounter::Favorites, 1)?;
        Ok(true)
    }

    /// Returns `true` if the name was removed, `false` if it was not present.
    pub fn remove_favorite(&self, name: &str) -> Result<bool> {
        let _guard = self.lock();
        self.remove_favorite_locked(name)
    }

    fn remove_favorite_locked(&self, name: &str) -> Result<bool> {
        let mut favorites = self.get_favorites()?;
        let Some(index) = favorites.iter().position(|n| n == name) else {
            return Ok(false);
        };
        favorites.remove(index);
        self.write_favorites(&favorites)?;
        self.adjust_locked(AnalyticsCounter::Favorites, -1)?;
        Ok(true)
    }

    /// Add if absent, remove if present. Returns whether the name is now a favorite.
    pub fn toggle_favorite(&self, name: &str) -> Result<bool> {
        let _guard = self.lock();
        if self.remove_favorite_locked(name)? {
            Ok(false)
        } else {
            self.add_favorite_locked(name)
        }
    }

    pub fn clear_favorites(&self) -> Result<()> {
        let _guard = self.lock();
        self.write_favorites(&[])
    }

    // ---- history ----

    /// Newest first.
    pub fn get_history(&self) -> Result<Vec<HistoryItem>> {
        Ok(self.get_item(keys::HISTORY)?.unwrap_or_default())
    }

    pub fn set_history(&self, history: &[HistoryItem]) -> Result<()> {
        let _guard = self.lock();
        let capped = &history[..history.len().min(self.max_history)];
        self.set_item(keys::HISTORY, capped)
    }

    /// Prepend a new item, dropping the oldest beyond capacity.
    pub fn add_history(
        &self,
        prompt: impl Into<String>,
        names: Vec<String>,
        category: NameCategory,
    ) -> Result<HistoryItem> {
        let item = HistoryItem {
            prompt: prompt.into(),
            names,
            category,
            timestamp: self.clock.now_ms(),
        };

        let _guard = self.lock();
        let mut history = self.get_history()?;
        history.insert(0, item.clone());
        history.truncate(self.max_history);
        self.set_item(keys::HISTORY, &history)?;
        self.adjust_locked(
            AnalyticsCounter::GeneratedNames,
            item.names.len() as i64,
        )?;
        debug!(
            names = item.names.len(),
            entries = history.len(),
            "history item added"
        );
        Ok(item)
    }

    pub fn clear_history(&self) -> Result<()> {
        let _guard = self.lock();
        self.set_item::<[HistoryItem]>(keys::HISTORY, &[])
    }

    // ---- analytics ----

    fn initialize_analytics(&self) -> Result<()> {
        let _guard = self.lock();
        if self.get_item::<Analytics>(keys::ANALYTICS)?.is_none() {
            self.set_item(keys::ANALYTICS, &Analytics::default())?;
        }
        Ok(())
    }

    pub fn get_analytics(&self) -> Result<Analytics> {
        Ok(self.get_item(keys::ANALYTICS)?.unwrap_or_default())
    }

    fn adjust_locked(&self, counter: AnalyticsCounter, delta: i64) -> Result<()> {
        let mut analytics = self.get_analytics()?;
        analytics.adjust(counter, delta);
        self.set_item(keys::ANALYTICS, &analytics)
    }

    pub fn record_api_call(&self) -> Result<()> {
        let _guard = self.lock();
        let mut analytics = self.get_analytics()?;
        analytics.adjust(AnalyticsCounter::ApiCalls, 1);
        analytics.last_api_call = self.clock.now_ms();
        self.set_item(keys::ANALYTICS, &analytics)
    }

    pub fn record_export(&self) -> Result<()> {
        let _guard = self.lock();
        self.adjust_locked(AnalyticsCounter::Exports, 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::storage::MemoryStore;

    fn store() -> LocalStore {
        LocalStore::new(Arc::new(MemoryStore::new()), Arc::new(ManualClock::new(1_000))).unwrap()
    }

    #[test]
    fn test_analytics_initialized_once() {
        let backend: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let clock = Arc::new(ManualClock::new(0));
        let s = LocalStore::new(backend.clone(), clock.clone()).unwrap();
        s.record_export().unwrap();
        let reopened = LocalStore::new(backend, clock).unwrap();
        assert_eq!(reopened.get_analytics().unwrap().exports, 1);
    }

    #[test]
    fn test_settings_roundtrip_normalizes() {
        let s = store();
        assert_eq!(s.get_settings().unwrap(), None);
        s.backend
            .set(keys::SETTINGS, r#"{"theme":"light","category":"item","customPrompt":"x","numNames":3,"namesPerPage":9,"temperature":0.9,"maxLength":12}"#)
            .unwrap();
        let loaded = s.get_settings().unwrap().unwrap();
        assert_eq!(loaded.num_names, 3);
        assert_eq!(loaded.names_per_page, 3);
        assert_eq!(loaded.category, NameCategory::Item);
    }

    #[test]
    fn test_favorites_add_remove_restores_state() {
        let s = store();
        s.add_favorite("Nova").unwrap();
        let before = s.get_favorites().unwrap();
        assert!(s.add_favorite("Vega").unwrap());
        assert!(!s.add_favorite("Vega").unwrap());
        assert!(s.remove_favorite("Vega").unwrap());
        assert!(!s.remove_favorite("Vega").unwrap());
        assert_eq!(s.get_favorites().unwrap(), before);
        assert_eq!(s.get_analytics().unwrap().favorites, 1);
    }

    #[test]
    fn test_toggle_favorite() {
        let s = store();
        assert!(s.toggle_favorite("Orbit").unwrap());
        assert!(s.is_favorite("Orbit").unwrap());
        assert!(!s.toggle_favorite("Orbit").unwrap());
        assert!(s.get_favorites().unwrap().is_empty());
    }

    #[test]
    fn test_set_favorites_dedups() {
        let s = store();
        s.set_favorites(&["A".into(), "B".into(), "A".into()])
            .unwrap();
        assert_eq!(s.get_favorites().unwrap(), vec!["A", "B"]);
    }

    #[test]
    fn test_history_item_fields_and_counter() {
        let s = store();
        let item = s
            .add_history("bakery", vec!["Crumb".into(), "Loaf".into()], NameCategory::Business)
            .unwrap();
        assert_eq!(item.timestamp, 1_000);
        assert_eq!(s.get_history().unwrap(), vec![item]);
        assert_eq!(s.get_analytics().unwrap().generated_names, 2);
        s.clear_history().unwrap();
        assert!(s.get_history().unwrap().is_empty());
    }

    #[test]
    fn test_record_api_call_sets_timestamp() {
        let s = store();
        s.record_api_call().unwrap();
        let a = s.get_analytics().unwrap();
        assert_eq!(a.api_calls, 1);
        assert_eq!(a.last_api_call, 1_000);
    }

    #[test]
    fn test_corrupt_blob_surfaces_error() {
        let s = store();
        s.backend.set(keys::HISTORY, "{not json").unwrap();
        assert_eq!(
            s.get_history().unwrap_err().kind(),
            crate::ErrorKind::Serialization
        );
    }
}
