//! Local Roster Cache
//!
//! Keeps a local echo of every submitted attendant so the roster survives a
//! restart. The whole roster is stored as one JSON text under a single key
//! and rewritten in full after every successful submission.

use std::sync::Arc;
use tracing::{debug, warn};

use super::CacheBackend;
use crate::domain::{AttendantRecord, Roster};
use crate::error::{RegistryError, Result};

pub struct RosterCache {
    backend: Arc<dyn CacheBackend>,
    key: String,
}

impl RosterCache {
    pub fn new(backend: Arc<dyn CacheBackend>, key: impl Into<String>) -> Self {
        Self {
            backend,
            key: key.into(),
        }
    }

    /// Stored roster, or an empty one when nothing usable is stored.
    ///
    /// Unreadable or unparseable contents are logged and treated as no data.
    pub fn load(&self) -> Roster {
        match self.try_load() {
            Ok(roster) => {
                debug!(key = %self.key, records = roster.len(), "roster cache loaded");
                roster
            }
            Err(e) => {
                warn!(key = %self.key, error = %e, "ignoring roster cache");
                Roster::new()
            }
        }
    }

    fn try_load(&self) -> Result<Roster> {
        let Some(text) = self.backend.get(&self.key)? else {
            return Ok(Roster::new());
        };
        if text.trim().is_empty() {
            return Ok(Roster::new());
        }

        let records: Vec<AttendantRecord> =
            serde_json::from_str(&text).map_err(|e| RegistryError::CacheParse(e.to_string()))?;
        Roster::from_records(records).map_err(|e| RegistryError::CacheParse(e.to_string()))
    }

    /// Overwrite the stored roster with `roster`
    pub fn save(&self, roster: &Roster) -> Result<()> {
        let text = serde_json::to_string(roster)?;
        self.backend.set(&self.key, &text)?;
        debug!(key = %self.key, records = roster.len(), "roster cache saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Gender;
    use crate::persistence::{FileCache, MemoryCache};
    use chrono::NaiveDate;

    fn record(id: &str) -> AttendantRecord {
        AttendantRecord {
            first_name: "Amara".into(),
            last_name: "Obi".into(),
            age: "29".into(),
            gender: Gender::Female,
            organization_unit: "OU-12".into(),
            training_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            identifier: id.into(),
        }
    }

    fn memory_cache() -> (Arc<MemoryCache>, RosterCache) {
        let backend = Arc::new(MemoryCache::new());
        let cache = RosterCache::new(backend.clone(), "roster");
        (backend, cache)
    }

    #[test]
    fn missing_entry_loads_empty() {
        let (_, cache) = memory_cache();
        assert!(cache.load().is_empty());
    }

    #[test]
    fn garbage_loads_empty() {
        let (backend, cache) = memory_cache();
        backend.set("roster", "{not json").unwrap();
        assert!(cache.load().is_empty());

        backend.set("roster", r#"[{"firstName": 3}]"#).unwrap();
        assert!(cache.load().is_empty());
    }

    #[test]
    fn duplicate_identifiers_in_storage_load_empty() {
        let (backend, cache) = memory_cache();
        let text = serde_json::to_string(&vec![record("A"), record("A")]).unwrap();
        backend.set("roster", &text).unwrap();
        assert!(cache.load().is_empty());
    }

    #[test]
    fn save_then_load_is_deep_equal() {
        let (_, cache) = memory_cache();
        let roster = Roster::from_records(vec![record("A"), record("B")]).unwrap();
        cache.save(&roster).unwrap();
        assert_eq!(cache.load(), roster);
    }

    #[test]
    fn save_overwrites_previous_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let cache = RosterCache::new(Arc::new(FileCache::new(dir.path())), "roster");

        cache
            .save(&Roster::from_records(vec![record("A"), record("B")]).unwrap())
            .unwrap();
        let smaller = Roster::from_records(vec![record("C")]).unwrap();
        cache.save(&smaller).unwrap();

        assert_eq!(cache.load(), smaller);
    }
}
