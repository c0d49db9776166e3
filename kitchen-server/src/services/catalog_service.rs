//! Catalog Service - preparation profiles with in-memory caching
//!
//! Holds the `foodId -> PrepProfile` table consulted by the wait-time
//! estimator. The table is seeded from injected defaults and can be
//! persisted to a JSON file under the work directory.

use parking_lot::{Mutex, RwLock};
use shared::models::{CatalogSummary, FoodId, PrepProfile, PrepProfileInput};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::utils::error::{QueueError, QueueResult};
use crate::utils::validation::{validate_food_id, validate_optional_name, validate_prep_values};

// =============================================================================
// CatalogService
// =============================================================================

/// Preparation catalog shared by the estimator and the admin API
#[derive(Clone)]
pub struct CatalogService {
    /// Profiles cache: foodId -> PrepProfile
    profiles: Arc<RwLock<BTreeMap<FoodId, PrepProfile>>>,
    /// Defaults restored by [`CatalogService::reset_to_defaults`]
    defaults: Arc<Vec<PrepProfile>>,
    /// Serializes mutations (table swap and file write)
    write_lock: Arc<Mutex<()>>,
    /// JSON file mirrored after every mutation (if set)
    store_path: Option<PathBuf>,
}

impl std::fmt::Debug for CatalogService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogService")
            .field("profiles_count", &self.profiles.read().len())
            .field("defaults_count", &self.defaults.len())
            .field("store_path", &self.store_path)
            .finish()
    }
}

impl CatalogService {
    /// Create an in-memory catalog seeded with `defaults`
    pub fn new(defaults: Vec<PrepProfile>) -> Self {
        let profiles = index(&defaults);
        Self {
            profiles: Arc::new(RwLock::new(profiles)),
            defaults: Arc::new(defaults),
            write_lock: Arc::new(Mutex::new(())),
            store_path: None,
        }
    }

    /// Create a catalog backed by a JSON file
    ///
    /// A missing file is created from `defaults`. An unreadable or
    /// malformed file is logged and replaced in memory by `defaults`
    /// (the file itself is left untouched until the next mutation).
    pub fn load_json_file(path: impl Into<PathBuf>, defaults: Vec<PrepProfile>) -> QueueResult<Self> {
        let path = path.into();
        let mut service = Self::new(defaults);
        service.store_path = Some(path.clone());

        if !path.exists() {
            tracing::info!(path = %path.display(), "Catalog file missing, seeding defaults");
            write_profiles(&path, &service.profiles.read())?;
            return Ok(service);
        }

        match read_profiles(&path) {
            Ok(profiles) => {
                let count = profiles.len();
                *service.profiles.write() = index(&profiles);
                tracing::info!(path = %path.display(), count, "Catalog loaded");
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "Catalog file unreadable, falling back to defaults"
                );
            }
        }
        Ok(service)
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Look up one profile
    pub fn get(&self, food_id: &str) -> QueueResult<PrepProfile> {
        self.profiles
            .read()
            .get(food_id)
            .cloned()
            .ok_or_else(|| QueueError::FoodNotFound(food_id.to_string()))
    }

    /// Whether a food id is known
    pub fn contains(&self, food_id: &str) -> bool {
        self.profiles.read().contains_key(food_id)
    }

    /// All profiles ordered by food id
    pub fn list_all(&self) -> Vec<PrepProfile> {
        self.profiles.read().values().cloned().collect()
    }

    /// Run `f` against a consistent view of the table
    pub fn read<R>(&self, f: impl FnOnce(&BTreeMap<FoodId, PrepProfile>) -> R) -> R {
        f(&self.profiles.read())
    }

    /// Item count and mean base time
    pub fn summary(&self) -> CatalogSummary {
        let profiles = self.profiles.read();
        let item_count = profiles.len();
        let average_base_time = if item_count == 0 {
            0.0
        } else {
            let total: u64 = profiles.values().map(|p| u64::from(p.base_time)).sum();
            total as f64 / item_count as f64
        };
        CatalogSummary {
            item_count,
            average_base_time,
        }
    }

    /// Pretty-printed JSON array of all profiles
    pub fn export_json(&self) -> QueueResult<String> {
        serde_json::to_string_pretty(&self.list_all())
            .map_err(|e| QueueError::Internal(format!("catalog export failed: {e}")))
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Create or replace a profile
    ///
    /// Rejects non-positive numbers without touching the table. A missing
    /// name keeps the existing one, or falls back to the food id.
    pub fn upsert(&self, food_id: &str, input: PrepProfileInput) -> QueueResult<PrepProfile> {
        validate_food_id(food_id)?;
        validate_optional_name(&input.name)?;
        let (base_time, batch_size) = validate_prep_values(input.base_time, input.batch_size)?;

        let profile = self.mutate(|profiles| {
            let name = input
                .name
                .map(|n| n.trim().to_string())
                .or_else(|| profiles.get(food_id).map(|p| p.name.clone()))
                .unwrap_or_else(|| food_id.to_string());
            let profile = PrepProfile::new(food_id, name, base_time, batch_size);
            profiles.insert(food_id.to_string(), profile.clone());
            Ok(profile)
        })?;

        tracing::info!(
            food_id = %food_id,
            base_time,
            batch_size,
            "Preparation profile updated"
        );
        Ok(profile)
    }

    /// Remove a profile
    pub fn remove(&self, food_id: &str) -> QueueResult<PrepProfile> {
        let removed = self.mutate(|profiles| {
            profiles
                .remove(food_id)
                .ok_or_else(|| QueueError::FoodNotFound(food_id.to_string()))
        })?;
        tracing::info!(food_id = %food_id, "Preparation profile removed");
        Ok(removed)
    }

    /// Replace the table with the injected defaults
    pub fn reset_to_defaults(&self) -> QueueResult<usize> {
        let count = self.mutate(|profiles| {
            *profiles = index(&self.defaults);
            Ok(profiles.len())
        })?;
        tracing::info!(count, "Catalog reset to defaults");
        Ok(count)
    }

    /// Apply `f` to a copy of the table, write the copy, then publish it
    ///
    /// Mutations run one at a time. On any error the live table and the
    /// file keep their previous contents. Readers are never blocked by
    /// the file write.
    fn mutate<R>(
        &self,
        f: impl FnOnce(&mut BTreeMap<FoodId, PrepProfile>) -> QueueResult<R>,
    ) -> QueueResult<R> {
        let _guard = self.write_lock.lock();
        let mut next = self.profiles.read().clone();
        let out = f(&mut next)?;
        if let Some(path) = &self.store_path {
            write_profiles(path, &next)?;
        }
        *self.profiles.write() = next;
        Ok(out)
    }
}

fn index(profiles: &[PrepProfile]) -> BTreeMap<FoodId, PrepProfile> {
    profiles.iter().map(|p| (p.id.clone(), p.clone())).collect()
}

/// Write-then-rename so readers of the file never see a partial write
fn write_profiles(path: &Path, profiles: &BTreeMap<FoodId, PrepProfile>) -> QueueResult<()> {
    let list: Vec<&PrepProfile> = profiles.values().collect();
    let json = serde_json::to_string_pretty(&list)
        .map_err(|e| QueueError::Internal(format!("catalog export failed: {e}")))?;
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| QueueError::Persistence(e.to_string()))?;
    }
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json).map_err(|e| QueueError::Persistence(e.to_string()))?;
    fs::rename(&tmp, path).map_err(|e| QueueError::Persistence(e.to_string()))
}

/// Parse and validate a catalog file
fn read_profiles(path: &Path) -> QueueResult<Vec<PrepProfile>> {
    let raw = fs::read_to_string(path).map_err(|e| QueueError::Persistence(e.to_string()))?;
    let profiles: Vec<PrepProfile> =
        serde_json::from_str(&raw).map_err(|e| QueueError::Persistence(e.to_string()))?;
    for p in &profiles {
        validate_food_id(&p.id)?;
        validate_prep_values(i64::from(p.base_time), i64::from(p.batch_size))?;
    }
    Ok(profiles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::default_prep_profiles;

    fn input(base_time: i64, batch_size: i64) -> PrepProfileInput {
        PrepProfileInput {
            name: None,
            base_time,
            batch_size,
        }
    }

    #[test]
    fn test_seeded_catalog() {
        let catalog = CatalogService::new(default_prep_profiles());
        let dosa = catalog.get("4").unwrap();
        assert_eq!(dosa.name, "Masala Dosa");
        assert_eq!((dosa.base_time, dosa.batch_size), (5, 5));
        assert_eq!(catalog.list_all().len(), 30);
        assert!(matches!(catalog.get("999"), Err(QueueError::FoodNotFound(_))));
    }

    #[test]
    fn test_upsert_rejects_non_positive_and_keeps_table() {
        let catalog = CatalogService::new(default_prep_profiles());
        assert!(matches!(
            catalog.upsert("4", input(0, 5)),
            Err(QueueError::InvalidPrepProfile(_))
        ));
        assert!(matches!(
            catalog.upsert("4", input(5, 0)),
            Err(QueueError::InvalidPrepProfile(_))
        ));
        assert_eq!(catalog.get("4").unwrap().base_time, 5);
    }

    #[test]
    fn test_upsert_keeps_existing_name() {
        let catalog = CatalogService::new(default_prep_profiles());
        let updated = catalog.upsert("4", input(8, 4)).unwrap();
        assert_eq!(updated.name, "Masala Dosa");
        assert_eq!((updated.base_time, updated.batch_size), (8, 4));

        let created = catalog.upsert("tea", input(2, 10)).unwrap();
        assert_eq!(created.name, "tea");
    }

    #[test]
    fn test_remove_and_reset() {
        let catalog = CatalogService::new(default_prep_profiles());
        catalog.remove("4").unwrap();
        assert!(!catalog.contains("4"));
        assert!(matches!(catalog.remove("4"), Err(QueueError::FoodNotFound(_))));

        assert_eq!(catalog.reset_to_defaults().unwrap(), 30);
        assert!(catalog.contains("4"));
    }

    #[test]
    fn test_summary() {
        let empty = CatalogService::new(Vec::new());
        assert_eq!(empty.summary().item_count, 0);
        assert_eq!(empty.summary().average_base_time, 0.0);

        let catalog = CatalogService::new(vec![
            PrepProfile::new("a", "A", 10, 1),
            PrepProfile::new("b", "B", 20, 1),
        ]);
        let summary = catalog.summary();
        assert_eq!(summary.item_count, 2);
        assert_eq!(summary.average_base_time, 15.0);
    }

    #[test]
    fn test_json_file_persistence() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");

        let catalog = CatalogService::load_json_file(&path, default_prep_profiles()).unwrap();
        assert!(path.exists());
        catalog.upsert("4", input(7, 3)).unwrap();
        catalog.remove("1").unwrap();

        let reloaded = CatalogService::load_json_file(&path, default_prep_profiles()).unwrap();
        assert_eq!(reloaded.get("4").unwrap().base_time, 7);
        assert!(!reloaded.contains("1"));
    }

    #[test]
    fn test_concurrent_edits_keep_file_in_step() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        let catalog = CatalogService::load_json_file(&path, default_prep_profiles()).unwrap();

        let workers: Vec<_> = (0..8i64)
            .map(|w| {
                let catalog = catalog.clone();
                std::thread::spawn(move || {
                    for round in 1..=25i64 {
                        catalog
                            .upsert(&format!("food-{w}"), input(round, w + 1))
                            .unwrap();
                    }
                })
            })
            .collect();
        for worker in workers {
            worker.join().unwrap();
        }

        assert!(!path.with_extension("json.tmp").exists());
        let reloaded = CatalogService::load_json_file(&path, Vec::new()).unwrap();
        assert_eq!(reloaded.list_all(), catalog.list_all());
        for w in 0..8i64 {
            let profile = reloaded.get(&format!("food-{w}")).unwrap();
            assert_eq!(profile.base_time, 25);
            assert_eq!(i64::from(profile.batch_size), w + 1);
        }
    }

    #[test]
    fn test_failed_write_leaves_table_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let data_dir = dir.path().join("data");
        let catalog =
            CatalogService::load_json_file(data_dir.join("catalog.json"), default_prep_profiles())
                .unwrap();

        // 目录被普通文件占用，写入必然失败
        fs::remove_dir_all(&data_dir).unwrap();
        fs::write(&data_dir, "blocked").unwrap();

        assert!(matches!(
            catalog.upsert("4", input(9, 9)),
            Err(QueueError::Persistence(_))
        ));
        assert!(matches!(catalog.remove("1"), Err(QueueError::Persistence(_))));
        assert_eq!(catalog.get("4").unwrap().base_time, 5);
        assert!(catalog.contains("1"));
    }

    #[test]
    fn test_malformed_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        fs::write(&path, "{not json").unwrap();

        let catalog = CatalogService::load_json_file(&path, default_prep_profiles()).unwrap();
        assert_eq!(catalog.list_all().len(), 30);
    }

    #[test]
    fn test_invalid_numbers_in_file_fall_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        fs::write(
            &path,
            r#"[{"id":"4","name":"Masala Dosa","baseTime":0,"batchSize":5}]"#,
        )
        .unwrap();

        let catalog = CatalogService::load_json_file(&path, default_prep_profiles()).unwrap();
        assert_eq!(catalog.get("4").unwrap().base_time, 5);
    }
}
