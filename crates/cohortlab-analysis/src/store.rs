//! Persistent holder of the current configuration and cohorts.
//!
//! [`CohortStore`] keeps the working state of an analysis session: the last
//! simulation configuration, the current cohort and an optional imputed copy.
//! Every change is written through a [`KeyValueBackend`] as JSON under fixed
//! keys, and [`CohortStore::open`] restores whatever was saved before.
//!
//! The analysis functions themselves never touch the store; callers pass the
//! cohort they read from it.

use std::{collections::HashMap, io};

use cohortlab_engine::{Participant, SimulationConfig};
use serde::{Serialize, de::DeserializeOwned};

/// String key-value persistence used by [`CohortStore`].
pub trait KeyValueBackend {
    /// Returns the value stored under `key`, or `None` if there is none.
    fn load(&self, key: &str) -> io::Result<Option<String>>;
    fn save(&mut self, key: &str, value: &str) -> io::Result<()>;
    /// Removes `key`. Removing an absent key is not an error.
    fn remove(&mut self, key: &str) -> io::Result<()>;
}

/// In-process backend, lost when dropped.
#[derive(Debug, Default, Clone)]
pub struct MemoryBackend {
    entries: HashMap<String, String>,
}

impl MemoryBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueBackend for MemoryBackend {
    fn load(&self, key: &str) -> io::Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn save(&mut self, key: &str, value: &str) -> io::Result<()> {
        self.entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> io::Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum StoreError {
    #[display("failed to access stored {key}: {source}")]
    Backend {
        #[error(not(source))]
        key: &'static str,
        source: io::Error,
    },
    #[display("stored {key} is not valid JSON: {source}")]
    Json {
        #[error(not(source))]
        key: &'static str,
        source: serde_json::Error,
    },
}

/// Configuration, cohort and imputed cohort, persisted on every change.
#[derive(Debug)]
pub struct CohortStore<B> {
    backend: B,
    config: Option<SimulationConfig>,
    cohort: Vec<Participant>,
    imputed: Option<Vec<Participant>>,
}

impl<B> CohortStore<B>
where
    B: KeyValueBackend,
{
    const CONFIG_KEY: &'static str = "config";
    const COHORT_KEY: &'static str = "cohort";
    const IMPUTED_KEY: &'static str = "imputed";

    /// Opens a store, loading any previously saved state from `backend`.
    pub fn open(backend: B) -> Result<Self, StoreError> {
        let config = load(&backend, Self::CONFIG_KEY)?;
        let cohort = load(&backend, Self::COHORT_KEY)?.unwrap_or_default();
        let imputed = load(&backend, Self::IMPUTED_KEY)?;
        let store = Self {
            backend,
            config,
            cohort,
            imputed,
        };
        log::debug!(
            "opened cohort store with {} participants (imputed: {})",
            store.cohort.len(),
            store.imputed.is_some()
        );
        Ok(store)
    }

    pub fn config(&self) -> Option<&SimulationConfig> {
        self.config.as_ref()
    }

    pub fn cohort(&self) -> &[Participant] {
        &self.cohort
    }

    pub fn imputed(&self) -> Option<&[Participant]> {
        self.imputed.as_deref()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn set_config(&mut self, config: SimulationConfig) -> Result<(), StoreError> {
        save(&mut self.backend, Self::CONFIG_KEY, &config)?;
        self.config = Some(config);
        Ok(())
    }

    /// Replaces the current cohort. Any imputed copy of the previous cohort is discarded.
    ///
    /// On error neither the in-memory state nor the backend entries change.
    pub fn set_cohort(&mut self, cohort: Vec<Participant>) -> Result<(), StoreError> {
        save(&mut self.backend, Self::COHORT_KEY, &cohort)?;
        if let Err(source) = self.backend.remove(Self::IMPUTED_KEY) {
            if let Err(err) = save(&mut self.backend, Self::COHORT_KEY, &self.cohort) {
                log::warn!("failed to restore previous cohort: {err}");
            }
            return Err(StoreError::Backend {
                key: Self::IMPUTED_KEY,
                source,
            });
        }
        self.cohort = cohort;
        self.imputed = None;
        Ok(())
    }

    pub fn set_imputed(&mut self, imputed: Vec<Participant>) -> Result<(), StoreError> {
        save(&mut self.backend, Self::IMPUTED_KEY, &imputed)?;
        self.imputed = Some(imputed);
        Ok(())
    }

    pub fn clear_imputed(&mut self) -> Result<(), StoreError> {
        self.backend
            .remove(Self::IMPUTED_KEY)
            .map_err(|source| StoreError::Backend {
                key: Self::IMPUTED_KEY,
                source,
            })?;
        self.imputed = None;
        Ok(())
    }
}

fn load<B, T>(backend: &B, key: &'static str) -> Result<Option<T>, StoreError>
where
    B: KeyValueBackend,
    T: DeserializeOwned,
{
    let Some(json) = backend
        .load(key)
        .map_err(|source| StoreError::Backend { key, source })?
    else {
        return Ok(None);
    };
    serde_json::from_str(&json)
        .map(Some)
        .map_err(|source| StoreError::Json { key, source })
}

fn save<B, T>(backend: &mut B, key: &'static str, value: &T) -> Result<(), StoreError>
where
    B: KeyValueBackend,
    T: Serialize + ?Sized,
{
    let json = serde_json::to_string(value).map_err(|source| StoreError::Json { key, source })?;
    backend
        .save(key, &json)
        .map_err(|source| StoreError::Backend { key, source })
}

#[cfg(test)]
mod tests {
    use cohortlab_engine::{CohortGenerator, CohortSeed};

    use super::*;
    use crate::imputation::{ImputationOptions, impute};

    #[derive(Default)]
    struct FailingBackend;

    /// Saves succeed but entries can never be removed.
    struct StickyBackend(MemoryBackend);

    impl KeyValueBackend for StickyBackend {
        fn load(&self, key: &str) -> io::Result<Option<String>> {
            self.0.load(key)
        }

        fn save(&mut self, key: &str, value: &str) -> io::Result<()> {
            self.0.save(key, value)
        }

        fn remove(&mut self, _key: &str) -> io::Result<()> {
            Err(io::Error::other("read-only entry"))
        }
    }

    impl KeyValueBackend for FailingBackend {
        fn load(&self, _key: &str) -> io::Result<Option<String>> {
            Ok(None)
        }

        fn save(&mut self, _key: &str, _value: &str) -> io::Result<()> {
            Err(io::Error::other("disk full"))
        }

        fn remove(&mut self, _key: &str) -> io::Result<()> {
            Ok(())
        }
    }

    fn cohort(n: usize) -> Vec<Participant> {
        CohortGenerator::new(SimulationConfig {
            num_participants: n,
            include_missing_data: true,
            ..SimulationConfig::default()
        })
        .unwrap()
        .generate(CohortSeed::from_u128(21))
    }

    #[test]
    fn test_state_survives_reopen() {
        let mut store = CohortStore::open(MemoryBackend::new()).unwrap();
        assert!(store.cohort().is_empty());
        assert!(store.config().is_none());

        let config = SimulationConfig {
            num_participants: 4,
            ..SimulationConfig::default()
        };
        store.set_config(config.clone()).unwrap();
        store.set_cohort(cohort(4)).unwrap();
        let imputed = impute(store.cohort(), &ImputationOptions::default());
        store.set_imputed(imputed.clone()).unwrap();

        let reopened = CohortStore::open(store.backend().clone()).unwrap();
        assert_eq!(reopened.config(), Some(&config));
        assert_eq!(reopened.cohort(), cohort(4).as_slice());
        assert_eq!(reopened.imputed(), Some(imputed.as_slice()));
    }

    #[test]
    fn test_new_cohort_discards_imputed_copy() {
        let mut store = CohortStore::open(MemoryBackend::new()).unwrap();
        store.set_cohort(cohort(2)).unwrap();
        store.set_imputed(cohort(2)).unwrap();
        store.set_cohort(cohort(3)).unwrap();
        assert!(store.imputed().is_none());
        let reopened = CohortStore::open(store.backend().clone()).unwrap();
        assert!(reopened.imputed().is_none());
        assert_eq!(reopened.cohort().len(), 3);
    }

    #[test]
    fn test_corrupt_entry_is_reported() {
        let mut backend = MemoryBackend::new();
        backend.save("cohort", "{not json").unwrap();
        let err = CohortStore::open(backend).unwrap_err();
        assert!(matches!(err, StoreError::Json { key: "cohort", .. }), "{err}");
    }

    #[test]
    fn test_backend_failure_keeps_previous_state() {
        let mut store = CohortStore::open(FailingBackend).unwrap();
        let err = store.set_cohort(cohort(2)).unwrap_err();
        assert!(err.to_string().contains("disk full"));
        assert!(store.cohort().is_empty());
    }

    #[test]
    fn test_failed_imputed_removal_keeps_previous_cohort() {
        let mut seeded = CohortStore::open(MemoryBackend::new()).unwrap();
        seeded.set_cohort(cohort(2)).unwrap();
        seeded.set_imputed(cohort(2)).unwrap();
        let mut store = CohortStore::open(StickyBackend(seeded.backend)).unwrap();

        let err = store.set_cohort(cohort(5)).unwrap_err();
        assert!(matches!(err, StoreError::Backend { key: "imputed", .. }), "{err}");
        assert_eq!(store.cohort().len(), 2);
        assert_eq!(store.imputed().map(<[_]>::len), Some(2));

        let reopened = CohortStore::open(store.backend).unwrap();
        assert_eq!(reopened.cohort().len(), 2);
        assert_eq!(reopened.imputed().map(<[_]>::len), Some(2));
    }
}
