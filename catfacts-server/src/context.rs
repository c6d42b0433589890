//! Process-wide skill state, built once at startup
//!
//! Holds the fact store handle, the fact count read at startup, and the random
//! source used for fact and intro selection. The count is never refreshed; if
//! the table changes afterwards, out-of-range draws surface as store misses.

use std::sync::{Arc, Mutex, PoisonError};

use catfacts_core::{CatFactsError, FactStore};
use rand::rngs::StdRng;
use rand::SeedableRng;

pub struct SkillContext {
    store: Arc<dyn FactStore>,
    fact_count: i64,
    rng: Mutex<StdRng>,
}

impl SkillContext {
    /// Query the store's fact count and build the context. Failure here is fatal to the caller.
    pub async fn initialize(
        store: Arc<dyn FactStore>,
        seed: Option<u64>,
    ) -> Result<Self, CatFactsError> {
        let fact_count = store.count().await?;
        tracing::info!(
            store = store.name(),
            fact_count,
            "Found {} facts in fact store",
            fact_count
        );
        Ok(Self::with_count(store, fact_count, seed))
    }

    pub fn with_count(store: Arc<dyn FactStore>, fact_count: i64, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            store,
            fact_count,
            rng: Mutex::new(rng),
        }
    }

    pub fn store(&self) -> &dyn FactStore {
        self.store.as_ref()
    }

    pub fn fact_count(&self) -> i64 {
        self.fact_count
    }

    /// Run `f` with exclusive access to the RNG. Do not await inside `f`.
    pub fn with_rng<T>(&self, f: impl FnOnce(&mut StdRng) -> T) -> T {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut rng)
    }
}
