use std::sync::{Arc, Condvar, Mutex};

use crate::error::FuseError;
use crate::fetch::{FeatureSource, TabularSource};
use crate::types::{FusedDatum, PolygonFeature, TabularDataset};

/// Lifecycle of one cached dataset. `Failed` is not a resting state: a
/// failed fetch resets the slot to `Unfetched` so the next request retries
/// from scratch.
enum SlotState<T> {
    Unfetched,
    Fetching,
    Ready(Arc<T>),
}

/// Fetch-once cache slot with request coalescing.
///
/// The first caller through an `Unfetched` slot performs the fetch outside
/// the lock; callers arriving while it is `Fetching` block on the condvar
/// and share the result, so at most one fetch per dataset kind is in flight.
struct Slot<T> {
    state: Mutex<SlotState<T>>,
    ready: Condvar,
}

impl<T> Slot<T> {
    fn new() -> Self {
        Self { state: Mutex::new(SlotState::Unfetched), ready: Condvar::new() }
    }

    fn get_or_fetch(
        &self,
        fetch: impl FnOnce() -> Result<T, FuseError>,
    ) -> Result<Arc<T>, FuseError> {
        let mut state = self.state.lock().expect("slot lock poisoned");
        loop {
            match &*state {
                SlotState::Ready(value) => return Ok(value.clone()),
                SlotState::Fetching => {
                    state = self.ready.wait(state).expect("slot lock poisoned");
                }
                SlotState::Unfetched => break,
            }
        }
        *state = SlotState::Fetching;
        drop(state);

        let result = fetch();

        let mut state = self.state.lock().expect("slot lock poisoned");
        match result {
            Ok(value) => {
                let value = Arc::new(value);
                *state = SlotState::Ready(value.clone());
                self.ready.notify_all();
                Ok(value)
            }
            Err(error) => {
                // No partial cache write: woken waiters see Unfetched and retry.
                *state = SlotState::Unfetched;
                self.ready.notify_all();
                Err(match error {
                    FuseError::DataUnavailable(_) => error,
                    other => FuseError::DataUnavailable(other.to_string()),
                })
            }
        }
    }

    fn clear(&self) {
        *self.state.lock().expect("slot lock poisoned") = SlotState::Unfetched;
    }
}

/// Single source of truth for the fetched and fused datasets.
///
/// Owns the fetcher collaborators and two cache slots; the fused view is
/// cached for the process lifetime and only an explicit `invalidate` drops
/// it. Projected geometry is derived per render cycle in `render` and holds
/// no state here, so invalidation has nothing downstream to clear.
pub struct DataStore {
    tabular_source: Box<dyn TabularSource>,
    feature_source: Box<dyn FeatureSource>,
    key_column: usize,
    tabular: Slot<TabularDataset>,
    fused: Slot<Vec<FusedDatum>>,
}

impl DataStore {
    pub fn new(
        tabular_source: Box<dyn TabularSource>,
        feature_source: Box<dyn FeatureSource>,
        key_column: usize,
    ) -> Self {
        Self {
            tabular_source,
            feature_source,
            key_column,
            tabular: Slot::new(),
            fused: Slot::new(),
        }
    }

    /// Cached survey table; the first call fetches, concurrent callers
    /// during the fetch share the pending operation.
    pub fn tabular(&self) -> Result<Arc<TabularDataset>, FuseError> {
        self.tabular.get_or_fetch(|| self.tabular_source.fetch())
    }

    /// Cached fused dataset. The first call fetches the feature collection,
    /// awaits the survey table, and joins them; subsequent calls return the
    /// same `Arc` without re-fetching or re-joining.
    pub fn fused(&self) -> Result<Arc<Vec<FusedDatum>>, FuseError> {
        self.fused.get_or_fetch(|| {
            let features = self.feature_source.fetch()?;
            let tabular = self.tabular()?;
            Ok(join(features, &tabular, self.key_column))
        })
    }

    /// Drop both caches so the next request re-fetches source data.
    pub fn invalidate(&self) {
        self.tabular.clear();
        self.fused.clear();
    }
}

/// Key-based join: for each feature, attach the first survey record whose
/// key field equals the feature's normalized name, or leave the record
/// absent. A missing match is expected data, not a failure.
fn join(
    features: Vec<PolygonFeature>,
    tabular: &TabularDataset,
    key_column: usize,
) -> Vec<FusedDatum> {
    features
        .into_iter()
        .map(|feature| {
            let record = tabular.find_by_key(key_column, &feature.name);
            FusedDatum { name: feature.name, coords: feature.coords, record }
        })
        .collect()
}
