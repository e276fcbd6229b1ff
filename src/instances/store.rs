use std::collections::HashMap;

use crate::animation::mode::{AnimationMode, ConcreteMode, ModeState};
use crate::animation::state::{self, InstanceTransform, Lifespan};
use crate::foundation::core::Point;

/// Unique, monotonically assigned instance id.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct InstanceId(pub u64);

/// One live, positioned, animating copy of an element.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Instance {
    /// Unique id.
    pub id: InstanceId,
    /// Id of the element this is a copy of.
    pub element_id: String,
    /// Base position on the canvas, pixels.
    pub position: Point,
    /// Resolved pixel size.
    pub size: f64,
    /// Stored rotation in radians; accumulates for rotate mode.
    pub rotation: f64,
    /// Opacity from the last sampled transform.
    pub opacity: f64,
    /// Mode stored at spawn. Stays `Random` for randomized instances.
    pub animation_mode: AnimationMode,
    /// Resolved mode and its per-mode state.
    pub state: ModeState,
    /// Ticks since spawn.
    pub age: u64,
    /// Natural retirement point.
    pub lifespan: Lifespan,
    /// Animation speed multiplier currently applied.
    pub speed: f64,
    /// RNG value captured at spawn for mode-local variation.
    pub rng_draw: f64,
}

impl Instance {
    /// The concrete mode the instance animates with.
    pub fn actual_mode(&self) -> ConcreteMode {
        self.state.mode()
    }

    /// Elapsed-progress ratio.
    pub fn progress(&self) -> f64 {
        state::progress(self.actual_mode(), self.lifespan, self.age, self.speed)
    }

    /// Transform for the current age.
    pub fn transform(&self) -> InstanceTransform {
        state::sample(&self.state, self.progress(), self.rotation)
    }
}

/// Live instances keyed by id.
///
/// Iteration order is unspecified. Callers that need determinism use [`InstanceStore::sorted_ids`].
#[derive(Debug, Default)]
pub struct InstanceStore {
    items: HashMap<InstanceId, Instance>,
}

impl InstanceStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert, replacing any instance with the same id.
    pub fn insert(&mut self, instance: Instance) {
        self.items.insert(instance.id, instance);
    }

    /// Remove by id.
    pub fn remove(&mut self, id: InstanceId) -> Option<Instance> {
        self.items.remove(&id)
    }

    /// Look up by id.
    pub fn get(&self, id: InstanceId) -> Option<&Instance> {
        self.items.get(&id)
    }

    /// Look up by id, mutably.
    pub fn get_mut(&mut self, id: InstanceId) -> Option<&mut Instance> {
        self.items.get_mut(&id)
    }

    /// Number of live instances.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// `true` when empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Visit every instance in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = &Instance> {
        self.items.values()
    }

    /// Visit every instance mutably in unspecified order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Instance> {
        self.items.values_mut()
    }

    /// Drop everything.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// All ids, ascending (spawn order).
    pub fn sorted_ids(&self) -> Vec<InstanceId> {
        let mut ids: Vec<InstanceId> = self.items.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Ids of one element's instances, ascending.
    pub fn ids_of(&self, element_id: &str) -> Vec<InstanceId> {
        let mut ids: Vec<InstanceId> = self
            .items
            .values()
            .filter(|i| i.element_id == element_id)
            .map(|i| i.id)
            .collect();
        ids.sort_unstable();
        ids
    }

    /// Instances in ascending id order.
    pub fn sorted(&self) -> Vec<&Instance> {
        let mut all: Vec<&Instance> = self.items.values().collect();
        all.sort_unstable_by_key(|i| i.id);
        all
    }

    /// Remove the `n` oldest instances, returning how many were removed.
    pub fn evict_oldest(&mut self, n: usize) -> usize {
        let ids = self.sorted_ids();
        let mut removed = 0;
        for id in ids.into_iter().take(n) {
            if self.items.remove(&id).is_some() {
                removed += 1;
            }
        }
        removed
    }

    /// Remove every instance whose finite lifespan has run out.
    pub fn retire_expired(&mut self) -> usize {
        let before = self.items.len();
        self.items.retain(|_, i| !i.lifespan.expired(i.age));
        before - self.items.len()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/instances/store.rs"]
mod tests;
