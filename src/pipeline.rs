//! Full design pipeline from one input snapshot, with an optional memo.

use std::collections::{HashMap, VecDeque};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use serde::Serialize;

use crate::config::ProjectConfig;
use crate::design::{ArrayDesign, compute_array_design};
use crate::sim::compute_economics_with_storage;
use crate::sim::types::SimulationResult;

/// Engineering design and economic simulation of one project.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectResult {
    pub design: ArrayDesign,
    pub simulation: SimulationResult,
}

/// Runs the whole pipeline: array design, then the economics on the
/// designed DC capacity.
///
/// Stateless; identical inputs always give identical results.
pub fn compute(cfg: &ProjectConfig) -> ProjectResult {
    let design = compute_array_design(&cfg.module, &cfg.inverter, &cfg.system);
    let simulation = compute_economics_with_storage(
        design.array.total_dc_capacity_kw,
        design.dc_ac_ratio,
        &cfg.economic,
        &cfg.system.bess,
    );
    ProjectResult { design, simulation }
}

/// Number of results a [`DesignCache`] keeps unless told otherwise.
pub const DEFAULT_CACHE_CAPACITY: usize = 64;

/// Caller-owned memo of pipeline results keyed by an input hash.
///
/// The key covers every persisted field and the attached weather records.
/// Holds at most `capacity` results; the oldest entry is evicted first.
#[derive(Debug)]
pub struct DesignCache {
    entries: HashMap<u64, Arc<ProjectResult>>,
    order: VecDeque<u64>,
    capacity: usize,
    hits: u64,
    misses: u64,
}

impl Default for DesignCache {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CACHE_CAPACITY)
    }
}

impl DesignCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a cache holding at most `capacity` results (at least one).
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            order: VecDeque::new(),
            capacity: capacity.max(1),
            hits: 0,
            misses: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the cached result for `cfg`, computing it on first use.
    pub fn get_or_compute(&mut self, cfg: &ProjectConfig) -> Arc<ProjectResult> {
        let Some(key) = snapshot_key(cfg) else {
            self.misses += 1;
            return Arc::new(compute(cfg));
        };
        if let Some(hit) = self.entries.get(&key) {
            self.hits += 1;
            return Arc::clone(hit);
        }
        self.misses += 1;
        let result = Arc::new(compute(cfg));
        while self.order.len() >= self.capacity {
            let Some(oldest) = self.order.pop_front() else {
                break;
            };
            self.entries.remove(&oldest);
            tracing::debug!(key = oldest, "design cache entry evicted");
        }
        self.entries.insert(key, Arc::clone(&result));
        self.order.push_back(key);
        result
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `(hits, misses)` since creation.
    pub fn stats(&self) -> (u64, u64) {
        (self.hits, self.misses)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }
}

/// Hash of the serialized inputs, or `None` if they do not serialize.
fn snapshot_key(cfg: &ProjectConfig) -> Option<u64> {
    let inputs = serde_json::to_string(cfg).ok()?;
    let weather = serde_json::to_string(&cfg.economic.weather).ok()?;
    let mut hasher = DefaultHasher::new();
    inputs.hash(&mut hasher);
    weather.hash(&mut hasher);
    Some(hasher.finish())
}
