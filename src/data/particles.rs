use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Total cell surface area in nm^2
pub const CELL_SA: &str = "CellSA";
/// Lipid share of the surface area in nm^2
pub const CELL_SA_LIPID: &str = "CellSA_Lip";
/// Membrane protein share of the surface area in nm^2
pub const CELL_SA_PROTEIN: &str = "CellSA_Prot";
/// Cell volume in units of 1e-19 L
pub const CELL_VOLUME: &str = "CellV";

/// Derived surface-area entries that never carry ODE results back into the map
pub const SURFACE_AREA_KEYS: [&str; 3] = [CELL_SA, CELL_SA_PROTEIN, CELL_SA_LIPID];

/// The particle map shared between the stochastic and the continuous solver.
///
/// Every chemical species is stored as a non-negative integer count. The derived
/// cell geometry (surface area and volume) is kept in the same map under the keys
/// [CELL_SA], [CELL_SA_LIPID], [CELL_SA_PROTEIN] and [CELL_VOLUME].
///
/// Reading a species that has never been written yields zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticleMap {
    counts: BTreeMap<String, u64>,
}

impl ParticleMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current count of `species`, zero if the species is unknown
    #[inline]
    pub fn count(&self, species: &str) -> u64 {
        self.counts.get(species).copied().unwrap_or(0)
    }

    /// Count of `species`, or `None` if it was never written
    pub fn get(&self, species: &str) -> Option<u64> {
        self.counts.get(species).copied()
    }

    pub fn contains(&self, species: &str) -> bool {
        self.counts.contains_key(species)
    }

    /// Overwrite the count of `species`
    #[inline]
    pub fn set(&mut self, species: impl Into<String>, count: u64) {
        self.counts.insert(species.into(), count);
    }

    /// Add `amount` particles to `species`
    #[inline]
    pub fn add(&mut self, species: &str, amount: u64) {
        let entry = self.counts.entry(species.to_string()).or_insert(0);
        *entry = entry.saturating_add(amount);
    }

    /// Remove up to `amount` particles from `species` and return how many were removed.
    #[inline]
    pub fn take(&mut self, species: &str, amount: u64) -> u64 {
        let entry = self.counts.entry(species.to_string()).or_insert(0);
        let taken = amount.min(*entry);
        *entry -= taken;
        taken
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Species ids in sorted order
    pub fn species(&self) -> impl Iterator<Item = &str> {
        self.counts.keys().map(|k| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.counts.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl<S: Into<String>> FromIterator<(S, u64)> for ParticleMap {
    fn from_iter<I: IntoIterator<Item = (S, u64)>>(iter: I) -> Self {
        Self {
            counts: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

impl<S: Into<String>, const N: usize> From<[(S, u64); N]> for ParticleMap {
    fn from(entries: [(S, u64); N]) -> Self {
        entries.into_iter().collect()
    }
}
