use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::cell::{CostLedger, MembraneComposition};
use crate::error::CellError;
use crate::simulator::SolverOptions;

/// Settings of the CME-ODE coupling, read from JSON.
///
/// Every field is optional; missing fields take the Syn3A defaults.
///
/// ```json
/// {
///   "charge_all_trna": true,
///   "solver": { "rtol": 1e-6 },
///   "output": "sims/rep-1.csv"
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CouplingConfig {
    pub membrane: MembraneComposition,
    /// Settle the aminoacyl-tRNA costs of all twenty amino acids, not only fMet
    pub charge_all_trna: bool,
    pub solver: SolverOptions,
    /// Where the per-minute species counts are written
    pub output: Option<PathBuf>,
}

impl CouplingConfig {
    pub fn from_json(json: &str) -> Result<Self, CellError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, CellError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn ledger(&self) -> CostLedger {
        if self.charge_all_trna {
            CostLedger::default().with_amino_acid_trna()
        } else {
            CostLedger::default()
        }
    }
}
