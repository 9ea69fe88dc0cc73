//! Coupling of a deterministic ODE metabolic model to a stochastic particle
//! simulation of a minimal cell.
//!
//! Each communication step the particle counts of the stochastic side are turned
//! into millimolar concentrations, the kinetic model is integrated over the step,
//! and the results are written back as counts. Resource costs recorded by the
//! stochastic processes are then settled against their pools and the membrane
//! surface area, which sets the cell volume, is recomputed.
//!
//! ```ignore
//! use cmeode::prelude::*;
//!
//! let table = ReactionTable::from_file("lipids.json")?;
//! let mut model = KineticModel::new();
//! define_reactions(&mut model, &pmap, &[&table])?;
//!
//! let mut coupler = Coupler::new(model, CouplingConfig::from_file("coupling.json")?);
//! coupler.initialize(&mut pmap);
//! for step in 0..600 {
//!     // ... stochastic step on pmap ...
//!     coupler.communicate(&mut pmap, step as f64, step as f64 + 1.0)?;
//! }
//! coupler.finish()?;
//! ```

pub mod cell;
pub mod config;
pub mod data;
pub mod error;
pub mod simulator;

pub use config::CouplingConfig;
pub use data::ParticleMap;
pub use error::CellError;

pub mod prelude {
    pub use crate::cell::{
        cell_volume, mm_to_particles, particles_to_mm, CostLedger, MembraneComposition,
        Settlement, SurfaceArea, Volume,
    };
    pub use crate::config::CouplingConfig;
    pub use crate::data::{CountsRecorder, ParticleMap};
    pub use crate::error::CellError;
    pub use crate::simulator::{
        define_reactions, solve, Coupler, EnzymaticRate, KineticModel, Participant, Reaction,
        ReactionModule, ReactionTable, SolverOptions, WriteReport,
    };
}
