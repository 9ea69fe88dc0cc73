//! Bookkeeping on the particle map: unit conversion, membrane growth and cost settlement.

pub mod membrane;
pub mod reconcile;
pub mod units;

pub use membrane::{MembraneComposition, SurfaceArea};
pub use reconcile::{CostLedger, Settlement};
pub use units::{cell_volume, mm_to_particles, particles_to_mm, Volume};
