//! One communication step between the stochastic and the continuous solver.

use crate::cell::{CostLedger, MembraneComposition, Settlement, SurfaceArea, Volume};
use crate::config::CouplingConfig;
use crate::data::{CountsRecorder, ParticleMap, SURFACE_AREA_KEYS};
use crate::error::CellError;
use crate::simulator::model::KineticModel;
use crate::simulator::ode::solve;

/// Outcome of writing one ODE solution back to the particle map
#[derive(Debug, Clone, PartialEq)]
pub struct WriteReport {
    pub settlement: Settlement,
    pub surface_area: SurfaceArea,
    /// Cell volume in liters before the surface area was recomputed
    pub volume: f64,
    /// Metabolites whose concentration came back negative and were set to zero
    pub clamped: Vec<String>,
    /// Set when the write happened on a whole minute
    pub minute: Option<u64>,
}

#[inline]
fn is_surface_area(id: &str) -> bool {
    SURFACE_AREA_KEYS.contains(&id)
}

/// Whole minute reached at `time` seconds, if any
pub fn whole_minute(time: f64) -> Option<u64> {
    let seconds = time.trunc();
    if seconds >= 0.0 && seconds % 60.0 == 0.0 {
        Some((seconds / 60.0) as u64)
    } else {
        None
    }
}

/// Concentrations in mM of every model metabolite, in metabolite order.
///
/// Surface-area entries are passed through unconverted.
pub fn initial_concentrations(
    model: &KineticModel,
    pmap: &mut ParticleMap,
) -> Result<Vec<f64>, CellError> {
    let volume = Volume::of(pmap)?;
    Ok(model
        .metabolites()
        .iter()
        .map(|met| {
            let count = pmap.count(met.id());
            if is_surface_area(met.id()) {
                count as f64
            } else {
                volume.to_mm(count)
            }
        })
        .collect())
}

/// Write an ODE solution back into the particle map.
///
/// Every metabolite except the surface-area entries is converted to a particle
/// count. The cost ledger is then settled and the surface area recomputed, so the
/// next step sees the cell volume implied by the new lipid and protein counts.
pub fn write_results(
    pmap: &mut ParticleMap,
    model: &KineticModel,
    res: &[f64],
    time: f64,
    membrane: &MembraneComposition,
    ledger: &CostLedger,
) -> Result<WriteReport, CellError> {
    let metabolites = model.metabolites();
    if res.len() != metabolites.len() {
        return Err(CellError::ResultLength {
            expected: metabolites.len(),
            got: res.len(),
        });
    }

    let volume = Volume::of(pmap)?;
    let mut clamped = Vec::new();
    for (met, &conc) in metabolites.iter().zip(res) {
        if is_surface_area(met.id()) {
            continue;
        }
        if conc < 0.0 {
            clamped.push(met.id.clone());
        }
        pmap.set(met.id.clone(), volume.to_particles(conc));
    }
    if !clamped.is_empty() {
        log::warn!(
            "{} metabolites came back with negative concentrations and were set to zero: {:?}",
            clamped.len(),
            clamped
        );
    }

    let settlement = ledger.settle(pmap);

    // Surface area is recomputed on every write, once per communication step
    let surface_area = membrane.update_surface_area(pmap);
    log::debug!("Recalculated lipid surface area at t = {}", time);

    let minute = whole_minute(time);
    if let Some(minute) = minute {
        log::info!("Reached minute {}", minute);
    }

    Ok(WriteReport {
        settlement,
        surface_area,
        volume: volume.liters(),
        clamped,
        minute,
    })
}

/// Runs communication steps for one kinetic model against a particle map
#[derive(Debug, Clone)]
pub struct Coupler {
    model: KineticModel,
    config: CouplingConfig,
    ledger: CostLedger,
    recorder: CountsRecorder,
}

impl Coupler {
    pub fn new(model: KineticModel, config: CouplingConfig) -> Self {
        let ledger = config.ledger();
        Self {
            model,
            config,
            ledger,
            recorder: CountsRecorder::new(),
        }
    }

    pub fn model(&self) -> &KineticModel {
        &self.model
    }

    pub fn config(&self) -> &CouplingConfig {
        &self.config
    }

    pub fn recorder(&self) -> &CountsRecorder {
        &self.recorder
    }

    /// Compute the initial surface area and volume and record the minute-zero snapshot
    pub fn initialize(&mut self, pmap: &mut ParticleMap) -> SurfaceArea {
        let sa = self.config.membrane.update_surface_area(pmap);
        crate::cell::cell_volume(pmap);
        self.recorder.record(0, pmap);
        sa
    }

    /// Integrate the model from `t0` to `t1` and write the result back into `pmap`
    pub fn communicate(
        &mut self,
        pmap: &mut ParticleMap,
        t0: f64,
        t1: f64,
    ) -> Result<WriteReport, CellError> {
        let y0 = initial_concentrations(&self.model, pmap)?;
        let volume = Volume::of(pmap)?;
        let bound = self.model.bind(pmap, volume)?;
        let res = solve(bound, &y0, t0, t1, &self.config.solver)?;
        let report = write_results(
            pmap,
            &self.model,
            &res,
            t1,
            &self.config.membrane,
            &self.ledger,
        )?;
        if let Some(minute) = report.minute {
            self.recorder.record(minute, pmap);
        }
        Ok(report)
    }

    /// Write the recorded snapshots to the configured output, if any
    pub fn finish(&self) -> Result<(), CellError> {
        match &self.config.output {
            Some(path) => {
                log::info!(
                    "writing {} snapshots to {}",
                    self.recorder.len(),
                    path.display()
                );
                self.recorder.write_csv(path)
            }
            None => Ok(()),
        }
    }
}
