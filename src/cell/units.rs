//! Conversion between particle counts and millimolar concentrations.
//!
//! The cell is treated as a sphere whose surface area is the membrane area stored
//! under [CELL_SA] in the particle map. Volume growth stops once the cell has
//! doubled its reference volume.

use std::f64::consts::PI;

use crate::data::{ParticleMap, CELL_SA, CELL_VOLUME};
use crate::error::CellError;

/// Avogadro's number
pub const AVOGADRO: f64 = 6.022e23;

/// Radius of the reference cell in meters (400 nm diameter)
pub const REFERENCE_RADIUS: f64 = 200e-9;

/// Largest volume in liters the cell may reach
pub const VOLUME_CEILING: f64 = 6.70e-17;

/// Scale of the integer volume record kept under [CELL_VOLUME]
pub const VOLUME_RECORD_SCALE: f64 = 1e19;

/// Volume record stored once the ceiling is hit
pub const VOLUME_CEILING_RECORD: u64 = 670;

/// Volume in liters of the reference cell.
///
/// The ceiling is twice this volume. Conversions driven by the particle map never
/// fall back to it; a caller without a recorded surface area converts against it
/// explicitly with `Volume::from_liters(reference_volume())`.
pub fn reference_volume() -> f64 {
    sphere_volume(REFERENCE_RADIUS)
}

#[inline]
fn sphere_volume(radius: f64) -> f64 {
    (4.0 / 3.0) * PI * radius.powi(3) * 1000.0
}

/// Unclamped volume in liters of a sphere with `surface_area` nm^2
#[inline]
pub fn volume_from_surface_area(surface_area: f64) -> f64 {
    let radius = (surface_area / 4.0 / PI).sqrt() * 1e-9;
    sphere_volume(radius)
}

/// Derive the cell volume from the stored surface area and record it under [CELL_VOLUME].
///
/// Returns the volume in liters, clamped to [VOLUME_CEILING].
pub fn cell_volume(pmap: &mut ParticleMap) -> f64 {
    let volume = volume_from_surface_area(pmap.count(CELL_SA) as f64);
    if volume > VOLUME_CEILING {
        pmap.set(CELL_VOLUME, VOLUME_CEILING_RECORD);
        VOLUME_CEILING
    } else {
        pmap.set(CELL_VOLUME, (volume * VOLUME_RECORD_SCALE).round_ties_even() as u64);
        volume
    }
}

/// Convert a particle count to a millimolar concentration in the current cell volume
pub fn particles_to_mm(particles: u64, pmap: &mut ParticleMap) -> Result<f64, CellError> {
    Ok(Volume::of(pmap)?.to_mm(particles))
}

/// Convert a millimolar concentration to the nearest particle count in the current cell volume
pub fn mm_to_particles(conc: f64, pmap: &mut ParticleMap) -> u64 {
    Volume::measure(pmap).to_particles(conc)
}

/// A cell volume fixed for the duration of one conversion pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Volume {
    liters: f64,
}

impl Volume {
    /// Measure the current volume, recording it in the particle map.
    ///
    /// The result may be zero when no surface area has been recorded yet.
    pub fn measure(pmap: &mut ParticleMap) -> Self {
        Self {
            liters: cell_volume(pmap),
        }
    }

    /// Like [Volume::measure], but fails when the volume is zero
    pub fn of(pmap: &mut ParticleMap) -> Result<Self, CellError> {
        let volume = Self::measure(pmap);
        if volume.liters > 0.0 {
            Ok(volume)
        } else {
            Err(CellError::DegenerateVolume {
                surface_area: pmap.count(CELL_SA),
            })
        }
    }

    pub fn from_liters(liters: f64) -> Self {
        Self { liters }
    }

    pub fn liters(&self) -> f64 {
        self.liters
    }

    #[inline]
    pub fn to_mm(&self, particles: u64) -> f64 {
        (particles as f64 * 1000.0) / (AVOGADRO * self.liters)
    }

    /// Negative concentrations are treated as zero.
    #[inline]
    pub fn to_particles(&self, conc: f64) -> u64 {
        let particles = ((conc / 1000.0) * AVOGADRO * self.liters).round_ties_even();
        if particles.is_finite() && particles > 0.0 {
            particles as u64
        } else {
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn reference_cell_is_half_the_ceiling() {
        assert_relative_eq!(reference_volume() * 2.0, VOLUME_CEILING, max_relative = 1e-3);
    }

    #[test]
    fn volume_is_recorded_scaled() {
        // 4 pi (200 nm)^2
        let sa = (4.0 * PI * 200.0_f64.powi(2)).round() as u64;
        let mut pmap = ParticleMap::from([(CELL_SA, sa)]);
        let v = cell_volume(&mut pmap);
        assert_relative_eq!(v, reference_volume(), max_relative = 1e-5);
        assert_eq!(pmap.count(CELL_VOLUME), (v * 1e19).round_ties_even() as u64);
    }

    #[test]
    fn volume_is_clamped_above_the_ceiling() {
        let mut pmap = ParticleMap::from([(CELL_SA, 2_000_000)]);
        assert_eq!(cell_volume(&mut pmap), VOLUME_CEILING);
        assert_eq!(pmap.count(CELL_VOLUME), VOLUME_CEILING_RECORD);
    }

    #[test]
    fn zero_surface_area_is_rejected() {
        let mut pmap = ParticleMap::new();
        assert!(matches!(
            particles_to_mm(10, &mut pmap),
            Err(CellError::DegenerateVolume { surface_area: 0 })
        ));
        assert_eq!(mm_to_particles(1.0, &mut pmap), 0);
    }

    #[test]
    fn negative_concentration_maps_to_zero_particles() {
        let volume = Volume::from_liters(reference_volume());
        assert_eq!(volume.to_particles(-1e-3), 0);
    }

    #[test]
    fn one_millimolar_in_the_reference_cell() {
        let volume = Volume::from_liters(reference_volume());
        // 1 mM in 3.35e-17 L is roughly 20,000 molecules
        let n = volume.to_particles(1.0);
        assert!((20_000..20_400).contains(&n), "got {n}");
    }
}
