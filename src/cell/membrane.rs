//! Membrane surface-area accounting.
//!
//! The surface area grows from two sources: lipid headgroups, weighted by their
//! per-species area and restricted to the outer leaflet, and membrane proteins,
//! each occupying a fixed average area.

use serde::{Deserialize, Serialize};

use crate::data::{ParticleMap, CELL_SA, CELL_SA_LIPID, CELL_SA_PROTEIN};

/// Fraction of the bilayer area facing outward for a ~5 nm thick membrane
pub const OUTER_LEAFLET_FRACTION: f64 = 0.513;

/// Average projected area of a membrane protein in nm^2 (54% coverage for 9.6K proteins)
pub const AVERAGE_PROTEIN_AREA: f64 = 28.0;

/// Headgroup areas in nm^2
const LIPID_HEADGROUP_AREAS: [(&str, f64); 9] = [
    ("M_clpn_c", 0.4),
    ("M_chsterol_c", 0.35),
    ("M_sm_c", 0.45),
    ("M_pc_c", 0.55),
    ("M_pg_c", 0.6),
    ("M_galfur12dgr_c", 0.6),
    ("M_12dgr_c", 0.5),
    ("M_pa_c", 0.5),
    ("M_cdpdag_c", 0.5),
];

// ATPase subunits _0793, _0794 and _0796 are not transmembrane.
const MEMBRANE_PROTEINS: [&str; 93] = [
    "JCVISYN3A_0005", "JCVISYN3A_0008", "JCVISYN3A_0009", "JCVISYN3A_0010", "JCVISYN3A_0011",
    "JCVISYN3A_0030", "JCVISYN3A_0034", "JCVISYN3A_0060", "JCVISYN3A_0095", "JCVISYN3A_0113",
    "JCVISYN3A_0114", "JCVISYN3A_0116", "JCVISYN3A_0117", "JCVISYN3A_0132", "JCVISYN3A_0143",
    "JCVISYN3A_0146", "JCVISYN3A_0164", "JCVISYN3A_0165", "JCVISYN3A_0166", "JCVISYN3A_0167",
    "JCVISYN3A_0168", "JCVISYN3A_0169", "JCVISYN3A_0195", "JCVISYN3A_0196", "JCVISYN3A_0197",
    "JCVISYN3A_0235", "JCVISYN3A_0239", "JCVISYN3A_0248", "JCVISYN3A_0249", "JCVISYN3A_0296",
    "JCVISYN3A_0304", "JCVISYN3A_0314", "JCVISYN3A_0317", "JCVISYN3A_0326", "JCVISYN3A_0332",
    "JCVISYN3A_0338", "JCVISYN3A_0345", "JCVISYN3A_0346", "JCVISYN3A_0371", "JCVISYN3A_0372",
    "JCVISYN3A_0379", "JCVISYN3A_0388", "JCVISYN3A_0398", "JCVISYN3A_0399", "JCVISYN3A_0411",
    "JCVISYN3A_0425", "JCVISYN3A_0426", "JCVISYN3A_0427", "JCVISYN3A_0428", "JCVISYN3A_0439",
    "JCVISYN3A_0440", "JCVISYN3A_0478", "JCVISYN3A_0481", "JCVISYN3A_0505", "JCVISYN3A_0516",
    "JCVISYN3A_0601", "JCVISYN3A_0639", "JCVISYN3A_0641", "JCVISYN3A_0642", "JCVISYN3A_0643",
    "JCVISYN3A_0652", "JCVISYN3A_0685", "JCVISYN3A_0686", "JCVISYN3A_0691", "JCVISYN3A_0696",
    "JCVISYN3A_0706", "JCVISYN3A_0707", "JCVISYN3A_0708", "JCVISYN3A_0774", "JCVISYN3A_0777",
    "JCVISYN3A_0778", "JCVISYN3A_0779", "JCVISYN3A_0787", "JCVISYN3A_0789", "JCVISYN3A_0790",
    "JCVISYN3A_0791", "JCVISYN3A_0792", "JCVISYN3A_0795", "JCVISYN3A_0797", "JCVISYN3A_0822",
    "JCVISYN3A_0827", "JCVISYN3A_0830", "JCVISYN3A_0835", "JCVISYN3A_0836", "JCVISYN3A_0839",
    "JCVISYN3A_0852", "JCVISYN3A_0870", "JCVISYN3A_0872", "JCVISYN3A_0876", "JCVISYN3A_0878",
    "JCVISYN3A_0879", "JCVISYN3A_0881", "JCVISYN3A_0908",
];

/// A membrane protein tracked under its own species names rather than `M_PTN_<locus>_c`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProteinAlias {
    pub locus: String,
    pub species: Vec<String>,
}

/// Membrane composition used to turn particle counts into surface area
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MembraneComposition {
    /// Lipid species and their headgroup area in nm^2
    pub lipid_areas: Vec<(String, f64)>,
    pub outer_leaflet_fraction: f64,
    /// Locus tags of the transmembrane proteins
    pub membrane_proteins: Vec<String>,
    pub protein_aliases: Vec<ProteinAlias>,
    /// nm^2 per membrane protein
    pub average_protein_area: f64,
}

impl Default for MembraneComposition {
    fn default() -> Self {
        Self {
            lipid_areas: LIPID_HEADGROUP_AREAS
                .iter()
                .map(|(id, area)| (id.to_string(), *area))
                .collect(),
            outer_leaflet_fraction: OUTER_LEAFLET_FRACTION,
            membrane_proteins: MEMBRANE_PROTEINS.iter().map(|s| s.to_string()).collect(),
            protein_aliases: vec![ProteinAlias {
                locus: "JCVISYN3A_0779".to_string(),
                species: vec!["ptsg".to_string(), "ptsg_P".to_string()],
            }],
            average_protein_area: AVERAGE_PROTEIN_AREA,
        }
    }
}

/// Surface area contributions in nm^2
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurfaceArea {
    pub lipid: u64,
    pub protein: u64,
}

impl SurfaceArea {
    pub fn total(&self) -> u64 {
        self.lipid + self.protein
    }
}

impl MembraneComposition {
    /// Outer-leaflet lipid area, rounded to the nearest nm^2 with ties to even
    pub fn lipid_area(&self, pmap: &ParticleMap) -> u64 {
        let area: f64 = self
            .lipid_areas
            .iter()
            .map(|(id, area)| pmap.count(id) as f64 * area)
            .sum();
        (area * self.outer_leaflet_fraction).round_ties_even().max(0.0) as u64
    }

    /// Number of membrane protein particles in the map
    pub fn membrane_protein_count(&self, pmap: &ParticleMap) -> u64 {
        self.membrane_proteins
            .iter()
            .map(|locus| {
                match self.protein_aliases.iter().find(|alias| &alias.locus == locus) {
                    Some(alias) => alias.species.iter().map(|id| pmap.count(id)).sum(),
                    None => pmap.count(&protein_species(locus)),
                }
            })
            .sum()
    }

    /// Protein area in nm^2, truncated
    pub fn protein_area(&self, pmap: &ParticleMap) -> u64 {
        (self.membrane_protein_count(pmap) as f64 * self.average_protein_area).max(0.0) as u64
    }

    pub fn surface_area(&self, pmap: &ParticleMap) -> SurfaceArea {
        SurfaceArea {
            lipid: self.lipid_area(pmap),
            protein: self.protein_area(pmap),
        }
    }

    /// Recompute the surface area and store it in the particle map
    pub fn update_surface_area(&self, pmap: &mut ParticleMap) -> SurfaceArea {
        let sa = self.surface_area(pmap);
        pmap.set(CELL_SA_LIPID, sa.lipid);
        pmap.set(CELL_SA, sa.total());
        pmap.set(CELL_SA_PROTEIN, sa.protein);
        log::debug!(
            "surface area: lipid {} nm^2, protein {} nm^2, total {} nm^2",
            sa.lipid,
            sa.protein,
            sa.total()
        );
        sa
    }
}

/// Particle map id of the protein product of `locus`
pub fn protein_species(locus: &str) -> String {
    format!("M_PTN_{}_c", locus)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_composition_matches_the_syn3a_tables() {
        let membrane = MembraneComposition::default();
        assert_eq!(membrane.lipid_areas.len(), 9);
        assert_eq!(membrane.membrane_proteins.len(), 93);
        assert!(!membrane
            .membrane_proteins
            .iter()
            .any(|p| p == "JCVISYN3A_0793"));
    }

    #[test]
    fn lipid_area_uses_the_outer_leaflet() {
        let pmap = ParticleMap::from([("M_pc_c", 1000), ("M_chsterol_c", 1000)]);
        let membrane = MembraneComposition::default();
        // (550 + 350) * 0.513 = 461.7
        assert_eq!(membrane.lipid_area(&pmap), 462);
    }

    #[test]
    fn half_square_nanometers_round_to_even() {
        let membrane = MembraneComposition::default();
        // 1000 * 0.5 * 0.513 = 256.5
        let pmap = ParticleMap::from([("M_pa_c", 1000)]);
        assert_eq!(membrane.lipid_area(&pmap), 256);
        // 5000 * 0.5 * 0.513 = 1282.5
        let pmap = ParticleMap::from([("M_pa_c", 5000)]);
        assert_eq!(membrane.lipid_area(&pmap), 1282);
    }

    #[test]
    fn aliased_proteins_are_counted_under_their_species_names() {
        let pmap = ParticleMap::from([
            ("ptsg", 3),
            ("ptsg_P", 2),
            ("M_PTN_JCVISYN3A_0779_c", 100),
            ("M_PTN_JCVISYN3A_0005_c", 5),
        ]);
        let membrane = MembraneComposition::default();
        assert_eq!(membrane.membrane_protein_count(&pmap), 10);
        assert_eq!(membrane.protein_area(&pmap), 280);
    }

    #[test]
    fn update_stores_all_three_entries() {
        let mut pmap = ParticleMap::from([("M_pg_c", 100), ("M_PTN_JCVISYN3A_0008_c", 1)]);
        let sa = MembraneComposition::default().update_surface_area(&mut pmap);
        // 60 * 0.513 = 30.78
        assert_eq!(sa, SurfaceArea { lipid: 31, protein: 28 });
        assert_eq!(pmap.count(CELL_SA_LIPID), 31);
        assert_eq!(pmap.count(CELL_SA_PROTEIN), 28);
        assert_eq!(pmap.count(CELL_SA), 59);
    }
}
