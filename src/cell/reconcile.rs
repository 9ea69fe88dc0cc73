//! Settlement of resource costs accumulated by the stochastic processes.
//!
//! Transcription, translation, replication, degradation and translocation record the
//! nucleotides, energy carriers and charged tRNAs they spend in cost accumulator
//! species. After each ODE solve those accumulators are charged against the pools
//! they draw from. A cost larger than its pool drains the pool and the remainder
//! stays in the accumulator as debt for the next communication step.

use serde::{Deserialize, Serialize};

use crate::data::ParticleMap;

/// A cost accumulator charged against a pool, crediting byproducts for what was spent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Debt {
    pub cost: String,
    pub pool: String,
    pub byproducts: Vec<String>,
}

impl Debt {
    pub fn new(cost: &str, pool: &str, byproducts: &[&str]) -> Self {
        Self {
            cost: cost.to_string(),
            pool: pool.to_string(),
            byproducts: byproducts.iter().map(|b| b.to_string()).collect(),
        }
    }

    /// Charge the accumulated cost against the pool and return the amount spent.
    pub fn settle(&self, pmap: &mut ParticleMap) -> u64 {
        let cost = pmap.count(&self.cost);
        let spent = pmap.take(&self.pool, cost);
        pmap.set(self.cost.clone(), cost - spent);
        for byproduct in &self.byproducts {
            pmap.add(byproduct, spent);
        }
        spent
    }
}

/// Degradation products returned unconditionally to their parent pool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recycle {
    pub source: String,
    pub pool: String,
}

impl Recycle {
    pub fn new(source: &str, pool: &str) -> Self {
        Self {
            source: source.to_string(),
            pool: pool.to_string(),
        }
    }

    pub fn settle(&self, pmap: &mut ParticleMap) -> u64 {
        let amount = pmap.count(&self.source);
        pmap.add(&self.pool, amount);
        pmap.set(self.source.clone(), 0);
        amount
    }
}

/// Resource category a debt belongs to.
///
/// NMP recycling has no category: it moves the whole source and never leaves debt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Energy,
    Ntp,
    Dntp,
    ChargedTrna,
}

/// A cost that could not be covered by its pool
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outstanding {
    pub category: Category,
    pub cost: String,
    pub pool: String,
    pub remaining: u64,
}

/// What one settlement pass consumed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settlement {
    pub energy: u64,
    pub ntp: u64,
    pub dntp: u64,
    pub recycled_nmp: u64,
    pub charged_trna: u64,
    pub outstanding: Vec<Outstanding>,
}

impl Settlement {
    pub fn is_balanced(&self) -> bool {
        self.outstanding.is_empty()
    }

    fn charge(&mut self, category: Category, debt: &Debt, pmap: &mut ParticleMap) {
        let spent = debt.settle(pmap);
        match category {
            Category::Energy => self.energy += spent,
            Category::Ntp => self.ntp += spent,
            Category::Dntp => self.dntp += spent,
            Category::ChargedTrna => self.charged_trna += spent,
        }
        let remaining = pmap.count(&debt.cost);
        if remaining > 0 {
            log::debug!(
                "{} exceeded {} by {} particles, carrying the debt forward",
                debt.cost,
                debt.pool,
                remaining
            );
            self.outstanding.push(Outstanding {
                category,
                cost: debt.cost.clone(),
                pool: debt.pool.clone(),
                remaining,
            });
        }
    }
}

const AMINO_ACIDS: [&str; 20] = [
    "ala", "arg", "asn", "asp", "cys", "glu", "gln", "gly", "his", "ile", "leu", "lys", "met",
    "phe", "pro", "ser", "thr", "trp", "tyr", "val",
];

/// The cost tables settled after every ODE solve
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostLedger {
    pub energy: Vec<Debt>,
    pub ntp: Vec<Debt>,
    pub dntp: Vec<Debt>,
    pub nmp: Vec<Recycle>,
    pub charged_trna: Vec<Debt>,
}

impl Default for CostLedger {
    fn default() -> Self {
        let energy = ["ATP_translat", "ATP_trsc", "ATP_mRNAdeg", "ATP_DNArep", "ATP_transloc"]
            .iter()
            .map(|cost| {
                // Translation elongation hydrolyses GTP, everything else ATP
                if cost.contains("translat") {
                    Debt::new(cost, "M_gtp_c", &["M_gdp_c", "M_pi_c"])
                } else {
                    Debt::new(cost, "M_atp_c", &["M_adp_c", "M_pi_c"])
                }
            })
            .collect();

        let mut ntp = Vec::with_capacity(12);
        for rna in ["mRNA", "tRNA", "rRNA"] {
            for base in ["A", "C", "U", "G"] {
                ntp.push(Debt::new(
                    &format!("{}TP_{}", base, rna),
                    &format!("M_{}tp_c", base.to_lowercase()),
                    &["M_ppi_c"],
                ));
            }
        }

        let dntp = ["A", "T", "C", "G"]
            .iter()
            .map(|base| {
                Debt::new(
                    &format!("d{}TP_DNArep", base),
                    &format!("M_d{}tp_c", base.to_lowercase()),
                    &["M_ppi_c"],
                )
            })
            .collect();

        let nmp = ["A", "U", "C", "G"]
            .iter()
            .map(|base| {
                Recycle::new(
                    &format!("{}MP_mRNAdeg", base),
                    &format!("M_{}mp_c", base.to_lowercase()),
                )
            })
            .collect();

        let charged_trna = vec![Debt::new("FMET_cost", "M_fmettrna_c", &["M_trnamet_c"])];

        Self {
            energy,
            ntp,
            dntp,
            nmp,
            charged_trna,
        }
    }
}

impl CostLedger {
    /// Add the aminoacyl-tRNA costs of the twenty standard amino acids
    pub fn with_amino_acid_trna(mut self) -> Self {
        for aa in AMINO_ACIDS {
            let cost = format!("{}_cost", aa.to_uppercase());
            if self.charged_trna.iter().any(|d| d.cost == cost) {
                continue;
            }
            self.charged_trna.push(Debt::new(
                &cost,
                &format!("M_{}trna_c", aa),
                &[&format!("M_trna{}_c", aa)],
            ));
        }
        self
    }

    /// Settle every table against the particle map.
    ///
    /// Tables are applied in order energy, NTP, dNTP, NMP recycling, charged tRNA.
    /// Each entry is settled once and independently of the others.
    pub fn settle(&self, pmap: &mut ParticleMap) -> Settlement {
        let mut settlement = Settlement::default();
        for debt in &self.energy {
            settlement.charge(Category::Energy, debt, pmap);
        }
        for debt in &self.ntp {
            settlement.charge(Category::Ntp, debt, pmap);
        }
        for debt in &self.dntp {
            settlement.charge(Category::Dntp, debt, pmap);
        }
        for recycle in &self.nmp {
            settlement.recycled_nmp += recycle.settle(pmap);
        }
        for debt in &self.charged_trna {
            settlement.charge(Category::ChargedTrna, debt, pmap);
        }
        settlement
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cost_below_pool_is_paid_in_full() {
        let mut pmap = ParticleMap::from([("ATP_trsc", 30), ("M_atp_c", 100), ("M_adp_c", 5)]);
        let debt = Debt::new("ATP_trsc", "M_atp_c", &["M_adp_c", "M_pi_c"]);
        assert_eq!(debt.settle(&mut pmap), 30);
        assert_eq!(pmap.count("ATP_trsc"), 0);
        assert_eq!(pmap.count("M_atp_c"), 70);
        assert_eq!(pmap.count("M_adp_c"), 35);
        assert_eq!(pmap.count("M_pi_c"), 30);
    }

    #[test]
    fn cost_above_pool_drains_it_and_keeps_the_debt() {
        let mut pmap = ParticleMap::from([("GTP_mRNA", 50), ("M_gtp_c", 20)]);
        let debt = Debt::new("GTP_mRNA", "M_gtp_c", &["M_ppi_c"]);
        assert_eq!(debt.settle(&mut pmap), 20);
        assert_eq!(pmap.count("GTP_mRNA"), 30);
        assert_eq!(pmap.count("M_gtp_c"), 0);
        assert_eq!(pmap.count("M_ppi_c"), 20);
    }

    #[test]
    fn translation_is_charged_to_gtp() {
        let ledger = CostLedger::default();
        let translat = ledger
            .energy
            .iter()
            .find(|d| d.cost == "ATP_translat")
            .unwrap();
        assert_eq!(translat.pool, "M_gtp_c");
        assert_eq!(translat.byproducts, vec!["M_gdp_c", "M_pi_c"]);
        assert!(ledger
            .energy
            .iter()
            .filter(|d| d.cost != "ATP_translat")
            .all(|d| d.pool == "M_atp_c"));
    }

    #[test]
    fn default_tables_have_the_expected_sizes() {
        let ledger = CostLedger::default();
        assert_eq!(ledger.energy.len(), 5);
        assert_eq!(ledger.ntp.len(), 12);
        assert_eq!(ledger.dntp.len(), 4);
        assert_eq!(ledger.nmp.len(), 4);
        assert_eq!(ledger.charged_trna.len(), 1);
        assert_eq!(ledger.with_amino_acid_trna().charged_trna.len(), 21);
    }

    #[test]
    fn default_tables_name_their_pools() {
        let ledger = CostLedger::default();
        let utp_trna = ledger.ntp.iter().find(|d| d.cost == "UTP_tRNA").unwrap();
        assert_eq!(utp_trna.pool, "M_utp_c");
        assert_eq!(utp_trna.byproducts, vec!["M_ppi_c".to_string()]);

        let dttp = ledger.dntp.iter().find(|d| d.cost == "dTTP_DNArep").unwrap();
        assert_eq!(dttp.pool, "M_dttp_c");

        let gmp = ledger.nmp.iter().find(|r| r.source == "GMP_mRNAdeg").unwrap();
        assert_eq!(gmp.pool, "M_gmp_c");

        let translat = &ledger.energy[0];
        assert_eq!(translat.cost, "ATP_translat");
        assert_eq!(translat.pool, "M_gtp_c");
        assert_eq!(translat.byproducts, vec!["M_gdp_c", "M_pi_c"]);

        let trna = CostLedger::default().with_amino_acid_trna();
        let ala = trna.charged_trna.iter().find(|d| d.cost == "ALA_cost").unwrap();
        assert_eq!(ala.pool, "M_alatrna_c");
        assert_eq!(ala.byproducts, vec!["M_trnaala_c"]);
    }

    #[test]
    fn nmp_is_recycled_unconditionally() {
        let mut pmap = ParticleMap::from([("AMP_mRNAdeg", 12), ("M_amp_c", 3)]);
        let settlement = CostLedger::default().settle(&mut pmap);
        assert_eq!(settlement.recycled_nmp, 12);
        assert_eq!(pmap.count("AMP_mRNAdeg"), 0);
        assert_eq!(pmap.count("M_amp_c"), 15);
    }

    #[test]
    fn settlement_reports_outstanding_debt() {
        let mut pmap = ParticleMap::from([
            ("ATP_trsc", 10),
            ("ATP_DNArep", 10),
            ("M_atp_c", 15),
            ("FMET_cost", 4),
            ("M_fmettrna_c", 1),
        ]);
        let settlement = CostLedger::default().settle(&mut pmap);
        assert_eq!(settlement.energy, 15);
        assert_eq!(settlement.charged_trna, 1);
        assert_eq!(pmap.count("M_trnamet_c"), 1);
        assert_eq!(
            settlement.outstanding,
            vec![
                Outstanding {
                    category: Category::Energy,
                    cost: "ATP_DNArep".to_string(),
                    pool: "M_atp_c".to_string(),
                    remaining: 5,
                },
                Outstanding {
                    category: Category::ChargedTrna,
                    cost: "FMET_cost".to_string(),
                    pool: "M_fmettrna_c".to_string(),
                    remaining: 3,
                },
            ]
        );
    }
}
