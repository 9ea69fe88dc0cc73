use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::cell::Volume;
use crate::data::ParticleMap;
use crate::error::CellError;
use crate::simulator::rates::{enzymatic_rate, EnzymaticRate};

/// Reaction kinds counted by [KineticModel::report], matched against reaction ids
const REPORTED_TYPES: [&str; 3] = ["Transcription", "Translation", "Degradation"];
const DEPENDENT: &str = "Dependent reactions";

fn one() -> f64 {
    1.0
}

/// A rate-law operand: a species looked up at bind time, or a fixed value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Operand {
    Value(f64),
    Species(String),
}

impl From<f64> for Operand {
    fn from(value: f64) -> Self {
        Operand::Value(value)
    }
}

impl From<&str> for Operand {
    fn from(species: &str) -> Self {
        Operand::Species(species.to_string())
    }
}

/// A substrate or product of a reaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    pub species: String,
    #[serde(default = "one")]
    pub stoich: f64,
    /// Michaelis constant in mM
    pub km: f64,
}

impl Participant {
    pub fn new(species: &str, km: f64) -> Self {
        Self {
            species: species.to_string(),
            stoich: 1.0,
            km,
        }
    }

    pub fn with_stoich(mut self, stoich: f64) -> Self {
        self.stoich = stoich;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reaction {
    pub id: String,
    /// Name of a rate form registered with [KineticModel::register_rate_form]
    pub rate_form: String,
    pub substrates: Vec<Participant>,
    pub products: Vec<Participant>,
    pub enzyme: Operand,
    pub kcat_f: f64,
    pub kcat_r: f64,
    #[serde(default = "one")]
    pub onoff: f64,
    /// When set, the rate is accumulated into this metabolite instead of moving
    /// substrates into products.
    #[serde(default)]
    pub result: Option<String>,
}

impl Reaction {
    pub fn new(id: &str, rate_form: &str, enzyme: impl Into<Operand>) -> Self {
        Self {
            id: id.to_string(),
            rate_form: rate_form.to_string(),
            substrates: Vec::new(),
            products: Vec::new(),
            enzyme: enzyme.into(),
            kcat_f: 0.0,
            kcat_r: 0.0,
            onoff: 1.0,
            result: None,
        }
    }

    pub fn substrate(mut self, participant: Participant) -> Self {
        self.substrates.push(participant);
        self
    }

    pub fn product(mut self, participant: Participant) -> Self {
        self.products.push(participant);
        self
    }

    pub fn kcat(mut self, forward: f64, reverse: f64) -> Self {
        self.kcat_f = forward;
        self.kcat_r = reverse;
        self
    }

    pub fn onoff(mut self, onoff: f64) -> Self {
        self.onoff = onoff;
        self
    }

    pub fn result(mut self, metabolite: &str) -> Self {
        self.result = Some(metabolite.to_string());
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Metabolite that receives the rate of a dependent reaction
    pub fn result_id(&self) -> Option<&str> {
        self.result.as_deref()
    }

    pub fn is_dependent(&self) -> bool {
        self.result.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metabolite {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

impl Metabolite {
    pub fn id(&self) -> &str {
        &self.id
    }
}

/// The ODE side of the hybrid model: an ordered metabolite list, the reactions
/// between them and the rate forms those reactions use.
///
/// The metabolite order is the order of insertion and defines the layout of the
/// ODE state vector.
#[derive(Debug, Clone, Default)]
pub struct KineticModel {
    metabolites: Vec<Metabolite>,
    index: HashMap<String, usize>,
    reactions: Vec<Reaction>,
    rate_forms: BTreeMap<String, EnzymaticRate>,
}

impl KineticModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_metabolite(&mut self, id: &str, name: Option<&str>) -> Result<usize, CellError> {
        if self.index.contains_key(id) {
            return Err(CellError::DuplicateMetabolite(id.to_string()));
        }
        let idx = self.metabolites.len();
        self.metabolites.push(Metabolite {
            id: id.to_string(),
            name: name.map(|n| n.to_string()),
        });
        self.index.insert(id.to_string(), idx);
        Ok(idx)
    }

    /// Register a rate form under `name`.
    ///
    /// Registering the same form again under the same name is a no-op; a different
    /// form under a taken name replaces nothing and fails.
    pub fn register_rate_form(&mut self, name: &str, form: EnzymaticRate) -> Result<(), CellError> {
        match self.rate_forms.get(name) {
            Some(existing) if *existing == form => Ok(()),
            Some(existing) => Err(CellError::InvalidRateForm(format!(
                "{} is already registered as {}",
                name,
                existing.template()
            ))),
            None => {
                self.rate_forms.insert(name.to_string(), form);
                Ok(())
            }
        }
    }

    pub fn add_reaction(&mut self, reaction: Reaction) -> Result<(), CellError> {
        if self.reactions.iter().any(|r| r.id == reaction.id) {
            return Err(CellError::DuplicateReaction(reaction.id));
        }
        let form = self
            .rate_forms
            .get(&reaction.rate_form)
            .ok_or_else(|| CellError::UnknownRateForm(reaction.rate_form.clone()))?;
        if form.subs() != reaction.substrates.len() || form.prods() != reaction.products.len() {
            return Err(CellError::RateFormMismatch {
                reaction: reaction.id,
                form: reaction.rate_form,
                subs: reaction.substrates.len(),
                prods: reaction.products.len(),
                expected_subs: form.subs(),
                expected_prods: form.prods(),
            });
        }
        self.reactions.push(reaction);
        Ok(())
    }

    pub fn reactions(&self) -> &[Reaction] {
        &self.reactions
    }

    pub fn metabolites(&self) -> &[Metabolite] {
        &self.metabolites
    }

    pub fn rate_form(&self, name: &str) -> Option<&EnzymaticRate> {
        self.rate_forms.get(name)
    }

    pub fn rate_forms(&self) -> impl Iterator<Item = (&str, &EnzymaticRate)> {
        self.rate_forms.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn metabolite_index(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn nstates(&self) -> usize {
        self.metabolites.len()
    }

    /// Count reactions by kind
    pub fn report(&self) -> ModelReport {
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for rxn in &self.reactions {
            if rxn.is_dependent() {
                *counts.entry(DEPENDENT).or_default() += 1;
                continue;
            }
            for kind in REPORTED_TYPES {
                if rxn.id().contains(kind) {
                    *counts.entry(kind).or_default() += 1;
                }
            }
        }
        let mut entries: Vec<(String, usize)> = counts
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1));
        ModelReport {
            total: self.reactions.len(),
            entries,
        }
    }

    /// Resolve every rate-law operand against the model state or the particle map.
    ///
    /// Metabolites become ODE state variables. Any other species (enzymes,
    /// cofactors owned by the stochastic side) is frozen at its current
    /// concentration in `volume` for the duration of the solve.
    pub fn bind(&self, pmap: &ParticleMap, volume: Volume) -> Result<BoundModel, CellError> {
        let resolve = |species: &str| -> Result<Term, CellError> {
            if let Some(idx) = self.metabolite_index(species) {
                Ok(Term::State(idx))
            } else {
                pmap.get(species)
                    .map(|count| Term::Fixed(volume.to_mm(count)))
                    .ok_or_else(|| CellError::UnknownSpecies(species.to_string()))
            }
        };
        let bind_side = |participants: &[Participant]| -> Result<Vec<BoundParticipant>, CellError> {
            participants
                .iter()
                .map(|p| -> Result<BoundParticipant, CellError> {
                    Ok(BoundParticipant {
                        term: resolve(&p.species)?,
                        km: p.km,
                        stoich: p.stoich,
                    })
                })
                .collect()
        };

        let reactions = self
            .reactions
            .iter()
            .map(|rxn| -> Result<BoundReaction, CellError> {
                let enzyme = match &rxn.enzyme {
                    Operand::Value(v) => Term::Fixed(*v),
                    Operand::Species(s) => resolve(s)?,
                };
                let result = match rxn.result_id() {
                    Some(id) => Some(
                        self.metabolite_index(id)
                            .ok_or_else(|| CellError::UnknownMetabolite(id.to_string()))?,
                    ),
                    None => None,
                };
                Ok(BoundReaction {
                    onoff: rxn.onoff,
                    enzyme,
                    kcat_f: rxn.kcat_f,
                    kcat_r: rxn.kcat_r,
                    substrates: bind_side(&rxn.substrates)?,
                    products: bind_side(&rxn.products)?,
                    result,
                })
            })
            .collect::<Result<Vec<_>, CellError>>()?;

        Ok(BoundModel {
            nstates: self.nstates(),
            reactions,
        })
    }
}

/// Reaction counts per kind, largest first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelReport {
    pub total: usize,
    pub entries: Vec<(String, usize)>,
}

impl ModelReport {
    pub fn get(&self, kind: &str) -> usize {
        self.entries
            .iter()
            .find(|(k, _)| k == kind)
            .map_or(0, |(_, v)| *v)
    }
}

impl fmt::Display for ModelReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "There are {} reactions in the model:", self.total)?;
        for (kind, count) in &self.entries {
            writeln!(f, "{:>20} :   {}", kind, count)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Term {
    State(usize),
    Fixed(f64),
}

impl Term {
    #[inline(always)]
    fn value(&self, y: &[f64]) -> f64 {
        match self {
            Term::State(idx) => y[*idx],
            Term::Fixed(v) => *v,
        }
    }
}

#[derive(Debug, Clone)]
struct BoundParticipant {
    term: Term,
    km: f64,
    stoich: f64,
}

#[derive(Debug, Clone)]
struct BoundReaction {
    onoff: f64,
    enzyme: Term,
    kcat_f: f64,
    kcat_r: f64,
    substrates: Vec<BoundParticipant>,
    products: Vec<BoundParticipant>,
    result: Option<usize>,
}

impl BoundReaction {
    #[inline]
    fn rate(&self, y: &[f64]) -> f64 {
        enzymatic_rate(
            self.onoff,
            self.enzyme.value(y),
            self.kcat_f,
            self.kcat_r,
            self.substrates.iter().map(|p| (p.term.value(y), p.km)),
            self.products.iter().map(|p| (p.term.value(y), p.km)),
        )
    }
}

/// A [KineticModel] with every operand resolved, ready to be integrated
#[derive(Debug, Clone)]
pub struct BoundModel {
    nstates: usize,
    reactions: Vec<BoundReaction>,
}

impl BoundModel {
    pub fn nstates(&self) -> usize {
        self.nstates
    }

    /// Reaction rates in mM per second, in reaction order
    pub fn rates(&self, y: &[f64]) -> Vec<f64> {
        self.reactions.iter().map(|r| r.rate(y)).collect()
    }

    /// Time derivative of the metabolite concentrations
    pub fn rhs(&self, y: &[f64], dy: &mut [f64]) {
        dy.fill(0.0);
        for rxn in &self.reactions {
            let v = rxn.rate(y);
            if let Some(idx) = rxn.result {
                dy[idx] += v;
                continue;
            }
            for p in &rxn.substrates {
                if let Term::State(idx) = p.term {
                    dy[idx] -= p.stoich * v;
                }
            }
            for p in &rxn.products {
                if let Term::State(idx) = p.term {
                    dy[idx] += p.stoich * v;
                }
            }
        }
    }
}
