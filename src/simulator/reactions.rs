//! Assembling a [KineticModel] from reaction modules.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::data::ParticleMap;
use crate::error::CellError;
use crate::simulator::model::{KineticModel, Metabolite, ModelReport, Operand, Participant, Reaction};
use crate::simulator::rates::EnzymaticRate;

/// A group of reactions that can be added to a kinetic model.
///
/// The particle map is available so a module can decide on parameters from the
/// current cell state (for example switching off reactions whose enzyme is absent).
pub trait ReactionModule {
    fn name(&self) -> &str;

    fn add_to_model(&self, model: &mut KineticModel, pmap: &ParticleMap) -> Result<(), CellError>;
}

/// Add every module to `model`, then log and return the reaction report.
pub fn define_reactions(
    model: &mut KineticModel,
    pmap: &ParticleMap,
    modules: &[&dyn ReactionModule],
) -> Result<ModelReport, CellError> {
    for module in modules {
        module.add_to_model(model, pmap)?;
        log::debug!("added reaction module {}", module.name());
    }
    log::info!("Reactions defined");

    let report = model.report();
    for line in report.to_string().lines() {
        log::info!("{}", line);
    }
    Ok(report)
}

/// Reactions and metabolites read from a JSON document.
///
/// Reactions without a `rate_form` entry get the enzymatic form matching their
/// number of substrates and products, registered as `enz_<subs>_<prods>`.
///
/// ```json
/// {
///   "name": "lipids",
///   "metabolites": [{ "id": "M_pa_c" }, { "id": "M_cdpdag_c" }],
///   "reactions": [{
///     "id": "R_CDSA",
///     "substrates": [{ "species": "M_pa_c", "km": 0.1 }],
///     "products": [{ "species": "M_cdpdag_c", "km": 0.1 }],
///     "enzyme": "M_PTN_JCVISYN3A_0304_c",
///     "kcat_f": 10.0,
///     "kcat_r": 1.0
///   }]
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReactionTable {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub metabolites: Vec<Metabolite>,
    #[serde(default)]
    pub reactions: Vec<ReactionEntry>,
}

/// A [Reaction] whose rate form name may be left out
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReactionEntry {
    pub id: String,
    #[serde(default)]
    pub rate_form: Option<String>,
    pub substrates: Vec<Participant>,
    pub products: Vec<Participant>,
    pub enzyme: Operand,
    pub kcat_f: f64,
    pub kcat_r: f64,
    #[serde(default = "one")]
    pub onoff: f64,
    #[serde(default)]
    pub result: Option<String>,
}

fn one() -> f64 {
    1.0
}

impl ReactionTable {
    pub fn from_json(json: &str) -> Result<Self, CellError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, CellError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }
}

impl ReactionModule for ReactionTable {
    fn name(&self) -> &str {
        &self.name
    }

    fn add_to_model(&self, model: &mut KineticModel, _pmap: &ParticleMap) -> Result<(), CellError> {
        for met in &self.metabolites {
            // Tables may share metabolites with modules added before them
            if model.metabolite_index(&met.id).is_none() {
                model.add_metabolite(&met.id, met.name.as_deref())?;
            }
        }
        for fields in &self.reactions {
            let rate_form = match &fields.rate_form {
                Some(name) => name.clone(),
                None => {
                    let form = EnzymaticRate::new(fields.substrates.len(), fields.products.len())?;
                    let name = form.name();
                    model.register_rate_form(&name, form)?;
                    name
                }
            };
            model.add_reaction(Reaction {
                id: fields.id.clone(),
                rate_form,
                substrates: fields.substrates.clone(),
                products: fields.products.clone(),
                enzyme: fields.enzyme.clone(),
                kcat_f: fields.kcat_f,
                kcat_r: fields.kcat_r,
                onoff: fields.onoff,
                result: fields.result.clone(),
            })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIPIDS: &str = r#"{
        "name": "lipids",
        "metabolites": [{ "id": "M_pa_c" }, { "id": "M_ctp_c" }, { "id": "M_cdpdag_c" }, { "id": "M_ppi_c" }],
        "reactions": [{
            "id": "R_CDSA",
            "substrates": [{ "species": "M_pa_c", "km": 0.1 }, { "species": "M_ctp_c", "km": 0.2 }],
            "products": [{ "species": "M_cdpdag_c", "km": 0.1 }, { "species": "M_ppi_c", "km": 1.0 }],
            "enzyme": "M_PTN_JCVISYN3A_0304_c",
            "kcat_f": 10.0,
            "kcat_r": 1.0
        }, {
            "id": "R_Transcription_cost",
            "substrates": [{ "species": "M_ctp_c", "km": 0.2 }],
            "products": [{ "species": "M_ppi_c", "km": 1.0 }],
            "enzyme": 0.001,
            "kcat_f": 1.0,
            "kcat_r": 0.0,
            "result": "M_ppi_c"
        }]
    }"#;

    #[test]
    fn table_registers_the_rate_forms_it_needs() {
        let table = ReactionTable::from_json(LIPIDS).unwrap();
        let mut model = KineticModel::new();
        let report = define_reactions(&mut model, &ParticleMap::new(), &[&table]).unwrap();

        assert_eq!(model.metabolites().len(), 4);
        assert_eq!(model.reactions().len(), 2);
        assert_eq!(model.reactions()[0].rate_form, "enz_2_2");
        assert!(model.rate_form("enz_1_1").is_some());
        assert_eq!(model.reactions()[0].onoff, 1.0);
        assert_eq!(report.get("Dependent reactions"), 1);
    }

    #[test]
    fn shared_metabolites_are_added_once() {
        let table = ReactionTable::from_json(LIPIDS).unwrap();
        let mut model = KineticModel::new();
        let pmap = ParticleMap::new();
        table.add_to_model(&mut model, &pmap).unwrap();

        let other = ReactionTable {
            name: "other".to_string(),
            metabolites: table.metabolites.clone(),
            reactions: Vec::new(),
        };
        other.add_to_model(&mut model, &pmap).unwrap();
        assert_eq!(model.metabolites().len(), 4);
    }

    #[test]
    fn unknown_named_rate_form_is_an_error() {
        let json = LIPIDS.replacen(r#""id": "R_CDSA","#, r#""id": "R_CDSA", "rate_form": "mass_action","#, 1);
        let table = ReactionTable::from_json(&json).unwrap();
        let mut model = KineticModel::new();
        assert!(matches!(
            table.add_to_model(&mut model, &ParticleMap::new()),
            Err(CellError::UnknownRateForm(_))
        ));
    }
}
