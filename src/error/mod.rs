use thiserror::Error;

#[derive(Error, Debug)]
pub enum CellError {
    #[error("Species {0} is not present in the particle map")]
    UnknownSpecies(String),
    #[error("Metabolite {0} is not part of the kinetic model")]
    UnknownMetabolite(String),
    #[error("Rate form {0} has not been registered")]
    UnknownRateForm(String),
    #[error("Reaction {0} is already defined")]
    DuplicateReaction(String),
    #[error("Metabolite {0} is already defined")]
    DuplicateMetabolite(String),
    #[error("Invalid rate form: {0}")]
    InvalidRateForm(String),
    #[error(
        "Reaction {reaction} has {subs} substrates and {prods} products, but rate form {form} expects {expected_subs} and {expected_prods}"
    )]
    RateFormMismatch {
        reaction: String,
        form: String,
        subs: usize,
        prods: usize,
        expected_subs: usize,
        expected_prods: usize,
    },
    #[error("ODE result has {got} values but the model has {expected} metabolites")]
    ResultLength { expected: usize, got: usize },
    #[error("Cell volume is zero (surface area {surface_area} nm^2), concentrations are undefined")]
    DegenerateVolume { surface_area: u64 },
    #[error("The step size of the ODE solver went to zero at t = {time}; check the kinetic constants")]
    StepSizeTooSmall { time: f64 },
    #[error("ODE solver error: {0}")]
    Solver(#[from] diffsol::error::DiffsolError),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
