pub mod coupling;
pub mod model;
mod ode;
pub mod rates;
pub mod reactions;

pub use coupling::{initial_concentrations, write_results, Coupler, WriteReport};
pub use model::{BoundModel, KineticModel, Metabolite, ModelReport, Operand, Participant, Reaction};
pub use ode::{solve, SolverOptions};
pub use rates::{enzymatic_template, EnzymaticRate};
pub use reactions::{define_reactions, ReactionModule, ReactionTable};
