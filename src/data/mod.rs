pub mod output;
pub mod particles;

pub use output::{write_snapshot, CountsRecorder};
pub use particles::*;
