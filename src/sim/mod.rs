pub mod driver;
pub mod job;
pub mod result;

pub use driver::{Sim, run_simulation};
pub use job::{ProcessSpec, ResourceSpec};
pub use result::SimulationResult;
