pub mod config;
pub mod core;
pub mod error;
pub mod input;
pub mod metrics;
pub mod output;
pub mod scheduler;
pub mod sim;
pub mod validate;

pub use error::{Error, Result};
pub use scheduler::Policy;
pub use sim::{ProcessSpec, ResourceSpec, Sim, SimulationResult, run_simulation};
