pub mod dynamics;
pub mod integrator;
pub mod population;
pub mod state;
pub mod steady_state;

pub use dynamics::{DynamicsEngine, DynamicsInputs};
pub use integrator::{IntegratorOptions, OdeIntegrator};
pub use population::{simulate_population, DailySchedule};
pub use state::{State, NSTATES};
pub use steady_state::{Basal, BasalRates, BasalTargets, SteadyState};

/// Simulation time, in minutes
pub type T = f64;
/// State vector of the patient model
pub type V = nalgebra::DVector<T>;
