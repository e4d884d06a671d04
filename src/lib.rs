pub mod error;
pub mod parameters;
pub mod patient;
pub mod simulator;

pub use crate::parameters::ParameterSet;
pub use crate::patient::{
    Action, ActivityProfile, Observation, PatientBuilder, PatientSimulator, RecommendedAction,
    SchedulerConfig, StepOutcome,
};
pub use crate::simulator::{
    simulate_population, BasalTargets, DailySchedule, IntegratorOptions, SteadyState,
};
pub use error::SimulatorError;

pub mod prelude {
    pub mod simulator {
        pub use crate::simulator::{
            state, Basal, BasalRates, DynamicsEngine, DynamicsInputs, OdeIntegrator, State,
            NSTATES,
        };
    }

    pub use crate::parameters::{ParameterSet, VARIANTS};
    pub use crate::patient::{
        Action, ActivityProfile, Observation, PatientBuilder, PatientSimulator, RecommendedAction,
        SchedulerConfig, StepOutcome, TimeOfDay,
    };
    pub use crate::simulator::{
        simulate_population, BasalTargets, DailySchedule, IntegratorOptions, SteadyState,
    };
    pub use crate::SimulatorError;
}
