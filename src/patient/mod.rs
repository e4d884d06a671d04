//! The virtual patient: steady-state initialisation, behaviour and dosing
//! around the physiological model.
//!
//! ```
//! use t2dsim::prelude::*;
//!
//! let mut patient = PatientBuilder::new().seed(7).build().unwrap();
//! let fasting = patient.observation().glucose;
//! patient.step(Action::new().with_cho(45.0), None).unwrap();
//! let mut peak = fasting;
//! for _ in 0..29 {
//!     patient.step(Action::new(), None).unwrap();
//!     peak = peak.max(patient.observation().glucose);
//! }
//! assert!(peak > fasting);
//! ```
pub mod action;
pub mod exertion;
pub mod meal;
pub mod scheduler;

use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;

pub use action::{Action, Observation, RecommendedAction, StepOutcome};
pub use exertion::{ActivityProfile, HeartRateModel, TimeOfDay};
pub use meal::FeedingLimiter;
pub use scheduler::{ActionScheduler, SchedulerConfig};

use crate::parameters::ParameterSet;
use crate::simulator::state::G_HEART;
use crate::simulator::{
    Basal, BasalTargets, DynamicsEngine, DynamicsInputs, IntegratorOptions, OdeIntegrator,
    SteadyState, T, V,
};
use crate::SimulatorError;

/// Length of one step (min)
pub const SAMPLE_TIME: T = 1.0;

/// Builds a [PatientSimulator]
#[derive(Debug, Clone)]
pub struct PatientBuilder {
    params: Option<ParameterSet>,
    variant: Option<String>,
    targets: BasalTargets,
    seed: Option<u64>,
    adherence: f64,
    scheduler: SchedulerConfig,
    integrator: IntegratorOptions,
}

impl Default for PatientBuilder {
    fn default() -> Self {
        Self {
            params: None,
            variant: None,
            targets: BasalTargets::default(),
            seed: None,
            adherence: 1.0,
            scheduler: SchedulerConfig::default(),
            integrator: IntegratorOptions::default(),
        }
    }
}

impl PatientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use these parameters instead of a named variant
    pub fn parameters(mut self, params: ParameterSet) -> Self {
        self.params = Some(params);
        self
    }

    /// Use a named phenotype, see [ParameterSet::variant]
    pub fn variant(mut self, name: impl Into<String>) -> Self {
        self.variant = Some(name.into());
        self
    }

    pub fn basal_targets(mut self, targets: BasalTargets) -> Self {
        self.targets = targets;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Probability that a due recommendation is carried out
    pub fn adherence(mut self, probability: f64) -> Self {
        self.adherence = probability;
        self
    }

    pub fn scheduler(mut self, config: SchedulerConfig) -> Self {
        self.scheduler = config;
        self
    }

    pub fn integrator(mut self, options: IntegratorOptions) -> Self {
        self.integrator = options;
        self
    }

    pub fn build(self) -> Result<PatientSimulator, SimulatorError> {
        if !(0.0..=1.0).contains(&self.adherence) {
            return Err(SimulatorError::InvalidProbability {
                name: "adherence",
                value: self.adherence,
            });
        }
        self.scheduler.validate()?;
        self.integrator.validate()?;

        let params = match (self.params, self.variant) {
            (Some(params), _) => params,
            (None, Some(name)) => ParameterSet::variant(&name)?,
            (None, None) => ParameterSet::default(),
        };
        let steady = SteadyState::compute(&params, &self.targets)?;
        let seed = self.seed.unwrap_or_else(|| rand::rng().random());

        let mut patient = PatientSimulator {
            x: steady.x0.clone(),
            t: 0.0,
            params,
            steady,
            integrator: OdeIntegrator::new(self.integrator),
            last_action: Action::default(),
            feeding: FeedingLimiter::default(),
            heart_rate: HeartRateModel::default(),
            activity: VecDeque::new(),
            scheduler: ActionScheduler::new(self.scheduler, seed)?,
            rng: StdRng::seed_from_u64(seed),
            seed,
            adherence: self.adherence,
        };
        patient.reset();
        Ok(patient)
    }
}

/// A virtual type-2 diabetes patient stepped one minute at a time
#[derive(Debug, Clone)]
pub struct PatientSimulator {
    params: ParameterSet,
    steady: SteadyState,
    x: V,
    t: T,
    integrator: OdeIntegrator,
    last_action: Action,
    feeding: FeedingLimiter,
    heart_rate: HeartRateModel,
    /// Heart-rate increases of ongoing activity, one per step
    activity: VecDeque<f64>,
    scheduler: ActionScheduler,
    rng: StdRng,
    seed: u64,
    adherence: f64,
}

impl PatientSimulator {
    /// Advances the patient by [SAMPLE_TIME]
    ///
    /// `exogenous` is applied as given, except that its carbohydrate goes
    /// through the feeding limiter and its exertion is replaced by the
    /// simulated heart rate. `recommended` is queued unless it is a no-op.
    ///
    /// If the integrator fails the state vector and the clock are left
    /// untouched and the error is returned.
    pub fn step(
        &mut self,
        exogenous: Action,
        recommended: Option<RecommendedAction>,
    ) -> Result<StepOutcome, SimulatorError> {
        exogenous.validate()?;
        if let Some(recommended) = &recommended {
            recommended.validate()?;
        }

        let due = self.scheduler.get();
        if let Some(recommended) = recommended {
            if !recommended.is_noop() {
                let delay = recommended.delay;
                self.scheduler.put(recommended, delay);
            }
        }

        let baseline = self.heart_rate.next(&mut self.rng);
        let mut action = exogenous;

        if let Some(due) = due {
            if self.rng.random::<f64>() < self.adherence {
                info!(time = self.t, ?due, "carrying out recommendation");
                if due.meal != 0.0 {
                    self.feeding.announce(due.meal);
                } else if due.activity != 0.0 {
                    if let Some(profile) = &due.profile {
                        self.activity.extend(profile.samples(due.activity));
                    }
                }
                if due.metformin != 0.0 {
                    action.metformin = due.metformin;
                }
            } else {
                info!(time = self.t, ?due, "recommendation skipped");
            }
        }

        self.feeding.announce(exogenous.cho);
        action.cho = self.feeding.release();

        let increment = self.activity.pop_front().unwrap_or(0.0);
        action.exertion = increment;

        self.feeding.track(action.cho, self.last_action.cho, self.t);
        if self.last_action.metformin != 0.0 {
            action.metformin = 0.0;
        }

        let mut x = self.x.clone();
        action.inject(&mut x);

        let inputs = DynamicsInputs {
            meal: action.meal_mg(),
            stress: action.stress,
            heart_rate: baseline + increment,
        };
        let engine = DynamicsEngine::new(&self.params, &self.steady.basal);
        self.integrator.integrate(
            |t, x, dx| engine.derivative(t, x, &inputs, dx),
            self.t,
            self.t + SAMPLE_TIME,
            &mut x,
        )?;

        self.x = x;
        self.t += SAMPLE_TIME;
        self.last_action = action;

        Ok(StepOutcome {
            taken: action,
            raw_exertion: baseline,
        })
    }

    pub fn observation(&self) -> Observation {
        Observation {
            glucose: self.x[G_HEART],
        }
    }

    /// Returns to the steady state and replays the random streams from the seed
    pub fn reset(&mut self) {
        self.x = self.steady.x0.clone();
        self.t = 0.0;
        self.last_action = Action::default();
        self.feeding.reset();
        self.heart_rate.reset();
        self.activity.clear();
        self.rng = StdRng::seed_from_u64(self.seed);
        self.scheduler.clear();
        self.scheduler.reseed(self.rng.random());
    }

    /// Replaces the seed and resets the patient
    pub fn set_seed(&mut self, seed: u64) {
        self.seed = seed;
        self.reset();
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn state(&self) -> &V {
        &self.x
    }

    /// Minutes since the last reset
    pub fn time(&self) -> T {
        self.t
    }

    pub fn basal(&self) -> &Basal {
        &self.steady.basal
    }

    pub fn steady_state(&self) -> &SteadyState {
        &self.steady
    }

    pub fn parameters(&self) -> &ParameterSet {
        &self.params
    }

    pub fn is_eating(&self) -> bool {
        self.feeding.is_eating()
    }

    pub fn food_taken(&self) -> f64 {
        self.feeding.food_taken()
    }

    /// Grams announced but not yet eaten
    pub fn planned_meal(&self) -> f64 {
        self.feeding.planned()
    }

    /// Latest simulated background heart rate
    pub fn heart_rate(&self) -> f64 {
        self.heart_rate.current()
    }

    pub fn last_action(&self) -> &Action {
        &self.last_action
    }

    pub fn scheduler(&self) -> &ActionScheduler {
        &self.scheduler
    }

    pub fn adherence(&self) -> f64 {
        self.adherence
    }
}
