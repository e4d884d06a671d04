use diffsol::error::DiffsolError;
use diffsol::{
    NalgebraMat, NalgebraVec, OdeBuilder, OdeSolverMethod, OdeSolverStopReason, Vector,
    VectorCommon,
};
use serde::{Deserialize, Serialize};

use super::{T, V};
use crate::SimulatorError;

type M = NalgebraMat<T>;

/// Tolerances and step limits of the [OdeIntegrator]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntegratorOptions {
    pub rtol: f64,
    pub atol: f64,
    /// Smallest step before giving up (min)
    pub h_min: f64,
    /// Rejected attempts of a single step before giving up
    pub max_error_test_failures: usize,
    /// Accepted steps per call before giving up
    pub max_steps: usize,
}

impl Default for IntegratorOptions {
    fn default() -> Self {
        Self {
            rtol: 1e-6,
            atol: 1e-6,
            h_min: 1e-10,
            max_error_test_failures: 40,
            max_steps: 10_000,
        }
    }
}

impl IntegratorOptions {
    /// Tighter tolerances, for reference solutions in tests
    pub fn accurate() -> Self {
        Self {
            rtol: 1e-9,
            atol: 1e-10,
            max_steps: 100_000,
            ..Default::default()
        }
    }

    /// Tolerances and the minimum step must be finite and positive, and both
    /// budgets non-zero
    pub fn validate(&self) -> Result<(), SimulatorError> {
        for (name, value) in [
            ("rtol", self.rtol),
            ("atol", self.atol),
            ("h_min", self.h_min),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(SimulatorError::InvalidSetting { name, value });
            }
        }
        if self.max_error_test_failures == 0 {
            return Err(SimulatorError::InvalidSetting {
                name: "max_error_test_failures",
                value: 0.0,
            });
        }
        if self.max_steps == 0 {
            return Err(SimulatorError::InvalidSetting {
                name: "max_steps",
                value: 0.0,
            });
        }
        Ok(())
    }
}

/// Adaptive explicit Runge-Kutta integrator, Tsitouras 5(4) from diffsol
#[derive(Debug, Clone, PartialEq)]
pub struct OdeIntegrator {
    options: IntegratorOptions,
}

impl OdeIntegrator {
    pub fn new(options: IntegratorOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &IntegratorOptions {
        &self.options
    }

    /// Advances `y` from `t0` to `t1` under `dy/dt = f(t, y)`
    ///
    /// Returns the number of accepted steps. On failure `y` is left exactly
    /// as it was.
    pub fn integrate<F>(&self, f: F, t0: T, t1: T, y: &mut V) -> Result<usize, SimulatorError>
    where
        F: Fn(T, &V, &mut V),
    {
        let start = y.clone();
        let nstates = start.len();

        let problem = OdeBuilder::<M>::new()
            .t0(t0)
            .rtol(self.options.rtol)
            .atol([self.options.atol])
            .rhs(
                |x: &NalgebraVec<T>, _p: &NalgebraVec<T>, t: T, dx: &mut NalgebraVec<T>| {
                    f(t, x.inner(), dx.inner_mut())
                },
            )
            .init(
                |_p: &NalgebraVec<T>, _t: T, x: &mut NalgebraVec<T>| {
                    x.inner_mut().copy_from(&start)
                },
                nstates,
            )
            .build()
            .map_err(|e| failure(t0, 0.0, e))?;

        let mut solver = problem.tsit45().map_err(|e| failure(t0, 0.0, e))?;
        let config = solver.config_mut();
        config.minimum_timestep = self.options.h_min;
        config.maximum_error_test_failures = self.options.max_error_test_failures;

        solver
            .set_stop_time(t1)
            .map_err(|e| failure(t0, solver.state().h, e))?;

        let mut steps = 0usize;
        loop {
            match solver.step() {
                Ok(OdeSolverStopReason::TstopReached) => {
                    steps += 1;
                    break;
                }
                Ok(OdeSolverStopReason::InternalTimestep) => {
                    steps += 1;
                    if steps >= self.options.max_steps {
                        let state = solver.state();
                        return Err(give_up(
                            state.t,
                            state.h,
                            format!("{} steps did not reach t = {}", steps, t1),
                        ));
                    }
                }
                Ok(OdeSolverStopReason::RootFound(t)) => {
                    return Err(give_up(t, solver.state().h, "unexpected root".to_string()));
                }
                Err(e) => {
                    let state = solver.state();
                    return Err(failure(state.t, state.h, e));
                }
            }
        }

        let end = solver.state().y.inner();
        if end.iter().any(|v| !v.is_finite()) {
            let state = solver.state();
            return Err(give_up(state.t, state.h, "non-finite state".to_string()));
        }
        y.copy_from(end);
        Ok(steps)
    }
}

fn failure(time: T, step_size: T, error: DiffsolError) -> SimulatorError {
    give_up(time, step_size, error.to_string())
}

fn give_up(time: T, step_size: T, reason: String) -> SimulatorError {
    tracing::error!(time, step_size, "integration failed: {}", reason);
    SimulatorError::IntegrationFailure {
        time,
        step_size,
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn exponential_decay() {
        let solver = OdeIntegrator::new(IntegratorOptions::default());
        let mut y = V::from_vec(vec![1.0, 2.0]);
        let decay = |_t: T, y: &V, dy: &mut V| {
            dy[0] = -0.1 * y[0];
            dy[1] = -0.5 * y[1];
        };
        for minute in 0..10 {
            solver
                .integrate(decay, minute as f64, minute as f64 + 1.0, &mut y)
                .unwrap();
        }
        assert_relative_eq!(y[0], (-1.0f64).exp(), max_relative = 1e-4);
        assert_relative_eq!(y[1], 2.0 * (-5.0f64).exp(), max_relative = 1e-4);
    }

    #[test]
    fn accurate_preset_tightens_the_result() {
        let solver = OdeIntegrator::new(IntegratorOptions::accurate());
        let mut y = V::from_vec(vec![1.0]);
        solver
            .integrate(|_t, y, dy| dy[0] = -0.5 * y[0], 0.0, 10.0, &mut y)
            .unwrap();
        assert_relative_eq!(y[0], (-5.0f64).exp(), max_relative = 1e-6);
    }

    #[test]
    fn time_dependent_rhs() {
        let solver = OdeIntegrator::new(IntegratorOptions::default());
        let mut y = V::from_vec(vec![0.0]);
        solver
            .integrate(|t, _y, dy| dy[0] = t * t, 0.0, 3.0, &mut y)
            .unwrap();
        assert_relative_eq!(y[0], 9.0, max_relative = 1e-6);
    }

    #[test]
    fn step_budget_is_enforced() {
        let options = IntegratorOptions {
            rtol: 1e-12,
            atol: 1e-12,
            max_steps: 2,
            ..Default::default()
        };
        let mut y = V::from_vec(vec![1.0]);
        let err = OdeIntegrator::new(options)
            .integrate(|_t, y, dy| dy[0] = -3.0 * y[0], 0.0, 1.0, &mut y)
            .unwrap_err();
        match err {
            SimulatorError::IntegrationFailure { reason, .. } => {
                assert!(reason.contains("steps"), "unexpected reason: {}", reason)
            }
            other => panic!("expected integration failure, got {:?}", other),
        }
        assert_eq!(y[0], 1.0);
    }

    #[test]
    fn nan_derivative_fails_without_touching_state() {
        let solver = OdeIntegrator::new(IntegratorOptions::default());
        let mut y = V::from_vec(vec![1.0, 1.0]);
        let before = y.clone();
        let err = solver
            .integrate(
                |_t, _y, dy| {
                    dy[0] = f64::NAN;
                    dy[1] = 0.0;
                },
                0.0,
                1.0,
                &mut y,
            )
            .unwrap_err();
        assert!(matches!(err, SimulatorError::IntegrationFailure { .. }));
        assert_eq!(y, before);
    }

    #[test]
    fn blow_up_fails() {
        let solver = OdeIntegrator::new(IntegratorOptions::default());
        let mut y = V::from_vec(vec![1.0]);
        let err = solver
            .integrate(|_t, y, dy| dy[0] = 1e12 * y[0] * y[0], 0.0, 1.0, &mut y)
            .unwrap_err();
        assert!(matches!(err, SimulatorError::IntegrationFailure { .. }));
        assert_eq!(y[0], 1.0);
    }

    #[test]
    fn invalid_options_are_rejected() {
        let bad = [
            IntegratorOptions {
                rtol: 0.0,
                ..Default::default()
            },
            IntegratorOptions {
                atol: f64::NAN,
                ..Default::default()
            },
            IntegratorOptions {
                h_min: -1.0,
                ..Default::default()
            },
            IntegratorOptions {
                max_steps: 0,
                ..Default::default()
            },
            IntegratorOptions {
                max_error_test_failures: 0,
                ..Default::default()
            },
        ];
        for options in bad {
            assert!(
                matches!(
                    options.validate(),
                    Err(SimulatorError::InvalidSetting { .. })
                ),
                "{:?}",
                options
            );
        }
        assert!(IntegratorOptions::default().validate().is_ok());
        assert!(IntegratorOptions::accurate().validate().is_ok());
    }
}
