//! Right-hand side of the patient model.
//!
//! Each submodule writes the derivatives of the indices it owns (see
//! [crate::simulator::state]) and returns the quantities other submodels read,
//! such as the gastric emptying rate or the metformin effects.
mod absorption;
mod dpp4;
mod exercise;
mod glucose;
mod hormones;
mod insulin;
mod metformin;
mod pancreas;

use crate::parameters::ParameterSet;
use crate::simulator::steady_state::Basal;
use crate::simulator::{T, V};

/// Exogenous inputs held constant over one integration interval
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DynamicsInputs {
    /// Carbohydrate ingested during the current step (mg)
    pub meal: f64,
    /// Dimensionless stress level
    pub stress: f64,
    /// Heart rate (bpm)
    pub heart_rate: f64,
}

impl DynamicsInputs {
    /// No meal, no stress, heart rate at rest
    pub fn resting(params: &ParameterSet) -> Self {
        Self {
            meal: 0.0,
            stress: 0.0,
            heart_rate: params.physical_activity.hr_basal,
        }
    }
}

/// The derivative function of the 57-state model
///
/// The engine only borrows the parameters and basal values; it holds no
/// state of its own, so evaluating it never has side effects.
#[derive(Debug, Clone, Copy)]
pub struct DynamicsEngine<'a> {
    params: &'a ParameterSet,
    basal: &'a Basal,
}

impl<'a> DynamicsEngine<'a> {
    pub fn new(params: &'a ParameterSet, basal: &'a Basal) -> Self {
        Self { params, basal }
    }

    /// Writes `dx/dt` at state `x` into `dx`
    ///
    /// The model is autonomous; `t` is accepted so the engine can be handed
    /// to a time-aware solver as is.
    pub fn derivative(&self, _t: T, x: &V, inputs: &DynamicsInputs, dx: &mut V) {
        let p = self.params;
        let basal = self.basal;

        let gut = absorption::gut(&p.absorption, x, inputs.meal, dx);
        let metformin = metformin::metformin(&p.metformin, x, dx);
        dpp4::vildagliptin(&p.dpp4_inhibitor, x, dx);
        let exercise = exercise::exercise(&p.physical_activity, x, inputs.heart_rate, dx);

        let rates = glucose::metabolic_rates(p, basal, x, &metformin);
        glucose::modulation(basal, x, &rates, dx);
        glucose::mass_balance(
            p,
            basal,
            x,
            &rates,
            gut.appearance,
            inputs.stress,
            &exercise,
            dx,
        );

        hormones::glucagon(&p.glucagon, basal, x, inputs.stress, dx);
        hormones::glp1(&p.glp1, &p.dpp4_inhibitor, x, gut.kempt, dx);

        let secretion = pancreas::pancreas(&p.pancreas, x, dx);
        insulin::mass_balance(p, basal, x, secretion, inputs.stress, dx);
        insulin::long_acting(&p.long_acting_insulin, x, dx);
        insulin::fast_acting(&p.fast_acting_insulin, x, dx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulator::state::*;
    use crate::simulator::steady_state::{BasalTargets, SteadyState};

    fn steady() -> (ParameterSet, SteadyState) {
        let p = ParameterSet::default();
        let ss = SteadyState::compute(&p, &BasalTargets::default()).unwrap();
        (p, ss)
    }

    #[test]
    fn steady_state_is_nearly_stationary() {
        let (p, ss) = steady();
        let engine = DynamicsEngine::new(&p, &ss.basal);
        let mut dx = V::from_element(NSTATES, f64::NAN);
        engine.derivative(0.0, &ss.x0, &DynamicsInputs::resting(&p), &mut dx);

        assert!(dx.iter().all(|d| d.is_finite()), "every index is written");
        for index in (G_BRAIN_CAPILLARY..=G_PERIPHERY_INTERSTITIAL)
            .chain(I_BRAIN..=I_PERIPHERY_INTERSTITIAL)
            .chain([PANCREAS_MASS, PANCREAS_POTENTIATOR, PANCREAS_TRACKING])
        {
            let relative = dx[index].abs() / ss.x0[index].abs();
            assert!(
                relative < 1e-2,
                "index {} drifts at {} per minute",
                index,
                relative
            );
        }
    }

    #[test]
    fn derivative_does_not_depend_on_time() {
        let (p, ss) = steady();
        let engine = DynamicsEngine::new(&p, &ss.basal);
        let inputs = DynamicsInputs {
            meal: 5000.0,
            stress: 0.2,
            heart_rate: 90.0,
        };
        let mut early = V::zeros(NSTATES);
        let mut late = V::zeros(NSTATES);
        engine.derivative(0.0, &ss.x0, &inputs, &mut early);
        engine.derivative(600.0, &ss.x0, &inputs, &mut late);
        assert_eq!(early, late);
    }

    #[test]
    fn nan_state_propagates() {
        let (p, ss) = steady();
        let engine = DynamicsEngine::new(&p, &ss.basal);
        let mut x = ss.x0.clone();
        x[G_HEART] = f64::NAN;
        let mut dx = V::zeros(NSTATES);
        engine.derivative(0.0, &x, &DynamicsInputs::resting(&p), &mut dx);
        assert!(dx[G_HEART].is_nan());
    }
}
