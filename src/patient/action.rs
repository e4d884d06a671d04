use serde::{Deserialize, Serialize};

use super::exertion::ActivityProfile;
use crate::simulator::state::*;
use crate::simulator::{State, V};
use crate::SimulatorError;

/// Milligrams per gram
const MG_PER_G: f64 = 1e3;
/// Molar mass of vildagliptin (g/mol)
const VILDAGLIPTIN_MOLAR_MASS: f64 = 303.406;
/// Insulin units to subcutaneous depot amount
const INSULIN_DEPOT_PER_UNIT: f64 = 100.0 / 6.76;

/// Inputs applied to the patient during one step
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Action {
    /// Carbohydrate (g)
    pub cho: f64,
    /// Fast-acting insulin (U)
    pub insulin_fast: f64,
    /// Long-acting insulin (U)
    pub insulin_long: f64,
    /// Metformin (mg)
    pub metformin: f64,
    /// Vildagliptin (mg)
    pub vildagliptin: f64,
    /// Fraction of pancreatic secretion suppressed, in [0, 1]
    pub stress: f64,
    /// Heart-rate signal (bpm)
    pub exertion: f64,
}

impl Action {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cho(mut self, grams: f64) -> Self {
        self.cho = grams;
        self
    }

    pub fn with_insulin_fast(mut self, units: f64) -> Self {
        self.insulin_fast = units;
        self
    }

    pub fn with_insulin_long(mut self, units: f64) -> Self {
        self.insulin_long = units;
        self
    }

    pub fn with_metformin(mut self, mg: f64) -> Self {
        self.metformin = mg;
        self
    }

    pub fn with_vildagliptin(mut self, mg: f64) -> Self {
        self.vildagliptin = mg;
        self
    }

    pub fn with_stress(mut self, stress: f64) -> Self {
        self.stress = stress;
        self
    }

    /// Every amount must be finite and non-negative, and stress at most 1
    pub fn validate(&self) -> Result<(), SimulatorError> {
        for (field, value) in [
            ("cho", self.cho),
            ("insulin_fast", self.insulin_fast),
            ("insulin_long", self.insulin_long),
            ("metformin", self.metformin),
            ("vildagliptin", self.vildagliptin),
            ("stress", self.stress),
            ("exertion", self.exertion),
        ] {
            check_amount(field, value)?;
        }
        if self.stress > 1.0 {
            return Err(SimulatorError::InvalidDose {
                field: "stress",
                value: self.stress,
            });
        }
        Ok(())
    }

    /// Perturbs the dose compartments of `x` by the amounts of this action
    pub(crate) fn inject(&self, x: &mut V) {
        if self.cho > 0.0 {
            let dg = self.cho * MG_PER_G;
            x.add_bolus(Q_STO_SOLID, dg);
            x.add_bolus(MEAL_DOSE, dg);
            x[MEAL_MEMORY] = x[MEAL_DOSE];
        }
        if self.metformin > 0.0 {
            // mg to µg, split between the fast and slow dissolving pools
            let dose = self.metformin * 1e3;
            x.add_bolus(METFORMIN_FAST, dose);
            x.add_bolus(METFORMIN_SLOW, dose);
        }
        if self.vildagliptin > 0.0 {
            x.add_bolus(
                VILDAGLIPTIN_DEPOT,
                self.vildagliptin * 1e6 / VILDAGLIPTIN_MOLAR_MASS,
            );
        }
        if self.insulin_fast > 0.0 {
            x.add_bolus(FAST_HEXAMER, self.insulin_fast * INSULIN_DEPOT_PER_UNIT);
        }
        if self.insulin_long > 0.0 {
            x.add_bolus(LONG_BOUND, self.insulin_long * INSULIN_DEPOT_PER_UNIT);
        }
    }

    /// Carbohydrate of this action in mg
    pub(crate) fn meal_mg(&self) -> f64 {
        self.cho * MG_PER_G
    }
}

/// A behavioural recommendation issued by a controller
///
/// `delay` is the nominal number of scheduler ticks before it should be
/// carried out. An activity recommendation needs a [ActivityProfile].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommendedAction {
    /// Meal (g)
    pub meal: f64,
    /// Metformin (mg)
    pub metformin: f64,
    /// Peak heart-rate increase (bpm)
    pub activity: f64,
    pub delay: i64,
    pub profile: Option<ActivityProfile>,
}

impl RecommendedAction {
    pub fn meal(grams: f64, delay: i64) -> Self {
        Self {
            meal: grams,
            delay,
            ..Default::default()
        }
    }

    pub fn metformin(mg: f64, delay: i64) -> Self {
        Self {
            metformin: mg,
            delay,
            ..Default::default()
        }
    }

    pub fn activity(peak: f64, profile: ActivityProfile, delay: i64) -> Self {
        Self {
            activity: peak,
            delay,
            profile: Some(profile),
            ..Default::default()
        }
    }

    /// Nothing to carry out; delay and profile are not looked at
    pub fn is_noop(&self) -> bool {
        self.meal == 0.0 && self.metformin == 0.0 && self.activity == 0.0
    }

    pub fn validate(&self) -> Result<(), SimulatorError> {
        check_amount("meal", self.meal)?;
        check_amount("metformin", self.metformin)?;
        check_amount("activity", self.activity)?;
        match &self.profile {
            Some(profile) => profile.validate(),
            None if self.activity > 0.0 => Err(SimulatorError::InvalidActivityProfile(
                "activity recommended without a profile".to_string(),
            )),
            None => Ok(()),
        }
    }
}

fn check_amount(field: &'static str, value: f64) -> Result<(), SimulatorError> {
    if value < 0.0 || !value.is_finite() {
        return Err(SimulatorError::InvalidDose { field, value });
    }
    Ok(())
}

/// What the patient exposes to a controller after each step
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Heart (central blood) glucose, mg/dL
    pub glucose: f64,
}

/// Result of one [crate::PatientSimulator::step]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StepOutcome {
    /// The action actually applied; `exertion` holds the heart-rate increase
    /// from scheduled activity
    pub taken: Action,
    /// Simulated heart rate before any activity was added
    pub raw_exertion: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn negative_amounts_are_rejected() {
        let err = Action::new().with_metformin(-1.0).validate().unwrap_err();
        match err {
            SimulatorError::InvalidDose { field, value } => {
                assert_eq!(field, "metformin");
                assert_eq!(value, -1.0);
            }
            other => panic!("expected invalid dose, got {:?}", other),
        }
        assert!(Action::new().with_cho(f64::NAN).validate().is_err());
        assert!(RecommendedAction::meal(-5.0, 0).validate().is_err());
    }

    #[test]
    fn stress_is_a_fraction() {
        assert!(Action::new().with_stress(1.0).validate().is_ok());
        match Action::new().with_stress(3.0).validate() {
            Err(SimulatorError::InvalidDose { field, value }) => {
                assert_eq!(field, "stress");
                assert_eq!(value, 3.0);
            }
            other => panic!("stress above one accepted: {:?}", other),
        }
    }

    #[test]
    fn meal_injection_refreshes_meal_memory() {
        let mut x = V::zeros(NSTATES);
        x[MEAL_DOSE] = 2000.0;
        x[MEAL_MEMORY] = 1500.0;
        Action::new().with_cho(5.0).inject(&mut x);
        assert_eq!(x[Q_STO_SOLID], 5000.0);
        assert_eq!(x[MEAL_DOSE], 7000.0);
        assert_eq!(x[MEAL_MEMORY], 7000.0);
    }

    #[test]
    fn drug_units_are_converted() {
        let mut x = V::zeros(NSTATES);
        Action::new()
            .with_metformin(500.0)
            .with_vildagliptin(50.0)
            .with_insulin_fast(6.76)
            .with_insulin_long(10.0)
            .inject(&mut x);
        assert_eq!(x[METFORMIN_FAST], 500_000.0);
        assert_eq!(x[METFORMIN_SLOW], 500_000.0);
        assert_relative_eq!(x[VILDAGLIPTIN_DEPOT], 50.0e6 / 303.406);
        assert_relative_eq!(x[FAST_HEXAMER], 100.0);
        assert_relative_eq!(x[LONG_BOUND], 1000.0 / 6.76);
        assert_eq!(x[Q_STO_SOLID], 0.0);
    }

    #[test]
    fn only_dose_indices_are_touched() {
        let mut x = V::zeros(NSTATES);
        Action {
            cho: 5.0,
            insulin_fast: 1.0,
            insulin_long: 1.0,
            metformin: 1.0,
            vildagliptin: 1.0,
            stress: 0.3,
            exertion: 20.0,
        }
        .inject(&mut x);
        let dosed = [
            Q_STO_SOLID,
            METFORMIN_FAST,
            METFORMIN_SLOW,
            VILDAGLIPTIN_DEPOT,
            FAST_HEXAMER,
            LONG_BOUND,
            MEAL_DOSE,
            MEAL_MEMORY,
        ];
        for i in 0..NSTATES {
            assert_eq!(x[i] != 0.0, dosed.contains(&i), "index {}", i);
        }
    }

    #[test]
    fn noop_ignores_delay() {
        let r = RecommendedAction {
            delay: 30,
            ..Default::default()
        };
        assert!(r.is_noop());
        assert!(!RecommendedAction::metformin(500.0, 0).is_noop());
    }

    #[test]
    fn activity_needs_a_profile() {
        let r = RecommendedAction {
            activity: 30.0,
            ..Default::default()
        };
        assert!(matches!(
            r.validate(),
            Err(SimulatorError::InvalidActivityProfile(_))
        ));
    }
}
