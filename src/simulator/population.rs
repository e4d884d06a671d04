use std::collections::BTreeMap;

use ndarray::{Array2, Axis};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::patient::{Action, PatientSimulator, RecommendedAction};
use crate::SimulatorError;

const MINUTES_PER_DAY: usize = 1440;

/// Actions and recommendations by minute of the day, repeated every day
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DailySchedule {
    actions: BTreeMap<usize, Action>,
    recommendations: BTreeMap<usize, RecommendedAction>,
}

impl DailySchedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies `action` at `minute` of every day
    pub fn action(mut self, minute: usize, action: Action) -> Self {
        self.actions.insert(minute % MINUTES_PER_DAY, action);
        self
    }

    /// Issues `recommendation` at `minute` of every day
    pub fn recommend(mut self, minute: usize, recommendation: RecommendedAction) -> Self {
        self.recommendations
            .insert(minute % MINUTES_PER_DAY, recommendation);
        self
    }

    /// Inputs for simulation step `step`
    pub fn at(&self, step: usize) -> (Action, Option<RecommendedAction>) {
        let minute = step % MINUTES_PER_DAY;
        (
            self.actions.get(&minute).copied().unwrap_or_default(),
            self.recommendations.get(&minute).cloned(),
        )
    }
}

/// Steps every patient `steps` times in parallel and collects the observed
/// glucose after each step, one row per patient
///
/// Patients own their random streams, so the result does not depend on how
/// the work is split across threads. The first failing patient aborts the run.
pub fn simulate_population(
    patients: &mut [PatientSimulator],
    steps: usize,
    schedule: &DailySchedule,
) -> Result<Array2<f64>, SimulatorError> {
    let mut glucose = Array2::zeros((patients.len(), steps));

    glucose
        .axis_iter_mut(Axis(0))
        .into_par_iter()
        .zip(patients.par_iter_mut())
        .try_for_each(|(mut row, patient)| {
            for (step, cell) in row.iter_mut().enumerate() {
                let (action, recommendation) = schedule.at(step);
                patient.step(action, recommendation)?;
                *cell = patient.observation().glucose;
            }
            Ok::<(), SimulatorError>(())
        })?;

    Ok(glucose)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schedule_repeats_daily() {
        let schedule = DailySchedule::new()
            .action(420, Action::new().with_cho(45.0))
            .recommend(840, RecommendedAction::metformin(500.0, 0));
        assert_eq!(schedule.at(420).0.cho, 45.0);
        assert_eq!(schedule.at(420 + 1440).0.cho, 45.0);
        assert_eq!(schedule.at(421).0, Action::default());
        assert!(schedule.at(840).1.is_some());
        assert!(schedule.at(841).1.is_none());
    }
}
