use t2dsim::prelude::simulator::state::{METFORMIN_FAST, METFORMIN_SLOW};
use t2dsim::prelude::*;

/// Steps the patient and returns the steps at which the fast metformin pool jumped
fn jumps<F>(patient: &mut PatientSimulator, actions: F) -> Vec<usize>
where
    F: Fn(usize) -> (Action, Option<RecommendedAction>),
{
    let mut previous = patient.state()[METFORMIN_FAST];
    let mut jumped = Vec::new();
    for step in 0..30 {
        let (action, recommendation) = actions(step);
        patient.step(action, recommendation).expect("step");
        let fast = patient.state()[METFORMIN_FAST];
        if fast > previous {
            jumped.push(step);
        }
        previous = fast;
    }
    jumped
}

#[test]
fn scheduled_metformin_is_a_single_pulse() {
    let mut patient = PatientBuilder::new()
        .seed(8)
        .scheduler(SchedulerConfig::punctual())
        .build()
        .expect("patient");

    // queued after the first tick, so delay 10 is due at step 2
    let jumped = jumps(&mut patient, |step| {
        let recommendation = (step == 0).then(|| RecommendedAction::metformin(500.0, 10));
        (Action::new(), recommendation)
    });
    assert_eq!(jumped, vec![2]);
    assert_eq!(patient.last_action().metformin, 0.0);
    assert!(patient.state()[METFORMIN_SLOW] > 0.0);
}

#[test]
fn exogenous_metformin_perturbs_the_state_once() {
    let mut patient = PatientBuilder::new().seed(8).build().expect("patient");
    let jumped = jumps(&mut patient, |step| {
        let metformin = if step == 10 { 500.0 } else { 0.0 };
        (Action::new().with_metformin(metformin), None)
    });
    assert_eq!(jumped, vec![10]);
}

#[test]
fn dose_right_after_a_dose_is_dropped() {
    let mut patient = PatientBuilder::new().seed(8).build().expect("patient");
    let first = patient
        .step(Action::new().with_metformin(500.0), None)
        .expect("step");
    let second = patient
        .step(Action::new().with_metformin(500.0), None)
        .expect("step");
    assert_eq!(first.taken.metformin, 500.0);
    assert_eq!(second.taken.metformin, 0.0);
}
