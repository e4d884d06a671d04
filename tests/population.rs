use approx::assert_relative_eq;
use t2dsim::prelude::*;

fn cohort(seeds: &[u64]) -> Vec<PatientSimulator> {
    seeds
        .iter()
        .enumerate()
        .map(|(i, &seed)| {
            let variant = VARIANTS[i % VARIANTS.len()];
            PatientBuilder::new()
                .variant(variant)
                .seed(seed)
                .build()
                .expect("patient")
        })
        .collect()
}

fn schedule() -> DailySchedule {
    DailySchedule::new()
        .action(30, Action::new().with_cho(50.0))
        .recommend(60, RecommendedAction::metformin(500.0, 10))
}

#[test]
fn same_seeds_give_the_same_trajectories() -> anyhow::Result<()> {
    let seeds = [1, 2, 3, 4, 5, 6];
    let a = simulate_population(&mut cohort(&seeds), 120, &schedule())?;
    let b = simulate_population(&mut cohort(&seeds), 120, &schedule())?;
    assert_eq!(a.dim(), (seeds.len(), 120));
    assert_eq!(a, b);
    Ok(())
}

#[test]
fn a_failing_patient_aborts_the_run() -> anyhow::Result<()> {
    let strict = IntegratorOptions {
        rtol: 1e-13,
        atol: 1e-13,
        max_steps: 1,
        ..Default::default()
    };
    let mut patients = vec![
        PatientBuilder::new().seed(1).build()?,
        PatientBuilder::new().seed(2).integrator(strict).build()?,
    ];
    let err = simulate_population(&mut patients, 60, &schedule()).unwrap_err();
    assert!(matches!(err, SimulatorError::IntegrationFailure { .. }));
    Ok(())
}

#[test]
fn rows_match_patients_stepped_alone() {
    let seeds = [17, 18];
    let population = simulate_population(&mut cohort(&seeds), 90, &schedule()).expect("run");

    let mut alone = cohort(&seeds[..1]).remove(0);
    let schedule = schedule();
    for step in 0..90 {
        let (action, recommendation) = schedule.at(step);
        alone.step(action, recommendation).expect("step");
        assert_relative_eq!(population[[0, step]], alone.observation().glucose);
    }
}

#[test]
fn empty_population_gives_an_empty_matrix() {
    let result = simulate_population(&mut [], 10, &DailySchedule::new()).expect("run");
    assert_eq!(result.dim(), (0, 10));
}
