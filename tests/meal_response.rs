use t2dsim::prelude::simulator::state::Q_GUT;
use t2dsim::prelude::*;

const MEAL_GRAMS: f64 = 45.0;

#[test]
fn meal_raises_glucose_and_is_absorbed() {
    let mut patient = PatientBuilder::new()
        .seed(42)
        .scheduler(SchedulerConfig::punctual())
        .build()
        .expect("patient");
    let basal = patient.basal().glucose_heart;

    let mut peak = f64::MIN;
    let mut rose_at = None;
    for step in 0..360 {
        let cho = if step == 0 { MEAL_GRAMS } else { 0.0 };
        patient
            .step(Action::new().with_cho(cho), None)
            .expect("step");
        let glucose = patient.observation().glucose;
        peak = peak.max(glucose);
        if rose_at.is_none() && glucose > basal {
            rose_at = Some(step);
        }
    }

    let rose_at = rose_at.expect("glucose never rose above basal");
    assert!(rose_at < 60, "glucose rose only at step {}", rose_at);
    assert!(peak > basal);

    let ingested = MEAL_GRAMS * 1e3;
    let remaining = patient.state()[Q_GUT];
    assert!(
        remaining < 0.01 * ingested,
        "{} mg still in the gut after 360 min",
        remaining
    );
}
