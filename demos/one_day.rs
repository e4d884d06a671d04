use anyhow::{Context, Result};
use t2dsim::prelude::*;

fn main() -> Result<()> {
    // A patient on the "mard" phenotype who follows 80% of the recommendations
    let mut patient = PatientBuilder::new()
        .variant("mard")
        .seed(2024)
        .adherence(0.8)
        .build()
        .context("building the mard patient")?;

    let walk = ActivityProfile::new((17, 30), (17, 40), (18, 10), (18, 20));
    let schedule = DailySchedule::new()
        .action(0, Action::new().with_insulin_long(18.0))
        .action(450, Action::new().with_cho(50.0))
        .recommend(450, RecommendedAction::metformin(500.0, 0))
        .action(750, Action::new().with_cho(75.0).with_insulin_fast(4.0))
        // the walk is recommended at 17:00, 30 minutes before it starts
        .recommend(1020, RecommendedAction::activity(35.0, walk, 150))
        .recommend(1140, RecommendedAction::meal(60.0, 0));

    println!("fasting glucose: {:.1} mg/dL", patient.observation().glucose);
    for step in 0..1440 {
        let (action, recommendation) = schedule.at(step);
        let outcome = patient
            .step(action, recommendation)
            .with_context(|| format!("simulating minute {}", step))?;
        if step % 60 == 59 {
            println!(
                "{:02}:00  glucose {:6.1} mg/dL  heart rate {:5.1} bpm",
                (step + 1) / 60,
                patient.observation().glucose,
                outcome.raw_exertion + outcome.taken.exertion
            );
        }
    }
    Ok(())
}
