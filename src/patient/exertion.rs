use rand::Rng;
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};

use crate::SimulatorError;

/// Resting heart rate of a freshly reset patient, oldest first
const INITIAL_HISTORY: [f64; 3] = [55.0, 56.0, 55.0];

/// Background heart rate: an AR(3) process with Gaussian innovations,
/// clamped to a physiological band
#[derive(Debug, Clone, PartialEq)]
pub struct HeartRateModel {
    /// Weights of the last, second-to-last and third-to-last values
    weights: [f64; 3],
    sigma: f64,
    lower: f64,
    upper: f64,
    /// Oldest first
    history: [f64; 3],
}

impl Default for HeartRateModel {
    fn default() -> Self {
        Self {
            weights: [0.5, 0.3, 0.2],
            sigma: 5.0,
            lower: 50.0,
            upper: 85.0,
            history: INITIAL_HISTORY,
        }
    }
}

impl HeartRateModel {
    /// Draws the next heart rate and rolls it into the history
    pub fn next<R: Rng>(&mut self, rng: &mut R) -> f64 {
        let [oldest, middle, newest] = self.history;
        let noise: f64 = rng.sample(StandardNormal);
        let value = (self.weights[0] * newest
            + self.weights[1] * middle
            + self.weights[2] * oldest
            + self.sigma * noise)
            .clamp(self.lower, self.upper);
        self.history = [middle, newest, value];
        value
    }

    /// Most recent value
    pub fn current(&self) -> f64 {
        self.history[2]
    }

    pub fn history(&self) -> &[f64; 3] {
        &self.history
    }

    pub fn reset(&mut self) {
        self.history = INITIAL_HISTORY;
    }
}

/// Wall-clock breakpoint of an activity profile
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimeOfDay {
    pub hour: u32,
    pub minute: u32,
}

impl TimeOfDay {
    pub fn new(hour: u32, minute: u32) -> Self {
        Self { hour, minute }
    }

    pub fn minutes(&self) -> f64 {
        self.hour as f64 * 60.0 + self.minute as f64
    }

    /// A time on a 24-hour clock
    pub fn validate(&self) -> Result<(), SimulatorError> {
        if self.hour >= 24 || self.minute >= 60 {
            return Err(SimulatorError::InvalidActivityProfile(format!(
                "{}:{:02} is not a time of day",
                self.hour, self.minute
            )));
        }
        Ok(())
    }
}

impl From<(u32, u32)> for TimeOfDay {
    fn from((hour, minute): (u32, u32)) -> Self {
        Self { hour, minute }
    }
}

/// Trapezoidal heart-rate increase: ramp up from `start` to `plateau`, hold
/// until `plateau_end`, ramp down to zero at `end`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActivityProfile {
    pub start: TimeOfDay,
    pub plateau: TimeOfDay,
    pub plateau_end: TimeOfDay,
    pub end: TimeOfDay,
}

impl ActivityProfile {
    /// Sampling interval of the profile (min)
    pub const SAMPLE_INTERVAL: f64 = 5.0;

    pub fn new(
        start: impl Into<TimeOfDay>,
        plateau: impl Into<TimeOfDay>,
        plateau_end: impl Into<TimeOfDay>,
        end: impl Into<TimeOfDay>,
    ) -> Self {
        Self {
            start: start.into(),
            plateau: plateau.into(),
            plateau_end: plateau_end.into(),
            end: end.into(),
        }
    }

    /// Breakpoints must be times of day and must not go backwards in time
    pub fn validate(&self) -> Result<(), SimulatorError> {
        let points = [self.start, self.plateau, self.plateau_end, self.end];
        for point in &points {
            point.validate()?;
        }
        if points.windows(2).any(|w| w[0].minutes() > w[1].minutes()) {
            return Err(SimulatorError::InvalidActivityProfile(format!(
                "breakpoints {:?} are not in order",
                points.map(|p| (p.hour, p.minute))
            )));
        }
        Ok(())
    }

    /// Heart-rate increase every [Self::SAMPLE_INTERVAL] minutes from `start`
    /// up to and including `end`, for a plateau of `peak` bpm
    pub fn samples(&self, peak: f64) -> Vec<f64> {
        let t1 = self.start.minutes();
        let t2 = self.plateau.minutes();
        let t3 = self.plateau_end.minutes();
        let t4 = self.end.minutes();

        let count = ((t4 - t1) / Self::SAMPLE_INTERVAL).floor() as usize + 1;
        (0..count)
            .map(|i| t1 + i as f64 * Self::SAMPLE_INTERVAL)
            .map(|t| {
                if t < t2 {
                    peak / (t2 - t1) * (t - t1)
                } else if t <= t3 {
                    peak
                } else {
                    peak - peak / (t4 - t3) * (t - t3)
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn heart_rate_stays_in_band() {
        let mut model = HeartRateModel::default();
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..10_000 {
            let hr = model.next(&mut rng);
            assert!((50.0..=85.0).contains(&hr), "heart rate {} out of band", hr);
        }
    }

    #[test]
    fn history_rolls() {
        let mut model = HeartRateModel::default();
        let mut rng = StdRng::seed_from_u64(3);
        let first = model.next(&mut rng);
        let second = model.next(&mut rng);
        assert_eq!(model.history(), &[55.0, first, second]);
        assert_eq!(model.current(), second);
        model.reset();
        assert_eq!(model.history(), &INITIAL_HISTORY);
    }

    #[test]
    fn same_seed_same_heart_rates() {
        let draw = |seed| {
            let mut model = HeartRateModel::default();
            let mut rng = StdRng::seed_from_u64(seed);
            (0..50).map(|_| model.next(&mut rng)).collect::<Vec<_>>()
        };
        assert_eq!(draw(42), draw(42));
        assert_ne!(draw(42), draw(43));
    }

    #[test]
    fn trapezoid_samples() {
        let profile = ActivityProfile::new((10, 0), (10, 10), (10, 20), (10, 30));
        let samples = profile.samples(30.0);
        let expected = [0.0, 15.0, 30.0, 30.0, 30.0, 15.0, 0.0];
        assert_eq!(samples.len(), expected.len());
        for (got, want) in samples.iter().zip(expected) {
            assert_relative_eq!(*got, want, epsilon = 1e-12);
        }
    }

    #[test]
    fn samples_never_pass_the_end() {
        let profile = ActivityProfile::new((8, 0), (8, 3), (8, 10), (8, 12));
        let samples = profile.samples(20.0);
        assert_eq!(samples.len(), 3);
        assert!(samples.iter().all(|s| *s >= 0.0));
    }

    #[test]
    fn instant_ramps_are_allowed() {
        let profile = ActivityProfile::new((9, 0), (9, 0), (9, 10), (9, 10));
        assert!(profile.validate().is_ok());
        assert_eq!(profile.samples(25.0), vec![25.0, 25.0, 25.0]);
    }

    #[test]
    fn unordered_breakpoints_are_rejected() {
        let profile = ActivityProfile::new((9, 0), (8, 0), (9, 10), (9, 20));
        assert!(matches!(
            profile.validate(),
            Err(SimulatorError::InvalidActivityProfile(_))
        ));
    }

    #[test]
    fn out_of_range_times_are_rejected() {
        assert!(TimeOfDay::new(23, 59).validate().is_ok());
        assert!(TimeOfDay::new(24, 0).validate().is_err());
        assert!(TimeOfDay::new(7, 60).validate().is_err());

        let huge = ActivityProfile::new((9, 0), (9, 5), (9, 10), (u32::MAX, u32::MAX));
        assert!(matches!(
            huge.validate(),
            Err(SimulatorError::InvalidActivityProfile(_))
        ));
        assert!(TimeOfDay::new(u32::MAX, u32::MAX).minutes().is_finite());
    }
}
