use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::action::RecommendedAction;
use crate::SimulatorError;

/// Delay noise and ageing of the [ActionScheduler]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Chance that a recommendation is carried out early or late
    pub noise_probability: f64,
    /// Smallest shift of a noisy delay
    pub noise_min: i64,
    /// Largest shift of a noisy delay
    pub noise_max: i64,
    /// Delay units removed per tick
    pub decrement: i64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            noise_probability: 0.4,
            noise_min: 10,
            noise_max: 20,
            decrement: 5,
        }
    }
}

impl SchedulerConfig {
    /// Recommendations are carried out exactly on time
    pub fn punctual() -> Self {
        Self {
            noise_probability: 0.0,
            ..Default::default()
        }
    }

    /// The noise range must satisfy `0 <= noise_min <= noise_max` and the
    /// decrement must be positive
    pub fn validate(&self) -> Result<(), SimulatorError> {
        if !(0.0..=1.0).contains(&self.noise_probability) {
            return Err(SimulatorError::InvalidProbability {
                name: "noise_probability",
                value: self.noise_probability,
            });
        }
        if self.noise_min < 0 {
            return Err(SimulatorError::InvalidSetting {
                name: "noise_min",
                value: self.noise_min as f64,
            });
        }
        if self.noise_max < self.noise_min {
            return Err(SimulatorError::InvalidSetting {
                name: "noise_max",
                value: self.noise_max as f64,
            });
        }
        if self.decrement <= 0 {
            return Err(SimulatorError::InvalidSetting {
                name: "decrement",
                value: self.decrement as f64,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
struct Entry {
    deadline: i64,
    seq: u64,
    action: RecommendedAction,
}

impl Entry {
    fn key(&self) -> (i64, u64) {
        (self.deadline, self.seq)
    }
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

/// Delay queue of recommended actions
///
/// Every entry stores the absolute tick at which it becomes due, so ageing
/// the queue is a single clock increment. Entries due at the same tick come
/// out in insertion order.
#[derive(Debug, Clone)]
pub struct ActionScheduler {
    config: SchedulerConfig,
    heap: BinaryHeap<Reverse<Entry>>,
    clock: i64,
    seq: u64,
    last_accepted: Option<RecommendedAction>,
    rng: StdRng,
}

impl ActionScheduler {
    pub fn new(config: SchedulerConfig, seed: u64) -> Result<Self, SimulatorError> {
        config.validate()?;
        Ok(Self {
            config,
            heap: BinaryHeap::new(),
            clock: 0,
            seq: 0,
            last_accepted: None,
            rng: StdRng::seed_from_u64(seed),
        })
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Enqueues `action` to fire after `nominal_delay` delay units
    ///
    /// Returns `false` if the action repeats the last accepted one and was
    /// dropped.
    pub fn put(&mut self, action: RecommendedAction, nominal_delay: i64) -> bool {
        if self.last_accepted.as_ref() == Some(&action) {
            debug!(?action, "dropping repeated recommendation");
            return false;
        }

        let mut delay = nominal_delay;
        if self.rng.random::<f64>() < self.config.noise_probability {
            let shift = self
                .rng
                .random_range(self.config.noise_min..=self.config.noise_max);
            delay = if self.rng.random::<f64>() > 0.5 {
                delay + shift
            } else {
                delay - shift
            };
            debug!(nominal_delay, delay, "recommendation timing perturbed");
        }

        let deadline = delay + self.config.decrement * self.clock;
        debug!(deadline, clock = self.clock, "recommendation queued");
        self.heap.push(Reverse(Entry {
            deadline,
            seq: self.seq,
            action: action.clone(),
        }));
        self.seq += 1;
        self.last_accepted = Some(action);
        true
    }

    /// Ages the queue by one tick and pops the earliest due action, if any
    pub fn get(&mut self) -> Option<RecommendedAction> {
        self.clock += 1;
        let now = self.config.decrement * self.clock;
        let due = self
            .heap
            .peek()
            .is_some_and(|Reverse(entry)| entry.deadline <= now);
        if due {
            self.heap.pop().map(|Reverse(entry)| entry.action)
        } else {
            None
        }
    }

    /// The action that will come out first, without ageing the queue
    pub fn peek(&self) -> Option<&RecommendedAction> {
        self.heap.peek().map(|Reverse(entry)| &entry.action)
    }

    pub fn size(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Drops every entry, forgets the last accepted action and rewinds the clock
    pub fn clear(&mut self) {
        self.heap.clear();
        self.clock = 0;
        self.seq = 0;
        self.last_accepted = None;
    }

    pub fn reseed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn punctual() -> ActionScheduler {
        ActionScheduler::new(SchedulerConfig::punctual(), 0).unwrap()
    }

    #[test]
    fn delay_thirty_is_due_after_six_ticks() {
        let mut scheduler = punctual();
        assert!(scheduler.put(RecommendedAction::meal(45.0, 30), 30));
        for tick in 1..=5 {
            assert!(scheduler.get().is_none(), "fired early at tick {}", tick);
        }
        let due = scheduler.get().expect("due at tick 6");
        assert_eq!(due.meal, 45.0);
        assert!(scheduler.is_empty());
    }

    #[test]
    fn repeated_recommendation_is_queued_once() {
        let mut scheduler = punctual();
        let action = RecommendedAction::metformin(500.0, 10);
        assert!(scheduler.put(action.clone(), 10));
        assert!(!scheduler.put(action.clone(), 10));
        assert_eq!(scheduler.size(), 1);

        // A different action in between re-arms the first one
        assert!(scheduler.put(RecommendedAction::meal(20.0, 10), 10));
        assert!(scheduler.put(action, 10));
        assert_eq!(scheduler.size(), 3);
    }

    #[test]
    fn ties_come_out_in_insertion_order() {
        let mut scheduler = punctual();
        scheduler.put(RecommendedAction::meal(10.0, 0), 0);
        scheduler.put(RecommendedAction::meal(20.0, 0), 0);
        assert_eq!(scheduler.peek().map(|a| a.meal), Some(10.0));
        assert_eq!(scheduler.get().map(|a| a.meal), Some(10.0));
        assert_eq!(scheduler.get().map(|a| a.meal), Some(20.0));
        assert_eq!(scheduler.get(), None);
    }

    #[test]
    fn deadline_counts_from_insertion() {
        let mut scheduler = punctual();
        for _ in 0..10 {
            scheduler.get();
        }
        scheduler.put(RecommendedAction::meal(30.0, 10), 10);
        assert!(scheduler.get().is_none());
        assert!(scheduler.get().is_some());
    }

    #[test]
    fn noisy_delay_stays_within_bounds() {
        let config = SchedulerConfig {
            noise_probability: 1.0,
            ..Default::default()
        };
        for seed in 0..20 {
            let mut scheduler = ActionScheduler::new(config.clone(), seed).unwrap();
            scheduler.put(RecommendedAction::meal(45.0, 100), 100);
            let mut ticks = 0;
            while scheduler.get().is_none() {
                ticks += 1;
                assert!(ticks < 100);
            }
            // due at the first multiple of 5 not below the shifted delay
            let fired = (ticks + 1) * 5;
            let early = (80..=94).contains(&fired);
            let late = (110..=124).contains(&fired);
            assert!(early || late, "seed {} fired at {}", seed, fired);
        }
    }

    #[test]
    fn clear_forgets_everything() {
        let mut scheduler = punctual();
        let action = RecommendedAction::meal(45.0, 30);
        scheduler.put(action.clone(), 30);
        scheduler.get();
        scheduler.clear();
        assert!(scheduler.is_empty());
        assert!(scheduler.put(action, 30));
    }

    #[test]
    fn invalid_noise_probability() {
        let config = SchedulerConfig {
            noise_probability: 1.5,
            ..Default::default()
        };
        assert!(config.validate().is_err());
        assert!(SchedulerConfig::default().validate().is_ok());
    }

    #[test]
    fn invalid_noise_range_and_decrement() {
        let cases = [
            ("noise_max", SchedulerConfig {
                noise_min: 20,
                noise_max: 10,
                ..Default::default()
            }),
            ("noise_min", SchedulerConfig {
                noise_min: -5,
                noise_max: 10,
                ..Default::default()
            }),
            ("decrement", SchedulerConfig {
                decrement: 0,
                ..Default::default()
            }),
            ("decrement", SchedulerConfig {
                decrement: -5,
                ..Default::default()
            }),
        ];
        for (expected, config) in cases.clone() {
            match config.validate() {
                Err(SimulatorError::InvalidSetting { name, .. }) => assert_eq!(name, expected),
                other => panic!("{:?} accepted as {:?}", config, other),
            }
        }
        let fixed = SchedulerConfig {
            noise_min: 15,
            noise_max: 15,
            ..Default::default()
        };
        assert!(fixed.validate().is_ok());
        assert!(ActionScheduler::new(cases[0].1.clone(), 0).is_err());
    }
}
