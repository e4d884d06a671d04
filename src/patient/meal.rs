use tracing::info;

/// Carbohydrate the patient can eat per step (g/min)
pub const EAT_RATE: f64 = 5.0;

/// Turns announced meals into a bounded eating rate and tracks eating episodes
#[derive(Debug, Clone, PartialEq)]
pub struct FeedingLimiter {
    rate: f64,
    planned: f64,
    eating: bool,
    food_taken: f64,
}

impl Default for FeedingLimiter {
    fn default() -> Self {
        Self::new(EAT_RATE)
    }
}

impl FeedingLimiter {
    pub fn new(rate: f64) -> Self {
        Self {
            rate,
            planned: 0.0,
            eating: false,
            food_taken: 0.0,
        }
    }

    /// Adds a meal (g) to the planned pool
    pub fn announce(&mut self, grams: f64) {
        self.planned += grams;
    }

    /// Takes this step's bite out of the pool
    pub fn release(&mut self) -> f64 {
        if self.planned <= 0.0 {
            return 0.0;
        }
        let bite = self.rate.min(self.planned);
        self.planned = (self.planned - bite).max(0.0);
        bite
    }

    /// Detects the start and the end of an eating episode from the
    /// carbohydrate of this step and of the previous one
    pub fn track(&mut self, cho: f64, previous: f64, time: f64) {
        if cho > 0.0 && previous <= 0.0 {
            info!(time, "patient starts eating");
            self.food_taken = 0.0;
            self.eating = true;
        }
        if self.eating {
            self.food_taken += cho;
        }
        if cho <= 0.0 && previous > 0.0 {
            info!(time, food_taken = self.food_taken, "patient finishes eating");
            self.eating = false;
        }
    }

    /// Grams still waiting to be eaten
    pub fn planned(&self) -> f64 {
        self.planned
    }

    pub fn is_eating(&self) -> bool {
        self.eating
    }

    /// Grams eaten in the current (or last) eating episode
    pub fn food_taken(&self) -> f64 {
        self.food_taken
    }

    pub fn reset(&mut self) {
        *self = Self::new(self.rate);
    }
}
