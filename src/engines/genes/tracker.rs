use serde::{Deserialize, Serialize};

/// Outcome of feeding one mutation result into a tracker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feedback {
    /// Evidence contradicted the current interval, full range restored
    Reset,
    Narrowed,
    /// Interval collapsed to a single value
    Converged,
}

/// Convergence tracker for one bounded integer dimension of a gene
/// (a string's length, one character's code point, an integer value).
///
/// `[prefer_min, prefer_max]` starts as the full legal range and only shrinks
/// under feedback. Once it collapses to a single value the dimension is
/// `reached` and stays so until [`IntervalTracker::reset`].
/// A tracker over a single legal value is reached from the start.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntervalTracker {
    min: i64,
    max: i64,
    pub prefer_min: i64,
    pub prefer_max: i64,
    pub reached: bool,
    /// Mutations attempted since the last reset
    pub counter: u32,
}

impl IntervalTracker {
    pub fn new(min: i64, max: i64) -> Self {
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        Self {
            min,
            max,
            prefer_min: min,
            prefer_max: max,
            reached: min == max,
            counter: 0,
        }
    }

    pub fn legal_min(&self) -> i64 {
        self.min
    }

    pub fn legal_max(&self) -> i64 {
        self.max
    }

    pub fn contains(&self, value: i64) -> bool {
        (self.prefer_min..=self.prefer_max).contains(&value)
    }

    pub fn reset(&mut self) {
        self.prefer_min = self.min;
        self.prefer_max = self.max;
        self.reached = self.min == self.max;
        self.counter = 0;
    }

    /// Move the preferred interval towards the side of `previous` where the
    /// better of the two values lies.
    ///
    /// Improvements keep the half closer to `current`, regressions the half
    /// closer to `previous`. Bounds never cross and never widen.
    pub fn update_boundary(&mut self, previous: i64, current: i64, does_current_better: bool) {
        if self.reached || previous == current {
            return;
        }

        let upwards = (current > previous) == does_current_better;
        if upwards {
            let mid = (previous + current + 1).div_euclid(2);
            self.prefer_min = mid.clamp(self.prefer_min, self.prefer_max);
        } else {
            let mid = (previous + current).div_euclid(2);
            self.prefer_max = mid.clamp(self.prefer_min, self.prefer_max);
        }

        if self.prefer_min == self.prefer_max {
            self.reached = true;
        }
    }

    /// Reset when an improvement lands outside the interval or on an already
    /// converged dimension, otherwise narrow.
    pub fn apply_feedback(&mut self, previous: i64, current: i64, does_current_better: bool) -> Feedback {
        if does_current_better && (!self.contains(current) || self.reached) {
            self.reset();
            return Feedback::Reset;
        }

        self.update_boundary(previous, current, does_current_better);
        if self.reached {
            Feedback::Converged
        } else {
            Feedback::Narrowed
        }
    }
}
