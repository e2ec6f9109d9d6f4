//! Drift-correcting update schedule
//!
//! The host polls frequently (every millisecond or so). Each poll fires at
//! most one update, and the schedule advances by exactly one interval per
//! update rather than by observed elapsed time, so late polls are caught up
//! on the following ones instead of being lost.

#[derive(Debug, Clone)]
pub struct UpdateTimer {
    interval: f64,
    skew: f64,
    /// Expected time of the last update, in skewed milliseconds
    last_update: f64,
    running: bool,
}

impl UpdateTimer {
    /// Start a schedule at wall time `now` (ms). `skew` is subtracted from
    /// every reading.
    pub fn new(interval: f64, skew: f64, now: f64) -> Self {
        Self {
            interval,
            skew,
            last_update: now - skew,
            running: true,
        }
    }

    /// Returns the timestamp to update to, if an update is due at `now`
    pub fn poll(&mut self, now: f64) -> Option<f64> {
        if !self.running {
            return None;
        }
        let date = now - self.skew;
        if date - self.last_update >= self.interval {
            self.last_update += self.interval;
            Some(date)
        } else {
            None
        }
    }

    /// End the schedule; every later poll returns `None`
    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn interval(&self) -> f64 {
        self.interval
    }
}
