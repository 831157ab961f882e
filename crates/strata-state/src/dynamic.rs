//! Step-indexed values with carry-forward semantics.

use serde::{Deserialize, Serialize};
use strata_core::{Result, ScheduleError};

use crate::time_map::TimeMap;

/// A value that may change at report steps.
///
/// A value set at step `t` stays in effect for every later step until it is
/// set again. Steps before the first update read the initial value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DynamicState<T> {
    /// Effective value per step, up to the last updated step.
    data: Vec<T>,

    /// Value in effect before any update.
    initial: T,
}

impl<T: Clone> DynamicState<T> {
    /// Create a state holding `initial` at every step.
    pub fn new(initial: T) -> Self {
        Self {
            data: Vec::new(),
            initial,
        }
    }

    /// The value in effect at `step`.
    pub fn get(&self, step: usize) -> &T {
        self.data
            .get(step)
            .or_else(|| self.data.last())
            .unwrap_or(&self.initial)
    }

    /// The value in effect before any update.
    pub fn initial(&self) -> &T {
        &self.initial
    }

    /// The value in effect at `step`, checked against the timeline.
    pub fn get_checked(&self, time_map: &TimeMap, step: usize) -> Result<&T> {
        check_step(time_map, step)?;
        Ok(self.get(step))
    }

    /// Last step at which the value was set.
    pub fn last_update(&self) -> Option<usize> {
        self.data.len().checked_sub(1)
    }

    /// Set the value from `step` onwards.
    ///
    /// `step` must exist in `time_map`, and updates must arrive in
    /// non-decreasing step order. Setting the last updated step again
    /// overwrites it.
    pub fn update(&mut self, time_map: &TimeMap, step: usize, value: T) -> Result<()> {
        check_step(time_map, step)?;

        if let Some(last) = self.last_update() {
            if step < last {
                return Err(ScheduleError::invalid_value(format!(
                    "update at step {} precedes the last update at step {}",
                    step, last
                )));
            }
            if step == last {
                self.data[last] = value;
                return Ok(());
            }
        }

        let carried = self.get(step).clone();
        self.data.resize(step, carried);
        self.data.push(value);
        Ok(())
    }
}

fn check_step(time_map: &TimeMap, step: usize) -> Result<()> {
    if step >= time_map.len() {
        return Err(ScheduleError::Range {
            what: "report steps",
            index: step,
            size: time_map.len(),
        });
    }
    Ok(())
}
