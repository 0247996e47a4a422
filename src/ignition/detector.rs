//! Threshold-based ignition detection

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::StudyError;
use crate::solver::{Sample, Trajectory};

/// Default temperature rise that marks ignition \[K\]
pub const IGNITION_THRESHOLD: f64 = 400.0;

// =================================================================================================
// Detection rule
// =================================================================================================

/// How a temperature rise is measured against the threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DetectionRule {
    /// First sample n with `T[n] - T0 >= threshold`, T0 the run's initial temperature
    #[default]
    CumulativeRise,

    /// First pair with `T[i+1] - T[i] >= threshold`; reports the time of sample i
    ConsecutiveDelta,
}

impl DetectionRule {
    pub fn name(&self) -> &'static str {
        match self {
            DetectionRule::CumulativeRise => "cumulative-rise",
            DetectionRule::ConsecutiveDelta => "consecutive-delta",
        }
    }
}

impl FromStr for DetectionRule {
    type Err = StudyError;

    fn from_str(rule: &str) -> Result<Self, Self::Err> {
        match rule.trim().replace(['_', ' '], "-").as_str() {
            "cumulative-rise" => Ok(DetectionRule::CumulativeRise),
            "consecutive-delta" => Ok(DetectionRule::ConsecutiveDelta),
            _ => Err(StudyError::config(format!("unknown detection rule '{}'", rule))),
        }
    }
}

impl fmt::Display for DetectionRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =================================================================================================
// Result
// =================================================================================================

/// Outcome of ignition detection on one trajectory
///
/// `delay` is `None` when the threshold was never reached. A run that ignites
/// on its very first sample has `delay == Some(0.0)`, which is a different
/// outcome.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct IgnitionResult {
    /// Ignition delay \[s\]
    pub delay: Option<f64>,

    /// Index of the sample the delay was read from
    pub sample_index: Option<usize>,
}

impl IgnitionResult {
    pub fn ignited_at(delay: f64, sample_index: usize) -> Self {
        Self {
            delay: Some(delay),
            sample_index: Some(sample_index),
        }
    }

    pub fn not_ignited() -> Self {
        Self::default()
    }

    pub fn ignited(&self) -> bool {
        self.delay.is_some()
    }

    /// Delay in milliseconds
    pub fn delay_ms(&self) -> Option<f64> {
        self.delay.map(|d| d * 1e3)
    }
}

impl fmt::Display for IgnitionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.delay_ms() {
            Some(ms) => write!(f, "{:.3} ms", ms),
            None => f.write_str("no ignition"),
        }
    }
}

// =================================================================================================
// Detector
// =================================================================================================

/// Finds the ignition delay of a trajectory
///
/// Pure: inspects the trajectory and returns a result, nothing else.
///
/// # Example
///
/// ```rust
/// use ignite_rs::ignition::{DetectionRule, IgnitionDetector};
///
/// let detector = IgnitionDetector::new(DetectionRule::CumulativeRise);
/// let times = [0.0, 0.001, 0.002];
/// let temperatures = [300.0, 301.0, 700.0];
///
/// let result = detector.detect_series(&times, &temperatures, 300.0);
/// assert_eq!(result.delay, Some(0.002));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IgnitionDetector {
    rule: DetectionRule,
    threshold: f64,
}

impl Default for IgnitionDetector {
    fn default() -> Self {
        Self::new(DetectionRule::default())
    }
}

impl IgnitionDetector {
    /// Detector with the standard 400 K threshold
    pub fn new(rule: DetectionRule) -> Self {
        Self {
            rule,
            threshold: IGNITION_THRESHOLD,
        }
    }

    /// Builder pattern: override the threshold \[K\]
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn rule(&self) -> DetectionRule {
        self.rule
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Detect ignition on a recorded trajectory
    ///
    /// `initial_temperature` is the run's initial temperature, the reference of
    /// the cumulative-rise rule. The consecutive-delta rule ignores it.
    pub fn detect(&self, trajectory: &Trajectory, initial_temperature: f64) -> IgnitionResult {
        let mut watch = self.watch(initial_temperature);
        for sample in trajectory.samples() {
            if watch.observe(sample.time, sample.temperature()) {
                return watch.result();
            }
        }
        IgnitionResult::not_ignited()
    }

    /// Detect ignition on parallel time and temperature series
    ///
    /// Extra elements of the longer slice are ignored.
    pub fn detect_series(&self, times: &[f64], temperatures: &[f64], initial_temperature: f64) -> IgnitionResult {
        let mut watch = self.watch(initial_temperature);
        for (&time, &temperature) in times.iter().zip(temperatures) {
            if watch.observe(time, temperature) {
                return watch.result();
            }
        }
        IgnitionResult::not_ignited()
    }

    /// Streaming form of the detector, fed one sample at a time
    pub fn watch(&self, initial_temperature: f64) -> IgnitionWatch {
        IgnitionWatch {
            detector: *self,
            initial_temperature,
            previous: None,
            samples_seen: 0,
            result: None,
        }
    }
}

// =================================================================================================
// Streaming watch
// =================================================================================================

/// Incremental detector for interleaving detection with stepping
///
/// Feed samples in time order. Once ignition has been seen the watch latches:
/// later samples do not change the result.
#[derive(Debug, Clone)]
pub struct IgnitionWatch {
    detector: IgnitionDetector,
    initial_temperature: f64,
    /// Time and temperature of the last sample seen
    previous: Option<(f64, f64)>,
    samples_seen: usize,
    result: Option<IgnitionResult>,
}

impl IgnitionWatch {
    /// Observe one sample, returns true once ignition has been detected
    pub fn observe(&mut self, time: f64, temperature: f64) -> bool {
        if self.result.is_some() {
            return true;
        }

        let index = self.samples_seen;
        self.samples_seen += 1;

        // (rise, time and index the delay is read from)
        let rise = match self.detector.rule {
            DetectionRule::CumulativeRise => Some((temperature - self.initial_temperature, time, index)),
            DetectionRule::ConsecutiveDelta => self
                .previous
                .map(|(previous_time, previous)| (temperature - previous, previous_time, index - 1)),
        };
        self.previous = Some((time, temperature));

        if let Some((rise, delay, sample_index)) = rise
            && rise >= self.detector.threshold
        {
            self.result = Some(IgnitionResult::ignited_at(delay, sample_index));
            return true;
        }

        false
    }

    /// Convenience for [`advance_with`](crate::solver::advance_with) observers
    pub fn observe_sample(&mut self, sample: &Sample) -> bool {
        self.observe(sample.time, sample.temperature())
    }

    pub fn ignited(&self) -> bool {
        self.result.is_some()
    }

    /// Result so far; not ignited until the threshold is crossed
    pub fn result(&self) -> IgnitionResult {
        self.result.unwrap_or_default()
    }
}
