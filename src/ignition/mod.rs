//! Ignition detection
//!
//! Ignition is declared when the temperature has risen by a threshold
//! (400 K by default). Two ways of measuring the rise are available:
//!
//! | Rule | Condition at sample n | Delay reported |
//! |---|---|---|
//! | [`DetectionRule::CumulativeRise`] | `T[n] - T0 >= threshold` | t\[n\] |
//! | [`DetectionRule::ConsecutiveDelta`] | `T[n] - T[n-1] >= threshold` | t\[n-1\] |
//!
//! The rule is always chosen explicitly per study; the two can disagree by a
//! lot (a slow thermal runaway never produces a 400 K jump between samples).
//!
//! A run that never crosses the threshold has `delay == None`. It is never
//! reported as zero or as the end of the horizon.
//!
//! # Batch and streaming
//!
//! [`IgnitionDetector::detect`] scans a finished trajectory.
//! [`IgnitionWatch`] gives the same answer one sample at a time, so a sweep
//! can stop advancing a reactor as soon as the delay is known.

mod detector;

pub use detector::{DetectionRule, IGNITION_THRESHOLD, IgnitionDetector, IgnitionResult, IgnitionWatch};
