//! Shake classification over a stream of window position samples.
//!
//! # Algorithm
//!
//! Each sample is compared with the previous one using the per-axis delta
//! `max(|Δx|, |Δy|)`:
//!
//! - delta above `sensitivity_px`: the window is moving. The first moving
//!   sample records `moving_since`. A later moving sample whose time since
//!   `moving_since` exceeds `min_duration_ms` starts a shake.
//! - otherwise the window is still. An open shake ends; an unconfirmed
//!   movement is dropped without an event.
//!
//! Timing granularity equals the sampling period. With the default 400ms
//! period and 500ms minimum duration a shake starts on the third consecutive
//! moving sample.
//!
//! # Invariants
//!
//! 1. `Shaking` is only reachable from `Moving`.
//! 2. Every [`ShakeEvent::Start`] is followed by exactly one
//!    [`ShakeEvent::End`], either from a still sample or from [`ShakeClassifier::finish`].

use std::fmt;

use crate::config::ShakeConfig;
use crate::geometry::{MotionSample, Position};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum ShakePhase {
    #[default]
    Idle,
    Moving,
    Shaking,
}

impl ShakePhase {
    /// A shaking window is still moving.
    pub fn is_moving(self) -> bool {
        matches!(self, ShakePhase::Moving | ShakePhase::Shaking)
    }
}

/// Shake lifecycle events delivered to detector listeners.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ShakeEvent {
    Start,
    End,
}

impl ShakeEvent {
    pub fn name(self) -> &'static str {
        match self {
            ShakeEvent::Start => "shakestart",
            ShakeEvent::End => "shakeend",
        }
    }
}

impl fmt::Display for ShakeEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Tracking {
    Idle,
    Moving { since: u64 },
    Shaking { moving_since: u64, shaking_since: u64 },
}

/// Timer-free shake phase machine.
#[derive(Clone, Debug)]
pub struct ShakeClassifier {
    sensitivity_px: u64,
    min_duration_ms: u64,
    last_position: Position,
    tracking: Tracking,
}

impl ShakeClassifier {
    pub fn new(config: &ShakeConfig, baseline: Position) -> Self {
        Self {
            sensitivity_px: u64::from(config.sensitivity_px),
            min_duration_ms: config.min_duration_ms,
            last_position: baseline,
            tracking: Tracking::Idle,
        }
    }

    pub fn phase(&self) -> ShakePhase {
        match self.tracking {
            Tracking::Idle => ShakePhase::Idle,
            Tracking::Moving { .. } => ShakePhase::Moving,
            Tracking::Shaking { .. } => ShakePhase::Shaking,
        }
    }

    pub fn moving_since(&self) -> Option<u64> {
        match self.tracking {
            Tracking::Idle => None,
            Tracking::Moving { since } => Some(since),
            Tracking::Shaking { moving_since, .. } => Some(moving_since),
        }
    }

    pub fn shaking_since(&self) -> Option<u64> {
        match self.tracking {
            Tracking::Shaking { shaking_since, .. } => Some(shaking_since),
            _ => None,
        }
    }

    pub fn last_position(&self) -> Position {
        self.last_position
    }

    /// Replaces the comparison baseline without touching the phase.
    pub fn reset_baseline(&mut self, baseline: Position) {
        self.last_position = baseline;
    }

    /// Classifies one sample against the previous one.
    pub fn sample(&mut self, sample: &MotionSample) -> Option<ShakeEvent> {
        let delta = self.last_position.axis_delta(sample.position);
        self.last_position = sample.position;
        let now = sample.timestamp_ms;

        if delta > self.sensitivity_px {
            match self.tracking {
                Tracking::Idle => {
                    log::debug!("window started moving at {now}ms (delta {delta}px)");
                    self.tracking = Tracking::Moving { since: now };
                    None
                }
                Tracking::Moving { since } if now.saturating_sub(since) > self.min_duration_ms => {
                    log::debug!("shake confirmed at {now}ms after moving since {since}ms");
                    self.tracking = Tracking::Shaking {
                        moving_since: since,
                        shaking_since: now,
                    };
                    Some(ShakeEvent::Start)
                }
                Tracking::Moving { .. } | Tracking::Shaking { .. } => None,
            }
        } else {
            match std::mem::replace(&mut self.tracking, Tracking::Idle) {
                Tracking::Shaking { shaking_since, .. } => {
                    log::debug!("shake ended at {now}ms after {}ms", now.saturating_sub(shaking_since));
                    Some(ShakeEvent::End)
                }
                Tracking::Moving { since } => {
                    log::trace!("movement since {since}ms settled before confirming a shake");
                    None
                }
                Tracking::Idle => None,
            }
        }
    }

    /// Returns to idle, closing an open shake.
    pub fn finish(&mut self) -> Option<ShakeEvent> {
        match std::mem::replace(&mut self.tracking, Tracking::Idle) {
            Tracking::Shaking { .. } => Some(ShakeEvent::End),
            Tracking::Moving { .. } | Tracking::Idle => None,
        }
    }
}

#[cfg(test)]
#[path = "tests/shake_tests.rs"]
mod tests;
