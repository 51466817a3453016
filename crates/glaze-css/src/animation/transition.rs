//! Running transitions.
//!
//! [CSS Transitions § 3](https://drafts.csswg.org/css-transitions-1/#starting)
//!
//! "When the computed value of a property changes, implementations must
//! start transitions based on the relevant item in the values of the
//! transition-property, transition-duration, transition-timing-function,
//! and transition-delay properties at the time of the style change."

use crate::style::PropertyId;
use crate::values::{Ease, StyleValue};

/// Where a transition is in its life.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionState {
    /// Created but still inside its delay.
    Idle,
    /// Interpolating between start and end.
    Running,
    /// Done; the end value applies.
    Finished,
}

/// One property moving from `start` to `end`.
#[derive(Debug, Clone)]
pub struct TransitionRecord {
    property: PropertyId,
    start: StyleValue,
    end: StyleValue,
    start_time: f64,
    duration: f64,
    ease: Ease,
    state: TransitionState,
}

impl TransitionRecord {
    /// A transition created at `now`. It begins after `delay` seconds
    /// (a negative delay starts it part way through) and lasts `duration`.
    #[must_use]
    pub fn new(
        property: PropertyId,
        start: StyleValue,
        end: StyleValue,
        now: f64,
        delay: f64,
        duration: f64,
        ease: Ease,
    ) -> Self {
        let mut record = Self {
            property,
            start,
            end,
            start_time: now + delay,
            duration: duration.max(0.0),
            ease,
            state: TransitionState::Idle,
        };
        record.update_state(now);
        record
    }

    /// The animated property.
    #[must_use]
    pub const fn property(&self) -> PropertyId {
        self.property
    }

    /// The value the transition started from.
    #[must_use]
    pub const fn start(&self) -> &StyleValue {
        &self.start
    }

    /// The value the transition ends at.
    #[must_use]
    pub const fn end(&self) -> &StyleValue {
        &self.end
    }

    /// Current state, as of the last [`Self::advance`].
    #[must_use]
    pub const fn state(&self) -> TransitionState {
        self.state
    }

    /// Whether the end value now applies for good.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.state == TransitionState::Finished
    }

    /// Linear progress at `now`, in `[0, 1]`.
    #[must_use]
    pub fn progress(&self, now: f64) -> f64 {
        if now < self.start_time {
            return 0.0;
        }
        if self.duration <= 0.0 {
            return 1.0;
        }
        ((now - self.start_time) / self.duration).clamp(0.0, 1.0)
    }

    /// The interpolated value at `now`.
    ///
    /// Values that cannot be interpolated flip from start to end halfway
    /// through.
    #[must_use]
    pub fn value_at(&self, now: f64) -> StyleValue {
        let linear = self.progress(now);
        if linear >= 1.0 {
            return self.end.clone();
        }
        let eased = self.ease.transform(linear);
        self.start
            .transition(&self.end, self.property, eased)
            .unwrap_or_else(|| {
                if linear < 0.5 {
                    self.start.clone()
                } else {
                    self.end.clone()
                }
            })
    }

    /// Move the state machine to `now` and return the value to show.
    pub fn advance(&mut self, now: f64) -> StyleValue {
        self.update_state(now);
        self.value_at(now)
    }

    fn update_state(&mut self, now: f64) {
        self.state = if self.progress(now) >= 1.0 {
            TransitionState::Finished
        } else if now < self.start_time {
            TransitionState::Idle
        } else {
            TransitionState::Running
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::values::Rgba;

    fn red_to_blue(delay: f64) -> TransitionRecord {
        TransitionRecord::new(
            PropertyId::Color,
            StyleValue::rgba(Rgba::new(1.0, 0.0, 0.0, 1.0)),
            StyleValue::rgba(Rgba::new(0.0, 0.0, 1.0, 1.0)),
            0.0,
            delay,
            0.2,
            Ease::LINEAR,
        )
    }

    #[test]
    fn test_lifecycle() {
        let mut record = red_to_blue(0.1);
        assert_eq!(record.state(), TransitionState::Idle);
        let _ = record.advance(0.2);
        assert_eq!(record.state(), TransitionState::Running);
        let value = record.advance(0.3);
        assert!(record.is_finished());
        assert!(value.equal(record.end()));
    }

    #[test]
    fn test_midpoint() {
        let record = red_to_blue(0.0);
        let mid = record.value_at(0.1).as_rgba();
        assert!((mid.red - 0.5).abs() < 1e-9);
        assert!((mid.blue - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_negative_delay_starts_part_way() {
        let record = red_to_blue(-0.1);
        assert_eq!(record.state(), TransitionState::Running);
        assert!((record.progress(0.0) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_discrete_values_flip_halfway() {
        let record = TransitionRecord::new(
            PropertyId::FontFamily,
            StyleValue::ident("a"),
            StyleValue::ident("b"),
            0.0,
            0.0,
            1.0,
            Ease::LINEAR,
        );
        assert_eq!(record.value_at(0.4).to_string(), "a");
        assert_eq!(record.value_at(0.6).to_string(), "b");
    }
}
