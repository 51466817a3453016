//! Clocks and property transitions.

mod clock;
mod transition;

pub use clock::{Clock, ManualClock, SystemClock};
pub use transition::{TransitionRecord, TransitionState};
