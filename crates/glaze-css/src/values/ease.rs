//! Timing functions.
//!
//! [CSS Easing Functions](https://www.w3.org/TR/css-easing-1/)

use core::fmt;

use super::{StyleValue, ValueKind};
use crate::parser::{ParseError, ValueParser};
use crate::tokenizer::CSSToken;

/// A timing function mapping linear progress to eased progress.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Ease {
    /// `cubic-bezier(x1, y1, x2, y2)`.
    CubicBezier {
        /// First control point x, in `[0, 1]`.
        x1: f64,
        /// First control point y.
        y1: f64,
        /// Second control point x, in `[0, 1]`.
        x2: f64,
        /// Second control point y.
        y2: f64,
    },
    /// `steps(n, start|end)`.
    Steps {
        /// Number of intervals, at least one.
        steps: u32,
        /// Whether the jump happens at the start of each interval.
        start: bool,
    },
}

const NAMED_BEZIERS: [(&str, [f64; 4]); 5] = [
    ("linear", [0.0, 0.0, 1.0, 1.0]),
    ("ease-in-out", [0.42, 0.0, 0.58, 1.0]),
    ("ease-in", [0.42, 0.0, 1.0, 1.0]),
    ("ease-out", [0.0, 0.0, 0.58, 1.0]),
    ("ease", [0.25, 0.1, 0.25, 1.0]),
];

impl Ease {
    /// `ease`, the default transition timing.
    pub const EASE: Self = Self::CubicBezier {
        x1: 0.25,
        y1: 0.1,
        x2: 0.25,
        y2: 1.0,
    };

    /// `linear`.
    pub const LINEAR: Self = Self::CubicBezier {
        x1: 0.0,
        y1: 0.0,
        x2: 1.0,
        y2: 1.0,
    };

    /// Eased progress for linear `progress` in `[0, 1]`.
    #[must_use]
    pub fn transform(&self, progress: f64) -> f64 {
        let progress = progress.clamp(0.0, 1.0);
        match *self {
            Self::CubicBezier { x1, y1, x2, y2 } => {
                if progress == 0.0 || progress == 1.0 {
                    return progress;
                }
                let t = solve_bezier_x(progress, x1, x2);
                bezier(t, y1, y2)
            }
            Self::Steps { steps, start } => {
                let steps = f64::from(steps.max(1));
                let mut step = (progress * steps).floor();
                if start {
                    step += 1.0;
                }
                (step / steps).clamp(0.0, 1.0)
            }
        }
    }

    /// Parse a timing function keyword or function.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] for unknown names or out of range
    /// arguments.
    pub fn parse(parser: &mut ValueParser<'_>) -> Result<Self, ParseError> {
        if parser.try_ident("step-start") {
            return Ok(Self::Steps {
                steps: 1,
                start: true,
            });
        }
        if parser.try_ident("step-end") {
            return Ok(Self::Steps {
                steps: 1,
                start: false,
            });
        }
        for (name, [x1, y1, x2, y2]) in NAMED_BEZIERS {
            if parser.try_ident(name) {
                return Ok(Self::CubicBezier { x1, y1, x2, y2 });
            }
        }
        if parser.try_function("cubic-bezier") {
            let mut points = [0.0; 4];
            for (i, point) in points.iter_mut().enumerate() {
                if i > 0 {
                    parser.expect_comma()?;
                }
                *point = parser.expect_number()?;
            }
            parser.expect_close_paren()?;
            let [x1, y1, x2, y2] = points;
            if !(0.0..=1.0).contains(&x1) || !(0.0..=1.0).contains(&x2) {
                return Err(ParseError::invalid("cubic-bezier x values must be between 0 and 1"));
            }
            return Ok(Self::CubicBezier { x1, y1, x2, y2 });
        }
        if parser.try_function("steps") {
            let steps = match parser.next_token() {
                CSSToken::Number {
                    value,
                    integer: true,
                } if *value >= 1.0 => *value as u32,
                other => {
                    return Err(ParseError::Expected {
                        expected: "a positive integer".to_string(),
                        found: other.to_string(),
                    });
                }
            };
            let mut start = false;
            if parser.try_comma() {
                if parser.try_ident("start") {
                    start = true;
                } else if !parser.try_ident("end") {
                    return Err(parser.expected("'start' or 'end'"));
                }
            }
            parser.expect_close_paren()?;
            return Ok(Self::Steps { steps, start });
        }
        Err(parser.expected("a timing function"))
    }

    /// Parse a timing function into a value.
    ///
    /// # Errors
    ///
    /// See [`Ease::parse`].
    pub fn parse_value(parser: &mut ValueParser<'_>) -> Result<StyleValue, ParseError> {
        Self::parse(parser).map(|ease| StyleValue::new(ValueKind::Ease(ease)))
    }
}

/// One coordinate of a cubic Bézier from `0` through `p1`, `p2` to `1`.
fn bezier(t: f64, p1: f64, p2: f64) -> f64 {
    let u = 1.0 - t;
    3.0 * u * u * t * p1 + 3.0 * u * t * t * p2 + t * t * t
}

fn bezier_derivative(t: f64, p1: f64, p2: f64) -> f64 {
    let u = 1.0 - t;
    3.0 * u * u * p1 + 6.0 * u * t * (p2 - p1) + 3.0 * t * t * (1.0 - p2)
}

/// Find `t` with `bezier(t, x1, x2) == x`. Newton steps first, bisection
/// when the slope is too flat.
fn solve_bezier_x(x: f64, x1: f64, x2: f64) -> f64 {
    const EPSILON: f64 = 1e-7;
    let mut t = x;
    for _ in 0..8 {
        let error = bezier(t, x1, x2) - x;
        if error.abs() < EPSILON {
            return t;
        }
        let slope = bezier_derivative(t, x1, x2);
        if slope.abs() < 1e-6 {
            break;
        }
        t -= error / slope;
    }

    let (mut low, mut high) = (0.0, 1.0);
    t = x;
    while high - low > EPSILON {
        let value = bezier(t, x1, x2);
        if (value - x).abs() < EPSILON {
            break;
        }
        if value < x {
            low = t;
        } else {
            high = t;
        }
        t = (low + high) / 2.0;
    }
    t
}

impl fmt::Display for Ease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::CubicBezier { x1, y1, x2, y2 } => {
                if let Some((name, _)) = NAMED_BEZIERS
                    .iter()
                    .find(|(_, points)| *points == [x1, y1, x2, y2])
                {
                    return f.write_str(name);
                }
                write!(f, "cubic-bezier({x1}, {y1}, {x2}, {y2})")
            }
            Self::Steps { steps: 1, start: true } => f.write_str("step-start"),
            Self::Steps {
                steps: 1,
                start: false,
            } => f.write_str("step-end"),
            Self::Steps { steps, start } => {
                write!(f, "steps({steps}, {})", if start { "start" } else { "end" })
            }
        }
    }
}

impl StyleValue {
    /// The timing function held by this value.
    #[must_use]
    pub fn as_ease(&self) -> Option<Ease> {
        match self.kind() {
            ValueKind::Ease(e) => Some(*e),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_is_identity() {
        for p in [0.0, 0.25, 0.5, 0.9, 1.0] {
            assert!((Ease::LINEAR.transform(p) - p).abs() < 1e-6);
        }
    }

    #[test]
    fn test_ease_is_monotonic() {
        let mut last = 0.0;
        for i in 0..=20 {
            let v = Ease::EASE.transform(f64::from(i) / 20.0);
            assert!(v >= last - 1e-9);
            last = v;
        }
        assert_eq!(Ease::EASE.transform(1.0), 1.0);
    }

    #[test]
    fn test_steps() {
        let ease = Ease::Steps {
            steps: 4,
            start: false,
        };
        assert_eq!(ease.transform(0.3), 0.25);
        let ease = Ease::Steps {
            steps: 4,
            start: true,
        };
        assert_eq!(ease.transform(0.3), 0.5);
    }
}
