//! [CSS Values § 10 Mathematical Expressions](https://www.w3.org/TR/css-values-4/#math)
//!
//! Only sums are kept: "calc(100% - 2 * 3px)" folds into the terms
//! `100%` and `-6px`. Terms are merged per unit, zero terms are dropped and
//! the rest are sorted by [`Unit::calc_term_order`], so two sums are equal
//! exactly when their term lists are.

use core::fmt;

use glaze_common::warning::warn_once;

use super::dimension::{UnitKind, parse_dimension};
use super::{ComputeContext, Dimension, NumberFlags, StyleValue, Unit, ValueKind};
use crate::parser::{ParseError, ValueParser};
use crate::style::PropertyId;
use crate::tokenizer::CSSToken;

/// A sum of dimensions with at least two distinct units.
#[derive(Debug, Clone, PartialEq)]
pub struct Calc {
    terms: Vec<Dimension>,
}

impl Calc {
    /// Build a value from a list of terms. A sum that collapses to a
    /// single unit becomes a plain dimension.
    #[must_use]
    pub fn from_terms(terms: Vec<Dimension>) -> StyleValue {
        let mut merged: Vec<Dimension> = Vec::with_capacity(terms.len());
        for term in terms {
            let sum = merged
                .iter()
                .enumerate()
                .find_map(|(i, t)| t.try_add(term).map(|sum| (i, sum)));
            match sum {
                Some((i, sum)) => merged[i] = sum,
                None => merged.push(term),
            }
        }
        let fallback = merged.first().map(|d| Dimension::new(0.0, d.unit));
        merged.retain(|d| d.value != 0.0);
        merged.sort_by_key(|d| d.unit.calc_term_order());

        match merged.len() {
            0 => {
                let zero = fallback.unwrap_or(Dimension::new(0.0, Unit::Number));
                StyleValue::dimension(zero.value, zero.unit)
            }
            1 => StyleValue::dimension(merged[0].value, merged[0].unit),
            _ => StyleValue::new(ValueKind::Calc(Self { terms: merged })),
        }
    }

    /// The terms in print order.
    #[must_use]
    pub fn terms(&self) -> &[Dimension] {
        &self.terms
    }

    /// The sum, with percentages taken relative to `one_hundred_percent`.
    #[must_use]
    pub fn get(&self, one_hundred_percent: f64) -> f64 {
        self.terms.iter().map(|d| d.get(one_hundred_percent)).sum()
    }

    pub(crate) fn compute(&self, property: PropertyId, ctx: &ComputeContext<'_>) -> StyleValue {
        let terms = self
            .terms
            .iter()
            .map(|term| {
                let specified = StyleValue::new(ValueKind::Dimension(*term));
                specified
                    .compute(property, ctx)
                    .as_dimension()
                    .unwrap_or(*term)
            })
            .collect();
        Self::from_terms(terms)
    }

    /// Interpolate between two dimension or `calc()` values.
    #[must_use]
    pub fn transition_values(start: &StyleValue, end: &StyleValue, progress: f64) -> Option<StyleValue> {
        let start_terms = terms_of(start)?;
        let end_terms = terms_of(end)?;
        let terms = start_terms
            .into_iter()
            .map(|d| d.multiply(1.0 - progress))
            .chain(end_terms.into_iter().map(|d| d.multiply(progress)))
            .collect();
        Some(Self::from_terms(terms))
    }

    /// Parse `calc( <sum> )`.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] for malformed expressions, products of two
    /// dimensions, division by zero, or units `flags` does not allow.
    pub fn parse(parser: &mut ValueParser<'_>, flags: NumberFlags) -> Result<StyleValue, ParseError> {
        if !parser.try_function("calc") {
            return Err(parser.expected("'calc('"));
        }
        let term_flags = (flags | NumberFlags::PARSE_NUMBER)
            - NumberFlags::NUMBER_AS_PIXELS
            - NumberFlags::POSITIVE_ONLY;
        let terms = parse_sum(parser, term_flags)?;
        parser.expect_close_paren()?;

        if !flags.contains(NumberFlags::PARSE_NUMBER)
            && terms.iter().any(|d| d.unit == Unit::Number && d.value != 0.0)
        {
            return Err(ParseError::invalid("calc() expression must have a unit"));
        }
        Ok(Self::from_terms(terms))
    }
}

fn terms_of(value: &StyleValue) -> Option<Vec<Dimension>> {
    match value.kind() {
        ValueKind::Dimension(d) => Some(vec![*d]),
        ValueKind::Calc(c) => Some(c.terms.clone()),
        _ => None,
    }
}

fn parse_sum(parser: &mut ValueParser<'_>, flags: NumberFlags) -> Result<Vec<Dimension>, ParseError> {
    let mut terms = parse_product(parser, flags)?;
    loop {
        let rhs = if parser.try_delim('+') {
            parse_product(parser, flags)?
        } else if parser.try_delim('-') {
            scale(parse_product(parser, flags)?, -1.0)
        } else {
            return Ok(terms);
        };
        if let Some(kind) = mismatched_kind(&terms, &rhs) {
            // The sum keeps its first operand.
            warn_once("CSS", &format!("calc(): cannot add {kind:?} to {:?}", sum_kind(&terms)));
        } else {
            terms.extend(rhs);
        }
    }
}

/// The measured quantity of a sum, ignoring percentages.
fn sum_kind(terms: &[Dimension]) -> Option<UnitKind> {
    terms
        .iter()
        .map(|d| d.unit.kind())
        .find(|k| *k != UnitKind::Percent)
}

/// The kind of `rhs` when it cannot be added to `lhs`.
fn mismatched_kind(lhs: &[Dimension], rhs: &[Dimension]) -> Option<UnitKind> {
    match (sum_kind(lhs), sum_kind(rhs)) {
        (Some(a), Some(b)) if a != b => Some(b),
        _ => None,
    }
}

fn parse_product(parser: &mut ValueParser<'_>, flags: NumberFlags) -> Result<Vec<Dimension>, ParseError> {
    let mut terms = parse_operand(parser, flags)?;
    loop {
        if parser.try_delim('*') {
            let rhs = parse_operand(parser, flags)?;
            terms = if let Some(factor) = as_plain_number(&rhs) {
                scale(terms, factor)
            } else if let Some(factor) = as_plain_number(&terms) {
                scale(rhs, factor)
            } else {
                return Err(ParseError::invalid("calc() can only multiply by numbers"));
            };
        } else if parser.try_delim('/') {
            let rhs = parse_operand(parser, flags)?;
            let divisor = as_plain_number(&rhs)
                .ok_or_else(|| ParseError::invalid("calc() can only divide by numbers"))?;
            if divisor == 0.0 {
                return Err(ParseError::invalid("division by zero"));
            }
            terms = scale(terms, 1.0 / divisor);
        } else {
            return Ok(terms);
        }
    }
}

fn parse_operand(parser: &mut ValueParser<'_>, flags: NumberFlags) -> Result<Vec<Dimension>, ParseError> {
    if matches!(parser.peek(), CSSToken::LeftParen) {
        let _ = parser.next_token();
        let terms = parse_sum(parser, flags)?;
        parser.expect_close_paren()?;
        return Ok(terms);
    }
    if parser.try_function("calc") {
        let terms = parse_sum(parser, flags)?;
        parser.expect_close_paren()?;
        return Ok(terms);
    }
    Ok(vec![parse_dimension(parser, flags)?])
}

fn as_plain_number(terms: &[Dimension]) -> Option<f64> {
    if terms.iter().all(|d| d.unit == Unit::Number) {
        Some(terms.iter().map(|d| d.value).sum())
    } else {
        None
    }
}

fn scale(terms: Vec<Dimension>, factor: f64) -> Vec<Dimension> {
    terms.into_iter().map(|d| d.multiply(factor)).collect()
}

impl fmt::Display for Calc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("calc(")?;
        for (i, term) in self.terms.iter().enumerate() {
            if i > 0 {
                f.write_str(" + ")?;
            }
            term.fmt(f)?;
        }
        f.write_str(")")
    }
}
