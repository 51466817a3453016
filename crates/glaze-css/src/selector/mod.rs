//! Selector parsing and matching.
//!
//! Theme selectors use a small part of
//! [Selectors Level 4](https://www.w3.org/TR/selectors-4/): element names,
//! classes, ids, the universal selector, widget state pseudo-classes and
//! the descendant and child combinators.

use core::fmt;
use std::rc::Rc;

use crate::parser::ParseError;
use crate::style::{StateFlags, StyleNode};
use crate::tokenizer::CSSToken;

/// [§ 5 Elemental selectors](https://www.w3.org/TR/selectors-4/#elemental-selectors)
///
/// A simple selector is a single condition on a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimpleSelector {
    /// [§ 5.1 Type selector](https://www.w3.org/TR/selectors-4/#type-selectors)
    /// "A type selector is the name of a document language element type,
    /// and represents an instance of that element type in the document tree."
    ///
    /// Examples: `button`, `entry`, `check`
    Type(String),

    /// [§ 6.6 Class selector](https://www.w3.org/TR/selectors-4/#class-html)
    /// "The class selector is given as a full stop (. U+002E) immediately
    /// followed by an identifier."
    Class(String),

    /// [§ 6.7 ID selector](https://www.w3.org/TR/selectors-4/#id-selectors)
    /// "An ID selector is a hash (#, U+0023) immediately followed by the
    /// ID value, which is an identifier."
    Id(String),

    /// [§ 5.2 Universal selector](https://www.w3.org/TR/selectors-4/#universal-selector)
    /// "The universal selector is a single asterisk (*) and represents the
    /// qualified name of any element type."
    Universal,

    /// A state pseudo-class such as `:hover` or `:dir(rtl)`. Matches when
    /// every flag is set on the node.
    State(StateFlags),
}

/// [§ 4.2 Compound selectors](https://www.w3.org/TR/selectors-4/#compound)
///
/// "A compound selector is a sequence of simple selectors that are not
/// separated by a combinator, and represents a set of simultaneous
/// conditions on a single element."
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompoundSelector {
    /// The list of simple selectors that make up this compound selector.
    pub simple_selectors: Vec<SimpleSelector>,
}

/// [§ 16 Combinators](https://www.w3.org/TR/selectors-4/#combinators)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    /// [§ 16.1 Descendant combinator](https://www.w3.org/TR/selectors-4/#descendant-combinators)
    /// "A selector of the form 'A B' represents an element B that is an
    /// arbitrary descendant of some ancestor element A."
    Descendant,

    /// [§ 16.2 Child combinator](https://www.w3.org/TR/selectors-4/#child-combinators)
    /// "A selector of the form 'A > B' represents an element B that is a
    /// direct child of element A."
    Child,
}

/// [§ 4.3 Complex selectors](https://www.w3.org/TR/selectors-4/#complex)
///
/// "A complex selector is a chain of one or more compound selectors separated
/// by combinators."
///
/// `window > box button:hover` is stored as
/// ```text
/// subject: [button:hover], combinators: [(Descendant, [box]), (Child, [window])]
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComplexSelector {
    /// The rightmost compound selector, the one the node itself must match.
    pub subject: CompoundSelector,

    /// Chain of (combinator, compound) pairs going left from the subject.
    /// The order is right-to-left because matching walks up the tree.
    pub combinators: Vec<(Combinator, CompoundSelector)>,
}

/// [§ 17 Calculating Specificity](https://www.w3.org/TR/selectors-4/#specificity-rules)
/// "count the number of ID selectors in the selector (= A); count the
/// number of class selectors, attributes selectors, and pseudo-classes in
/// the selector (= B); count the number of type selectors and
/// pseudo-elements in the selector (= C)"
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Specificity(pub u32, pub u32, pub u32);

impl Specificity {
    /// Create a new specificity with (A, B, C) components.
    #[must_use]
    pub const fn new(a: u32, b: u32, c: u32) -> Self {
        Self(a, b, c)
    }
}

/// A parsed selector ready for matching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedSelector {
    /// The complex selector.
    pub complex: ComplexSelector,
    /// The specificity of this selector.
    pub specificity: Specificity,
}

impl ParsedSelector {
    /// [§ 4.1 Selector Matching](https://www.w3.org/TR/selectors-4/#match-a-selector-against-an-element)
    ///
    /// Match the subject against `node`, then walk the combinator chain
    /// up through the node's ancestors.
    #[must_use]
    pub fn matches(&self, node: &StyleNode) -> bool {
        if !compound_matches(&self.complex.subject, node) {
            return false;
        }

        let mut current = node;
        for (combinator, compound) in &self.complex.combinators {
            match combinator {
                Combinator::Descendant => {
                    let Some(ancestor) = current
                        .ancestors()
                        .skip(1)
                        .find(|ancestor| compound_matches(compound, ancestor))
                    else {
                        return false;
                    };
                    current = ancestor;
                }
                Combinator::Child => {
                    let Some(parent) = current.parent().map(Rc::as_ref) else {
                        return false;
                    };
                    if !compound_matches(compound, parent) {
                        return false;
                    }
                    current = parent;
                }
            }
        }
        true
    }
}

fn compound_matches(compound: &CompoundSelector, node: &StyleNode) -> bool {
    compound.simple_selectors.iter().all(|simple| simple.matches(node))
}

impl SimpleSelector {
    /// Check this one condition against `node`.
    #[must_use]
    pub fn matches(&self, node: &StyleNode) -> bool {
        match self {
            Self::Type(name) => node.name().eq_ignore_ascii_case(name),
            Self::Class(class) => node.has_class(class),
            Self::Id(id) => node.id() == Some(id.as_str()),
            Self::Universal => true,
            Self::State(flags) => node.state().contains(*flags),
        }
    }
}

impl ComplexSelector {
    /// [§ 17 Calculating Specificity](https://www.w3.org/TR/selectors-4/#specificity-rules)
    ///
    /// Sum the specificity of every compound in the chain.
    #[must_use]
    pub fn calculate_specificity(&self) -> Specificity {
        core::iter::once(&self.subject)
            .chain(self.combinators.iter().map(|(_, compound)| compound))
            .flat_map(|compound| &compound.simple_selectors)
            .fold(Specificity::default(), |mut spec, simple| {
                match simple {
                    SimpleSelector::Id(_) => spec.0 += 1,
                    SimpleSelector::Class(_) | SimpleSelector::State(_) => spec.1 += 1,
                    SimpleSelector::Type(_) => spec.2 += 1,
                    // "ignore the universal selector"
                    SimpleSelector::Universal => {}
                }
                spec
            })
    }
}

/// The state flag a pseudo-class name tests, for pseudo-classes without
/// arguments.
#[must_use]
pub fn pseudo_class_state(name: &str) -> Option<StateFlags> {
    Some(match name.to_ascii_lowercase().as_str() {
        "active" => StateFlags::ACTIVE,
        "hover" => StateFlags::PRELIGHT,
        "selected" => StateFlags::SELECTED,
        "disabled" => StateFlags::INSENSITIVE,
        "indeterminate" => StateFlags::INCONSISTENT,
        "focus" => StateFlags::FOCUSED,
        "backdrop" => StateFlags::BACKDROP,
        "link" => StateFlags::LINK,
        "visited" => StateFlags::VISITED,
        "checked" => StateFlags::CHECKED,
        _ => return None,
    })
}

/// `:dir(ltr)`, `:dir(rtl)` and `:drop(active)`.
fn functional_pseudo_class_state(name: &str, argument: &str) -> Option<StateFlags> {
    match (
        name.to_ascii_lowercase().as_str(),
        argument.to_ascii_lowercase().as_str(),
    ) {
        ("dir", "ltr") => Some(StateFlags::DIR_LTR),
        ("dir", "rtl") => Some(StateFlags::DIR_RTL),
        ("drop", "active") => Some(StateFlags::DROP_ACTIVE),
        _ => None,
    }
}

/// Parse the tokens of one selector from a selector list.
///
/// [§ 4 Selector syntax](https://www.w3.org/TR/selectors-4/#syntax)
///
/// "The grammar of Selectors is defined in terms of CSS syntax."
///
/// # Errors
///
/// Returns a [`ParseError`] for unknown pseudo-classes, combinators other
/// than whitespace and `>`, or any other token.
pub fn parse_selector(tokens: &[CSSToken]) -> Result<ParsedSelector, ParseError> {
    let mut compounds: Vec<CompoundSelector> = Vec::new();
    let mut combinators_between: Vec<Combinator> = Vec::new();
    let mut current: Vec<SimpleSelector> = Vec::new();
    let mut pending: Option<Combinator> = None;

    let mut iter = tokens.iter().peekable();
    while let Some(token) = iter.next() {
        let simple = match token {
            CSSToken::EOF => break,
            CSSToken::Whitespace => {
                if !current.is_empty() {
                    compounds.push(CompoundSelector {
                        simple_selectors: core::mem::take(&mut current),
                    });
                    pending = Some(Combinator::Descendant);
                }
                continue;
            }

            // [§ 16.2 Child combinator](https://www.w3.org/TR/selectors-4/#child-combinators)
            CSSToken::Delim('>') => {
                if !current.is_empty() {
                    compounds.push(CompoundSelector {
                        simple_selectors: core::mem::take(&mut current),
                    });
                }
                if compounds.is_empty() || pending == Some(Combinator::Child) {
                    return Err(ParseError::invalid("'>' needs a selector on both sides"));
                }
                pending = Some(Combinator::Child);
                continue;
            }

            CSSToken::Ident(name) => SimpleSelector::Type(name.clone()),
            CSSToken::Delim('*') => SimpleSelector::Universal,
            CSSToken::Hash { value, .. } => SimpleSelector::Id(value.clone()),
            CSSToken::Delim('.') => match iter.next() {
                Some(CSSToken::Ident(class)) => SimpleSelector::Class(class.clone()),
                other => return Err(expected("a class name", other)),
            },
            CSSToken::Colon => match iter.next() {
                Some(CSSToken::Ident(name)) => SimpleSelector::State(
                    pseudo_class_state(name)
                        .ok_or_else(|| ParseError::invalid(format!("unknown pseudo-class ':{name}'")))?,
                ),
                Some(CSSToken::Function(name)) => {
                    let Some(CSSToken::Ident(argument)) = iter.next() else {
                        return Err(ParseError::invalid(format!("':{name}()' needs an argument")));
                    };
                    let close = iter.next();
                    if !matches!(close, Some(CSSToken::RightParen)) {
                        return Err(expected("')'", close));
                    }
                    SimpleSelector::State(functional_pseudo_class_state(name, argument).ok_or_else(
                        || ParseError::invalid(format!("unknown pseudo-class ':{name}({argument})'")),
                    )?)
                }
                other => return Err(expected("a pseudo-class", other)),
            },
            other => return Err(expected("a selector", Some(other))),
        };

        if current.is_empty() {
            if let Some(combinator) = pending.take() {
                combinators_between.push(combinator);
            }
        }
        current.push(simple);
    }

    if current.is_empty() {
        if pending == Some(Combinator::Child) || compounds.is_empty() {
            return Err(ParseError::invalid("selector is incomplete"));
        }
    } else {
        compounds.push(CompoundSelector {
            simple_selectors: current,
        });
    }

    // Reverse so the rightmost compound becomes the subject.
    let subject = compounds.pop().ok_or_else(|| ParseError::invalid("empty selector"))?;
    let combinators = combinators_between
        .into_iter()
        .rev()
        .zip(compounds.into_iter().rev())
        .collect();
    let complex = ComplexSelector {
        subject,
        combinators,
    };
    let specificity = complex.calculate_specificity();
    Ok(ParsedSelector {
        complex,
        specificity,
    })
}

fn expected(what: &str, found: Option<&CSSToken>) -> ParseError {
    ParseError::Expected {
        expected: what.to_string(),
        found: found.map_or_else(|| "<EOF>".to_string(), ToString::to_string),
    }
}

impl fmt::Display for SimpleSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Type(name) => f.write_str(name),
            Self::Class(class) => write!(f, ".{class}"),
            Self::Id(id) => write!(f, "#{id}"),
            Self::Universal => f.write_str("*"),
            Self::State(flags) => {
                for (name, flag) in flags.iter_names() {
                    let text = match flag {
                        StateFlags::PRELIGHT => "hover",
                        StateFlags::INSENSITIVE => "disabled",
                        StateFlags::INCONSISTENT => "indeterminate",
                        StateFlags::FOCUSED => "focus",
                        StateFlags::DIR_LTR => "dir(ltr)",
                        StateFlags::DIR_RTL => "dir(rtl)",
                        StateFlags::DROP_ACTIVE => "drop(active)",
                        _ => name,
                    };
                    write!(f, ":{}", text.to_ascii_lowercase())?;
                }
                Ok(())
            }
        }
    }
}

impl fmt::Display for CompoundSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.simple_selectors.iter().try_for_each(|s| s.fmt(f))
    }
}

impl fmt::Display for ParsedSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (combinator, compound) in self.complex.combinators.iter().rev() {
            let separator = match combinator {
                Combinator::Descendant => " ",
                Combinator::Child => " > ",
            };
            write!(f, "{compound}{separator}")?;
        }
        self.complex.subject.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::CSSTokenizer;

    fn parse(text: &str) -> ParsedSelector {
        parse_selector(&CSSTokenizer::tokenize(text)).unwrap()
    }

    #[test]
    fn test_specificity() {
        assert_eq!(parse("button").specificity, Specificity::new(0, 0, 1));
        assert_eq!(parse("button.flat:hover").specificity, Specificity::new(0, 2, 1));
        assert_eq!(parse("#ok button").specificity, Specificity::new(1, 0, 1));
        assert_eq!(parse("*").specificity, Specificity::new(0, 0, 0));
    }

    #[test]
    fn test_combinators_stored_right_to_left() {
        let selector = parse("window > box button");
        assert_eq!(selector.complex.combinators.len(), 2);
        assert_eq!(selector.complex.combinators[0].0, Combinator::Descendant);
        assert_eq!(selector.complex.combinators[1].0, Combinator::Child);
        assert_eq!(selector.to_string(), "window > box button");
    }

    #[test]
    fn test_matching() {
        let window = StyleNode::new("window");
        let button = StyleNode::with_parent("button", &window);
        let label = StyleNode::with_parent("label", &button);
        let _ = button.add_class("flat");
        button.set_state(StateFlags::PRELIGHT | StateFlags::DIR_LTR);

        assert!(parse("button.flat:hover").matches(&button));
        assert!(parse("button:dir(ltr)").matches(&button));
        assert!(!parse("button:active").matches(&button));
        assert!(parse("window label").matches(&label));
        assert!(parse("button > label").matches(&label));
        assert!(!parse("window > label").matches(&label));
    }

    #[test]
    fn test_rejects_unknown_pseudo_class() {
        assert!(parse_selector(&CSSTokenizer::tokenize("button:nth-child")).is_err());
        assert!(parse_selector(&CSSTokenizer::tokenize("> button")).is_err());
    }
}
