//! Shorthand properties.
//!
//! A shorthand parses into values for several longhands. Longhands the
//! declaration leaves out are reset to their initial values, as in
//! [CSS Cascade § 1.2](https://www.w3.org/TR/css-cascade-4/#shorthand):
//! "a shorthand property sets all of its longhand sub-properties, exactly
//! as if expanded in place."

use super::property::parse_iteration_count;
use super::PropertyId;
use crate::parser::{ParseError, ValueParser};
use crate::tokenizer::CSSToken;
use crate::values::dimension::{can_parse_number, parse_number};
use crate::values::enums::{
    AnimationDirection, Area, BorderStyle, FillMode, FontStretch, FontStyle, FontVariant, Keyword,
    PlayState, TextDecorationLine, TextDecorationStyle,
};
use crate::values::{
    BgSize, Color, Corner, Ease, Image, NumberFlags, Position, Repeat, StyleValue, ValueKind,
};

/// Parsed longhand values.
pub type Expansion = Vec<(PropertyId, StyleValue)>;

type ValueFn<'f> = &'f dyn Fn(&mut ValueParser<'_>) -> Result<StyleValue, ParseError>;

use PropertyId as P;

const MARGIN: [PropertyId; 4] = [P::MarginTop, P::MarginRight, P::MarginBottom, P::MarginLeft];
const PADDING: [PropertyId; 4] = [P::PaddingTop, P::PaddingRight, P::PaddingBottom, P::PaddingLeft];
const BORDER_WIDTH: [PropertyId; 4] = [
    P::BorderTopWidth,
    P::BorderRightWidth,
    P::BorderBottomWidth,
    P::BorderLeftWidth,
];
const BORDER_STYLE: [PropertyId; 4] = [
    P::BorderTopStyle,
    P::BorderRightStyle,
    P::BorderBottomStyle,
    P::BorderLeftStyle,
];
const BORDER_COLOR: [PropertyId; 4] = [
    P::BorderTopColor,
    P::BorderRightColor,
    P::BorderBottomColor,
    P::BorderLeftColor,
];
const BORDER_RADIUS: [PropertyId; 4] = [
    P::BorderTopLeftRadius,
    P::BorderTopRightRadius,
    P::BorderBottomRightRadius,
    P::BorderBottomLeftRadius,
];
const OUTLINE_RADIUS: [PropertyId; 4] = [
    P::OutlineTopLeftRadius,
    P::OutlineTopRightRadius,
    P::OutlineBottomRightRadius,
    P::OutlineBottomLeftRadius,
];
const BORDER_IMAGE: [PropertyId; 4] = [
    P::BorderImageSource,
    P::BorderImageSlice,
    P::BorderImageWidth,
    P::BorderImageRepeat,
];
const BORDER: [PropertyId; 16] = [
    P::BorderTopWidth,
    P::BorderRightWidth,
    P::BorderBottomWidth,
    P::BorderLeftWidth,
    P::BorderTopStyle,
    P::BorderRightStyle,
    P::BorderBottomStyle,
    P::BorderLeftStyle,
    P::BorderTopColor,
    P::BorderRightColor,
    P::BorderBottomColor,
    P::BorderLeftColor,
    P::BorderImageSource,
    P::BorderImageSlice,
    P::BorderImageWidth,
    P::BorderImageRepeat,
];
const BORDER_TOP: [PropertyId; 3] = [P::BorderTopWidth, P::BorderTopStyle, P::BorderTopColor];
const BORDER_RIGHT: [PropertyId; 3] = [P::BorderRightWidth, P::BorderRightStyle, P::BorderRightColor];
const BORDER_BOTTOM: [PropertyId; 3] = [P::BorderBottomWidth, P::BorderBottomStyle, P::BorderBottomColor];
const BORDER_LEFT: [PropertyId; 3] = [P::BorderLeftWidth, P::BorderLeftStyle, P::BorderLeftColor];
const OUTLINE: [PropertyId; 3] = [P::OutlineWidth, P::OutlineStyle, P::OutlineColor];
const BACKGROUND: [PropertyId; 7] = [
    P::BackgroundImage,
    P::BackgroundPosition,
    P::BackgroundSize,
    P::BackgroundRepeat,
    P::BackgroundOrigin,
    P::BackgroundClip,
    P::BackgroundColor,
];
const TRANSITION: [PropertyId; 4] = [
    P::TransitionProperty,
    P::TransitionDuration,
    P::TransitionTimingFunction,
    P::TransitionDelay,
];
const ANIMATION: [PropertyId; 8] = [
    P::AnimationName,
    P::AnimationDuration,
    P::AnimationTimingFunction,
    P::AnimationDelay,
    P::AnimationIterationCount,
    P::AnimationDirection,
    P::AnimationPlayState,
    P::AnimationFillMode,
];
const TEXT_DECORATION: [PropertyId; 3] = [
    P::TextDecorationLine,
    P::TextDecorationStyle,
    P::TextDecorationColor,
];
const FONT: [PropertyId; 6] = [
    P::FontStyle,
    P::FontVariant,
    P::FontWeight,
    P::FontStretch,
    P::FontSize,
    P::FontFamily,
];

/// The longhands a shorthand sets, or `None` if `name` is not a shorthand.
#[must_use]
pub fn longhands(name: &str) -> Option<&'static [PropertyId]> {
    Some(match name.to_ascii_lowercase().as_str() {
        "margin" => &MARGIN,
        "padding" => &PADDING,
        "border-width" => &BORDER_WIDTH,
        "border-style" => &BORDER_STYLE,
        "border-color" => &BORDER_COLOR,
        "border-radius" => &BORDER_RADIUS,
        "-glaze-outline-radius" => &OUTLINE_RADIUS,
        "border-top" => &BORDER_TOP,
        "border-right" => &BORDER_RIGHT,
        "border-bottom" => &BORDER_BOTTOM,
        "border-left" => &BORDER_LEFT,
        "border" => &BORDER,
        "outline" => &OUTLINE,
        "background" => &BACKGROUND,
        "border-image" => &BORDER_IMAGE,
        "transition" => &TRANSITION,
        "animation" => &ANIMATION,
        "text-decoration" => &TEXT_DECORATION,
        "font" => &FONT,
        _ => return None,
    })
}

/// Parse a shorthand value. Returns `None` when `name` is not a shorthand.
/// The caller checks that all input was consumed.
pub fn parse(name: &str, parser: &mut ValueParser<'_>) -> Option<Result<Expansion, ParseError>> {
    let result = match name.to_ascii_lowercase().as_str() {
        "margin" => parse_box(parser, MARGIN),
        "padding" => parse_box(parser, PADDING),
        "border-width" => parse_box(parser, BORDER_WIDTH),
        "border-style" => parse_box(parser, BORDER_STYLE),
        "border-color" => parse_box(parser, BORDER_COLOR),
        "border-radius" => parse_radius(parser, BORDER_RADIUS),
        "-glaze-outline-radius" => parse_radius(parser, OUTLINE_RADIUS),
        "border-top" => parse_border_side(parser, BORDER_TOP),
        "border-right" => parse_border_side(parser, BORDER_RIGHT),
        "border-bottom" => parse_border_side(parser, BORDER_BOTTOM),
        "border-left" => parse_border_side(parser, BORDER_LEFT),
        "border" => parse_border(parser),
        "outline" => parse_border_side(parser, OUTLINE),
        "background" => parse_background(parser),
        "border-image" => parse_border_image(parser),
        "transition" => parse_list_shorthand(parser, &TRANSITION, parse_single_transition),
        "animation" => parse_list_shorthand(parser, &ANIMATION, parse_single_animation),
        "text-decoration" => parse_text_decoration(parser),
        "font" => parse_font(parser),
        _ => return None,
    };
    Some(result)
}

/// Expand one to four values clockwise from the top.
///
/// [CSS Backgrounds § 4.3](https://www.w3.org/TR/css-backgrounds-3/#border-color)
/// "If there is only one component value, it applies to all sides. If
/// there are two values, the top and bottom are set to the first value
/// and right and left are set to the second. If there are three values,
/// the top is set to the first value, the left and right are set to the
/// second, and the bottom is set to the third."
fn expand_box<T: Clone>(values: &[T]) -> Option<[T; 4]> {
    Some(match values {
        [all] => [all.clone(), all.clone(), all.clone(), all.clone()],
        [vertical, horizontal] => [
            vertical.clone(),
            horizontal.clone(),
            vertical.clone(),
            horizontal.clone(),
        ],
        [top, horizontal, bottom] => [top.clone(), horizontal.clone(), bottom.clone(), horizontal.clone()],
        [top, right, bottom, left] => [top.clone(), right.clone(), bottom.clone(), left.clone()],
        _ => return None,
    })
}

fn parse_box(parser: &mut ValueParser<'_>, properties: [PropertyId; 4]) -> Result<Expansion, ParseError> {
    let mut values = vec![properties[0].parse_value(parser)?];
    while values.len() < 4 && !parser.is_done() {
        values.push(properties[0].parse_value(parser)?);
    }
    let expanded = expand_box(&values).ok_or_else(|| ParseError::invalid("too many values"))?;
    Ok(properties.into_iter().zip(expanded).collect())
}

/// `border-radius: <h>{1,4} [ / <v>{1,4} ]?`, clockwise from the top left.
fn parse_radius(parser: &mut ValueParser<'_>, properties: [PropertyId; 4]) -> Result<Expansion, ParseError> {
    fn parse_radii(parser: &mut ValueParser<'_>) -> Result<Vec<StyleValue>, ParseError> {
        let flags = crate::values::corner::radius_flags();
        let mut radii = vec![parse_number(parser, flags)?];
        while radii.len() < 4 && can_parse_number(parser) {
            radii.push(parse_number(parser, flags)?);
        }
        Ok(radii)
    }

    let horizontal = parse_radii(parser)?;
    let vertical = if parser.try_delim('/') {
        parse_radii(parser)?
    } else {
        horizontal.clone()
    };
    let horizontal = expand_box(&horizontal).ok_or_else(|| ParseError::invalid("too many radii"))?;
    let vertical = expand_box(&vertical).ok_or_else(|| ParseError::invalid("too many radii"))?;
    Ok(properties
        .into_iter()
        .zip(horizontal.into_iter().zip(vertical))
        .map(|(property, (x, y))| (property, Corner::new_value(x, y)))
        .collect())
}

/// Parse up to one value per slot in any order, stopping at the end of the
/// value. Fails if nothing matched or a component fits no free slot.
fn parse_any_order<const N: usize>(
    parser: &mut ValueParser<'_>,
    parsers: [ValueFn<'_>; N],
) -> Result<[Option<StyleValue>; N], ParseError> {
    let mut found: [Option<StyleValue>; N] = core::array::from_fn(|_| None);
    while !parser.is_done() {
        let mut matched = false;
        for (slot, parse) in found.iter_mut().zip(parsers) {
            if slot.is_some() {
                continue;
            }
            let checkpoint = parser.checkpoint();
            if let Ok(value) = parse(parser) {
                *slot = Some(value);
                matched = true;
                break;
            }
            parser.rewind(checkpoint);
        }
        if !matched {
            return Err(parser.expected("a value"));
        }
    }
    if found.iter().all(Option::is_none) {
        return Err(parser.expected("a value"));
    }
    Ok(found)
}

/// Pair each longhand with its parsed value or initial value.
fn fill_initial<const N: usize>(properties: [PropertyId; N], found: [Option<StyleValue>; N]) -> Expansion {
    properties
        .into_iter()
        .zip(found)
        .map(|(property, value)| (property, value.unwrap_or_else(|| property.initial_value())))
        .collect()
}

/// `<width> || <style> || <color>` for one border side or the outline.
fn parse_border_side(parser: &mut ValueParser<'_>, properties: [PropertyId; 3]) -> Result<Expansion, ParseError> {
    let [width, style, color] = properties;
    let found = parse_any_order(
        parser,
        [
            &|p| width.parse_value(p),
            &BorderStyle::parse_value,
            &Color::parse_value,
        ],
    )?;
    Ok(fill_initial(properties, found))
}

/// `border` sets all four sides alike and resets the border image.
fn parse_border(parser: &mut ValueParser<'_>) -> Result<Expansion, ParseError> {
    let side = parse_border_side(parser, BORDER_TOP)?;
    let mut expansion = Expansion::with_capacity(BORDER.len());
    for (i, (_, value)) in side.into_iter().enumerate() {
        let group = [BORDER_WIDTH, BORDER_STYLE, BORDER_COLOR][i];
        expansion.extend(group.into_iter().map(|p| (p, value.clone())));
    }
    expansion.extend(BORDER_IMAGE.into_iter().map(|p| (p, p.initial_value())));
    Ok(expansion)
}

/// `<source> || <slice> [ / <width> ]? || <repeat>`
fn parse_border_image(parser: &mut ValueParser<'_>) -> Result<Expansion, ParseError> {
    let mut source = None;
    let mut slice = None;
    let mut width = None;
    let mut repeat = None;
    while !parser.is_done() {
        if slice.is_none() && can_parse_number(parser) {
            slice = Some(P::BorderImageSlice.parse_value(parser)?);
            if parser.try_delim('/') {
                width = Some(P::BorderImageWidth.parse_value(parser)?);
            }
            continue;
        }
        let checkpoint = parser.checkpoint();
        if repeat.is_none() {
            if let Ok(value) = Repeat::parse_border_image(parser) {
                repeat = Some(value);
                continue;
            }
            parser.rewind(checkpoint);
        }
        if source.is_none() {
            source = Some(Image::parse(parser)?);
            continue;
        }
        return Err(parser.expected("a border image component"));
    }
    if source.is_none() && slice.is_none() && repeat.is_none() {
        return Err(parser.expected("a border image"));
    }
    Ok(fill_initial(BORDER_IMAGE, [source, slice, width, repeat]))
}

/// [CSS Backgrounds § 3.10](https://www.w3.org/TR/css-backgrounds-3/#background)
///
/// "`<bg-layer> = <bg-image> || <bg-position> [ / <bg-size> ]? ||
/// <repeat-style> || <attachment> || <box> || <box>`", with a color
/// allowed in the final layer only.
fn parse_background(parser: &mut ValueParser<'_>) -> Result<Expansion, ParseError> {
    #[derive(Default)]
    struct Layer {
        image: Option<StyleValue>,
        position: Option<StyleValue>,
        size: Option<StyleValue>,
        repeat: Option<StyleValue>,
        boxes: Vec<StyleValue>,
    }

    let mut layers: Vec<Layer> = Vec::new();
    let mut color = None;
    loop {
        let mut layer = Layer::default();
        while !parser.is_done() {
            let checkpoint = parser.checkpoint();
            if layer.image.is_none() {
                if let Ok(image) = Image::parse(parser) {
                    layer.image = Some(image);
                    continue;
                }
                parser.rewind(checkpoint);
            }
            if layer.position.is_none() {
                if let Ok(position) = Position::parse(parser) {
                    layer.position = Some(position);
                    if parser.try_delim('/') {
                        layer.size = Some(BgSize::parse(parser)?);
                    }
                    continue;
                }
                parser.rewind(checkpoint);
            }
            if layer.repeat.is_none() {
                if let Ok(repeat) = Repeat::parse_background(parser) {
                    layer.repeat = Some(repeat);
                    continue;
                }
                parser.rewind(checkpoint);
            }
            if layer.boxes.len() < 2 {
                if let Ok(area) = Area::parse_value(parser) {
                    layer.boxes.push(area);
                    continue;
                }
                parser.rewind(checkpoint);
            }
            if color.is_none() {
                if let Ok(value) = Color::parse_value(parser) {
                    color = Some(value);
                    continue;
                }
                parser.rewind(checkpoint);
            }
            return Err(parser.expected("a background component"));
        }
        layers.push(layer);
        if !parser.try_comma() {
            break;
        }
        if color.is_some() {
            return Err(ParseError::invalid("only the last background layer may have a color"));
        }
    }

    let collect = |property: PropertyId, pick: &dyn Fn(&Layer) -> Option<StyleValue>| {
        let values: Vec<StyleValue> = layers
            .iter()
            .map(|layer| pick(layer).unwrap_or_else(|| property.initial_value()))
            .collect();
        let value = match <[StyleValue; 1]>::try_from(values) {
            Ok([single]) => single,
            Err(values) => StyleValue::array(values),
        };
        (property, value)
    };
    Ok(vec![
        collect(P::BackgroundImage, &|l| l.image.clone()),
        collect(P::BackgroundPosition, &|l| l.position.clone()),
        collect(P::BackgroundSize, &|l| l.size.clone()),
        collect(P::BackgroundRepeat, &|l| l.repeat.clone()),
        // "If one <box> value is present then it sets both
        // background-origin and background-clip to that value. If two
        // values are present, then the first sets background-origin and
        // the second background-clip."
        collect(P::BackgroundOrigin, &|l| l.boxes.first().cloned()),
        collect(P::BackgroundClip, &|l| l.boxes.last().cloned()),
        (
            P::BackgroundColor,
            color.unwrap_or_else(|| P::BackgroundColor.initial_value()),
        ),
    ])
}

/// Split comma separated items into one list per longhand.
fn parse_list_shorthand<const N: usize>(
    parser: &mut ValueParser<'_>,
    properties: &[PropertyId; N],
    parse_one: fn(&mut ValueParser<'_>) -> Result<[Option<StyleValue>; N], ParseError>,
) -> Result<Expansion, ParseError> {
    let mut columns: [Vec<StyleValue>; N] = core::array::from_fn(|_| Vec::new());
    loop {
        let item = parse_one(parser)?;
        for ((column, value), property) in columns.iter_mut().zip(item).zip(properties) {
            column.push(value.unwrap_or_else(|| property.initial_value()));
        }
        if !parser.try_comma() {
            break;
        }
    }
    Ok(properties
        .iter()
        .zip(columns)
        .map(|(property, mut column)| {
            let value = if column.len() == 1 {
                column.swap_remove(0)
            } else {
                StyleValue::array(column)
            };
            (*property, value)
        })
        .collect())
}

fn parse_time(parser: &mut ValueParser<'_>) -> Result<StyleValue, ParseError> {
    parse_number(parser, NumberFlags::PARSE_TIME)
}

fn is_time(parser: &mut ValueParser<'_>) -> bool {
    match parser.peek() {
        CSSToken::Dimension { unit, .. } => unit.eq_ignore_ascii_case("s") || unit.eq_ignore_ascii_case("ms"),
        _ => parser.begins_with_function("calc"),
    }
}

/// `<property> || <duration> || <timing-function> || <delay>`; the first
/// time is the duration, the second the delay.
fn parse_single_transition(parser: &mut ValueParser<'_>) -> Result<[Option<StyleValue>; 4], ParseError> {
    let mut item: [Option<StyleValue>; 4] = Default::default();
    while !parser.is_done() {
        if is_time(parser) {
            let slot = if item[1].is_none() { 1 } else { 3 };
            if item[slot].is_some() {
                return Err(ParseError::invalid("too many times in transition"));
            }
            item[slot] = Some(parse_time(parser)?);
            continue;
        }
        let checkpoint = parser.checkpoint();
        if item[2].is_none() {
            if let Ok(ease) = Ease::parse_value(parser) {
                item[2] = Some(ease);
                continue;
            }
            parser.rewind(checkpoint);
        }
        if item[0].is_none() {
            item[0] = Some(StyleValue::ident(parser.expect_ident()?));
            continue;
        }
        return Err(parser.expected("a transition component"));
    }
    Ok(item)
}

/// One `animation` item. Slots follow [`ANIMATION`].
fn parse_single_animation(parser: &mut ValueParser<'_>) -> Result<[Option<StyleValue>; 8], ParseError> {
    let mut item: [Option<StyleValue>; 8] = Default::default();
    while !parser.is_done() {
        if is_time(parser) {
            let slot = if item[1].is_none() { 1 } else { 3 };
            if item[slot].is_some() {
                return Err(ParseError::invalid("too many times in animation"));
            }
            item[slot] = Some(parse_time(parser)?);
            continue;
        }
        if item[4].is_none() && (matches!(parser.peek(), CSSToken::Number { .. }) || parser.peek().is_ident("infinite")) {
            item[4] = Some(parse_iteration_count(parser)?);
            continue;
        }
        let keyword_slots: [(usize, ValueFn<'_>); 4] = [
            (5, &AnimationDirection::parse_value),
            (6, &PlayState::parse_value),
            (7, &FillMode::parse_value),
            (2, &Ease::parse_value),
        ];
        let mut matched = false;
        for (slot, parse) in keyword_slots {
            if item[slot].is_some() {
                continue;
            }
            let checkpoint = parser.checkpoint();
            if let Ok(value) = parse(parser) {
                item[slot] = Some(value);
                matched = true;
                break;
            }
            parser.rewind(checkpoint);
        }
        if matched {
            continue;
        }
        if item[0].is_none() {
            item[0] = Some(StyleValue::ident(parser.expect_ident()?));
            continue;
        }
        return Err(parser.expected("an animation component"));
    }
    Ok(item)
}

/// `<line> || <style> || <color>`
fn parse_text_decoration(parser: &mut ValueParser<'_>) -> Result<Expansion, ParseError> {
    let found = parse_any_order(
        parser,
        [
            &TextDecorationLine::parse_value,
            &TextDecorationStyle::parse_value,
            &Color::parse_value,
        ],
    )?;
    Ok(fill_initial(TEXT_DECORATION, found))
}

/// `[ <style> || <variant> || <weight> || <stretch> ]? <size> [ / <line-height> ]? <family>`
///
/// There is no `line-height` property; a given one is parsed and dropped.
fn parse_font(parser: &mut ValueParser<'_>) -> Result<Expansion, ParseError> {
    let mut prefix: [Option<StyleValue>; 4] = Default::default();
    loop {
        if parser.try_ident("normal") {
            continue;
        }
        // A plain number is a weight only when a size follows it.
        if prefix[2].is_none()
            && matches!(parser.peek(), CSSToken::Number { .. })
            && matches!(
                parser.peek_nth(1),
                CSSToken::Number { .. } | CSSToken::Dimension { .. } | CSSToken::Percentage(_)
            )
        {
            prefix[2] = Some(P::FontWeight.parse_value(parser)?);
            continue;
        }
        let parsers: [(usize, ValueFn<'_>); 4] = [
            (0, &FontStyle::parse_value),
            (1, &FontVariant::parse_value),
            (3, &FontStretch::parse_value),
            (2, &|p| {
                if matches!(p.peek(), CSSToken::Ident(_)) {
                    P::FontWeight.parse_value(p)
                } else {
                    Err(p.expected("a font weight"))
                }
            }),
        ];
        let mut matched = false;
        for (slot, parse) in parsers {
            if prefix[slot].is_some() {
                continue;
            }
            let checkpoint = parser.checkpoint();
            if let Ok(value) = parse(parser) {
                prefix[slot] = Some(value);
                matched = true;
                break;
            }
            parser.rewind(checkpoint);
        }
        if !matched {
            break;
        }
    }

    let size = P::FontSize.parse_value(parser)?;
    if parser.try_delim('/') {
        let _line_height = parse_number(
            parser,
            NumberFlags::PARSE_NUMBER | NumberFlags::PARSE_LENGTH | NumberFlags::PARSE_PERCENT,
        )?;
    }
    let family = P::FontFamily.parse_value(parser)?;

    let [style, variant, weight, stretch] = prefix;
    Ok(fill_initial(
        FONT,
        [style, variant, weight, stretch, Some(size), Some(family)],
    ))
}

/// Expand a CSS-wide keyword (`inherit`, `initial`, `unset`) over every
/// longhand of a shorthand.
#[must_use]
pub fn expand_keyword(properties: &[PropertyId], keyword: &StyleValue) -> Expansion {
    debug_assert!(matches!(
        keyword.kind(),
        ValueKind::Inherit | ValueKind::Initial | ValueKind::Unset
    ));
    properties.iter().map(|p| (*p, keyword.clone())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_text;

    fn expand(name: &str, text: &str) -> Expansion {
        parse_text(text, |p| parse(name, p).unwrap()).unwrap()
    }

    fn get(expansion: &Expansion, property: PropertyId) -> String {
        expansion
            .iter()
            .find(|(p, _)| *p == property)
            .map(|(_, v)| v.to_string())
            .unwrap()
    }

    #[test]
    fn test_margin_expands_clockwise() {
        let e = expand("margin", "1px 2px 3px");
        assert_eq!(get(&e, P::MarginTop), "1px");
        assert_eq!(get(&e, P::MarginRight), "2px");
        assert_eq!(get(&e, P::MarginBottom), "3px");
        assert_eq!(get(&e, P::MarginLeft), "2px");
    }

    #[test]
    fn test_border_any_order() {
        let e = expand("border", "solid #000 2px");
        assert_eq!(e.len(), 16);
        assert_eq!(get(&e, P::BorderLeftWidth), "2px");
        assert_eq!(get(&e, P::BorderBottomStyle), "solid");
        assert_eq!(get(&e, P::BorderImageSource), "none");
    }

    #[test]
    fn test_border_radius_with_slash() {
        let e = expand("border-radius", "4px 8px / 2px");
        assert_eq!(get(&e, P::BorderTopLeftRadius), "4px 2px");
        assert_eq!(get(&e, P::BorderTopRightRadius), "8px 2px");
    }

    #[test]
    fn test_transition_list() {
        let e = expand("transition", "color 200ms linear, background-color 1s 0.5s");
        assert_eq!(get(&e, P::TransitionProperty), "color, background-color");
        assert_eq!(get(&e, P::TransitionDuration), "200ms, 1s");
        assert_eq!(get(&e, P::TransitionDelay), "0, 0.5s");
    }

    #[test]
    fn test_background_layers() {
        let e = expand("background", "none, none red");
        assert_eq!(get(&e, P::BackgroundImage), "none, none");
        assert_eq!(get(&e, P::BackgroundColor), "rgba(255,0,0,1)");
        assert!(parse_text("red, none", |p| parse("background", p).unwrap()).is_err());
    }

    #[test]
    fn test_font() {
        let e = expand("font", "italic bold 12px \"Cantarell\", sans-serif");
        assert_eq!(get(&e, P::FontStyle), "italic");
        assert_eq!(get(&e, P::FontWeight), "700");
        assert_eq!(get(&e, P::FontSize), "12px");
        assert_eq!(get(&e, P::FontVariant), "normal");
    }
}
