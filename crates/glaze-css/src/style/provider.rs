//! Style providers: where specified values come from.
//!
//! [`CssProvider`] holds a parsed theme: style rules with their selectors,
//! `@define-color` names and platform colors. Anything else that can answer
//! [`StyleProvider`] can stand in for it, such as a fixed table in tests.

use std::cell::RefCell;
use std::collections::{BTreeSet, HashMap};
use std::rc::Rc;

use glaze_common::warning::warn_once;

use super::node::StyleNode;
use super::shorthand::{self, Expansion};
use super::PropertyId;
use crate::paint::surface::Surface;
use crate::parser::{AtRule, CSSParser, Declaration, ParseError, Rule, StyleRule, ValueParser};
use crate::selector::{ParsedSelector, Specificity, parse_selector};
use crate::values::{Color, Rgba, StyleValue};

/// Specified values for one node: at most one per property.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpecifiedStyle {
    values: Vec<Option<StyleValue>>,
}

impl SpecifiedStyle {
    /// The specified value of `property`, if any.
    #[must_use]
    pub fn get(&self, property: PropertyId) -> Option<&StyleValue> {
        self.values.get(property as usize).and_then(Option::as_ref)
    }

    /// Set `property`, replacing an earlier value.
    pub fn set(&mut self, property: PropertyId, value: StyleValue) {
        if self.values.is_empty() {
            self.values.resize(PropertyId::COUNT, None);
        }
        self.values[property as usize] = Some(value);
    }

    /// Whether nothing is specified.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.iter().all(Option::is_none)
    }

    /// The specified properties in id order.
    pub fn iter(&self) -> impl Iterator<Item = (PropertyId, &StyleValue)> {
        PropertyId::all()
            .zip(self.values.iter())
            .filter_map(|(p, v)| v.as_ref().map(|v| (p, v)))
    }
}

impl FromIterator<(PropertyId, StyleValue)> for SpecifiedStyle {
    fn from_iter<I: IntoIterator<Item = (PropertyId, StyleValue)>>(iter: I) -> Self {
        let mut style = Self::default();
        for (property, value) in iter {
            style.set(property, value);
        }
        style
    }
}

/// The source of specified values, named colors and images.
pub trait StyleProvider {
    /// The cascaded values for `node`.
    fn lookup(&self, node: &StyleNode) -> SpecifiedStyle;

    /// The cascaded value of one property.
    fn lookup_property(&self, node: &StyleNode, property: PropertyId) -> Option<StyleValue> {
        self.lookup(node).get(property).cloned()
    }

    /// The value of `@name`, as specified.
    fn lookup_named_color(&self, name: &str) -> Option<StyleValue>;

    /// A color supplied by the host platform for `class` and `id`.
    fn lookup_platform_color(&self, _class: &str, _id: &str) -> Option<StyleValue> {
        None
    }

    /// The image at `url`, or `None` if it cannot be loaded.
    fn load_image(&self, _url: &str) -> Option<Rc<Surface>> {
        None
    }

    /// Bumped whenever anything above would answer differently.
    fn generation(&self) -> u64;
}

/// Turns image URLs into surfaces.
pub trait ImageLoader {
    /// Load the image at `url`.
    fn load(&self, url: &str) -> Option<Surface>;
}

/// One selector of a style rule, ready for matching.
#[derive(Debug)]
struct CompiledRule {
    selector: ParsedSelector,
    order: usize,
    declarations: Rc<[(PropertyId, StyleValue)]>,
}

/// A provider backed by a CSS theme.
#[derive(Default)]
pub struct CssProvider {
    rules: Vec<CompiledRule>,
    named_colors: HashMap<String, StyleValue>,
    keyframes: BTreeSet<String>,
    platform_colors: HashMap<(String, String), StyleValue>,
    image_loader: Option<Box<dyn ImageLoader>>,
    images: RefCell<HashMap<String, Option<Rc<Surface>>>>,
    generation: u64,
}

impl core::fmt::Debug for CssProvider {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CssProvider")
            .field("rules", &self.rules.len())
            .field("named_colors", &self.named_colors.len())
            .field("generation", &self.generation)
            .finish_non_exhaustive()
    }
}

impl CssProvider {
    /// An empty provider.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A provider loaded from `css`.
    #[must_use]
    pub fn from_data(css: &str) -> Self {
        let mut provider = Self::new();
        provider.load_from_data(css);
        provider
    }

    /// Replace the theme with `css`.
    ///
    /// Problems are reported through [`warn_once`] and skipped: an unknown
    /// property or bad value drops that declaration, a bad selector drops
    /// that selector.
    pub fn load_from_data(&mut self, css: &str) {
        self.rules.clear();
        self.named_colors.clear();
        self.keyframes.clear();
        self.images.borrow_mut().clear();

        let stylesheet = CSSParser::parse_source(css);
        let mut order = 0;
        for rule in &stylesheet.rules {
            match rule {
                Rule::Style(style_rule) => {
                    self.add_style_rule(style_rule, order);
                    order += 1;
                }
                Rule::At(at_rule) => self.add_at_rule(at_rule),
            }
        }
        self.generation += 1;
    }

    fn add_style_rule(&mut self, rule: &StyleRule, order: usize) {
        let mut declarations = Expansion::new();
        for declaration in &rule.declarations {
            match compile_declaration(declaration) {
                Ok(expansion) => declarations.extend(expansion),
                Err(err) => warn_once("CSS", &format!("{}: {err}", declaration.name)),
            }
        }
        let declarations: Rc<[(PropertyId, StyleValue)]> = declarations.into();
        for tokens in &rule.selectors {
            match parse_selector(tokens) {
                Ok(selector) => self.rules.push(CompiledRule {
                    selector,
                    order,
                    declarations: Rc::clone(&declarations),
                }),
                Err(err) => warn_once("CSS", &format!("bad selector: {err}")),
            }
        }
    }

    fn add_at_rule(&mut self, rule: &AtRule) {
        match rule.name.to_ascii_lowercase().as_str() {
            "define-color" => {
                let mut parser = ValueParser::new(&rule.prelude);
                let parsed = parser.expect_ident().and_then(|name| {
                    let color = Color::parse_value(&mut parser)?;
                    parser.expect_end()?;
                    Ok((name.to_string(), color))
                });
                match parsed {
                    Ok((name, color)) => {
                        let _ = self.named_colors.insert(name, color);
                    }
                    Err(err) => warn_once("CSS", &format!("@define-color: {err}")),
                }
            }
            "keyframes" => {
                let mut parser = ValueParser::new(&rule.prelude);
                match parser.expect_ident() {
                    Ok(name) => {
                        let _ = self.keyframes.insert(name.to_string());
                    }
                    Err(err) => warn_once("CSS", &format!("@keyframes: {err}")),
                }
            }
            name => warn_once("CSS", &format!("unknown at-rule '@{name}'")),
        }
    }

    /// Define or replace `@name` outside of any stylesheet.
    pub fn set_named_color(&mut self, name: &str, color: StyleValue) {
        let _ = self.named_colors.insert(name.to_string(), color);
        self.generation += 1;
    }

    /// Supply the platform color `-glaze-platform-color(class, id)`.
    pub fn set_platform_color(&mut self, class: &str, id: &str, color: Rgba) {
        let _ = self
            .platform_colors
            .insert((class.to_string(), id.to_string()), StyleValue::rgba(color));
        self.generation += 1;
    }

    /// Use `loader` for `url()` images. Drops already loaded images.
    pub fn set_image_loader(&mut self, loader: Box<dyn ImageLoader>) {
        self.image_loader = Some(loader);
        self.images.borrow_mut().clear();
        self.generation += 1;
    }

    /// Names declared with `@keyframes`, sorted.
    pub fn keyframes(&self) -> impl Iterator<Item = &str> {
        self.keyframes.iter().map(String::as_str)
    }

    /// Number of compiled rules; a rule with a selector list counts once
    /// per selector.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }
}

impl StyleProvider for CssProvider {
    /// [§ 6 Cascading](https://www.w3.org/TR/css-cascade-4/#cascading)
    ///
    /// "Declarations from style rules with more specific selectors override
    /// those with less specific selectors... the last declaration in
    /// document order wins."
    ///
    /// `!important` is parsed but carries no weight: a theme is a single
    /// origin.
    fn lookup(&self, node: &StyleNode) -> SpecifiedStyle {
        let mut matched: Vec<(Specificity, usize, &[(PropertyId, StyleValue)])> = self
            .rules
            .iter()
            .filter(|rule| rule.selector.matches(node))
            .map(|rule| (rule.selector.specificity, rule.order, &*rule.declarations))
            .collect();
        matched.sort_by_key(|(specificity, order, _)| (*specificity, *order));

        let mut style = SpecifiedStyle::default();
        for (_, _, declarations) in matched {
            for (property, value) in declarations {
                style.set(*property, value.clone());
            }
        }
        style
    }

    fn lookup_named_color(&self, name: &str) -> Option<StyleValue> {
        self.named_colors.get(name).cloned()
    }

    fn lookup_platform_color(&self, class: &str, id: &str) -> Option<StyleValue> {
        self.platform_colors
            .get(&(class.to_string(), id.to_string()))
            .cloned()
    }

    fn load_image(&self, url: &str) -> Option<Rc<Surface>> {
        if let Some(cached) = self.images.borrow().get(url) {
            return cached.clone();
        }
        let surface = self
            .image_loader
            .as_ref()
            .and_then(|loader| loader.load(url))
            .map(Rc::new);
        let _ = self
            .images
            .borrow_mut()
            .insert(url.to_string(), surface.clone());
        surface
    }

    fn generation(&self) -> u64 {
        self.generation
    }
}

/// Parse one declaration into longhand values.
///
/// CSS-wide keywords are recognized before the property grammar runs and
/// apply to every longhand of a shorthand.
fn compile_declaration(declaration: &Declaration) -> Result<Expansion, ParseError> {
    let name = declaration.name.as_str();
    let mut parser = ValueParser::new(&declaration.value);

    let keyword = if parser.try_ident("inherit") {
        Some(StyleValue::inherit())
    } else if parser.try_ident("initial") {
        Some(StyleValue::initial())
    } else if parser.try_ident("unset") {
        Some(StyleValue::unset())
    } else {
        None
    };
    if let Some(keyword) = keyword {
        parser.expect_end()?;
        if let Some(longhands) = shorthand::longhands(name) {
            return Ok(shorthand::expand_keyword(longhands, &keyword));
        }
        let property = PropertyId::from_name(name).ok_or_else(|| ParseError::UnknownProperty(name.to_string()))?;
        return Ok(vec![(property, keyword)]);
    }

    if let Some(result) = shorthand::parse(name, &mut parser) {
        let expansion = result?;
        parser.expect_end()?;
        return Ok(expansion);
    }
    let property = PropertyId::from_name(name).ok_or_else(|| ParseError::UnknownProperty(name.to_string()))?;
    let value = property.parse_value(&mut parser)?;
    parser.expect_end()?;
    Ok(vec![(property, value)])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::StateFlags;

    #[test]
    fn test_specificity_then_order() {
        let provider = CssProvider::from_data(
            "button.flat { color: blue; }
             button { color: red; background-color: green; }
             .flat { background-color: yellow; }",
        );
        let node = StyleNode::new("button");
        let _ = node.add_class("flat");
        let style = provider.lookup(&node);
        assert_eq!(style.get(PropertyId::Color).unwrap().to_string(), "rgba(0,0,255,1)");
        assert_eq!(
            style.get(PropertyId::BackgroundColor).unwrap().to_string(),
            "rgba(255,255,0,1)"
        );
    }

    #[test]
    fn test_state_rules() {
        let provider = CssProvider::from_data("button:hover { opacity: 0.5; }");
        let node = StyleNode::new("button");
        assert!(provider.lookup(&node).is_empty());
        node.set_state(StateFlags::PRELIGHT);
        assert!(provider.lookup(&node).get(PropertyId::Opacity).is_some());
    }

    #[test]
    fn test_define_color_and_keyframes() {
        let provider = CssProvider::from_data(
            "@define-color bg #102030; @keyframes spin { from { opacity: 0; } }",
        );
        assert!(provider.lookup_named_color("bg").is_some());
        assert!(provider.lookup_named_color("fg").is_none());
        assert_eq!(provider.keyframes().collect::<Vec<_>>(), ["spin"]);
    }

    #[test]
    fn test_bad_declarations_are_dropped() {
        let provider = CssProvider::from_data(
            "label { frobnicate: 1; color: 12px; opacity: 0.25; }",
        );
        let style = provider.lookup(&StyleNode::new("label"));
        assert!(style.get(PropertyId::Color).is_none());
        assert!(style.get(PropertyId::Opacity).is_some());
    }

    #[test]
    fn test_shorthand_keyword() {
        let provider = CssProvider::from_data("* { margin: inherit; }");
        let style = provider.lookup(&StyleNode::new("box"));
        assert_eq!(style.iter().count(), 4);
        assert!(style.get(PropertyId::MarginLeft).unwrap().is_css_wide_keyword());
    }

    #[test]
    fn test_generation_bumps() {
        let mut provider = CssProvider::new();
        let before = provider.generation();
        provider.load_from_data("");
        provider.set_platform_color("theme", "accent", Rgba::WHITE);
        assert_eq!(provider.generation(), before + 2);
    }
}
