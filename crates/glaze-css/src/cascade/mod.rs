//! Style resolution for nodes, with caching and transitions.
//!
//! [CSS Cascading and Inheritance Level 4](https://www.w3.org/TR/css-cascade-4/)
//! decides the specified values; the [`Resolver`] turns them into computed
//! styles, remembers the result per node and animates changes per
//! [CSS Transitions](https://drafts.csswg.org/css-transitions-1/).

use std::collections::HashMap;
use std::rc::{Rc, Weak};

use glaze_common::Settings;

use crate::animation::{Clock, SystemClock, TransitionRecord};
use crate::paint::shadow::CornerMaskCache;
use crate::style::{ComputedStyle, CssProvider, PropertyId, StateFlags, StyleNode, StyleProvider};
use crate::values::{Ease, StyleValue};

/// Everything a cached style depends on besides the node's identity.
#[derive(Debug)]
struct CacheKey {
    state: StateFlags,
    class_digest: u64,
    node_generation: u64,
    provider_generation: u64,
    settings_generation: u64,
    parent: Option<Rc<ComputedStyle>>,
}

impl CacheKey {
    fn matches(&self, other: &Self) -> bool {
        self.state == other.state
            && self.class_digest == other.class_digest
            && self.node_generation == other.node_generation
            && self.provider_generation == other.provider_generation
            && self.settings_generation == other.settings_generation
            && match (&self.parent, &other.parent) {
                (Some(a), Some(b)) => Rc::ptr_eq(a, b),
                (None, None) => true,
                _ => false,
            }
    }
}

#[derive(Debug)]
struct CacheEntry {
    key: CacheKey,
    /// The styled node; the entry is swept once it is dropped.
    node: Weak<StyleNode>,
    /// The cascade's result.
    computed: Rc<ComputedStyle>,
    /// `computed` with running transitions applied.
    effective: Rc<ComputedStyle>,
    transitions: Vec<TransitionRecord>,
    evaluated_at: f64,
}

impl CacheEntry {
    /// Re-evaluate running transitions at `now`, dropping finished ones.
    fn refresh(&mut self, now: f64) {
        if self.transitions.is_empty() || self.evaluated_at == now {
            return;
        }
        let values: Vec<(PropertyId, StyleValue)> = self
            .transitions
            .iter_mut()
            .map(|record| (record.property(), record.advance(now)))
            .collect();
        self.transitions.retain(|record| !record.is_finished());
        self.effective = if self.transitions.is_empty() {
            Rc::clone(&self.computed)
        } else {
            Rc::new(self.computed.with_values(values))
        };
        self.evaluated_at = now;
    }
}

/// Resolves [`StyleNode`]s to [`ComputedStyle`]s.
///
/// The resolver owns the provider, the settings, the clock that drives
/// transitions, and the corner-mask cache shadow painting draws from.
pub struct Resolver<P: StyleProvider = CssProvider> {
    provider: P,
    settings: Settings,
    settings_generation: u64,
    clock: Box<dyn Clock>,
    cache: HashMap<u64, CacheEntry>,
    corner_masks: CornerMaskCache,
}

impl<P: StyleProvider> core::fmt::Debug for Resolver<P> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Resolver")
            .field("settings", &self.settings)
            .field("cached", &self.cache.len())
            .field("corner_masks", &self.corner_masks.len())
            .finish_non_exhaustive()
    }
}

impl<P: StyleProvider> Resolver<P> {
    /// A resolver over `provider` with default settings and the system clock.
    pub fn new(provider: P) -> Self {
        Self::with_clock(provider, Box::new(SystemClock::new()))
    }

    /// A resolver driven by `clock`.
    pub fn with_clock(provider: P, clock: Box<dyn Clock>) -> Self {
        Self {
            provider,
            settings: Settings::default(),
            settings_generation: 0,
            clock,
            cache: HashMap::new(),
            corner_masks: CornerMaskCache::new(),
        }
    }

    /// The style provider.
    pub const fn provider(&self) -> &P {
        &self.provider
    }

    /// Mutable access to the provider. Cached styles notice changes through
    /// the provider's generation.
    pub const fn provider_mut(&mut self) -> &mut P {
        &mut self.provider
    }

    /// Current settings.
    pub const fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Replace the settings; every cached style becomes stale.
    pub fn set_settings(&mut self, settings: Settings) {
        self.settings = settings;
        self.settings_generation += 1;
    }

    /// The corner-mask cache used by shadow painting.
    pub const fn corner_mask_cache(&mut self) -> &mut CornerMaskCache {
        &mut self.corner_masks
    }

    /// Current time on the resolver's clock.
    pub fn now(&self) -> f64 {
        self.clock.now()
    }

    /// [§ 6 Cascading](https://www.w3.org/TR/css-cascade-4/#cascading)
    ///
    /// The effective style of `node`: its computed style with running
    /// transitions applied. Ancestors are resolved first.
    ///
    /// A cached style is reused while the node's state, classes and
    /// generation, its parent's style, the provider and the settings are
    /// unchanged. When a recomputation changes an animatable property
    /// that has a transition, a transition starts from the value shown
    /// until now.
    pub fn style_for(&mut self, node: &StyleNode) -> Rc<ComputedStyle> {
        let parent = node.parent().map(|parent| self.style_for(parent));
        let now = self.clock.now();
        let key = CacheKey {
            state: node.state(),
            class_digest: node.class_digest(),
            node_generation: node.generation(),
            provider_generation: self.provider.generation(),
            settings_generation: self.settings_generation,
            parent,
        };

        let serial = node.serial();
        if let Some(entry) = self.cache.get_mut(&serial) {
            if entry.key.matches(&key) {
                entry.refresh(now);
                return Rc::clone(&entry.effective);
            }
        }

        let specified = self.provider.lookup(node);
        let computed = Rc::new(ComputedStyle::compute(
            &specified,
            &self.provider,
            &self.settings,
            key.parent.as_deref(),
        ));

        self.sweep_dropped_nodes();
        let mut entry = CacheEntry {
            key,
            node: node.downgrade(),
            effective: Rc::clone(&computed),
            computed,
            transitions: Vec::new(),
            evaluated_at: now,
        };
        if let Some(previous) = self.cache.remove(&serial) {
            entry.transitions = start_transitions(previous, &entry.computed, now);
            if !entry.transitions.is_empty() {
                entry.evaluated_at = f64::NAN;
                entry.refresh(now);
            }
        }
        let effective = Rc::clone(&entry.effective);
        let _ = self.cache.insert(serial, entry);
        effective
    }

    /// Advance every running transition to the clock's current time.
    /// Returns whether any transition is still running.
    pub fn tick(&mut self) -> bool {
        self.sweep_dropped_nodes();
        let now = self.clock.now();
        let mut running = false;
        for entry in self.cache.values_mut() {
            entry.refresh(now);
            running |= !entry.transitions.is_empty();
        }
        running
    }

    /// Whether any cached node has a transition in progress.
    pub fn has_running_transitions(&self) -> bool {
        self.cache.values().any(|entry| !entry.transitions.is_empty())
    }

    /// Drop the cached style of `node`. Its next resolution starts from
    /// scratch, without transitions.
    pub fn forget(&mut self, node: &StyleNode) {
        let _ = self.cache.remove(&node.serial());
    }

    /// Drop every cached style.
    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    /// Number of nodes with a cached style.
    pub fn cached_count(&self) -> usize {
        self.cache.len()
    }

    /// Forget styles of nodes that no longer exist. Runs on every cache
    /// miss and every tick.
    fn sweep_dropped_nodes(&mut self) {
        self.cache.retain(|_, entry| entry.node.strong_count() > 0);
    }
}

/// Transitions for a node whose computed style changed from `previous`.
///
/// [CSS Transitions § 3](https://drafts.csswg.org/css-transitions-1/#starting)
///
/// "If the element has a running transition for the property, and the end
/// value of the running transition is equal to the value of the property
/// in the after-change style, implementations must not modify the
/// transitions." Otherwise a new transition replaces the running one and
/// starts from the value currently shown.
fn start_transitions(previous: CacheEntry, computed: &ComputedStyle, now: f64) -> Vec<TransitionRecord> {
    let CacheEntry {
        effective,
        transitions: mut running,
        ..
    } = previous;
    let mut transitions = Vec::new();
    for property in PropertyId::all().filter(|p| p.is_animated()) {
        let target = computed.get(property);
        let existing = running.iter().position(|r| r.property() == property);
        if let Some(index) = existing {
            if running[index].end().equal(target) {
                transitions.push(running.swap_remove(index));
                continue;
            }
        }
        let shown = existing.map_or_else(
            || effective.get(property).clone(),
            |index| running[index].value_at(now),
        );
        if shown.equal(target) {
            continue;
        }
        let Some((duration, delay, ease)) = transition_timing(computed, property) else {
            continue;
        };
        if duration <= 0.0 {
            continue;
        }
        transitions.push(TransitionRecord::new(
            property,
            shown,
            target.clone(),
            now,
            delay,
            duration,
            ease,
        ));
    }
    transitions
}

/// Duration, delay and timing function that apply to `property`, or `None`
/// if `transition-property` does not name it.
///
/// [CSS Transitions § 2](https://drafts.csswg.org/css-transitions-1/#transition-property-property)
///
/// "If a property is specified multiple times in the value of
/// transition-property... the transition uses the duration, delay, and
/// timing function at the index corresponding to the last occurrence...
/// the lists of values are repeated as needed."
fn transition_timing(style: &ComputedStyle, property: PropertyId) -> Option<(f64, f64, Ease)> {
    let names = style.get(PropertyId::TransitionProperty).as_slice();
    let index = names.iter().rposition(|name| {
        name.as_str()
            .is_some_and(|name| name.eq_ignore_ascii_case("all") || name.eq_ignore_ascii_case(property.name()))
    })?;
    let pick = |list: PropertyId| {
        let items = style.get(list).as_slice();
        items.get(index % items.len().max(1)).cloned()
    };
    let duration = pick(PropertyId::TransitionDuration).map_or(0.0, |v| v.number_value(0.0));
    let delay = pick(PropertyId::TransitionDelay).map_or(0.0, |v| v.number_value(0.0));
    let ease = pick(PropertyId::TransitionTimingFunction)
        .and_then(|v| v.as_ease())
        .unwrap_or(Ease::EASE);
    Some((duration, delay, ease))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::ManualClock;
    use crate::values::Rgba;

    fn resolver(css: &str) -> (Resolver, ManualClock) {
        let clock = ManualClock::new();
        let resolver = Resolver::with_clock(CssProvider::from_data(css), Box::new(clock.clone()));
        (resolver, clock)
    }

    #[test]
    fn test_cache_hit_returns_same_style() {
        let (mut resolver, _) = resolver("label { color: red; }");
        let node = StyleNode::new("label");
        let a = resolver.style_for(&node);
        let b = resolver.style_for(&node);
        assert!(Rc::ptr_eq(&a, &b));
        assert_eq!(resolver.cached_count(), 1);
    }

    #[test]
    fn test_dropped_nodes_leave_the_cache() {
        let (mut resolver, _) = resolver("label { color: red; }");
        let window = StyleNode::new("window");
        let kept = StyleNode::with_parent("label", &window);
        let _ = resolver.style_for(&kept);
        for _ in 0..10 {
            let _ = resolver.style_for(&StyleNode::with_parent("label", &window));
        }
        // Each miss sweeps the label dropped before it; only the last is left.
        assert_eq!(resolver.cached_count(), 3);
        assert!(!resolver.tick());
        assert_eq!(resolver.cached_count(), 2);

        drop(kept);
        let _ = resolver.tick();
        assert_eq!(resolver.cached_count(), 1);
        assert!(Rc::ptr_eq(&resolver.style_for(&window), &resolver.style_for(&window)));
    }

    #[test]
    fn test_class_change_invalidates() {
        let (mut resolver, _) = resolver("label { color: red; } label.dim { color: blue; }");
        let node = StyleNode::new("label");
        assert_eq!(resolver.style_for(&node).color(), Rgba::new(1.0, 0.0, 0.0, 1.0));
        let _ = node.add_class("dim");
        assert_eq!(resolver.style_for(&node).color(), Rgba::new(0.0, 0.0, 1.0, 1.0));
    }

    #[test]
    fn test_parent_change_reaches_child() {
        let (mut resolver, _) = resolver("box { color: red; } box:hover { color: blue; }");
        let parent = StyleNode::new("box");
        let child = StyleNode::with_parent("label", &parent);
        assert_eq!(resolver.style_for(&child).color(), Rgba::new(1.0, 0.0, 0.0, 1.0));
        parent.set_state(StateFlags::PRELIGHT);
        assert_eq!(resolver.style_for(&child).color(), Rgba::new(0.0, 0.0, 1.0, 1.0));
    }

    #[test]
    fn test_provider_reload_invalidates() {
        let (mut resolver, _) = resolver("label { opacity: 0.5; }");
        let node = StyleNode::new("label");
        assert_eq!(resolver.style_for(&node).opacity(), 0.5);
        resolver.provider_mut().load_from_data("label { opacity: 0.25; }");
        assert_eq!(resolver.style_for(&node).opacity(), 0.25);
    }

    #[test]
    fn test_transition_runs_and_finishes() {
        let (mut resolver, clock) = resolver(
            "label { opacity: 0; transition: opacity 1s linear; }
             label:hover { opacity: 1; }",
        );
        let node = StyleNode::new("label");
        assert_eq!(resolver.style_for(&node).opacity(), 0.0);

        node.set_state(StateFlags::PRELIGHT);
        assert_eq!(resolver.style_for(&node).opacity(), 0.0);
        clock.advance(0.25);
        assert!(resolver.tick());
        assert!((resolver.style_for(&node).opacity() - 0.25).abs() < 1e-9);

        clock.advance(1.0);
        assert!(!resolver.tick());
        assert_eq!(resolver.style_for(&node).opacity(), 1.0);
    }

    #[test]
    fn test_interrupted_transition_restarts_from_shown_value() {
        let (mut resolver, clock) = resolver(
            "label { opacity: 0; transition: opacity 1s linear; }
             label:hover { opacity: 1; }",
        );
        let node = StyleNode::new("label");
        let _ = resolver.style_for(&node);
        node.set_state(StateFlags::PRELIGHT);
        let _ = resolver.style_for(&node);
        clock.advance(0.5);
        node.set_state(StateFlags::empty());
        let style = resolver.style_for(&node);
        assert!((style.opacity() - 0.5).abs() < 1e-9);
        clock.advance(0.5);
        assert!((resolver.style_for(&node).opacity() - 0.25).abs() < 1e-9);
    }

    #[test]
    fn test_transition_property_filters() {
        let (mut resolver, _) = resolver(
            "label { opacity: 0; color: red; transition: color 1s; }
             label:hover { opacity: 1; color: blue; }",
        );
        let node = StyleNode::new("label");
        let _ = resolver.style_for(&node);
        node.set_state(StateFlags::PRELIGHT);
        let style = resolver.style_for(&node);
        assert_eq!(style.opacity(), 1.0);
        assert_eq!(style.color(), Rgba::new(1.0, 0.0, 0.0, 1.0));
    }
}
