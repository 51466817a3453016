//! Style nodes: what selectors match against.

use std::cell::{Cell, RefCell};
use std::collections::BTreeSet;
use std::hash::{DefaultHasher, Hash, Hasher};
use std::rc::{Rc, Weak};

use bitflags::bitflags;

bitflags! {
    /// Widget states that selectors can test with pseudo-classes.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct StateFlags: u16 {
        /// `:active`
        const ACTIVE = 1 << 0;
        /// `:hover`
        const PRELIGHT = 1 << 1;
        /// `:selected`
        const SELECTED = 1 << 2;
        /// `:disabled`
        const INSENSITIVE = 1 << 3;
        /// `:indeterminate`
        const INCONSISTENT = 1 << 4;
        /// `:focus`
        const FOCUSED = 1 << 5;
        /// `:backdrop`
        const BACKDROP = 1 << 6;
        /// `:dir(ltr)`
        const DIR_LTR = 1 << 7;
        /// `:dir(rtl)`
        const DIR_RTL = 1 << 8;
        /// `:link`
        const LINK = 1 << 9;
        /// `:visited`
        const VISITED = 1 << 10;
        /// `:checked`
        const CHECKED = 1 << 11;
        /// `:drop(active)`
        const DROP_ACTIVE = 1 << 12;
    }
}

thread_local! {
    static NEXT_SERIAL: Cell<u64> = const { Cell::new(1) };
}

/// A styled element: name, optional id, classes, state and parent.
///
/// Nodes are shared through [`Rc`]; a child keeps its parent alive, never
/// the other way round. Changing classes or state bumps the node's
/// generation so cached styles notice.
#[derive(Debug)]
pub struct StyleNode {
    serial: u64,
    this: Weak<StyleNode>,
    name: String,
    id: Option<String>,
    classes: RefCell<BTreeSet<String>>,
    state: Cell<StateFlags>,
    parent: Option<Rc<StyleNode>>,
    generation: Cell<u64>,
}

impl StyleNode {
    /// A root node.
    #[must_use]
    pub fn new(name: &str) -> Rc<Self> {
        Self::build(name, None, None)
    }

    /// A node under `parent`.
    #[must_use]
    pub fn with_parent(name: &str, parent: &Rc<Self>) -> Rc<Self> {
        Self::build(name, None, Some(Rc::clone(parent)))
    }

    /// A node with an id, optionally under `parent`.
    #[must_use]
    pub fn with_id(name: &str, id: &str, parent: Option<&Rc<Self>>) -> Rc<Self> {
        Self::build(name, Some(id.to_string()), parent.cloned())
    }

    fn build(name: &str, id: Option<String>, parent: Option<Rc<Self>>) -> Rc<Self> {
        let serial = NEXT_SERIAL.with(|next| {
            let serial = next.get();
            next.set(serial + 1);
            serial
        });
        Rc::new_cyclic(|this| Self {
            serial,
            this: this.clone(),
            name: name.to_string(),
            id,
            classes: RefCell::new(BTreeSet::new()),
            state: Cell::new(StateFlags::empty()),
            parent,
            generation: Cell::new(0),
        })
    }

    /// Identity of this node, unique per thread.
    #[must_use]
    pub const fn serial(&self) -> u64 {
        self.serial
    }

    /// A handle that does not keep the node alive.
    #[must_use]
    pub fn downgrade(&self) -> Weak<Self> {
        self.this.clone()
    }

    /// The element name, matched by type selectors.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The id, matched by `#id` selectors.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// The parent node.
    #[must_use]
    pub fn parent(&self) -> Option<&Rc<Self>> {
        self.parent.as_ref()
    }

    /// Current state flags.
    #[must_use]
    pub fn state(&self) -> StateFlags {
        self.state.get()
    }

    /// Replace the state flags.
    pub fn set_state(&self, state: StateFlags) {
        if self.state.replace(state) != state {
            self.changed();
        }
    }

    /// Add a class. Returns whether it was new.
    pub fn add_class(&self, class: &str) -> bool {
        let added = self.classes.borrow_mut().insert(class.to_string());
        if added {
            self.changed();
        }
        added
    }

    /// Remove a class. Returns whether it was present.
    pub fn remove_class(&self, class: &str) -> bool {
        let removed = self.classes.borrow_mut().remove(class);
        if removed {
            self.changed();
        }
        removed
    }

    /// Whether the node has `class`.
    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.borrow().contains(class)
    }

    /// The classes, sorted.
    #[must_use]
    pub fn classes(&self) -> Vec<String> {
        self.classes.borrow().iter().cloned().collect()
    }

    /// A hash of the class set, for cache keys.
    #[must_use]
    pub fn class_digest(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.classes.borrow().hash(&mut hasher);
        hasher.finish()
    }

    /// Counter bumped by every class or state change.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation.get()
    }

    /// Signal that something outside the node's own data changed its
    /// style, such as an inline override.
    pub fn changed(&self) {
        self.generation.set(self.generation.get() + 1);
    }

    /// The node and its ancestors, innermost first.
    pub fn ancestors(&self) -> impl Iterator<Item = &Self> {
        core::iter::successors(Some(self), |node| node.parent.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_changes_bump_generation() {
        let node = StyleNode::new("button");
        assert_eq!(node.generation(), 0);
        assert!(node.add_class("flat"));
        assert!(!node.add_class("flat"));
        assert_eq!(node.generation(), 1);
        node.set_state(StateFlags::PRELIGHT);
        node.set_state(StateFlags::PRELIGHT);
        assert_eq!(node.generation(), 2);
    }

    #[test]
    fn test_class_digest_ignores_order() {
        let a = StyleNode::new("a");
        let b = StyleNode::new("b");
        let _ = a.add_class("x");
        let _ = a.add_class("y");
        let _ = b.add_class("y");
        let _ = b.add_class("x");
        assert_eq!(a.class_digest(), b.class_digest());
    }

    #[test]
    fn test_ancestors() {
        let window = StyleNode::new("window");
        let button = StyleNode::with_parent("button", &window);
        let label = StyleNode::with_parent("label", &button);
        let names: Vec<&str> = label.ancestors().map(StyleNode::name).collect();
        assert_eq!(names, ["label", "button", "window"]);
    }
}
