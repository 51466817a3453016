//! Engine warnings with colored terminal output.
//!
//! Provides deduplication to avoid spamming the same warning multiple times.
//! Used by the parser, the resolver and the renderers to report values they
//! had to drop.
//!
//! Every warning is also appended to a per-thread record so callers (and
//! tests) can inspect what a resolution produced without scraping stderr.

use std::cell::RefCell;
use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

/// ANSI color codes for terminal output
const YELLOW: &str = "\x1b[33m";
const RESET: &str = "\x1b[0m";

/// Global set of warnings we've already printed (to deduplicate)
static WARNED: Mutex<Option<HashSet<String>>> = Mutex::new(None);

thread_local! {
    /// Every warning raised on this thread since the last clear, in order.
    static RECORDED: RefCell<Vec<String>> = const { RefCell::new(Vec::new()) };
}

/// Report a dropped value or failed lookup (prints once per unique message).
///
/// The message is always recorded for the current thread, even when the
/// printed copy is suppressed as a duplicate.
///
/// # Example
/// ```ignore
/// warn_once("CSS", "unknown property '-glaze-foo'");
/// ```
pub fn warn_once(component: &str, message: &str) {
    let key = format!("[{component}] {message}");
    RECORDED.with(|recorded| recorded.borrow_mut().push(key.clone()));

    let should_print = WARNED
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .get_or_insert_with(HashSet::new)
        .insert(key);

    if should_print {
        eprintln!("{YELLOW}[Glaze {component}] ⚠ {message}{RESET}");
    }
}

/// Warnings raised on the current thread since the last [`clear_warnings`],
/// formatted as `[component] message`.
#[must_use]
pub fn recorded_warnings() -> Vec<String> {
    RECORDED.with(|recorded| recorded.borrow().clone())
}

/// Clear all recorded warnings (call when loading a new theme)
pub fn clear_warnings() {
    RECORDED.with(|recorded| recorded.borrow_mut().clear());
    let mut guard = WARNED.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(set) = guard.as_mut() {
        set.clear();
    }
}
