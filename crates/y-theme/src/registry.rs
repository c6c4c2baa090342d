//! Process-wide theme registry.
//!
//! This is the one piece of global mutable state in the engine: a map from
//! theme name to a factory that builds its [`Styles`]. The builtins are
//! present from the start; [`register`] adds more at runtime and replaces an
//! existing entry of the same name. Lookups never panic and return `None`
//! for unknown names.
//!
//! Each entry builds its styles at most once; the result is shared.

use std::collections::HashMap;
use std::sync::{Arc, LazyLock, OnceLock};

use log::debug;
use parking_lot::RwLock;

use crate::builtin::{BUILTIN_NAMES, builtin_mode, builtin_styles};
use crate::palette::Mode;
use crate::styles::Styles;

type Factory = Box<dyn Fn() -> Styles + Send + Sync>;

struct Entry {
    factory: Factory,
    mode: Mode,
    built: OnceLock<Arc<Styles>>,
}

impl Entry {
    fn new(factory: Factory, mode: Mode) -> Arc<Self> {
        Arc::new(Self {
            factory,
            mode,
            built: OnceLock::new(),
        })
    }

    fn styles(&self) -> Arc<Styles> {
        Arc::clone(self.built.get_or_init(|| Arc::new((self.factory)())))
    }
}

static REGISTRY: LazyLock<RwLock<HashMap<String, Arc<Entry>>>> = LazyLock::new(|| {
    let map = BUILTIN_NAMES
        .iter()
        .map(|&name| {
            let mode = builtin_mode(name).unwrap_or_default();
            let factory: Factory = Box::new(move || builtin_styles(name).unwrap_or_default());
            (name.to_owned(), Entry::new(factory, mode))
        })
        .collect();
    RwLock::new(map)
});

/// Register a theme, replacing any existing theme of the same name.
pub fn register(
    name: impl Into<String>,
    factory: impl Fn() -> Styles + Send + Sync + 'static,
    mode: Mode,
) {
    let name = name.into();
    debug!("registering theme {name:?} ({mode})");
    let replaced = REGISTRY
        .write()
        .insert(name, Entry::new(Box::new(factory), mode))
        .is_some();
    if replaced {
        debug!("theme replaced an earlier registration");
    }
}

/// The styles registered under `name`, or `None`.
#[must_use]
pub fn lookup(name: &str) -> Option<Arc<Styles>> {
    // Build outside the lock so a factory may itself consult the registry.
    let entry = REGISTRY.read().get(name).cloned()?;
    Some(entry.styles())
}

/// The mode registered under `name`, or `None`.
#[must_use]
pub fn mode(name: &str) -> Option<Mode> {
    REGISTRY.read().get(name).map(|e| e.mode)
}

/// All registered names, sorted.
#[must_use]
pub fn names() -> Vec<String> {
    let mut names: Vec<String> = REGISTRY.read().keys().cloned().collect();
    names.sort_unstable();
    names
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
