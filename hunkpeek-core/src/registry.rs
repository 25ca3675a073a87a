//! Name-to-renderer lookup driven by configuration.

use std::collections::HashMap;

use tracing::warn;

use crate::collab::Renderer;

/// Name that explicitly selects no renderer.
pub const NO_RENDERER: &str = "none";

type Factory = Box<dyn Fn() -> Box<dyn Renderer>>;

/// Registered renderer factories, keyed by the name used in configuration.
///
/// The binary registers `inline` and `floating`; embedding programs may add
/// their own under any other name.
#[derive(Default)]
pub struct RendererRegistry {
    factories: HashMap<String, Factory>,
}

impl RendererRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `factory` under `name`, replacing any previous entry.
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn() -> Box<dyn Renderer> + 'static,
    {
        self.factories.insert(name.into(), Box::new(factory));
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Builds the renderer selected by `choice`.
    ///
    /// `None`, `"none"` and unknown names yield no renderer; unknown names are
    /// logged.
    pub fn resolve(&self, choice: Option<&str>) -> Option<Box<dyn Renderer>> {
        let name = choice.filter(|n| *n != NO_RENDERER)?;
        match self.factories.get(name) {
            Some(factory) => Some(factory()),
            None => {
                warn!(renderer = %name, known = ?self.names(), "unknown renderer");
                None
            }
        }
    }
}
