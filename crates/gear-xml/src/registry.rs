//! Type-tag → handler lookup.
//!
//! The process-wide registry is set up once, either explicitly with
//! [`HandlerRegistry::install_global`] or with the built-in handlers on the
//! first call to [`HandlerRegistry::global`]. After that it is read-only, so
//! concurrent lookups need no locking.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

use crate::handler::XmlHandler;
use crate::handlers::{CalorimeterParametersXml, GearParametersXml, TpcParametersXml};

static GLOBAL: OnceLock<HandlerRegistry> = OnceLock::new();

/// Maps `geartype` tags to the handlers that understand them.
#[derive(Clone, Default)]
pub struct HandlerRegistry {
    handlers: HashMap<String, Arc<dyn XmlHandler>>,
}

impl fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut tags: Vec<&str> = self.geartypes().collect();
        tags.sort_unstable();
        f.debug_struct("HandlerRegistry").field("geartypes", &tags).finish()
    }
}

impl HandlerRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the TPC, calorimeter and generic handlers.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.add(Arc::new(TpcParametersXml));
        registry.add(Arc::new(CalorimeterParametersXml));
        registry.add(Arc::new(GearParametersXml));
        registry
    }

    /// Bind `geartype` to `handler`, replacing any earlier binding.
    pub fn register(&mut self, geartype: impl Into<String>, handler: Arc<dyn XmlHandler>) {
        let geartype = geartype.into();
        if let Some(previous) = self.handlers.insert(geartype.clone(), Arc::clone(&handler))
            && !Arc::ptr_eq(&previous, &handler)
        {
            log::debug!("geartype \"{geartype}\": handler replaced");
        }
    }

    /// Register `handler` under its own [`XmlHandler::geartype`].
    pub fn add(&mut self, handler: Arc<dyn XmlHandler>) {
        let geartype = handler.geartype().to_string();
        self.register(geartype, handler);
    }

    /// Handler bound to `geartype`, if any. Absence is for the caller to judge.
    pub fn resolve(&self, geartype: &str) -> Option<&Arc<dyn XmlHandler>> {
        self.handlers.get(geartype)
    }

    pub fn geartypes(&self) -> impl Iterator<Item = &str> {
        self.handlers.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Make `self` the process-wide registry.
    ///
    /// Must run before the first [`global`](Self::global) call; afterwards
    /// the registry is fixed and `self` is handed back as the error.
    pub fn install_global(self) -> Result<(), HandlerRegistry> {
        GLOBAL.set(self)
    }

    /// The process-wide registry, initialized with
    /// [`with_defaults`](Self::with_defaults) unless one was installed.
    pub fn global() -> &'static HandlerRegistry {
        GLOBAL.get_or_init(Self::with_defaults)
    }
}
