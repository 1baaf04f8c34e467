//! Context listing, lookup and selection

use std::path::PathBuf;

use log::debug;

use crate::error::{CtlError, Result};
use crate::output::{mask_token, Record};

use super::models::{Context, ContextConfig};
use super::store::ContextStore;

/// Owns the loaded configuration and the store it came from.
///
/// The active context is resolved from, in order:
/// 1. an override for this invocation (`--context` flag / `NSCTL_CONTEXT`)
/// 2. `current-context` from the config file
pub struct ContextManager {
    store: ContextStore,
    config: ContextConfig,
    active_override: Option<String>,
}

impl ContextManager {
    /// Load the configuration from `store`
    pub fn load(store: ContextStore, active_override: Option<String>) -> Result<Self> {
        let config = store.load()?;
        Ok(Self::from_config(store, config, active_override))
    }

    /// Wrap an already loaded configuration
    pub fn from_config(
        store: ContextStore,
        config: ContextConfig,
        active_override: Option<String>,
    ) -> Self {
        Self {
            store,
            config,
            active_override: active_override.filter(|name| !name.is_empty()),
        }
    }

    /// All contexts in declaration order
    pub fn list_contexts(&self) -> &[Context] {
        &self.config.contexts
    }

    /// Find a context by exact, case-sensitive name
    pub fn find_context(&self, name: &str) -> Option<&Context> {
        self.config.get(name)
    }

    /// Name of the active context, whether or not it is configured
    pub fn current_context_name(&self) -> Option<&str> {
        if let Some(name) = self.active_override.as_deref() {
            debug!("Using context override: {}", name);
            return Some(name);
        }
        self.config.current_context.as_deref()
    }

    /// The active context, if one is selected and configured
    pub fn current_context(&self) -> Option<&Context> {
        let name = self.current_context_name()?;
        let found = self.find_context(name);
        if found.is_none() {
            debug!("Context '{}' not found in config", name);
        }
        found
    }

    /// Make `name` the current context and persist the pointer. Only the
    /// pointer changes; context entries and their local state stay as they are.
    pub fn select_context(&mut self, name: &str) -> Result<()> {
        if self.find_context(name).is_none() {
            return Err(CtlError::NotFound(name.to_string()));
        }

        self.config.current_context = Some(name.to_string());
        self.store.save(&self.config)?;
        debug!("Current context set to '{}'", name);
        Ok(())
    }

    /// Local state directory of the active context
    pub fn session_dir(&self) -> Option<PathBuf> {
        self.current_context()
            .map(|ctx| self.store.context_dir(&ctx.name))
    }

    /// Display record for the active context (empty name when none is selected)
    pub fn render_current_context(&self) -> Record {
        match self.current_context() {
            Some(ctx) => context_record(ctx),
            None => Record::new(self.current_context_name().unwrap_or_default()),
        }
    }

    /// Display records for every context
    pub fn render_all_contexts(&self) -> Vec<Record> {
        self.config.contexts.iter().map(context_record).collect()
    }
}

/// Sparse record: namespace, api and token appear only when set
fn context_record(ctx: &Context) -> Record {
    let masked = ctx.token.as_deref().filter(|t| !t.is_empty()).map(mask_token);
    Record::new(&ctx.name)
        .with("namespace", ctx.namespace.as_deref())
        .with("api", Some(ctx.api.as_str()))
        .with("token", masked.as_deref())
}
