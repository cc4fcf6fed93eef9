//! Registry of resolved type supports.
//!
//! Resolving a type runs its import step at most once per registry: a
//! successful import is memoized under the type name and every later
//! resolution returns the cached descriptor. Failed imports are not cached,
//! so a type whose support becomes available later can still be resolved.
//! Two threads resolving the same new type at once may both import it; the
//! first descriptor stored is the one every caller gets.

use crate::{
    error::{Error, Result},
    msg::{ServiceMsg, TypeDescriptor, TypeSupport},
};
use parking_lot::Mutex;
use std::{collections::HashMap, sync::Arc};
use tracing::debug;

/// Maps type names to their resolved type support.
#[derive(Debug, Default)]
pub struct TypeSupportRegistry {
    resolved: Mutex<HashMap<String, Arc<TypeDescriptor>>>,
}

impl TypeSupportRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve the type support of message type `T`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoTypeSupportImported`] if the import step of `T`
    /// yields nothing.
    pub fn resolve<T: TypeSupport>(&self) -> Result<Arc<TypeDescriptor>> {
        self.resolve_with(T::type_name(), T::import_type_support)
    }

    /// Resolve the type support of service type `T`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoTypeSupportImported`] if the import step of `T`
    /// yields nothing.
    pub fn resolve_service<T: ServiceMsg>(&self) -> Result<Arc<TypeDescriptor>> {
        self.resolve_with(T::type_name(), T::import_type_support)
    }

    fn resolve_with(
        &self,
        type_name: &str,
        import: impl FnOnce() -> Option<TypeDescriptor>,
    ) -> Result<Arc<TypeDescriptor>> {
        if let Some(descriptor) = self.lookup(type_name) {
            return Ok(descriptor);
        }
        // The import step may resolve other types through this registry.
        let descriptor = import().ok_or_else(|| Error::NoTypeSupportImported {
            type_name: type_name.to_string(),
        })?;
        debug!(type_name, "imported type support");
        let descriptor = self
            .resolved
            .lock()
            .entry(type_name.to_string())
            .or_insert_with(|| Arc::new(descriptor))
            .clone();
        Ok(descriptor)
    }

    /// Register a descriptor explicitly, replacing any previous one of the same name.
    pub fn register(&self, descriptor: TypeDescriptor) -> Arc<TypeDescriptor> {
        let descriptor = Arc::new(descriptor);
        self.resolved
            .lock()
            .insert(descriptor.name().to_string(), descriptor.clone());
        descriptor
    }

    /// Look up an already resolved type without triggering an import.
    pub fn lookup(&self, type_name: &str) -> Option<Arc<TypeDescriptor>> {
        self.resolved.lock().get(type_name).cloned()
    }

    /// Number of resolved types.
    pub fn len(&self) -> usize {
        self.resolved.lock().len()
    }

    /// True when nothing has been resolved yet.
    pub fn is_empty(&self) -> bool {
        self.resolved.lock().is_empty()
    }
}
