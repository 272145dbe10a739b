use crate::error::{ErrorOrigin, InternalError};
use std::any::Any;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock};

/// A field resolver projects an entity to the field value a filter tests
/// against. `None` means the field is absent/null on that entity.
pub type Resolver<T> = Arc<dyn Fn(&T) -> Option<crate::value::Value> + Send + Sync>;

type ErasedResolver = Arc<dyn Any + Send + Sync>;

#[derive(Eq, PartialEq, Hash, Clone)]
struct RegistryKey {
    entity_type: &'static str,
    field_name: &'static str,
}

fn registry() -> &'static Mutex<HashMap<RegistryKey, ErasedResolver>> {
    static REGISTRY: OnceLock<Mutex<HashMap<RegistryKey, ErasedResolver>>> = OnceLock::new();
    REGISTRY.get_or_init(|| Mutex::new(HashMap::new()))
}

///
/// ResolverRegistry
///
/// Process-wide `(entity type, field name) -> resolver` table. Writes are
/// expected to be quiescent by the time any query runs (see the concurrency
/// notes on the field-resolver registry).
///

pub struct ResolverRegistry;

impl ResolverRegistry {
    /// Register a resolver for `entity_type`/`field_name`. Re-registration
    /// with a distinct resolver logs a warning and replaces the prior entry.
    pub fn register<T: 'static>(
        entity_type: &'static str,
        field_name: &'static str,
        resolver: Resolver<T>,
    ) {
        let key = RegistryKey {
            entity_type,
            field_name,
        };
        let mut guard = registry().lock().expect("resolver registry poisoned");
        if guard.contains_key(&key) {
            log::warn!(
                "replacing resolver already registered for {entity_type}::{field_name}"
            );
        }
        guard.insert(key, Arc::new(resolver) as ErasedResolver);
    }

    /// Look up the resolver for `entity_type`/`field_name`, downcast to `T`.
    ///
    /// Returns `unknown-field` if nothing is registered, and
    /// `resolver-type-mismatch` if a resolver is registered under a
    /// different entity type `T'`.
    pub fn lookup<T: 'static>(
        entity_type: &'static str,
        field_name: &'static str,
    ) -> Result<Resolver<T>, InternalError> {
        let key = RegistryKey {
            entity_type,
            field_name,
        };
        let guard = registry().lock().expect("resolver registry poisoned");
        let erased = guard
            .get(&key)
            .ok_or_else(|| InternalError::unknown_field(field_name))?;
        erased
            .clone()
            .downcast::<Resolver<T>>()
            .map(|boxed| (*boxed).clone())
            .map_err(|_| {
                InternalError::new(
                    crate::error::ErrorClass::ResolverTypeMismatch,
                    ErrorOrigin::Filter,
                    format!(
                        "resolver registered for {entity_type}::{field_name} does not match the requested entity type"
                    ),
                )
            })
    }
}
