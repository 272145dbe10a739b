use crate::error::InternalError;
use crate::filter::binding::FieldBinding;
use crate::filter::field_filter::FieldFilter;
use crate::filter::resolver::ResolverRegistry;

///
/// Filter
///
/// A composite predicate over `T`: the conjunction of zero or more field
/// bindings. Its fingerprint is a pure function of the binding set (stable
/// under permutation and across process runs) and is used as the cache key
/// for the filter-page map registry.
///

pub struct Filter<T> {
    bindings: Vec<FieldBinding<T>>,
}

impl<T> Filter<T> {
    #[must_use]
    pub const fn empty() -> Self {
        Self { bindings: Vec::new() }
    }

    #[must_use]
    pub fn new(bindings: Vec<FieldBinding<T>>) -> Self {
        Self { bindings }
    }

    /// Conjunction of every binding's truth value. Short-circuits on the
    /// first failing or erroring binding.
    ///
    /// # Errors
    /// Propagates `resolver-type-mismatch` from any binding.
    pub fn test(&self, entity: &T) -> Result<bool, InternalError> {
        for binding in &self.bindings {
            if !binding.test(entity)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Canonical cache key: `fieldName:filterKey:filterValue` tokens, sorted
    /// lexicographically and joined by `|`. Empty composite is `""`.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        let mut tokens: Vec<String> = self
            .bindings
            .iter()
            .map(FieldBinding::fingerprint_token)
            .collect();
        tokens.sort_unstable();
        tokens.join("|")
    }
}

impl<T> Clone for Filter<T> {
    fn clone(&self) -> Self {
        Self {
            bindings: self.bindings.clone(),
        }
    }
}

impl<T> Default for Filter<T> {
    fn default() -> Self {
        Self::empty()
    }
}

///
/// FilterBuilder
///
/// Fluent construction of a [`Filter`] whose field bindings are resolved
/// against the process-wide resolver registry by `(entity_type, field_name)`.
/// A field referencing no registered resolver fails at build time with
/// `unknown-field`.
///

pub struct FilterBuilder<T: 'static> {
    entity_type: &'static str,
    bindings: Vec<FieldBinding<T>>,
}

impl<T: 'static> FilterBuilder<T> {
    #[must_use]
    pub const fn new(entity_type: &'static str) -> Self {
        Self {
            entity_type,
            bindings: Vec::new(),
        }
    }

    /// Add a binding for `field_name` using the registered resolver.
    ///
    /// # Errors
    /// Returns `unknown-field` if no resolver is registered, or
    /// `resolver-type-mismatch` if the registered resolver targets a
    /// different entity type.
    pub fn field(mut self, field_name: &'static str, filter: FieldFilter) -> Result<Self, InternalError> {
        let resolver = ResolverRegistry::lookup::<T>(self.entity_type, field_name)?;
        self.bindings
            .push(FieldBinding::new(field_name, filter, resolver));
        Ok(self)
    }

    /// Add a binding directly with an explicit resolver, bypassing the
    /// registry. Useful for ad hoc/inline filters in tests.
    #[must_use]
    pub fn field_with_resolver(
        mut self,
        field_name: &'static str,
        filter: FieldFilter,
        resolver: crate::filter::resolver::Resolver<T>,
    ) -> Self {
        self.bindings
            .push(FieldBinding::new(field_name, filter, resolver));
        self
    }

    #[must_use]
    pub fn build(self) -> Filter<T> {
        Filter::new(self.bindings)
    }
}
