use crate::error::InternalError;
use crate::filter::field_filter::FieldFilter;
use crate::filter::resolver::Resolver;

///
/// FieldBinding
///
/// One `(field name, field filter, field resolver)` triple. The composite
/// filter's truth value is the conjunction of its bindings' truth values.
///

pub struct FieldBinding<T> {
    pub(crate) field_name: &'static str,
    pub(crate) filter: FieldFilter,
    pub(crate) resolver: Resolver<T>,
}

impl<T> FieldBinding<T> {
    #[must_use]
    pub fn new(field_name: &'static str, filter: FieldFilter, resolver: Resolver<T>) -> Self {
        Self {
            field_name,
            filter,
            resolver,
        }
    }

    /// # Errors
    /// Propagates `resolver-type-mismatch` from the underlying field filter.
    pub fn test(&self, entity: &T) -> Result<bool, InternalError> {
        let observed = (self.resolver)(entity);
        self.filter.test(observed.as_ref(), self.field_name)
    }

    /// `fieldName:filterKey:filterValue` token used to build the fingerprint.
    #[must_use]
    pub fn fingerprint_token(&self) -> String {
        format!(
            "{}:{}:{}",
            self.field_name,
            self.filter.filter_key(),
            self.filter.filter_value()
        )
    }
}

impl<T> Clone for FieldBinding<T> {
    fn clone(&self) -> Self {
        Self {
            field_name: self.field_name,
            filter: self.filter.clone(),
            resolver: self.resolver.clone(),
        }
    }
}
