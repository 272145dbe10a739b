use crate::error::InternalError;
use crate::value::Value;

///
/// FieldFilter
///
/// One of the pluggable single-value predicates a field binding carries.
/// Each variant reports a stable `filter_key` used in fingerprint tokens.
///

#[derive(Clone, Debug, PartialEq)]
pub enum FieldFilter {
    Equals(Value),
    Contains(String),
    Min(Value),
    Max(Value),
}

impl FieldFilter {
    /// Stable key identifying this filter kind, used in fingerprint tokens.
    #[must_use]
    pub const fn filter_key(&self) -> &'static str {
        match self {
            Self::Equals(_) => "equals",
            Self::Contains(_) => "contains",
            Self::Min(_) => "min",
            Self::Max(_) => "max",
        }
    }

    /// Rendered filter value for fingerprint tokens.
    #[must_use]
    pub fn filter_value(&self) -> String {
        match self {
            Self::Equals(v) | Self::Min(v) | Self::Max(v) => v.to_string(),
            Self::Contains(s) => s.clone(),
        }
    }

    /// Evaluate this filter against an observed value (`None` = field absent
    /// on that entity). `field_name` is used only to label a type-mismatch
    /// error. See each variant's null-handling test below.
    ///
    /// # Errors
    /// Returns `resolver-type-mismatch` if a `Min`/`Max` filter's stored
    /// value and the observed value are different `Value` variants: the
    /// comparison would otherwise silently fall back to cross-variant
    /// ranking instead of failing fast.
    pub fn test(&self, observed: Option<&Value>, field_name: &str) -> Result<bool, InternalError> {
        match self {
            Self::Equals(stored) => Ok(observed == Some(stored)),
            Self::Contains(sub) => Ok(observed.is_some_and(|v| v.contains(sub))),
            Self::Min(stored) => match observed {
                None => Ok(false),
                Some(v) if v.kind() != stored.kind() => Err(InternalError::resolver_type_mismatch(
                    field_name,
                    stored.kind(),
                    v.kind(),
                )),
                Some(v) => Ok(stored.canonical_cmp(v) != std::cmp::Ordering::Greater),
            },
            Self::Max(stored) => match observed {
                None => Ok(false),
                Some(v) if v.kind() != stored.kind() => Err(InternalError::resolver_type_mismatch(
                    field_name,
                    stored.kind(),
                    v.kind(),
                )),
                Some(v) => Ok(stored.canonical_cmp(v) != std::cmp::Ordering::Less),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equals_treats_null_as_unequal_unless_both_null() {
        let filter = FieldFilter::Equals(Value::Int(5));
        assert!(!filter.test(None, "salary").unwrap());
        assert!(filter.test(Some(&Value::Int(5)), "salary").unwrap());
        assert!(!filter.test(Some(&Value::Int(6)), "salary").unwrap());
    }

    #[test]
    fn contains_is_false_for_missing_observed() {
        let filter = FieldFilter::Contains("a".into());
        assert!(!filter.test(None, "name").unwrap());
        assert!(filter.test(Some(&Value::Text("banana".into())), "name").unwrap());
        assert!(!filter.test(Some(&Value::Text("xyz".into())), "name").unwrap());
    }

    #[test]
    fn min_means_stored_le_observed() {
        let filter = FieldFilter::Min(Value::Int(2000));
        assert!(!filter.test(None, "salary").unwrap());
        assert!(filter.test(Some(&Value::Int(2000)), "salary").unwrap());
        assert!(filter.test(Some(&Value::Int(5000)), "salary").unwrap());
        assert!(!filter.test(Some(&Value::Int(1999)), "salary").unwrap());
    }

    #[test]
    fn max_means_stored_ge_observed() {
        let filter = FieldFilter::Max(Value::Int(5000));
        assert!(!filter.test(None, "salary").unwrap());
        assert!(filter.test(Some(&Value::Int(5000)), "salary").unwrap());
        assert!(filter.test(Some(&Value::Int(2000)), "salary").unwrap());
        assert!(!filter.test(Some(&Value::Int(5001)), "salary").unwrap());
    }

    #[test]
    fn min_against_a_different_variant_is_a_type_mismatch() {
        let filter = FieldFilter::Min(Value::Int(5));
        let err = filter
            .test(Some(&Value::Text("z".into())), "salary")
            .unwrap_err();
        assert_eq!(err.class, crate::error::ErrorClass::ResolverTypeMismatch);
    }

    #[test]
    fn max_against_a_different_variant_is_a_type_mismatch() {
        let filter = FieldFilter::Max(Value::Int(5));
        let err = filter
            .test(Some(&Value::Bool(true)), "salary")
            .unwrap_err();
        assert_eq!(err.class, crate::error::ErrorClass::ResolverTypeMismatch);
    }
}
