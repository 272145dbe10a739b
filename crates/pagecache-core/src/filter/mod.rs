//! Filter algebra: field resolvers, field filters, fingerprinting.

mod binding;
mod field_filter;
#[allow(clippy::module_inception)]
mod filter;
mod resolver;

pub use binding::FieldBinding;
pub use field_filter::FieldFilter;
pub use filter::{Filter, FilterBuilder};
pub use resolver::{Resolver, ResolverRegistry};
