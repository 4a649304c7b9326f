//! Searchable filter.

use crate::contentful::ResolvedEntry;

/// Keep the entries whose `fields.isSearchable` is truthy, in input order.
///
/// Entries without `fields` or without the flag are dropped.
pub fn filter_searchable(entries: &[ResolvedEntry]) -> Vec<&ResolvedEntry> {
    entries.iter().filter(|entry| entry.is_searchable()).collect()
}
