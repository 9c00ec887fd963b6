//! Identifier list parsing for bulk lookups.

use std::collections::HashSet;

use ecom_core::{DomainError, DomainResult, ProductId};

/// Parse a comma-separated identifier list.
///
/// Tokens are trimmed and empty tokens are skipped. The first token that is not
/// a positive integer fails the whole list. Duplicates are dropped, keeping the
/// position of their first occurrence.
pub fn parse_id_list(raw: &str) -> DomainResult<Vec<ProductId>> {
    let mut ids = Vec::new();
    let mut seen = HashSet::new();

    for token in raw.split(',').map(str::trim) {
        if token.is_empty() {
            continue;
        }

        let id: ProductId = token.parse()?;
        if seen.insert(id) {
            ids.push(id);
        }
    }

    if ids.is_empty() {
        return Err(DomainError::NoIdentifiersProvided);
    }

    Ok(ids)
}
