// Entity existence guard
// Shared referential-integrity check: look the id up, fail with the entity's NotFound.

use crate::error::{AgroError, AgroResult};

/// Look up `id` and return the record, or `not_found(id)` when absent.
///
/// Lookup failures (storage errors) propagate unchanged.
pub fn ensure_exists<T, L, N>(id: &str, lookup: L, not_found: N) -> AgroResult<T>
where
    L: FnOnce(&str) -> anyhow::Result<Option<T>>,
    N: FnOnce(String) -> AgroError,
{
    match lookup(id)? {
        Some(record) => Ok(record),
        None => {
            tracing::warn!(id = %id, "referenced record not found");
            Err(not_found(id.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_present_record_returned() {
        let found = ensure_exists(
            "a",
            |id| Ok(Some(format!("record {}", id))),
            AgroError::FarmNotFound,
        )
        .unwrap();
        assert_eq!(found, "record a");
    }

    #[test]
    fn test_absent_record_maps_to_not_found() {
        let result: AgroResult<String> =
            ensure_exists("missing", |_| Ok(None), AgroError::HarvestNotFound);
        match result {
            Err(AgroError::HarvestNotFound(id)) => assert_eq!(id, "missing"),
            other => panic!("expected HarvestNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_lookup_error_propagates() {
        let result: AgroResult<String> = ensure_exists(
            "x",
            |_| Err(anyhow::anyhow!("database is locked")),
            AgroError::ProducerNotFound,
        );
        assert!(matches!(result, Err(AgroError::Storage(_))));
    }
}
