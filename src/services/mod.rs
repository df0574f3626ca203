// Entity lifecycle operations
//
// One service per entity. Each operation runs its preconditions (validation,
// existence guards) and then makes its persistence calls. Services are
// cheap borrows over a store and are built per request.
//
// Logging: every service owns a named span (its logging context) and enters
// it for the duration of each operation.

pub mod producer;
pub mod farm;
pub mod harvest;
pub mod planted_culture;

pub use producer::ProducerService;
pub use farm::FarmService;
pub use harvest::HarvestService;
pub use planted_culture::PlantedCultureService;

use crate::config::ReportLabels;
use crate::error::{AgroError, AgroResult};
use crate::report::ReportService;
use crate::repository::Store;

/// Reject empty or whitespace-only text; returns the trimmed value
pub fn require_non_empty(field: &'static str, value: String) -> AgroResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AgroError::EmptyField(field));
    }
    if trimmed.len() == value.len() {
        Ok(value)
    } else {
        Ok(trimmed.to_string())
    }
}

/// Validate an optional field of a partial update
pub(crate) fn optional_non_empty(
    field: &'static str,
    value: Option<String>,
) -> AgroResult<Option<String>> {
    value.map(|v| require_non_empty(field, v)).transpose()
}

/// All services over one store
pub struct Services<'a> {
    pub producers: ProducerService<'a>,
    pub farms: FarmService<'a>,
    pub harvests: HarvestService<'a>,
    pub cultures: PlantedCultureService<'a>,
    pub reports: ReportService<'a>,
}

impl<'a> Services<'a> {
    pub fn new<S: Store>(store: &'a S, labels: ReportLabels) -> Self {
        Services {
            producers: ProducerService::new(store),
            farms: FarmService::new(store, store),
            harvests: HarvestService::new(store),
            cultures: PlantedCultureService::new(store, store, store),
            reports: ReportService::new(store, store, labels),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_non_empty() {
        assert_eq!(require_non_empty("name", "Ana".to_string()).unwrap(), "Ana");
        assert_eq!(require_non_empty("name", "  Ana ".to_string()).unwrap(), "Ana");
        assert!(matches!(
            require_non_empty("city", "   ".to_string()),
            Err(AgroError::EmptyField("city"))
        ));
    }

    #[test]
    fn test_optional_non_empty() {
        assert_eq!(optional_non_empty("name", None).unwrap(), None);
        assert!(optional_non_empty("name", Some(String::new())).is_err());
    }
}
