// Entity Models
//
// Each entity has:
// - Stable identity (UUID string) assigned at creation
// - Plain value fields, validated by the services before they reach storage
// - created_at / updated_at timestamps
// - A `New*` payload for creation and a `*Update` payload for partial updates

pub mod producer;
pub mod farm;
pub mod harvest;
pub mod planted_culture;

pub use producer::{Producer, NewProducer, ProducerUpdate};
pub use farm::{Farm, NewFarm, FarmUpdate, BrazilianState};
pub use harvest::{Harvest, NewHarvest, HarvestUpdate};
pub use planted_culture::{PlantedCulture, NewPlantedCulture, PlantedCultureUpdate};

/// Fresh identity for a new record
pub(crate) fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
