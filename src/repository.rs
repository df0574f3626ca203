// Persistence ports
//
// One trait per entity. Services only talk to these, so SQLite (db.rs) and the
// in-memory store (memory.rs) are interchangeable. Every method returns
// anyhow::Result: storage failures are the adapter's business and pass
// through the services untouched.

use crate::entities::{Farm, Harvest, PlantedCulture, Producer};
use anyhow::Result;

/// Summable farm columns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AreaField {
    Total,
    Arable,
    Vegetation,
}

impl AreaField {
    pub fn column(&self) -> &'static str {
        match self {
            AreaField::Total => "total_area",
            AreaField::Arable => "arable_area",
            AreaField::Vegetation => "vegetation_area",
        }
    }

    pub fn of(&self, farm: &Farm) -> f64 {
        match self {
            AreaField::Total => farm.total_area,
            AreaField::Arable => farm.arable_area,
            AreaField::Vegetation => farm.vegetation_area,
        }
    }
}

pub trait ProducerRepository {
    fn create(&self, producer: &Producer) -> Result<Producer>;
    fn find_all(&self) -> Result<Vec<Producer>>;
    fn find_by_id(&self, id: &str) -> Result<Option<Producer>>;
    fn update(&self, producer: &Producer) -> Result<Producer>;
    fn delete(&self, id: &str) -> Result<()>;

    fn find_by_document(&self, document: &str) -> Result<Option<Producer>>;
}

pub trait FarmRepository {
    fn create(&self, farm: &Farm) -> Result<Farm>;
    fn find_all(&self) -> Result<Vec<Farm>>;
    fn find_by_id(&self, id: &str) -> Result<Option<Farm>>;
    fn update(&self, farm: &Farm) -> Result<Farm>;
    fn delete(&self, id: &str) -> Result<()>;

    fn find_by_producer_id(&self, producer_id: &str) -> Result<Vec<Farm>>;

    // Aggregates
    fn count(&self) -> Result<i64>;
    /// Sum of one area column; 0 when there are no farms
    fn sum_area(&self, field: AreaField) -> Result<f64>;
    /// (state code, farm count) pairs
    fn count_by_state(&self) -> Result<Vec<(String, i64)>>;
}

pub trait HarvestRepository {
    fn create(&self, harvest: &Harvest) -> Result<Harvest>;
    fn find_all(&self) -> Result<Vec<Harvest>>;
    fn find_by_id(&self, id: &str) -> Result<Option<Harvest>>;
    fn update(&self, harvest: &Harvest) -> Result<Harvest>;
    fn delete(&self, id: &str) -> Result<()>;

    fn find_by_year(&self, harvest_year: i32) -> Result<Vec<Harvest>>;
}

pub trait PlantedCultureRepository {
    fn create(&self, culture: &PlantedCulture) -> Result<PlantedCulture>;
    fn find_all(&self) -> Result<Vec<PlantedCulture>>;
    fn find_by_id(&self, id: &str) -> Result<Option<PlantedCulture>>;
    fn update(&self, culture: &PlantedCulture) -> Result<PlantedCulture>;
    fn delete(&self, id: &str) -> Result<()>;

    fn find_by_farm(&self, farm_id: &str) -> Result<Vec<PlantedCulture>>;
    fn find_by_harvest(&self, harvest_id: &str) -> Result<Vec<PlantedCulture>>;

    /// (culture name, number of distinct farms it is planted on)
    fn count_farms_by_culture(&self) -> Result<Vec<(String, i64)>>;
}

/// Everything the services need, in one bound
pub trait Store:
    ProducerRepository + FarmRepository + HarvestRepository + PlantedCultureRepository
{
}

impl<T> Store for T where
    T: ProducerRepository + FarmRepository + HarvestRepository + PlantedCultureRepository
{
}
