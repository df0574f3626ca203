// In-memory persistence adapter
//
// Same ports as the SQLite store, backed by Vec tables behind RwLocks.
// Used by the tests and by `--memory` server mode. Mirrors the SQLite
// constraints that matter to callers: unique producer documents and
// foreign keys on create/update/delete.

use crate::entities::{Farm, Harvest, PlantedCulture, Producer};
use crate::repository::{
    AreaField, FarmRepository, HarvestRepository, PlantedCultureRepository, ProducerRepository,
};
use anyhow::{anyhow, bail, Result};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Records in insertion order
struct Table<T> {
    rows: Arc<RwLock<Vec<T>>>,
}

impl<T: Clone> Table<T> {
    fn new() -> Self {
        Table {
            rows: Arc::new(RwLock::new(Vec::new())),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Vec<T>>> {
        self.rows.read().map_err(|_| anyhow!("in-memory table lock poisoned"))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Vec<T>>> {
        self.rows.write().map_err(|_| anyhow!("in-memory table lock poisoned"))
    }

    fn filter<F>(&self, pred: F) -> Result<Vec<T>>
    where
        F: Fn(&T) -> bool,
    {
        Ok(self.read()?.iter().filter(|r| pred(r)).cloned().collect())
    }

    fn find<F>(&self, pred: F) -> Result<Option<T>>
    where
        F: Fn(&T) -> bool,
    {
        Ok(self.read()?.iter().find(|r| pred(r)).cloned())
    }

    fn any<F>(&self, pred: F) -> Result<bool>
    where
        F: Fn(&T) -> bool,
    {
        Ok(self.read()?.iter().any(|r| pred(r)))
    }

    fn replace<F>(&self, record: &T, is_same: F, table: &str) -> Result<T>
    where
        F: Fn(&T) -> bool,
    {
        let mut rows = self.write()?;
        match rows.iter_mut().find(|r| is_same(r)) {
            Some(slot) => {
                *slot = record.clone();
                Ok(record.clone())
            }
            None => bail!("No {} row to update", table),
        }
    }

    fn remove<F>(&self, is_same: F) -> Result<()>
    where
        F: Fn(&T) -> bool,
    {
        self.write()?.retain(|r| !is_same(r));
        Ok(())
    }
}

pub struct MemoryStore {
    producers: Table<Producer>,
    farms: Table<Farm>,
    harvests: Table<Harvest>,
    cultures: Table<PlantedCulture>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore {
            producers: Table::new(),
            farms: Table::new(),
            harvests: Table::new(),
            cultures: Table::new(),
        }
    }

    fn check_farm_refs(&self, farm: &Farm) -> Result<()> {
        if !self.producers.any(|p| p.id == farm.producer_id)? {
            bail!("FOREIGN KEY constraint failed: farms.producer_id");
        }
        Ok(())
    }

    fn check_culture_refs(&self, culture: &PlantedCulture) -> Result<()> {
        if !self.farms.any(|f| f.id == culture.farm_id)? {
            bail!("FOREIGN KEY constraint failed: planted_cultures.farm_id");
        }
        if !self.harvests.any(|h| h.id == culture.harvest_id)? {
            bail!("FOREIGN KEY constraint failed: planted_cultures.harvest_id");
        }
        Ok(())
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ProducerRepository for MemoryStore {
    fn create(&self, producer: &Producer) -> Result<Producer> {
        if self.producers.any(|p| p.document == producer.document)? {
            bail!("UNIQUE constraint failed: producers.document");
        }
        self.producers.write()?.push(producer.clone());
        Ok(producer.clone())
    }

    fn find_all(&self) -> Result<Vec<Producer>> {
        self.producers.filter(|_| true)
    }

    fn find_by_id(&self, id: &str) -> Result<Option<Producer>> {
        self.producers.find(|p| p.id == id)
    }

    fn update(&self, producer: &Producer) -> Result<Producer> {
        if self
            .producers
            .any(|p| p.document == producer.document && p.id != producer.id)?
        {
            bail!("UNIQUE constraint failed: producers.document");
        }
        self.producers.replace(producer, |p| p.id == producer.id, "producers")
    }

    fn delete(&self, id: &str) -> Result<()> {
        if self.farms.any(|f| f.producer_id == id)? {
            bail!("FOREIGN KEY constraint failed: producer {} still owns farms", id);
        }
        self.producers.remove(|p| p.id == id)
    }

    fn find_by_document(&self, document: &str) -> Result<Option<Producer>> {
        self.producers.find(|p| p.document == document)
    }
}

impl FarmRepository for MemoryStore {
    fn create(&self, farm: &Farm) -> Result<Farm> {
        self.check_farm_refs(farm)?;
        self.farms.write()?.push(farm.clone());
        Ok(farm.clone())
    }

    fn find_all(&self) -> Result<Vec<Farm>> {
        self.farms.filter(|_| true)
    }

    fn find_by_id(&self, id: &str) -> Result<Option<Farm>> {
        self.farms.find(|f| f.id == id)
    }

    fn update(&self, farm: &Farm) -> Result<Farm> {
        self.check_farm_refs(farm)?;
        self.farms.replace(farm, |f| f.id == farm.id, "farms")
    }

    fn delete(&self, id: &str) -> Result<()> {
        if self.cultures.any(|c| c.farm_id == id)? {
            bail!("FOREIGN KEY constraint failed: farm {} still has planted cultures", id);
        }
        self.farms.remove(|f| f.id == id)
    }

    fn find_by_producer_id(&self, producer_id: &str) -> Result<Vec<Farm>> {
        self.farms.filter(|f| f.producer_id == producer_id)
    }

    fn count(&self) -> Result<i64> {
        Ok(self.farms.read()?.len() as i64)
    }

    fn sum_area(&self, field: AreaField) -> Result<f64> {
        Ok(self.farms.read()?.iter().map(|f| field.of(f)).sum())
    }

    fn count_by_state(&self) -> Result<Vec<(String, i64)>> {
        let mut counts: BTreeMap<String, i64> = BTreeMap::new();
        for farm in self.farms.read()?.iter() {
            *counts.entry(farm.state.as_str().to_string()).or_insert(0) += 1;
        }
        Ok(counts.into_iter().collect())
    }
}

impl HarvestRepository for MemoryStore {
    fn create(&self, harvest: &Harvest) -> Result<Harvest> {
        self.harvests.write()?.push(harvest.clone());
        Ok(harvest.clone())
    }

    fn find_all(&self) -> Result<Vec<Harvest>> {
        self.harvests.filter(|_| true)
    }

    fn find_by_id(&self, id: &str) -> Result<Option<Harvest>> {
        self.harvests.find(|h| h.id == id)
    }

    fn update(&self, harvest: &Harvest) -> Result<Harvest> {
        self.harvests.replace(harvest, |h| h.id == harvest.id, "harvests")
    }

    fn delete(&self, id: &str) -> Result<()> {
        if self.cultures.any(|c| c.harvest_id == id)? {
            bail!("FOREIGN KEY constraint failed: harvest {} still has planted cultures", id);
        }
        self.harvests.remove(|h| h.id == id)
    }

    fn find_by_year(&self, harvest_year: i32) -> Result<Vec<Harvest>> {
        self.harvests.filter(|h| h.harvest_year == harvest_year)
    }
}

impl PlantedCultureRepository for MemoryStore {
    fn create(&self, culture: &PlantedCulture) -> Result<PlantedCulture> {
        self.check_culture_refs(culture)?;
        self.cultures.write()?.push(culture.clone());
        Ok(culture.clone())
    }

    fn find_all(&self) -> Result<Vec<PlantedCulture>> {
        self.cultures.filter(|_| true)
    }

    fn find_by_id(&self, id: &str) -> Result<Option<PlantedCulture>> {
        self.cultures.find(|c| c.id == id)
    }

    fn update(&self, culture: &PlantedCulture) -> Result<PlantedCulture> {
        self.check_culture_refs(culture)?;
        self.cultures
            .replace(culture, |c| c.id == culture.id, "planted_cultures")
    }

    fn delete(&self, id: &str) -> Result<()> {
        self.cultures.remove(|c| c.id == id)
    }

    fn find_by_farm(&self, farm_id: &str) -> Result<Vec<PlantedCulture>> {
        self.cultures.filter(|c| c.farm_id == farm_id)
    }

    fn find_by_harvest(&self, harvest_id: &str) -> Result<Vec<PlantedCulture>> {
        self.cultures.filter(|c| c.harvest_id == harvest_id)
    }

    fn count_farms_by_culture(&self) -> Result<Vec<(String, i64)>> {
        let mut farms_by_name: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for culture in self.cultures.read()?.iter() {
            farms_by_name
                .entry(culture.name.clone())
                .or_default()
                .insert(culture.farm_id.clone());
        }
        Ok(farms_by_name
            .into_iter()
            .map(|(name, farms)| (name, farms.len() as i64))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::areas::FarmAreas;
    use crate::entities::BrazilianState;

    fn seeded() -> (MemoryStore, Producer, Farm, Harvest) {
        let store = MemoryStore::new();
        let producer = Producer::new("Maria".to_string(), "529.982.247-25".to_string());
        ProducerRepository::create(&store, &producer).unwrap();

        let farm = Farm::new(
            "Sítio Alegre".to_string(),
            BrazilianState::Pr,
            "Londrina".to_string(),
            FarmAreas::new(40.0, 20.0, 10.0),
            producer.id.clone(),
        );
        FarmRepository::create(&store, &farm).unwrap();

        let harvest = Harvest::new("Safra 2025".to_string(), 2025);
        HarvestRepository::create(&store, &harvest).unwrap();

        (store, producer, farm, harvest)
    }

    #[test]
    fn test_unique_document() {
        let (store, producer, _, _) = seeded();
        let twin = Producer::new("Twin".to_string(), producer.document.clone());
        assert!(ProducerRepository::create(&store, &twin).is_err());
    }

    #[test]
    fn test_foreign_keys_enforced() {
        let (store, producer, farm, harvest) = seeded();

        let orphan = PlantedCulture::new(
            "Café".to_string(),
            1.0,
            "missing-farm".to_string(),
            harvest.id.clone(),
        );
        assert!(PlantedCultureRepository::create(&store, &orphan).is_err());

        // Producer still owns a farm
        assert!(ProducerRepository::delete(&store, &producer.id).is_err());

        let culture = PlantedCulture::new("Café".to_string(), 1.0, farm.id.clone(), harvest.id);
        PlantedCultureRepository::create(&store, &culture).unwrap();
        assert!(FarmRepository::delete(&store, &farm.id).is_err());
    }

    #[test]
    fn test_update_replaces_in_place() {
        let (store, _, mut farm, _) = seeded();
        farm.city = "Maringá".to_string();
        FarmRepository::update(&store, &farm).unwrap();

        let loaded = FarmRepository::find_by_id(&store, &farm.id).unwrap().unwrap();
        assert_eq!(loaded.city, "Maringá");
        assert_eq!(FarmRepository::find_all(&store).unwrap().len(), 1);
    }

    #[test]
    fn test_aggregates() {
        let (store, _, farm, harvest) = seeded();
        for name in ["Soja", "Soja", "Milho"] {
            let culture =
                PlantedCulture::new(name.to_string(), 2.0, farm.id.clone(), harvest.id.clone());
            PlantedCultureRepository::create(&store, &culture).unwrap();
        }

        assert_eq!(store.sum_area(AreaField::Total).unwrap(), 40.0);
        assert_eq!(store.count_by_state().unwrap(), vec![("PR".to_string(), 1)]);
        assert_eq!(
            store.count_farms_by_culture().unwrap(),
            vec![("Milho".to_string(), 1), ("Soja".to_string(), 1)]
        );
    }

    #[test]
    fn test_empty_sums_are_zero() {
        let store = MemoryStore::new();
        assert_eq!(store.sum_area(AreaField::Vegetation).unwrap(), 0.0);
        assert_eq!(FarmRepository::count(&store).unwrap(), 0);
    }
}
