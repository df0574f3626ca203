use crate::entities::{Harvest, HarvestUpdate, NewHarvest};
use crate::error::{AgroError, AgroResult};
use crate::guard::ensure_exists;
use crate::repository::HarvestRepository;
use tracing::{info, info_span, Span};

pub struct HarvestService<'a> {
    harvests: &'a dyn HarvestRepository,
    span: Span,
}

impl<'a> HarvestService<'a> {
    pub fn new(harvests: &'a dyn HarvestRepository) -> Self {
        HarvestService {
            harvests,
            span: info_span!("HarvestService"),
        }
    }

    fn load(&self, id: &str) -> AgroResult<Harvest> {
        ensure_exists(id, |id| self.harvests.find_by_id(id), AgroError::HarvestNotFound)
    }

    pub fn create(&self, new: NewHarvest) -> AgroResult<Harvest> {
        let _ctx = self.span.enter();
        info!(harvest_year = new.harvest_year, "[create] creating harvest");

        let name = super::require_non_empty("name", new.name)?;
        let harvest = self.harvests.create(&Harvest::new(name, new.harvest_year))?;
        info!(id = %harvest.id, "[create] harvest created");
        Ok(harvest)
    }

    pub fn find_all(&self) -> AgroResult<Vec<Harvest>> {
        let _ctx = self.span.enter();
        let harvests = self.harvests.find_all()?;
        info!(total = harvests.len(), "[find_all] harvests listed");
        Ok(harvests)
    }

    pub fn find_by_id(&self, id: &str) -> AgroResult<Harvest> {
        let _ctx = self.span.enter();
        self.load(id)
    }

    pub fn find_by_year(&self, harvest_year: i32) -> AgroResult<Vec<Harvest>> {
        let _ctx = self.span.enter();
        let harvests = self.harvests.find_by_year(harvest_year)?;
        info!(harvest_year, total = harvests.len(), "[find_by_year] harvests listed");
        Ok(harvests)
    }

    pub fn update(&self, id: &str, update: HarvestUpdate) -> AgroResult<Harvest> {
        let _ctx = self.span.enter();
        info!(id = %id, "[update] updating harvest");

        let mut harvest = self.load(id)?;
        let name = super::optional_non_empty("name", update.name)?;
        harvest.apply(HarvestUpdate {
            name,
            harvest_year: update.harvest_year,
        });

        let harvest = self.harvests.update(&harvest)?;
        info!(id = %id, "[update] harvest updated");
        Ok(harvest)
    }

    pub fn delete(&self, id: &str) -> AgroResult<()> {
        let _ctx = self.span.enter();
        info!(id = %id, "[delete] removing harvest");

        self.load(id)?;
        self.harvests.delete(id)?;
        info!(id = %id, "[delete] harvest removed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;

    fn safra(year: i32) -> NewHarvest {
        NewHarvest {
            name: format!("Safra {}", year),
            harvest_year: year,
        }
    }

    #[test]
    fn test_create_and_find_by_year() {
        let store = MemoryStore::new();
        let service = HarvestService::new(&store);

        service.create(safra(2023)).unwrap();
        let h2024 = service.create(safra(2024)).unwrap();
        service
            .create(NewHarvest {
                name: "Safrinha 2024".to_string(),
                harvest_year: 2024,
            })
            .unwrap();

        let found = service.find_by_year(2024).unwrap();
        assert_eq!(found.len(), 2);
        assert!(found.iter().any(|h| h.id == h2024.id));
        assert!(service.find_by_year(1999).unwrap().is_empty());
        assert_eq!(service.find_all().unwrap().len(), 3);
    }

    #[test]
    fn test_update_harvest() {
        let store = MemoryStore::new();
        let service = HarvestService::new(&store);
        let harvest = service.create(safra(2023)).unwrap();

        let updated = service
            .update(
                &harvest.id,
                HarvestUpdate {
                    name: Some("Safra 23/24".to_string()),
                    harvest_year: None,
                },
            )
            .unwrap();
        assert_eq!(updated.name, "Safra 23/24");
        assert_eq!(updated.harvest_year, 2023);

        assert!(matches!(
            service.update(
                &harvest.id,
                HarvestUpdate {
                    name: Some(String::new()),
                    harvest_year: None,
                },
            ),
            Err(AgroError::EmptyField("name"))
        ));
    }

    #[test]
    fn test_missing_harvest() {
        let store = MemoryStore::new();
        let service = HarvestService::new(&store);

        assert!(matches!(
            service.find_by_id("nope"),
            Err(AgroError::HarvestNotFound(_))
        ));
        assert!(matches!(
            service.delete("nope"),
            Err(AgroError::HarvestNotFound(_))
        ));
    }

    #[test]
    fn test_delete_then_find_fails() {
        let store = MemoryStore::new();
        let service = HarvestService::new(&store);
        let harvest = service.create(safra(2022)).unwrap();

        service.delete(&harvest.id).unwrap();
        assert!(matches!(
            service.find_by_id(&harvest.id),
            Err(AgroError::HarvestNotFound(_))
        ));
    }
}
