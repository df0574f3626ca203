use crate::entities::{NewPlantedCulture, PlantedCulture, PlantedCultureUpdate};
use crate::error::{AgroError, AgroResult};
use crate::guard::ensure_exists;
use crate::repository::{FarmRepository, HarvestRepository, PlantedCultureRepository};
use tracing::{info, info_span, Span};

/// Planted area must be a positive, finite number of hectares
fn check_planted_area(area: f64) -> AgroResult<f64> {
    if area.is_finite() && area > 0.0 {
        Ok(area)
    } else {
        Err(AgroError::InvalidPlantedArea(area))
    }
}

pub struct PlantedCultureService<'a> {
    cultures: &'a dyn PlantedCultureRepository,
    farms: &'a dyn FarmRepository,
    harvests: &'a dyn HarvestRepository,
    span: Span,
}

impl<'a> PlantedCultureService<'a> {
    pub fn new(
        cultures: &'a dyn PlantedCultureRepository,
        farms: &'a dyn FarmRepository,
        harvests: &'a dyn HarvestRepository,
    ) -> Self {
        PlantedCultureService {
            cultures,
            farms,
            harvests,
            span: info_span!("PlantedCultureService"),
        }
    }

    fn ensure_farm(&self, farm_id: &str) -> AgroResult<()> {
        ensure_exists(farm_id, |id| self.farms.find_by_id(id), AgroError::FarmNotFound)
            .map(|_| ())
    }

    fn ensure_harvest(&self, harvest_id: &str) -> AgroResult<()> {
        ensure_exists(
            harvest_id,
            |id| self.harvests.find_by_id(id),
            AgroError::HarvestNotFound,
        )
        .map(|_| ())
    }

    fn load(&self, id: &str) -> AgroResult<PlantedCulture> {
        ensure_exists(
            id,
            |id| self.cultures.find_by_id(id),
            AgroError::PlantedCultureNotFound,
        )
    }

    pub fn create(&self, new: NewPlantedCulture) -> AgroResult<PlantedCulture> {
        let _ctx = self.span.enter();
        info!(farm_id = %new.farm_id, harvest_id = %new.harvest_id, "[create] planting culture");

        let name = super::require_non_empty("name", new.name)?;
        let area = check_planted_area(new.area)?;
        self.ensure_farm(&new.farm_id)?;
        self.ensure_harvest(&new.harvest_id)?;

        let culture = self.cultures.create(&PlantedCulture::new(
            name,
            area,
            new.farm_id,
            new.harvest_id,
        ))?;
        info!(id = %culture.id, "[create] culture planted");
        Ok(culture)
    }

    pub fn find_all(&self) -> AgroResult<Vec<PlantedCulture>> {
        let _ctx = self.span.enter();
        let cultures = self.cultures.find_all()?;
        info!(total = cultures.len(), "[find_all] cultures listed");
        Ok(cultures)
    }

    pub fn find_by_id(&self, id: &str) -> AgroResult<PlantedCulture> {
        let _ctx = self.span.enter();
        self.load(id)
    }

    pub fn find_by_farm(&self, farm_id: &str) -> AgroResult<Vec<PlantedCulture>> {
        let _ctx = self.span.enter();
        self.ensure_farm(farm_id)?;

        let cultures = self.cultures.find_by_farm(farm_id)?;
        info!(farm_id = %farm_id, total = cultures.len(), "[find_by_farm] cultures listed");
        Ok(cultures)
    }

    pub fn find_by_harvest(&self, harvest_id: &str) -> AgroResult<Vec<PlantedCulture>> {
        let _ctx = self.span.enter();
        self.ensure_harvest(harvest_id)?;

        let cultures = self.cultures.find_by_harvest(harvest_id)?;
        info!(harvest_id = %harvest_id, total = cultures.len(), "[find_by_harvest] cultures listed");
        Ok(cultures)
    }

    pub fn update(&self, id: &str, update: PlantedCultureUpdate) -> AgroResult<PlantedCulture> {
        let _ctx = self.span.enter();
        info!(id = %id, "[update] updating culture");

        let mut culture = self.load(id)?;

        let name = super::optional_non_empty("name", update.name)?;
        let area = update.area.map(check_planted_area).transpose()?;
        if let Some(farm_id) = &update.farm_id {
            self.ensure_farm(farm_id)?;
        }
        if let Some(harvest_id) = &update.harvest_id {
            self.ensure_harvest(harvest_id)?;
        }

        culture.apply(PlantedCultureUpdate {
            name,
            area,
            farm_id: update.farm_id,
            harvest_id: update.harvest_id,
        });
        let culture = self.cultures.update(&culture)?;
        info!(id = %id, "[update] culture updated");
        Ok(culture)
    }

    pub fn delete(&self, id: &str) -> AgroResult<()> {
        let _ctx = self.span.enter();
        info!(id = %id, "[delete] removing culture");

        self.load(id)?;
        self.cultures.delete(id)?;
        info!(id = %id, "[delete] culture removed");
        Ok(())
    }
}
