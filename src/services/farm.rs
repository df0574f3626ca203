use crate::areas::{check_areas, check_update, FarmAreas};
use crate::entities::{BrazilianState, Farm, FarmUpdate, NewFarm};
use crate::error::{AgroError, AgroResult};
use crate::guard::ensure_exists;
use crate::repository::{FarmRepository, ProducerRepository};
use tracing::{debug, info, info_span, Span};

fn parse_state(code: &str) -> AgroResult<BrazilianState> {
    code.parse::<BrazilianState>().map_err(AgroError::InvalidState)
}

pub struct FarmService<'a> {
    farms: &'a dyn FarmRepository,
    producers: &'a dyn ProducerRepository,
    span: Span,
}

impl<'a> FarmService<'a> {
    pub fn new(farms: &'a dyn FarmRepository, producers: &'a dyn ProducerRepository) -> Self {
        FarmService {
            farms,
            producers,
            span: info_span!("FarmService"),
        }
    }

    fn ensure_producer(&self, producer_id: &str) -> AgroResult<()> {
        ensure_exists(
            producer_id,
            |id| self.producers.find_by_id(id),
            AgroError::ProducerNotFound,
        )
        .map(|_| ())
    }

    fn load(&self, id: &str) -> AgroResult<Farm> {
        ensure_exists(id, |id| self.farms.find_by_id(id), AgroError::FarmNotFound)
    }

    pub fn create(&self, new: NewFarm) -> AgroResult<Farm> {
        let _ctx = self.span.enter();
        info!(total_area = new.total_area, "[create] creating farm");

        let name = super::require_non_empty("name", new.name)?;
        let city = super::require_non_empty("city", new.city)?;
        let state = parse_state(&new.state)?;

        self.ensure_producer(&new.producer_id)?;
        check_areas(new.total_area, new.arable_area, new.vegetation_area)?;

        let areas = FarmAreas::new(new.total_area, new.arable_area, new.vegetation_area);
        let farm = self
            .farms
            .create(&Farm::new(name, state, city, areas, new.producer_id))?;
        info!(id = %farm.id, "[create] farm created");
        Ok(farm)
    }

    pub fn find_all(&self) -> AgroResult<Vec<Farm>> {
        let _ctx = self.span.enter();
        let farms = self.farms.find_all()?;
        info!(total = farms.len(), "[find_all] farms listed");
        Ok(farms)
    }

    pub fn find_by_id(&self, id: &str) -> AgroResult<Farm> {
        let _ctx = self.span.enter();
        self.load(id)
    }

    /// Farms of one producer; the producer itself must exist
    pub fn find_by_producer(&self, producer_id: &str) -> AgroResult<Vec<Farm>> {
        let _ctx = self.span.enter();
        self.ensure_producer(producer_id)?;

        let farms = self.farms.find_by_producer_id(producer_id)?;
        info!(producer_id = %producer_id, total = farms.len(), "[find_by_producer] farms listed");
        Ok(farms)
    }

    /// Partial update. Area fields left out of the payload keep their stored
    /// values, and the invariant is evaluated on the merged result.
    pub fn update(&self, id: &str, update: FarmUpdate) -> AgroResult<Farm> {
        let _ctx = self.span.enter();
        info!(id = %id, "[update] updating farm");

        let mut farm = self.load(id)?;

        if let Some(producer_id) = &update.producer_id {
            self.ensure_producer(producer_id)?;
        }

        if update.touches_areas() {
            let areas = check_update(
                Some(&farm.areas()),
                update.total_area,
                update.arable_area,
                update.vegetation_area,
            )?;
            debug!(used = areas.used_area(), total = areas.total_area, "[update] areas resolved");
            farm.set_areas(areas);
        }

        if let Some(name) = super::optional_non_empty("name", update.name)? {
            farm.name = name;
        }
        if let Some(city) = super::optional_non_empty("city", update.city)? {
            farm.city = city;
        }
        if let Some(code) = update.state {
            farm.state = parse_state(&code)?;
        }
        if let Some(producer_id) = update.producer_id {
            farm.producer_id = producer_id;
        }

        farm.touch();
        let farm = self.farms.update(&farm)?;
        info!(id = %id, "[update] farm updated");
        Ok(farm)
    }

    pub fn delete(&self, id: &str) -> AgroResult<()> {
        let _ctx = self.span.enter();
        info!(id = %id, "[delete] removing farm");

        self.load(id)?;
        self.farms.delete(id)?;
        info!(id = %id, "[delete] farm removed");
        Ok(())
    }
}
