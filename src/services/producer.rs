use crate::document;
use crate::entities::{NewProducer, Producer, ProducerUpdate};
use crate::error::{AgroError, AgroResult};
use crate::guard::ensure_exists;
use crate::repository::ProducerRepository;
use tracing::{debug, info, info_span, warn, Span};

pub struct ProducerService<'a> {
    producers: &'a dyn ProducerRepository,
    span: Span,
}

impl<'a> ProducerService<'a> {
    pub fn new(producers: &'a dyn ProducerRepository) -> Self {
        ProducerService {
            producers,
            span: info_span!("ProducerService"),
        }
    }

    /// Fails with `ProducerAlreadyExists` when another producer holds `document`
    fn ensure_document_free(&self, document: &str, owner: Option<&str>) -> AgroResult<()> {
        debug!(document = %document, "checking document uniqueness");
        match self.producers.find_by_document(document)? {
            Some(existing) if Some(existing.id.as_str()) != owner => {
                warn!(document = %document, "document already registered");
                Err(AgroError::ProducerAlreadyExists(document.to_string()))
            }
            _ => Ok(()),
        }
    }

    pub fn create(&self, new: NewProducer) -> AgroResult<Producer> {
        let _ctx = self.span.enter();
        info!(document = %new.document, "[create] creating producer");

        let name = super::require_non_empty("name", new.name)?;
        let document = document::normalize(&new.document)?;
        self.ensure_document_free(&document, None)?;

        let producer = self.producers.create(&Producer::new(name, document))?;
        info!(id = %producer.id, "[create] producer created");
        Ok(producer)
    }

    pub fn find_all(&self) -> AgroResult<Vec<Producer>> {
        let _ctx = self.span.enter();
        let producers = self.producers.find_all()?;
        info!(total = producers.len(), "[find_all] producers listed");
        Ok(producers)
    }

    pub fn find_by_id(&self, id: &str) -> AgroResult<Producer> {
        let _ctx = self.span.enter();
        ensure_exists(id, |id| self.producers.find_by_id(id), AgroError::ProducerNotFound)
    }

    pub fn update(&self, id: &str, update: ProducerUpdate) -> AgroResult<Producer> {
        let _ctx = self.span.enter();
        info!(id = %id, "[update] updating producer");
        if update.is_empty() {
            debug!(id = %id, "[update] empty payload");
        }

        let mut producer =
            ensure_exists(id, |id| self.producers.find_by_id(id), AgroError::ProducerNotFound)?;

        let name = super::optional_non_empty("name", update.name)?;
        let document = match update.document {
            Some(raw) => {
                let canonical = document::normalize(&raw)?;
                self.ensure_document_free(&canonical, Some(id))?;
                Some(canonical)
            }
            None => None,
        };

        producer.apply(ProducerUpdate { name, document });
        let producer = self.producers.update(&producer)?;
        info!(id = %id, "[update] producer updated");
        Ok(producer)
    }

    pub fn delete(&self, id: &str) -> AgroResult<()> {
        let _ctx = self.span.enter();
        info!(id = %id, "[delete] removing producer");

        ensure_exists(id, |id| self.producers.find_by_id(id), AgroError::ProducerNotFound)?;
        self.producers.delete(id)?;
        info!(id = %id, "[delete] producer removed");
        Ok(())
    }
}
