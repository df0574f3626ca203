// 🧑‍🌾 Producer Entity
//
// A rural producer, identified by a CPF (person) or CNPJ (company).
// The document is stored in canonical punctuated form and is unique.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Producer {
    pub id: String,
    pub name: String,

    /// Canonical CPF/CNPJ, e.g. "123.456.789-09"
    pub document: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Creation payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProducer {
    pub name: String,
    pub document: String,
}

/// Partial update payload; `None` keeps the stored value
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProducerUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub document: Option<String>,
}

impl Producer {
    /// Build a new record. `document` must already be canonical.
    pub fn new(name: String, document: String) -> Self {
        let now = Utc::now();

        Producer {
            id: super::new_id(),
            name,
            document,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply an already-validated update and bump `updated_at`
    pub fn apply(&mut self, update: ProducerUpdate) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(document) = update.document {
            self.document = document;
        }
        self.updated_at = Utc::now();
    }
}

impl ProducerUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.document.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_producer_creation() {
        let producer = Producer::new("João Silva".to_string(), "123.456.789-09".to_string());

        assert!(!producer.id.is_empty());
        assert_eq!(producer.name, "João Silva");
        assert_eq!(producer.created_at, producer.updated_at);
    }

    #[test]
    fn test_apply_keeps_identity() {
        let mut producer = Producer::new("A".to_string(), "123.456.789-09".to_string());
        let id = producer.id.clone();

        producer.apply(ProducerUpdate {
            name: Some("B".to_string()),
            document: None,
        });

        assert_eq!(producer.id, id);
        assert_eq!(producer.name, "B");
        assert_eq!(producer.document, "123.456.789-09");
        assert!(producer.updated_at >= producer.created_at);
    }

    #[test]
    fn test_json_uses_camel_case() {
        let producer = Producer::new("A".to_string(), "123.456.789-09".to_string());
        let json = serde_json::to_value(&producer).unwrap();
        assert!(json.get("createdAt").is_some());
        assert!(json.get("created_at").is_none());

        let update: ProducerUpdate = serde_json::from_str(r#"{"name":"C"}"#).unwrap();
        assert_eq!(update.name.as_deref(), Some("C"));
        assert!(update.document.is_none());
        assert!(!update.is_empty());
    }
}
