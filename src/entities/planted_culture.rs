// 🌱 Planted Culture Entity
//
// A crop (soy, corn, coffee, ...) planted on a farm during a harvest.
// The same culture name may appear many times on one farm.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlantedCulture {
    pub id: String,

    /// Culture name, e.g. "Soja"
    pub name: String,

    /// Planted hectares, always > 0
    pub area: f64,

    pub farm_id: String,
    pub harvest_id: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPlantedCulture {
    pub name: String,
    pub area: f64,
    pub farm_id: String,
    pub harvest_id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlantedCultureUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub area: Option<f64>,
    #[serde(default)]
    pub farm_id: Option<String>,
    #[serde(default)]
    pub harvest_id: Option<String>,
}

impl PlantedCulture {
    pub fn new(name: String, area: f64, farm_id: String, harvest_id: String) -> Self {
        let now = Utc::now();

        PlantedCulture {
            id: super::new_id(),
            name,
            area,
            farm_id,
            harvest_id,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, update: PlantedCultureUpdate) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(area) = update.area {
            self.area = area;
        }
        if let Some(farm_id) = update.farm_id {
            self.farm_id = farm_id;
        }
        if let Some(harvest_id) = update.harvest_id {
            self.harvest_id = harvest_id;
        }
        self.updated_at = Utc::now();
    }
}
