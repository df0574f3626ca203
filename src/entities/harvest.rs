// Harvest Entity - a named crop season, e.g. "Safra 2024"

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Harvest {
    pub id: String,
    pub name: String,
    pub harvest_year: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewHarvest {
    pub name: String,
    pub harvest_year: i32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HarvestUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub harvest_year: Option<i32>,
}

impl Harvest {
    pub fn new(name: String, harvest_year: i32) -> Self {
        let now = Utc::now();

        Harvest {
            id: super::new_id(),
            name,
            harvest_year,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, update: HarvestUpdate) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(year) = update.harvest_year {
            self.harvest_year = year;
        }
        self.updated_at = Utc::now();
    }
}
