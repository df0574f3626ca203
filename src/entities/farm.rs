// 🌾 Farm Entity
//
// A farm belongs to one producer and sits in one of the 27 Brazilian
// federative units. Its areas satisfy arable + vegetation <= total.

use crate::areas::FarmAreas;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// BRAZILIAN STATE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BrazilianState {
    Ac, Al, Ap, Am, Ba, Ce, Df, Es, Go,
    Ma, Mt, Ms, Mg, Pa, Pb, Pr, Pe, Pi,
    Rj, Rn, Rs, Ro, Rr, Sc, Sp, Se, To,
}

impl BrazilianState {
    pub const ALL: [BrazilianState; 27] = [
        BrazilianState::Ac, BrazilianState::Al, BrazilianState::Ap,
        BrazilianState::Am, BrazilianState::Ba, BrazilianState::Ce,
        BrazilianState::Df, BrazilianState::Es, BrazilianState::Go,
        BrazilianState::Ma, BrazilianState::Mt, BrazilianState::Ms,
        BrazilianState::Mg, BrazilianState::Pa, BrazilianState::Pb,
        BrazilianState::Pr, BrazilianState::Pe, BrazilianState::Pi,
        BrazilianState::Rj, BrazilianState::Rn, BrazilianState::Rs,
        BrazilianState::Ro, BrazilianState::Rr, BrazilianState::Sc,
        BrazilianState::Sp, BrazilianState::Se, BrazilianState::To,
    ];

    /// Two-letter code, e.g. "SP"
    pub fn as_str(&self) -> &'static str {
        match self {
            BrazilianState::Ac => "AC",
            BrazilianState::Al => "AL",
            BrazilianState::Ap => "AP",
            BrazilianState::Am => "AM",
            BrazilianState::Ba => "BA",
            BrazilianState::Ce => "CE",
            BrazilianState::Df => "DF",
            BrazilianState::Es => "ES",
            BrazilianState::Go => "GO",
            BrazilianState::Ma => "MA",
            BrazilianState::Mt => "MT",
            BrazilianState::Ms => "MS",
            BrazilianState::Mg => "MG",
            BrazilianState::Pa => "PA",
            BrazilianState::Pb => "PB",
            BrazilianState::Pr => "PR",
            BrazilianState::Pe => "PE",
            BrazilianState::Pi => "PI",
            BrazilianState::Rj => "RJ",
            BrazilianState::Rn => "RN",
            BrazilianState::Rs => "RS",
            BrazilianState::Ro => "RO",
            BrazilianState::Rr => "RR",
            BrazilianState::Sc => "SC",
            BrazilianState::Sp => "SP",
            BrazilianState::Se => "SE",
            BrazilianState::To => "TO",
        }
    }
}

impl FromStr for BrazilianState {
    type Err = String;

    /// Exact uppercase code only
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BrazilianState::ALL
            .iter()
            .copied()
            .find(|state| state.as_str() == s)
            .ok_or_else(|| s.to_string())
    }
}

impl fmt::Display for BrazilianState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// FARM ENTITY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Farm {
    pub id: String,
    pub name: String,
    pub state: BrazilianState,
    pub city: String,

    // Hectares
    pub total_area: f64,
    pub arable_area: f64,
    pub vegetation_area: f64,

    /// Owning producer
    pub producer_id: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Creation payload. `state` is parsed by the service so unknown codes map to a domain error.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFarm {
    pub name: String,
    pub state: String,
    pub city: String,
    pub total_area: f64,
    pub arable_area: f64,
    pub vegetation_area: f64,
    pub producer_id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FarmUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub total_area: Option<f64>,
    #[serde(default)]
    pub arable_area: Option<f64>,
    #[serde(default)]
    pub vegetation_area: Option<f64>,
    #[serde(default)]
    pub producer_id: Option<String>,
}

impl Farm {
    pub fn new(
        name: String,
        state: BrazilianState,
        city: String,
        areas: FarmAreas,
        producer_id: String,
    ) -> Self {
        let now = Utc::now();

        Farm {
            id: super::new_id(),
            name,
            state,
            city,
            total_area: areas.total_area,
            arable_area: areas.arable_area,
            vegetation_area: areas.vegetation_area,
            producer_id,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn areas(&self) -> FarmAreas {
        FarmAreas::new(self.total_area, self.arable_area, self.vegetation_area)
    }

    pub fn set_areas(&mut self, areas: FarmAreas) {
        self.total_area = areas.total_area;
        self.arable_area = areas.arable_area;
        self.vegetation_area = areas.vegetation_area;
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl FarmUpdate {
    /// True when the update changes any of the three areas
    pub fn touches_areas(&self) -> bool {
        self.total_area.is_some() || self.arable_area.is_some() || self.vegetation_area.is_some()
    }
}
