// 📊 Aggregate Reports
//
// Dashboard figures over the whole record set: farm counts, area sums and the
// three pie-chart distributions (state, culture, land use). Read-only.

use crate::config::ReportLabels;
use crate::error::AgroResult;
use crate::repository::{AreaField, FarmRepository, PlantedCultureRepository};
use serde::{Deserialize, Serialize};
use tracing::{info, info_span, Span};

// ============================================================================
// RESPONSE SHAPES
// ============================================================================

/// Pie-chart payload: `labels[i]` pairs with `data[i]`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub data: Vec<f64>,
}

impl ChartData {
    fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, f64)>,
    {
        let (labels, data) = pairs.into_iter().unzip();
        ChartData { labels, data }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartItem {
    pub name: String,
    pub value: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryMetrics {
    pub farms_by_state: Vec<ChartItem>,
    pub total_area: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FarmSummary {
    pub total_farms: i64,
    pub total_area: f64,
    pub total_arable_area: f64,
    pub total_vegetation_area: f64,
    pub metrics: SummaryMetrics,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaTotals {
    pub total_area: f64,
    pub total_arable_area: f64,
    pub total_vegetation_area: f64,
    pub unit: String,
}

pub const AREA_UNIT: &str = "hectares";

// ============================================================================
// REPORT SERVICE
// ============================================================================

pub struct ReportService<'a> {
    farms: &'a dyn FarmRepository,
    cultures: &'a dyn PlantedCultureRepository,
    labels: ReportLabels,
    span: Span,
}

impl<'a> ReportService<'a> {
    pub fn new(
        farms: &'a dyn FarmRepository,
        cultures: &'a dyn PlantedCultureRepository,
        labels: ReportLabels,
    ) -> Self {
        ReportService {
            farms,
            cultures,
            labels,
            span: info_span!("ReportService"),
        }
    }

    pub fn total_count(&self) -> AgroResult<i64> {
        Ok(self.farms.count()?)
    }

    pub fn total_area(&self) -> AgroResult<f64> {
        Ok(self.farms.sum_area(AreaField::Total)?)
    }

    pub fn total_arable_area(&self) -> AgroResult<f64> {
        Ok(self.farms.sum_area(AreaField::Arable)?)
    }

    pub fn total_vegetation_area(&self) -> AgroResult<f64> {
        Ok(self.farms.sum_area(AreaField::Vegetation)?)
    }

    /// Farm count per state code
    pub fn distribution_by_state(&self) -> AgroResult<ChartData> {
        let _ctx = self.span.enter();
        let counts = self.farms.count_by_state()?;
        info!(states = counts.len(), "[distribution_by_state] computed");

        Ok(ChartData::from_pairs(
            counts.into_iter().map(|(state, n)| (state, n as f64)),
        ))
    }

    /// Number of distinct farms each culture is planted on
    pub fn distribution_by_culture(&self) -> AgroResult<ChartData> {
        let _ctx = self.span.enter();
        let counts = self.cultures.count_farms_by_culture()?;
        info!(cultures = counts.len(), "[distribution_by_culture] computed");

        Ok(ChartData::from_pairs(
            counts.into_iter().map(|(name, n)| (name, n as f64)),
        ))
    }

    /// Arable vs vegetation hectares
    pub fn land_use_distribution(&self) -> AgroResult<ChartData> {
        let _ctx = self.span.enter();
        let arable = self.total_arable_area()?;
        let vegetation = self.total_vegetation_area()?;

        Ok(ChartData::from_pairs([
            (self.labels.arable.clone(), arable),
            (self.labels.vegetation.clone(), vegetation),
        ]))
    }

    pub fn summary(&self) -> AgroResult<FarmSummary> {
        let _ctx = self.span.enter();

        let total_farms = self.total_count()?;
        let total_area = self.total_area()?;
        let total_arable_area = self.total_arable_area()?;
        let total_vegetation_area = self.total_vegetation_area()?;

        let farms_by_state = self
            .farms
            .count_by_state()?
            .into_iter()
            .map(|(name, value)| ChartItem { name, value })
            .collect();

        info!(total_farms, total_area, "[summary] computed");

        Ok(FarmSummary {
            total_farms,
            total_area,
            total_arable_area,
            total_vegetation_area,
            metrics: SummaryMetrics {
                farms_by_state,
                total_area,
            },
        })
    }

    pub fn area_totals(&self) -> AgroResult<AreaTotals> {
        let _ctx = self.span.enter();
        Ok(AreaTotals {
            total_area: self.total_area()?,
            total_arable_area: self.total_arable_area()?,
            total_vegetation_area: self.total_vegetation_area()?,
            unit: AREA_UNIT.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::SqliteStore;
    use crate::entities::{NewFarm, NewHarvest, NewPlantedCulture, NewProducer};
    use crate::memory::MemoryStore;
    use crate::repository::Store;
    use crate::services::Services;

    fn seed<S: Store>(store: &S) {
        let services = Services::new(store, ReportLabels::default());
        let owner = services
            .producers
            .create(NewProducer {
                name: "Ana".to_string(),
                document: "12345678909".to_string(),
            })
            .unwrap();

        let mut farm_ids = Vec::new();
        for (state, total, arable, vegetation) in [
            ("SP", 1000.0, 600.0, 400.0),
            ("SP", 200.0, 100.0, 50.0),
            ("MG", 300.0, 150.0, 100.0),
        ] {
            let farm = services
                .farms
                .create(NewFarm {
                    name: format!("Fazenda {}", total),
                    state: state.to_string(),
                    city: "Cidade".to_string(),
                    total_area: total,
                    arable_area: arable,
                    vegetation_area: vegetation,
                    producer_id: owner.id.clone(),
                })
                .unwrap();
            farm_ids.push(farm.id);
        }

        let harvest = services
            .harvests
            .create(NewHarvest {
                name: "Safra 2024".to_string(),
                harvest_year: 2024,
            })
            .unwrap();

        // Soja twice on the first farm, once on the second: 2 distinct farms
        for (name, farm) in [("Soja", 0), ("Soja", 0), ("Soja", 1), ("Milho", 2)] {
            services
                .cultures
                .create(NewPlantedCulture {
                    name: name.to_string(),
                    area: 10.0,
                    farm_id: farm_ids[farm].clone(),
                    harvest_id: harvest.id.clone(),
                })
                .unwrap();
        }
    }

    fn check_reports<S: Store>(store: &S) {
        let reports = ReportService::new(store, store, ReportLabels::default());

        assert_eq!(reports.total_count().unwrap(), 3);
        assert_eq!(reports.total_area().unwrap(), 1500.0);
        assert_eq!(reports.total_arable_area().unwrap(), 850.0);
        assert_eq!(reports.total_vegetation_area().unwrap(), 550.0);

        let by_state = reports.distribution_by_state().unwrap();
        assert_eq!(by_state.labels, vec!["MG", "SP"]);
        assert_eq!(by_state.data, vec![1.0, 2.0]);

        let by_culture = reports.distribution_by_culture().unwrap();
        assert_eq!(by_culture.labels, vec!["Milho", "Soja"]);
        assert_eq!(by_culture.data, vec![1.0, 2.0]);

        let land_use = reports.land_use_distribution().unwrap();
        assert_eq!(land_use.labels, vec!["Arable Area", "Vegetation Area"]);
        assert_eq!(land_use.data, vec![850.0, 550.0]);

        let summary = reports.summary().unwrap();
        assert_eq!(summary.total_farms, 3);
        assert_eq!(summary.metrics.total_area, 1500.0);
        assert_eq!(
            summary.metrics.farms_by_state[1],
            ChartItem {
                name: "SP".to_string(),
                value: 2
            }
        );
    }

    #[test]
    fn test_reports_over_memory_store() {
        let store = MemoryStore::new();
        seed(&store);
        check_reports(&store);
    }

    #[test]
    fn test_reports_over_sqlite_store() {
        let store = SqliteStore::open_in_memory().unwrap();
        seed(&store);
        check_reports(&store);
    }

    #[test]
    fn test_empty_record_set() {
        let store = MemoryStore::new();
        let reports = ReportService::new(&store, &store, ReportLabels::default());

        assert_eq!(reports.total_count().unwrap(), 0);
        assert_eq!(reports.total_area().unwrap(), 0.0);
        assert!(reports.distribution_by_state().unwrap().labels.is_empty());
        assert!(reports.distribution_by_culture().unwrap().data.is_empty());

        let totals = reports.area_totals().unwrap();
        assert_eq!(totals.total_vegetation_area, 0.0);
        assert_eq!(totals.unit, "hectares");
    }

    #[test]
    fn test_custom_land_use_labels() {
        let store = MemoryStore::new();
        let labels = ReportLabels {
            arable: "Área Agricultável".to_string(),
            vegetation: "Área de Vegetação".to_string(),
        };
        let reports = ReportService::new(&store, &store, labels);

        let chart = reports.land_use_distribution().unwrap();
        assert_eq!(chart.labels[0], "Área Agricultável");
        assert_eq!(chart.data, vec![0.0, 0.0]);
    }

    #[test]
    fn test_summary_json_shape() {
        let store = MemoryStore::new();
        let reports = ReportService::new(&store, &store, ReportLabels::default());
        let json = serde_json::to_value(reports.summary().unwrap()).unwrap();

        assert_eq!(json["totalFarms"], 0);
        assert!(json["metrics"]["farmsByState"].is_array());
        assert_eq!(json["metrics"]["totalArea"], 0.0);
    }
}
