// Agricultural Records - Core Library
// Exposes all modules for use in the CLI, the API server and tests

pub mod areas;          // Farm area invariant
pub mod config;         // clap flags + env fallbacks
pub mod db;             // SQLite persistence
pub mod document;       // CPF/CNPJ checksums and formatting
pub mod entities;       // Producer, Farm, Harvest, PlantedCulture
pub mod error;
pub mod guard;          // Referential existence checks
pub mod logging;
pub mod memory;         // In-memory persistence
pub mod report;         // Dashboard aggregates
pub mod repository;     // Persistence traits
pub mod services;       // Entity lifecycle operations

#[cfg(feature = "server")]
pub mod api;

// Re-export commonly used types
pub use areas::{check_areas, check_update, FarmAreas};
pub use config::ReportLabels;
pub use db::{setup_database, SqliteStore};
pub use document::{is_valid_cnpj, is_valid_cpf, is_valid_document, DocumentKind};
pub use entities::{
    BrazilianState, Farm, FarmUpdate, Harvest, HarvestUpdate, NewFarm, NewHarvest,
    NewPlantedCulture, NewProducer, PlantedCulture, PlantedCultureUpdate, Producer,
    ProducerUpdate,
};
pub use error::{AgroError, AgroResult};
pub use guard::ensure_exists;
pub use memory::MemoryStore;
pub use report::{AreaTotals, ChartData, ChartItem, FarmSummary, ReportService};
pub use repository::{
    AreaField, FarmRepository, HarvestRepository, PlantedCultureRepository, ProducerRepository,
    Store,
};
pub use services::{
    FarmService, HarvestService, PlantedCultureService, ProducerService, Services,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
