// SQLite persistence adapter
//
// Implements every repository port over a single rusqlite Connection.
// Timestamps are stored as RFC 3339 text, areas as REAL.

use crate::entities::{BrazilianState, Farm, Harvest, PlantedCulture, Producer};
use crate::repository::{
    AreaField, FarmRepository, HarvestRepository, PlantedCultureRepository, ProducerRepository,
};
use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;

pub fn setup_database(conn: &Connection) -> Result<()> {
    // WAL for crash recovery; foreign keys are off by default in SQLite
    conn.pragma_update(None, "journal_mode", "WAL")?;
    conn.pragma_update(None, "foreign_keys", "ON")?;

    // ==========================================================================
    // Tables
    // ==========================================================================
    conn.execute(
        "CREATE TABLE IF NOT EXISTS producers (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            document TEXT UNIQUE NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS farms (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            state TEXT NOT NULL,
            city TEXT NOT NULL,
            total_area REAL NOT NULL,
            arable_area REAL NOT NULL,
            vegetation_area REAL NOT NULL,
            producer_id TEXT NOT NULL REFERENCES producers(id),
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS harvests (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            harvest_year INTEGER NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS planted_cultures (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            area REAL NOT NULL,
            farm_id TEXT NOT NULL REFERENCES farms(id),
            harvest_id TEXT NOT NULL REFERENCES harvests(id),
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )",
        [],
    )?;

    // ==========================================================================
    // Indexes
    // ==========================================================================
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_farms_producer ON farms(producer_id)",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_farms_state ON farms(state)",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_cultures_farm ON planted_cultures(farm_id)",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_cultures_harvest ON planted_cultures(harvest_id)",
        [],
    )?;

    Ok(())
}

// ============================================================================
// ROW MAPPING
// ============================================================================

fn parse_time(row: &Row, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let text: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&text)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

const PRODUCER_COLUMNS: &str = "id, name, document, created_at, updated_at";

fn producer_from_row(row: &Row) -> rusqlite::Result<Producer> {
    Ok(Producer {
        id: row.get(0)?,
        name: row.get(1)?,
        document: row.get(2)?,
        created_at: parse_time(row, 3)?,
        updated_at: parse_time(row, 4)?,
    })
}

const FARM_COLUMNS: &str = "id, name, state, city, total_area, arable_area, vegetation_area,
     producer_id, created_at, updated_at";

fn farm_from_row(row: &Row) -> rusqlite::Result<Farm> {
    let state_code: String = row.get(2)?;
    let state = state_code.parse::<BrazilianState>().map_err(|code| {
        rusqlite::Error::FromSqlConversionFailure(
            2,
            Type::Text,
            format!("unknown state code {}", code).into(),
        )
    })?;

    Ok(Farm {
        id: row.get(0)?,
        name: row.get(1)?,
        state,
        city: row.get(3)?,
        total_area: row.get(4)?,
        arable_area: row.get(5)?,
        vegetation_area: row.get(6)?,
        producer_id: row.get(7)?,
        created_at: parse_time(row, 8)?,
        updated_at: parse_time(row, 9)?,
    })
}

const HARVEST_COLUMNS: &str = "id, name, harvest_year, created_at, updated_at";

fn harvest_from_row(row: &Row) -> rusqlite::Result<Harvest> {
    Ok(Harvest {
        id: row.get(0)?,
        name: row.get(1)?,
        harvest_year: row.get(2)?,
        created_at: parse_time(row, 3)?,
        updated_at: parse_time(row, 4)?,
    })
}

const CULTURE_COLUMNS: &str = "id, name, area, farm_id, harvest_id, created_at, updated_at";

fn culture_from_row(row: &Row) -> rusqlite::Result<PlantedCulture> {
    Ok(PlantedCulture {
        id: row.get(0)?,
        name: row.get(1)?,
        area: row.get(2)?,
        farm_id: row.get(3)?,
        harvest_id: row.get(4)?,
        created_at: parse_time(row, 5)?,
        updated_at: parse_time(row, 6)?,
    })
}

// ============================================================================
// SQLITE STORE
// ============================================================================

pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (or create) a database file and make sure the schema exists
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database at {}", path.display()))?;
        Self::from_connection(conn)
    }

    /// Private in-memory database (tests, `--memory` mode)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("Failed to open in-memory database")?;
        Self::from_connection(conn)
    }

    pub fn from_connection(conn: Connection) -> Result<Self> {
        setup_database(&conn).context("Failed to set up database schema")?;
        Ok(SqliteStore { conn })
    }

    fn query_list<T, P>(
        &self,
        sql: &str,
        params: P,
        map: fn(&Row) -> rusqlite::Result<T>,
    ) -> Result<Vec<T>>
    where
        P: rusqlite::Params,
    {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt
            .query_map(params, map)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    fn query_one<T>(
        &self,
        sql: &str,
        id: &str,
        map: fn(&Row) -> rusqlite::Result<T>,
    ) -> Result<Option<T>> {
        let row = self.conn.query_row(sql, [id], map).optional()?;
        Ok(row)
    }

    fn query_counts(&self, sql: &str) -> Result<Vec<(String, i64)>> {
        self.query_list(sql, [], |row| Ok((row.get(0)?, row.get(1)?)))
    }

    fn delete_row(&self, table: &str, id: &str) -> Result<()> {
        self.conn
            .execute(&format!("DELETE FROM {} WHERE id = ?1", table), [id])
            .with_context(|| format!("Failed to delete {} row {}", table, id))?;
        Ok(())
    }
}

fn expect_one_row(changed: usize, table: &str, id: &str) -> Result<()> {
    if changed == 0 {
        bail!("No {} row with id {} to update", table, id);
    }
    Ok(())
}

impl ProducerRepository for SqliteStore {
    fn create(&self, producer: &Producer) -> Result<Producer> {
        self.conn.execute(
            "INSERT INTO producers (id, name, document, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                producer.id,
                producer.name,
                producer.document,
                producer.created_at.to_rfc3339(),
                producer.updated_at.to_rfc3339(),
            ],
        )?;
        Ok(producer.clone())
    }

    fn find_all(&self) -> Result<Vec<Producer>> {
        self.query_list(
            &format!("SELECT {} FROM producers ORDER BY created_at", PRODUCER_COLUMNS),
            [],
            producer_from_row,
        )
    }

    fn find_by_id(&self, id: &str) -> Result<Option<Producer>> {
        self.query_one(
            &format!("SELECT {} FROM producers WHERE id = ?1", PRODUCER_COLUMNS),
            id,
            producer_from_row,
        )
    }

    fn update(&self, producer: &Producer) -> Result<Producer> {
        let changed = self.conn.execute(
            "UPDATE producers SET name = ?1, document = ?2, updated_at = ?3 WHERE id = ?4",
            params![
                producer.name,
                producer.document,
                producer.updated_at.to_rfc3339(),
                producer.id,
            ],
        )?;
        expect_one_row(changed, "producers", &producer.id)?;
        Ok(producer.clone())
    }

    fn delete(&self, id: &str) -> Result<()> {
        self.delete_row("producers", id)
    }

    fn find_by_document(&self, document: &str) -> Result<Option<Producer>> {
        self.query_one(
            &format!("SELECT {} FROM producers WHERE document = ?1", PRODUCER_COLUMNS),
            document,
            producer_from_row,
        )
    }
}

impl FarmRepository for SqliteStore {
    fn create(&self, farm: &Farm) -> Result<Farm> {
        self.conn.execute(
            "INSERT INTO farms (
                id, name, state, city, total_area, arable_area, vegetation_area,
                producer_id, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                farm.id,
                farm.name,
                farm.state.as_str(),
                farm.city,
                farm.total_area,
                farm.arable_area,
                farm.vegetation_area,
                farm.producer_id,
                farm.created_at.to_rfc3339(),
                farm.updated_at.to_rfc3339(),
            ],
        )?;
        Ok(farm.clone())
    }

    fn find_all(&self) -> Result<Vec<Farm>> {
        self.query_list(
            &format!("SELECT {} FROM farms ORDER BY created_at", FARM_COLUMNS),
            [],
            farm_from_row,
        )
    }

    fn find_by_id(&self, id: &str) -> Result<Option<Farm>> {
        self.query_one(
            &format!("SELECT {} FROM farms WHERE id = ?1", FARM_COLUMNS),
            id,
            farm_from_row,
        )
    }

    fn update(&self, farm: &Farm) -> Result<Farm> {
        let changed = self.conn.execute(
            "UPDATE farms
             SET name = ?1, state = ?2, city = ?3,
                 total_area = ?4, arable_area = ?5, vegetation_area = ?6,
                 producer_id = ?7, updated_at = ?8
             WHERE id = ?9",
            params![
                farm.name,
                farm.state.as_str(),
                farm.city,
                farm.total_area,
                farm.arable_area,
                farm.vegetation_area,
                farm.producer_id,
                farm.updated_at.to_rfc3339(),
                farm.id,
            ],
        )?;
        expect_one_row(changed, "farms", &farm.id)?;
        Ok(farm.clone())
    }

    fn delete(&self, id: &str) -> Result<()> {
        self.delete_row("farms", id)
    }

    fn find_by_producer_id(&self, producer_id: &str) -> Result<Vec<Farm>> {
        self.query_list(
            &format!(
                "SELECT {} FROM farms WHERE producer_id = ?1 ORDER BY created_at",
                FARM_COLUMNS
            ),
            [producer_id],
            farm_from_row,
        )
    }

    fn count(&self) -> Result<i64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM farms", [], |row| row.get(0))?;
        Ok(count)
    }

    fn sum_area(&self, field: AreaField) -> Result<f64> {
        // SUM over zero rows is NULL
        let sql = format!("SELECT COALESCE(SUM({}), 0.0) FROM farms", field.column());
        let total: f64 = self.conn.query_row(&sql, [], |row| row.get(0))?;
        Ok(total)
    }

    fn count_by_state(&self) -> Result<Vec<(String, i64)>> {
        self.query_counts(
            "SELECT state, COUNT(*) FROM farms GROUP BY state ORDER BY state",
        )
    }
}

impl HarvestRepository for SqliteStore {
    fn create(&self, harvest: &Harvest) -> Result<Harvest> {
        self.conn.execute(
            "INSERT INTO harvests (id, name, harvest_year, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                harvest.id,
                harvest.name,
                harvest.harvest_year,
                harvest.created_at.to_rfc3339(),
                harvest.updated_at.to_rfc3339(),
            ],
        )?;
        Ok(harvest.clone())
    }

    fn find_all(&self) -> Result<Vec<Harvest>> {
        self.query_list(
            &format!("SELECT {} FROM harvests ORDER BY created_at", HARVEST_COLUMNS),
            [],
            harvest_from_row,
        )
    }

    fn find_by_id(&self, id: &str) -> Result<Option<Harvest>> {
        self.query_one(
            &format!("SELECT {} FROM harvests WHERE id = ?1", HARVEST_COLUMNS),
            id,
            harvest_from_row,
        )
    }

    fn update(&self, harvest: &Harvest) -> Result<Harvest> {
        let changed = self.conn.execute(
            "UPDATE harvests SET name = ?1, harvest_year = ?2, updated_at = ?3 WHERE id = ?4",
            params![
                harvest.name,
                harvest.harvest_year,
                harvest.updated_at.to_rfc3339(),
                harvest.id,
            ],
        )?;
        expect_one_row(changed, "harvests", &harvest.id)?;
        Ok(harvest.clone())
    }

    fn delete(&self, id: &str) -> Result<()> {
        self.delete_row("harvests", id)
    }

    fn find_by_year(&self, harvest_year: i32) -> Result<Vec<Harvest>> {
        self.query_list(
            &format!(
                "SELECT {} FROM harvests WHERE harvest_year = ?1 ORDER BY created_at",
                HARVEST_COLUMNS
            ),
            [harvest_year],
            harvest_from_row,
        )
    }
}

impl PlantedCultureRepository for SqliteStore {
    fn create(&self, culture: &PlantedCulture) -> Result<PlantedCulture> {
        self.conn.execute(
            "INSERT INTO planted_cultures (
                id, name, area, farm_id, harvest_id, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                culture.id,
                culture.name,
                culture.area,
                culture.farm_id,
                culture.harvest_id,
                culture.created_at.to_rfc3339(),
                culture.updated_at.to_rfc3339(),
            ],
        )?;
        Ok(culture.clone())
    }

    fn find_all(&self) -> Result<Vec<PlantedCulture>> {
        self.query_list(
            &format!("SELECT {} FROM planted_cultures ORDER BY created_at", CULTURE_COLUMNS),
            [],
            culture_from_row,
        )
    }

    fn find_by_id(&self, id: &str) -> Result<Option<PlantedCulture>> {
        self.query_one(
            &format!("SELECT {} FROM planted_cultures WHERE id = ?1", CULTURE_COLUMNS),
            id,
            culture_from_row,
        )
    }

    fn update(&self, culture: &PlantedCulture) -> Result<PlantedCulture> {
        let changed = self.conn.execute(
            "UPDATE planted_cultures
             SET name = ?1, area = ?2, farm_id = ?3, harvest_id = ?4, updated_at = ?5
             WHERE id = ?6",
            params![
                culture.name,
                culture.area,
                culture.farm_id,
                culture.harvest_id,
                culture.updated_at.to_rfc3339(),
                culture.id,
            ],
        )?;
        expect_one_row(changed, "planted_cultures", &culture.id)?;
        Ok(culture.clone())
    }

    fn delete(&self, id: &str) -> Result<()> {
        self.delete_row("planted_cultures", id)
    }

    fn find_by_farm(&self, farm_id: &str) -> Result<Vec<PlantedCulture>> {
        self.query_list(
            &format!(
                "SELECT {} FROM planted_cultures WHERE farm_id = ?1 ORDER BY created_at",
                CULTURE_COLUMNS
            ),
            [farm_id],
            culture_from_row,
        )
    }

    fn find_by_harvest(&self, harvest_id: &str) -> Result<Vec<PlantedCulture>> {
        self.query_list(
            &format!(
                "SELECT {} FROM planted_cultures WHERE harvest_id = ?1 ORDER BY created_at",
                CULTURE_COLUMNS
            ),
            [harvest_id],
            culture_from_row,
        )
    }

    fn count_farms_by_culture(&self) -> Result<Vec<(String, i64)>> {
        self.query_counts(
            "SELECT name, COUNT(DISTINCT farm_id) FROM planted_cultures
             GROUP BY name ORDER BY name",
        )
    }
}
