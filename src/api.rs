// 🌐 HTTP API
//
// axum router over the lifecycle and report services. One store behind a
// mutex is shared by every request; each handler locks it, builds the
// services, runs one operation and releases it.

use crate::config::ReportLabels;
use crate::entities::{
    Farm, FarmUpdate, Harvest, HarvestUpdate, NewFarm, NewHarvest, NewPlantedCulture,
    NewProducer, PlantedCulture, PlantedCultureUpdate, Producer, ProducerUpdate,
};
use crate::error::{AgroError, AgroResult};
use crate::report::{AreaTotals, ChartData, FarmSummary};
use crate::repository::Store;
use crate::services::Services;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use std::sync::{Arc, Mutex};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

// ============================================================================
// STATE
// ============================================================================

/// Shared application state
pub struct AppState<S> {
    store: Arc<Mutex<S>>,
    labels: ReportLabels,
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        AppState {
            store: Arc::clone(&self.store),
            labels: self.labels.clone(),
        }
    }
}

impl<S: Store> AppState<S> {
    pub fn new(store: S, labels: ReportLabels) -> Self {
        AppState {
            store: Arc::new(Mutex::new(store)),
            labels,
        }
    }

    /// Run one operation against the store while holding the lock
    fn run<T>(
        &self,
        uri: &Uri,
        op: impl FnOnce(&Services<'_>) -> AgroResult<T>,
    ) -> Result<T, ApiError> {
        let store = self
            .store
            .lock()
            .map_err(|_| ApiError::internal(uri, "store lock poisoned"))?;
        let services = Services::new(&*store, self.labels.clone());
        op(&services).map_err(|err| ApiError::from_domain(err, uri))
    }
}

// ============================================================================
// ERRORS
// ============================================================================

/// HTTP status for a domain error
pub fn status_of(err: &AgroError) -> StatusCode {
    match err {
        e if e.is_not_found() => StatusCode::NOT_FOUND,
        e if e.is_validation() => StatusCode::BAD_REQUEST,
        AgroError::ProducerAlreadyExists(_) => StatusCode::CONFLICT,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Error response body
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub status_code: u16,
    pub message: String,
    pub error: String,
    pub timestamp: String,
    pub path: String,
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
    path: String,
}

impl ApiError {
    fn new(status: StatusCode, message: String, uri: &Uri) -> Self {
        ApiError {
            status,
            message,
            path: uri.path().to_string(),
        }
    }

    fn from_domain(err: AgroError, uri: &Uri) -> Self {
        let status = status_of(&err);
        if status.is_server_error() {
            // Storage details stay in the log
            tracing::error!(error = %err, path = %uri.path(), "request failed");
            return ApiError::new(status, "Internal server error".to_string(), uri);
        }
        tracing::warn!(error = %err, path = %uri.path(), "request rejected");
        ApiError::new(status, err.to_string(), uri)
    }

    fn internal(uri: &Uri, reason: &str) -> Self {
        tracing::error!(reason, path = %uri.path(), "request failed");
        ApiError::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal server error".to_string(),
            uri,
        )
    }

    fn bad_body(rejection: JsonRejection, uri: &Uri) -> Self {
        ApiError::new(StatusCode::BAD_REQUEST, rejection.body_text(), uri)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            status_code: self.status.as_u16(),
            message: self.message,
            error: self
                .status
                .canonical_reason()
                .unwrap_or("Error")
                .to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            path: self.path,
        };
        (self.status, Json(body)).into_response()
    }
}

type Payload<T> = Result<Json<T>, JsonRejection>;

fn payload<T>(body: Payload<T>, uri: &Uri) -> Result<T, ApiError> {
    body.map(|Json(value)| value)
        .map_err(|rejection| ApiError::bad_body(rejection, uri))
}

type ApiResult<T> = Result<Json<T>, ApiError>;
type Created<T> = Result<(StatusCode, Json<T>), ApiError>;

// ============================================================================
// ROUTER
// ============================================================================

pub fn router<S: Store + Send + 'static>(state: AppState<S>) -> Router {
    Router::new()
        .route("/health", get(health))
        // Producers
        .route(
            "/producers",
            get(list_producers::<S>).post(create_producer::<S>),
        )
        .route(
            "/producers/:id",
            get(get_producer::<S>)
                .put(update_producer::<S>)
                .delete(delete_producer::<S>),
        )
        // Farms
        .route("/farms", get(list_farms::<S>).post(create_farm::<S>))
        .route("/farms/reports/total", get(report_summary::<S>))
        .route("/farms/reports/total-area", get(report_total_area::<S>))
        .route("/farms/reports/by-state", get(report_by_state::<S>))
        .route("/farms/reports/by-culture", get(report_by_culture::<S>))
        .route("/farms/reports/soil", get(report_land_use::<S>))
        .route("/farms/producer/:producer_id", get(farms_of_producer::<S>))
        .route(
            "/farms/:id",
            get(get_farm::<S>)
                .put(update_farm::<S>)
                .delete(delete_farm::<S>),
        )
        // Harvests
        .route("/harvests", get(list_harvests::<S>).post(create_harvest::<S>))
        .route(
            "/harvests/:id",
            get(get_harvest::<S>)
                .put(update_harvest::<S>)
                .patch(update_harvest::<S>)
                .delete(delete_harvest::<S>),
        )
        // Planted cultures
        .route(
            "/planted-cultures",
            get(list_cultures::<S>).post(create_culture::<S>),
        )
        .route(
            "/planted-cultures/farm/:farm_id",
            get(cultures_of_farm::<S>),
        )
        .route(
            "/planted-cultures/harvest/:harvest_id",
            get(cultures_of_harvest::<S>),
        )
        .route(
            "/planted-cultures/:id",
            get(get_culture::<S>)
                .put(update_culture::<S>)
                .delete(delete_culture::<S>),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// GET /health
async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": crate::VERSION,
    }))
}

// ============================================================================
// Producer handlers
// ============================================================================

async fn create_producer<S: Store + Send + 'static>(
    State(state): State<AppState<S>>,
    uri: Uri,
    body: Payload<NewProducer>,
) -> Created<Producer> {
    let new = payload(body, &uri)?;
    let producer = state.run(&uri, |svc| svc.producers.create(new))?;
    Ok((StatusCode::CREATED, Json(producer)))
}

async fn list_producers<S: Store + Send + 'static>(
    State(state): State<AppState<S>>,
    uri: Uri,
) -> ApiResult<Vec<Producer>> {
    state.run(&uri, |svc| svc.producers.find_all()).map(Json)
}

async fn get_producer<S: Store + Send + 'static>(
    State(state): State<AppState<S>>,
    uri: Uri,
    Path(id): Path<String>,
) -> ApiResult<Producer> {
    state.run(&uri, |svc| svc.producers.find_by_id(&id)).map(Json)
}

async fn update_producer<S: Store + Send + 'static>(
    State(state): State<AppState<S>>,
    uri: Uri,
    Path(id): Path<String>,
    body: Payload<ProducerUpdate>,
) -> ApiResult<Producer> {
    let update = payload(body, &uri)?;
    state
        .run(&uri, |svc| svc.producers.update(&id, update))
        .map(Json)
}

async fn delete_producer<S: Store + Send + 'static>(
    State(state): State<AppState<S>>,
    uri: Uri,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.run(&uri, |svc| svc.producers.delete(&id))?;
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Farm handlers
// ============================================================================

async fn create_farm<S: Store + Send + 'static>(
    State(state): State<AppState<S>>,
    uri: Uri,
    body: Payload<NewFarm>,
) -> Created<Farm> {
    let new = payload(body, &uri)?;
    let farm = state.run(&uri, |svc| svc.farms.create(new))?;
    Ok((StatusCode::CREATED, Json(farm)))
}

async fn list_farms<S: Store + Send + 'static>(
    State(state): State<AppState<S>>,
    uri: Uri,
) -> ApiResult<Vec<Farm>> {
    state.run(&uri, |svc| svc.farms.find_all()).map(Json)
}

async fn get_farm<S: Store + Send + 'static>(
    State(state): State<AppState<S>>,
    uri: Uri,
    Path(id): Path<String>,
) -> ApiResult<Farm> {
    state.run(&uri, |svc| svc.farms.find_by_id(&id)).map(Json)
}

async fn farms_of_producer<S: Store + Send + 'static>(
    State(state): State<AppState<S>>,
    uri: Uri,
    Path(producer_id): Path<String>,
) -> ApiResult<Vec<Farm>> {
    state
        .run(&uri, |svc| svc.farms.find_by_producer(&producer_id))
        .map(Json)
}

async fn update_farm<S: Store + Send + 'static>(
    State(state): State<AppState<S>>,
    uri: Uri,
    Path(id): Path<String>,
    body: Payload<FarmUpdate>,
) -> ApiResult<Farm> {
    let update = payload(body, &uri)?;
    state.run(&uri, |svc| svc.farms.update(&id, update)).map(Json)
}

async fn delete_farm<S: Store + Send + 'static>(
    State(state): State<AppState<S>>,
    uri: Uri,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.run(&uri, |svc| svc.farms.delete(&id))?;
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Report handlers
// ============================================================================

async fn report_summary<S: Store + Send + 'static>(
    State(state): State<AppState<S>>,
    uri: Uri,
) -> ApiResult<FarmSummary> {
    state.run(&uri, |svc| svc.reports.summary()).map(Json)
}

async fn report_total_area<S: Store + Send + 'static>(
    State(state): State<AppState<S>>,
    uri: Uri,
) -> ApiResult<AreaTotals> {
    state.run(&uri, |svc| svc.reports.area_totals()).map(Json)
}

async fn report_by_state<S: Store + Send + 'static>(
    State(state): State<AppState<S>>,
    uri: Uri,
) -> ApiResult<ChartData> {
    state
        .run(&uri, |svc| svc.reports.distribution_by_state())
        .map(Json)
}

async fn report_by_culture<S: Store + Send + 'static>(
    State(state): State<AppState<S>>,
    uri: Uri,
) -> ApiResult<ChartData> {
    state
        .run(&uri, |svc| svc.reports.distribution_by_culture())
        .map(Json)
}

async fn report_land_use<S: Store + Send + 'static>(
    State(state): State<AppState<S>>,
    uri: Uri,
) -> ApiResult<ChartData> {
    state
        .run(&uri, |svc| svc.reports.land_use_distribution())
        .map(Json)
}

// ============================================================================
// Harvest handlers
// ============================================================================

async fn create_harvest<S: Store + Send + 'static>(
    State(state): State<AppState<S>>,
    uri: Uri,
    body: Payload<NewHarvest>,
) -> Created<Harvest> {
    let new = payload(body, &uri)?;
    let harvest = state.run(&uri, |svc| svc.harvests.create(new))?;
    Ok((StatusCode::CREATED, Json(harvest)))
}

async fn list_harvests<S: Store + Send + 'static>(
    State(state): State<AppState<S>>,
    uri: Uri,
) -> ApiResult<Vec<Harvest>> {
    state.run(&uri, |svc| svc.harvests.find_all()).map(Json)
}

async fn get_harvest<S: Store + Send + 'static>(
    State(state): State<AppState<S>>,
    uri: Uri,
    Path(id): Path<String>,
) -> ApiResult<Harvest> {
    state.run(&uri, |svc| svc.harvests.find_by_id(&id)).map(Json)
}

async fn update_harvest<S: Store + Send + 'static>(
    State(state): State<AppState<S>>,
    uri: Uri,
    Path(id): Path<String>,
    body: Payload<HarvestUpdate>,
) -> ApiResult<Harvest> {
    let update = payload(body, &uri)?;
    state
        .run(&uri, |svc| svc.harvests.update(&id, update))
        .map(Json)
}

async fn delete_harvest<S: Store + Send + 'static>(
    State(state): State<AppState<S>>,
    uri: Uri,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.run(&uri, |svc| svc.harvests.delete(&id))?;
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Planted culture handlers
// ============================================================================

async fn create_culture<S: Store + Send + 'static>(
    State(state): State<AppState<S>>,
    uri: Uri,
    body: Payload<NewPlantedCulture>,
) -> Created<PlantedCulture> {
    let new = payload(body, &uri)?;
    let culture = state.run(&uri, |svc| svc.cultures.create(new))?;
    Ok((StatusCode::CREATED, Json(culture)))
}

async fn list_cultures<S: Store + Send + 'static>(
    State(state): State<AppState<S>>,
    uri: Uri,
) -> ApiResult<Vec<PlantedCulture>> {
    state.run(&uri, |svc| svc.cultures.find_all()).map(Json)
}

async fn get_culture<S: Store + Send + 'static>(
    State(state): State<AppState<S>>,
    uri: Uri,
    Path(id): Path<String>,
) -> ApiResult<PlantedCulture> {
    state.run(&uri, |svc| svc.cultures.find_by_id(&id)).map(Json)
}

async fn cultures_of_farm<S: Store + Send + 'static>(
    State(state): State<AppState<S>>,
    uri: Uri,
    Path(farm_id): Path<String>,
) -> ApiResult<Vec<PlantedCulture>> {
    state
        .run(&uri, |svc| svc.cultures.find_by_farm(&farm_id))
        .map(Json)
}

async fn cultures_of_harvest<S: Store + Send + 'static>(
    State(state): State<AppState<S>>,
    uri: Uri,
    Path(harvest_id): Path<String>,
) -> ApiResult<Vec<PlantedCulture>> {
    state
        .run(&uri, |svc| svc.cultures.find_by_harvest(&harvest_id))
        .map(Json)
}

async fn update_culture<S: Store + Send + 'static>(
    State(state): State<AppState<S>>,
    uri: Uri,
    Path(id): Path<String>,
    body: Payload<PlantedCultureUpdate>,
) -> ApiResult<PlantedCulture> {
    let update = payload(body, &uri)?;
    state
        .run(&uri, |svc| svc.cultures.update(&id, update))
        .map(Json)
}

async fn delete_culture<S: Store + Send + 'static>(
    State(state): State<AppState<S>>,
    uri: Uri,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.run(&uri, |svc| svc.cultures.delete(&id))?;
    Ok(StatusCode::NO_CONTENT)
}
