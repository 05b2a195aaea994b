use axum::{
    Router,
    extract::{Path, State},
    response::{IntoResponse, Json},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use std::sync::Arc;

use application::catalog::{DangerReport, ThresholdInfo};
use domain::automation::TriggerDefaults;
use domain::device::LocalizedDeviceType;
use domain::sensor::LocalizedSensorType;
use domain::validation::FieldErrors;
use domain::{DeviceType, SensorType, Trigger, TypeOption};

use crate::error::ApiError;
use crate::state::AppState;

use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

type ApiResult<T> = Result<Json<T>, ApiError>;

pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/api/device-types", get(get_device_types))
        .route("/api/device-types/{device_type}", get(get_device_type))
        .route("/api/device-types/{device_type}/defaults", get(get_device_defaults))
        .route("/api/sensor-types", get(get_sensor_types))
        .route("/api/sensor-types/{sensor_type}", get(get_sensor_type))
        .route(
            "/api/sensor-types/{sensor_type}/thresholds/{field}",
            get(get_default_threshold),
        )
        .route(
            "/api/sensor-types/{sensor_type}/trigger-properties",
            get(get_trigger_properties),
        )
        .route(
            "/api/sensor-types/{sensor_type}/trigger-defaults/{property}",
            get(get_trigger_defaults),
        )
        .route("/api/validate/field", post(validate_field))
        .route("/api/validate/form", post(validate_form))
        .route("/api/device-actions/settings", post(build_device_action_settings))
        .route("/api/automation-triggers", post(build_automation_trigger))
        .route("/api/sensors/danger", post(evaluate_danger))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn get_device_types(State(state): State<Arc<AppState>>) -> Json<Vec<TypeOption>> {
    Json(state.catalog.device_types())
}

async fn get_device_type(
    Path(device_type): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<LocalizedDeviceType> {
    Ok(Json(state.catalog.device_type(&device_type)?))
}

async fn get_device_defaults(
    Path(device_type): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Map<String, Value>> {
    Ok(Json(state.catalog.device_defaults(&device_type)?))
}

async fn get_sensor_types(State(state): State<Arc<AppState>>) -> Json<Vec<TypeOption>> {
    Json(state.catalog.sensor_types())
}

async fn get_sensor_type(
    Path(sensor_type): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<LocalizedSensorType> {
    Ok(Json(state.catalog.sensor_type(&sensor_type)?))
}

async fn get_default_threshold(
    Path((sensor_type, field)): Path<(String, String)>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<ThresholdInfo> {
    Ok(Json(state.catalog.default_threshold(&sensor_type, &field)?))
}

async fn get_trigger_properties(
    Path(sensor_type): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Vec<TypeOption>> {
    Ok(Json(state.catalog.trigger_properties(&sensor_type)?))
}

async fn get_trigger_defaults(
    Path((sensor_type, property)): Path<(String, String)>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<TriggerDefaults> {
    Ok(Json(state.catalog.trigger_defaults(&sensor_type, &property)?))
}

/// Type selections arrive as raw keys; unknown keys count as no selection.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    #[serde(default)]
    pub device_type: Option<String>,
    #[serde(default)]
    pub sensor_type: Option<String>,
}

impl Selection {
    fn device_type(&self) -> Option<DeviceType> {
        self.device_type.as_deref().and_then(|s| s.parse().ok())
    }

    fn sensor_type(&self) -> Option<SensorType> {
        self.sensor_type.as_deref().and_then(|s| s.parse().ok())
    }
}

#[derive(Debug, Deserialize)]
pub struct ValidateFieldRequest {
    pub field: String,
    #[serde(default)]
    pub value: Value,
    #[serde(flatten)]
    pub selection: Selection,
}

#[derive(Debug, Serialize)]
pub struct ValidateFieldResponse {
    pub field: String,
    pub valid: bool,
    pub message: String,
}

async fn validate_field(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ValidateFieldRequest>,
) -> Json<ValidateFieldResponse> {
    let message = state.catalog.validate_field(
        &req.field,
        &req.value,
        req.selection.device_type(),
        req.selection.sensor_type(),
    );
    Json(ValidateFieldResponse {
        field: req.field,
        valid: message.is_empty(),
        message,
    })
}

#[derive(Debug, Deserialize)]
pub struct ValidateFormRequest {
    pub values: Map<String, Value>,
    #[serde(flatten)]
    pub selection: Selection,
}

#[derive(Debug, Serialize)]
pub struct ValidateFormResponse {
    pub valid: bool,
    pub errors: FieldErrors,
}

async fn validate_form(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ValidateFormRequest>,
) -> Json<ValidateFormResponse> {
    let errors = state.catalog.validate_form(
        &req.values,
        req.selection.device_type(),
        req.selection.sensor_type(),
    );
    Json(ValidateFormResponse {
        valid: errors.is_empty(),
        errors,
    })
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceActionRequest {
    pub device_type: String,
    #[serde(default)]
    pub settings: Map<String, Value>,
}

async fn build_device_action_settings(
    State(state): State<Arc<AppState>>,
    Json(req): Json<DeviceActionRequest>,
) -> Json<Map<String, Value>> {
    Json(
        state
            .catalog
            .device_action_settings(&req.device_type, &req.settings),
    )
}

async fn build_automation_trigger(
    State(state): State<Arc<AppState>>,
    Json(trigger): Json<Trigger>,
) -> Json<Trigger> {
    Json(state.catalog.automation_trigger(&trigger))
}

async fn evaluate_danger(
    State(state): State<Arc<AppState>>,
    Json(sensor): Json<Value>,
) -> Json<DangerReport> {
    Json(state.catalog.danger(&sensor))
}
