//! `/api/batteries` handlers.

use super::extract::{ApiJson, ApiPath, ApiQuery};
use crate::domain::error::ApiError;
use crate::domain::views::{BatteryPage, BatteryView, Removed};
use crate::middleware::auth::{AdminOnly, AnyRole, Authorized, ManagerOrAbove};
use crate::service::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, put};
use axum::{Json, Router};
use fleet_telemetry::BATTERIES_CREATED;
use fleet_types::{BatteryStatus, EntityId, FleetError, Keyword};
use fm_01_battery_lifecycle::{BatteryPatch, BatteryQuery, NewBattery};
use serde::Deserialize;
use tracing::debug;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/critical", get(critical))
        .route("/:id", get(fetch).put(update).delete(remove))
        .route("/:id/charge", put(update_charge))
}

/// Query string of the battery list.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BatteryListParams {
    pub keyword: Option<String>,
    pub status: Option<String>,
    pub min_health: Option<f64>,
    pub page_number: Option<u32>,
}

impl TryFrom<BatteryListParams> for BatteryQuery {
    type Error = FleetError;

    fn try_from(params: BatteryListParams) -> Result<Self, Self::Error> {
        let status = params
            .status
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| s.parse::<BatteryStatus>())
            .transpose()
            .map_err(|e| FleetError::invalid(e.to_string()))?;
        Ok(BatteryQuery {
            keyword: Keyword::parse(params.keyword.as_deref()),
            status,
            min_health: params.min_health,
            page: params.page_number.unwrap_or(1),
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChargeRequest {
    #[serde(default)]
    pub current_charge: Option<f64>,
}

async fn list(
    State(state): State<AppState>,
    _auth: Authorized<AnyRole>,
    ApiQuery(params): ApiQuery<BatteryListParams>,
) -> Result<Json<BatteryPage>, ApiError> {
    let query = BatteryQuery::try_from(params)?;
    let page = state.batteries.list_batteries(&query)?;
    debug!(page = page.page, total = page.total, "Batteries listed");
    Ok(Json(BatteryPage::new(page, state.now())))
}

async fn critical(
    State(state): State<AppState>,
    _auth: Authorized<AnyRole>,
) -> Result<Json<Vec<BatteryView>>, ApiError> {
    let now = state.now();
    let batteries = state.batteries.critical_batteries()?;
    Ok(Json(
        batteries
            .into_iter()
            .map(|b| BatteryView::new(b, now))
            .collect(),
    ))
}

async fn fetch(
    State(state): State<AppState>,
    _auth: Authorized<AnyRole>,
    ApiPath(id): ApiPath<EntityId>,
) -> Result<Json<BatteryView>, ApiError> {
    let battery = state.batteries.get_battery(id)?;
    let shipment = match battery.shipment {
        Some(shipment_id) => state.linked_shipment(shipment_id)?,
        None => None,
    };
    let view = BatteryView::new(battery, state.now()).with_shipment(shipment.as_ref());
    Ok(Json(view))
}

async fn create(
    State(state): State<AppState>,
    _auth: Authorized<ManagerOrAbove>,
    ApiJson(input): ApiJson<NewBattery>,
) -> Result<(StatusCode, Json<BatteryView>), ApiError> {
    let battery = state.batteries.create_battery(input)?;
    BATTERIES_CREATED.inc();
    Ok((
        StatusCode::CREATED,
        Json(BatteryView::new(battery, state.now())),
    ))
}

async fn update(
    State(state): State<AppState>,
    _auth: Authorized<ManagerOrAbove>,
    ApiPath(id): ApiPath<EntityId>,
    ApiJson(patch): ApiJson<BatteryPatch>,
) -> Result<Json<BatteryView>, ApiError> {
    let battery = state.batteries.update_battery(id, patch)?;
    Ok(Json(BatteryView::new(battery, state.now())))
}

async fn update_charge(
    State(state): State<AppState>,
    _auth: Authorized<AnyRole>,
    ApiPath(id): ApiPath<EntityId>,
    ApiJson(body): ApiJson<ChargeRequest>,
) -> Result<Json<BatteryView>, ApiError> {
    let battery = state.batteries.update_charge(id, body.current_charge)?;
    Ok(Json(BatteryView::new(battery, state.now())))
}

async fn remove(
    State(state): State<AppState>,
    _auth: Authorized<AdminOnly>,
    ApiPath(id): ApiPath<EntityId>,
) -> Result<Json<Removed>, ApiError> {
    let battery = state.batteries.delete_battery(id)?;
    Ok(Json(Removed::new("Battery", battery.id)))
}
