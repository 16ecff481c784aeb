//! `/api/shipments` handlers.

use super::extract::{ApiJson, ApiPath, ApiQuery};
use crate::domain::error::ApiError;
use crate::domain::views::{AlertSummary, LogResponse, Removed, ShipmentPage, ShipmentView};
use crate::middleware::auth::{AdminOnly, AnyRole, Authorized, ManagerOrAbove};
use crate::service::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use fleet_telemetry::{ENVIRONMENTAL_READINGS, SHIPMENT_TRANSITIONS};
use fleet_types::{EntityId, FleetError, Keyword, Shipment, ShipmentStatus, User};
use fm_02_shipment_lifecycle::{EnvironmentalLogRequest, NewShipment, ShipmentPatch, ShipmentQuery};
use serde::Deserialize;
use std::collections::HashMap;
use tracing::debug;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/alerts", get(alerts))
        .route("/:id", get(fetch).put(update).delete(remove))
        .route("/:id/logs", post(add_log))
}

/// Query string of the shipment list.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ShipmentListParams {
    pub keyword: Option<String>,
    pub status: Option<String>,
    pub page_number: Option<u32>,
}

impl TryFrom<ShipmentListParams> for ShipmentQuery {
    type Error = FleetError;

    fn try_from(params: ShipmentListParams) -> Result<Self, Self::Error> {
        let status = params
            .status
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| s.parse::<ShipmentStatus>())
            .transpose()
            .map_err(|e| FleetError::invalid(e.to_string()))?;
        Ok(ShipmentQuery {
            keyword: Keyword::parse(params.keyword.as_deref()),
            status,
            page: params.page_number.unwrap_or(1),
        })
    }
}

async fn list(
    State(state): State<AppState>,
    _auth: Authorized<AnyRole>,
    ApiQuery(params): ApiQuery<ShipmentListParams>,
) -> Result<Json<ShipmentPage>, ApiError> {
    let query = ShipmentQuery::try_from(params)?;
    let page = state.shipments.list_shipments(&query)?;
    debug!(page = page.page, total = page.total, "Shipments listed");

    let mut assignees: HashMap<EntityId, Option<User>> = HashMap::new();
    for user_id in page.items.iter().filter_map(|s| s.assigned_to) {
        if !assignees.contains_key(&user_id) {
            assignees.insert(user_id, state.linked_user(user_id)?);
        }
    }
    let page = page.map(|shipment| {
        let assignee = shipment
            .assigned_to
            .and_then(|id| assignees.get(&id))
            .and_then(Option::as_ref);
        ShipmentView::from(shipment).with_assignee(assignee)
    });
    Ok(Json(ShipmentPage::from(page)))
}

async fn alerts(
    State(state): State<AppState>,
    _auth: Authorized<AnyRole>,
) -> Result<Json<Vec<AlertSummary>>, ApiError> {
    let shipments = state.shipments.shipments_with_active_alerts()?;
    Ok(Json(shipments.iter().map(AlertSummary::from).collect()))
}

async fn fetch(
    State(state): State<AppState>,
    _auth: Authorized<AnyRole>,
    ApiPath(id): ApiPath<EntityId>,
) -> Result<Json<ShipmentView>, ApiError> {
    let shipment = state.shipments.get_shipment(id)?;
    Ok(Json(populate(&state, shipment)?))
}

async fn create(
    State(state): State<AppState>,
    auth: Authorized<ManagerOrAbove>,
    ApiJson(input): ApiJson<NewShipment>,
) -> Result<(StatusCode, Json<ShipmentView>), ApiError> {
    let shipment = state
        .shipments
        .create_shipment(input, Some(auth.caller.user_id))?;
    Ok((StatusCode::CREATED, Json(ShipmentView::from(shipment))))
}

async fn update(
    State(state): State<AppState>,
    auth: Authorized<ManagerOrAbove>,
    ApiPath(id): ApiPath<EntityId>,
    ApiJson(patch): ApiJson<ShipmentPatch>,
) -> Result<Json<ShipmentView>, ApiError> {
    let update = state
        .shipments
        .update_shipment(id, patch, Some(auth.caller.user_id))?;
    if let Some(transition) = update.transition {
        SHIPMENT_TRANSITIONS
            .with_label_values(&[transition.to.as_str()])
            .inc();
    }
    Ok(Json(ShipmentView::from(update.shipment)))
}

async fn remove(
    State(state): State<AppState>,
    _auth: Authorized<AdminOnly>,
    ApiPath(id): ApiPath<EntityId>,
) -> Result<Json<Removed>, ApiError> {
    let shipment = state.shipments.delete_shipment(id)?;
    Ok(Json(Removed::new("Shipment", shipment.id)))
}

async fn add_log(
    State(state): State<AppState>,
    _auth: Authorized<AnyRole>,
    ApiPath(id): ApiPath<EntityId>,
    ApiJson(request): ApiJson<EnvironmentalLogRequest>,
) -> Result<(StatusCode, Json<LogResponse>), ApiError> {
    let logged = state.shipments.add_environmental_log(id, request)?;
    ENVIRONMENTAL_READINGS
        .with_label_values(&[logged.kind.as_str(), if logged.is_alert { "true" } else { "false" }])
        .inc();
    Ok((StatusCode::CREATED, Json(LogResponse::from(logged))))
}

/// Embed member battery summaries, the assignee and audit authors.
fn populate(state: &AppState, shipment: Shipment) -> Result<ShipmentView, FleetError> {
    let mut members = HashMap::with_capacity(shipment.batteries.len());
    for id in &shipment.batteries {
        if let Some(battery) = state.linked_battery(*id)? {
            members.insert(*id, battery);
        }
    }
    let assignee = match shipment.assigned_to {
        Some(user_id) => state.linked_user(user_id)?,
        None => None,
    };
    let mut authors = HashMap::new();
    for user_id in shipment.status_updates.iter().filter_map(|u| u.updated_by) {
        if !authors.contains_key(&user_id) {
            if let Some(user) = state.linked_user(user_id)? {
                authors.insert(user_id, user);
            }
        }
    }

    Ok(ShipmentView::from(shipment)
        .populate_batteries(|id| members.get(&id).cloned())
        .with_assignee(assignee.as_ref())
        .populate_authors(|id| authors.get(&id).cloned()))
}
