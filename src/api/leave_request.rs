use std::str::FromStr;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use actix_web::error::{JsonPayloadError, PathError};
use actix_web::{HttpRequest, HttpResponse, Responder, web};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};
use utoipa::ToSchema;

use crate::config::Config;
use crate::error::{LeaveError, ValidationError};
use crate::model::employee::EmployeeSnapshot;
use crate::model::leave_balance::LeaveBalance;
use crate::model::leave_request::{LeaveRequest, LeaveStatus, LeaveType};
use crate::store::{FilterState, LeaveRequestStore, NewLeaveRequest};

pub type SharedStore = web::Data<RwLock<LeaveRequestStore>>;

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateLeave {
    /// applicant; the current user when omitted
    pub employee: Option<EmployeeSnapshot>,
    #[serde(rename = "type")]
    #[schema(example = "Vacation")]
    /// leave type label or form key (vacation, sick, personal, wfh)
    pub leave_type: Option<String>,
    #[serde(alias = "start_date")]
    #[schema(example = "2025-05-03", format = "date", value_type = Option<String>)]
    pub start_date: Option<NaiveDate>,
    #[serde(alias = "end_date")]
    #[schema(example = "2025-05-10", format = "date", value_type = Option<String>)]
    pub end_date: Option<NaiveDate>,
    #[schema(example = "Annual family vacation")]
    pub reason: Option<String>,
}

impl CreateLeave {
    fn into_new_request(self) -> Result<NewLeaveRequest, ValidationError> {
        let leave_type = match self.leave_type.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(LeaveType::from_str(raw).map_err(|_| {
                ValidationError::UnknownLeaveType {
                    value: raw.to_string(),
                }
            })?),
        };

        Ok(NewLeaveRequest {
            employee: self.employee.unwrap_or_else(EmployeeSnapshot::current_user),
            leave_type,
            start_date: self.start_date,
            end_date: self.end_date,
            reason: self.reason.unwrap_or_default(),
        })
    }
}

#[derive(Deserialize, ToSchema)]
pub struct StatusUpdate {
    #[schema(example = "Approved")]
    pub status: LeaveStatus,
}

#[derive(Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LeaveResponse {
    #[schema(example = 1)]
    pub id: u64,
    pub employee: EmployeeSnapshot,
    #[serde(rename = "type")]
    pub leave_type: LeaveType,
    #[schema(example = "2025-05-03", format = "date", value_type = String)]
    pub start_date: NaiveDate,
    #[schema(example = "2025-05-10", format = "date", value_type = String)]
    pub end_date: NaiveDate,
    pub status: LeaveStatus,
    #[schema(example = "Annual family vacation")]
    pub reason: String,
    #[schema(example = "2025-04-24T09:25:00Z", format = "date-time", value_type = String)]
    pub created_at: DateTime<Utc>,
    /// calendar days covered, inclusive
    #[schema(example = 8)]
    pub days: i64,
}

impl From<&LeaveRequest> for LeaveResponse {
    fn from(request: &LeaveRequest) -> Self {
        Self {
            id: request.id,
            employee: request.employee.clone(),
            leave_type: request.leave_type,
            start_date: request.start_date,
            end_date: request.end_date,
            status: request.status,
            reason: request.reason.clone(),
            created_at: request.created_at,
            days: request.days(),
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct LeaveViewResponse {
    pub filters: FilterState,
    #[schema(example = 5)]
    pub total: usize,
    pub data: Vec<LeaveResponse>,
    pub pending: Vec<LeaveResponse>,
    pub approved: Vec<LeaveResponse>,
    pub rejected: Vec<LeaveResponse>,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct LeaveBalanceResponse {
    #[serde(rename = "type")]
    #[schema(example = "Annual Leave")]
    pub leave_type: String,
    #[schema(example = 20)]
    pub total: u32,
    #[schema(example = 5)]
    pub used: u32,
    #[schema(example = 15)]
    pub remaining: u32,
}

impl From<&LeaveBalance> for LeaveBalanceResponse {
    fn from(balance: &LeaveBalance) -> Self {
        Self {
            leave_type: balance.leave_type.clone(),
            total: balance.total,
            used: balance.used,
            remaining: balance.remaining(),
        }
    }
}

// Store mutations are all-or-nothing, so a poisoned lock still guards a
// consistent store.
fn read_store(store: &RwLock<LeaveRequestStore>) -> RwLockReadGuard<'_, LeaveRequestStore> {
    store.read().unwrap_or_else(PoisonError::into_inner)
}

fn write_store(store: &RwLock<LeaveRequestStore>) -> RwLockWriteGuard<'_, LeaveRequestStore> {
    store.write().unwrap_or_else(PoisonError::into_inner)
}

/// Body errors answer with the same `{ "message" }` shape as validation.
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    warn!(error = %err, "Unreadable leave request body");
    LeaveError::from(ValidationError::MalformedRequest {
        detail: err.to_string(),
    })
    .into()
}

pub fn path_error_handler(err: PathError, _req: &HttpRequest) -> actix_web::Error {
    LeaveError::from(ValidationError::MalformedRequest {
        detail: err.to_string(),
    })
    .into()
}

async fn simulate_latency(config: &Config) {
    if !config.simulated_latency.is_zero() {
        actix_web::rt::time::sleep(config.simulated_latency).await;
    }
}

fn to_responses(requests: &[&LeaveRequest]) -> Vec<LeaveResponse> {
    requests.iter().map(|r| LeaveResponse::from(*r)).collect()
}

/* =========================
Filtered view
========================= */
#[utoipa::path(
    get,
    path = "/api/v1/leave",
    responses(
        (status = 200, description = "Filtered leave requests split by status", body = LeaveViewResponse)
    ),
    tag = "Leave"
)]
pub async fn leave_view(store: SharedStore) -> actix_web::Result<impl Responder> {
    let (filters, view) = {
        let store = read_store(&store);
        (store.filters().clone(), store.view())
    };

    let response = LeaveViewResponse {
        filters,
        total: view.len(),
        data: view.requests().iter().map(LeaveResponse::from).collect(),
        pending: to_responses(&view.pending()),
        approved: to_responses(&view.approved()),
        rejected: to_responses(&view.rejected()),
    };

    Ok(HttpResponse::Ok().json(response))
}

/* =========================
Apply for leave
========================= */
#[utoipa::path(
    post,
    path = "/api/v1/leave",
    request_body(
        content = CreateLeave,
        description = "Leave request payload",
        content_type = "application/json"
    ),
    responses(
        (status = 201, description = "Leave request submitted", body = LeaveResponse),
        (status = 400, description = "Missing field, unknown type or end date before start date", body = Object, example = json!({
            "message": "end_date 2025-04-30 cannot be before start_date 2025-05-01"
        }))
    ),
    tag = "Leave"
)]
#[instrument(name = "leave_apply", skip(store, config, payload))]
pub async fn create_leave(
    store: SharedStore,
    config: web::Data<Config>,
    payload: web::Json<CreateLeave>,
) -> actix_web::Result<impl Responder> {
    let new_request = payload.into_inner().into_new_request().map_err(|e| {
        warn!(error = %e, "Leave request rejected");
        LeaveError::from(e)
    })?;

    simulate_latency(&config).await;

    let created = write_store(&store).apply(new_request).map_err(|e| {
        warn!(error = %e, "Leave request rejected");
        e
    })?;

    info!(
        leave_id = created.id,
        leave_type = %created.leave_type,
        employee = %created.employee.name,
        "Leave request submitted"
    );

    Ok(HttpResponse::Created().json(LeaveResponse::from(&created)))
}

/* =========================
History
========================= */
#[utoipa::path(
    get,
    path = "/api/v1/leave/history",
    responses(
        (status = 200, description = "Approved and rejected requests, newest first", body = [LeaveResponse])
    ),
    tag = "Leave"
)]
pub async fn leave_history(store: SharedStore) -> actix_web::Result<impl Responder> {
    let history = read_store(&store).history();
    let body: Vec<LeaveResponse> = history.iter().map(LeaveResponse::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

/* =========================
Leave balance
========================= */
#[utoipa::path(
    get,
    path = "/api/v1/leave/balance",
    responses(
        (status = 200, description = "Leave balance per type", body = [LeaveBalanceResponse])
    ),
    tag = "Leave"
)]
pub async fn leave_balance(
    balances: web::Data<Vec<LeaveBalance>>,
) -> actix_web::Result<impl Responder> {
    let body: Vec<LeaveBalanceResponse> =
        balances.iter().map(LeaveBalanceResponse::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

/* =========================
Filters
========================= */
#[utoipa::path(
    get,
    path = "/api/v1/leave/filters",
    responses(
        (status = 200, description = "Active filters", body = FilterState)
    ),
    tag = "Leave"
)]
pub async fn get_filters(store: SharedStore) -> actix_web::Result<impl Responder> {
    let filters = read_store(&store).filters().clone();
    Ok(HttpResponse::Ok().json(filters))
}

#[utoipa::path(
    put,
    path = "/api/v1/leave/filters",
    request_body(
        content = FilterState,
        description = "Replacement filters; an empty list leaves that field unrestricted",
        content_type = "application/json"
    ),
    responses(
        (status = 200, description = "Filters replaced", body = FilterState)
    ),
    tag = "Leave"
)]
pub async fn set_filters(
    store: SharedStore,
    payload: web::Json<FilterState>,
) -> actix_web::Result<impl Responder> {
    let filters = payload.into_inner();
    tracing::debug!(active = filters.active_count(), "Replacing leave filters");
    write_store(&store).set_filters(filters.clone());
    Ok(HttpResponse::Ok().json(filters))
}

/* =========================
Single request
========================= */
#[utoipa::path(
    get,
    path = "/api/v1/leave/{id}",
    params(
        ("id" = u64, Path, description = "ID of the leave request to fetch")
    ),
    responses(
        (status = 200, description = "Leave request found", body = LeaveResponse),
        (status = 404, description = "Leave request not found", body = Object, example = json!({
            "message": "Leave request 42 not found"
        }))
    ),
    tag = "Leave"
)]
pub async fn get_leave(store: SharedStore, path: web::Path<u64>) -> actix_web::Result<impl Responder> {
    let id = path.into_inner();
    let found = read_store(&store).get(id).map(LeaveResponse::from);

    match found {
        Some(data) => Ok(HttpResponse::Ok().json(data)),
        None => Err(LeaveError::NotFound { id }.into()),
    }
}

/* =========================
Status transitions
========================= */
async fn transition(
    store: &RwLock<LeaveRequestStore>,
    config: &Config,
    id: u64,
    status: LeaveStatus,
) -> actix_web::Result<HttpResponse> {
    simulate_latency(config).await;

    let updated = write_store(store).set_status(id, status).map_err(|e| {
        warn!(error = %e, leave_id = id, "Status change refused");
        e
    })?;

    info!(leave_id = id, status = %updated.status, "Leave request {}", status.as_str().to_lowercase());
    Ok(HttpResponse::Ok().json(LeaveResponse::from(&updated)))
}

#[utoipa::path(
    put,
    path = "/api/v1/leave/{id}/status",
    params(
        ("id" = u64, Path, description = "ID of the leave request to update")
    ),
    request_body(
        content = StatusUpdate,
        content_type = "application/json"
    ),
    responses(
        (status = 200, description = "Status updated", body = LeaveResponse),
        (status = 404, description = "Leave request not found"),
        (status = 409, description = "Leave request already processed", body = Object, example = json!({
            "message": "Leave request 3 is already Approved and cannot become Rejected"
        }))
    ),
    tag = "Leave"
)]
#[instrument(name = "leave_set_status", skip(store, config, payload))]
pub async fn set_status(
    store: SharedStore,
    config: web::Data<Config>,
    path: web::Path<u64>,
    payload: web::Json<StatusUpdate>,
) -> actix_web::Result<impl Responder> {
    transition(&store, &config, path.into_inner(), payload.status).await
}

#[utoipa::path(
    put,
    path = "/api/v1/leave/{id}/approve",
    params(
        ("id" = u64, Path, description = "ID of the leave request to approve")
    ),
    responses(
        (status = 200, description = "Leave approved", body = LeaveResponse),
        (status = 404, description = "Leave request not found"),
        (status = 409, description = "Leave request already processed")
    ),
    tag = "Leave"
)]
#[instrument(name = "leave_approve", skip(store, config))]
pub async fn approve_leave(
    store: SharedStore,
    config: web::Data<Config>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    transition(&store, &config, path.into_inner(), LeaveStatus::Approved).await
}

#[utoipa::path(
    put,
    path = "/api/v1/leave/{id}/reject",
    params(
        ("id" = u64, Path, description = "ID of the leave request to reject")
    ),
    responses(
        (status = 200, description = "Leave rejected", body = LeaveResponse),
        (status = 404, description = "Leave request not found"),
        (status = 409, description = "Leave request already processed")
    ),
    tag = "Leave"
)]
#[instrument(name = "leave_reject", skip(store, config))]
pub async fn reject_leave(
    store: SharedStore,
    config: web::Data<Config>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    transition(&store, &config, path.into_inner(), LeaveStatus::Rejected).await
}
