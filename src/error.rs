use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use chrono::NaiveDate;
use derive_more::{Display, Error};
use serde_json::json;

use crate::model::leave_request::LeaveStatus;

/// Reasons an apply request is turned away before it reaches the store.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum ValidationError {
    #[display(fmt = "{} is required", field)]
    MissingField { field: &'static str },

    #[display(fmt = "Invalid leave type: {}", value)]
    UnknownLeaveType { value: String },

    #[display(
        fmt = "end_date {} cannot be before start_date {}",
        end_date,
        start_date
    )]
    InvalidDateRange {
        start_date: NaiveDate,
        end_date: NaiveDate,
    },

    #[display(fmt = "Invalid request: {}", detail)]
    MalformedRequest { detail: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum LeaveError {
    #[display(fmt = "{}", _0)]
    Validation(ValidationError),

    #[display(fmt = "Leave request {} not found", id)]
    NotFound { id: u64 },

    #[display(fmt = "Leave request {} is already {} and cannot become {}", id, from, to)]
    InvalidTransition {
        id: u64,
        from: LeaveStatus,
        to: LeaveStatus,
    },

    #[display(fmt = "No leave request ids left to assign")]
    IdsExhausted,
}

impl From<ValidationError> for LeaveError {
    fn from(err: ValidationError) -> Self {
        LeaveError::Validation(err)
    }
}

impl ResponseError for LeaveError {
    fn status_code(&self) -> StatusCode {
        match self {
            LeaveError::Validation(_) => StatusCode::BAD_REQUEST,
            LeaveError::NotFound { .. } => StatusCode::NOT_FOUND,
            LeaveError::InvalidTransition { .. } => StatusCode::CONFLICT,
            LeaveError::IdsExhausted => StatusCode::INSUFFICIENT_STORAGE,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({
            "message": self.to_string()
        }))
    }
}
