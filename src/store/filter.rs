use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::leave_request::{LeaveRequest, LeaveStatus};

/// Status and type restrictions on the visible requests.
///
/// An empty set leaves that field unrestricted. Values are compared against
/// the display labels exactly and are not checked against the known
/// statuses or types, so an unknown label simply matches nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "status": ["Pending"],
    "type": []
}))]
pub struct FilterState {
    #[serde(default)]
    #[schema(value_type = Vec<String>, example = json!(["Pending", "Approved"]))]
    pub status: BTreeSet<String>,

    #[serde(default, rename = "type")]
    #[schema(value_type = Vec<String>, example = json!(["Vacation"]))]
    pub leave_type: BTreeSet<String>,
}

impl FilterState {
    pub fn new<S, T>(status: S, leave_type: T) -> Self
    where
        S: IntoIterator,
        S::Item: Into<String>,
        T: IntoIterator,
        T::Item: Into<String>,
    {
        Self {
            status: status.into_iter().map(Into::into).collect(),
            leave_type: leave_type.into_iter().map(Into::into).collect(),
        }
    }

    /// Number of selected values across both fields.
    pub fn active_count(&self) -> usize {
        self.status.len() + self.leave_type.len()
    }

    pub fn matches(&self, request: &LeaveRequest) -> bool {
        let status_ok = self.status.is_empty() || self.status.contains(request.status.as_str());
        let type_ok =
            self.leave_type.is_empty() || self.leave_type.contains(request.leave_type.as_str());
        status_ok && type_ok
    }
}

/// Requests that pass the current filters, in store order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilteredView {
    requests: Vec<LeaveRequest>,
}

impl FilteredView {
    pub(crate) fn new(requests: Vec<LeaveRequest>) -> Self {
        Self { requests }
    }

    pub fn requests(&self) -> &[LeaveRequest] {
        &self.requests
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn with_status(&self, status: LeaveStatus) -> Vec<&LeaveRequest> {
        self.requests.iter().filter(|r| r.status == status).collect()
    }

    pub fn pending(&self) -> Vec<&LeaveRequest> {
        self.with_status(LeaveStatus::Pending)
    }

    pub fn approved(&self) -> Vec<&LeaveRequest> {
        self.with_status(LeaveStatus::Approved)
    }

    pub fn rejected(&self) -> Vec<&LeaveRequest> {
        self.with_status(LeaveStatus::Rejected)
    }

    pub fn into_requests(self) -> Vec<LeaveRequest> {
        self.requests
    }
}
