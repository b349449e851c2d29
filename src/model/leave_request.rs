use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};
use utoipa::ToSchema;

use crate::model::employee::EmployeeSnapshot;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
    ToSchema,
)]
pub enum LeaveType {
    #[serde(rename = "Vacation", alias = "vacation")]
    #[strum(to_string = "Vacation", serialize = "vacation")]
    Vacation,
    #[serde(rename = "Sick Leave", alias = "sick")]
    #[strum(to_string = "Sick Leave", serialize = "sick")]
    SickLeave,
    #[serde(rename = "Personal Leave", alias = "personal")]
    #[strum(to_string = "Personal Leave", serialize = "personal")]
    PersonalLeave,
    #[serde(rename = "Work From Home", alias = "wfh")]
    #[strum(to_string = "Work From Home", serialize = "wfh")]
    WorkFromHome,
}

impl LeaveType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LeaveType::Vacation => "Vacation",
            LeaveType::SickLeave => "Sick Leave",
            LeaveType::PersonalLeave => "Personal Leave",
            LeaveType::WorkFromHome => "Work From Home",
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
    ToSchema,
)]
#[strum(ascii_case_insensitive)]
pub enum LeaveStatus {
    #[serde(alias = "pending")]
    Pending,
    #[serde(alias = "approved")]
    Approved,
    #[serde(alias = "rejected")]
    Rejected,
}

impl LeaveStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LeaveStatus::Pending => "Pending",
            LeaveStatus::Approved => "Approved",
            LeaveStatus::Rejected => "Rejected",
        }
    }

    /// Approved and Rejected have no outgoing transitions.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, LeaveStatus::Pending)
    }

    pub fn can_transition_to(&self, next: LeaveStatus) -> bool {
        matches!(
            (self, next),
            (LeaveStatus::Pending, LeaveStatus::Approved) | (LeaveStatus::Pending, LeaveStatus::Rejected)
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveRequest {
    pub id: u64,
    pub employee: EmployeeSnapshot,
    #[serde(rename = "type")]
    pub leave_type: LeaveType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: LeaveStatus,
    pub reason: String,
    pub created_at: DateTime<Utc>,
}

impl LeaveRequest {
    /// Calendar days covered, both ends inclusive.
    pub fn days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }
}
